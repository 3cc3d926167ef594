//! The lint gate.
//!
//! Builds a single invocation of the external style checker over the
//! discovered sources and maps its exit status onto pass or fail. The checker
//! inherits the harness's standard streams and reports for itself.

use crate::error::{LintError, Result};
use crate::sources::SourceSettings;
use camino::Utf8PathBuf;
use harness_common::{CommandExecutor, render_command, run_checked};
use log::info;
use serde::Deserialize;

/// Rule categories suppressed by default.
pub const DEFAULT_FILTERS: &[&str] = &[
    "-whitespace/braces",
    "-whitespace/semicolon",
    "-whitespace/blank_line",
    "-whitespace/comma",
    "-whitespace/operators",
    "-whitespace/parens",
    "-whitespace/indent",
    "-whitespace/comments",
    "-whitespace/newline",
    "-whitespace/tab",
    "-build/include_order",
    "-build/namespaces",
    "-build/include_what_you_use",
    "-readability/streams",
    "-readability/todo",
    "-runtime/references",
    "-runtime/int",
    "-runtime/explicit",
    "-runtime/printf",
];

/// The `[lint]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintSettings {
    /// Program and leading arguments of the checker.
    pub command: Vec<String>,
    /// Value for `--counting`, omitted when unset.
    pub counting: Option<String>,
    /// Extensions the checker itself should recognise.
    pub extensions: Vec<String>,
    /// Maximum accepted line length.
    pub line_length: u32,
    /// Rule suppressions passed through `--filter`.
    pub filters: Vec<String>,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            command: vec!["python".to_owned(), "misc/cpplint.py".to_owned()],
            counting: Some("detailed".to_owned()),
            extensions: ["cpp", "hpp", "h"].map(str::to_owned).to_vec(),
            line_length: 250,
            filters: DEFAULT_FILTERS.iter().map(|&f| f.to_owned()).collect(),
        }
    }
}

/// A fully assembled checker command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintInvocation {
    program: String,
    args: Vec<String>,
    file_count: usize,
}

impl LintInvocation {
    /// Assembles the checker command for `files`.
    ///
    /// An empty file list is valid and produces no trailing arguments.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::MissingCommand`] if `settings.command` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use harness_lint::{LintInvocation, LintSettings};
    ///
    /// let settings = LintSettings {
    ///     command: vec!["cpplint".to_owned()],
    ///     counting: None,
    ///     extensions: Vec::new(),
    ///     line_length: 120,
    ///     filters: Vec::new(),
    /// };
    /// let invocation = LintInvocation::new(&settings, vec![Utf8PathBuf::from("src/a.cpp")])?;
    /// assert_eq!(invocation.program(), "cpplint");
    /// assert_eq!(invocation.args(), ["--linelength=120", "src/a.cpp"]);
    /// # Ok::<(), harness_lint::LintError>(())
    /// ```
    pub fn new<I>(settings: &LintSettings, files: I) -> Result<Self>
    where
        I: IntoIterator<Item = Utf8PathBuf>,
    {
        let (program, leading) = settings
            .command
            .split_first()
            .ok_or(LintError::MissingCommand)?;
        if program.trim().is_empty() {
            return Err(LintError::MissingCommand);
        }

        let mut args = leading.to_vec();
        if let Some(counting) = &settings.counting {
            args.push(format!("--counting={counting}"));
        }
        if !settings.extensions.is_empty() {
            args.push(format!("--extensions={}", settings.extensions.join(",")));
        }
        args.push(format!("--linelength={}", settings.line_length));
        if !settings.filters.is_empty() {
            args.push(format!("--filter={}", settings.filters.join(",")));
        }

        let options = args.len();
        args.extend(files.into_iter().map(Utf8PathBuf::into_string));

        Ok(Self {
            program: program.clone(),
            file_count: args.len() - options,
            args,
        })
    }

    /// Returns the checker program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns every argument, options first and files last.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the number of source files handed to the checker.
    #[must_use]
    pub const fn file_count(&self) -> usize {
        self.file_count
    }
}

impl std::fmt::Display for LintInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&render_command(&self.program, &self.args))
    }
}

/// Runs the external style checker.
#[cfg_attr(test, mockall::automock)]
pub trait LintRunner {
    /// Runs `invocation` and blocks until the checker exits.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Launch`] if the checker cannot be started and
    /// [`LintError::Rejected`] if it exits unsuccessfully.
    fn check(&self, invocation: &LintInvocation) -> Result<()>;
}

/// [`LintRunner`] backed by a real process.
#[derive(Clone, Copy)]
pub struct ExternalLinter<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> ExternalLinter<'a> {
    /// Creates a runner that launches the checker through `executor`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }
}

impl LintRunner for ExternalLinter<'_> {
    fn check(&self, invocation: &LintInvocation) -> Result<()> {
        run_checked(self.executor, invocation.program(), invocation.args())?;
        Ok(())
    }
}

/// Discovers sources and runs the checker over them.
///
/// Returns the number of files checked.
///
/// # Errors
///
/// Propagates discovery errors, [`LintError::MissingCommand`], and whatever
/// the runner reports.
pub fn run_gate(
    runner: &dyn LintRunner,
    sources: &SourceSettings,
    settings: &LintSettings,
) -> Result<usize> {
    let files = sources.discover()?;
    let invocation = LintInvocation::new(settings, files)?;
    info!(
        "checking {} source file(s) with {}",
        invocation.file_count(),
        invocation.program()
    );
    runner.check(&invocation)?;
    Ok(invocation.file_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use harness_common::ProcessError;
    use harness_common::test_support::{ExpectedCall, RecordingExecutor, StubExecutor, exit_status};
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn minimal_settings() -> LintSettings {
        LintSettings {
            command: vec!["cpplint".to_owned()],
            counting: None,
            extensions: Vec::new(),
            line_length: 80,
            filters: Vec::new(),
        }
    }

    #[test]
    fn default_invocation_matches_release_checks() {
        let invocation =
            LintInvocation::new(&LintSettings::default(), vec![Utf8PathBuf::from("src/main.cpp")])
                .expect("default settings are valid");

        assert_eq!(invocation.program(), "python");
        let args = invocation.args();
        assert_eq!(args.first().map(String::as_str), Some("misc/cpplint.py"));
        assert!(args.contains(&"--counting=detailed".to_owned()));
        assert!(args.contains(&"--extensions=cpp,hpp,h".to_owned()));
        assert!(args.contains(&"--linelength=250".to_owned()));
        assert!(
            args.iter()
                .any(|arg| arg.starts_with("--filter=-whitespace/braces,"))
        );
        assert_eq!(args.last().map(String::as_str), Some("src/main.cpp"));
        assert_eq!(invocation.file_count(), 1);
    }

    #[test]
    fn empty_file_list_has_no_trailing_arguments() {
        let invocation =
            LintInvocation::new(&minimal_settings(), Vec::new()).expect("valid settings");

        assert_eq!(invocation.args(), ["--linelength=80"]);
        assert_eq!(invocation.file_count(), 0);
    }

    #[rstest]
    #[case::no_program(Vec::new())]
    #[case::blank_program(vec![" ".to_owned()])]
    fn empty_command_is_rejected(#[case] command: Vec<String>) {
        let settings = LintSettings {
            command,
            ..minimal_settings()
        };

        let err = LintInvocation::new(&settings, Vec::new()).expect_err("command required");

        assert!(matches!(err, LintError::MissingCommand));
    }

    #[rstest]
    #[case::clean(0, true)]
    #[case::violations(1, false)]
    fn external_linter_maps_exit_status(#[case] code: i32, #[case] passes: bool) {
        let executor =
            StubExecutor::new(vec![ExpectedCall::exits("cpplint", &["--linelength=80", "a.h"], code)]);
        let linter = ExternalLinter::new(&executor);
        let invocation = LintInvocation::new(&minimal_settings(), vec![Utf8PathBuf::from("a.h")])
            .expect("valid settings");

        let result = linter.check(&invocation);

        executor.assert_finished();
        assert_eq!(result.is_ok(), passes);
        if !passes {
            assert!(matches!(result, Err(LintError::Rejected { .. })));
        }
    }

    #[test]
    fn external_linter_reports_launch_failure() {
        let executor = StubExecutor::new(vec![ExpectedCall::missing("cpplint", &["--linelength=80"])]);
        let linter = ExternalLinter::new(&executor);
        let invocation =
            LintInvocation::new(&minimal_settings(), Vec::new()).expect("valid settings");

        let err = linter.check(&invocation).expect_err("launch must fail");

        assert!(matches!(err, LintError::Launch { .. }));
    }

    #[test]
    fn run_gate_checks_an_empty_tree_once() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        let sources = SourceSettings {
            roots: vec![root],
            ..SourceSettings::default()
        };

        let mut runner = MockLintRunner::new();
        runner
            .expect_check()
            .withf(|invocation| invocation.file_count() == 0)
            .times(1)
            .returning(|_| Ok(()));

        let checked = run_gate(&runner, &sources, &minimal_settings()).expect("gate passes");

        assert_eq!(checked, 0);
    }

    #[test]
    fn run_gate_passes_discovered_files_to_the_checker() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        fs::write(root.join("video.cpp"), b"int main() {}\n").expect("write source");
        fs::write(root.join("CMakeCache.h"), b"\n").expect("write excluded");
        let sources = SourceSettings {
            roots: vec![root.clone()],
            ..SourceSettings::default()
        };
        let executor = RecordingExecutor::with_exit_code(0);

        let checked = run_gate(&ExternalLinter::new(&executor), &sources, &minimal_settings())
            .expect("gate passes");

        assert_eq!(checked, 1);
        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        let call = calls.first().expect("one call");
        assert_eq!(call.program, "cpplint");
        assert_eq!(
            call.args.last().map(String::as_str),
            Some(root.join("video.cpp").as_str())
        );
    }

    #[test]
    fn run_gate_surfaces_rejection() {
        let sources = SourceSettings {
            roots: Vec::new(),
            ..SourceSettings::default()
        };
        let mut runner = MockLintRunner::new();
        runner.expect_check().returning(|invocation| {
            Err(LintError::Rejected {
                source: ProcessError::Failed {
                    command: invocation.to_string(),
                    status: exit_status(1),
                },
            })
        });

        let err = run_gate(&runner, &sources, &minimal_settings()).expect_err("gate fails");

        assert!(err.to_string().contains("cpplint --linelength=80"));
    }
}
