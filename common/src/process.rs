//! External command execution.
//!
//! Commands inherit the harness's standard streams so external tools report
//! directly to the user. Only the exit status comes back to the caller.

use std::io;
use std::process::{Command, ExitStatus};
use thiserror::Error;

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs `program` with `args`, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while spawning or waiting for the process.
    /// A non-zero exit is not an error at this level; inspect the status.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use harness_common::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let status = executor.run("dpkg-deb", &["--version".to_owned()])?;
    /// assert!(status.success());
    /// # Ok::<(), std::io::Error>(())
    /// ```
    fn run(&self, program: &str, args: &[String]) -> io::Result<ExitStatus>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ExitStatus> {
        log::debug!("running {}", render_command(program, args));
        Command::new(program).args(args).status()
    }
}

/// Errors raised when an external command cannot complete successfully.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The command could not be started.
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        /// The rendered command line.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The command ran but exited unsuccessfully.
    #[error("`{command}` failed with {status}")]
    Failed {
        /// The rendered command line.
        command: String,
        /// The exit status reported by the process.
        status: ExitStatus,
    },
}

/// Runs a command and treats any non-zero exit as an error.
///
/// # Errors
///
/// Returns [`ProcessError::Spawn`] if the command cannot be launched and
/// [`ProcessError::Failed`] if it exits unsuccessfully.
pub fn run_checked(
    executor: &dyn CommandExecutor,
    program: &str,
    args: &[String],
) -> Result<(), ProcessError> {
    let command = render_command(program, args);
    let status = executor
        .run(program, args)
        .map_err(|source| ProcessError::Spawn {
            command: command.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(ProcessError::Failed { command, status })
    }
}

/// Renders a command line for log and error messages.
///
/// # Examples
///
/// ```
/// use harness_common::render_command;
///
/// let line = render_command("dpkg-deb", &["--build".to_owned(), "stage".to_owned()]);
/// assert_eq!(line, "dpkg-deb --build stage");
/// ```
#[must_use]
pub fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ExpectedCall, StubExecutor, exit_status};
    use rstest::rstest;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|&v| v.to_owned()).collect()
    }

    #[test]
    fn run_checked_accepts_zero_exit() {
        let executor = StubExecutor::new(vec![ExpectedCall::exits(
            "chmod",
            &["+x", "postrm"],
            0,
        )]);

        run_checked(&executor, "chmod", &args(&["+x", "postrm"])).expect("zero exit is success");
        executor.assert_finished();
    }

    #[rstest]
    #[case::generic_failure(1)]
    #[case::usage_error(2)]
    fn run_checked_reports_non_zero_exit(#[case] code: i32) {
        let executor = StubExecutor::new(vec![ExpectedCall::exits("dpkg-deb", &["--build"], code)]);

        let err = run_checked(&executor, "dpkg-deb", &args(&["--build"]))
            .expect_err("non-zero exit must fail");

        let ProcessError::Failed { command, status } = &err else {
            panic!("expected a failed exit, got {err:?}");
        };
        assert_eq!(status.code(), Some(code));
        assert_eq!(command, "dpkg-deb --build");
    }

    #[test]
    fn run_checked_reports_spawn_failure() {
        let executor = StubExecutor::new(vec![ExpectedCall {
            program: "cmake",
            args: Vec::new(),
            result: Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
        }]);

        let err = run_checked(&executor, "cmake", &[]).expect_err("spawn failure must fail");

        assert!(matches!(err, ProcessError::Spawn { .. }));
        assert!(err.to_string().contains("failed to launch `cmake`"));
    }

    #[test]
    fn failed_error_mentions_status() {
        let err = ProcessError::Failed {
            command: "apt-get install -y cmake".to_owned(),
            status: exit_status(100),
        };
        let msg = err.to_string();
        assert!(msg.contains("apt-get install -y cmake"));
        assert!(msg.contains("100"));
    }

    #[rstest]
    #[case::no_args("cmake", &[], "cmake")]
    #[case::with_args("cmake", &["--build", "."], "cmake --build .")]
    fn render_command_joins_with_spaces(
        #[case] program: &str,
        #[case] values: &[&str],
        #[case] expected: &str,
    ) {
        assert_eq!(render_command(program, &args(values)), expected);
    }
}
