//! Mode selection and dispatch.
//!
//! Requested modes always run in the fixed order `deps`, `lint`, `tests`,
//! `package`. A failing mode does not stop the ones after it; the run fails
//! if any mode failed.

use crate::build::BuildDriver;
use crate::config::HarnessConfig;
use crate::error::Result;
use harness_common::CommandExecutor;
use harness_lint::{LintRunner, run_gate};
use harness_packager::{
    Archiver, PackageParams, Stager, StagingLayout, build_package, install_build_dependencies,
};
use log::{debug, info};
use std::fmt;

/// A unit of work the harness can be asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    /// Install build dependencies.
    Deps,
    /// Run the style checker.
    Lint,
    /// Build the test target.
    Tests,
    /// Stage and archive the package.
    Package,
}

impl Mode {
    /// Every mode, in execution order.
    pub const ALL: [Self; 4] = [Self::Deps, Self::Lint, Self::Tests, Self::Package];

    /// Returns the command-line keyword for this mode.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Deps => "deps",
            Self::Lint => "lint",
            Self::Tests => "tests",
            Self::Package => "package",
        }
    }

    /// Looks up a mode by its exact keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.keyword() == keyword)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Resolves keywords into the modes to run, in execution order.
///
/// Unknown keywords are ignored and repeated ones count once.
///
/// # Examples
///
/// ```
/// use release_harness::{Mode, select_modes};
///
/// let modes = select_modes(["package", "lint", "deploy", "lint"]);
/// assert_eq!(modes, [Mode::Lint, Mode::Package]);
/// ```
pub fn select_modes<I, S>(keywords: I) -> Vec<Mode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut requested = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_ref();
        match Mode::from_keyword(keyword) {
            Some(mode) => requested.push(mode),
            None => debug!("ignoring unknown mode `{keyword}`"),
        }
    }
    requested.sort_unstable();
    requested.dedup();
    requested
}

/// The external collaborators the modes drive.
#[derive(Clone, Copy)]
pub struct Tools<'a> {
    /// Runs `apt-get` and `chmod`.
    pub executor: &'a dyn CommandExecutor,
    /// Runs the style checker.
    pub linter: &'a dyn LintRunner,
    /// Builds the test target.
    pub builder: &'a dyn BuildDriver,
    /// Archives the staged tree.
    pub archiver: &'a dyn Archiver,
}

/// The result of one mode.
#[derive(Debug)]
pub struct ModeOutcome {
    /// The mode that ran.
    pub mode: Mode,
    /// What it returned.
    pub result: Result<()>,
}

/// The outcomes of every mode in a run, in execution order.
#[derive(Debug, Default)]
pub struct RunSummary {
    outcomes: Vec<ModeOutcome>,
}

impl RunSummary {
    /// Returns every outcome.
    #[must_use]
    pub fn outcomes(&self) -> &[ModeOutcome] {
        &self.outcomes
    }

    /// Returns the outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ModeOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }

    /// Reports whether every mode succeeded.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Returns the process exit code: `0` if every mode succeeded, else `1`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.succeeded())
    }
}

impl FromIterator<ModeOutcome> for RunSummary {
    fn from_iter<I: IntoIterator<Item = ModeOutcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

/// Runs one mode against `config`.
///
/// # Errors
///
/// Returns the mode's failure.
pub fn run_mode(mode: Mode, config: &HarnessConfig, tools: &Tools<'_>) -> Result<()> {
    match mode {
        Mode::Deps => install_build_dependencies(tools.executor, &config.deps)?,
        Mode::Lint => {
            let checked = run_gate(tools.linter, &config.sources, &config.lint)?;
            info!("style check passed for {checked} file(s)");
        }
        Mode::Tests => tools.builder.build_target(&config.tests)?,
        Mode::Package => {
            let params = PackageParams::from_settings(
                &config.package,
                &config.copyright,
                &config.hooks,
                &config.staging,
            )?;
            let layout = StagingLayout::from_settings(&config.staging)?;
            let stager = Stager::new(layout, tools.executor);
            let archive = build_package(&stager, &params, tools.archiver)?;
            info!("package written to {archive}");
        }
    }
    Ok(())
}

/// Runs each of `modes` in turn, continuing past failures.
///
/// Failures are returned in the summary rather than logged; the caller
/// reports them.
pub fn run_modes(modes: &[Mode], config: &HarnessConfig, tools: &Tools<'_>) -> RunSummary {
    modes
        .iter()
        .map(|&mode| {
            info!("running {mode}");
            let result = run_mode(mode, config, tools);
            if result.is_ok() {
                info!("{mode} succeeded");
            }
            ModeOutcome { mode, result }
        })
        .collect()
}
