//! Building the project's test target.

use crate::error::{HarnessError, Result};
use camino::Utf8PathBuf;
use harness_common::{CommandExecutor, run_checked};
use log::info;
use serde::Deserialize;

/// The `[tests]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestSettings {
    /// Build-system driver program.
    pub program: String,
    /// Configured build directory.
    pub build_dir: Utf8PathBuf,
    /// Target to build; the driver's default target when unset.
    pub target: Option<String>,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            program: "cmake".to_owned(),
            build_dir: Utf8PathBuf::from("."),
            target: None,
        }
    }
}

impl TestSettings {
    /// Returns the arguments passed to the driver.
    ///
    /// # Examples
    ///
    /// ```
    /// use release_harness::TestSettings;
    ///
    /// let settings = TestSettings {
    ///     target: Some("vcutter_test".to_owned()),
    ///     ..TestSettings::default()
    /// };
    /// assert_eq!(settings.args(), ["--build", ".", "--target", "vcutter_test"]);
    /// ```
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["--build".to_owned(), self.build_dir.to_string()];
        if let Some(target) = &self.target {
            args.push("--target".to_owned());
            args.push(target.clone());
        }
        args
    }
}

/// Builds a target with the project's build system.
#[cfg_attr(test, mockall::automock)]
pub trait BuildDriver {
    /// Builds the configured target, blocking until the driver exits.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Build`] if the driver cannot be launched or
    /// exits unsuccessfully.
    fn build_target(&self, settings: &TestSettings) -> Result<()>;
}

/// [`BuildDriver`] that shells out to `cmake --build`.
pub struct CmakeDriver<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> CmakeDriver<'a> {
    /// Creates a driver that runs through `executor`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }
}

impl BuildDriver for CmakeDriver<'_> {
    fn build_target(&self, settings: &TestSettings) -> Result<()> {
        info!(
            "building {} in {}",
            settings.target.as_deref().unwrap_or("the default target"),
            settings.build_dir
        );
        run_checked(self.executor, &settings.program, &settings.args())
            .map_err(|source| HarnessError::Build { source })
    }
}
