//! Harness configuration loaded from `release.toml`.
//!
//! Every section is optional and falls back to its defaults, which reproduce
//! the project's historical release scripts. Unknown keys are rejected so a
//! typo cannot silently leave a setting at its default.

use crate::build::TestSettings;
use crate::error::{HarnessError, Result};
use camino::Utf8Path;
use harness_lint::{LintSettings, SourceSettings};
use harness_packager::{
    CopyrightSettings, DependencySettings, HookSettings, PackageSettings, StagingSettings,
};
use log::debug;
use serde::Deserialize;
use std::{fs, io};

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "release.toml";

/// All harness settings.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Source discovery for the lint gate.
    pub sources: SourceSettings,
    /// The external style checker.
    pub lint: LintSettings,
    /// The test build.
    pub tests: TestSettings,
    /// Package metadata.
    pub package: PackageSettings,
    /// The copyright notice.
    pub copyright: CopyrightSettings,
    /// Extra lifecycle hooks.
    pub hooks: HookSettings,
    /// The staging tree and archive output.
    pub staging: StagingSettings,
    /// Build dependency installation.
    pub deps: DependencySettings,
}

impl HarnessConfig {
    /// Parses configuration text; `origin` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ConfigParse`] for malformed TOML or unknown
    /// keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use release_harness::HarnessConfig;
    ///
    /// let config = HarnessConfig::from_toml(
    ///     "[package]\nname = \"smart-vcutter\"\n",
    ///     Utf8Path::new("release.toml"),
    /// )?;
    /// assert_eq!(config.package.name, "smart-vcutter");
    /// assert_eq!(config.package.architecture, "amd64");
    /// # Ok::<(), release_harness::HarnessError>(())
    /// ```
    pub fn from_toml(text: &str, origin: &Utf8Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| HarnessError::ConfigParse {
            path: origin.to_owned(),
            source,
        })
    }

    /// Loads configuration from `explicit`, or from [`DEFAULT_CONFIG_FILE`].
    ///
    /// A missing default file yields the built-in defaults. A missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ConfigRead`] if the file cannot be read and
    /// [`HarnessError::ConfigParse`] if it cannot be parsed.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<Self> {
        Self::load_or_default(explicit, Utf8Path::new(DEFAULT_CONFIG_FILE))
    }

    fn load_or_default(explicit: Option<&Utf8Path>, fallback: &Utf8Path) -> Result<Self> {
        let path = explicit.unwrap_or(fallback);
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!("loaded configuration from {path}");
                Self::from_toml(&text, path)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
                debug!("{path} not found; using built-in defaults");
                Ok(Self::default())
            }
            Err(source) => Err(HarnessError::ConfigRead {
                path: path.to_owned(),
                source,
            }),
        }
    }
}
