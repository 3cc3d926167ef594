//! Error types for the release harness binary.
//!
//! Each mode surfaces its crate's error unchanged; the variants here add the
//! configuration and build failures that only the binary can hit.

use camino::Utf8PathBuf;
use harness_common::ProcessError;
use harness_lint::LintError;
use harness_packager::PackagerError;
use std::io;
use thiserror::Error;

/// Errors that can occur while running the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The configuration file exists but could not be read, or an explicitly
    /// requested file is missing.
    #[error("cannot read configuration {path}: {source}")]
    ConfigRead {
        /// The configuration path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("invalid configuration {path}: {source}")]
    ConfigParse {
        /// The configuration path.
        path: Utf8PathBuf,
        /// The parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The lint mode failed.
    #[error(transparent)]
    Lint(#[from] LintError),

    /// The package or deps mode failed.
    #[error(transparent)]
    Package(#[from] PackagerError),

    /// The test build failed.
    #[error("test build failed: {source}")]
    Build {
        /// The underlying process error.
        #[source]
        source: ProcessError,
    },
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, HarnessError>;
