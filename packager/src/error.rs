//! Error types for staging and archiving packages.
//!
//! Filesystem failures carry the path involved so the message points at the
//! file to fix. Failures of external tools wrap the [`ProcessError`] that
//! describes the command line and exit status.

use camino::Utf8PathBuf;
use harness_common::ProcessError;
use std::io;
use thiserror::Error;

/// Errors that can occur while staging or building a package.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The package metadata is incomplete or malformed.
    #[error("invalid package metadata: {reason}")]
    InvalidDescriptor {
        /// Description of the problem.
        reason: String,
    },

    /// The staging settings cannot describe a valid tree.
    #[error("invalid staging settings: {reason}")]
    InvalidStaging {
        /// Description of the problem.
        reason: String,
    },

    /// A staging directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A generated file could not be written.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        /// The file that could not be written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The license text could not be read.
    #[error("cannot read license file {path}: {source}")]
    LicenseUnreadable {
        /// The license file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The built binary is not where the configuration says it is.
    #[error("built artifact {path} not found; build the application first")]
    MissingArtifact {
        /// The expected artifact path.
        path: Utf8PathBuf,
    },

    /// The built binary could not be copied into the staging tree.
    #[error("failed to copy {from} to {to}: {source}")]
    CopyFailed {
        /// The source artifact.
        from: Utf8PathBuf,
        /// The destination inside the staging tree.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An external tool failed.
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, PackagerError>;
