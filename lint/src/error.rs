//! Error types for source discovery and the lint gate.

use camino::Utf8PathBuf;
use harness_common::ProcessError;
use thiserror::Error;

/// Errors raised while discovering sources or running the checker.
#[derive(Debug, Error)]
pub enum LintError {
    /// A configured source root does not exist and the policy forbids
    /// skipping it.
    #[error("source root {path} does not exist")]
    MissingSourceRoot {
        /// The missing root.
        path: Utf8PathBuf,
    },

    /// An exclusion glob could not be parsed.
    #[error("invalid exclusion pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Description of the parse error.
        reason: String,
    },

    /// The checker command is empty.
    #[error("no lint command configured; set `lint.command`")]
    MissingCommand,

    /// The checker process could not be started.
    #[error("failed to launch the style checker: {source}")]
    Launch {
        /// The underlying process error.
        #[source]
        source: ProcessError,
    },

    /// The checker ran and reported style violations or crashed.
    #[error("style check rejected the sources: {source}")]
    Rejected {
        /// The underlying process error.
        #[source]
        source: ProcessError,
    },
}

impl From<ProcessError> for LintError {
    fn from(source: ProcessError) -> Self {
        match source {
            ProcessError::Spawn { .. } => Self::Launch { source },
            ProcessError::Failed { .. } => Self::Rejected { source },
        }
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, LintError>;
