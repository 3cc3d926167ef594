//! Source discovery and the external style-checker gate.
//!
//! [`sources`] walks the configured roots and yields the files worth
//! checking. [`gate`] hands those files to the external checker and turns its
//! exit status into a pass or a [`LintError`].

pub mod error;
pub mod gate;
pub mod sources;

pub use error::{LintError, Result};
pub use gate::{ExternalLinter, LintInvocation, LintRunner, LintSettings, run_gate};
pub use sources::{MissingRootPolicy, SourceFilter, SourceSettings, Sources, discover};
