//! Release harness for a native C++ application.
//!
//! The `release-harness` binary runs any combination of four modes over a
//! project checkout: `deps` installs build dependencies, `lint` gates the
//! sources on an external style checker, `tests` builds the test target, and
//! `package` stages and archives a `.deb`. Settings come from a single
//! `release.toml`; see [`config::HarnessConfig`].

pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod modes;

pub use build::{BuildDriver, CmakeDriver, TestSettings};
pub use cli::Cli;
pub use config::{DEFAULT_CONFIG_FILE, HarnessConfig};
pub use error::{HarnessError, Result};
pub use modes::{Mode, ModeOutcome, RunSummary, Tools, run_modes, select_modes};
