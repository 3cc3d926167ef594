//! Shared process plumbing for the release harness crates.
//!
//! Every external tool the harness drives (the style checker, `cmake`,
//! `dpkg-deb`, `apt-get`, `chmod`) is reached through [`CommandExecutor`], so
//! the crates built on top of it can be tested without spawning processes.

pub mod process;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use process::{
    CommandExecutor, ProcessError, SystemCommandExecutor, render_command, run_checked,
};
