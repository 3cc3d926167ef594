//! Build-dependency installation through the system package manager.

use crate::error::Result;
use harness_common::{CommandExecutor, run_checked};
use log::info;
use serde::Deserialize;

/// Packages needed to build the application from source.
pub const DEFAULT_BUILD_PACKAGES: &[&str] = &[
    "build-essential",
    "cmake",
    "libssl-dev",
    "libboost-all-dev",
    "libavcodec-dev",
    "libavformat-dev",
    "libavutil-dev",
    "libavfilter-dev",
    "libavdevice-dev",
    "libswresample-dev",
    "libswscale-dev",
    "fluid",
    "libfltk1.3-dev",
    "libgl-dev",
    "libjsoncpp-dev",
    "libopencv-dev",
    "lcov",
    "python3-pip",
];

/// The `[deps]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependencySettings {
    /// Package manager program.
    pub manager: String,
    /// Whether to run the manager through `sudo`.
    pub use_sudo: bool,
    /// Packages to install.
    pub packages: Vec<String>,
}

impl Default for DependencySettings {
    fn default() -> Self {
        Self {
            manager: "apt-get".to_owned(),
            use_sudo: true,
            packages: DEFAULT_BUILD_PACKAGES.iter().map(|&p| p.to_owned()).collect(),
        }
    }
}

impl DependencySettings {
    fn command(&self, args: &[&str]) -> (String, Vec<String>) {
        let mut full: Vec<String> = args.iter().map(|&arg| arg.to_owned()).collect();
        if self.use_sudo {
            full.insert(0, self.manager.clone());
            ("sudo".to_owned(), full)
        } else {
            (self.manager.clone(), full)
        }
    }
}

/// Refreshes the package index, then installs the configured packages.
///
/// The install step is skipped when no packages are configured.
///
/// # Errors
///
/// Returns [`crate::PackagerError::Process`] if either command fails.
pub fn install_build_dependencies(
    executor: &dyn CommandExecutor,
    settings: &DependencySettings,
) -> Result<()> {
    let (program, args) = settings.command(&["update", "-qq"]);
    run_checked(executor, &program, &args)?;

    if settings.packages.is_empty() {
        info!("no build dependencies configured");
        return Ok(());
    }

    info!("installing {} build dependencies", settings.packages.len());
    let (program, mut args) = settings.command(&["install", "-y"]);
    args.extend(settings.packages.iter().cloned());
    run_checked(executor, &program, &args)?;
    Ok(())
}
