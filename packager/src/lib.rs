//! Assembly of Debian binary packages.
//!
//! A packaging run resolves configuration into a [`PackageParams`], lets the
//! [`Stager`] build the staging tree under a [`StagingLayout`], and hands the
//! resulting [`StagedTree`] to an [`Archiver`]. The [`deps`] module installs
//! the toolchain packages the application needs to build in the first place.

pub mod archiver;
pub mod copyright;
pub mod deps;
pub mod descriptor;
pub mod error;
pub mod hooks;
pub mod layout;
pub mod pipeline;
pub mod stager;

pub use archiver::{Archiver, DpkgDeb};
pub use copyright::CopyrightSettings;
pub use deps::{DependencySettings, install_build_dependencies};
pub use descriptor::{PackageDescriptor, PackageSettings};
pub use error::{PackagerError, Result};
pub use hooks::{HookKind, HookSettings, LifecycleHook};
pub use layout::{StagingLayout, StagingSettings};
pub use pipeline::{PackageParams, build_package};
pub use stager::{StagedTree, Stager};
