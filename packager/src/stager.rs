//! Staging tree assembly.
//!
//! The stager runs a fixed sequence of steps, each finishing before the next
//! begins: create the directories, write `control`, write `copyright`, write
//! and mark the lifecycle hooks, then copy the binary. Re-running over an
//! existing tree overwrites every generated file.

use crate::error::{PackagerError, Result};
use crate::hooks::mark_executable;
use crate::layout::StagingLayout;
use crate::pipeline::PackageParams;
use camino::{Utf8Path, Utf8PathBuf};
use harness_common::CommandExecutor;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};

/// A fully populated staging tree, ready to archive.
///
/// Only [`Stager::stage`] produces one, so holding a `StagedTree` means every
/// staging step has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTree {
    root: Utf8PathBuf,
    control_files: Vec<Utf8PathBuf>,
    binary: Utf8PathBuf,
}

impl StagedTree {
    /// Returns the staging root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns every file written into `DEBIAN/`, in write order.
    #[must_use]
    pub fn control_files(&self) -> &[Utf8PathBuf] {
        &self.control_files
    }

    /// Returns the staged copy of the binary.
    #[must_use]
    pub fn binary(&self) -> &Utf8Path {
        &self.binary
    }
}

/// Builds a staging tree under a [`StagingLayout`].
pub struct Stager<'a> {
    layout: StagingLayout,
    executor: &'a dyn CommandExecutor,
}

impl<'a> Stager<'a> {
    /// Creates a stager that marks hooks executable through `executor`.
    #[must_use]
    pub fn new(layout: StagingLayout, executor: &'a dyn CommandExecutor) -> Self {
        Self { layout, executor }
    }

    /// Creates the staging root, `DEBIAN/` and the install directory.
    ///
    /// Directories that already exist are left alone. Temporary files left
    /// in `DEBIAN/` by an interrupted run are removed.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::CreateDir`] if a directory cannot be created
    /// and [`PackagerError::WriteFailed`] if a leftover cannot be removed.
    pub fn prepare(&self) -> Result<()> {
        for dir in [
            self.layout.root().to_owned(),
            self.layout.control_dir(),
            self.layout.install_dir(),
        ] {
            fs::create_dir_all(&dir).map_err(|source| PackagerError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        self.remove_stale_temp_files()
    }

    fn remove_stale_temp_files(&self) -> Result<()> {
        let control_dir = self.layout.control_dir();
        let entries = fs::read_dir(&control_dir).map_err(|source| PackagerError::CreateDir {
            path: control_dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| PackagerError::CreateDir {
                path: control_dir.clone(),
                source,
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str().filter(|name| name.starts_with(TEMP_PREFIX)) else {
                continue;
            };
            let path = control_dir.join(name);
            fs::remove_file(&path)
                .map_err(|source| PackagerError::WriteFailed { path: path.clone(), source })?;
            debug!("removed leftover {path}");
        }
        Ok(())
    }

    /// Runs every staging step for `params`.
    ///
    /// # Errors
    ///
    /// Returns the first step failure. Files written by earlier steps are
    /// left in place.
    pub fn stage(&self, params: &PackageParams) -> Result<StagedTree> {
        info!(
            "staging {} {} ({}) in {}",
            params.descriptor.name(),
            params.descriptor.version(),
            params.descriptor.architecture(),
            self.layout.root()
        );
        self.prepare()?;

        let mut control_files = vec![
            self.write_control(params)?,
            self.write_copyright(params)?,
        ];
        control_files.extend(self.write_hooks(params)?);
        let binary = self.copy_binary(&params.binary, &params.binary_name)?;

        Ok(StagedTree {
            root: self.layout.root().to_owned(),
            control_files,
            binary,
        })
    }

    fn write_control(&self, params: &PackageParams) -> Result<Utf8PathBuf> {
        let path = self.layout.control_file("control");
        write_atomically(&path, params.descriptor.render_control().as_bytes())?;
        Ok(path)
    }

    fn write_copyright(&self, params: &PackageParams) -> Result<Utf8PathBuf> {
        let license = params.copyright.load_license()?;
        let path = self.layout.control_file("copyright");
        write_atomically(&path, &params.copyright.render_notice(&license))?;
        Ok(path)
    }

    fn write_hooks(&self, params: &PackageParams) -> Result<Vec<Utf8PathBuf>> {
        let installed = self.layout.installed_path(&params.binary_name);
        params
            .hooks
            .hooks_for(&installed)
            .into_iter()
            .map(|hook| {
                let path = self.layout.control_file(hook.kind().file_name());
                write_atomically(&path, hook.render().as_bytes())?;
                mark_executable(self.executor, &path)?;
                Ok(path)
            })
            .collect()
    }

    fn copy_binary(&self, binary: &Utf8Path, binary_name: &str) -> Result<Utf8PathBuf> {
        if !binary.is_file() {
            return Err(PackagerError::MissingArtifact {
                path: binary.to_owned(),
            });
        }
        let destination = self.layout.staged_binary(binary_name);
        let copy_failed = |source: io::Error| PackagerError::CopyFailed {
            from: binary.to_owned(),
            to: destination.clone(),
            source,
        };
        // A read-only copy from an earlier run cannot be opened for writing.
        match fs::remove_file(&destination) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(copy_failed(err)),
        }
        fs::copy(binary, &destination).map_err(copy_failed)?;
        debug!("copied {binary} to {destination}");
        Ok(destination)
    }
}

/// Prefix of the temporary files [`write_atomically`] creates.
const TEMP_PREFIX: &str = ".harness-";

/// Writes `contents` to `path` through a sibling temporary file, so readers
/// see either the previous file or the complete new one.
fn write_atomically(path: &Utf8Path, contents: &[u8]) -> Result<()> {
    let write_failed = |source: io::Error| PackagerError::WriteFailed {
        path: path.to_owned(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Utf8Path::new("."));

    let mut file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(write_failed)?;
    file.write_all(contents).map_err(write_failed)?;
    file.as_file().sync_all().map_err(write_failed)?;
    set_control_mode(file.path()).map_err(write_failed)?;
    file.persist(path).map_err(|err| write_failed(err.error))?;

    debug!("wrote {path}");
    Ok(())
}

#[cfg(unix)]
fn set_control_mode(path: &std::path::Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_control_mode(_path: &std::path::Path) -> io::Result<()> {
    Ok(())
}
