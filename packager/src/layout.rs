//! Paths inside the staging tree.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Directory holding the control files, relative to the staging root.
pub const CONTROL_DIR: &str = "DEBIAN";

/// Default install location of the packaged binary.
pub const DEFAULT_INSTALL_PREFIX: &str = "usr/local/bin";

/// The `[staging]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StagingSettings {
    /// Root of the staging tree.
    pub root: Utf8PathBuf,
    /// The built binary to package.
    pub binary: Utf8PathBuf,
    /// Installed file name; defaults to the file name of `binary`.
    pub binary_name: Option<String>,
    /// Install directory, mirrored below the staging root.
    pub install_prefix: Utf8PathBuf,
    /// Archive path; `dpkg-deb` picks `<root>.deb` when unset.
    pub output: Option<Utf8PathBuf>,
}

impl Default for StagingSettings {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("build/stage"),
            binary: Utf8PathBuf::new(),
            binary_name: None,
            install_prefix: Utf8PathBuf::from(DEFAULT_INSTALL_PREFIX),
            output: None,
        }
    }
}

impl StagingSettings {
    /// Resolves the installed file name of the binary.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidStaging`] when no name is configured and
    /// `binary` has no file name, or when the name contains a separator.
    pub fn resolved_binary_name(&self) -> Result<String> {
        let name = match &self.binary_name {
            Some(name) => name.trim(),
            None => self.binary.file_name().unwrap_or_default(),
        };
        if name.is_empty() {
            return Err(PackagerError::InvalidStaging {
                reason: "set staging.binary to the built executable".to_owned(),
            });
        }
        if name.contains(['/', '\\']) {
            return Err(PackagerError::InvalidStaging {
                reason: format!("staging.binary_name `{name}` must be a plain file name"),
            });
        }
        Ok(name.to_owned())
    }
}

/// Resolves the fixed structure of a staging tree below a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingLayout {
    root: Utf8PathBuf,
    install_prefix: Utf8PathBuf,
}

impl StagingLayout {
    /// Creates a layout rooted at `root` that installs into `install_prefix`.
    ///
    /// A leading `/` on the prefix is ignored, so `/usr/local/bin` and
    /// `usr/local/bin` describe the same tree.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidStaging`] if the prefix is empty or
    /// climbs out of the root with `..`.
    ///
    /// # Examples
    ///
    /// ```
    /// use harness_packager::StagingLayout;
    ///
    /// let layout = StagingLayout::new("build/stage".into(), "/usr/local/bin".into())?;
    /// assert_eq!(layout.control_dir(), "build/stage/DEBIAN");
    /// assert_eq!(layout.install_dir(), "build/stage/usr/local/bin");
    /// assert_eq!(layout.installed_path("app"), "/usr/local/bin/app");
    /// # Ok::<(), harness_packager::PackagerError>(())
    /// ```
    pub fn new(root: Utf8PathBuf, install_prefix: Utf8PathBuf) -> Result<Self> {
        let relative = Utf8PathBuf::from(install_prefix.as_str().trim_start_matches('/'));
        if relative.as_str().is_empty() {
            return Err(PackagerError::InvalidStaging {
                reason: "staging.install_prefix must name a directory".to_owned(),
            });
        }
        if relative
            .components()
            .any(|component| matches!(component, camino::Utf8Component::ParentDir))
        {
            return Err(PackagerError::InvalidStaging {
                reason: format!("staging.install_prefix `{install_prefix}` must not contain `..`"),
            });
        }
        Ok(Self {
            root,
            install_prefix: relative,
        })
    }

    /// Builds the layout described by the `[staging]` section.
    ///
    /// # Errors
    ///
    /// See [`StagingLayout::new`].
    pub fn from_settings(settings: &StagingSettings) -> Result<Self> {
        Self::new(settings.root.clone(), settings.install_prefix.clone())
    }

    /// Returns the staging root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the `DEBIAN/` directory.
    #[must_use]
    pub fn control_dir(&self) -> Utf8PathBuf {
        self.root.join(CONTROL_DIR)
    }

    /// Returns the path of a file inside `DEBIAN/`.
    #[must_use]
    pub fn control_file(&self, name: &str) -> Utf8PathBuf {
        self.control_dir().join(name)
    }

    /// Returns the mirrored install directory inside the staging tree.
    #[must_use]
    pub fn install_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.install_prefix)
    }

    /// Returns where the binary is placed inside the staging tree.
    #[must_use]
    pub fn staged_binary(&self, binary_name: &str) -> Utf8PathBuf {
        self.install_dir().join(binary_name)
    }

    /// Returns the absolute path the binary has once installed.
    #[must_use]
    pub fn installed_path(&self, binary_name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from("/")
            .join(&self.install_prefix)
            .join(binary_name)
    }
}
