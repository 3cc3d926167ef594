//! The `DEBIAN/copyright` notice.
//!
//! The notice is a machine-readable header followed by the license text,
//! copied byte for byte.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;

/// Format URI for machine-readable copyright files.
pub const COPYRIGHT_FORMAT: &str =
    "https://www.debian.org/doc/packaging-manuals/copyright-format/1.0/";

/// The `[copyright]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyrightSettings {
    /// Value of the `Format` field.
    pub format: String,
    /// Value of the `Upstream-Name` field.
    pub upstream_name: String,
    /// Value of the `Upstream-Contact` field.
    pub upstream_contact: String,
    /// Value of the `Source` field.
    pub source: String,
    /// Value of the `Files` field.
    pub files: String,
    /// Value of the `Copyright` field.
    pub copyright: String,
    /// Value of the `License` field, e.g. `GPL-3`.
    pub license: String,
    /// File whose contents follow the header.
    pub license_file: Utf8PathBuf,
}

impl Default for CopyrightSettings {
    fn default() -> Self {
        Self {
            format: COPYRIGHT_FORMAT.to_owned(),
            upstream_name: String::new(),
            upstream_contact: String::new(),
            source: String::new(),
            files: "*".to_owned(),
            copyright: String::new(),
            license: String::new(),
            license_file: Utf8PathBuf::from("LICENSE"),
        }
    }
}

impl CopyrightSettings {
    /// Renders the header, one newline-terminated line per non-empty field.
    #[must_use]
    pub fn render_header(&self) -> String {
        [
            ("Format", &self.format),
            ("Upstream-Name", &self.upstream_name),
            ("Upstream-Contact", &self.upstream_contact),
            ("Source", &self.source),
            ("Files", &self.files),
            ("Copyright", &self.copyright),
            ("License", &self.license),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| format!("{key}: {}\n", value.trim()))
        .collect()
    }

    /// Renders the complete notice: header, then `license` verbatim.
    #[must_use]
    pub fn render_notice(&self, license: &[u8]) -> Vec<u8> {
        let mut notice = self.render_header().into_bytes();
        notice.extend_from_slice(license);
        notice
    }

    /// Reads the configured license file.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::LicenseUnreadable`] if the file cannot be read.
    pub fn load_license(&self) -> Result<Vec<u8>> {
        read_license(&self.license_file)
    }
}

fn read_license(path: &Utf8Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| PackagerError::LicenseUnreadable {
        path: path.to_owned(),
        source,
    })
}
