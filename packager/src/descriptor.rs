//! Package metadata and the `DEBIAN/control` record.

use crate::error::{PackagerError, Result};
use serde::Deserialize;

/// The `[package]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSettings {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Archive section, e.g. `video`.
    pub section: String,
    /// Installation priority.
    pub priority: String,
    /// Target architecture, e.g. `amd64`.
    pub architecture: String,
    /// Maintainer name and address.
    pub maintainer: String,
    /// Project homepage; omitted from the record when empty.
    pub homepage: String,
    /// Runtime dependencies.
    pub depends: Vec<String>,
    /// Synopsis on the first line, extended description on the rest.
    pub description: String,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: String::new(),
            section: "utils".to_owned(),
            priority: "optional".to_owned(),
            architecture: "amd64".to_owned(),
            maintainer: String::new(),
            homepage: String::new(),
            depends: Vec::new(),
            description: String::new(),
        }
    }
}

/// Validated, immutable package metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    name: String,
    version: String,
    section: String,
    priority: String,
    architecture: String,
    maintainer: String,
    homepage: String,
    depends: Vec<String>,
    description: String,
}

impl PackageDescriptor {
    /// Validates `settings` into a descriptor.
    ///
    /// Repeated dependencies are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidDescriptor`] when the name, version,
    /// architecture or description is empty, or when a single-line field
    /// contains a line break.
    pub fn from_settings(settings: &PackageSettings) -> Result<Self> {
        let name = required("name", &settings.name)?;
        let version = required("version", &settings.version)?;
        let architecture = required("architecture", &settings.architecture)?;
        let section = single_line("section", &settings.section)?;
        let priority = single_line("priority", &settings.priority)?;
        let maintainer = single_line("maintainer", &settings.maintainer)?;
        let homepage = single_line("homepage", &settings.homepage)?;

        let description = settings.description.trim();
        if description.is_empty() {
            return Err(PackagerError::InvalidDescriptor {
                reason: "package.description must not be empty".to_owned(),
            });
        }

        let mut depends: Vec<String> = Vec::with_capacity(settings.depends.len());
        for dependency in &settings.depends {
            let dependency = single_line("depends", dependency)?;
            if dependency.is_empty() || depends.contains(&dependency) {
                continue;
            }
            depends.push(dependency);
        }

        Ok(Self {
            name,
            version,
            section,
            priority,
            architecture,
            maintainer,
            homepage,
            depends,
            description: description.to_owned(),
        })
    }

    /// Returns the package name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the package version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the target architecture.
    #[must_use]
    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    /// Returns the deduplicated runtime dependencies, in configured order.
    #[must_use]
    pub fn depends(&self) -> &[String] {
        &self.depends
    }

    /// Renders the `DEBIAN/control` record.
    ///
    /// # Examples
    ///
    /// ```
    /// use harness_packager::{PackageDescriptor, PackageSettings};
    ///
    /// let settings = PackageSettings {
    ///     name: "smart-vcutter".to_owned(),
    ///     version: "1.0.2".to_owned(),
    ///     description: "Generate small video loops from videos".to_owned(),
    ///     ..PackageSettings::default()
    /// };
    /// let control = PackageDescriptor::from_settings(&settings)?.render_control();
    /// assert!(control.starts_with("Package: smart-vcutter\nVersion: 1.0.2\n"));
    /// assert!(control.ends_with("Description: Generate small video loops from videos\n"));
    /// # Ok::<(), harness_packager::PackagerError>(())
    /// ```
    #[must_use]
    pub fn render_control(&self) -> String {
        let mut fields: Vec<(&str, String)> = vec![
            ("Package", self.name.clone()),
            ("Version", self.version.clone()),
            ("Section", self.section.clone()),
            ("Depends", self.depends.join(", ")),
            ("Priority", self.priority.clone()),
            ("Architecture", self.architecture.clone()),
            ("Maintainer", self.maintainer.clone()),
            ("Homepage", self.homepage.clone()),
            ("Provides", self.name.clone()),
            ("Conflicts", self.name.clone()),
            ("Replaces", self.name.clone()),
        ];
        fields.retain(|(_, value)| !value.is_empty());

        let mut record = String::new();
        for (key, value) in fields {
            record.push_str(key);
            record.push_str(": ");
            record.push_str(&value);
            record.push('\n');
        }
        record.push_str("Description: ");
        record.push_str(&self.render_description());
        record.push('\n');
        record
    }

    fn render_description(&self) -> String {
        let mut lines = self.description.lines();
        let synopsis = lines.next().unwrap_or_default().trim().to_owned();
        lines.fold(synopsis, |mut rendered, line| {
            rendered.push('\n');
            if line.trim().is_empty() {
                rendered.push_str(" .");
            } else {
                rendered.push(' ');
                rendered.push_str(line.trim_end());
            }
            rendered
        })
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = single_line(field, value)?;
    if value.is_empty() {
        return Err(PackagerError::InvalidDescriptor {
            reason: format!("package.{field} must not be empty"),
        });
    }
    Ok(value)
}

fn single_line(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.contains(['\n', '\r']) {
        return Err(PackagerError::InvalidDescriptor {
            reason: format!("package.{field} must fit on one line"),
        });
    }
    Ok(trimmed.to_owned())
}
