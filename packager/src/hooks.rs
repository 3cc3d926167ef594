//! Maintainer lifecycle scripts.
//!
//! `postrm` is always generated and removes the installed binary. The other
//! hooks exist only when the configuration gives them a body.

use crate::error::Result;
use camino::Utf8Path;
use harness_common::{CommandExecutor, run_checked};
use serde::Deserialize;

/// The lifecycle points dpkg runs maintainer scripts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Before the package is unpacked.
    Preinst,
    /// After the package is unpacked.
    Postinst,
    /// Before the package is removed.
    Prerm,
    /// After the package is removed.
    Postrm,
}

impl HookKind {
    /// Returns the script's file name inside `DEBIAN/`.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Preinst => "preinst",
            Self::Postinst => "postinst",
            Self::Prerm => "prerm",
            Self::Postrm => "postrm",
        }
    }
}

/// The `[hooks]` configuration section: extra shell lines per hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HookSettings {
    /// Body of `preinst`.
    pub preinst: Vec<String>,
    /// Body of `postinst`.
    pub postinst: Vec<String>,
    /// Body of `prerm`.
    pub prerm: Vec<String>,
    /// Lines appended to the generated `postrm` after the removal command.
    pub postrm: Vec<String>,
}

/// A generated maintainer script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleHook {
    kind: HookKind,
    lines: Vec<String>,
}

impl LifecycleHook {
    /// The removal hook for a binary installed at `installed_path`.
    #[must_use]
    pub fn removal(installed_path: &Utf8Path, extra: &[String]) -> Self {
        let mut lines = vec![format!("rm -f {}", shell_quote(installed_path.as_str()))];
        lines.extend(extra.iter().cloned());
        Self {
            kind: HookKind::Postrm,
            lines,
        }
    }

    /// A hook with a caller-supplied body.
    #[must_use]
    pub fn custom(kind: HookKind, lines: &[String]) -> Self {
        Self {
            kind,
            lines: lines.to_vec(),
        }
    }

    /// Returns which hook this is.
    #[must_use]
    pub const fn kind(&self) -> HookKind {
        self.kind
    }

    /// Renders the script text.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use harness_packager::LifecycleHook;
    ///
    /// let hook = LifecycleHook::removal(Utf8Path::new("/usr/local/bin/smart-vcutter"), &[]);
    /// assert_eq!(
    ///     hook.render(),
    ///     "#!/bin/sh\nset -e\nrm -f /usr/local/bin/smart-vcutter\n"
    /// );
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        let mut script = String::from("#!/bin/sh\nset -e\n");
        for line in &self.lines {
            script.push_str(line);
            script.push('\n');
        }
        script
    }
}

impl HookSettings {
    /// Lists the hooks to generate for a binary installed at
    /// `installed_path`, `postrm` last.
    #[must_use]
    pub fn hooks_for(&self, installed_path: &Utf8Path) -> Vec<LifecycleHook> {
        let mut hooks: Vec<LifecycleHook> = [
            (HookKind::Preinst, &self.preinst),
            (HookKind::Postinst, &self.postinst),
            (HookKind::Prerm, &self.prerm),
        ]
        .into_iter()
        .filter(|(_, lines)| !lines.is_empty())
        .map(|(kind, lines)| LifecycleHook::custom(kind, lines))
        .collect();
        hooks.push(LifecycleHook::removal(installed_path, &self.postrm));
        hooks
    }
}

/// Marks `path` executable with an external `chmod +x`.
///
/// # Errors
///
/// Returns [`crate::PackagerError::Process`] if `chmod` cannot be launched or
/// exits unsuccessfully.
pub fn mark_executable(executor: &dyn CommandExecutor, path: &Utf8Path) -> Result<()> {
    run_checked(executor, "chmod", &["+x".to_owned(), path.to_string()])?;
    Ok(())
}

fn shell_quote(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+'));
    if plain && !value.is_empty() {
        value.to_owned()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
