//! Source file discovery.
//!
//! Walks one or more roots and lazily yields the files the style checker
//! should see: a whitelisted extension, and a name that no exclusion rule
//! matches. Directories named in the skip list are never descended.

use crate::error::{LintError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use glob::Pattern;
use log::{debug, warn};
use serde::Deserialize;
use walkdir::{DirEntry, WalkDir};

/// What to do when a configured root does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingRootPolicy {
    /// Warn and yield nothing for that root.
    #[default]
    Skip,
    /// Reject the whole enumeration before any path is yielded.
    Fail,
}

/// The `[sources]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceSettings {
    /// Directories to walk.
    pub roots: Vec<Utf8PathBuf>,
    /// Recognised extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// File names containing any of these (case-insensitively) are excluded.
    pub exclude_name_containing: Vec<String>,
    /// File names matching any of these globs are excluded.
    pub exclude_globs: Vec<String>,
    /// Directory names that are not descended below a root.
    pub skip_dirs: Vec<String>,
    /// Behaviour for roots that do not exist.
    pub missing_root: MissingRootPolicy,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            roots: vec![Utf8PathBuf::from("src")],
            extensions: vec!["h".to_owned(), "cpp".to_owned()],
            exclude_name_containing: vec!["cmake".to_owned()],
            exclude_globs: Vec::new(),
            skip_dirs: Vec::new(),
            missing_root: MissingRootPolicy::Skip,
        }
    }
}

impl SourceSettings {
    /// Starts enumerating the configured roots.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::InvalidPattern`] for a malformed exclusion glob
    /// and [`LintError::MissingSourceRoot`] when a root is absent under
    /// [`MissingRootPolicy::Fail`].
    pub fn discover(&self) -> Result<Sources> {
        let filter = SourceFilter::from_settings(self)?;
        discover(&self.roots, filter, self.missing_root)
    }
}

/// Decides which files and directories take part in enumeration.
#[derive(Debug, Clone, Default)]
pub struct SourceFilter {
    extensions: Vec<String>,
    name_fragments: Vec<String>,
    name_patterns: Vec<Pattern>,
    skip_dirs: Vec<String>,
}

impl SourceFilter {
    /// Creates a filter accepting files with any of `extensions`.
    ///
    /// Extensions are compared exactly, so `h` does not admit `hpp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use harness_lint::SourceFilter;
    ///
    /// let filter = SourceFilter::new(["h", "cpp"]).exclude_containing("cmake");
    /// assert!(filter.accepts(Utf8Path::new("src/player.cpp")));
    /// assert!(!filter.accepts(Utf8Path::new("src/player.hpp")));
    /// assert!(!filter.accepts(Utf8Path::new("src/CMakeCXXCompilerId.cpp")));
    /// ```
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Excludes files whose name contains `fragment`, ignoring case.
    #[must_use]
    pub fn exclude_containing(mut self, fragment: &str) -> Self {
        self.name_fragments.push(fragment.to_lowercase());
        self
    }

    /// Excludes files whose name matches the glob `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::InvalidPattern`] if `pattern` is not a valid glob.
    pub fn exclude_matching(mut self, pattern: &str) -> Result<Self> {
        let compiled = Pattern::new(pattern).map_err(|err| LintError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: err.to_string(),
        })?;
        self.name_patterns.push(compiled);
        Ok(self)
    }

    /// Stops the walk from descending into directories called `name`.
    #[must_use]
    pub fn skip_dir(mut self, name: &str) -> Self {
        self.skip_dirs.push(name.to_owned());
        self
    }

    /// Builds a filter from the `[sources]` section.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::InvalidPattern`] for a malformed exclusion glob.
    pub fn from_settings(settings: &SourceSettings) -> Result<Self> {
        let with_fragments = settings
            .exclude_name_containing
            .iter()
            .fold(Self::new(settings.extensions.iter().cloned()), |filter, fragment| {
                filter.exclude_containing(fragment)
            });
        let with_patterns = settings
            .exclude_globs
            .iter()
            .try_fold(with_fragments, |filter, pattern| {
                filter.exclude_matching(pattern)
            })?;
        Ok(settings
            .skip_dirs
            .iter()
            .fold(with_patterns, |filter, dir| filter.skip_dir(dir)))
    }

    /// Reports whether `path` names a source file the checker should see.
    ///
    /// Only the final path component is inspected.
    #[must_use]
    pub fn accepts(&self, path: &Utf8Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let recognised = path
            .extension()
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext));
        if !recognised {
            return false;
        }

        let lowered = name.to_lowercase();
        if self
            .name_fragments
            .iter()
            .any(|fragment| lowered.contains(fragment.as_str()))
        {
            return false;
        }

        !self.name_patterns.iter().any(|pattern| pattern.matches(name))
    }

    fn skips_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|skipped| skipped == name)
    }
}

/// Lazily enumerates source files below a set of roots.
///
/// The sequence is finite and not restartable. Entries that cannot be read
/// and paths that are not valid UTF-8 are skipped with a warning.
pub struct Sources {
    pending: std::vec::IntoIter<Utf8PathBuf>,
    current: Option<walkdir::IntoIter>,
    filter: SourceFilter,
}

impl std::fmt::Debug for Sources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sources")
            .field("pending", &self.pending.as_slice())
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl Iterator for Sources {
    type Item = Utf8PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(walker) = self.current.as_mut() else {
                let root = self.pending.next()?;
                debug!("walking source root {root}");
                self.current = Some(WalkDir::new(root).sort_by_file_name().into_iter());
                continue;
            };

            match walker.next() {
                None => self.current = None,
                Some(Err(err)) => warn!("skipping unreadable source entry: {err}"),
                Some(Ok(entry)) => {
                    if let Some(path) = admit(&self.filter, walker, entry) {
                        return Some(path);
                    }
                }
            }
        }
    }
}

fn admit(
    filter: &SourceFilter,
    walker: &mut walkdir::IntoIter,
    entry: DirEntry,
) -> Option<Utf8PathBuf> {
    if entry.file_type().is_dir() {
        let skipped = entry.depth() > 0
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| filter.skips_dir(name));
        if skipped {
            debug!("not descending into {}", entry.path().display());
            walker.skip_current_dir();
        }
        return None;
    }

    match Utf8PathBuf::from_path_buf(entry.into_path()) {
        Ok(path) => filter.accepts(&path).then_some(path),
        Err(path) => {
            warn!("skipping non UTF-8 path {}", path.display());
            None
        }
    }
}

/// Starts enumerating `roots` through `filter`.
///
/// Under [`MissingRootPolicy::Fail`] every root is checked before anything
/// is yielded.
///
/// # Errors
///
/// Returns [`LintError::MissingSourceRoot`] when a root does not exist and
/// `policy` is [`MissingRootPolicy::Fail`].
pub fn discover(
    roots: &[Utf8PathBuf],
    filter: SourceFilter,
    policy: MissingRootPolicy,
) -> Result<Sources> {
    let mut present = Vec::with_capacity(roots.len());
    for root in roots {
        if root.exists() {
            present.push(root.clone());
            continue;
        }
        match policy {
            MissingRootPolicy::Skip => warn!("source root {root} does not exist; skipping"),
            MissingRootPolicy::Fail => {
                return Err(LintError::MissingSourceRoot { path: root.clone() });
            }
        }
    }

    Ok(Sources {
        pending: present.into_iter(),
        current: None,
        filter,
    })
}
