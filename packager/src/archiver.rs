//! Turning a staged tree into a `.deb` archive.

use crate::error::Result;
use crate::stager::StagedTree;
use camino::{Utf8Path, Utf8PathBuf};
use harness_common::{CommandExecutor, run_checked};
use log::info;

/// Builds an installable archive from a completed staging tree.
#[cfg_attr(test, mockall::automock)]
pub trait Archiver {
    /// Archives `tree` and returns the path of the produced package.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PackagerError::Process`] if the archiving tool cannot
    /// be launched or exits unsuccessfully.
    fn build(&self, tree: &StagedTree) -> Result<Utf8PathBuf>;
}

/// [`Archiver`] that runs `dpkg-deb --build`.
pub struct DpkgDeb<'a> {
    executor: &'a dyn CommandExecutor,
    output: Option<Utf8PathBuf>,
}

impl<'a> DpkgDeb<'a> {
    /// Creates an archiver that writes `<root>.deb` next to the staging root.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self {
            executor,
            output: None,
        }
    }

    /// Writes the archive to `output` instead of the default location.
    #[must_use]
    pub fn with_output(mut self, output: Option<Utf8PathBuf>) -> Self {
        self.output = output;
        self
    }

    fn output_for(&self, root: &Utf8Path) -> Utf8PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let trimmed = root.as_str().trim_end_matches(['/', '\\']);
            Utf8PathBuf::from(format!("{trimmed}.deb"))
        })
    }
}

impl Archiver for DpkgDeb<'_> {
    fn build(&self, tree: &StagedTree) -> Result<Utf8PathBuf> {
        let output = self.output_for(tree.root());
        let mut args = vec!["--build".to_owned(), tree.root().to_string()];
        if self.output.is_some() {
            args.push(output.to_string());
        }
        run_checked(self.executor, "dpkg-deb", &args)?;
        info!("built {output}");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PackagerError;
    use rstest::rstest;

    #[rstest]
    #[case::plain("build/stage", "build/stage.deb")]
    #[case::trailing_slash("build/stage/", "build/stage.deb")]
    fn default_output_sits_next_to_the_root(#[case] root: &str, #[case] expected: &str) {
        let executor = harness_common::test_support::RecordingExecutor::default();
        let archiver = DpkgDeb::new(&executor);

        assert_eq!(archiver.output_for(Utf8Path::new(root)), Utf8PathBuf::from(expected));
    }

    #[test]
    fn explicit_output_overrides_default() {
        let executor = harness_common::test_support::RecordingExecutor::default();
        let archiver =
            DpkgDeb::new(&executor).with_output(Some(Utf8PathBuf::from("dist/app_1.0.2.deb")));

        assert_eq!(
            archiver.output_for(Utf8Path::new("build/stage")),
            Utf8PathBuf::from("dist/app_1.0.2.deb")
        );
    }

    #[test]
    fn process_errors_convert_into_packager_errors() {
        let err: PackagerError = harness_common::ProcessError::Failed {
            command: "dpkg-deb --build build/stage".to_owned(),
            status: harness_common::test_support::exit_status(2),
        }
        .into();

        assert!(err.to_string().starts_with("`dpkg-deb --build build/stage` failed"));
    }
}
