//! The packaging run: resolve settings, stage, archive.

use crate::archiver::Archiver;
use crate::copyright::CopyrightSettings;
use crate::descriptor::{PackageDescriptor, PackageSettings};
use crate::error::Result;
use crate::hooks::HookSettings;
use crate::layout::StagingSettings;
use crate::stager::Stager;
use camino::Utf8PathBuf;
use log::info;

/// Input parameters for a staging run.
///
/// Groups the resolved configuration so [`Stager::stage`] takes one
/// argument.
#[derive(Debug, Clone)]
pub struct PackageParams {
    /// Validated package metadata.
    pub descriptor: PackageDescriptor,
    /// Copyright header fields and license location.
    pub copyright: CopyrightSettings,
    /// Extra lifecycle hook bodies.
    pub hooks: HookSettings,
    /// The built binary to package.
    pub binary: Utf8PathBuf,
    /// File name of the binary once installed.
    pub binary_name: String,
}

impl PackageParams {
    /// Resolves the configuration sections a packaging run needs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PackagerError::InvalidDescriptor`] or
    /// [`crate::PackagerError::InvalidStaging`] when the settings are
    /// incomplete.
    pub fn from_settings(
        package: &PackageSettings,
        copyright: &CopyrightSettings,
        hooks: &HookSettings,
        staging: &StagingSettings,
    ) -> Result<Self> {
        Ok(Self {
            descriptor: PackageDescriptor::from_settings(package)?,
            copyright: copyright.clone(),
            hooks: hooks.clone(),
            binary: staging.binary.clone(),
            binary_name: staging.resolved_binary_name()?,
        })
    }
}

/// Stages `params` and archives the resulting tree.
///
/// Returns the path of the built package.
///
/// # Errors
///
/// Returns the first staging failure, or the archiver's failure. The archiver
/// never runs unless staging completed.
pub fn build_package(
    stager: &Stager<'_>,
    params: &PackageParams,
    archiver: &dyn Archiver,
) -> Result<Utf8PathBuf> {
    let tree = stager.stage(params)?;
    info!(
        "staged {} control file(s) and {}",
        tree.control_files().len(),
        tree.binary()
    );
    archiver.build(&tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PackagerError;
    use crate::archiver::{DpkgDeb, MockArchiver};
    use crate::layout::StagingLayout;
    use harness_common::test_support::{ExpectedCall, RecordingExecutor, StubExecutor};
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    struct Project {
        _dir: TempDir,
        base: Utf8PathBuf,
        package: PackageSettings,
        copyright: CopyrightSettings,
        staging: StagingSettings,
    }

    impl Project {
        fn params(&self) -> PackageParams {
            PackageParams::from_settings(
                &self.package,
                &self.copyright,
                &HookSettings::default(),
                &self.staging,
            )
            .expect("valid settings")
        }

        fn layout(&self) -> StagingLayout {
            StagingLayout::from_settings(&self.staging).expect("valid layout")
        }
    }

    #[fixture]
    fn project() -> Project {
        let dir = TempDir::new().expect("temp dir");
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        fs::write(base.join("smart-vcutter"), b"binary").expect("write binary");
        fs::write(base.join("LICENSE"), b"GPL text\n").expect("write license");
        Project {
            package: PackageSettings {
                name: "smart-vcutter".to_owned(),
                version: "1.0.2".to_owned(),
                description: "Generate small video loops from videos".to_owned(),
                ..PackageSettings::default()
            },
            copyright: CopyrightSettings {
                license_file: base.join("LICENSE"),
                ..CopyrightSettings::default()
            },
            staging: StagingSettings {
                root: base.join("stage"),
                binary: base.join("smart-vcutter"),
                ..StagingSettings::default()
            },
            base,
            _dir: dir,
        }
    }

    #[rstest]
    fn binary_name_defaults_to_the_artifact_name(project: Project) {
        assert_eq!(project.params().binary_name, "smart-vcutter");
    }

    #[rstest]
    fn dpkg_deb_runs_after_staging(project: Project) {
        let root = project.base.join("stage");
        let executor = StubExecutor::new(vec![
            ExpectedCall::exits("chmod", &["+x", root.join("DEBIAN/postrm").as_str()], 0),
            ExpectedCall::exits("dpkg-deb", &["--build", root.as_str()], 0),
        ]);
        let stager = Stager::new(project.layout(), &executor);

        let output = build_package(&stager, &project.params(), &DpkgDeb::new(&executor))
            .expect("package builds");

        assert_eq!(output, Utf8PathBuf::from(format!("{root}.deb")));
        executor.assert_finished();
    }

    #[rstest]
    fn explicit_output_is_passed_to_dpkg_deb(project: Project) {
        let root = project.base.join("stage");
        let output = project.base.join("dist/smart-vcutter_1.0.2_amd64.deb");
        let executor = StubExecutor::new(vec![
            ExpectedCall::exits("chmod", &["+x", root.join("DEBIAN/postrm").as_str()], 0),
            ExpectedCall::exits("dpkg-deb", &["--build", root.as_str(), output.as_str()], 0),
        ]);
        let stager = Stager::new(project.layout(), &executor);
        let archiver = DpkgDeb::new(&executor).with_output(Some(output.clone()));

        let built = build_package(&stager, &project.params(), &archiver).expect("package builds");

        assert_eq!(built, output);
        executor.assert_finished();
    }

    #[rstest]
    fn archiver_is_not_called_when_staging_fails(project: Project) {
        fs::remove_file(project.base.join("smart-vcutter")).expect("remove binary");
        let executor = RecordingExecutor::with_exit_code(0);
        let stager = Stager::new(project.layout(), &executor);
        let mut archiver = MockArchiver::new();
        archiver.expect_build().never();

        let err = build_package(&stager, &project.params(), &archiver).expect_err("staging fails");

        assert!(matches!(err, PackagerError::MissingArtifact { .. }));
    }

    #[rstest]
    fn archiver_failure_propagates(project: Project) {
        let root = project.base.join("stage");
        let executor = StubExecutor::new(vec![
            ExpectedCall::exits("chmod", &["+x", root.join("DEBIAN/postrm").as_str()], 0),
            ExpectedCall::exits("dpkg-deb", &["--build", root.as_str()], 2),
        ]);
        let stager = Stager::new(project.layout(), &executor);

        let err = build_package(&stager, &project.params(), &DpkgDeb::new(&executor))
            .expect_err("dpkg-deb fails");

        assert!(matches!(err, PackagerError::Process(_)));
    }

    #[rstest]
    fn archiver_receives_the_staged_tree(project: Project) {
        let executor = RecordingExecutor::with_exit_code(0);
        let stager = Stager::new(project.layout(), &executor);
        let expected_root = project.base.join("stage");
        let mut archiver = MockArchiver::new();
        archiver
            .expect_build()
            .withf(move |tree| tree.root() == expected_root.as_path())
            .times(1)
            .returning(|tree| Ok(Utf8PathBuf::from(format!("{}.deb", tree.root()))));

        build_package(&stager, &project.params(), &archiver).expect("package builds");
    }
}
