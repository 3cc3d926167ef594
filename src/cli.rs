//! CLI argument definitions for the release harness.
//!
//! Modes are taken as free-form keywords rather than a closed enum so that
//! unknown words are ignored instead of rejected.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use log::LevelFilter;

/// Lint, test and package a native application for release.
#[derive(Parser, Debug, Default)]
#[command(name = "release-harness")]
#[command(version, about)]
#[command(after_help = concat!(
    "MODES:\n",
    "  deps       Install build dependencies with the system package manager\n",
    "  lint       Run the style checker over the project sources\n",
    "  tests      Build the test target\n",
    "  package    Stage and build the .deb package\n\n",
    "Modes run in the order above, whatever order they are given in. Every\n",
    "requested mode runs; the exit status is 1 if any of them failed.\n\n",
    "EXAMPLES:\n",
    "  Gate a change on the style checker and the tests:\n",
    "    $ release-harness lint tests\n\n",
    "  Build the package with a custom configuration:\n",
    "    $ release-harness -c ci/release.toml package",
))]
pub struct Cli {
    /// Modes to run (deps, lint, tests, package). Unknown modes are ignored.
    #[arg(value_name = "MODE")]
    pub modes: Vec<String>,

    /// Configuration file [default: release.toml, optional].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Increase log detail; repeat for trace output.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Returns the log level selected by `-v` and `-q`.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn modes_and_options_parse() {
        let cli = Cli::try_parse_from(["release-harness", "-c", "ci.toml", "lint", "package"])
            .expect("arguments parse");

        assert_eq!(cli.modes, vec!["lint", "package"]);
        assert_eq!(cli.config, Some(Utf8PathBuf::from("ci.toml")));
    }

    #[test]
    fn unknown_mode_words_are_accepted_by_the_parser() {
        let cli = Cli::try_parse_from(["release-harness", "lint", "deploy"])
            .expect("arguments parse");

        assert_eq!(cli.modes, vec!["lint", "deploy"]);
    }

    #[rstest]
    #[case::default(&[], LevelFilter::Info)]
    #[case::verbose(&["-v"], LevelFilter::Debug)]
    #[case::very_verbose(&["-vv"], LevelFilter::Trace)]
    #[case::quiet(&["-q"], LevelFilter::Error)]
    fn log_level_follows_flags(#[case] flags: &[&str], #[case] expected: LevelFilter) {
        let args = std::iter::once("release-harness").chain(flags.iter().copied());
        let cli = Cli::try_parse_from(args).expect("arguments parse");

        assert_eq!(cli.log_level(), expected);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["release-harness", "-q", "-v"]).is_err());
    }
}
