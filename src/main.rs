//! Release harness CLI entrypoint.
//!
//! Loads `release.toml`, runs the requested modes against the real external
//! tools, and exits non-zero if any mode failed.

use clap::Parser;
use harness_common::SystemCommandExecutor;
use harness_lint::ExternalLinter;
use harness_packager::DpkgDeb;
use log::info;
use release_harness::{
    CmakeDriver, HarnessConfig, Result, RunSummary, Tools, run_modes, select_modes,
};
use release_harness::cli::Cli;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let config = HarnessConfig::load(cli.config.as_deref())?;
    let modes = select_modes(&cli.modes);
    if modes.is_empty() {
        info!("no modes requested; nothing to do");
        return Ok(RunSummary::default());
    }

    let executor = SystemCommandExecutor;
    let linter = ExternalLinter::new(&executor);
    let builder = CmakeDriver::new(&executor);
    let archiver = DpkgDeb::new(&executor).with_output(config.staging.output.clone());
    let tools = Tools {
        executor: &executor,
        linter: &linter,
        builder: &builder,
        archiver: &archiver,
    };

    Ok(run_modes(&modes, &config, &tools))
}

fn exit_code_for_run_result(result: Result<RunSummary>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(summary) => {
            for outcome in summary.failures() {
                if let Err(err) = &outcome.result {
                    write_stderr_line(stderr, format_args!("{}: {err}", outcome.mode));
                }
            }
            summary.exit_code()
        }
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
