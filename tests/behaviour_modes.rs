//! Behaviour-driven tests for mode selection and dispatch.

use harness_common::test_support::RecordingExecutor;
use harness_lint::ExternalLinter;
use harness_packager::DpkgDeb;
use release_harness::{
    CmakeDriver, HarnessConfig, Mode, RunSummary, Tools, run_modes, select_modes,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::{Cell, RefCell};

#[derive(Default)]
struct ModesWorld {
    keywords: RefCell<Vec<String>>,
    exit_status: Cell<i32>,
    summary: RefCell<Option<RunSummary>>,
}

#[fixture]
fn world() -> ModesWorld {
    ModesWorld::default()
}

fn words(quoted: &str) -> Vec<String> {
    quoted
        .trim()
        .trim_matches('"')
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

#[given("the requested modes {keywords}")]
fn given_requested_modes(world: &ModesWorld, keywords: String) {
    world.keywords.replace(words(&keywords));
}

#[given("every external command exits with status {code:i32}")]
fn given_exit_status(world: &ModesWorld, code: i32) {
    world.exit_status.set(code);
}

#[when("the harness runs")]
fn when_harness_runs(world: &ModesWorld) {
    let mut config = HarnessConfig::default();
    config.deps.use_sudo = false;
    config.deps.packages = vec!["cmake".to_owned()];

    let executor = RecordingExecutor::with_exit_code(world.exit_status.get());
    let linter = ExternalLinter::new(&executor);
    let builder = CmakeDriver::new(&executor);
    let archiver = DpkgDeb::new(&executor);
    let tools = Tools {
        executor: &executor,
        linter: &linter,
        builder: &builder,
        archiver: &archiver,
    };

    let modes = select_modes(world.keywords.borrow().iter());
    world
        .summary
        .replace(Some(run_modes(&modes, &config, &tools)));
}

#[then("the modes to run are {expected}")]
fn then_modes_are(world: &ModesWorld, expected: String) {
    let selected: Vec<&str> = select_modes(world.keywords.borrow().iter())
        .into_iter()
        .map(Mode::keyword)
        .collect();
    assert_eq!(selected, words(&expected));
}

#[then("{count:usize} modes ran")]
fn then_modes_ran(world: &ModesWorld, count: usize) {
    let summary = world.summary.borrow();
    let summary = summary.as_ref().expect("harness has run");
    assert_eq!(summary.outcomes().len(), count);
}

#[then("the exit code is {code:i32}")]
fn then_exit_code(world: &ModesWorld, code: i32) {
    let summary = world.summary.borrow();
    let summary = summary.as_ref().expect("harness has run");
    assert_eq!(summary.exit_code(), code);
}

#[scenario(path = "tests/features/modes.feature", index = 0)]
fn scenario_fixed_order(world: ModesWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/modes.feature", index = 1)]
fn scenario_unknown_and_repeated(world: ModesWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/modes.feature", index = 2)]
fn scenario_failures_do_not_stop_later_modes(world: ModesWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/modes.feature", index = 3)]
fn scenario_successful_modes(world: ModesWorld) {
    let _ = world;
}
