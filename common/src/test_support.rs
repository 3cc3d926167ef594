//! Command executor doubles shared by the harness crates' tests.
//!
//! [`StubExecutor`] enforces an exact, ordered script of invocations.
//! [`RecordingExecutor`] accepts anything and remembers what it saw, which
//! suits behaviour tests that only inspect the calls afterwards.

use crate::process::CommandExecutor;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::process::ExitStatus;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code.cast_unsigned())
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The program to execute (e.g., "dpkg-deb").
    pub program: &'static str,
    /// The arguments to pass to the program.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: io::Result<ExitStatus>,
}

impl ExpectedCall {
    /// Expects `program args...` and answers with the given exit code.
    #[must_use]
    pub fn exits(program: &'static str, args: &[&str], code: i32) -> Self {
        Self {
            program,
            args: args.iter().map(|&arg| arg.to_owned()).collect(),
            result: Ok(exit_status(code)),
        }
    }

    /// Expects `program args...` and reports that it could not be spawned.
    #[must_use]
    pub fn missing(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(|&arg| arg.to_owned()).collect(),
            result: Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{program}: command not found"),
            )),
        }
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Checks each invocation against the next expected call and returns its
/// predefined result, so tests can verify command execution without side
/// effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    #[expect(clippy::expect_used, reason = "test double panics on misuse")]
    fn run(&self, program: &str, args: &[String]) -> io::Result<ExitStatus> {
        let call = self
            .expected
            .borrow_mut()
            .pop_front()
            .expect("unexpected command invocation");

        assert_eq!(call.program, program);
        assert_eq!(call.args.as_slice(), args);

        call.result
    }
}

/// A command recorded by [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The program that was invoked.
    pub program: String,
    /// The arguments it was invoked with.
    pub args: Vec<String>,
}

/// Accepts every invocation, records it, and returns a fixed exit code.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: RefCell<Vec<RecordedCall>>,
    exit_code: i32,
}

impl RecordingExecutor {
    /// Creates an executor whose commands all exit with `exit_code`.
    #[must_use]
    pub fn with_exit_code(exit_code: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            exit_code,
        }
    }

    /// Returns a copy of the calls seen so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Returns the programs invoked so far, in order.
    #[must_use]
    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.program.clone())
            .collect()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ExitStatus> {
        self.calls.borrow_mut().push(RecordedCall {
            program: program.to_owned(),
            args: args.to_vec(),
        });
        Ok(exit_status(self.exit_code))
    }
}
