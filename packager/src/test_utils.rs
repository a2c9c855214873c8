//! Shared test utilities for the packager crate.
//!
//! Available to unit tests and, through the `test-support` feature, to
//! external test suites.

use crate::error::{PackagerError, Result};
use crate::executor::CommandExecutor;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

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

    ExitStatus::from_raw(code.unsigned_abs())
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    output_with_stdout("")
}

/// Creates a successful command `Output` carrying `stdout`.
#[must_use]
pub fn output_with_stdout(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "git").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<&'static str>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Replays expected command invocations in order and returns predefined
/// results. An invocation that does not match the next expectation yields
/// [`PackagerError::StubMismatch`].
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
        let remaining = self.expected.borrow();
        assert!(
            remaining.is_empty(),
            "expected no further command invocations, {} remaining: {:?}",
            remaining.len(),
            remaining.iter().map(|call| call.cmd).collect::<Vec<_>>()
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let call = self
            .expected
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| PackagerError::StubMismatch {
                message: format!("unexpected invocation: {cmd} {}", args.join(" ")),
            })?;

        if call.cmd != cmd || call.args.as_slice() != args {
            return Err(PackagerError::StubMismatch {
                message: format!(
                    "expected `{} {}`, got `{cmd} {}`",
                    call.cmd,
                    call.args.join(" "),
                    args.join(" ")
                ),
            });
        }

        call.result
    }
}

/// A `CommandExecutor` that records every invocation and succeeds unless
/// the command is listed as failing.
///
/// Useful when arguments contain runtime paths that a [`StubExecutor`]
/// cannot spell out in advance.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: RefCell<Vec<Vec<String>>>,
    failing: Vec<&'static str>,
}

impl RecordingExecutor {
    /// Creates an executor on which every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor on which `cmd` exits with status 1.
    #[must_use]
    pub fn failing(cmd: &'static str) -> Self {
        Self {
            calls: RefCell::default(),
            failing: vec![cmd],
        }
    }

    /// Returns recorded invocations as `[cmd, args...]` vectors.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Returns the command names invoked, in order.
    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| call.first().cloned())
            .collect()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let mut call = vec![cmd.to_owned()];
        call.extend(args.iter().map(|arg| (*arg).to_owned()));
        self.calls.borrow_mut().push(call);

        if self.failing.contains(&cmd) {
            return Ok(failure_output(&format!("{cmd}: simulated failure")));
        }
        Ok(success_output())
    }
}
