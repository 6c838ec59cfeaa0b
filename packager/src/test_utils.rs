//! Shared test utilities for the packager crate.

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

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
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

/// A command invocation seen by [`StubExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The program that was launched.
    pub program: String,
    /// The arguments it received.
    pub args: Vec<String>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Hands out queued results in order and records every invocation. Running
/// out of queued results yields [`PackagerError::StubMismatch`].
#[derive(Debug, Default)]
pub struct StubExecutor {
    results: RefCell<VecDeque<Result<Output>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl StubExecutor {
    /// Creates a stub that returns `results` in order.
    #[must_use]
    pub fn new(results: Vec<Result<Output>>) -> Self {
        Self {
            results: RefCell::new(results.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Creates a stub whose single invocation succeeds.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::new(vec![Ok(success_output())])
    }

    /// Returns the invocations received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Asserts that all queued results have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining results that were not handed out.
    pub fn assert_finished(&self) {
        assert!(
            self.results.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, program: &str, args: &[String]) -> Result<Output> {
        self.calls.borrow_mut().push(RecordedCall {
            program: program.to_owned(),
            args: args.to_vec(),
        });
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Err(PackagerError::StubMismatch {
                    message: format!("unexpected invocation of {program}"),
                })
            })
    }
}
