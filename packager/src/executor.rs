//! External command execution.
//!
//! The packager shells out exactly once, to the dependency-path-injection
//! script. Routing that call through [`CommandExecutor`] keeps the pipeline
//! testable without a Python interpreter on the machine.

use crate::error::{PackagerError, Result};
use std::process::{Command, Output};

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs `program` with `args` to completion and returns the captured
    /// output.
    ///
    /// # Errors
    ///
    /// Returns any I/O error encountered while spawning or waiting for the
    /// process. A non-zero exit status is not an error at this level.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ds4windows_packager::executor::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("python", &["--version".to_owned()])?;
    /// assert!(output.status.success());
    /// # Ok::<(), ds4windows_packager::error::PackagerError>(())
    /// ```
    fn run(&self, program: &str, args: &[String]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String]) -> Result<Output> {
        Command::new(program)
            .args(args)
            .output()
            .map_err(PackagerError::from)
    }
}
