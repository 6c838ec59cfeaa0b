//! Dependency-path injection into the build's `.deps.json` manifest.
//!
//! The rewrite itself lives in a Python script next to the project
//! (`utils/inject_deps_path.py`). The packager only invokes it. The call is
//! fire-and-forget: a failed spawn or a non-zero exit status is logged and
//! packaging continues.

use crate::executor::CommandExecutor;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};

/// Interpreter used to run the injection script when none is configured.
pub const DEFAULT_PYTHON: &str = "python";

/// A resolved injection invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionCommand {
    /// Interpreter to launch.
    pub python: String,
    /// Path to the injection script.
    pub script: Utf8PathBuf,
    /// Path to the dependency manifest handed to the script.
    pub manifest: Utf8PathBuf,
}

impl InjectionCommand {
    /// Resolve the invocation for a project and build output.
    ///
    /// `script` is joined onto `project_dir`; `manifest_name` onto
    /// `output_dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use ds4windows_packager::deps_injection::InjectionCommand;
    ///
    /// let cmd = InjectionCommand::new(
    ///     "python",
    ///     Utf8Path::new("/repo/src/App"),
    ///     Utf8Path::new("../utils/inject_deps_path.py"),
    ///     Utf8Path::new("/build/out"),
    ///     "DS4Windows.deps.json",
    /// );
    /// assert_eq!(cmd.script, "/repo/src/App/../utils/inject_deps_path.py");
    /// assert_eq!(cmd.manifest, "/build/out/DS4Windows.deps.json");
    /// ```
    #[must_use]
    pub fn new(
        python: &str,
        project_dir: &Utf8Path,
        script: &Utf8Path,
        output_dir: &Utf8Path,
        manifest_name: &str,
    ) -> Self {
        Self {
            python: python.to_owned(),
            script: project_dir.join(script),
            manifest: output_dir.join(manifest_name),
        }
    }

    /// Arguments passed to the interpreter.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        vec![self.script.to_string(), self.manifest.to_string()]
    }
}

/// Outcome of the injection step. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// The script ran and exited successfully.
    Succeeded,
    /// The script ran and exited with a failure status (`None` when killed
    /// by a signal).
    Failed(Option<i32>),
    /// The interpreter could not be started.
    NotStarted,
}

impl InjectionOutcome {
    /// Returns true if the script ran and succeeded.
    #[must_use]
    pub const fn succeeded(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Run the injection script, blocking until it exits.
///
/// There is no timeout; a hung script blocks the run.
pub fn inject_dependency_paths(
    executor: &dyn CommandExecutor,
    command: &InjectionCommand,
) -> InjectionOutcome {
    debug!(
        "injecting dependency paths: {} {} {}",
        command.python, command.script, command.manifest
    );

    let output = match executor.run(&command.python, &command.args()) {
        Ok(output) => output,
        Err(err) => {
            warn!("dependency-path injection did not start: {err}");
            return InjectionOutcome::NotStarted;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!("inject_deps_path: {}", stdout.trim());
    }

    if output.status.success() {
        return InjectionOutcome::Succeeded;
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    warn!(
        "dependency-path injection exited with {}: {}",
        output.status,
        stderr.trim()
    );
    InjectionOutcome::Failed(output.status.code())
}
