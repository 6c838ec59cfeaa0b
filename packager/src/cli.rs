//! CLI argument definitions for the post-build packager.
//!
//! The four positional arguments match what the MSBuild post-build event
//! passes. Everything else is optional and defaults to the behaviour the
//! release build relies on.

use crate::deps_injection::DEFAULT_PYTHON;
use crate::pipeline::PackagingRequest;
use camino::Utf8PathBuf;
use clap::Parser;

/// Package a DS4Windows build into a release archive.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "ds4windows-post-build")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package a DS4Windows build into a release archive.\n\n",
    "Runs the dependency-path injection script, records the version in the ",
    "project directory, moves satellite resource folders into Lang/<code>, ",
    "and zips the output tree as DS4Windows_<version>_<arch>.zip beside the ",
    "output directory.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Package a Release build, inferring the architecture from the path:\n",
    "    $ ds4windows-post-build bin/x64/Release/net8.0-windows . 3.10.0\n\n",
    "  Force the architecture tag:\n",
    "    $ ds4windows-post-build out . 3.10.0 x86\n\n",
    "  Preview without changing anything:\n",
    "    $ ds4windows-post-build --dry-run out . 3.10.0",
))]
pub struct Cli {
    /// Build output directory to package.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Utf8PathBuf,

    /// Project directory; receives the version file.
    #[arg(value_name = "PROJECT_DIR")]
    pub project_dir: Utf8PathBuf,

    /// Version string embedded in the archive name.
    #[arg(value_name = "VERSION")]
    pub release_version: String,

    /// Architecture tag [default: inferred from OUTPUT_DIR].
    #[arg(value_name = "ARCH")]
    pub arch: Option<String>,

    /// Print the resolved plan and exit without changing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Interpreter used to run the dependency-path injection script.
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_PYTHON)]
    pub python: String,

    /// TOML file overriding packaging names and the language list.
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only report errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Build the packaging request from the positional arguments.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use ds4windows_packager::cli::Cli;
    ///
    /// let cli = Cli::parse_from(["ds4windows-post-build", "out", ".", "3.10.0", "x64"]);
    /// let request = cli.to_request();
    /// assert_eq!(request.version, "3.10.0");
    /// assert_eq!(request.arch_override.as_deref(), Some("x64"));
    /// ```
    #[must_use]
    pub fn to_request(&self) -> PackagingRequest {
        PackagingRequest {
            output_dir: self.output_dir.clone(),
            project_dir: self.project_dir.clone(),
            version: self.release_version.clone(),
            arch_override: self.arch.clone(),
        }
    }

    /// Log filter directive implied by `-v`/`-q`.
    ///
    /// Warnings are shown by default so a failed injection script is
    /// visible without extra flags.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
