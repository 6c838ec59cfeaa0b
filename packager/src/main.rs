//! DS4Windows post-build entrypoint.
//!
//! Invoked from the project's post-build event with the output directory,
//! project directory, version and optional architecture. Silent on success
//! unless `-v` is given.

use clap::Parser;
use ds4windows_packager::cli::Cli;
use ds4windows_packager::config::PackagerConfig;
use ds4windows_packager::error::{PackagerError, Result};
use ds4windows_packager::executor::SystemCommandExecutor;
use ds4windows_packager::output::{plan_text, report_summary};
use ds4windows_packager::pipeline::Packager;
use log::info;
use std::io::Write;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stdout, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Route `log` records to stderr. `RUST_LOG` wins over `-v`/`-q`.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    // A subscriber set earlier stays in place.
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .ok();
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let config = PackagerConfig::load(cli.config.as_deref())?;
    let executor = SystemCommandExecutor;
    let packager = Packager::new(&config, &executor).with_python(cli.python.as_str());
    let request = cli.to_request();

    if cli.dry_run {
        let plan = packager.plan(&request)?;
        write_line(stdout, plan_text(&plan, config.languages.len()));
        return Ok(());
    }

    let report = packager.run(&request)?;
    info!("{}", report_summary(&report));
    Ok(())
}

/// Map the run result to an exit status, reporting any error.
///
/// A missing output directory is reported on stdout, where the build log
/// picks it up; everything else goes to stderr.
fn exit_code_for_run_result(
    result: Result<()>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            if err.is_missing_output() {
                write_line(stdout, format_args!("Error: {err}"));
            } else {
                write_line(stderr, format_args!("error: {}", error_chain(&err)));
            }
            err.exit_code()
        }
    }
}

/// Render `err` followed by each of its sources.
fn error_chain(err: &PackagerError) -> String {
    let mut text = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    writeln!(out, "{message}").ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("output was not UTF-8")
    }

    #[test]
    fn success_exits_zero_silently() {
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let code = exit_code_for_run_result(Ok(()), &mut stdout, &mut stderr);
        assert_eq!(code, 0);
        assert!(stdout.is_empty());
        assert!(stderr.is_empty());
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_writes_do_not_change_exit_code() {
        let err = PackagerError::OutputDirNotFound {
            path: Utf8PathBuf::from("/build/missing"),
        };
        let code = exit_code_for_run_result(Err(err), &mut ClosedPipe, &mut ClosedPipe);
        assert_eq!(code, 1);
    }

    #[test]
    fn missing_output_is_reported_on_stdout() {
        let err = PackagerError::OutputDirNotFound {
            path: Utf8PathBuf::from("/build/missing"),
        };
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        let code = exit_code_for_run_result(Err(err), &mut stdout, &mut stderr);

        assert_eq!(code, 1);
        assert_eq!(text(stdout), "Error: target_dir not found: /build/missing\n");
        assert!(stderr.is_empty());
    }

    #[test]
    fn other_errors_go_to_stderr_with_their_cause() {
        let err = PackagerError::VersionRecord {
            path: Utf8PathBuf::from("/repo/newest.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        let code = exit_code_for_run_result(Err(err), &mut stdout, &mut stderr);

        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert_eq!(
            text(stderr),
            "error: failed to write version file /repo/newest.txt: read-only\n"
        );
    }

    #[test]
    fn dry_run_prints_plan_without_side_effects() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).expect("utf-8 path");
        let output = root.join("x86/Release/out");
        std::fs::create_dir_all(output.join("de")).expect("mkdir");
        let cli = Cli::parse_from([
            "ds4windows-post-build",
            "--dry-run",
            output.as_str(),
            root.as_str(),
            "3.10.0",
        ]);
        let mut stdout = Vec::new();

        run(&cli, &mut stdout).expect("dry run succeeds");

        let printed = text(stdout);
        assert!(printed.contains("DS4Windows_3.10.0_x86.zip"), "{printed}");
        assert!(!root.join("newest.txt").exists());
        assert!(!output.join("Lang").exists());
        assert!(output.join("de").is_dir());
    }
}
