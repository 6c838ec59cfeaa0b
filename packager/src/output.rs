//! Human-readable text for dry runs and run summaries.

use crate::arch::ArchSource;
use crate::deps_injection::InjectionOutcome;
use crate::pipeline::{PackagingPlan, PackagingReport};

/// Format a resolved plan for `--dry-run`.
///
/// # Example
///
/// ```
/// use camino::{Utf8Path, Utf8PathBuf};
/// use ds4windows_packager::arch::ArchTag;
/// use ds4windows_packager::deps_injection::InjectionCommand;
/// use ds4windows_packager::naming::ArchiveName;
/// use ds4windows_packager::output::plan_text;
/// use ds4windows_packager::pipeline::PackagingPlan;
///
/// let output_dir = Utf8PathBuf::from("/build/x64/net8/out");
/// let arch = ArchTag::resolve(&output_dir, None);
/// let plan = PackagingPlan {
///     dest_dir: Utf8PathBuf::from("/build/x64/net8"),
///     injection: InjectionCommand::new(
///         "python",
///         Utf8Path::new("/repo/src/App"),
///         Utf8Path::new("../utils/inject_deps_path.py"),
///         &output_dir,
///         "DS4Windows.deps.json",
///     ),
///     version_file: Utf8PathBuf::from("/repo/src/App/newest.txt"),
///     lang_dir: output_dir.join("Lang"),
///     archive_name: ArchiveName::new("DS4Windows", "3.10.0", arch),
///     archive_path: Utf8PathBuf::from("/build/x64/net8/DS4Windows_3.10.0_x64.zip"),
///     staging_path: Utf8PathBuf::from("/build/x64/net8/DS4Windows"),
///     output_dir,
/// };
///
/// let text = plan_text(&plan, 25);
/// assert!(text.starts_with("Dry run"));
/// assert!(text.contains("DS4Windows_3.10.0_x64.zip"));
/// ```
#[must_use]
pub fn plan_text(plan: &PackagingPlan, language_count: usize) -> String {
    let arch = plan.archive_name.arch();
    let arch_note = match arch.source() {
        ArchSource::Override => "from command line",
        ArchSource::Inferred => "from output path",
        ArchSource::Fallback => "layout not recognised",
    };

    [
        "Dry run - no files will be modified".to_owned(),
        String::new(),
        format!("Output directory: {}", plan.output_dir),
        format!(
            "Inject script: {} {} {}",
            plan.injection.python, plan.injection.script, plan.injection.manifest
        ),
        format!("Version file: {}", plan.version_file),
        format!("Lang directory: {} ({language_count} languages)", plan.lang_dir),
        format!("Architecture: {arch} ({arch_note})"),
        format!("Staging directory: {}", plan.staging_path),
        format!("Archive: {}", plan.archive_path),
    ]
    .join("\n")
}

/// Format the one-line summary printed after a verbose run.
#[must_use]
pub fn report_summary(report: &PackagingReport) -> String {
    let injection = match report.injection {
        InjectionOutcome::Succeeded => "dependency paths injected".to_owned(),
        InjectionOutcome::Failed(Some(code)) => format!("injection script exited with {code}"),
        InjectionOutcome::Failed(None) => "injection script was terminated".to_owned(),
        InjectionOutcome::NotStarted => "injection script did not start".to_owned(),
    };
    let moved = report.languages.total_moved();
    let plural = if moved == 1 { "file" } else { "files" };

    format!(
        "Created {} ({} files); moved {moved} localisation {plural}; {injection}",
        report.archive_path, report.archive.files
    )
}
