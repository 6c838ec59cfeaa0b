//! Post-build packaging pipeline.
//!
//! [`Packager::run`] performs the release steps in a fixed order:
//!
//! 1. check the build output directory exists,
//! 2. run the dependency-path-injection script (fire-and-forget),
//! 3. write the version record,
//! 4. consolidate culture folders into `Lang/<code>`,
//! 5. resolve the architecture tag and archive name,
//! 6. delete an archive of the same name from a previous run,
//! 7. copy the output tree into a product-named staging folder,
//! 8. zip the staging folder and move the archive beside the output, and
//! 9. remove the staging folder.
//!
//! Only the first step is a checked precondition. Cleanup failures are
//! ignored; other filesystem failures end the run with an error.

use crate::arch::ArchTag;
use crate::archive::{ArchiveStats, create_archive, remove_existing_archive};
use crate::config::PackagerConfig;
use crate::deps_injection::{
    DEFAULT_PYTHON, InjectionCommand, InjectionOutcome, inject_dependency_paths,
};
use crate::error::{PackagerError, Result};
use crate::executor::CommandExecutor;
use crate::language::{ConsolidationReport, LanguageConsolidator};
use crate::naming::ArchiveName;
use crate::staging::{CopyStats, StagingTree};
use crate::version_record::write_version_record;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};

/// Positional inputs to a packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingRequest {
    /// Build output directory. Must exist.
    pub output_dir: Utf8PathBuf,
    /// Project directory holding the version record.
    pub project_dir: Utf8PathBuf,
    /// Version string, embedded verbatim.
    pub version: String,
    /// Architecture tag overriding the layout heuristic.
    pub arch_override: Option<String>,
}

/// Every path and name a run will use, resolved without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingPlan {
    /// Canonical build output directory.
    pub output_dir: Utf8PathBuf,
    /// Directory receiving the archive and staging tree.
    pub dest_dir: Utf8PathBuf,
    /// The injection script invocation.
    pub injection: InjectionCommand,
    /// Path of the version record.
    pub version_file: Utf8PathBuf,
    /// Consolidated localisation directory.
    pub lang_dir: Utf8PathBuf,
    /// Archive name components.
    pub archive_name: ArchiveName,
    /// Final archive location.
    pub archive_path: Utf8PathBuf,
    /// Staging directory location.
    pub staging_path: Utf8PathBuf,
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingReport {
    /// Where the archive was written.
    pub archive_path: Utf8PathBuf,
    /// The architecture tag used in the archive name.
    pub arch: ArchTag,
    /// Where the version record was written.
    pub version_file: Utf8PathBuf,
    /// Result of the injection script.
    pub injection: InjectionOutcome,
    /// Files moved into `Lang`.
    pub languages: ConsolidationReport,
    /// Size of the staged copy.
    pub staged: CopyStats,
    /// Entries written to the archive.
    pub archive: ArchiveStats,
    /// Whether an archive from an earlier run was replaced.
    pub replaced_archive: bool,
    /// Whether the staging directory was removed.
    pub staging_removed: bool,
}

/// Runs the packaging steps for one build.
pub struct Packager<'a> {
    config: &'a PackagerConfig,
    executor: &'a dyn CommandExecutor,
    python: String,
}

impl<'a> Packager<'a> {
    /// Create a packager using `executor` for the injection script.
    #[must_use]
    pub fn new(config: &'a PackagerConfig, executor: &'a dyn CommandExecutor) -> Self {
        Self {
            config,
            executor,
            python: DEFAULT_PYTHON.to_owned(),
        }
    }

    /// Use `python` as the interpreter for the injection script.
    #[must_use]
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    /// Resolve the plan for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::OutputDirNotFound`] if the output directory
    /// does not exist, or [`PackagerError::NonUtf8Path`] if its canonical
    /// form is not UTF-8.
    pub fn plan(&self, request: &PackagingRequest) -> Result<PackagingPlan> {
        if !request.output_dir.is_dir() {
            return Err(PackagerError::OutputDirNotFound {
                path: request.output_dir.clone(),
            });
        }
        let output_dir = canonical_output_dir(&request.output_dir)?;
        let dest_dir = output_dir
            .parent()
            .map_or_else(|| output_dir.clone(), Utf8Path::to_owned);

        let config = self.config;
        let injection = InjectionCommand::new(
            &self.python,
            &request.project_dir,
            &config.inject_script,
            &output_dir,
            &config.manifest_file_name(),
        );
        let arch = ArchTag::resolve(&output_dir, request.arch_override.as_deref());
        let archive_name = ArchiveName::new(&config.product_name, &request.version, arch);

        Ok(PackagingPlan {
            version_file: request.project_dir.join(&config.version_file_name),
            lang_dir: output_dir.join(&config.lang_dir_name),
            archive_path: dest_dir.join(archive_name.filename()),
            staging_path: dest_dir.join(&config.product_name),
            injection,
            archive_name,
            output_dir,
            dest_dir,
        })
    }

    /// Package the build described by `request`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::OutputDirNotFound`] before touching the
    /// filesystem when the output directory is missing, and propagates any
    /// error from writing the version record, consolidating languages,
    /// staging or archiving. The staging directory is still removed on
    /// those paths.
    pub fn run(&self, request: &PackagingRequest) -> Result<PackagingReport> {
        let plan = self.plan(request)?;
        info!(
            "packaging {} version {} for {}",
            plan.output_dir,
            request.version,
            plan.archive_name.arch()
        );

        let injection = inject_dependency_paths(self.executor, &plan.injection);

        let version_file =
            write_version_record(&request.project_dir, &self.config.version_file_name, &request.version)?;
        debug!("recorded version in {version_file}");

        let languages = LanguageConsolidator::new(
            &plan.output_dir,
            &self.config.lang_dir_name,
            &self.config.languages,
        )
        .excluding(plan.staging_path.clone())
        .consolidate()?;
        debug!("moved {} localisation files", languages.total_moved());

        let replaced_archive = remove_existing_archive(&plan.archive_path)?;

        let staging =
            StagingTree::prepare(&plan.dest_dir, &self.config.product_name, &plan.output_dir)?;
        let staged = staging.populate(&plan.output_dir)?;
        debug!(
            "staged {} files in {} directories at {}",
            staged.files,
            staged.dirs,
            staging.path()
        );

        let archive = create_archive(staging.path(), &plan.archive_path)?;
        let staging_removed = staging.cleanup();

        info!("created {}", plan.archive_path);
        Ok(PackagingReport {
            archive_path: plan.archive_path,
            arch: plan.archive_name.arch().clone(),
            version_file,
            injection,
            languages,
            staged,
            archive,
            replaced_archive,
            staging_removed,
        })
    }
}

/// Canonicalise the output directory so parent lookups work for relative
/// paths such as `.`.
fn canonical_output_dir(output_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    output_dir.canonicalize_utf8().map_err(|err| {
        if err.kind() == std::io::ErrorKind::InvalidData {
            PackagerError::NonUtf8Path {
                path: output_dir.to_string(),
            }
        } else {
            PackagerError::Io(err)
        }
    })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
