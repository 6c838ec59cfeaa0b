//! Localisation folder consolidation.
//!
//! .NET satellite assemblies land in one folder per culture, scattered
//! wherever the build put them. The release layout wants them merged under
//! `<output>/Lang/<code>/`, so every folder named after a known culture is
//! emptied into that destination and removed when it ends up empty.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;

/// Culture folders shipped with DS4Windows.
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "ar", "cs", "de", "el", "es", "fi", "fr", "he", "hu-HU", "idn", "it", "ja", "ms", "nl", "pl",
    "pt", "pt-BR", "ru", "se", "tr", "uk-UA", "vi", "zh-Hans", "zh-Hant", "zh-CN",
];

/// A culture identifier naming a localisation folder (for example `zh-Hans`).
///
/// Matching is exact and case-sensitive, like the folder names the build
/// emits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a language code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LanguageCode {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a consolidation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidationReport {
    /// Number of files moved per language.
    pub moved: BTreeMap<LanguageCode, usize>,
    /// Source folders that were emptied and removed.
    pub removed_dirs: Vec<Utf8PathBuf>,
    /// Source folders left in place because they were not empty or locked.
    pub retained_dirs: Vec<Utf8PathBuf>,
}

impl ConsolidationReport {
    /// Total number of files moved across all languages.
    #[must_use]
    pub fn total_moved(&self) -> usize {
        self.moved.values().sum()
    }
}

/// Merges culture folders into a single `Lang` directory.
#[derive(Debug, Clone)]
pub struct LanguageConsolidator<'a> {
    output_dir: &'a Utf8Path,
    lang_dir: Utf8PathBuf,
    languages: &'a [LanguageCode],
    excluded: Vec<Utf8PathBuf>,
}

impl<'a> LanguageConsolidator<'a> {
    /// Create a consolidator writing into `<output_dir>/<lang_dir_name>`.
    #[must_use]
    pub fn new(output_dir: &'a Utf8Path, lang_dir_name: &str, languages: &'a [LanguageCode]) -> Self {
        Self {
            output_dir,
            lang_dir: output_dir.join(lang_dir_name),
            languages,
            excluded: Vec::new(),
        }
    }

    /// Skip language folders beneath `path`.
    ///
    /// The staging tree sits beside the output directory; a copy left by an
    /// interrupted run must not be fed back into `Lang`.
    #[must_use]
    pub fn excluding(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    /// Return the consolidated `Lang` directory.
    #[must_use]
    pub fn lang_dir(&self) -> &Utf8Path {
        &self.lang_dir
    }

    /// Search roots in the order they are scanned: the output directory,
    /// then its parent when it has one.
    #[must_use]
    pub fn search_roots(&self) -> Vec<&'a Utf8Path> {
        let mut roots = vec![self.output_dir];
        if let Some(parent) = self.output_dir.parent().filter(|p| !p.as_str().is_empty()) {
            roots.push(parent);
        }
        roots
    }

    /// Run the consolidation over every search root and language.
    ///
    /// The `Lang` directory is created up front so it exists in the staged
    /// tree even when no culture folders were found.
    ///
    /// # Errors
    ///
    /// Returns an error if `Lang/<code>` cannot be created, if a matched
    /// folder cannot be listed, or if a file cannot be moved. Failure to
    /// remove an emptied source folder is not an error.
    pub fn consolidate(&self) -> Result<ConsolidationReport> {
        fs::create_dir_all(&self.lang_dir)?;
        let mut report = ConsolidationReport::default();
        // The parent root contains the output directory, so retained
        // folders would otherwise be visited twice.
        let mut visited = BTreeSet::new();

        for root in self.search_roots() {
            for language in self.languages {
                for found in find_named_dirs(root, language.as_str()) {
                    if visited.insert(found.clone()) {
                        self.merge_folder(language, &found, &mut report)?;
                    }
                }
            }
        }

        Ok(report)
    }

    /// Move the regular files directly inside `found` into `Lang/<code>`,
    /// then try to remove `found`.
    fn merge_folder(
        &self,
        language: &LanguageCode,
        found: &Utf8Path,
        report: &mut ConsolidationReport,
    ) -> Result<()> {
        let dest = self.lang_dir.join(language.as_str());
        if found == dest || self.excluded.iter().any(|e| found.starts_with(e)) {
            return Ok(());
        }
        // A previous pass may already have removed this folder.
        if !found.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(&dest)?;
        let files = regular_files_in(found)?;
        for file in &files {
            let Some(name) = file.file_name() else {
                continue;
            };
            let dest_file = dest.join(name);
            move_file(file, &dest_file)?;
            debug!("moved {file} -> {dest_file}");
        }
        *report.moved.entry(language.clone()).or_default() += files.len();

        match fs::remove_dir(found) {
            Ok(()) => report.removed_dirs.push(found.to_owned()),
            Err(err) => {
                debug!("kept {found}: {err}");
                report.retained_dirs.push(found.to_owned());
            }
        }
        Ok(())
    }
}

/// Recursively collect directories beneath `root` whose name is exactly
/// `name`.
///
/// The walk finishes before the caller mutates anything. Symbolic links are
/// not followed and `root` itself is never a match. Directories that cannot
/// be read and entries with non-UTF-8 names are skipped.
#[must_use]
pub fn find_named_dirs(root: &Utf8Path, name: &str) -> Vec<Utf8PathBuf> {
    let mut matches = Vec::new();
    let mut pending = vec![root.to_owned()];

    while let Some(dir) = pending.pop() {
        let entries = match dir.read_dir_utf8() {
            Ok(entries) => entries,
            Err(err) => {
                debug!("skipping unreadable directory {dir}: {err}");
                continue;
            }
        };
        let mut children = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping entry in {dir}: {err}");
                    continue;
                }
            };
            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => children.push(entry.into_path()),
                Ok(_) => {}
                Err(err) => debug!("skipping {}: {err}", entry.path()),
            }
        }
        children.sort();
        for child in children.into_iter().rev() {
            if child.file_name() == Some(name) {
                matches.push(child.clone());
            }
            pending.push(child);
        }
    }

    matches.sort();
    matches
}

/// List the regular files directly inside `dir`, sorted by name.
fn regular_files_in(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Move a file, falling back to copy-and-delete when a rename is not
/// possible (for example across filesystems). An existing file at `to` is
/// replaced.
///
/// # Errors
///
/// Returns [`PackagerError::LanguageMove`] if neither strategy succeeds.
pub fn move_file(from: &Utf8Path, to: &Utf8Path) -> Result<()> {
    let wrap = |source| PackagerError::LanguageMove {
        from: from.to_owned(),
        to: to.to_owned(),
        source,
    };

    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to).map_err(wrap)?;
    fs::remove_file(from).map_err(wrap)
}

#[cfg(test)]
#[path = "language_tests.rs"]
mod tests;
