//! The `newest.txt` version record.
//!
//! The updater reads this file to learn which release was packaged last, so
//! it holds the version string exactly as given with nothing appended.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Write `version` verbatim to `<project_dir>/<file_name>`, replacing any
/// previous content, and return the path written.
///
/// # Errors
///
/// Returns [`PackagerError::VersionRecord`] if the file cannot be written.
pub fn write_version_record(
    project_dir: &Utf8Path,
    file_name: &str,
    version: &str,
) -> Result<Utf8PathBuf> {
    let path = project_dir.join(file_name);
    fs::write(&path, version).map_err(|source| PackagerError::VersionRecord {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
