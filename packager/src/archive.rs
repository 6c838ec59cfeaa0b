//! Zip archive creation from the staging tree.
//!
//! Every entry in the archive begins with the staging directory's name, so
//! extracting the archive yields exactly one top-level folder. The archive
//! is written to a temporary file beside its destination and renamed into
//! place once complete.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;
use std::io::{Seek, Write};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entry counts for a written archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Directory entries, including the top-level folder.
    pub dirs: usize,
    /// File entries.
    pub files: usize,
}

fn archive_error(path: &Utf8Path, err: impl std::fmt::Display) -> PackagerError {
    PackagerError::Archive {
        path: path.to_owned(),
        reason: err.to_string(),
    }
}

/// Delete an archive left by an earlier run so the new one replaces it
/// rather than merging with it. Returns whether a file was removed.
///
/// # Errors
///
/// Returns [`PackagerError::Archive`] if the existing file cannot be removed.
pub fn remove_existing_archive(path: &Utf8Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("removed previous archive {path}");
            Ok(true)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(archive_error(path, err)),
    }
}

/// Write a zip of `root` to `writer`, naming every entry
/// `<root_name>/<relative path>` with `/` separators.
///
/// Entries are written in sorted order so identical trees give identical
/// entry lists.
///
/// # Errors
///
/// Returns an error if the tree cannot be read or the archive cannot be
/// written.
pub fn write_zip<W: Write + Seek>(root: &Utf8Path, root_name: &str, writer: W) -> Result<ArchiveStats> {
    let mut zip = ZipWriter::new(writer);
    let dir_options = SimpleFileOptions::default();
    let mut stats = ArchiveStats::default();

    zip.add_directory(format!("{root_name}/"), dir_options)
        .map_err(|e| archive_error(root, e))?;
    stats.dirs += 1;

    let mut pending = vec![(root.to_owned(), root_name.to_owned())];
    while let Some((dir, prefix)) = pending.pop() {
        let mut entries = Vec::new();
        for entry in dir.read_dir_utf8()? {
            let entry = entry?;
            let is_dir = entry.file_type()?.is_dir();
            entries.push((entry.into_path(), is_dir));
        }
        entries.sort();

        let mut subdirs = Vec::new();
        for (path, is_dir) in entries {
            let Some(name) = path.file_name() else {
                continue;
            };
            let entry_name = format!("{prefix}/{name}");
            if is_dir {
                zip.add_directory(format!("{entry_name}/"), dir_options)
                    .map_err(|e| archive_error(&path, e))?;
                stats.dirs += 1;
                subdirs.push((path.clone(), entry_name));
            } else {
                let mut file = fs::File::open(&path)?;
                let large = file.metadata()?.len() >= u64::from(u32::MAX);
                let options = SimpleFileOptions::default()
                    .compression_method(CompressionMethod::Deflated)
                    .large_file(large);
                zip.start_file(entry_name, options)
                    .map_err(|e| archive_error(&path, e))?;
                std::io::copy(&mut file, &mut zip)?;
                stats.files += 1;
            }
        }
        pending.extend(subdirs.into_iter().rev());
    }

    zip.finish().map_err(|e| archive_error(root, e))?;
    Ok(stats)
}

/// Archive the staging directory into `dest`.
///
/// The zip is built in a temporary file in `dest`'s directory and then
/// renamed to `dest`, replacing any file already there.
///
/// # Errors
///
/// Returns [`PackagerError::Archive`] if the staging directory has no name,
/// the temporary file cannot be created, or the final rename fails.
pub fn create_archive(staging_dir: &Utf8Path, dest: &Utf8Path) -> Result<ArchiveStats> {
    let root_name = staging_dir
        .file_name()
        .ok_or_else(|| archive_error(dest, "staging directory has no name"))?;
    let dest_dir = dest
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_owned);

    let mut tmp = NamedTempFile::new_in(&dest_dir).map_err(|e| archive_error(dest, e))?;
    let stats = write_zip(staging_dir, root_name, tmp.as_file_mut())?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(dest).map_err(|e| archive_error(dest, e.error))?;

    debug!(
        "wrote {dest}: {} files, {} directories",
        stats.files, stats.dirs
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
