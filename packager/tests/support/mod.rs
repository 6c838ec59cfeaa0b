//! Shared helpers for the packager's integration tests.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use tempfile::TempDir;

/// Creates a temporary directory and returns it with its canonical UTF-8
/// path, so comparisons against the packager's canonicalised paths hold on
/// platforms where the temp dir sits behind a symlink.
pub fn canonical_temp_root() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().expect("temp dir creation succeeds");
    let canonical = temp_dir.path().canonicalize().expect("canonical temp dir");
    let root = Utf8PathBuf::try_from(canonical).expect("utf-8 temp path");
    (temp_dir, root)
}

/// Lists the entry names of a zip archive in sorted order.
pub fn archive_entries(path: &Utf8Path) -> Vec<String> {
    let file = File::open(path).expect("open archive");
    let archive = zip::ZipArchive::new(file).expect("read archive");
    let mut names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    names.sort();
    names
}
