//! The product-named staging tree.
//!
//! The archive's top-level folder must be the product name no matter what
//! the build machine called the output directory. The output tree is
//! therefore copied into a sibling folder named after the product and the
//! archive is built from that copy.
//!
//! [`StagingTree`] removes the copy when dropped. Removal is best effort:
//! once the archive exists a leftover staging folder is only clutter, and the
//! next run deletes it before staging again.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::fs;

/// Statistics for a populated staging tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Directories created beneath the staging root.
    pub dirs: usize,
    /// Files copied.
    pub files: usize,
}

/// A staging directory that is removed when the guard goes out of scope.
#[derive(Debug)]
pub struct StagingTree {
    path: Utf8PathBuf,
    removed: bool,
}

impl StagingTree {
    /// Create `<parent>/<name>`, removing a stale one left by an earlier run.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::StagingCollision`] if the staging path is
    /// `output_dir` itself, or [`PackagerError::Staging`] if the stale tree
    /// cannot be removed or the new directory cannot be created.
    pub fn prepare(parent: &Utf8Path, name: &str, output_dir: &Utf8Path) -> Result<Self> {
        let path = parent.join(name);
        if path == output_dir {
            return Err(PackagerError::StagingCollision { path });
        }

        if path.exists() {
            debug!("removing stale staging tree {path}");
            fs::remove_dir_all(&path).map_err(|source| PackagerError::Staging {
                path: path.clone(),
                source,
            })?;
        }

        fs::create_dir(&path).map_err(|source| PackagerError::Staging {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            removed: false,
        })
    }

    /// Return the staging directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Return the directory holding the staging tree.
    #[must_use]
    pub fn parent(&self) -> Option<&Utf8Path> {
        self.path.parent()
    }

    /// Return the staging directory's own name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.file_name().unwrap_or_default()
    }

    /// Recursively copy the contents of `source` into the staging directory.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Staging`] naming the first path that could
    /// not be read, created or copied.
    pub fn populate(&self, source: &Utf8Path) -> Result<CopyStats> {
        copy_tree(source, &self.path)
    }

    /// Remove the staging directory now, returning whether it is gone.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn cleanup(mut self) -> bool {
        self.remove()
    }

    fn remove(&mut self) -> bool {
        if self.removed {
            return true;
        }
        self.removed = true;
        match fs::remove_dir_all(&self.path) {
            Ok(()) => true,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => true,
            Err(err) => {
                debug!("could not remove staging tree {}: {err}", self.path);
                false
            }
        }
    }
}

impl Drop for StagingTree {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Recursively copy the directory `from` into the existing directory `to`.
///
/// Symbolic links to files are copied as regular files; symbolic links to
/// directories are skipped.
///
/// # Errors
///
/// Returns [`PackagerError::Staging`] naming the path that failed.
pub fn copy_tree(from: &Utf8Path, to: &Utf8Path) -> Result<CopyStats> {
    let staging_err = |path: &Utf8Path| {
        let path = path.to_owned();
        move |source| PackagerError::Staging { path, source }
    };

    let mut stats = CopyStats::default();
    let mut pending = vec![(from.to_owned(), to.to_owned())];

    while let Some((src_dir, dest_dir)) = pending.pop() {
        let entries = src_dir.read_dir_utf8().map_err(staging_err(&src_dir))?;
        for entry in entries {
            let entry = entry.map_err(staging_err(&src_dir))?;
            let src = entry.path();
            let dest = dest_dir.join(entry.file_name());
            let file_type = entry.file_type().map_err(staging_err(src))?;

            if file_type.is_dir() {
                fs::create_dir(&dest).map_err(staging_err(&dest))?;
                stats.dirs += 1;
                pending.push((src.to_owned(), dest));
            } else if file_type.is_file() || src.is_file() {
                fs::copy(src, &dest).map_err(staging_err(src))?;
                stats.files += 1;
            } else {
                warn!("not staging {src}: not a regular file or directory");
            }
        }
    }

    Ok(stats)
}
