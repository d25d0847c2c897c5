//! Timestamped backups.
//!
//! Each apply/update run gets its own `<root>/<YYYYMMDD_HHMMSS>` folder.
//! Backed-up paths keep their location relative to the versioned database
//! directory, so `<db>/<ver>/lnc/all/x.lnc` lands at `<backup>/lnc/all/x.lnc`
//! and can be restored by copying the folder back.

use crate::fs::walker::walk_tree;
use crate::utils::errors::{Result, ToolError};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// chrono format of the per-run folder name.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Files copied by one backup call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackupStats {
    pub files_copied: usize,
    pub files_skipped: usize,
}

impl BackupStats {
    pub fn is_complete(&self) -> bool {
        self.files_skipped == 0
    }
}

/// The backup folder for one run.
#[derive(Debug, Clone)]
pub struct BackupDestination {
    dir: PathBuf,
}

impl BackupDestination {
    /// Create a fresh `root/<timestamp>` folder.
    ///
    /// An existing folder is never reused: a second run within the same
    /// second gets `<timestamp>_1`, then `_2`, and so on.
    pub fn create(root: &Path, at: DateTime<Local>) -> Result<Self> {
        fs::create_dir_all(root)?;

        let stamp = at.format(TIMESTAMP_FORMAT).to_string();
        let mut dir = root.join(&stamp);
        let mut suffix = 0u32;
        loop {
            match fs::create_dir(&dir) {
                Ok(()) => break,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    suffix += 1;
                    dir = root.join(format!("{}_{}", stamp, suffix));
                }
                Err(e) => return Err(e.into()),
            }
        }

        debug!("Backup directory ready: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn create_now(root: &Path) -> Result<Self> {
        Self::create(root, Local::now())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `src` (a file or a whole directory) to its mirrored location.
    ///
    /// A single file either copies or fails. For a directory, files that
    /// cannot be copied are logged and counted in `files_skipped`.
    pub fn backup(&self, base: &Path, src: &Path) -> Result<BackupStats> {
        let relative = src
            .strip_prefix(base)
            .map_err(|_| ToolError::InvalidTarget {
                path: src.to_path_buf(),
                base: base.to_path_buf(),
            })?;
        let dst = self.dir.join(relative);

        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }

        if fs::metadata(src)?.is_dir() {
            return Ok(copy_tree(src, &dst));
        }

        copy_file(src, &dst)?;
        Ok(BackupStats {
            files_copied: 1,
            files_skipped: 0,
        })
    }
}

/// Copy a file's bytes and permission bits.
fn copy_file(src: &Path, dst: &Path) -> std::io::Result<u64> {
    // fs::copy carries the permission bits over to the destination.
    fs::copy(src, dst)
}

fn copy_tree(src: &Path, dst: &Path) -> BackupStats {
    let mut stats = BackupStats::default();

    if let Err(e) = fs::create_dir_all(dst) {
        warn!("Cannot create {}: {}", dst.display(), e);
    }

    let tree = walk_tree(src);
    stats.files_skipped += tree.skipped;
    debug!(
        "Backing up {} ({} files, {} bytes)",
        src.display(),
        tree.files().count(),
        tree.total_size()
    );

    for dir in tree.dirs() {
        let target = dst.join(&dir.relative_path);
        if let Err(e) = fs::create_dir_all(&target) {
            warn!("Cannot create {}: {}", target.display(), e);
        }
    }

    for file in tree.files() {
        let target = dst.join(&file.relative_path);
        if file.is_symlink {
            debug!("Copying link target of {}", file.path.display());
        }
        match copy_file(&file.path, &target) {
            Ok(_) => stats.files_copied += 1,
            Err(e) => {
                warn!("Backup skipped {}: {}", file.path.display(), e);
                stats.files_skipped += 1;
            }
        }
    }

    stats
}
