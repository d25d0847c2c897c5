//! Directory traversal for directory backups.
//!
//! Collects every entry below a root together with its path relative to
//! that root. Unreadable entries are counted and logged instead of aborting
//! the walk, since a partial backup is still worth keeping.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Information about an entry discovered during walking
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Full path to the entry
    pub path: PathBuf,

    /// Relative path from the root
    pub relative_path: PathBuf,

    /// File size in bytes (0 for directories)
    pub size: u64,

    /// Is this a directory?
    pub is_dir: bool,

    /// Is this a symlink?
    pub is_symlink: bool,
}

impl FileInfo {
    /// Create FileInfo from a DirEntry.
    /// Symlinks are resolved so a link to a file is backed up as that file.
    /// Returns None for links to directories and broken links.
    fn from_entry(entry: &DirEntry, root: &Path) -> std::io::Result<Option<Self>> {
        let path = entry.path().to_path_buf();
        let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        let is_symlink = entry.path_is_symlink();

        let (size, is_dir) = if is_symlink {
            match std::fs::metadata(&path) {
                Ok(resolved) if resolved.is_dir() => return Ok(None),
                Ok(resolved) => (resolved.len(), false),
                Err(_) => return Ok(None),
            }
        } else {
            let metadata = entry.metadata()?;
            let is_dir = metadata.is_dir();
            (if is_dir { 0 } else { metadata.len() }, is_dir)
        };

        Ok(Some(Self {
            path,
            relative_path,
            size,
            is_dir,
            is_symlink,
        }))
    }
}

/// Everything found below a root.
#[derive(Debug, Default)]
pub struct WalkResult {
    /// Directories and files, parents before children
    pub entries: Vec<FileInfo>,

    /// Entries that could not be read
    pub skipped: usize,
}

impl WalkResult {
    pub fn files(&self) -> impl Iterator<Item = &FileInfo> {
        self.entries.iter().filter(|e| !e.is_dir)
    }

    pub fn dirs(&self) -> impl Iterator<Item = &FileInfo> {
        self.entries.iter().filter(|e| e.is_dir)
    }

    /// Bytes across all files.
    pub fn total_size(&self) -> u64 {
        self.files().map(|f| f.size).sum()
    }
}

/// Walk the tree below `root` (the root itself is not included).
///
/// # Example
/// ```no_run
/// use fm24_real::fs::walker::walk_tree;
/// use std::path::Path;
///
/// let tree = walk_tree(Path::new("/data"));
/// println!("Found {} files", tree.files().count());
/// ```
pub fn walk_tree(root: &Path) -> WalkResult {
    let mut result = WalkResult::default();

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read entry below {}: {}", root.display(), e);
                result.skipped += 1;
                continue;
            }
        };

        match FileInfo::from_entry(&entry, root) {
            Ok(Some(info)) => result.entries.push(info),
            Ok(None) => {}
            Err(e) => {
                warn!("Cannot stat {}: {}", entry.path().display(), e);
                result.skipped += 1;
            }
        }
    }

    result
}
