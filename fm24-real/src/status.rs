//! Read-only check of which targets are still present.

use crate::locator::ResolvedBase;
use crate::manifest::{PatternScan, TargetEntry};
use crate::utils::errors::Result;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStatus {
    pub description: String,
    pub path: PathBuf,
    pub present: bool,
    /// Child count for directory-contents entries that exist
    pub children: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ExistenceReport {
    pub entries: Vec<EntryStatus>,
    pub scan_description: String,
    /// Pattern-scan matches still on disk
    pub leftovers: Vec<PathBuf>,
}

impl ExistenceReport {
    /// Present manifest entries plus leftover pattern matches.
    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|e| e.present).count() + self.leftovers.len()
    }

    /// Manifest entries already removed or emptied.
    pub fn cleared_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.present).count()
    }

    /// True when nothing is left to remove.
    pub fn is_applied(&self) -> bool {
        self.present_count() == 0
    }
}

/// Report which targets exist without touching anything.
///
/// A directory-contents entry is present only when the directory has at
/// least one child; an empty or missing directory counts as cleared.
pub fn inspect(
    base: &ResolvedBase,
    manifest: &[TargetEntry],
    scan: &PatternScan,
) -> Result<ExistenceReport> {
    let mut entries = Vec::with_capacity(manifest.len());

    for entry in manifest {
        let path = entry.full_path(base.path());
        let (present, children) = if entry.clears_contents() {
            if path.is_dir() {
                let count = fs::read_dir(&path)?.count();
                (count > 0, Some(count))
            } else {
                (false, None)
            }
        } else {
            (fs::symlink_metadata(&path).is_ok(), None)
        };

        entries.push(EntryStatus {
            description: entry.description.to_string(),
            path,
            present,
            children,
        });
    }

    Ok(ExistenceReport {
        entries,
        scan_description: scan.description.clone(),
        leftovers: scan.find_matches(base.path())?,
    })
}
