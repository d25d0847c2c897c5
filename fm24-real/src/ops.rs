//! Backup-then-delete over the manifest.
//!
//! Every path is backed up immediately before it is removed. A failed
//! backup is logged and recorded but does not stop the removal, and a failed
//! removal does not stop the remaining targets.

use crate::backup::BackupDestination;
use crate::locator::ResolvedBase;
use crate::manifest::{PatternScan, TargetEntry};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What happened to one removed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub path: PathBuf,
    pub backed_up: bool,
    pub removed: bool,
    /// Removal error, if any
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetState {
    /// Nothing to remove
    Absent,
    /// The target directory could not be listed
    Unreadable(String),
    /// Paths that were backed up and removed
    Processed(Vec<ItemOutcome>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub description: String,
    pub path: PathBuf,
    pub state: TargetState,
}

impl TargetOutcome {
    pub fn items(&self) -> &[ItemOutcome] {
        match &self.state {
            TargetState::Processed(items) => items,
            _ => &[],
        }
    }

    pub fn removed(&self) -> usize {
        self.items().iter().filter(|i| i.removed).count()
    }
}

/// Summary of one apply/update run.
#[derive(Debug, Clone)]
pub struct OperationResult {
    pub targets: Vec<TargetOutcome>,
    pub backup_dir: PathBuf,
}

impl OperationResult {
    /// Manifest entries plus pattern-scan matches
    pub fn total(&self) -> usize {
        self.targets.len()
    }

    /// Paths actually removed
    pub fn deleted(&self) -> usize {
        self.targets.iter().map(TargetOutcome::removed).sum()
    }

    /// Targets that were already gone
    pub fn absent(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| t.state == TargetState::Absent)
            .count()
    }

    /// Removal errors, including directories that could not be listed
    pub fn failed(&self) -> usize {
        self.targets
            .iter()
            .map(|t| match &t.state {
                TargetState::Unreadable(_) => 1,
                TargetState::Processed(items) => items.iter().filter(|i| !i.removed).count(),
                TargetState::Absent => 0,
            })
            .sum()
    }

    /// Paths whose backup failed or was incomplete
    pub fn backup_failures(&self) -> usize {
        self.targets
            .iter()
            .flat_map(|t| t.items())
            .filter(|i| !i.backed_up)
            .count()
    }
}

/// Back up and remove every manifest target, then every pattern-scan match.
pub fn run(
    base: &ResolvedBase,
    manifest: &[TargetEntry],
    scan: &PatternScan,
    backup: &BackupDestination,
) -> OperationResult {
    info!("Processing {} targets in {}", manifest.len(), base.path().display());

    let mut targets = Vec::with_capacity(manifest.len());

    for entry in manifest {
        let path = entry.full_path(base.path());
        let state = if entry.clears_contents() {
            clear_directory(base.path(), &path, backup)
        } else if fs::symlink_metadata(&path).is_ok() {
            TargetState::Processed(vec![backup_then_remove(base.path(), &path, backup)])
        } else {
            TargetState::Absent
        };

        log_target(entry.description, &state);
        targets.push(TargetOutcome {
            description: entry.description.to_string(),
            path,
            state,
        });
    }

    let matches = match scan.find_matches(base.path()) {
        Ok(matches) => matches,
        Err(e) => {
            warn!("Cannot scan {}: {}", scan.directory.display(), e);
            Vec::new()
        }
    };

    for path in matches {
        let description = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let state = TargetState::Processed(vec![backup_then_remove(base.path(), &path, backup)]);

        log_target(&description, &state);
        targets.push(TargetOutcome {
            description,
            path,
            state,
        });
    }

    OperationResult {
        targets,
        backup_dir: backup.dir().to_path_buf(),
    }
}

/// Remove each immediate child of `dir`, keeping `dir` itself.
fn clear_directory(base: &Path, dir: &Path, backup: &BackupDestination) -> TargetState {
    if !dir.is_dir() {
        return TargetState::Absent;
    }

    let mut children = match fs::read_dir(dir).and_then(|entries| {
        entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
    }) {
        Ok(children) => children,
        Err(e) => {
            warn!("Cannot list {}: {}", dir.display(), e);
            return TargetState::Unreadable(e.to_string());
        }
    };

    children.sort();

    TargetState::Processed(
        children
            .iter()
            .map(|child| backup_then_remove(base, child, backup))
            .collect(),
    )
}

fn backup_then_remove(base: &Path, path: &Path, backup: &BackupDestination) -> ItemOutcome {
    let backed_up = match backup.backup(base, path) {
        Ok(stats) if stats.is_complete() => true,
        Ok(stats) => {
            warn!(
                "Backup of {} is incomplete: {} files skipped",
                path.display(),
                stats.files_skipped
            );
            false
        }
        Err(e) => {
            warn!("Backup failed for {}: {}", path.display(), e);
            false
        }
    };

    match remove_path(path) {
        Ok(()) => ItemOutcome {
            path: path.to_path_buf(),
            backed_up,
            removed: true,
            error: None,
        },
        Err(e) => {
            warn!("Failed to delete {}: {}", path.display(), e);
            ItemOutcome {
                path: path.to_path_buf(),
                backed_up,
                removed: false,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Remove a file, a symlink, or a whole directory tree.
fn remove_path(path: &Path) -> std::io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn log_target(description: &str, state: &TargetState) {
    match state {
        TargetState::Absent => info!("{}: not found", description),
        TargetState::Unreadable(e) => warn!("{}: cannot be listed: {}", description, e),
        TargetState::Processed(items) => {
            let removed = items.iter().filter(|i| i.removed).count();
            info!("{}: removed {} of {}", description, removed, items.len());
        }
    }
}
