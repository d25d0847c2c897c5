//! The files fm24-real removes.
//!
//! Paths are relative to the versioned database directory. Directory entries
//! with `delete_all` set are emptied rather than removed, so the game still
//! finds the folder it expects.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// One manifest target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetEntry {
    pub relative_path: &'static str,
    pub description: &'static str,
    pub is_directory: bool,
    pub delete_all: bool,
}

impl TargetEntry {
    const fn file(relative_path: &'static str, description: &'static str) -> Self {
        Self {
            relative_path,
            description,
            is_directory: false,
            delete_all: false,
        }
    }

    const fn directory_contents(relative_path: &'static str, description: &'static str) -> Self {
        Self {
            relative_path,
            description,
            is_directory: true,
            delete_all: true,
        }
    }

    /// Entries whose children are removed one by one.
    pub fn clears_contents(&self) -> bool {
        self.is_directory && self.delete_all
    }

    pub fn full_path(&self, base: &Path) -> PathBuf {
        base.join(self.relative_path)
    }
}

/// Licensing files below `<db>/<version>`.
pub const DEFAULT_MANIFEST: [TargetEntry; 10] = [
    TargetEntry::directory_contents("lnc/all", "lnc/all (all files)"),
    TargetEntry::directory_contents("lnc/greek", "lnc/greek (all files)"),
    TargetEntry::file("edt/permanent/fake.edt", "fake.edt"),
    TargetEntry::file("dbc/permanent/brazil_kits.dbc", "brazil_kits.dbc"),
    TargetEntry::file("dbc/permanent/forbidden names.dbc", "forbidden names.dbc"),
    TargetEntry::file("dbc/permanent/license.dbc", "license.dbc"),
    TargetEntry::file("dbc/permanent/j league non player.dbc", "j league non player.dbc"),
    TargetEntry::file(
        "dbc/permanent/1_japan_removed_clubs.dbc",
        "1_japan_removed_clubs.dbc",
    ),
    TargetEntry::file("language/Licensing2.dbc", "Licensing2.dbc"),
    TargetEntry::file("language/Licensing2_chn.dbc", "Licensing2_chn.dbc"),
];

/// Files in one directory selected by name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternScan {
    pub directory: PathBuf,
    pub prefix: String,
    pub description: String,
}

impl Default for PatternScan {
    /// Japan-related club and name files in `dbc/permanent`.
    fn default() -> Self {
        Self {
            directory: PathBuf::from("dbc/permanent"),
            prefix: "japan".to_string(),
            description: "Japan-related files".to_string(),
        }
    }
}

impl PatternScan {
    /// Regular files in `base/<directory>` whose names start with the prefix,
    /// sorted by name. A missing directory yields no matches.
    pub fn find_matches(&self, base: &Path) -> std::io::Result<Vec<PathBuf>> {
        let dir = base.join(&self.directory);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            if has_prefix(&entry.file_name(), &self.prefix) {
                matches.push(entry.path());
            }
        }
        matches.sort();

        Ok(matches)
    }
}

/// Case-sensitive byte prefix test on a file name.
pub fn has_prefix(name: &OsStr, prefix: &str) -> bool {
    name.as_encoded_bytes().starts_with(prefix.as_bytes())
}
