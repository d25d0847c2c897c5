//! Steam library discovery.
//!
//! Steam records every library folder in `steamapps/libraryfolders.vdf`:
//!
//! ```text
//! "libraryfolders"
//! {
//!     "0"
//!     {
//!         "path"      "C:\\Program Files (x86)\\Steam"
//!         ...
//! ```
//!
//! Only the `"path"` values are needed, so the file is scanned line by line
//! instead of being parsed as a full KeyValues document.

use super::{platform_matches, FM_FOLDER};
use crate::config::FM_DB_SUFFIX;
use std::path::{Path, PathBuf};

/// Extract every library `"path"` value from a `libraryfolders.vdf` body.
pub fn parse_library_folders(content: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();

    for line in content.lines() {
        let mut parts = line.trim().split('"').filter(|part| !part.trim().is_empty());
        if parts.next() != Some("path") {
            continue;
        }
        let Some(value) = parts.next() else {
            continue;
        };

        let path = PathBuf::from(value.replace("\\\\", "\\"));
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    paths
}

fn default_steam_roots(platform: &str, home: &Path) -> Vec<PathBuf> {
    if platform_matches("windows", platform) {
        vec![
            PathBuf::from(r"C:\Program Files (x86)\Steam"),
            PathBuf::from(r"C:\Program Files\Steam"),
        ]
    } else if platform_matches("macos", platform) {
        vec![home.join("Library/Application Support/Steam")]
    } else {
        Vec::new()
    }
}

/// Existing Steam library roots for a platform.
pub fn library_roots(platform: &str, home: &Path) -> Vec<PathBuf> {
    library_roots_from(&default_steam_roots(platform, home))
}

/// Libraries listed in each root's `steamapps/libraryfolders.vdf` first,
/// then the Steam roots themselves. Only existing directories are kept.
pub fn library_roots_from(steam_roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();

    for steam_root in steam_roots {
        let vdf = steam_root.join("steamapps/libraryfolders.vdf");
        match std::fs::read_to_string(&vdf) {
            Ok(content) => {
                for library in parse_library_folders(&content) {
                    if !roots.contains(&library) {
                        roots.push(library);
                    }
                }
            }
            Err(e) => tracing::debug!("No Steam library file at {}: {}", vdf.display(), e),
        }
    }

    for root in steam_roots {
        if !roots.contains(root) {
            roots.push(root.clone());
        }
    }

    roots.retain(|root| root.exists());
    roots
}

/// Database directories the game may use inside a Steam library.
pub fn install_subpaths(platform: &str, library_root: &Path) -> Vec<PathBuf> {
    let game_dir = library_root.join("steamapps/common").join(FM_FOLDER);
    let mut paths = vec![game_dir.join(FM_DB_SUFFIX)];

    // Some macOS builds ship the database as database/data/db.
    if platform_matches("macos", platform) {
        paths.push(game_dir.join("database/data/db"));
    }

    paths
}
