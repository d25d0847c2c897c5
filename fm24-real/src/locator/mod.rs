//! Installation discovery.
//!
//! The game keeps its database in `.../data/database/db/<version>`, where
//! `<version>` is an integer-named folder such as `2400` or `2440`. A base
//! path only counts as an installation when it holds at least one such
//! folder; a base that exists but has none is skipped, not reported.
//!
//! Discovery order:
//! 1. the `--path` override (must exist, no fallback)
//! 2. configured candidates for the current platform, first match wins
//! 3. well-known install locations for the platform
//! 4. Steam libraries listed in `libraryfolders.vdf`

pub mod steam;

use crate::config::{home_dir, InstallPath, FM_DB_SUFFIX};
use crate::utils::errors::{Result, ToolError};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Install folder name used by Steam and the macOS App Store build.
pub const FM_FOLDER: &str = "Football Manager 2024";

/// How a [`ResolvedBase`] was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseSource {
    Override,
    Candidate { name: String, description: String },
    WellKnown,
    SteamLibrary,
}

impl fmt::Display for BaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseSource::Override => write!(f, "--path"),
            BaseSource::Candidate { name, description } if description.is_empty() => {
                write!(f, "{}", name)
            }
            BaseSource::Candidate { name, description } => write!(f, "{} ({})", description, name),
            BaseSource::WellKnown => write!(f, "auto-scan"),
            BaseSource::SteamLibrary => write!(f, "Steam library"),
        }
    }
}

/// The versioned database directory used for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBase {
    install_root: PathBuf,
    version: u64,
    path: PathBuf,
    source: BaseSource,
}

impl ResolvedBase {
    /// Pick the highest version folder below `install_root`.
    pub fn from_install_root(install_root: &Path, source: BaseSource) -> Result<Self> {
        let (version, name) = latest_version_folder(install_root)?;
        Ok(Self {
            install_root: install_root.to_path_buf(),
            version,
            path: install_root.join(name),
            source,
        })
    }

    /// `<install_root>/<version>`
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn source(&self) -> &BaseSource {
        &self.source
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }
}

/// Return the numerically largest all-digit subdirectory of `base`.
///
/// Names that tie numerically (`0100` and `100`) are ordered by name so the
/// choice does not depend on directory listing order.
pub fn latest_version_folder(base: &Path) -> Result<(u64, String)> {
    let mut latest: Option<(u64, String)> = None;

    for entry in std::fs::read_dir(base)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        let Some(version) = parse_version(&name) else {
            continue;
        };

        let candidate = (version, name);
        if latest.as_ref().map_or(true, |current| candidate > *current) {
            latest = Some(candidate);
        }
    }

    latest.ok_or_else(|| ToolError::NoVersionFolder(base.to_path_buf()))
}

fn parse_version(name: &str) -> Option<u64> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// True when a configured platform tag refers to `platform`.
///
/// Tags are compared case-insensitively and `darwin` is treated as `macos`.
pub fn platform_matches(tag: &str, platform: &str) -> bool {
    fn normalize(tag: &str) -> String {
        let tag = tag.trim().to_ascii_lowercase();
        if tag == "darwin" {
            "macos".to_string()
        } else {
            tag
        }
    }
    normalize(tag) == normalize(platform)
}

/// Finds the database directory for one platform.
#[derive(Debug, Clone)]
pub struct Locator {
    platform: String,
    home: PathBuf,
}

impl Locator {
    pub fn new(platform: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            platform: platform.into(),
            home: home.into(),
        }
    }

    /// Locator for the running OS and the current user's home.
    pub fn for_current_system() -> Self {
        Self::new(std::env::consts::OS, home_dir())
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Resolve the versioned database directory.
    pub fn resolve(
        &self,
        candidates: &[InstallPath],
        override_path: Option<&Path>,
    ) -> Result<ResolvedBase> {
        if let Some(path) = override_path {
            if !path.exists() {
                return Err(ToolError::PathNotFound(path.to_path_buf()));
            }
            let resolved = ResolvedBase::from_install_root(path, BaseSource::Override)?;
            info!("Using custom path {}", resolved.path().display());
            return Ok(resolved);
        }

        for candidate in candidates
            .iter()
            .filter(|c| platform_matches(&c.platform, &self.platform))
        {
            if !candidate.path.exists() {
                continue;
            }
            let source = BaseSource::Candidate {
                name: candidate.name.clone(),
                description: candidate.description.clone(),
            };
            match ResolvedBase::from_install_root(&candidate.path, source) {
                Ok(resolved) => {
                    info!("Detected {}", resolved.source());
                    return Ok(resolved);
                }
                Err(e) => debug!("Skipping candidate {}: {}", candidate.name, e),
            }
        }

        info!("No configured path matched, scanning well-known locations");
        self.scan()
    }

    /// Fallback discovery over hard-coded locations and Steam libraries.
    fn scan(&self) -> Result<ResolvedBase> {
        let well_known = self
            .well_known_locations()
            .into_iter()
            .map(|path| (path, BaseSource::WellKnown));
        let steam = steam::library_roots(&self.platform, &self.home)
            .into_iter()
            .flat_map(|root| steam::install_subpaths(&self.platform, &root))
            .map(|path| (path, BaseSource::SteamLibrary));

        for (path, source) in well_known.chain(steam) {
            if !path.exists() {
                continue;
            }
            match ResolvedBase::from_install_root(&path, source) {
                Ok(resolved) => {
                    info!("Auto-detected {}", path.display());
                    return Ok(resolved);
                }
                Err(e) => debug!("Skipping {}: {}", path.display(), e),
            }
        }

        Err(ToolError::InstallationNotFound)
    }

    /// Common install locations, most likely first.
    pub fn well_known_locations(&self) -> Vec<PathBuf> {
        if platform_matches("windows", &self.platform) {
            [
                r"C:\Program Files (x86)\Steam\steamapps\common\Football Manager 2024",
                r"C:\Program Files\Steam\steamapps\common\Football Manager 2024",
                r"C:\Program Files\Epic Games\Football Manager 2024",
                r"C:\Program Files\Epic Games\FootballManager2024",
                r"C:\XboxGames\Football Manager 2024\Content",
                r"D:\SteamLibrary\steamapps\common\Football Manager 2024",
                r"E:\SteamLibrary\steamapps\common\Football Manager 2024",
                r"F:\SteamLibrary\steamapps\common\Football Manager 2024",
            ]
            .iter()
            .map(|root| PathBuf::from(format!(r"{}\data\database\db", root)))
            .collect()
        } else if platform_matches("macos", &self.platform) {
            let support = self.home.join("Library/Application Support");
            let steam_game = support.join("Steam/steamapps/common").join(FM_FOLDER);
            vec![
                steam_game.join(FM_DB_SUFFIX),
                support
                    .join("Sports Interactive")
                    .join(FM_FOLDER)
                    .join(FM_DB_SUFFIX),
                PathBuf::from("/Users/Shared/Epic Games/FootballManager2024").join(FM_DB_SUFFIX),
                steam_game.join("database/data/db"),
            ]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn candidate(name: &str, path: &Path, platform: &str) -> InstallPath {
        InstallPath {
            name: name.to_string(),
            path: path.to_path_buf(),
            platform: platform.to_string(),
            description: String::new(),
        }
    }

    fn make_versions(base: &Path, versions: &[&str]) -> std::io::Result<()> {
        for version in versions {
            fs::create_dir_all(base.join(version))?;
        }
        Ok(())
    }

    #[test]
    fn test_version_folder_is_numeric_max() -> Result<()> {
        let temp_dir = TempDir::new()?;
        make_versions(temp_dir.path(), &["10", "9", "100"])?;

        let (version, name) = latest_version_folder(temp_dir.path())?;
        assert_eq!(version, 100);
        assert_eq!(name, "100");
        Ok(())
    }

    #[test]
    fn test_version_folder_ignores_non_numeric() -> Result<()> {
        let temp_dir = TempDir::new()?;
        make_versions(temp_dir.path(), &["2400", "2440_old", "-1", "+5", "backup"])?;
        fs::write(temp_dir.path().join("9999"), b"a file, not a folder")?;

        let (version, _) = latest_version_folder(temp_dir.path())?;
        assert_eq!(version, 2400);
        Ok(())
    }

    #[test]
    fn test_no_version_folder() -> Result<()> {
        let temp_dir = TempDir::new()?;
        make_versions(temp_dir.path(), &["lnc", "dbc"])?;

        assert!(matches!(
            latest_version_folder(temp_dir.path()),
            Err(ToolError::NoVersionFolder(_))
        ));
        Ok(())
    }

    #[test]
    fn test_platform_matches() {
        assert!(platform_matches("darwin", "macos"));
        assert!(platform_matches("MacOS", "darwin"));
        assert!(platform_matches("windows", "windows"));
        assert!(!platform_matches("windows", "linux"));
    }

    #[test]
    fn test_override_must_exist() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let good = temp_dir.path().join("good");
        make_versions(&good, &["2400"])?;

        let locator = Locator::new("linux", temp_dir.path());
        let result = locator.resolve(
            &[candidate("good", &good, "linux")],
            Some(&temp_dir.path().join("missing")),
        );
        assert!(matches!(result, Err(ToolError::PathNotFound(_))));
        Ok(())
    }

    #[test]
    fn test_override_without_version_is_fatal() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let locator = Locator::new("linux", temp_dir.path());
        let result = locator.resolve(&[], Some(temp_dir.path()));
        assert!(matches!(result, Err(ToolError::NoVersionFolder(_))));
        Ok(())
    }

    #[test]
    fn test_override_resolves_latest_version() -> Result<()> {
        let temp_dir = TempDir::new()?;
        make_versions(temp_dir.path(), &["2400", "2410"])?;

        let locator = Locator::new("linux", temp_dir.path());
        let resolved = locator.resolve(&[], Some(temp_dir.path()))?;
        assert_eq!(resolved.path(), temp_dir.path().join("2410"));
        assert_eq!(resolved.version(), 2410);
        assert_eq!(resolved.source(), &BaseSource::Override);
        Ok(())
    }

    #[test]
    fn test_first_matching_candidate_wins() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let other_platform = temp_dir.path().join("win");
        let empty = temp_dir.path().join("empty");
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        make_versions(&other_platform, &["9999"])?;
        fs::create_dir_all(&empty)?;
        make_versions(&first, &["2400", "2430"])?;
        make_versions(&second, &["2500"])?;

        let candidates = vec![
            candidate("win", &other_platform, "windows"),
            candidate("missing", &temp_dir.path().join("missing"), "linux"),
            candidate("empty", &empty, "linux"),
            candidate("first", &first, "linux"),
            candidate("second", &second, "linux"),
        ];

        let locator = Locator::new("linux", temp_dir.path());
        let resolved = locator.resolve(&candidates, None)?;
        assert_eq!(resolved.path(), first.join("2430"));
        assert!(matches!(
            resolved.source(),
            BaseSource::Candidate { name, .. } if name == "first"
        ));
        Ok(())
    }

    #[test]
    fn test_nothing_found() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let empty = temp_dir.path().join("empty");
        fs::create_dir_all(&empty)?;

        let locator = Locator::new("linux", temp_dir.path());
        let result = locator.resolve(&[candidate("empty", &empty, "linux")], None);
        assert!(matches!(result, Err(ToolError::InstallationNotFound)));
        Ok(())
    }

    #[test]
    fn test_falls_back_to_well_known_macos_location() -> Result<()> {
        let home = TempDir::new()?;
        let app_store = home
            .path()
            .join("Library/Application Support/Sports Interactive/Football Manager 2024/data/database/db");
        make_versions(&app_store, &["2400"])?;

        let locator = Locator::new("macos", home.path());
        let resolved = locator.resolve(&[], None)?;
        assert_eq!(resolved.path(), app_store.join("2400"));
        assert_eq!(resolved.source(), &BaseSource::WellKnown);
        Ok(())
    }

    #[test]
    fn test_falls_back_to_steam_library() -> Result<()> {
        let home = TempDir::new()?;
        let library = TempDir::new()?;

        let steamapps = home.path().join("Library/Application Support/Steam/steamapps");
        fs::create_dir_all(&steamapps)?;
        fs::write(
            steamapps.join("libraryfolders.vdf"),
            format!("\"path\"\t\t\"{}\"\n", library.path().display()),
        )?;

        let db = library
            .path()
            .join("steamapps/common/Football Manager 2024/data/database/db");
        make_versions(&db, &["2400", "2410"])?;

        let locator = Locator::new("darwin", home.path());
        let resolved = locator.resolve(&[], None)?;
        assert_eq!(resolved.path(), db.join("2410"));
        assert_eq!(resolved.source(), &BaseSource::SteamLibrary);
        Ok(())
    }

    #[test]
    fn test_well_known_windows_locations() {
        let locator = Locator::new("windows", "/unused");
        let paths = locator.well_known_locations();
        assert_eq!(paths.len(), 8);
        assert!(paths[0]
            .to_string_lossy()
            .ends_with(r"Football Manager 2024\data\database\db"));
        assert!(Locator::new("linux", "/unused").well_known_locations().is_empty());
    }
}
