//! Configuration management for fm24-real.
//!
//! Loads configuration from a TOML file. A missing file means defaults.

use crate::utils::errors::{Result, ToolError};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Database directory below a Football Manager 2024 install root.
pub const FM_DB_SUFFIX: &str = "data/database/db";

/// Name of the backup folder created in the user's home directory.
const DEFAULT_BACKUP_DIR_NAME: &str = "FM24_Backup";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Candidate database directories, checked in order
    #[serde(default)]
    pub install_paths: Vec<InstallPath>,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// One place the game may be installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallPath {
    /// Short identifier, e.g. `windows-steam`
    pub name: String,

    /// Path of the `data/database/db` directory
    pub path: PathBuf,

    /// Platform tag (`windows`, `macos`, `linux`; `darwin` is accepted)
    pub platform: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Backups must stay enabled for apply/update to run
    #[serde(default = "default_backup_enabled")]
    pub enabled: bool,

    /// Root under which one timestamped folder per run is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: default_backup_enabled(),
            directory: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_backup_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// The current user's home directory, or `.` when the platform reports none.
pub fn home_dir() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `~/.config/fm24-real/config.toml`
pub fn default_config_path() -> PathBuf {
    default_config_path_in(&home_dir())
}

fn default_config_path_in(home: &Path) -> PathBuf {
    home.join(".config").join("fm24-real").join("config.toml")
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ToolError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        tracing::info!("Wrote config to {}", path.display());
        Ok(())
    }

    /// Backup root, defaulting to `~/FM24_Backup` when unset or empty.
    pub fn backup_root(&self) -> PathBuf {
        match &self.backup.directory {
            Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
            _ => home_dir().join(DEFAULT_BACKUP_DIR_NAME),
        }
    }

    /// Default configuration for the given home directory.
    pub fn for_home(home: &Path) -> Self {
        let mac_support = home.join("Library/Application Support");

        Config {
            install_paths: vec![
                InstallPath {
                    name: "windows-steam".to_string(),
                    path: PathBuf::from(
                        r"C:\Program Files (x86)\Steam\steamapps\common\Football Manager 2024\data\database\db",
                    ),
                    platform: "windows".to_string(),
                    description: "Windows Steam".to_string(),
                },
                InstallPath {
                    name: "windows-epic".to_string(),
                    path: PathBuf::from(
                        r"C:\Program Files\Epic Games\Football Manager 2024\data\database\db",
                    ),
                    platform: "windows".to_string(),
                    description: "Windows Epic Games".to_string(),
                },
                InstallPath {
                    name: "macos-steam".to_string(),
                    path: mac_support
                        .join("Steam/steamapps/common/Football Manager 2024")
                        .join(FM_DB_SUFFIX),
                    platform: "macos".to_string(),
                    description: "macOS Steam".to_string(),
                },
                InstallPath {
                    name: "macos-appstore".to_string(),
                    path: mac_support
                        .join("Sports Interactive/Football Manager 2024")
                        .join(FM_DB_SUFFIX),
                    platform: "macos".to_string(),
                    description: "macOS App Store".to_string(),
                },
            ],
            backup: BackupConfig {
                enabled: true,
                directory: Some(home.join(DEFAULT_BACKUP_DIR_NAME)),
            },
            log: LogConfig::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_home(&home_dir())
    }
}
