//! Custom error types for fm24-real.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The path given with `--path` does not exist.
    #[error("Specified path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The directory exists but holds no integer-named version folder.
    #[error("No version folder found under {}", .0.display())]
    NoVersionFolder(PathBuf),

    #[error(
        "Football Manager 2024 installation not found. Check the install_paths in your \
         config file or pass the database directory with --path"
    )]
    InstallationNotFound,

    #[error("Backups are disabled in the config; refusing to delete files without a backup")]
    BackupDisabled,

    #[error("{} is not inside {}", .path.display(), .base.display())]
    InvalidTarget { path: PathBuf, base: PathBuf },
}

pub type Result<T> = std::result::Result<T, ToolError>;
