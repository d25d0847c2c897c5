//! fm24-real library
//!
//! Finds a Football Manager 2024 database directory and removes the
//! licensing files that replace real names, backing each one up first.

pub mod backup;
pub mod cli;
pub mod config;
pub mod fs;
pub mod locator;
pub mod manifest;
pub mod ops;
pub mod report;
pub mod status;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use locator::{Locator, ResolvedBase};
pub use ops::OperationResult;
pub use utils::errors::ToolError;
pub type Result<T> = std::result::Result<T, ToolError>;
