//! Utility modules for fm24-real.

pub mod errors;
pub mod logger;

pub use errors::{Result, ToolError};
