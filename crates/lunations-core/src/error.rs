//! Error types for lunations-core

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::records::RecordError;
use crate::sources::SourceError;
use crate::window::WindowError;

/// Result type alias for digest operations
pub type Result<T> = std::result::Result<T, DigestError>;

/// Main error type for a digest run
#[derive(Error, Debug)]
pub enum DigestError {
    /// Configuration could not be loaded or is incomplete
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Record file could not be read or written
    #[error("Record error: {0}")]
    Records(#[from] RecordError),

    /// The ADS query failed
    #[error("Search error: {0}")]
    Source(#[from] SourceError),

    /// Requested year/month is not a valid window
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Digest file could not be written
    #[error("Failed to write digest {path}: {message}")]
    DigestWrite { path: PathBuf, message: String },
}
