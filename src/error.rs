//! Error types for phrasemark

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for phrasemark operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlighter error types
///
/// Resolution itself never fails; these cover the surfaces around it.
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot write config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Message(String),
}
