//! Error types for catalog storage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing the catalog index.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem failure on a specific path.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index file exists but is not a valid catalog.
    #[error("corrupt catalog index {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
