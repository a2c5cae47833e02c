//! Storage errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the key-value backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the store file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The store file is not a JSON object of strings
    #[error("Malformed store file {}: {source}", path.display())]
    Malformed {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Encoding the store contents failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
