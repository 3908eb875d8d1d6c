//! Cache error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The store directory could not be created.
    #[error("Failed to open store at {}: {source}", .dir.display())]
    OpenError {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored value is not valid JSON for the requested type.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The store could not complete an operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// Filesystem error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
