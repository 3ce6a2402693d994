//! Storage error types.

use thiserror::Error;

/// Errors that can occur when using the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend failure (I/O, locking).
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Value failed to serialize or deserialize.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Key is not usable as a storage key.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}
