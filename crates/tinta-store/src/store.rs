//! Typed JSON store over a backend.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::error::StoreError;

/// Type-safe store with automatic JSON serialization.
///
/// Cloning shares the underlying backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StorageBackend>,
}

impl Store {
    /// Create a store over a custom backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Create a store persisted under a directory.
    pub fn on_disk(dir: impl Into<std::path::PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(FileBackend::open(dir)?))
    }

    /// Get a value, or None if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.load(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value, replacing any previous one.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.save(key, &bytes)
    }

    /// Delete a value. Deleting an absent key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.backend.delete(key)
    }
}
