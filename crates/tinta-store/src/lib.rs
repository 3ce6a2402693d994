//! Durable key-value persistence for Tinta.
//!
//! Provides a typed JSON store over pluggable backends. The storefront
//! uses it for exactly one artifact: the cart, persisted as a JSON
//! sequence and reloaded at session start.

pub mod backend;
pub mod error;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::StoreError;
pub use store::Store;
