//! Key-value storage backends for client-side state.
//!
//! Each backend models the per-visitor local store the cart lives in: a flat
//! map of string keys to serialized string values, where a write replaces the
//! whole entry.
//!
//! - [`SessionStorage`] - one visitor's `tower-sessions` session (web)
//! - [`FileStorage`] - one JSON file per key in a directory (CLI)
//! - [`MemoryStorage`] - shared in-process map (tests, embedding)

mod file;
mod memory;
mod session;

use std::future::Future;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use session::SessionStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string key-value store.
///
/// Implementations must make `set` replace any prior value in full.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the entry under `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
