//! In-process storage backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{Storage, StorageError};

/// Shared in-memory map.
///
/// Clones share the same map, so two handles behave like two views mounted
/// on the same local store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_replaces_and_clones_share() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("cart", "[1]".to_string()).await.unwrap();
        storage.set("cart", "[2]".to_string()).await.unwrap();

        assert_eq!(other.get("cart").await.unwrap().as_deref(), Some("[2]"));
        assert_eq!(other.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let storage = MemoryStorage::new();
        storage.remove("cart").await.unwrap();
        assert!(storage.get("cart").await.unwrap().is_none());
        assert!(storage.is_empty());
    }
}
