//! In-memory remote store.
//!
//! Used by tests to exercise the sync flows without touching the
//! filesystem. Clones share the same underlying objects, so a test can
//! keep a handle while the orchestrator owns another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::RemoteStore;
use crate::error::{RemoteError, Result};

/// Shared-map remote store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RemoteStore for MemoryStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock().get(key).cloned())
    }

    fn head(&self, key: &str) -> Result<bool> {
        Ok(self.lock().contains_key(key))
    }
}

/// A store whose every call fails, for exercising network error paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreachableStore;

impl RemoteStore for UnreachableStore {
    fn put(&self, key: &str, _bytes: &[u8]) -> Result<()> {
        Err(RemoteError::Network(format!("unreachable: {}", key)).into())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Err(RemoteError::Network(format!("unreachable: {}", key)).into())
    }

    fn head(&self, key: &str) -> Result<bool> {
        Err(RemoteError::Network(format!("unreachable: {}", key)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();

        store.put("k", b"v").unwrap();

        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));
        assert!(store.head("k").unwrap());
        assert!(!store.head("other").unwrap());
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn test_clones_share_objects() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.put("k", b"v").unwrap();

        assert_eq!(handle.get("k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(handle.len(), 1);
    }

    #[test]
    fn test_unreachable_store_fails_everything() {
        let store = UnreachableStore;

        assert!(store.put("k", b"v").is_err());
        assert!(store.get("k").is_err());
        assert!(store.head("k").is_err());
    }
}
