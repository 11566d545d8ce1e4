//! In-memory client storage

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{ClientStorage, StorageError, StorageResult};

/// Process-local storage. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }
}

impl ClientStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.lock()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item("token").unwrap().is_none());

        storage.set_item("token", "abc").unwrap();
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("abc"));

        storage.remove_item("token").unwrap();
        assert!(storage.get_item("token").unwrap().is_none());

        // Removing again is fine
        storage.remove_item("token").unwrap();
    }

    #[test]
    fn test_clones_share_state() {
        let storage = MemoryStorage::new();
        let view = storage.clone();

        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();
        assert_eq!(view.len(), 2);

        view.clear().unwrap();
        assert!(storage.is_empty());
    }
}
