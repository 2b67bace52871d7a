//! In-process persistence medium.

use std::sync::Mutex;

use hashbrown::HashMap;

use super::{KeyValueStore, PersistError, PersistResult};

/// Volatile [`KeyValueStore`] backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    /// True when no keys are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>> {
        let items = self.items.lock().map_err(|_| PersistError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> PersistResult<()> {
        let mut items = self.items.lock().map_err(|_| PersistError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> PersistResult<()> {
        let mut items = self.items.lock().map_err(|_| PersistError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}
