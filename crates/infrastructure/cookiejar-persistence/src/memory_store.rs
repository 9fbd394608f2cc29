use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::api::{validate_key, KeyValueSlot};
use crate::StorageError;

/// Process-local slot store. Clones share the same map, which lets tests stand
/// up two surfaces against one storage.
#[derive(Debug, Default, Clone)]
pub struct MemorySlotStore {
    slots: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots
            .lock()
            .map(|slots| slots.contains_key(key))
            .unwrap_or(false)
    }
}

impl KeyValueSlot for MemorySlotStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        let slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
        slots.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
