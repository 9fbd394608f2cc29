use std::sync::Arc;

use cookiejar_core::WatchList;
use cookiejar_persistence::{decode_value, encode_value, KeyValueSlot, StorageError};

/// Owns the persisted watch-list slot.
///
/// `load` is get-or-init: an absent slot is seeded with the built-in default,
/// which is written back before it is returned. Two surfaces racing on a
/// fresh slot both write that same constant, so the race settles on one value.
#[derive(Clone)]
pub struct WatchListStore {
    slot: Arc<dyn KeyValueSlot>,
    key: String,
}

impl WatchListStore {
    pub fn new(slot: Arc<dyn KeyValueSlot>) -> Self {
        Self {
            slot,
            key: cookiejar_config::WATCH_LIST_STORAGE_KEY.to_string(),
        }
    }

    pub async fn load(&self) -> Result<WatchList, StorageError> {
        let slot = self.slot.clone();
        let key = self.key.clone();
        tokio::task::spawn_blocking(move || load_or_seed(slot.as_ref(), &key))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))?
    }

    /// Replaces the persisted list; resolves once the write is durable.
    pub async fn save(&self, list: &WatchList) -> Result<(), StorageError> {
        let bytes = encode_value(list)?;
        let slot = self.slot.clone();
        let key = self.key.clone();
        let len = list.len();
        tokio::task::spawn_blocking(move || slot.set(&key, &bytes))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))??;
        tracing::info!(entries = len, "watch-list saved");
        Ok(())
    }
}

fn load_or_seed(slot: &dyn KeyValueSlot, key: &str) -> Result<WatchList, StorageError> {
    match slot.get(key)? {
        // A stored `null` reads as an empty list.
        Some(bytes) => Ok(decode_value::<Option<WatchList>>(&bytes)?.unwrap_or_default()),
        None => {
            let list = WatchList::builtin_default();
            slot.set(key, &encode_value(&list)?)?;
            tracing::info!(entries = list.len(), "watch-list seeded with defaults");
            Ok(list)
        }
    }
}
