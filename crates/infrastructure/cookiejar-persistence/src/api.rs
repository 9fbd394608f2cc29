pub const COOKIEJAR_REDB_FILENAME: &str = "cookiejar.redb";
pub const CURRENT_SCHEMA: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbState {
    Missing,
    Valid,
    Busy,
    Corrupt,
    NewerSchema { found: u32, supported: u32 },
}

/// The platform key-value storage: each key holds one opaque serialized value
/// that is replaced wholesale on every write.
pub trait KeyValueSlot: Send + Sync {
    /// `Ok(None)` when nothing was ever written under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, crate::StorageError>;

    /// Returns once the value is durable.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), crate::StorageError>;
}

pub(crate) fn validate_key(key: &str) -> Result<(), crate::StorageError> {
    if key.trim().is_empty() || key.len() > 256 {
        return Err(crate::StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
