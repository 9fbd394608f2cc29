use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};

use crate::api::{validate_key, DbState, KeyValueSlot, COOKIEJAR_REDB_FILENAME, CURRENT_SCHEMA};
use crate::StorageError;

const META: TableDefinition<&str, &str> = TableDefinition::new("meta");
const SLOTS: TableDefinition<&str, &[u8]> = TableDefinition::new("slots");

const META_FORMAT_KEY: &str = "format";
const META_FORMAT_VALUE: &str = "cookiejar-redb";
const META_SCHEMA_VERSION: &str = "schema_version";
const META_CREATED_AT: &str = "created_at";
const META_LAST_WRITE_AT: &str = "last_write_at";

/// Slot store backed by a single `cookiejar.redb` file under `root`.
///
/// Handles opened in the same process share one `Database`, so two surfaces
/// can hold stores for the same root without tripping redb's file lock.
#[derive(Debug, Clone)]
pub struct RedbSlotStore {
    root: Utf8PathBuf,
}

impl RedbSlotStore {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self) -> Utf8PathBuf {
        self.root.join(COOKIEJAR_REDB_FILENAME)
    }

    fn is_corrupt_open_error(err: &redb::DatabaseError) -> bool {
        match err {
            redb::DatabaseError::Storage(storage) => match storage {
                redb::StorageError::Corrupted(_) => true,
                redb::StorageError::Io(ioe) => matches!(
                    ioe.kind(),
                    std::io::ErrorKind::InvalidData | std::io::ErrorKind::UnexpectedEof
                ),
                _ => false,
            },
            _ => false,
        }
    }

    fn db_cache() -> &'static Mutex<HashMap<Utf8PathBuf, Arc<Database>>> {
        static CACHE: OnceLock<Mutex<HashMap<Utf8PathBuf, Arc<Database>>>> = OnceLock::new();
        CACHE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    fn open(&self, create: bool) -> Result<Arc<Database>, StorageError> {
        let path = self.path();
        if !create && !path.exists() {
            return Err(StorageError::NotCreated);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut cache = Self::db_cache()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = cache.get(&path) {
            if path.exists() {
                return Ok(existing.clone());
            }
            cache.remove(&path);
        }

        let db = if path.exists() {
            match Database::open(path.as_std_path()) {
                Ok(db) => db,
                Err(redb::DatabaseError::DatabaseAlreadyOpen) => return Err(StorageError::Locked),
                Err(e) if Self::is_corrupt_open_error(&e) => {
                    return Err(StorageError::Corrupt {
                        quarantined: quarantine(&path),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            Database::create(path.as_std_path())?
        };

        if let Err(e) = Self::ensure_schema(&db) {
            drop(db);
            return Err(match e {
                StorageError::Corrupt { .. } => StorageError::Corrupt {
                    quarantined: quarantine(&path),
                },
                other => other,
            });
        }
        let db = Arc::new(db);
        cache.insert(path, db.clone());
        Ok(db)
    }

    fn ensure_schema(db: &Database) -> Result<(), StorageError> {
        let write_tx = db.begin_write()?;
        {
            let mut meta = write_tx.open_table(META)?;
            let format: Option<String> = meta.get(META_FORMAT_KEY)?.map(|g| g.value().to_string());
            if format.is_none() {
                let schema_version = CURRENT_SCHEMA.to_string();
                let created_at = Utc::now().to_rfc3339();
                meta.insert(META_FORMAT_KEY, META_FORMAT_VALUE)?;
                meta.insert(META_SCHEMA_VERSION, schema_version.as_str())?;
                meta.insert(META_CREATED_AT, created_at.as_str())?;
            } else if format.as_deref() != Some(META_FORMAT_VALUE) {
                return Err(StorageError::Corrupt { quarantined: None });
            }
        }
        let _ = write_tx.open_table(SLOTS)?;
        write_tx.commit()?;

        let read_tx = db.begin_read()?;
        let meta = read_tx.open_table(META)?;
        let schema_version = meta
            .get(META_SCHEMA_VERSION)?
            .and_then(|g| g.value().parse::<u32>().ok())
            .unwrap_or(0);
        if schema_version == 0 {
            return Err(StorageError::Corrupt { quarantined: None });
        }
        if schema_version > CURRENT_SCHEMA {
            return Err(StorageError::NewerSchema {
                found: schema_version,
                supported: CURRENT_SCHEMA,
            });
        }
        if schema_version != CURRENT_SCHEMA {
            return Err(StorageError::Corrupt { quarantined: None });
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<DbState, StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(DbState::Missing);
        }
        {
            let mut cache = Self::db_cache()
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if cache.contains_key(&path) {
                if !path.exists() {
                    cache.remove(&path);
                    return Ok(DbState::Missing);
                }
                return Ok(DbState::Valid);
            }
        }

        match Database::open(path.as_std_path()) {
            Ok(db) => match Self::ensure_schema(&db) {
                Ok(()) => Ok(DbState::Valid),
                Err(StorageError::NewerSchema { found, supported }) => {
                    Ok(DbState::NewerSchema { found, supported })
                }
                Err(StorageError::Locked) => Ok(DbState::Busy),
                Err(StorageError::Corrupt { .. }) => {
                    drop(db);
                    quarantine(&path);
                    Ok(DbState::Corrupt)
                }
                Err(e) => Err(e),
            },
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => Ok(DbState::Busy),
            Err(e) if Self::is_corrupt_open_error(&e) => {
                quarantine(&path);
                Ok(DbState::Corrupt)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueSlot for RedbSlotStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        validate_key(key)?;
        let db = match self.open(false) {
            Ok(db) => db,
            Err(StorageError::NotCreated) => return Ok(None),
            Err(e) => return Err(e),
        };
        let read_tx = db.begin_read()?;
        let slots = read_tx.open_table(SLOTS)?;
        let value = slots.get(key)?.map(|g| g.value().to_vec());
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        validate_key(key)?;
        let db = self.open(true)?;
        let write_tx = db.begin_write()?;
        {
            let mut slots = write_tx.open_table(SLOTS)?;
            slots.insert(key, value)?;
            let ts = Utc::now().to_rfc3339();
            let mut meta = write_tx.open_table(META)?;
            meta.insert(META_LAST_WRITE_AT, ts.as_str())?;
        }
        write_tx.commit()?;
        tracing::debug!(key, bytes = value.len(), "slot written");
        Ok(())
    }
}

/// Moves an unreadable store file aside so the next write starts fresh.
/// Returns the new location, or `None` when there was nothing to move or the
/// rename failed.
fn quarantine(path: &Utf8Path) -> Option<Utf8PathBuf> {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    if !path.exists() {
        return None;
    }
    let moved = path.with_file_name(format!(
        "{}.corrupt.{}.{}.{}",
        path.file_name().unwrap_or(COOKIEJAR_REDB_FILENAME),
        Utc::now().format("%Y%m%dT%H%M%S%.f"),
        std::process::id(),
        SEQ.fetch_add(1, Ordering::Relaxed),
    ));
    match std::fs::rename(path, &moved) {
        Ok(()) => {
            tracing::warn!(from = %path, to = %moved, "unreadable slot store moved aside");
            Some(moved)
        }
        Err(e) => {
            tracing::error!(path = %path, "could not move unreadable slot store aside: {e}");
            None
        }
    }
}
