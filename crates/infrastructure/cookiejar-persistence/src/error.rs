use camino::Utf8PathBuf;

/// Why a slot could not be read or written.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Nothing has been written under this root yet. `get` maps this to `Ok(None)`.
    #[error("slot store has not been created yet")]
    NotCreated,
    /// `quarantined` is where the unreadable file was moved, when the move worked.
    #[error("slot store file is unreadable")]
    Corrupt { quarantined: Option<Utf8PathBuf> },
    #[error("slot store was written by a newer cookiejar (schema {found}, this build reads {supported})")]
    NewerSchema { found: u32, supported: u32 },
    #[error("slot store is locked by another process")]
    Locked,
    #[error("slot key {0:?} is empty or too long")]
    InvalidKey(String),
    #[error("slot i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("slot value could not be (de)serialized: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("slot backend failed: {0}")]
    Backend(Box<RedbFailure>),
}

/// The redb failures a slot read or write can surface.
#[derive(Debug, thiserror::Error)]
pub enum RedbFailure {
    #[error(transparent)]
    Open(#[from] redb::DatabaseError),
    #[error(transparent)]
    Transaction(#[from] redb::TransactionError),
    #[error(transparent)]
    Table(#[from] redb::TableError),
    #[error(transparent)]
    Storage(#[from] redb::StorageError),
    #[error(transparent)]
    Commit(#[from] redb::CommitError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    NotCreated,
    Corrupt,
    NewerSchema,
    Locked,
    InvalidKey,
    Io,
    Codec,
    Backend,
}

impl StorageError {
    pub fn kind(&self) -> StorageErrorKind {
        match self {
            StorageError::NotCreated => StorageErrorKind::NotCreated,
            StorageError::Corrupt { .. } => StorageErrorKind::Corrupt,
            StorageError::NewerSchema { .. } => StorageErrorKind::NewerSchema,
            StorageError::Locked => StorageErrorKind::Locked,
            StorageError::InvalidKey(_) => StorageErrorKind::InvalidKey,
            StorageError::Io(_) => StorageErrorKind::Io,
            StorageError::Codec(_) => StorageErrorKind::Codec,
            StorageError::Backend(_) => StorageErrorKind::Backend,
        }
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(value: redb::DatabaseError) -> Self {
        match value {
            redb::DatabaseError::DatabaseAlreadyOpen => Self::Locked,
            other => Self::Backend(Box::new(other.into())),
        }
    }
}

macro_rules! backend_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for StorageError {
                fn from(value: $source) -> Self {
                    Self::Backend(Box::new(value.into()))
                }
            }
        )*
    };
}

backend_from!(
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
