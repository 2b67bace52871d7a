/// Cart snapshot adapter.
pub mod adapter;
/// In-process medium.
pub mod memory;
/// Shared medium with change notifications.
pub mod origin;
/// SQLite medium.
pub mod sqlite;

use thiserror::Error;

/// Failures of the persistence medium.
#[derive(Debug, Error)]
pub enum PersistError {
    /// SQLite driver error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Snapshot (de)serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A writer panicked while holding the medium lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Result alias for persistence calls.
pub type PersistResult<T> = Result<T, PersistError>;

/// Synchronous, string-keyed persistence medium.
///
/// Each call touches exactly one key and is atomic for that key. There are
/// no cross-key transactions.
pub trait KeyValueStore: Send + Sync {
    /// Reads `key`, `None` when absent.
    fn get_item(&self, key: &str) -> PersistResult<Option<String>>;
    /// Writes `value` under `key`.
    fn set_item(&self, key: &str, value: &str) -> PersistResult<()>;
    /// Deletes `key`. Absent keys are fine.
    fn remove_item(&self, key: &str) -> PersistResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> PersistResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> PersistResult<()> {
        (**self).remove_item(key)
    }
}
