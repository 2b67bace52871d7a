//! SQLite-backed durable key-value medium.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};

use super::{KeyValueStore, PersistError, PersistResult};

/// SQLite implementation of [`crate::persist::KeyValueStore`].
///
/// Every key is one row; each write is a single statement, so a reader never
/// observes a partially written value.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates a SQLite-backed store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory SQLite store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Returns every stored key in ascending order.
    pub fn keys(&self) -> PersistResult<Vec<String>> {
        let conn = self.conn.lock().map_err(|_| PersistError::Poisoned)?;
        let mut stmt = conn.prepare("SELECT key FROM items ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl KeyValueStore for SqliteStore {
    fn get_item(&self, key: &str) -> PersistResult<Option<String>> {
        let conn = self.conn.lock().map_err(|_| PersistError::Poisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM items WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> PersistResult<()> {
        let conn = self.conn.lock().map_err(|_| PersistError::Poisoned)?;
        conn.execute(
            "INSERT INTO items(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> PersistResult<()> {
        let conn = self.conn.lock().map_err(|_| PersistError::Poisoned)?;
        conn.execute("DELETE FROM items WHERE key = ?1", params![key])?;
        Ok(())
    }
}
