use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StoreError;

use super::StateStorage;
use super::schema;

/// SQLite-backed implementation of `StateStorage`.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl SqliteStorage {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> crate::error::Result<Self> {
        let conn = Connection::open(path).map_err(StoreError::Sqlite)?;
        let storage = Self {
            conn,
            db_path: Some(path.to_path_buf()),
        };
        storage.initialize()?;
        Ok(storage)
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> crate::error::Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::Sqlite)?;
        let storage = Self {
            conn,
            db_path: None,
        };
        storage.initialize()?;
        Ok(storage)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn initialize(&self) -> crate::error::Result<()> {
        self.conn
            .execute_batch("PRAGMA synchronous = NORMAL;")
            .map_err(StoreError::Sqlite)?;

        // WAL is unavailable for in-memory databases; ignore failure
        let _ = self.conn.execute_batch("PRAGMA journal_mode = WAL;");

        self.conn
            .execute_batch(schema::SCHEMA_SQL)
            .map_err(StoreError::Sqlite)?;

        self.conn
            .execute(
                "INSERT OR IGNORE INTO mindflow_meta (key, value) VALUES ('schema_version', ?1)",
                params![schema::SCHEMA_VERSION],
            )
            .map_err(StoreError::Sqlite)?;

        let version: String = self
            .conn
            .query_row(
                "SELECT value FROM mindflow_meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .map_err(StoreError::Sqlite)?;
        if version != schema::SCHEMA_VERSION {
            return Err(StoreError::Schema(version).into());
        }

        Ok(())
    }

    /// Timestamp of the last write under `key`, as stored (RFC 3339).
    pub fn updated_at(&self, key: &str) -> crate::error::Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::Sqlite)?)
    }

    /// On-disk size of the database in bytes (0 for in-memory).
    pub fn size_bytes(&self) -> u64 {
        self.db_path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map_or(0, |m| m.len())
    }
}

impl StateStorage for SqliteStorage {
    fn load(&self, key: &str) -> crate::error::Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::Sqlite)?)
    }

    fn save(&self, key: &str, value: &str) -> crate::error::Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now],
            )
            .map_err(StoreError::Sqlite)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> crate::error::Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(StoreError::Sqlite)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_overwrite() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert!(storage.load("k").unwrap().is_none());

        storage.save("k", "one").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("one"));

        storage.save("k", "two").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("two"));
        assert!(storage.updated_at("k").unwrap().is_some());
    }

    #[test]
    fn keys_are_isolated() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save("a", "1").unwrap();
        storage.save("b", "2").unwrap();
        storage.remove("a").unwrap();
        assert!(storage.load("a").unwrap().is_none());
        assert_eq!(storage.load("b").unwrap().as_deref(), Some("2"));
        // Removing twice is fine
        storage.remove("a").unwrap();
    }

    #[test]
    fn persists_across_reopen() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        {
            let storage = SqliteStorage::open(tmp.path()).unwrap();
            storage.save("mind-map-storage", "{}").unwrap();
        }
        let storage = SqliteStorage::open(tmp.path()).unwrap();
        assert_eq!(storage.load("mind-map-storage").unwrap().as_deref(), Some("{}"));
        assert!(storage.size_bytes() > 0);
        assert_eq!(storage.db_path(), Some(tmp.path()));
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        {
            let conn = Connection::open(tmp.path()).unwrap();
            conn.execute_batch(schema::SCHEMA_SQL).unwrap();
            conn.execute(
                "INSERT INTO mindflow_meta (key, value) VALUES ('schema_version', '99')",
                [],
            )
            .unwrap();
        }
        let err = SqliteStorage::open(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("99"));
    }
}
