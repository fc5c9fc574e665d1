//! Persistence for UserDesk
//!
//! Everything is stored as whole JSON blobs behind [`KeyValueStore`]. The
//! SQLite [`Database`] is the durable backend; [`MemoryStore`] is for tests
//! and throwaway runs.

mod codec;
mod kv;
mod memory;
mod migrations;
mod traits;

use std::path::Path;

use rusqlite::Connection;
use tracing::instrument;

use crate::error::Result;

pub use codec::{
    decode_session, decode_users, encode_session, encode_users, NEXT_ID_KEY, SESSION_KEY,
    USERS_KEY,
};
pub use kv::KvStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)
    }

    /// Get current schema version
    pub fn schema_version(&self) -> Result<u32> {
        migrations::current_version(&self.conn)
    }

    /// Get the key-value table
    pub fn kv(&self) -> KvStore<'_> {
        KvStore::new(&self.conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.kv().get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.kv().set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.kv().delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_disk_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userdesk.db");

        {
            let db = Database::open(&path).unwrap();
            db.set(USERS_KEY, "[]").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get(USERS_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(db.schema_version().unwrap(), migrations::latest_version());
    }
}
