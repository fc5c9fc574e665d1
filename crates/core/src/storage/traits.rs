//! Storage interface
//!
//! The directory and session logic only ever read and write whole string
//! blobs by key, so any backend that can do that (SQLite, memory, a browser
//! bridge) can sit underneath them.

use crate::error::Result;

/// Key-value blob persistence
pub trait KeyValueStore {
    /// Read the blob stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous blob
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn delete(&self, key: &str) -> Result<()>;
}

// Lets callers hand out `&store` without giving up ownership
impl<T> KeyValueStore for &T
where
    T: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

impl<T> KeyValueStore for Box<T>
where
    T: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}
