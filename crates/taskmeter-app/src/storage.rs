//! Key/value substrate the persistence adapter writes snapshots into.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anyhow::{Error, anyhow};
use taskmeter_store_fs::{FileStore, StoreError};

/// Minimal storage abstraction required by [`crate::persistence::Persistence`].
pub trait SnapshotStorage {
    /// Error type bubbled up from the backing storage.
    type Error: Into<Error>;

    /// Read the value stored under `key`, `None` when nothing was stored yet.
    ///
    /// # Errors
    /// Returns a storage-specific error when the value cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    /// Returns a storage-specific error when the value cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

impl SnapshotStorage for FileStore {
    type Error = StoreError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.get(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.set(key, value)
    }
}

/// In-process storage, used by tests and anywhere persistence must not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    /// Storage pre-populated with `value` under `key`.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.values.borrow_mut().insert(key.to_owned(), value.to_owned());
        storage
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Current value under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl SnapshotStorage for MemoryStorage {
    type Error = Error;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.value(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        if self.fail_writes.get() {
            return Err(anyhow!("storage quota exceeded"));
        }
        self.values.borrow_mut().insert(key.to_owned(), value.to_owned());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
