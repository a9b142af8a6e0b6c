//! Persistence adapter: mirrors the task sequence into a single storage key.

use anyhow::Error;
use taskmeter_core::{EmptyPolicy, ImportError, Task, parse_tasks};
use tracing::{debug, warn};

use crate::storage::SnapshotStorage;

/// Default storage key holding the task snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "task-progress-data";

/// Failure to read or write the persisted snapshot.
///
/// The in-memory task sequence stays authoritative when this occurs.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The snapshot could not be read from storage.
    #[error("failed to read saved tasks: {0}")]
    Read(Error),
    /// The stored snapshot is not a valid task list. It was copied to
    /// `backup` before anything could overwrite it.
    #[error("saved tasks are unreadable ({source}); the old file was kept under '{backup}'")]
    Corrupt {
        /// Why the snapshot was rejected.
        source: ImportError,
        /// Storage key holding the rejected snapshot.
        backup: String,
    },
    /// The stored snapshot is not a valid task list and could not be set aside.
    #[error("saved tasks are unreadable ({source}) and could not be backed up: {backup_error}")]
    CorruptNotKept {
        /// Why the snapshot was rejected.
        source: ImportError,
        /// Why the backup write failed.
        backup_error: Error,
    },
    /// The task list could not be serialized.
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The snapshot could not be written to storage.
    #[error("failed to save tasks: {0}")]
    Write(Error),
}

/// Outcome of reading the snapshot at startup.
#[derive(Debug, Default)]
pub struct Loaded {
    /// Tasks to start with; empty when the snapshot could not be used.
    pub tasks: Vec<Task>,
    /// Why the snapshot could not be used, if it could not.
    pub problem: Option<PersistenceError>,
}

impl Loaded {
    fn failed(key: &str, problem: PersistenceError) -> Self {
        warn!(key, error = %problem, "Ignoring saved tasks; starting empty");
        Self {
            tasks: Vec::new(),
            problem: Some(problem),
        }
    }
}

/// Reads and writes task snapshots under one storage key.
pub struct Persistence<S> {
    storage: S,
    key: String,
}

impl<S> Persistence<S> {
    /// Adapter writing under `key`.
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Borrow the backing storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S: SnapshotStorage> Persistence<S> {
    /// Load the saved sequence, falling back to an empty one.
    ///
    /// A missing snapshot is normal on first start. An unreadable or invalid
    /// one yields an empty list together with the problem, and an invalid
    /// one is first copied to [`Self::backup_key`] so the next save cannot
    /// destroy it.
    pub fn load(&self) -> Loaded {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No saved tasks yet");
                return Loaded::default();
            }
            Err(err) => return Loaded::failed(&self.key, PersistenceError::Read(err.into())),
        };

        match parse_tasks(&raw, EmptyPolicy::Allow) {
            Ok(tasks) => {
                debug!(key = %self.key, count = tasks.len(), "Loaded tasks");
                Loaded { tasks, problem: None }
            }
            Err(source) => {
                let backup = self.backup_key();
                let problem = match self.storage.write(&backup, &raw) {
                    Ok(()) => PersistenceError::Corrupt { source, backup },
                    Err(err) => PersistenceError::CorruptNotKept {
                        source,
                        backup_error: err.into(),
                    },
                };
                Loaded::failed(&self.key, problem)
            }
        }
    }

    /// Key the rejected snapshot is copied to.
    pub fn backup_key(&self) -> String {
        format!("{}.corrupt", self.key)
    }

    /// Write the full sequence.
    ///
    /// # Errors
    /// Returns [`PersistenceError::Serialize`] or [`PersistenceError::Write`].
    pub fn save(&self, tasks: &[Task]) -> Result<(), PersistenceError> {
        let body = serde_json::to_string(tasks)?;
        self.storage
            .write(&self.key, &body)
            .map_err(|err| PersistenceError::Write(err.into()))
    }
}
