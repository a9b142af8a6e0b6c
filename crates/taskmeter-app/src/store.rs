//! The task store: owner of the ordered task sequence.

use std::collections::HashSet;

use taskmeter_core::{IdGenerator, ImportError, Task, TaskId, ValidationError, to_pretty_json};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::persistence::{Loaded, Persistence, PersistenceError};
use crate::storage::SnapshotStorage;

/// In-memory task sequence mirrored to storage after every mutation.
///
/// Storage failures never undo a mutation: they are logged and kept as a
/// pending warning for the caller to surface (see [`TaskStore::take_flush_warning`]).
pub struct TaskStore<S> {
    tasks: Vec<Task>,
    ids: IdGenerator,
    persistence: Persistence<S>,
    flush_warning: Option<PersistenceError>,
    load_warning: Option<PersistenceError>,
}

impl<S: SnapshotStorage> TaskStore<S> {
    /// Load the saved sequence and take ownership of it.
    ///
    /// A snapshot that could not be used leaves the store empty; the reason
    /// is kept for [`TaskStore::take_load_warning`].
    pub fn open(persistence: Persistence<S>) -> Self {
        let Loaded { tasks, problem } = persistence.load();
        let ids = IdGenerator::seeded(tasks.iter().map(Task::id));
        info!(count = tasks.len(), "Task store ready");
        Self {
            tasks,
            ids,
            persistence,
            flush_warning: None,
            load_warning: problem,
        }
    }

    /// Current sequence in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when there are no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Borrow the persistence adapter.
    pub const fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Create a task with no progress and append it to the sequence.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a blank name, a target below one or
    /// when no unused id is left; the sequence is unchanged in that case.
    pub fn create(&mut self, name: &str, target: i64) -> Result<&Task, ValidationError> {
        let now = OffsetDateTime::now_utc();
        let id = self
            .ids
            .next_at(now)
            .ok_or_else(|| ValidationError::IdsExhausted(self.ids.last().get()))?;
        let task = Task::new(id, name, target, now)?;
        info!(id = %task.id(), name = task.name(), target, "Created task");
        self.tasks.push(task);
        self.persist();
        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    /// Move a task's progress by `delta`, clamped into `0..=target`.
    ///
    /// Unknown ids are ignored and yield `None`.
    pub fn update_progress(&mut self, id: TaskId, delta: i64) -> Option<&Task> {
        let Some(index) = self.index_of(id) else {
            debug!(%id, delta, "Ignoring progress update for unknown task");
            return None;
        };
        self.tasks[index].apply_delta(delta, OffsetDateTime::now_utc());
        debug!(%id, delta, current = self.tasks[index].current(), "Updated progress");
        self.persist();
        Some(&self.tasks[index])
    }

    /// Replace name, progress and target of a task in one step.
    ///
    /// Returns `Ok(false)` when no task has `id`.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] and leaves the task untouched when any
    /// of the new values is invalid.
    pub fn edit(&mut self, id: TaskId, name: &str, current: i64, target: i64) -> Result<bool, ValidationError> {
        let Some(index) = self.index_of(id) else {
            debug!(%id, "Ignoring edit for unknown task");
            return Ok(false);
        };
        self.tasks[index].replace(name, current, target, OffsetDateTime::now_utc())?;
        info!(%id, current, target, "Edited task");
        self.persist();
        Ok(true)
    }

    /// Remove a task. Returns `false` when no task has `id`.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(%id, "Ignoring delete for unknown task");
            return false;
        };
        self.tasks.remove(index);
        info!(%id, "Deleted task");
        self.persist();
        true
    }

    /// Rearrange the sequence to follow `order`.
    ///
    /// Best effort: ids that match no task are skipped, repeated ids count
    /// once, and tasks whose ids are missing from `order` are dropped.
    pub fn reorder(&mut self, order: &[TaskId]) {
        let mut remaining = std::mem::take(&mut self.tasks);
        let mut seen = HashSet::with_capacity(order.len());
        let mut reordered = Vec::with_capacity(order.len());
        for &id in order {
            if !seen.insert(id) {
                continue;
            }
            match remaining.iter().position(|task| task.id() == id) {
                Some(index) => reordered.push(remaining.swap_remove(index)),
                None => debug!(%id, "Skipping unknown id in reorder"),
            }
        }
        if !remaining.is_empty() {
            info!(dropped = remaining.len(), "Reorder dropped tasks missing from the new order");
        }
        self.tasks = reordered;
        self.persist();
    }

    /// Replace the whole sequence with imported tasks.
    ///
    /// `tasks` come from [`taskmeter_core::parse_tasks`], so every record is
    /// already valid; see [`crate::import_file::read_import`].
    ///
    /// # Errors
    /// Returns [`ImportError::Empty`] and leaves the sequence untouched when
    /// `tasks` is empty.
    pub fn import_all(&mut self, tasks: Vec<Task>) -> Result<usize, ImportError> {
        if tasks.is_empty() {
            return Err(ImportError::Empty);
        }
        for task in &tasks {
            self.ids.observe(task.id());
        }
        let count = tasks.len();
        self.tasks = tasks;
        info!(count, "Imported tasks");
        self.persist();
        Ok(count)
    }

    /// Render the sequence as 2-space indented JSON.
    ///
    /// # Errors
    /// Propagates serializer failures.
    pub fn export_all(&self) -> Result<String, serde_json::Error> {
        to_pretty_json(&self.tasks)
    }

    /// Remove every task.
    pub fn clear_all(&mut self) {
        let count = self.tasks.len();
        self.tasks.clear();
        info!(count, "Cleared all tasks");
        self.persist();
    }

    /// Write the current sequence again (periodic autosave, shutdown).
    ///
    /// # Errors
    /// Returns the storage failure; the sequence is kept either way.
    pub fn flush(&mut self) -> Result<(), PersistenceError> {
        self.persistence.save(&self.tasks)
    }

    /// Take the problem met while loading the saved snapshot, if any.
    pub const fn take_load_warning(&mut self) -> Option<PersistenceError> {
        self.load_warning.take()
    }

    /// Take the warning left by the latest failed mutation save, if any.
    pub const fn take_flush_warning(&mut self) -> Option<PersistenceError> {
        self.flush_warning.take()
    }

    fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }

    fn persist(&mut self) {
        match self.persistence.save(&self.tasks) {
            Ok(()) => self.flush_warning = None,
            Err(err) => {
                warn!(error = %err, "Could not save tasks; keeping changes in memory");
                self.flush_warning = Some(err);
            }
        }
    }
}

/// File name offered when exporting on `date`.
#[must_use]
pub fn export_file_name(date: Date) -> String {
    format!(
        "task-progress-data-{:04}-{:02}-{:02}.json",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
