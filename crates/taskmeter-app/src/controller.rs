//! Interaction controller: turns user gestures into store calls and redraw hints.

use std::time::{Duration, Instant};

use taskmeter_core::{ImportError, Task, TaskId, ValidationError, parse_count};
use thiserror::Error;
use time::Date;
use tracing::{debug, info, warn};

use crate::autosave::Autosave;
use crate::board::{Board, EscapedText, Redraw};
use crate::persistence::PersistenceError;
use crate::storage::SnapshotStorage;
use crate::store::{TaskStore, export_file_name};

/// Yes/no gate in front of destructive gestures.
pub trait Confirm {
    /// Ask the user; `true` means go ahead.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Gate that answers every question the same way (`--yes`, scripted runs).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, prompt: &str) -> bool {
        debug!(prompt, answer = self.0, "Answered confirmation without asking");
        self.0
    }
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Submit the creation form. `target` is the raw text typed by the user.
    Create {
        /// Task name.
        name: String,
        /// Target as typed.
        target: String,
    },
    /// Press `+1` on a card.
    Increment(TaskId),
    /// Press `-1` on a card.
    Decrement(TaskId),
    /// Move progress by an arbitrary amount.
    Step {
        /// Task to update.
        id: TaskId,
        /// Signed amount.
        delta: i64,
    },
    /// Submit the edit form for the task being edited.
    Edit {
        /// Task being edited.
        id: TaskId,
        /// New name.
        name: String,
        /// New progress as typed.
        current: String,
        /// New target as typed.
        target: String,
    },
    /// Press delete on a card.
    Delete(TaskId),
    /// Finish a reorder; carries the full visual order.
    Reorder(Vec<TaskId>),
    /// Replace everything with validated imported tasks.
    Import(Vec<Task>),
    /// Remove every task.
    ClearAll,
}

/// Direction of a single-step move in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the top.
    Up,
    /// Towards the bottom.
    Down,
}

/// Result of a gesture the view has to reflect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Part of the board that changed.
    pub redraw: Redraw,
    /// Short message for the status line.
    pub notice: Option<String>,
    /// Storage problem to surface; the change itself was kept in memory.
    pub warning: Option<String>,
}

impl Outcome {
    const fn unchanged() -> Self {
        Self {
            redraw: Redraw::None,
            notice: None,
            warning: None,
        }
    }

    fn cancelled(what: &str) -> Self {
        Self {
            notice: Some(format!("{what} cancelled")),
            ..Self::unchanged()
        }
    }
}

/// Gesture rejected before anything changed.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Form input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Import payload failed validation.
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Export payload ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Suggested file name.
    pub file_name: String,
    /// Pretty-printed JSON.
    pub contents: String,
}

/// Owns the store and keeps the board in step with it.
pub struct Controller<S> {
    store: TaskStore<S>,
    board: Board,
    autosave: Autosave,
}

impl<S: SnapshotStorage> Controller<S> {
    /// Controller flushing every `autosave_interval`.
    pub fn new(store: TaskStore<S>, autosave_interval: Duration) -> Self {
        let board = Board::render(store.tasks());
        Self {
            store,
            board,
            autosave: Autosave::new(autosave_interval, Instant::now()),
        }
    }

    /// Borrow the store.
    pub const fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    /// Take the problem met while loading the saved tasks, if any. Callers
    /// show it once at startup.
    pub const fn take_load_warning(&mut self) -> Option<PersistenceError> {
        self.store.take_load_warning()
    }

    /// Current board.
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Apply one gesture.
    ///
    /// # Errors
    /// Returns [`ControllerError`] when the input is rejected; nothing
    /// changed in that case.
    pub fn dispatch(&mut self, gesture: Gesture, confirm: &mut dyn Confirm) -> Result<Outcome, ControllerError> {
        let mut outcome = match gesture {
            Gesture::Create { name, target } => {
                let target = parse_count("target", &target)?;
                let task = self.store.create(&name, target)?;
                Outcome {
                    redraw: Redraw::Full,
                    notice: Some(format!("Created \"{}\"", EscapedText::escape(task.name()))),
                    warning: None,
                }
            }
            Gesture::Increment(id) => self.step(id, 1),
            Gesture::Decrement(id) => self.step(id, -1),
            Gesture::Step { id, delta } => self.step(id, delta),
            Gesture::Edit {
                id,
                name,
                current,
                target,
            } => {
                let current = parse_count("current", &current)?;
                let target = parse_count("target", &target)?;
                if self.store.edit(id, &name, current, target)? {
                    Outcome {
                        redraw: Redraw::Full,
                        notice: Some("Task updated".to_owned()),
                        warning: None,
                    }
                } else {
                    Outcome::unchanged()
                }
            }
            Gesture::Delete(id) => self.delete(id, confirm),
            Gesture::Reorder(order) => {
                self.store.reorder(&order);
                Outcome {
                    redraw: Redraw::Full,
                    ..Outcome::unchanged()
                }
            }
            Gesture::Import(tasks) => self.import(tasks, confirm)?,
            Gesture::ClearAll => self.clear_all(confirm),
        };

        if let Some(err) = self.store.take_flush_warning() {
            outcome.warning = Some(format!("Changes could not be saved: {err}"));
        }
        self.board.sync(outcome.redraw, self.store.tasks());
        Ok(outcome)
    }

    /// Full id order after moving `id` one step in `direction`, or `None`
    /// when the task is unknown or already at that end.
    #[must_use]
    pub fn order_after_move(&self, id: TaskId, direction: Direction) -> Option<Vec<TaskId>> {
        let mut order: Vec<TaskId> = self.store.tasks().iter().map(Task::id).collect();
        let from = order.iter().position(|candidate| *candidate == id)?;
        let to = match direction {
            Direction::Up => from.checked_sub(1)?,
            Direction::Down => Some(from + 1).filter(|to| *to < order.len())?,
        };
        order.swap(from, to);
        Some(order)
    }

    /// Snapshot of every task as an export file dated `today`.
    ///
    /// # Errors
    /// Propagates serializer failures.
    pub fn export(&self, today: Date) -> Result<Export, serde_json::Error> {
        let contents = self.store.export_all()?;
        info!(count = self.store.len(), "Exported tasks");
        Ok(Export {
            file_name: export_file_name(today),
            contents,
        })
    }

    /// Flush when the autosave interval elapsed. Returns the failure, if any.
    pub fn tick(&mut self, now: Instant) -> Option<PersistenceError> {
        if !self.autosave.due(now) {
            return None;
        }
        self.autosave.mark(now);
        match self.store.flush() {
            Ok(()) => {
                debug!("Autosaved tasks");
                None
            }
            Err(err) => {
                warn!(error = %err, "Autosave failed");
                Some(err)
            }
        }
    }

    /// Final flush before the process goes away.
    ///
    /// # Errors
    /// Returns the storage failure.
    pub fn shutdown(&mut self) -> Result<(), PersistenceError> {
        self.store.flush()
    }

    fn step(&mut self, id: TaskId, delta: i64) -> Outcome {
        match self.store.update_progress(id, delta) {
            Some(_) => Outcome {
                redraw: Redraw::Card(id),
                ..Outcome::unchanged()
            },
            None => Outcome::unchanged(),
        }
    }

    fn delete(&mut self, id: TaskId, confirm: &mut dyn Confirm) -> Outcome {
        let Some(task) = self.store.get(id) else {
            return Outcome::unchanged();
        };
        let prompt = format!("Delete \"{}\"?", EscapedText::escape(task.name()));
        if !confirm.confirm(&prompt) {
            return Outcome::cancelled("Delete");
        }
        self.store.delete(id);
        Outcome {
            redraw: Redraw::Full,
            notice: Some("Task deleted".to_owned()),
            warning: None,
        }
    }

    fn import(&mut self, tasks: Vec<Task>, confirm: &mut dyn Confirm) -> Result<Outcome, ImportError> {
        if tasks.is_empty() {
            return Err(ImportError::Empty);
        }
        let prompt = format!(
            "Replace all {} current tasks with {} imported tasks?",
            self.store.len(),
            tasks.len()
        );
        if !confirm.confirm(&prompt) {
            return Ok(Outcome::cancelled("Import"));
        }
        let count = self.store.import_all(tasks)?;
        Ok(Outcome {
            redraw: Redraw::Full,
            notice: Some(format!("Imported {count} tasks")),
            warning: None,
        })
    }

    fn clear_all(&mut self, confirm: &mut dyn Confirm) -> Outcome {
        let first = format!("Delete all {} tasks?", self.store.len());
        if !confirm.confirm(&first) || !confirm.confirm("This cannot be undone. Really delete everything?") {
            return Outcome::cancelled("Clear");
        }
        self.store.clear_all();
        Outcome {
            redraw: Redraw::Full,
            notice: Some("All tasks deleted".to_owned()),
            warning: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::persistence::{DEFAULT_STORAGE_KEY, Persistence};
    use crate::storage::MemoryStorage;
    use time::macros::date;

    /// Replays canned answers and records every prompt.
    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<bool>,
        prompts: Vec<String>,
    }

    impl Scripted {
        fn new(answers: &[bool]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                prompts: Vec::new(),
            }
        }
    }

    impl Confirm for Scripted {
        fn confirm(&mut self, prompt: &str) -> bool {
            self.prompts.push(prompt.to_owned());
            self.answers.pop_front().unwrap_or(false)
        }
    }

    fn controller() -> Controller<MemoryStorage> {
        let persistence = Persistence::new(MemoryStorage::default(), DEFAULT_STORAGE_KEY);
        Controller::new(TaskStore::open(persistence), Duration::from_secs(30))
    }

    fn create(ctrl: &mut Controller<MemoryStorage>, name: &str, target: &str) -> TaskId {
        let gesture = Gesture::Create {
            name: name.to_owned(),
            target: target.to_owned(),
        };
        ctrl.dispatch(gesture, &mut FixedAnswer(false))
            .unwrap_or_else(|err| panic!("create {name}: {err}"));
        ctrl.store()
            .tasks()
            .last()
            .map(Task::id)
            .unwrap_or_else(|| panic!("created task"))
    }

    fn saved(ctrl: &Controller<MemoryStorage>) -> Option<String> {
        ctrl.store().persistence().storage().value(DEFAULT_STORAGE_KEY)
    }

    #[test]
    fn increments_redraw_a_single_card() {
        let mut ctrl = controller();
        let id = create(&mut ctrl, "Read books", "10");
        for _ in 0..3 {
            let outcome = ctrl
                .dispatch(Gesture::Increment(id), &mut FixedAnswer(false))
                .unwrap_or_else(|err| panic!("increment: {err}"));
            assert_eq!(outcome.redraw, Redraw::Card(id));
        }
        assert_eq!(ctrl.board().cards()[0].current, 3);
        assert!((ctrl.board().cards()[0].percent - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn create_rejects_blank_and_non_numeric_input() {
        let mut ctrl = controller();
        let blank = ctrl.dispatch(
            Gesture::Create {
                name: "   ".to_owned(),
                target: "5".to_owned(),
            },
            &mut FixedAnswer(true),
        );
        assert!(matches!(blank, Err(ControllerError::Validation(ValidationError::EmptyName))));

        let words = ctrl.dispatch(
            Gesture::Create {
                name: "x".to_owned(),
                target: "five".to_owned(),
            },
            &mut FixedAnswer(true),
        );
        assert!(matches!(
            words,
            Err(ControllerError::Validation(ValidationError::NotAnInteger { field: "target", .. }))
        ));
        assert!(ctrl.store().is_empty());
        assert!(matches!(ctrl.board(), Board::Empty(_)));
    }

    #[test]
    fn edit_rejects_progress_above_target() {
        let mut ctrl = controller();
        let id = create(&mut ctrl, "Read books", "10");
        let result = ctrl.dispatch(
            Gesture::Edit {
                id,
                name: "X".to_owned(),
                current: "8".to_owned(),
                target: "5".to_owned(),
            },
            &mut FixedAnswer(true),
        );
        assert!(matches!(
            result,
            Err(ControllerError::Validation(ValidationError::CurrentExceedsTarget { current: 8, target: 5 }))
        ));
        let task = ctrl.store().get(id).unwrap_or_else(|| panic!("task"));
        assert_eq!((task.name(), task.current(), task.target()), ("Read books", 0, 10));
    }

    #[test]
    fn edit_redraws_the_whole_board() {
        let mut ctrl = controller();
        let id = create(&mut ctrl, "Read books", "10");
        let outcome = ctrl
            .dispatch(
                Gesture::Edit {
                    id,
                    name: "Read more".to_owned(),
                    current: "4".to_owned(),
                    target: "12".to_owned(),
                },
                &mut FixedAnswer(false),
            )
            .unwrap_or_else(|err| panic!("edit: {err}"));
        assert_eq!(outcome.redraw, Redraw::Full);
        assert_eq!(ctrl.board().cards()[0].name.as_str(), "Read more");
        assert_eq!(ctrl.board().cards()[0].progress_label(), "4 / 12 (33%)");
    }

    #[test]
    fn load_problem_is_handed_out_once() {
        let storage = MemoryStorage::with_value(DEFAULT_STORAGE_KEY, r#"[{"id":1,"name":"x","target":1,"current":3}]"#);
        let persistence = Persistence::new(storage, DEFAULT_STORAGE_KEY);
        let mut ctrl = Controller::new(TaskStore::open(persistence), Duration::from_secs(30));
        assert!(matches!(ctrl.take_load_warning(), Some(PersistenceError::Corrupt { .. })));
        assert!(ctrl.take_load_warning().is_none());
        assert!(matches!(ctrl.board(), Board::Empty(_)));
    }

    #[test]
    fn delete_asks_first() {
        let mut ctrl = controller();
        let id = create(&mut ctrl, "Read books", "10");

        let mut no = Scripted::new(&[false]);
        let outcome = ctrl
            .dispatch(Gesture::Delete(id), &mut no)
            .unwrap_or_else(|err| panic!("delete: {err}"));
        assert_eq!(outcome.redraw, Redraw::None);
        assert_eq!(no.prompts, ["Delete \"Read books\"?"]);
        assert_eq!(ctrl.store().len(), 1);

        let outcome = ctrl
            .dispatch(Gesture::Delete(id), &mut Scripted::new(&[true]))
            .unwrap_or_else(|err| panic!("delete: {err}"));
        assert_eq!(outcome.redraw, Redraw::Full);
        assert!(ctrl.store().is_empty());
        assert!(matches!(ctrl.board(), Board::Empty(_)));
    }

    #[test]
    fn clear_all_needs_two_confirmations() {
        let mut ctrl = controller();
        create(&mut ctrl, "a", "1");
        create(&mut ctrl, "b", "1");

        let mut once = Scripted::new(&[true, false]);
        ctrl.dispatch(Gesture::ClearAll, &mut once)
            .unwrap_or_else(|err| panic!("clear: {err}"));
        assert_eq!(once.prompts.len(), 2);
        assert_eq!(ctrl.store().len(), 2);

        ctrl.dispatch(Gesture::ClearAll, &mut Scripted::new(&[true, true]))
            .unwrap_or_else(|err| panic!("clear: {err}"));
        assert!(ctrl.store().is_empty());
        assert_eq!(saved(&ctrl).as_deref(), Some("[]"));
    }

    #[test]
    fn import_replaces_after_confirmation() {
        let mut ctrl = controller();
        create(&mut ctrl, "old", "3");
        let imported = taskmeter_core::parse_tasks(
            r#"[{"id":1,"name":"A","target":5,"current":2}]"#,
            taskmeter_core::EmptyPolicy::Reject,
        )
        .unwrap_or_else(|err| panic!("parse: {err}"));

        ctrl.dispatch(Gesture::Import(imported.clone()), &mut FixedAnswer(false))
            .unwrap_or_else(|err| panic!("import: {err}"));
        assert_eq!(ctrl.store().tasks()[0].name(), "old");

        let outcome = ctrl
            .dispatch(Gesture::Import(imported), &mut FixedAnswer(true))
            .unwrap_or_else(|err| panic!("import: {err}"));
        assert_eq!(outcome.notice.as_deref(), Some("Imported 1 tasks"));
        assert_eq!(
            saved(&ctrl).as_deref(),
            Some(r#"[{"id":1,"name":"A","target":5,"current":2}]"#)
        );
        assert!(matches!(
            ctrl.dispatch(Gesture::Import(Vec::new()), &mut FixedAnswer(true)),
            Err(ControllerError::Import(ImportError::Empty))
        ));
    }

    #[test]
    fn move_order_swaps_neighbours() {
        let mut ctrl = controller();
        let a = create(&mut ctrl, "a", "1");
        let b = create(&mut ctrl, "b", "1");
        let c = create(&mut ctrl, "c", "1");

        assert_eq!(ctrl.order_after_move(c, Direction::Up), Some(vec![a, c, b]));
        assert_eq!(ctrl.order_after_move(a, Direction::Down), Some(vec![b, a, c]));
        assert_eq!(ctrl.order_after_move(a, Direction::Up), None);
        assert_eq!(ctrl.order_after_move(c, Direction::Down), None);

        let order = ctrl
            .order_after_move(a, Direction::Down)
            .unwrap_or_else(|| panic!("order"));
        ctrl.dispatch(Gesture::Reorder(order), &mut FixedAnswer(false))
            .unwrap_or_else(|err| panic!("reorder: {err}"));
        let ids: Vec<TaskId> = ctrl.board().cards().iter().map(|card| card.id).collect();
        assert_eq!(ids, [b, a, c]);
    }

    #[test]
    fn storage_failure_is_reported_but_change_kept() {
        let mut ctrl = controller();
        let id = create(&mut ctrl, "a", "5");
        ctrl.store().persistence().storage().set_fail_writes(true);
        let outcome = ctrl
            .dispatch(Gesture::Increment(id), &mut FixedAnswer(false))
            .unwrap_or_else(|err| panic!("increment: {err}"));
        assert!(outcome.warning.is_some_and(|w| w.contains("quota")));
        assert_eq!(ctrl.store().get(id).map(Task::current), Some(1));
    }

    #[test]
    fn tick_flushes_only_when_due() {
        let mut ctrl = controller();
        create(&mut ctrl, "a", "5");
        let writes = ctrl.store().persistence().storage().writes();

        assert!(ctrl.tick(Instant::now()).is_none());
        assert_eq!(ctrl.store().persistence().storage().writes(), writes);

        assert!(ctrl.tick(Instant::now() + Duration::from_secs(31)).is_none());
        assert_eq!(ctrl.store().persistence().storage().writes(), writes + 1);
    }

    #[test]
    fn export_uses_dated_file_name() {
        let mut ctrl = controller();
        create(&mut ctrl, "a", "5");
        let export = ctrl
            .export(date!(2025 - 01 - 31))
            .unwrap_or_else(|err| panic!("export: {err}"));
        assert_eq!(export.file_name, "task-progress-data-2025-01-31.json");
        assert!(export.contents.starts_with("[\n  {\n    \"id\""));
    }
}
