//! Domain types and validation rules for taskmeter.

/// Task identifiers and their generator.
pub mod id;
/// Snapshot parsing and export rendering.
pub mod import;
/// The task record.
pub mod task;
/// Input validation rules.
pub mod validate;

pub use id::{IdGenerator, TaskId};
pub use import::{EmptyPolicy, ImportError, RecordProblem, parse_tasks, to_pretty_json, validate_tasks};
pub use task::Task;
pub use validate::{ValidationError, parse_count};
