//! Structural validation of task snapshots coming from outside the process.
//!
//! Both user-supplied import files and the persisted snapshot go through
//! [`parse_tasks`]; the only difference is whether an empty array is
//! acceptable.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::id::TaskId;
use crate::task::Task;
use crate::validate::ValidationError;

/// Whether a snapshot may contain zero tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// Import files must carry at least one task.
    Reject,
    /// Persisted snapshots may legitimately be empty.
    Allow,
}

/// Why an import payload was rejected. Rejection is always all-or-nothing.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The payload is not JSON.
    #[error("import data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload is JSON but not an array.
    #[error("import data must be a JSON array of tasks")]
    NotAnArray,
    /// The array is empty.
    #[error("import data contains no tasks")]
    Empty,
    /// One record failed validation.
    #[error("task #{index} is invalid: {problem}")]
    InvalidRecord {
        /// Zero-based position of the record in the array.
        index: usize,
        /// What is wrong with it.
        problem: RecordProblem,
    },
    /// Two records share an id.
    #[error("task id {0} appears more than once")]
    DuplicateId(TaskId),
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// Per-record validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordProblem {
    /// Entry is not a JSON object.
    #[error("entry is not an object")]
    NotAnObject,
    /// `id` is missing, zero or not a whole number.
    #[error("id must be a non-zero whole number")]
    InvalidId,
    /// `name` is missing or not a string.
    #[error("name must be a non-empty string")]
    MissingName,
    /// A numeric field is missing or not a number.
    #[error("{0} must be a number")]
    NotNumeric(&'static str),
    /// A numeric field has a fractional part.
    #[error("{0} must be a whole number")]
    NotWhole(&'static str),
    /// A timestamp field is present but not RFC 3339.
    #[error("{0} must be an RFC 3339 timestamp")]
    BadTimestamp(&'static str),
    /// Fields are well-formed but break a task invariant.
    #[error(transparent)]
    OutOfRange(#[from] ValidationError),
}

/// Parse and validate a JSON task snapshot.
///
/// # Errors
/// Returns an [`ImportError`] describing the first problem found; no task is
/// returned unless every record is valid.
pub fn parse_tasks(raw: &str, empty: EmptyPolicy) -> Result<Vec<Task>, ImportError> {
    let value: Value = serde_json::from_str(raw)?;
    validate_tasks(value, empty)
}

/// Validate an already-parsed JSON snapshot.
///
/// # Errors
/// See [`parse_tasks`].
pub fn validate_tasks(value: Value, empty: EmptyPolicy) -> Result<Vec<Task>, ImportError> {
    let Value::Array(entries) = value else {
        return Err(ImportError::NotAnArray);
    };
    if entries.is_empty() && empty == EmptyPolicy::Reject {
        return Err(ImportError::Empty);
    }

    let mut seen = HashSet::with_capacity(entries.len());
    let mut tasks = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let task = record_to_task(entry).map_err(|problem| ImportError::InvalidRecord { index, problem })?;
        if !seen.insert(task.id()) {
            return Err(ImportError::DuplicateId(task.id()));
        }
        tasks.push(task);
    }
    Ok(tasks)
}

/// Render tasks as the 2-space indented JSON used for export and storage.
///
/// # Errors
/// Propagates serializer failures.
pub fn to_pretty_json(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tasks)
}

fn record_to_task(entry: &Value) -> Result<Task, RecordProblem> {
    let Value::Object(record) = entry else {
        return Err(RecordProblem::NotAnObject);
    };

    let id = match record.get("id").and_then(Value::as_i64) {
        Some(id) if id != 0 => TaskId(id),
        _ => return Err(RecordProblem::InvalidId),
    };
    let name = record
        .get("name")
        .and_then(Value::as_str)
        .ok_or(RecordProblem::MissingName)?;
    let target = whole_number(record, "target")?;
    let current = whole_number(record, "current")?;
    let created_at = timestamp(record, "createdAt")?;
    let last_modified = timestamp(record, "lastModified")?;

    Ok(Task::restore(id, name, target, current, created_at, last_modified)?)
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn whole_number(record: &Map<String, Value>, field: &'static str) -> Result<i64, RecordProblem> {
    let Some(Value::Number(number)) = record.get(field) else {
        return Err(RecordProblem::NotNumeric(field));
    };
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    // 5.0 is a number JSON writers commonly emit for integers.
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => Ok(value as i64),
        _ => Err(RecordProblem::NotWhole(field)),
    }
}

fn timestamp(record: &Map<String, Value>, field: &'static str) -> Result<Option<OffsetDateTime>, RecordProblem> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => OffsetDateTime::parse(raw, &Rfc3339)
            .map(Some)
            .map_err(|_| RecordProblem::BadTimestamp(field)),
        Some(_) => Err(RecordProblem::BadTimestamp(field)),
    }
}
