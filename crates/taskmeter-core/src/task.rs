use serde::Serialize;
use time::OffsetDateTime;

use crate::id::TaskId;
use crate::validate::{ValidationError, check_progress, check_target, normalize_name};

/// A named goal with a numeric target and the progress made toward it.
///
/// The fields are private so that `target >= 1` and `0 <= current <= target`
/// hold for every value of this type. Deserialization goes through
/// [`crate::import::parse_tasks`], which checks every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    name: String,
    target: i64,
    current: i64,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    created_at: Option<OffsetDateTime>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    last_modified: Option<OffsetDateTime>,
}

impl Task {
    /// Build a freshly created task with no progress.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a blank name or a target below one.
    pub fn new(id: TaskId, name: &str, target: i64, now: OffsetDateTime) -> Result<Self, ValidationError> {
        let name = normalize_name(name)?;
        let target = check_target(target)?;
        Ok(Self {
            id,
            name,
            target,
            current: 0,
            created_at: Some(now),
            last_modified: Some(now),
        })
    }

    /// Rebuild a task from previously stored fields, checking every invariant.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the fields break a task invariant.
    pub fn restore(
        id: TaskId,
        name: &str,
        target: i64,
        current: i64,
        created_at: Option<OffsetDateTime>,
        last_modified: Option<OffsetDateTime>,
    ) -> Result<Self, ValidationError> {
        let name = normalize_name(name)?;
        check_progress(current, target)?;
        Ok(Self {
            id,
            name,
            target,
            current,
            created_at,
            last_modified,
        })
    }

    /// Identity of the task.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Display name (already trimmed).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Goal value, always at least one.
    #[must_use]
    pub const fn target(&self) -> i64 {
        self.target
    }

    /// Progress made, always within `0..=target`.
    #[must_use]
    pub const fn current(&self) -> i64 {
        self.current
    }

    /// Creation time, absent only for imported records that did not carry one.
    #[must_use]
    pub const fn created_at(&self) -> Option<OffsetDateTime> {
        self.created_at
    }

    /// Time of the latest change to name, target or progress.
    #[must_use]
    pub const fn last_modified(&self) -> Option<OffsetDateTime> {
        self.last_modified
    }

    /// True once progress reached the target.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.current >= self.target
    }

    /// Progress as a percentage in `0.0..=100.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_complete(&self) -> f64 {
        self.current as f64 * 100.0 / self.target as f64
    }

    /// Move progress by `delta`, clamped into `0..=target`.
    pub fn apply_delta(&mut self, delta: i64, now: OffsetDateTime) {
        self.current = self.current.saturating_add(delta).clamp(0, self.target);
        self.last_modified = Some(now);
    }

    /// Replace name, progress and target together, or not at all.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] and leaves the task untouched when any
    /// of the new values is invalid.
    pub fn replace(
        &mut self,
        name: &str,
        current: i64,
        target: i64,
        now: OffsetDateTime,
    ) -> Result<(), ValidationError> {
        let name = normalize_name(name)?;
        check_progress(current, target)?;
        self.name = name;
        self.current = current;
        self.target = target;
        self.last_modified = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> Task {
        Task::new(TaskId(1), "  Read books ", 10, datetime!(2024-05-01 12:00:00 UTC))
            .unwrap_or_else(|err| panic!("valid task: {err}"))
    }

    #[test]
    fn new_task_starts_empty_and_trimmed() {
        let task = sample();
        assert_eq!(task.name(), "Read books");
        assert_eq!(task.current(), 0);
        assert_eq!(task.created_at(), task.last_modified());
        assert!(!task.is_complete());
    }

    #[test]
    fn new_task_rejects_bad_input() {
        let now = datetime!(2024-05-01 12:00:00 UTC);
        assert_eq!(Task::new(TaskId(1), "", 5, now), Err(ValidationError::EmptyName));
        assert_eq!(
            Task::new(TaskId(1), "x", 0, now),
            Err(ValidationError::TargetTooSmall(0))
        );
    }

    #[test]
    fn apply_delta_clamps_to_range() {
        let mut task = sample();
        let later = datetime!(2024-05-02 08:00:00 UTC);
        task.apply_delta(i64::MAX, later);
        assert_eq!(task.current(), 10);
        assert!(task.is_complete());
        task.apply_delta(i64::MIN, later);
        assert_eq!(task.current(), 0);
        assert_eq!(task.last_modified(), Some(later));
    }

    #[test]
    fn replace_is_all_or_nothing() {
        let mut task = sample();
        let before = task.clone();
        let err = task.replace("X", 8, 5, datetime!(2024-05-02 08:00:00 UTC));
        assert_eq!(
            err,
            Err(ValidationError::CurrentExceedsTarget { current: 8, target: 5 })
        );
        assert_eq!(task, before);

        task.replace(" X ", 4, 5, datetime!(2024-05-02 08:00:00 UTC))
            .unwrap_or_else(|err| panic!("valid edit: {err}"));
        assert_eq!((task.name(), task.current(), task.target()), ("X", 4, 5));
    }

    #[test]
    fn percent_complete_tracks_fraction() {
        let mut task = sample();
        task.apply_delta(3, datetime!(2024-05-02 08:00:00 UTC));
        assert!((task.percent_complete() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_camel_case_and_rfc3339() {
        let json = serde_json::to_value(sample()).unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(json["id"], 1);
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
        assert_eq!(json["lastModified"], "2024-05-01T12:00:00Z");
    }
}
