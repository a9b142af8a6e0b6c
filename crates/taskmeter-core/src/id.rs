use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use std::{fmt, str::FromStr};
use time::OffsetDateTime;

/// Identifier of a task: milliseconds since the Unix epoch at creation time.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Issues strictly increasing task ids derived from the wall clock.
///
/// Two creations inside the same millisecond (or a clock that stepped
/// backwards) still get distinct ids: the generator never hands out a value
/// that is not greater than the last one it issued or observed.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Create a generator that will never collide with `existing`.
    pub fn seeded<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = TaskId>,
    {
        let mut generator = Self::default();
        for id in existing {
            generator.observe(id);
        }
        generator
    }

    /// Record an id issued elsewhere (loaded or imported) so it is never reissued.
    pub fn observe(&mut self, id: TaskId) {
        self.last = self.last.max(id.0);
    }

    /// Issue an id for a task created at `now`.
    ///
    /// Returns `None` once an id equal to `i64::MAX` was issued or observed,
    /// since nothing above it is left.
    pub fn next_at(&mut self, now: OffsetDateTime) -> Option<TaskId> {
        let next = unix_millis(now).max(self.last.checked_add(1)?);
        self.last = next;
        Some(TaskId(next))
    }

    /// Issue an id for a task created right now.
    pub fn next_id(&mut self) -> Option<TaskId> {
        self.next_at(OffsetDateTime::now_utc())
    }

    /// Highest id issued or observed so far.
    #[must_use]
    pub const fn last(&self) -> TaskId {
        TaskId(self.last)
    }
}

fn unix_millis(ts: OffsetDateTime) -> i64 {
    i64::try_from(ts.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}
