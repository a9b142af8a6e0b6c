//! Periodic flush schedule.

use std::time::{Duration, Instant};

/// Default interval between periodic flushes.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Tracks when the next periodic flush is due.
#[derive(Debug, Clone, Copy)]
pub struct Autosave {
    interval: Duration,
    last: Instant,
}

impl Autosave {
    /// Schedule starting at `now`.
    #[must_use]
    pub const fn new(interval: Duration, now: Instant) -> Self {
        Self { interval, last: now }
    }

    /// Configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// True once `interval` elapsed since the last flush.
    #[must_use]
    pub fn due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last) >= self.interval
    }

    /// Record a flush at `now`.
    pub const fn mark(&mut self, now: Instant) {
        self.last = now;
    }
}
