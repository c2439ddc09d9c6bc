//! Timer-reset debounce primitive.
//!
//! Each `push` replaces the pending value and restarts the quiet period. A
//! value becomes due once no push has happened for the full quiet period.
//! Time is passed in explicitly so callers can drive it from any clock.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer<T> {
    quiet_period: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Replaces the pending value and restarts the quiet period at `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Takes the pending value if its quiet period has elapsed at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        let (_, pushed_at) = self.pending.as_ref()?;
        if now.saturating_duration_since(*pushed_at) < self.quiet_period {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
            .as_ref()
            .map(|(_, pushed_at)| *pushed_at + self.quiet_period)
    }

    /// Takes the pending value immediately, regardless of the quiet period.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drops the pending value without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
