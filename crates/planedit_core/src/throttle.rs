//! Trailing-edge throttle driven by an injected clock.

use crate::TimeProvider;
use std::sync::Arc;
use std::time::Duration;

/// Collapses bursts of calls into one trailing value.
///
/// The first call in a quiet period arms a deadline `interval` later; calls
/// before the deadline replace the pending value. Nothing fires on the
/// leading edge. The owner drives time by calling [`Throttle::poll`].
pub struct Throttle<T> {
    interval_ms: i64,
    clock: Arc<dyn TimeProvider>,
    pending: Option<T>,
    deadline: Option<i64>,
}

impl<T> Throttle<T> {
    /// Creates an idle throttle.
    pub fn new(interval: Duration, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            interval_ms: interval.as_millis().min(i64::MAX as u128) as i64,
            clock,
            pending: None,
            deadline: None,
        }
    }

    /// Records a value, arming the deadline if none is armed.
    pub fn call(&mut self, value: T) {
        if self.deadline.is_none() {
            self.deadline = Some(self.clock.now_millis().saturating_add(self.interval_ms));
        }
        self.pending = Some(value);
    }

    /// Returns the pending value once its deadline has passed.
    pub fn poll(&mut self) -> Option<T> {
        match self.deadline {
            Some(deadline) if self.clock.now_millis() >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Returns the pending value immediately, disarming the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }

    /// Returns true if a value is waiting for its deadline.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the armed deadline in milliseconds.
    pub fn deadline(&self) -> Option<i64> {
        self.deadline
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Throttle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("interval_ms", &self.interval_ms)
            .field("pending", &self.pending)
            .field("deadline", &self.deadline)
            .finish()
    }
}
