//! Keystroke debouncing
//!
//! The owner pushes every raw value and polls from its event loop. A value is
//! released only after `interval` has passed with no newer push; each push
//! restarts the timer. Time is passed in explicitly so callers (and tests)
//! control the clock.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Cancellable single-slot timer holding the latest unreleased value
#[derive(Debug)]
pub struct Debouncer<T> {
    interval: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    /// Schedule `value`, replacing any pending value and restarting the timer
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.interval,
        });
    }

    /// Release the pending value once its quiet interval has fully elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if ready {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Drop the pending value without releasing it
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
