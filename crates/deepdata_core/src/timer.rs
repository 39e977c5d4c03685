// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cancellable one-shot deadlines polled by the frame loop.

use std::time::{Duration, Instant};

/// A deferred action that fires at most once per arm.
///
/// The owner polls it with [`DelayedAction::fire_if_due`]; nothing runs in
/// the background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelayedAction {
    deadline: Option<Instant>,
}

impl DelayedAction {
    /// A disarmed action
    pub const fn idle() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) to fire `delay` after `now`
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Disarm. Returns whether it was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Whether a deadline is pending
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once when `now` has reached the deadline, and
    /// disarms.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Earliest of two optional deadlines
pub fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
