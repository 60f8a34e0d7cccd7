//! Monotonic time, deadlines, and the clock abstraction.
//!
//! Every timeout in the controller is a [`Deadline`] derived from an
//! [`Instant`] read through a [`Clock`].  Nothing here ever looks at wall
//! time, so clock adjustments (NTP, manual set) cannot shorten or extend a
//! lockout or a relock window.

use core::cell::Cell;
use std::rc::Rc;

/// Milliseconds since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(u64);

impl Instant {
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds from `earlier` to `self`, zero if `earlier` is later.
    pub fn millis_since(self, earlier: Instant) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn saturating_add_millis(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

/// A point in time after which something is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `duration_ms` after `start`.
    pub fn after(start: Instant, duration_ms: u64) -> Self {
        Self {
            at: start.saturating_add_millis(duration_ms),
        }
    }

    pub fn at(self) -> Instant {
        self.at
    }

    /// `true` once `now` has reached the deadline.
    pub fn is_expired(self, now: Instant) -> bool {
        now >= self.at
    }
}

/// Source of monotonic time, injected into the controller.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Manually advanced clock for tests and bench simulation.
///
/// Clones share the same underlying counter, so a test can keep one handle
/// and give another to the controller.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    ms: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: u64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    pub fn advance(&self, ms: u64) {
        self.ms.set(self.ms.get().saturating_add(ms));
    }

    pub fn set(&self, ms: u64) {
        self.ms.set(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.ms.get())
    }
}
