//! Invalid-credential lockout.
//!
//! Three failed credential attempts lock the keypad for the block-lock
//! timeout.  Two independent timers drive the guard:
//!
//! | Timer            | Armed by           | On expiry                         |
//! |------------------|--------------------|-----------------------------------|
//! | failure reset    | every failure      | attempt counter back to 0         |
//! | block lock       | the third failure  | lockout lifted, counter back to 0 |
//!
//! Both are [`Deadline`]s computed from the injected clock; the guard
//! never reads time on its own.

use log::{info, warn};

use crate::config::TimingConfig;
use crate::timing::{Deadline, Instant};

/// Failures that trigger the lockout.
pub const MAX_INVALID_ATTEMPTS: u8 = 3;

/// What a recorded failure did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Counted; the keypad is still usable.  Carries the running count.
    Counted(u8),
    /// This failure reached the limit and started the lockout.
    LockedOut,
}

#[derive(Debug, Clone)]
pub struct LockoutGuard {
    invalid_attempts: u8,
    active: bool,
    last_failure_at: Option<Instant>,
    lockout_started_at: Option<Instant>,
    block_lock_ms: u64,
    failure_reset_ms: u64,
}

impl LockoutGuard {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            invalid_attempts: 0,
            active: false,
            last_failure_at: None,
            lockout_started_at: None,
            block_lock_ms: u64::from(timing.block_lock_timeout_ms),
            failure_reset_ms: u64::from(timing.failed_attempts_reset_timeout_ms),
        }
    }

    pub fn record_failure(&mut self, now: Instant) -> FailureOutcome {
        self.invalid_attempts = self.invalid_attempts.saturating_add(1);
        self.last_failure_at = Some(now);
        warn!("Invalid credentials ({}/{})", self.invalid_attempts, MAX_INVALID_ATTEMPTS);

        if self.invalid_attempts == MAX_INVALID_ATTEMPTS && !self.active {
            self.active = true;
            self.lockout_started_at = Some(now);
            warn!("Keypad locked out for {} ms", self.block_lock_ms);
            return FailureOutcome::LockedOut;
        }
        FailureOutcome::Counted(self.invalid_attempts)
    }

    pub fn record_success(&mut self) {
        self.invalid_attempts = 0;
    }

    /// Advance both timers.  Returns `true` on the tick that lifts the
    /// lockout.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut released = false;

        if self.active && self.lockout_deadline().is_some_and(|d| d.is_expired(now)) {
            self.active = false;
            self.invalid_attempts = 0;
            self.lockout_started_at = None;
            released = true;
            info!("Keypad lockout lifted");
        }

        if self.failure_reset_deadline().is_some_and(|d| d.is_expired(now)) {
            self.invalid_attempts = 0;
            self.last_failure_at = None;
        }

        released
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn invalid_attempts(&self) -> u8 {
        self.invalid_attempts
    }

    pub fn lockout_deadline(&self) -> Option<Deadline> {
        self.lockout_started_at
            .map(|at| Deadline::after(at, self.block_lock_ms))
    }

    pub fn failure_reset_deadline(&self) -> Option<Deadline> {
        self.last_failure_at
            .map(|at| Deadline::after(at, self.failure_reset_ms))
    }
}
