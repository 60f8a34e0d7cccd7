//! Lock relay actuator.
//!
//! Drives the bolt relay to a logical locked/unlocked position.  The
//! electrical level for each position depends on the configured
//! [`ContactMode`]; the two remote overrides win over any local request.
//!
//! ## Contract
//!
//! - Actuation is idempotent: if the line already sits at the target
//!   level nothing is written and [`Actuation::Unchanged`] is returned.
//! - A line error leaves `position` untouched.  The caller must not
//!   retry; the relay state is unknown.
//! - The driver reports *what happened*; events and screens are the
//!   controller's business.

use crate::app::ports::{Level, LinePort};
use crate::config::ContactMode;
use crate::error::LineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPosition {
    Open,
    Closed,
}

/// Outcome of a lock/unlock request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuation {
    /// The relay line was driven to a new level.
    Changed,
    /// The line was already at the requested level.
    Unchanged,
    /// A remote override blocked the request.
    Overridden,
}

#[derive(Debug, Clone)]
pub struct LockRelay {
    position: LockPosition,
    forced_open: bool,
    forced_closed: bool,
}

impl Default for LockRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl LockRelay {
    pub fn new() -> Self {
        Self {
            position: LockPosition::Closed,
            forced_open: false,
            forced_closed: false,
        }
    }

    pub fn lock(&mut self, lines: &mut impl LinePort, contact: ContactMode) -> Result<Actuation, LineError> {
        if self.forced_open {
            return Ok(Actuation::Overridden);
        }
        let outcome = drive(lines, contact.locked_level())?;
        self.position = LockPosition::Closed;
        Ok(outcome)
    }

    pub fn unlock(&mut self, lines: &mut impl LinePort, contact: ContactMode) -> Result<Actuation, LineError> {
        if self.forced_closed {
            return Ok(Actuation::Overridden);
        }
        let outcome = drive(lines, contact.unlocked_level())?;
        self.position = LockPosition::Open;
        Ok(outcome)
    }

    /// Logical state read back from the relay line, not from `position`.
    pub fn is_locked(&self, lines: &mut impl LinePort, contact: ContactMode) -> Result<bool, LineError> {
        Ok(lines.lock_level()? == contact.locked_level())
    }

    /// Last commanded position.
    pub fn position(&self) -> LockPosition {
        self.position
    }

    pub fn forced_open(&self) -> bool {
        self.forced_open
    }

    pub fn forced_closed(&self) -> bool {
        self.forced_closed
    }

    pub fn set_forced_open(&mut self, on: bool) {
        self.forced_open = on;
    }

    pub fn set_forced_closed(&mut self, on: bool) {
        self.forced_closed = on;
    }
}

fn drive(lines: &mut impl LinePort, target: Level) -> Result<Actuation, LineError> {
    if lines.lock_level()? == target {
        return Ok(Actuation::Unchanged);
    }
    lines.set_lock_level(target)?;
    Ok(Actuation::Changed)
}
