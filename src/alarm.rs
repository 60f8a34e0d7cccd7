//! Intrusion alarm.
//!
//! The alarm trips when the door opens while the bolt is commanded closed
//! and nobody is in a menu.  It stays latched until an operator clears it
//! (correct code at the keypad, or the `ResetAlarm` direct method).
//!
//! Like the lock relay, this type only owns the latch and the output
//! line; reports, telemetry and screens are emitted by the controller
//! from the returned flag.

use crate::app::ports::LinePort;
use crate::drivers::lock_relay::LockPosition;
use crate::error::LineError;
use crate::fsm::MenuState;

#[derive(Debug, Clone, Default)]
pub struct AlarmManager {
    active: bool,
}

impl AlarmManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Latch the alarm and drive the output active.
    /// Returns `false` (and touches nothing) if it was already active.
    pub fn trip(&mut self, lines: &mut impl LinePort) -> Result<bool, LineError> {
        if self.active {
            return Ok(false);
        }
        lines.set_alarm(true)?;
        self.active = true;
        Ok(true)
    }

    /// Release the latch and drive the output inactive.
    /// Returns `false` (and touches nothing) if it was not active.
    pub fn clear(&mut self, lines: &mut impl LinePort) -> Result<bool, LineError> {
        if !self.active {
            return Ok(false);
        }
        lines.set_alarm(false)?;
        self.active = false;
        Ok(true)
    }

    /// Auto-trip condition, evaluated once per control tick.
    pub fn should_trip(&self, door_opened: bool, menu: MenuState, lock: LockPosition) -> bool {
        door_opened && menu == MenuState::NormalOperation && lock == LockPosition::Closed && !self.active
    }
}
