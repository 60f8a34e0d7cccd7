//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the three digital lines (door sensor, lock relay, alarm relay)
//! and exposes them through [`LinePort`].  The display and keypad are
//! separate collaborators; the adapter owns them too and forwards
//! [`DisplayPort`] and [`KeypadPort`], so the controller sees a single
//! `hw` value.  This is the only module in the system that touches
//! actual GPIO.
//!
//! The lines are `embedded-hal` 1.0 digital pins, so on the host the same
//! adapter runs over simulated pins.

use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};

use crate::app::ports::{DisplayPort, KeypadPort, Level, LinePort};
use crate::display::Screen;
use crate::error::{DisplayError, KeypadError, LineError};

/// Electrical polarity of the door and alarm lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePolarity {
    /// Door sensor reads high when the door is open.
    pub door_open_high: bool,
    /// Alarm relay is energised by driving the pin high.
    pub alarm_active_high: bool,
}

impl Default for LinePolarity {
    /// Reed switch to ground with pull-up (open = high), alarm relay
    /// module active high.
    fn default() -> Self {
        Self {
            door_open_high: true,
            alarm_active_high: true,
        }
    }
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<Door, Lock, Alarm, Disp, Keys> {
    door: Door,
    lock: Lock,
    alarm: Alarm,
    display: Disp,
    keypad: Keys,
    polarity: LinePolarity,
}

impl<Door, Lock, Alarm, Disp, Keys> HardwareAdapter<Door, Lock, Alarm, Disp, Keys>
where
    Door: InputPin,
    Lock: StatefulOutputPin,
    Alarm: OutputPin,
{
    pub fn new(door: Door, lock: Lock, alarm: Alarm, display: Disp, keypad: Keys, polarity: LinePolarity) -> Self {
        Self {
            door,
            lock,
            alarm,
            display,
            keypad,
            polarity,
        }
    }

    pub fn display(&self) -> &Disp {
        &self.display
    }

    pub fn keypad_mut(&mut self) -> &mut Keys {
        &mut self.keypad
    }
}

// ── LinePort implementation ───────────────────────────────────

impl<Door, Lock, Alarm, Disp, Keys> LinePort for HardwareAdapter<Door, Lock, Alarm, Disp, Keys>
where
    Door: InputPin,
    Lock: StatefulOutputPin,
    Alarm: OutputPin,
{
    fn door_open(&mut self) -> Result<bool, LineError> {
        let high = self.door.is_high().map_err(|_| LineError::DoorRead)?;
        Ok(high == self.polarity.door_open_high)
    }

    fn lock_level(&mut self) -> Result<Level, LineError> {
        let high = self.lock.is_set_high().map_err(|_| LineError::LockRead)?;
        Ok(Level::from_high(high))
    }

    fn set_lock_level(&mut self, level: Level) -> Result<(), LineError> {
        match level {
            Level::High => self.lock.set_high(),
            Level::Low => self.lock.set_low(),
        }
        .map_err(|_| LineError::LockWrite)
    }

    fn set_alarm(&mut self, active: bool) -> Result<(), LineError> {
        if active == self.polarity.alarm_active_high {
            self.alarm.set_high()
        } else {
            self.alarm.set_low()
        }
        .map_err(|_| LineError::AlarmWrite)
    }
}

// ── Forwarded collaborators ───────────────────────────────────

impl<Door, Lock, Alarm, Disp, Keys> DisplayPort for HardwareAdapter<Door, Lock, Alarm, Disp, Keys>
where
    Disp: DisplayPort,
{
    fn draw(&mut self, screen: Screen) -> Result<(), DisplayError> {
        self.display.draw(screen)
    }
}

impl<Door, Lock, Alarm, Disp, Keys> KeypadPort for HardwareAdapter<Door, Lock, Alarm, Disp, Keys>
where
    Keys: KeypadPort,
{
    fn read_key(&mut self) -> Result<Option<char>, KeypadError> {
        self.keypad.read_key()
    }
}
