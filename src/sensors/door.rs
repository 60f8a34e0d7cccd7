//! Door contact monitor.
//!
//! Turns raw door-sensor samples into change events.  The first sample
//! after construction only seeds the previous value; it never reports a
//! change, so a door that is already open at boot does not look like an
//! opening.

use crate::app::ports::LinePort;
use crate::error::LineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Open,
    Closed,
}

impl DoorState {
    pub fn from_open(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

#[derive(Debug, Clone, Default)]
pub struct DoorMonitor {
    previous: Option<DoorState>,
}

impl DoorMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the sensor without touching the stored sample.
    pub fn sample(&self, lines: &mut impl LinePort) -> Result<DoorState, LineError> {
        lines.door_open().map(DoorState::from_open)
    }

    /// Read the sensor and report whether it differs from the previous
    /// sample.  The first call always answers `false`.
    pub fn changed(&mut self, lines: &mut impl LinePort) -> Result<bool, LineError> {
        let now = self.sample(lines)?;
        Ok(self.observe(now))
    }

    /// Feed one sample.  Returns `true` on a transition.
    pub fn observe(&mut self, sample: DoorState) -> bool {
        let changed = self.previous.is_some_and(|prev| prev != sample);
        self.previous = Some(sample);
        changed
    }

    /// Most recent sample, `None` before the first read.
    pub fn last(&self) -> Option<DoorState> {
        self.previous
    }
}
