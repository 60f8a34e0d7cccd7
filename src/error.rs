//! Unified error types for the door lock firmware.
//!
//! Every failure that can abort a tick funnels into [`Error`].  Business
//! conditions (wrong code, malformed twin payload, cloud outage) are not
//! errors at this level: they are handled where they occur and the loop
//! keeps running.  All variants are `Copy` so they can be passed through
//! the controller without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// A fatal condition for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A digital line (door sensor, lock relay, alarm relay) failed.
    Line(LineError),
    /// The display collaborator failed to render.
    Display(DisplayError),
    /// The keypad collaborator failed to scan.
    Keypad(KeypadError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(e) => write!(f, "line: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Keypad(e) => write!(f, "keypad: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Line errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    /// Door sensor input could not be read.
    DoorRead,
    /// Lock relay output level could not be read back.
    LockRead,
    /// Lock relay output could not be driven.
    LockWrite,
    /// Alarm relay output could not be driven.
    AlarmWrite,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoorRead => write!(f, "door sensor read failed"),
            Self::LockRead => write!(f, "lock relay read failed"),
            Self::LockWrite => write!(f, "lock relay write failed"),
            Self::AlarmWrite => write!(f, "alarm relay write failed"),
        }
    }
}

impl From<LineError> for Error {
    fn from(e: LineError) -> Self {
        Self::Line(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Bus transfer to the panel failed.
    BusWrite,
    /// Panel is not initialised.
    NotReady,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusWrite => write!(f, "bus write failed"),
            Self::NotReady => write!(f, "panel not ready"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Keypad errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadError {
    /// A row input could not be read.
    RowRead,
    /// A column output could not be driven.
    ColumnWrite,
}

impl fmt::Display for KeypadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowRead => write!(f, "row read failed"),
            Self::ColumnWrite => write!(f, "column write failed"),
        }
    }
}

impl From<KeypadError> for Error {
    fn from(e: KeypadError) -> Self {
        Self::Keypad(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

/// Cloud transport failures.  Never fatal: they only feed the reconnect
/// backoff in the slow tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    NetworkUnavailable,
    ConnectFailed,
    NotAuthenticated,
    PublishFailed,
    SubscribeFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkUnavailable => write!(f, "network unavailable"),
            Self::ConnectFailed => write!(f, "IoT hub connect failed"),
            Self::NotAuthenticated => write!(f, "IoT hub not authenticated"),
            Self::PublishFailed => write!(f, "MQTT publish failed"),
            Self::SubscribeFailed => write!(f, "MQTT subscribe failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
