//! Outbound application events.
//!
//! The [`LockController`](super::service::LockController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  The twin
//! outbox turns them into reported properties and telemetry messages;
//! test sinks simply record them.

use core::fmt;

use crate::fsm::MenuState;
use crate::twin::StateReport;

/// Telemetry message categories understood by the cloud dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryCategory {
    DoorEvent,
    LockEvent,
    ConfigEvent,
    ConfigWarning,
    LockWarning,
    LockCritical,
}

impl TelemetryCategory {
    /// Telemetry key as sent to the hub.
    pub fn key(self) -> &'static str {
        match self {
            Self::DoorEvent => "DoorEvent",
            Self::LockEvent => "LockEvent",
            Self::ConfigEvent => "ConfigEvent",
            Self::ConfigWarning => "ConfigWarning",
            Self::LockWarning => "LockWarning",
            Self::LockCritical => "LockCritical",
        }
    }
}

impl fmt::Display for TelemetryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One telemetry line: category key plus free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryEvent {
    pub category: TelemetryCategory,
    pub message: String,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A telemetry message for the hub.
    Telemetry(TelemetryEvent),

    /// A reported twin property changed.
    Reported(StateReport),

    /// The menu state machine moved.
    MenuChanged { from: MenuState, to: MenuState },

    /// The controller finished its start-up sequence.
    Started,
}

impl AppEvent {
    pub fn telemetry(category: TelemetryCategory, message: impl Into<String>) -> Self {
        Self::Telemetry(TelemetryEvent {
            category,
            message: message.into(),
        })
    }
}
