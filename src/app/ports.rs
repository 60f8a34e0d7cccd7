//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LockController (domain)
//! ```
//!
//! Driven adapters (digital lines, display, keypad, cloud, event sinks)
//! implement these traits.  The [`LockController`](super::service::LockController)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! ## Failure contract
//!
//! - **LinePort**, **DisplayPort**, **KeypadPort** errors are fatal to the
//!   tick that observed them.  Implementations must never retry a relay
//!   write on their own.
//! - **CloudPort** errors are recoverable and only drive reconnection.
//! - Every method must return promptly; the scheduler has no preemption.

use crate::display::Screen;
use crate::error::{CommsError, DisplayError, KeypadError, LineError};

// ───────────────────────────────────────────────────────────────
// Digital lines (driven adapter: domain ↔ GPIO)
// ───────────────────────────────────────────────────────────────

/// Electrical level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn inverted(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }

    pub fn from_high(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }

    pub fn is_high(self) -> bool {
        self == Self::High
    }
}

/// The three lines the controller owns: door sensor in, lock relay out,
/// alarm relay out.
///
/// The door and alarm lines carry their own active-level polarity inside
/// the adapter; the lock relay is exposed as a raw level because its
/// meaning depends on the runtime [`ContactMode`](crate::config::ContactMode).
pub trait LinePort {
    /// `true` when the door sensor reports the door open.
    fn door_open(&mut self) -> Result<bool, LineError>;

    /// Current level of the lock relay output.
    fn lock_level(&mut self) -> Result<Level, LineError>;

    /// Drive the lock relay output.
    fn set_lock_level(&mut self, level: Level) -> Result<(), LineError>;

    /// Drive the alarm relay active (`true`) or inactive.
    fn set_alarm(&mut self, active: bool) -> Result<(), LineError>;
}

// ───────────────────────────────────────────────────────────────
// Display and keypad
// ───────────────────────────────────────────────────────────────

/// Renders one of the fixed screens.
pub trait DisplayPort {
    fn draw(&mut self, screen: Screen) -> Result<(), DisplayError>;
}

/// Yields at most one raw key character per call.
pub trait KeypadPort {
    fn read_key(&mut self) -> Result<Option<char>, KeypadError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → telemetry / twin)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (twin outbox,
/// serial log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Cloud port (driven adapter: domain ↔ IoT hub)
// ───────────────────────────────────────────────────────────────

/// A message delivered by the cloud collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Full twin document or a desired-properties patch (raw JSON).
    Twin(String),
    /// Direct method invocation.
    Method { request_id: String, name: String },
}

/// Polling interface to the IoT hub client.  Nothing here may block.
pub trait CloudPort {
    /// Whether the network interface has an address.
    fn is_network_ready(&mut self) -> Result<bool, CommsError>;

    /// Whether the hub session is authenticated.
    fn is_authenticated(&self) -> bool;

    /// Start a hub session, or keep waiting on the one in progress.
    ///
    /// `Ok` means an attempt is running or up; authentication may arrive
    /// on a later pass.  `Err` means the attempt failed or timed out and
    /// was torn down.
    fn connect(&mut self) -> Result<(), CommsError>;

    /// Let the client pump its transport.
    fn do_work(&mut self);

    /// Publish one reported property.  `value` is a JSON scalar.
    fn report_state(&mut self, property: &str, value: &str) -> Result<(), CommsError>;

    /// Send one telemetry message.
    fn send_telemetry(&mut self, key: &str, message: &str) -> Result<(), CommsError>;

    /// Next inbound message, if any.
    fn poll_inbound(&mut self) -> Option<Inbound>;

    /// Answer a direct method.
    fn respond_method(&mut self, request_id: &str, status: u16, body: &str) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the handlers)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the scheduler invokes when a periodic task is due.
///
/// The [`Runtime`](super::runtime::Runtime) implements this by running the
/// control tick or the cloud housekeeping tick; the scheduler itself knows
/// nothing about either.
pub trait SchedulerDelegate {
    /// Called once per due task.  An `Err` stops the current scheduler
    /// pass and is handed back to the loop.
    fn on_task_due(&mut self, label: &str, kind: TaskKind) -> crate::error::Result<()>;
}

/// Discriminant passed to [`SchedulerDelegate::on_task_due`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Fast local tick: input, timeouts, actuation.
    Control,
    /// Slow tick: twin outbound, connection maintenance.
    Cloud,
}
