//! Device twin synchronisation.
//!
//! ```text
//!             inbound                              outbound
//!  CloudPort ───────▶ TwinDelta::parse ──▶ LockController ──▶ Outbox ───▶ CloudPort
//!   (twin doc,          (per-key domain      (apply, relock,    (coalesce,
//!    methods)            checks)              redraw)            FIFO)
//! ```
//!
//! [`TwinSync::service`] is the slow-tick handler.  It keeps the hub
//! session alive with exponential backoff, feeds inbound documents and
//! direct methods to the controller, and flushes the [`Outbox`] while
//! authenticated.

pub mod delta;
pub mod outbox;

use core::fmt;

use log::{debug, info, warn};

use crate::app::commands::{AdminCommand, CommandOutcome};
use crate::app::ports::{CloudPort, DisplayPort, Inbound, LinePort};
use crate::app::service::LockController;
use crate::config::TimingConfig;
use crate::error::Result;
use crate::timing::Clock;

pub use delta::{TwinDelta, TwinError};
pub use outbox::Outbox;

// ───────────────────────────────────────────────────────────────
// Reported properties
// ───────────────────────────────────────────────────────────────

/// Every property the device reports to its twin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    IsDoorOpen,
    IsLockOpen,
    IsAlarm,
    UserPassword,
    ConfigPassword,
    LockMode,
    ContactMode,
    DisplayBacklightMode,
    MonoSwitchTime,
}

impl Property {
    pub const COUNT: usize = 9;

    pub const ALL: [Property; Self::COUNT] = [
        Self::IsDoorOpen,
        Self::IsLockOpen,
        Self::IsAlarm,
        Self::UserPassword,
        Self::ConfigPassword,
        Self::LockMode,
        Self::ContactMode,
        Self::DisplayBacklightMode,
        Self::MonoSwitchTime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::IsDoorOpen => "IsDoorOpen",
            Self::IsLockOpen => "IsLockOpen",
            Self::IsAlarm => "IsAlarm",
            Self::UserPassword => "UserPassword",
            Self::ConfigPassword => "ConfigPassword",
            Self::LockMode => "LockMode",
            Self::ContactMode => "ContactMode",
            Self::DisplayBacklightMode => "DisplayBacklightMode",
            Self::MonoSwitchTime => "MonoSwitchTime",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One reported property with its value already encoded as a JSON scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateReport {
    pub property: Property,
    pub value: String,
}

impl StateReport {
    /// Boolean property: encoded as `true` / `false`.
    pub fn flag(property: Property, on: bool) -> Self {
        Self {
            property,
            value: serde_json::Value::Bool(on).to_string(),
        }
    }

    /// String property: encoded as a quoted, escaped JSON string.
    pub fn text(property: Property, text: &str) -> Self {
        Self {
            property,
            value: serde_json::Value::String(text.into()).to_string(),
        }
    }

    /// Whole seconds, reported as a quoted integer (`"5"`).
    pub fn seconds(property: Property, secs: u32) -> Self {
        Self::text(property, &secs.to_string())
    }
}

// ───────────────────────────────────────────────────────────────
// Slow-tick service
// ───────────────────────────────────────────────────────────────

pub struct TwinSync {
    outbox: Outbox,
    was_authenticated: bool,
    poll_secs: u32,
    backoff_initial_secs: u32,
    backoff_max_secs: u32,
    backoff_secs: u32,
}

impl TwinSync {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            outbox: Outbox::new(),
            was_authenticated: false,
            poll_secs: timing.cloud_poll_secs,
            backoff_initial_secs: timing.cloud_backoff_initial_secs,
            backoff_max_secs: timing.cloud_backoff_max_secs,
            backoff_secs: timing.cloud_backoff_initial_secs,
        }
    }

    /// Event sink the controller writes into.
    pub fn outbox(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    /// Run one housekeeping pass.  Returns the period (seconds) until the
    /// next pass: the poll period normally, the current backoff after a
    /// failed connect.
    ///
    /// Only controller errors (hardware lines, display) are returned;
    /// cloud faults are logged and absorbed.
    pub fn service<C: Clock>(
        &mut self,
        controller: &mut LockController<C>,
        hw: &mut (impl LinePort + DisplayPort),
        cloud: &mut impl CloudPort,
    ) -> Result<u32> {
        let mut next_secs = self.poll_secs;

        match cloud.is_network_ready() {
            Ok(true) if !cloud.is_authenticated() => match cloud.connect() {
                Ok(()) => debug!("Cloud: session attempt in progress"),
                Err(e) => {
                    warn!("Cloud: connect failed ({}), retry in {}s", e, self.backoff_secs);
                    next_secs = self.backoff_secs;
                    self.backoff_secs = self.backoff_secs.saturating_mul(2).min(self.backoff_max_secs);
                }
            },
            Ok(true) => {}
            Ok(false) => debug!("Cloud: network not ready"),
            Err(e) => warn!("Cloud: failed to get network state ({})", e),
        }

        let authenticated = cloud.is_authenticated();
        if authenticated {
            if !self.was_authenticated {
                info!("Cloud: authenticated, queueing full state snapshot");
                self.backoff_secs = self.backoff_initial_secs;
                self.outbox.queue_snapshot(controller.reported_state());
            }
            cloud.do_work();
        }
        self.was_authenticated = authenticated;

        while let Some(msg) = cloud.poll_inbound() {
            self.dispatch(msg, controller, hw, cloud)?;
        }

        if authenticated {
            if let Err(e) = self.outbox.flush(cloud) {
                warn!("Cloud: flush interrupted ({}), {} items pending", e, self.outbox.pending());
            }
        }

        Ok(next_secs)
    }

    fn dispatch<C: Clock>(
        &mut self,
        msg: Inbound,
        controller: &mut LockController<C>,
        hw: &mut (impl LinePort + DisplayPort),
        cloud: &mut impl CloudPort,
    ) -> Result<()> {
        match msg {
            Inbound::Twin(json) => match TwinDelta::parse(&json) {
                Ok(delta) => controller.apply_twin(&delta, hw, &mut self.outbox)?,
                Err(e) => warn!("Twin: discarded payload ({})", e),
            },
            Inbound::Method { request_id, name } => {
                let outcome = match AdminCommand::from_method(&name) {
                    Some(cmd) => controller.handle_command(cmd, hw, &mut self.outbox)?,
                    None => {
                        info!("Twin: ignoring unknown method '{}'", name);
                        CommandOutcome::Ignored
                    }
                };
                if let Err(e) = cloud.respond_method(&request_id, outcome.status(), outcome.body()) {
                    warn!("Cloud: method response for '{}' lost ({})", name, e);
                }
            }
        }
        Ok(())
    }
}
