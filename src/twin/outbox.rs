//! Outbound twin reports and telemetry, buffered until the hub session
//! is authenticated.
//!
//! - Reported properties are coalesced per property: only the latest
//!   value of each is kept, so a long offline period costs at most one
//!   slot per property.
//! - Telemetry is a bounded FIFO.  When it is full the oldest message is
//!   dropped.
//! - [`Outbox::flush`] sends reports first (in property order), then
//!   telemetry, stopping at the first transport error.  Whatever was not
//!   sent stays queued for the next slow tick.

use log::{debug, warn};

use crate::app::events::{AppEvent, TelemetryEvent};
use crate::app::ports::{CloudPort, EventSink};
use crate::error::CommsError;

use super::{Property, StateReport};

/// Telemetry messages held while offline.
pub const TELEMETRY_CAPACITY: usize = 16;

pub struct Outbox {
    reports: [Option<String>; Property::COUNT],
    telemetry: heapless::Deque<TelemetryEvent, TELEMETRY_CAPACITY>,
    dropped: u32,
}

impl Default for Outbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Outbox {
    pub fn new() -> Self {
        Self {
            reports: Default::default(),
            telemetry: heapless::Deque::new(),
            dropped: 0,
        }
    }

    pub fn queue_report(&mut self, report: StateReport) {
        self.reports[report.property.index()] = Some(report.value);
    }

    pub fn queue_telemetry(&mut self, event: TelemetryEvent) {
        if self.telemetry.is_full() {
            if let Some(old) = self.telemetry.pop_front() {
                self.dropped = self.dropped.saturating_add(1);
                warn!("Outbox: telemetry full, dropped {}: {}", old.category, old.message);
            }
        }
        // Cannot fail: a slot was just freed if needed.
        let _ = self.telemetry.push_back(event);
    }

    /// Queue every property of a full state snapshot (after a reconnect).
    pub fn queue_snapshot(&mut self, reports: impl IntoIterator<Item = StateReport>) {
        for report in reports {
            self.queue_report(report);
        }
    }

    /// Latest queued value of `property`, if any.
    pub fn pending_report(&self, property: Property) -> Option<&str> {
        self.reports[property.index()].as_deref()
    }

    pub fn pending(&self) -> usize {
        self.reports.iter().flatten().count() + self.telemetry.len()
    }

    /// Telemetry messages discarded since boot because the FIFO was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Send everything queued.  Returns how many items went out.
    pub fn flush(&mut self, cloud: &mut impl CloudPort) -> Result<usize, CommsError> {
        let mut sent = 0;

        for property in Property::ALL {
            let slot = &mut self.reports[property.index()];
            if let Some(value) = slot.as_deref() {
                cloud.report_state(property.name(), value)?;
                *slot = None;
                sent += 1;
            }
        }

        while let Some(event) = self.telemetry.front() {
            cloud.send_telemetry(event.category.key(), &event.message)?;
            self.telemetry.pop_front();
            sent += 1;
        }

        if sent > 0 {
            debug!("Outbox: flushed {} items", sent);
        }
        Ok(sent)
    }
}

impl EventSink for Outbox {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Reported(report) => self.queue_report(report.clone()),
            AppEvent::Telemetry(t) => self.queue_telemetry(t.clone()),
            AppEvent::MenuChanged { from, to } => debug!("Menu: {} -> {}", from, to),
            AppEvent::Started => debug!("Controller started"),
        }
    }
}
