//! Cloud adapters: IoT hub session behind [`CloudPort`].
//!
//! ## cfg gating
//!
//! - **`espidf` feature**: [`esp_impl::EspHubClient`] speaks the Azure IoT
//!   Hub MQTT dialect over `EspMqttClient` (TLS, port 8883).
//! - **all builds**: [`SimCloud`], an in-memory hub used by host runs and
//!   the integration tests.  Failures and inbound traffic are injected by
//!   the caller, and the session can be made to come up asynchronously
//!   like the real client's.
//!
//! ## Topics
//!
//! | Direction | Topic                                               |
//! |-----------|-----------------------------------------------------|
//! | out       | `devices/{id}/messages/events/`                     |
//! | out       | `$iothub/twin/GET/?$rid={rid}`                      |
//! | out       | `$iothub/twin/PATCH/properties/reported/?$rid={rid}`|
//! | out       | `$iothub/methods/res/{status}/?$rid={rid}`          |
//! | in        | `$iothub/twin/res/{status}/?$rid={rid}`             |
//! | in        | `$iothub/twin/PATCH/properties/desired/?$version=n` |
//! | in        | `$iothub/methods/POST/{name}/?$rid={rid}`           |

#[cfg(feature = "espidf")]
pub mod esp_impl;

use std::collections::VecDeque;

use log::{debug, info};

use crate::app::ports::{CloudPort, Inbound};
use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Topic helpers
// ───────────────────────────────────────────────────────────────

/// MQTT API version the hub is addressed with.
pub const API_VERSION: &str = "2021-04-12";

pub const DESIRED_PATCH_FILTER: &str = "$iothub/twin/PATCH/properties/desired/#";
pub const TWIN_RESPONSE_FILTER: &str = "$iothub/twin/res/#";
pub const METHOD_REQUEST_FILTER: &str = "$iothub/methods/POST/#";

const DESIRED_PATCH_PREFIX: &str = "$iothub/twin/PATCH/properties/desired/";
const TWIN_RESPONSE_PREFIX: &str = "$iothub/twin/res/";
const METHOD_REQUEST_PREFIX: &str = "$iothub/methods/POST/";

/// MQTT user name for `device_id` on `hub_host`.
pub fn username(hub_host: &str, device_id: &str) -> String {
    format!("{hub_host}/{device_id}/?api-version={API_VERSION}")
}

pub fn telemetry_topic(device_id: &str) -> String {
    format!("devices/{device_id}/messages/events/")
}

pub fn twin_get_topic(rid: u32) -> String {
    format!("$iothub/twin/GET/?$rid={rid}")
}

pub fn reported_patch_topic(rid: u32) -> String {
    format!("$iothub/twin/PATCH/properties/reported/?$rid={rid}")
}

pub fn method_response_topic(status: u16, request_id: &str) -> String {
    format!("$iothub/methods/res/{status}/?$rid={request_id}")
}

/// `{ "<property>": <value> }` where `value` is already a JSON scalar.
pub fn reported_patch_body(property: &str, value: &str) -> String {
    format!("{{{}:{}}}", serde_json::Value::String(property.into()), value)
}

/// `{ "<key>": "<message>" }`.
pub fn telemetry_body(key: &str, message: &str) -> String {
    let mut body = serde_json::Map::new();
    body.insert(key.into(), serde_json::Value::String(message.into()));
    serde_json::Value::Object(body).to_string()
}

/// Turn one received publish into an [`Inbound`] message.
///
/// Twin responses other than 200, method calls without a name or request
/// id, and unrelated topics yield `None`.
pub fn classify(topic: &str, payload: &[u8]) -> Option<Inbound> {
    if topic.starts_with(DESIRED_PATCH_PREFIX) {
        return Some(Inbound::Twin(String::from_utf8_lossy(payload).into_owned()));
    }
    if let Some(rest) = topic.strip_prefix(TWIN_RESPONSE_PREFIX) {
        let status = rest.split('/').next()?;
        if status != "200" {
            debug!("Cloud: twin response status {}", status);
            return None;
        }
        return Some(Inbound::Twin(String::from_utf8_lossy(payload).into_owned()));
    }
    if let Some(rest) = topic.strip_prefix(METHOD_REQUEST_PREFIX) {
        let (name, query) = rest.split_once("/?")?;
        let request_id = query
            .split('&')
            .find_map(|kv| kv.strip_prefix("$rid="))
            .filter(|rid| !rid.is_empty())?;
        if name.is_empty() {
            return None;
        }
        return Some(Inbound::Method {
            request_id: request_id.into(),
            name: name.into(),
        });
    }
    None
}

// ───────────────────────────────────────────────────────────────
// In-memory hub
// ───────────────────────────────────────────────────────────────

/// A [`CloudPort`] that keeps everything in memory.
///
/// `connect` authenticates immediately unless refused with
/// [`set_accept_connect`](Self::set_accept_connect).  With
/// [`set_lazy_connect`](Self::set_lazy_connect) it only starts an attempt,
/// which [`complete_connect`](Self::complete_connect) later settles.
#[derive(Debug)]
pub struct SimCloud {
    network_ready: bool,
    accept_connect: bool,
    lazy_connect: bool,
    connecting: bool,
    refused: bool,
    authenticated: bool,
    fail_publish: bool,
    connect_attempts: u32,
    work_calls: u32,
    inbound: VecDeque<Inbound>,
    reports: Vec<(String, String)>,
    telemetry: Vec<(String, String)>,
    responses: Vec<(String, u16, String)>,
}

impl Default for SimCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl SimCloud {
    pub fn new() -> Self {
        Self {
            network_ready: true,
            accept_connect: true,
            lazy_connect: false,
            connecting: false,
            refused: false,
            authenticated: false,
            fail_publish: false,
            connect_attempts: 0,
            work_calls: 0,
            inbound: VecDeque::new(),
            reports: Vec::new(),
            telemetry: Vec::new(),
            responses: Vec::new(),
        }
    }

    // ── Fault injection ───────────────────────────────────────

    pub fn set_network_ready(&mut self, ready: bool) {
        self.network_ready = ready;
        if !ready {
            self.authenticated = false;
            self.connecting = false;
        }
    }

    pub fn set_accept_connect(&mut self, accept: bool) {
        self.accept_connect = accept;
    }

    /// Make `connect` start an attempt without authenticating.
    pub fn set_lazy_connect(&mut self, lazy: bool) {
        self.lazy_connect = lazy;
    }

    /// Settle the pending attempt: authenticate, or refuse it when
    /// connects are not accepted.
    pub fn complete_connect(&mut self) {
        if !self.connecting {
            return;
        }
        self.connecting = false;
        if self.accept_connect {
            self.authenticated = true;
        } else {
            self.refused = true;
        }
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    /// Drop the hub session; the next housekeeping pass reconnects.
    pub fn drop_session(&mut self) {
        info!("SimCloud: session dropped");
        self.authenticated = false;
    }

    pub fn set_fail_publish(&mut self, fail: bool) {
        self.fail_publish = fail;
    }

    // ── Inbound traffic ───────────────────────────────────────

    pub fn push_twin(&mut self, json: &str) {
        self.inbound.push_back(Inbound::Twin(json.into()));
    }

    pub fn push_method(&mut self, request_id: &str, name: &str) {
        self.inbound.push_back(Inbound::Method {
            request_id: request_id.into(),
            name: name.into(),
        });
    }

    // ── Recorded traffic ──────────────────────────────────────

    /// `(property, json value)` in send order.
    pub fn reports(&self) -> &[(String, String)] {
        &self.reports
    }

    /// Latest reported value of `property`.
    pub fn last_report(&self, property: &str) -> Option<&str> {
        self.reports
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// `(key, message)` in send order.
    pub fn telemetry(&self) -> &[(String, String)] {
        &self.telemetry
    }

    /// `(request id, status, body)` in send order.
    pub fn responses(&self) -> &[(String, u16, String)] {
        &self.responses
    }

    pub fn connect_attempts(&self) -> u32 {
        self.connect_attempts
    }

    pub fn work_calls(&self) -> u32 {
        self.work_calls
    }

    pub fn clear_sent(&mut self) {
        self.reports.clear();
        self.telemetry.clear();
        self.responses.clear();
    }

    fn check_publish(&self) -> Result<(), CommsError> {
        if !self.authenticated {
            return Err(CommsError::NotAuthenticated);
        }
        if self.fail_publish {
            return Err(CommsError::PublishFailed);
        }
        Ok(())
    }
}

impl CloudPort for SimCloud {
    fn is_network_ready(&mut self) -> Result<bool, CommsError> {
        Ok(self.network_ready)
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn connect(&mut self) -> Result<(), CommsError> {
        if self.refused {
            self.refused = false;
            return Err(CommsError::ConnectFailed);
        }
        if self.connecting {
            return Ok(());
        }
        self.connect_attempts += 1;
        if !self.network_ready {
            return Err(CommsError::NetworkUnavailable);
        }
        if self.lazy_connect {
            self.connecting = true;
            return Ok(());
        }
        if !self.accept_connect {
            return Err(CommsError::ConnectFailed);
        }
        self.authenticated = true;
        Ok(())
    }

    fn do_work(&mut self) {
        self.work_calls += 1;
    }

    fn report_state(&mut self, property: &str, value: &str) -> Result<(), CommsError> {
        self.check_publish()?;
        self.reports.push((property.into(), value.into()));
        Ok(())
    }

    fn send_telemetry(&mut self, key: &str, message: &str) -> Result<(), CommsError> {
        self.check_publish()?;
        self.telemetry.push((key.into(), message.into()));
        Ok(())
    }

    fn poll_inbound(&mut self) -> Option<Inbound> {
        self.inbound.pop_front()
    }

    fn respond_method(&mut self, request_id: &str, status: u16, body: &str) -> Result<(), CommsError> {
        self.check_publish()?;
        self.responses.push((request_id.into(), status, body.into()));
        Ok(())
    }
}
