//! ESP-IDF IoT hub client.
//!
//! Compiled only with the `espidf` feature.  The MQTT client runs its own
//! task inside ESP-IDF; its event callback only records state and queues
//! inbound messages, and the slow tick picks them up through
//! [`CloudPort::poll_inbound`].
//!
//! The client connects asynchronously and reconnects by itself after a
//! drop.  `connect` therefore keeps a started client alive until it either
//! authenticates or has been pending for [`CONNECT_TIMEOUT`]; only then is
//! it torn down and the failure handed to the caller's backoff.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};
use esp_idf_svc::wifi::EspWifi;
use log::{info, warn};

use crate::app::ports::{CloudPort, Inbound};
use crate::error::CommsError;

use super::{
    DESIRED_PATCH_FILTER, METHOD_REQUEST_FILTER, TWIN_RESPONSE_FILTER, classify, method_response_topic,
    reported_patch_body, reported_patch_topic, telemetry_body, telemetry_topic, twin_get_topic, username,
};

/// Inbound messages held between slow ticks.
const INBOUND_CAPACITY: usize = 8;

/// How long a started session may take to reach CONNACK.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection parameters for one device identity.
#[derive(Debug, Clone)]
pub struct HubCredentials {
    /// `<hub>.azure-devices.net`
    pub host: String,
    pub device_id: String,
    /// Pre-issued shared access signature.
    pub sas_token: String,
}

#[derive(Default)]
struct Shared {
    connected: bool,
    /// Set on every (re)connect until subscriptions are renewed.
    fresh: bool,
    /// The broker dropped an attempt before it ever authenticated.
    refused: bool,
    inbound: VecDeque<Inbound>,
}

pub struct EspHubClient {
    wifi: EspWifi<'static>,
    credentials: HubCredentials,
    client: Option<EspMqttClient<'static>>,
    /// Start of the attempt currently waiting for CONNACK.
    connecting_since: Option<Instant>,
    shared: Arc<Mutex<Shared>>,
    next_rid: u32,
}

impl EspHubClient {
    pub fn new(wifi: EspWifi<'static>, credentials: HubCredentials) -> Self {
        Self {
            wifi,
            credentials,
            client: None,
            connecting_since: None,
            shared: Arc::new(Mutex::new(Shared::default())),
            next_rid: 1,
        }
    }

    fn rid(&mut self) -> u32 {
        let rid = self.next_rid;
        self.next_rid = self.next_rid.wrapping_add(1).max(1);
        rid
    }

    fn publish(&mut self, topic: &str, body: &str) -> Result<(), CommsError> {
        let client = self.client.as_mut().ok_or(CommsError::NotAuthenticated)?;
        client
            .enqueue(topic, QoS::AtLeastOnce, false, body.as_bytes())
            .map(|_| ())
            .map_err(|e| {
                warn!("MQTT: publish to {} failed: {}", topic, e);
                CommsError::PublishFailed
            })
    }

    fn on_session_up(&mut self) -> Result<(), CommsError> {
        let client = self.client.as_mut().ok_or(CommsError::NotAuthenticated)?;
        for filter in [DESIRED_PATCH_FILTER, TWIN_RESPONSE_FILTER, METHOD_REQUEST_FILTER] {
            client.subscribe(filter, QoS::AtMostOnce).map_err(|e| {
                warn!("MQTT: subscribe {} failed: {}", filter, e);
                CommsError::SubscribeFailed
            })?;
        }
        let rid = self.rid();
        self.publish(&twin_get_topic(rid), "")
    }
}

impl CloudPort for EspHubClient {
    fn is_network_ready(&mut self) -> Result<bool, CommsError> {
        self.wifi.is_up().map_err(|_| CommsError::NetworkUnavailable)
    }

    fn is_authenticated(&self) -> bool {
        self.shared.lock().is_ok_and(|s| s.connected)
    }

    fn connect(&mut self) -> Result<(), CommsError> {
        let refused = self
            .shared
            .lock()
            .map(|mut s| core::mem::take(&mut s.refused))
            .unwrap_or(false);

        if self.client.is_some() {
            let started = *self.connecting_since.get_or_insert_with(Instant::now);
            if !refused && started.elapsed() < CONNECT_TIMEOUT {
                return Ok(());
            }
            warn!(
                "MQTT: session attempt {} after {}s, tearing down",
                if refused { "refused" } else { "timed out" },
                started.elapsed().as_secs()
            );
            self.client = None;
            self.connecting_since = None;
            return Err(CommsError::ConnectFailed);
        }

        let url = format!("mqtts://{}:8883", self.credentials.host);
        let user = username(&self.credentials.host, &self.credentials.device_id);
        let conf = MqttClientConfiguration {
            client_id: Some(&self.credentials.device_id),
            username: Some(&user),
            password: Some(&self.credentials.sas_token),
            crt_bundle_attach: Some(esp_idf_sys::esp_crt_bundle_attach),
            ..Default::default()
        };

        let shared = Arc::clone(&self.shared);
        let client = EspMqttClient::new_cb(&url, &conf, move |event| {
            let Ok(mut s) = shared.lock() else {
                return;
            };
            match event.payload() {
                EventPayload::Connected(_) => {
                    s.connected = true;
                    s.fresh = true;
                    s.refused = false;
                }
                EventPayload::Disconnected => {
                    if !s.connected {
                        s.refused = true;
                    }
                    s.connected = false;
                }
                EventPayload::Received { topic: Some(topic), data, .. } => {
                    if let Some(msg) = classify(topic, data) {
                        if s.inbound.len() >= INBOUND_CAPACITY {
                            s.inbound.pop_front();
                        }
                        s.inbound.push_back(msg);
                    }
                }
                _ => {}
            }
        })
        .map_err(|e| {
            warn!("MQTT: client start failed: {}", e);
            CommsError::ConnectFailed
        })?;

        info!("MQTT: connecting to {}", self.credentials.host);
        self.client = Some(client);
        self.connecting_since = Some(Instant::now());
        Ok(())
    }

    fn do_work(&mut self) {
        self.connecting_since = None;
        let fresh = self
            .shared
            .lock()
            .map(|mut s| core::mem::take(&mut s.fresh))
            .unwrap_or(false);
        if fresh {
            if let Err(e) = self.on_session_up() {
                warn!("MQTT: session setup incomplete ({})", e);
                if let Ok(mut s) = self.shared.lock() {
                    s.fresh = true;
                }
            }
        }
    }

    fn report_state(&mut self, property: &str, value: &str) -> Result<(), CommsError> {
        let rid = self.rid();
        self.publish(&reported_patch_topic(rid), &reported_patch_body(property, value))
    }

    fn send_telemetry(&mut self, key: &str, message: &str) -> Result<(), CommsError> {
        let topic = telemetry_topic(&self.credentials.device_id);
        self.publish(&topic, &telemetry_body(key, message))
    }

    fn poll_inbound(&mut self) -> Option<Inbound> {
        self.shared.lock().ok()?.inbound.pop_front()
    }

    fn respond_method(&mut self, request_id: &str, status: u16, body: &str) -> Result<(), CommsError> {
        self.publish(&method_response_topic(status, request_id), body)
    }
}
