//! Fuzz target: `adapters::cloud::classify`
//!
//! Drives arbitrary topic strings and payloads through the inbound MQTT
//! classifier.  It must never panic, and a method call it accepts must
//! carry a non-empty name and request id.
//!
//! cargo fuzz run fuzz_inbound_topic

#![no_main]

use doorlock::adapters::cloud::classify;
use doorlock::app::ports::Inbound;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First line is the topic, the rest is the payload.
    let split = data.iter().position(|&b| b == b'\n').unwrap_or(data.len());
    let Ok(topic) = core::str::from_utf8(&data[..split]) else {
        return;
    };
    let payload = data.get(split + 1..).unwrap_or(&[]);

    if let Some(Inbound::Method { request_id, name }) = classify(topic, payload) {
        assert!(!request_id.is_empty(), "method without request id");
        assert!(!name.is_empty(), "method without name");
    }
});
