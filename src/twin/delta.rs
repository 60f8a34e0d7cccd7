//! Inbound twin document parsing.
//!
//! Accepts either a full twin document
//!
//! ```json
//! { "desired":  { "AlwaysOpen": { "value": true }, "$version": 4 },
//!   "reported": { "LockMode": "Bistable", "MonoSwitchTime": "5" } }
//! ```
//!
//! or a bare desired-properties patch (`{ "AlwaysClosed": { "value":
//! false }, "$version": 5 }`); a missing `desired` or `reported` section
//! falls back to the document root.
//!
//! A payload that is not a JSON object is rejected as a whole.  Inside a
//! valid object every key is checked on its own: a value outside its
//! domain is logged and skipped without affecting the other keys.

use core::fmt;

use log::warn;
use serde_json::{Map, Value};

use crate::config::{AccessCode, ContactMode, DisplayMode, LockMode, MAX_HOLD_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwinError {
    /// Not valid JSON.
    Malformed,
    /// Valid JSON, but the root is not an object.
    NotAnObject,
}

impl fmt::Display for TwinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "payload is not valid JSON"),
            Self::NotAnObject => write!(f, "payload root is not a JSON object"),
        }
    }
}

/// The recognised, domain-checked subset of one twin document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TwinDelta {
    pub always_open: Option<bool>,
    pub always_closed: Option<bool>,
    pub lock_mode: Option<LockMode>,
    pub contact_mode: Option<ContactMode>,
    pub display_mode: Option<DisplayMode>,
    pub mono_hold_secs: Option<u32>,
    pub user_code: Option<AccessCode>,
    pub admin_code: Option<AccessCode>,
}

impl TwinDelta {
    pub fn parse(payload: &str) -> Result<Self, TwinError> {
        let root: Value = serde_json::from_str(payload).map_err(|_| TwinError::Malformed)?;
        let root = root.as_object().ok_or(TwinError::NotAnObject)?;

        let desired = section(root, "desired");
        let reported = section(root, "reported");

        Ok(Self {
            always_open: desired.get("AlwaysOpen").and_then(|v| override_flag("AlwaysOpen", v)),
            always_closed: desired
                .get("AlwaysClosed")
                .and_then(|v| override_flag("AlwaysClosed", v)),
            lock_mode: named(reported, "LockMode", LockMode::from_twin_name),
            contact_mode: named(reported, "ContactMode", ContactMode::from_twin_name),
            display_mode: named(reported, "DisplayBacklightMode", DisplayMode::from_twin_name),
            mono_hold_secs: reported.get("MonoSwitchTime").and_then(hold_secs),
            user_code: reported.get("UserPassword").and_then(|v| code("UserPassword", v)),
            admin_code: reported.get("ConfigPassword").and_then(|v| code("ConfigPassword", v)),
        })
    }

    /// `true` if nothing recognised was present.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn section<'a>(root: &'a Map<String, Value>, name: &str) -> &'a Map<String, Value> {
    root.get(name).and_then(Value::as_object).unwrap_or(root)
}

/// `{ "value": bool }`, or a bare bool.
fn override_flag(key: &str, v: &Value) -> Option<bool> {
    let flag = match v {
        Value::Object(obj) => obj.get("value").and_then(Value::as_bool),
        other => other.as_bool(),
    };
    if flag.is_none() {
        warn!("Twin: {} has no boolean value, ignored", key);
    }
    flag
}

fn named<T>(section: &Map<String, Value>, key: &str, decode: fn(&str) -> Option<T>) -> Option<T> {
    let v = section.get(key)?;
    let decoded = v.as_str().and_then(decode);
    if decoded.is_none() {
        warn!("Twin: {} = {} is not a known value, ignored", key, v);
    }
    decoded
}

/// Seconds as a number (`5`) or a numeric string (`"5"`), in 1..=999.
fn hold_secs(v: &Value) -> Option<u32> {
    let secs = match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    let secs = secs
        .filter(|s| (1..=u64::from(MAX_HOLD_SECS)).contains(s))
        .and_then(|s| u32::try_from(s).ok());
    if secs.is_none() {
        warn!("Twin: MonoSwitchTime = {} out of range, ignored", v);
    }
    secs
}

fn code(key: &str, v: &Value) -> Option<AccessCode> {
    match v.as_str().map(AccessCode::parse) {
        Some(Ok(code)) => Some(code),
        Some(Err(e)) => {
            warn!("Twin: {} rejected ({})", key, e);
            None
        }
        None => {
            warn!("Twin: {} is not a string, ignored", key);
            None
        }
    }
}
