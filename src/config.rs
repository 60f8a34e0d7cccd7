//! System configuration parameters
//!
//! All tunable parameters for the door lock.  The lock half is editable
//! from the keypad menus and from the device twin; the timing half is
//! fixed at build time.  Nothing is persisted: after a restart the cloud
//! re-synchronises the lock half.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::app::ports::Level;

/// Maximum number of digits in an access code (and in the keypad buffer).
pub const CODE_CAPACITY: usize = 12;

/// Longest accepted monostable hold time, in seconds.
pub const MAX_HOLD_SECS: u32 = 999;

// ───────────────────────────────────────────────────────────────
// Enumerated settings
// ───────────────────────────────────────────────────────────────

/// Which relay contact state means "locked".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactMode {
    /// Relay line low = locked.
    NormallyOpen,
    /// Relay line high = locked.
    NormallyClosed,
}

impl ContactMode {
    /// Line level that holds the bolt locked.
    pub fn locked_level(self) -> Level {
        match self {
            Self::NormallyOpen => Level::Low,
            Self::NormallyClosed => Level::High,
        }
    }

    /// Line level that releases the bolt.
    pub fn unlocked_level(self) -> Level {
        self.locked_level().inverted()
    }

    pub fn twin_name(self) -> &'static str {
        match self {
            Self::NormallyOpen => "Normal open",
            Self::NormallyClosed => "Normal closed",
        }
    }

    pub fn from_twin_name(name: &str) -> Option<Self> {
        match name {
            "Normal open" => Some(Self::NormallyOpen),
            "Normal closed" => Some(Self::NormallyClosed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockMode {
    /// Relocks by itself after the hold time.
    Monostable,
    /// Stays where it was last put.
    Bistable,
}

impl LockMode {
    pub fn twin_name(self) -> &'static str {
        match self {
            Self::Monostable => "Monostable",
            Self::Bistable => "Bistable",
        }
    }

    pub fn from_twin_name(name: &str) -> Option<Self> {
        match name {
            "Monostable" => Some(Self::Monostable),
            "Bistable" => Some(Self::Bistable),
            _ => None,
        }
    }
}

/// Display backlight policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Screen stays blank except for the alarm screen.
    Off,
    /// Screen blanks after the action timeout.
    Auto,
    /// Screen always shows the current state.
    Constant,
}

impl DisplayMode {
    pub fn twin_name(self) -> &'static str {
        match self {
            Self::Off => "None",
            Self::Auto => "Auto",
            Self::Constant => "Constant",
        }
    }

    pub fn from_twin_name(name: &str) -> Option<Self> {
        match name {
            "None" => Some(Self::Off),
            "Auto" => Some(Self::Auto),
            "Constant" => Some(Self::Constant),
            _ => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Access codes
// ───────────────────────────────────────────────────────────────

/// A non-empty string of at most [`CODE_CAPACITY`] ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessCode(heapless::String<CODE_CAPACITY>);

impl AccessCode {
    pub fn parse(digits: &str) -> Result<Self, ConfigError> {
        if digits.is_empty() {
            return Err(ConfigError::ValidationFailed("access code must not be empty"));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::ValidationFailed("access code must be digits only"));
        }
        let mut s = heapless::String::new();
        s.push_str(digits)
            .map_err(|()| ConfigError::ValidationFailed("access code longer than 12 digits"))?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// `true` if the typed digits are exactly this code.
    pub fn matches(&self, typed: &str) -> bool {
        self.0.as_str() == typed
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AccessCode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccessCode> for String {
    fn from(code: AccessCode) -> Self {
        code.as_str().into()
    }
}

// ───────────────────────────────────────────────────────────────
// Lock configuration (editable)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockConfig {
    pub contact_mode: ContactMode,
    pub lock_mode: LockMode,
    /// Monostable hold time before auto-relock, in milliseconds.
    pub mono_hold_ms: u32,
    pub display_mode: DisplayMode,
    pub user_code: AccessCode,
    pub admin_code: AccessCode,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            contact_mode: ContactMode::NormallyOpen,
            lock_mode: LockMode::Monostable,
            mono_hold_ms: 5_000,
            display_mode: DisplayMode::Auto,
            user_code: AccessCode(heapless::String::try_from("1234").unwrap_or_default()),
            admin_code: AccessCode(heapless::String::try_from("12345").unwrap_or_default()),
        }
    }
}

impl LockConfig {
    /// Hold time in whole seconds, as shown to the operator and the twin.
    pub fn mono_hold_secs(&self) -> u32 {
        self.mono_hold_ms / 1000
    }

    /// Set the hold time from operator seconds (1..=999).
    pub fn set_mono_hold_secs(&mut self, secs: u32) -> Result<(), ConfigError> {
        if !(1..=MAX_HOLD_SECS).contains(&secs) {
            return Err(ConfigError::ValidationFailed("mono hold time must be 1–999 s"));
        }
        self.mono_hold_ms = secs * 1000;
        Ok(())
    }

    /// Replace the user code.  Refused when it would equal the admin code.
    pub fn set_user_code(&mut self, code: AccessCode) -> Result<(), ConfigError> {
        if code == self.admin_code {
            return Err(ConfigError::ValidationFailed("user code must differ from admin code"));
        }
        self.user_code = code;
        Ok(())
    }

    /// Replace the admin code.  Refused when it would equal the user code.
    pub fn set_admin_code(&mut self, code: AccessCode) -> Result<(), ConfigError> {
        if code == self.user_code {
            return Err(ConfigError::ValidationFailed("admin code must differ from user code"));
        }
        self.admin_code = code;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_HOLD_SECS).contains(&self.mono_hold_secs()) {
            return Err(ConfigError::ValidationFailed("mono hold time must be 1–999 s"));
        }
        if self.user_code == self.admin_code {
            return Err(ConfigError::ValidationFailed("user code must differ from admin code"));
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Timing configuration (fixed)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Idle time before menus exit and the display blanks (ms).
    pub action_timeout_ms: u32,
    /// Keypad lockout duration after three invalid attempts (ms).
    pub block_lock_timeout_ms: u32,
    /// Idle time after which the invalid-attempt counter resets (ms).
    pub failed_attempts_reset_timeout_ms: u32,
    /// Fast control tick period (ms).
    pub control_tick_ms: u32,
    /// Cloud housekeeping period while connected (s).
    pub cloud_poll_secs: u32,
    /// First reconnect delay after a failed connect (s).
    pub cloud_backoff_initial_secs: u32,
    /// Reconnect delay cap (s).
    pub cloud_backoff_max_secs: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            action_timeout_ms: 15_000,
            block_lock_timeout_ms: 30_000,
            failed_attempts_reset_timeout_ms: 30_000,
            control_tick_ms: 10,    // 100 Hz
            cloud_poll_secs: 5,
            cloud_backoff_initial_secs: 2,
            cloud_backoff_max_secs: 60,
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub lock: LockConfig,
    pub timing: TimingConfig,
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lock.validate()?;
        let t = &self.timing;
        if t.control_tick_ms == 0 || t.cloud_poll_secs == 0 {
            return Err(ConfigError::ValidationFailed("tick periods must be non-zero"));
        }
        if t.cloud_backoff_initial_secs == 0 || t.cloud_backoff_initial_secs > t.cloud_backoff_max_secs {
            return Err(ConfigError::ValidationFailed(
                "cloud backoff must start above zero and below its cap",
            ));
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range or format validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
