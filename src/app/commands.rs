//! Administrative commands delivered by the cloud as direct methods.
//!
//! The two commands are disjoint variants; any other method name is
//! acknowledged with an empty body and otherwise ignored.

/// Commands that the cloud can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// Clear an active intrusion alarm.
    ResetAlarm,

    /// Restore factory lock configuration.
    FactoryReset,
}

impl AdminCommand {
    /// Map a direct-method name to a command.
    pub fn from_method(name: &str) -> Option<Self> {
        match name {
            "ResetAlarm" => Some(Self::ResetAlarm),
            "FactoryReset" => Some(Self::FactoryReset),
            _ => None,
        }
    }

    pub fn method_name(self) -> &'static str {
        match self {
            Self::ResetAlarm => "ResetAlarm",
            Self::FactoryReset => "FactoryReset",
        }
    }
}

/// Result of dispatching a direct method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Handled,
    Ignored,
}

impl CommandOutcome {
    /// Direct-method status code.
    pub fn status(self) -> u16 {
        match self {
            Self::Handled => 200,
            Self::Ignored => 404,
        }
    }

    /// Direct-method response body.
    pub fn body(self) -> &'static str {
        match self {
            Self::Handled => r#"{ "Response": "Ok" }"#,
            Self::Ignored => "{ }",
        }
    }
}
