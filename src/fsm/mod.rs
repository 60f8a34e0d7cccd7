//! Keypad menu state machine.
//!
//! ```text
//!                 user code *            admin code *
//!  ChangeUserPassword ◀──────── NormalOperation ────────▶ Config
//!         │  # / B                    ▲   ▲                │ 1..5 #
//!         └───────────────────────────┘   └──── B ─────────┤
//!                                                          ▼
//!            ChangeConfigPassword · ChangeLockMode · ChangeContactMode
//!            ChangeMonoSwitchTime · ChangeDisplayMode ── # / B ──▶ Config
//!
//!  Any state ──[idle ≥ action timeout]──▶ NormalOperation
//! ```
//!
//! The state is a plain sum type; every decision about it is an
//! exhaustive `match`, so adding a state without handling it is a compile
//! error.  Side effects (relay, alarm, twin reports) live in the
//! controller; this module only decides *where* to go and *what* the
//! buffer means.

pub mod input;
pub mod states;

use core::fmt;

// ---------------------------------------------------------------------------
// Menu state
// ---------------------------------------------------------------------------

/// Every screen the keypad can be driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuState {
    NormalOperation,
    ChangeUserPassword,
    Config,
    ChangeConfigPassword,
    ChangeLockMode,
    ChangeContactMode,
    ChangeMonoSwitchTime,
    ChangeDisplayMode,
    FactoryReset,
}

impl MenuState {
    pub fn name(self) -> &'static str {
        match self {
            Self::NormalOperation => "NormalOperation",
            Self::ChangeUserPassword => "ChangeUserPassword",
            Self::Config => "Config",
            Self::ChangeConfigPassword => "ChangeConfigPassword",
            Self::ChangeLockMode => "ChangeLockMode",
            Self::ChangeContactMode => "ChangeContactMode",
            Self::ChangeMonoSwitchTime => "ChangeMonoSwitchTime",
            Self::ChangeDisplayMode => "ChangeDisplayMode",
            Self::FactoryReset => "FactoryReset",
        }
    }
}

impl fmt::Display for MenuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Keypad alphabet
// ---------------------------------------------------------------------------

/// The keys the controller acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    /// `*`: credential check / enter menus.
    Star,
    /// `#`: confirm.
    Hash,
    /// `B`: back.
    Back,
    /// `C`: clear the buffer.
    Clear,
}

impl Key {
    /// Decode a raw keypad character.  Keys outside the alphabet
    /// (e.g. `A`, `D` on a 4x4 pad) yield `None`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Self::Digit(c as u8 - b'0')),
            '*' => Some(Self::Star),
            '#' => Some(Self::Hash),
            'B' => Some(Self::Back),
            'C' => Some(Self::Clear),
            _ => None,
        }
    }
}
