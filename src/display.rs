//! Fixed screen set for the 128x64 status panel.
//!
//! Each [`Screen`] has a background colour and a few lines of text at
//! fixed positions.  Rendering primitives belong to the display adapter;
//! this module only describes what goes where.

/// Background colours (0xRRGGBB).
pub const COLOUR_BLACK: u32 = 0x00_0000;
pub const COLOUR_RED: u32 = 0xFF_0000;
pub const COLOUR_GREEN: u32 = 0x00_FF00;
pub const COLOUR_BLUE: u32 = 0x00_00FF;
pub const COLOUR_TEXT: u32 = 0xFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Waiting for the first twin document.
    Wait,
    Locked,
    Unlocked,
    Alarm,
    Blank,
    /// Keypad lockout after too many failed attempts.
    BlockLock,
    Config,
    ChangePassword,
    ChangeLockMode,
    ChangeContactMode,
    ChangeMonoSwitchTime,
    ChangeDisplayMode,
}

/// One line of text at pixel position (`x`, `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLine {
    pub text: &'static str,
    pub x: u8,
    pub y: u8,
}

/// Everything an adapter needs to paint a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub background: u32,
    pub foreground: u32,
    pub lines: &'static [TextLine],
}

const fn line(text: &'static str, x: u8, y: u8) -> TextLine {
    TextLine { text, x, y }
}

// ── Text per screen ───────────────────────────────────────────

const WAIT: &[TextLine] = &[line("Sync in", 30, 25), line("progress...", 30, 35)];
const LOCKED: &[TextLine] = &[line("Locked.", 30, 30)];
const UNLOCKED: &[TextLine] = &[line("Unlocked.", 25, 30)];
const BLANK: &[TextLine] = &[];
const ALARM: &[TextLine] = &[line("Alarm!", 30, 30)];
const BLOCK_LOCK: &[TextLine] = &[line("Too many", 5, 25), line("failed attempts.", 5, 35)];
const CONFIG: &[TextLine] = &[line("Config.", 30, 30)];
const CHANGE_PASSWORD: &[TextLine] = &[line("Change password.", 5, 30)];
const CHANGE_LOCK_MODE: &[TextLine] = &[
    line("Change lock", 10, 10),
    line("mode.", 10, 20),
    line("1# Monostable.", 10, 30),
    line("2# Bistable.", 10, 40),
];
const CHANGE_CONTACT_MODE: &[TextLine] = &[
    line("Change lock", 5, 10),
    line("contact mode.", 5, 20),
    line("1# Normal open.", 5, 30),
    line("2# Normal closed.", 5, 40),
];
const CHANGE_MONO_SWITCH_TIME: &[TextLine] = &[
    line("Change mono", 8, 20),
    line("switch time.", 8, 30),
    line("1 - 999 seconds.", 8, 40),
];
const CHANGE_DISPLAY_MODE: &[TextLine] = &[
    line("Change display", 10, 10),
    line("mode.", 10, 20),
    line("1# None.", 10, 30),
    line("2# Auto.", 10, 40),
    line("3# Constant.", 10, 50),
];

impl Screen {
    pub fn layout(self) -> ScreenLayout {
        let (background, lines) = match self {
            Self::Wait => (COLOUR_BLACK, WAIT),
            Self::Locked => (COLOUR_RED, LOCKED),
            Self::Unlocked => (COLOUR_GREEN, UNLOCKED),
            Self::Alarm => (COLOUR_RED, ALARM),
            Self::Blank => (COLOUR_BLACK, BLANK),
            Self::BlockLock => (COLOUR_RED, BLOCK_LOCK),
            Self::Config => (COLOUR_BLUE, CONFIG),
            Self::ChangePassword => (COLOUR_BLUE, CHANGE_PASSWORD),
            Self::ChangeLockMode => (COLOUR_BLUE, CHANGE_LOCK_MODE),
            Self::ChangeContactMode => (COLOUR_BLUE, CHANGE_CONTACT_MODE),
            Self::ChangeMonoSwitchTime => (COLOUR_BLUE, CHANGE_MONO_SWITCH_TIME),
            Self::ChangeDisplayMode => (COLOUR_BLUE, CHANGE_DISPLAY_MODE),
        };
        ScreenLayout {
            background,
            foreground: COLOUR_TEXT,
            lines,
        }
    }
}
