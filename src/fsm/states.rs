//! Per-state decoding of the keypad buffer.
//!
//! Each function answers one question about a confirmed buffer in one
//! state.  None of them mutate anything; the controller applies the
//! answer.
//!
//! ```text
//!  Config            "1" pw  "2" lock  "3" contact  "4" hold  "5" display  "6" (none)
//!  ChangeLockMode    "1" Monostable     "2" Bistable
//!  ChangeContactMode "1" NormallyOpen   "2" NormallyClosed
//!  ChangeDisplayMode "1" Off            "2" Auto            "3" Constant
//!  ChangeMonoSwitchTime  1..=999 seconds
//! ```

use super::MenuState;
use crate::config::{ContactMode, DisplayMode, LockMode, MAX_HOLD_SECS};
use crate::display::Screen;

/// What a `#` in `Config` selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSelection {
    /// Enter a configuration sub-workflow.
    Enter(MenuState),
    /// Option "6": accepted, does nothing.
    Reserved,
}

pub fn config_selection(buffer: &str) -> Option<ConfigSelection> {
    let next = match buffer {
        "1" => MenuState::ChangeConfigPassword,
        "2" => MenuState::ChangeLockMode,
        "3" => MenuState::ChangeContactMode,
        "4" => MenuState::ChangeMonoSwitchTime,
        "5" => MenuState::ChangeDisplayMode,
        "6" => return Some(ConfigSelection::Reserved),
        _ => return None,
    };
    Some(ConfigSelection::Enter(next))
}

pub fn lock_mode_choice(buffer: &str) -> Option<LockMode> {
    match buffer {
        "1" => Some(LockMode::Monostable),
        "2" => Some(LockMode::Bistable),
        _ => None,
    }
}

pub fn contact_mode_choice(buffer: &str) -> Option<ContactMode> {
    match buffer {
        "1" => Some(ContactMode::NormallyOpen),
        "2" => Some(ContactMode::NormallyClosed),
        _ => None,
    }
}

pub fn display_mode_choice(buffer: &str) -> Option<DisplayMode> {
    match buffer {
        "1" => Some(DisplayMode::Off),
        "2" => Some(DisplayMode::Auto),
        "3" => Some(DisplayMode::Constant),
        _ => None,
    }
}

/// Hold time in seconds, accepted in `1..=999`.
///
/// Leading zeros are fine ("007" is 7 s); anything that overflows or is
/// out of range is `None`.
pub fn hold_secs_choice(buffer: &str) -> Option<u32> {
    if buffer.is_empty() || !buffer.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let secs: u32 = buffer.trim_start_matches('0').parse().unwrap_or(0);
    (1..=MAX_HOLD_SECS).contains(&secs).then_some(secs)
}

/// Where `B` leads from `state`, or `None` if it does nothing.
pub fn back_target(state: MenuState) -> Option<MenuState> {
    match state {
        MenuState::ChangeUserPassword | MenuState::Config => Some(MenuState::NormalOperation),
        MenuState::ChangeConfigPassword
        | MenuState::ChangeLockMode
        | MenuState::ChangeContactMode
        | MenuState::ChangeMonoSwitchTime
        | MenuState::ChangeDisplayMode => Some(MenuState::Config),
        MenuState::NormalOperation | MenuState::FactoryReset => None,
    }
}

/// Screen that represents a menu state.  `NormalOperation` and
/// `FactoryReset` render the lock status instead, so they have none.
pub fn menu_screen(state: MenuState) -> Option<Screen> {
    match state {
        MenuState::ChangeUserPassword | MenuState::ChangeConfigPassword => {
            Some(Screen::ChangePassword)
        }
        MenuState::Config => Some(Screen::Config),
        MenuState::ChangeLockMode => Some(Screen::ChangeLockMode),
        MenuState::ChangeContactMode => Some(Screen::ChangeContactMode),
        MenuState::ChangeMonoSwitchTime => Some(Screen::ChangeMonoSwitchTime),
        MenuState::ChangeDisplayMode => Some(Screen::ChangeDisplayMode),
        MenuState::NormalOperation | MenuState::FactoryReset => None,
    }
}
