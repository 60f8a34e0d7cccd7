//! Keypad digit buffer.

use crate::config::CODE_CAPACITY;

/// Digits typed since the last confirm, cancel, clear, or timeout.
///
/// Append-only up to [`CODE_CAPACITY`]; a digit beyond capacity is refused
/// and the buffer is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    digits: heapless::String<CODE_CAPACITY>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one digit (0–9).  Returns `false` if the buffer is full.
    pub fn push_digit(&mut self, digit: u8) -> bool {
        debug_assert!(digit < 10, "not a digit: {digit}");
        self.digits.push(char::from(b'0' + digit % 10)).is_ok()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn as_str(&self) -> &str {
        self.digits.as_str()
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.digits.len() == CODE_CAPACITY
    }
}
