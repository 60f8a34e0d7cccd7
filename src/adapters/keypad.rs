//! Queued keypad adapter.
//!
//! A [`KeypadPort`] backed by a fixed-capacity queue.  The serial console
//! and the tests push characters in; the controller takes at most one per
//! control tick, exactly as it would from the matrix scanner.

use log::warn;

use crate::app::ports::KeypadPort;
use crate::error::KeypadError;

/// Keys held before new ones are refused.
pub const QUEUE_CAPACITY: usize = 32;

#[derive(Debug, Default)]
pub struct QueuedKeypad {
    keys: heapless::Deque<char, QUEUE_CAPACITY>,
}

impl QueuedKeypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one key.  Returns `false` if the queue is full.
    pub fn push(&mut self, key: char) -> bool {
        if self.keys.push_back(key).is_err() {
            warn!("Keypad queue full, '{}' dropped", key);
            return false;
        }
        true
    }

    /// Queue every character of `keys`, skipping whitespace.
    pub fn push_str(&mut self, keys: &str) {
        for key in keys.chars().filter(|c| !c.is_whitespace()) {
            if !self.push(key) {
                break;
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.keys.len()
    }
}

impl KeypadPort for QueuedKeypad {
    fn read_key(&mut self) -> Result<Option<char>, KeypadError> {
        Ok(self.keys.pop_front())
    }
}
