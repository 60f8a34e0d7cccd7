//! 4x4 matrix keypad scanner.
//!
//! ## Hardware
//!
//! Rows are inputs with pull-ups; columns are open-drain outputs idling
//! high.  A scan drives one column low at a time and reads the rows, so a
//! pressed key pulls its row low while its column is selected.
//!
//! ```text
//!         C0  C1  C2  C3
//!   R0     1   2   3   A
//!   R1     4   5   6   B
//!   R2     7   8   9   C
//!   R3     *   0   #   D
//! ```
//!
//! ## Debounce
//!
//! A key is reported once, on its press edge, after it has been seen in
//! [`SETTLE_SCANS`] consecutive scans.  Holding it produces nothing more;
//! it must be released (no key seen) before it can be reported again.
//! With the 10 ms control tick that is a 30 ms settle window.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::KeypadPort;
use crate::error::KeypadError;

pub const LAYOUT: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// Consecutive identical scans before a press is accepted.
pub const SETTLE_SCANS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Released,
    Settling { key: char, seen: u8 },
    Held { key: char },
}

pub struct MatrixKeypad<R, C> {
    rows: [R; 4],
    cols: [C; 4],
    state: ScanState,
}

impl<R: InputPin, C: OutputPin> MatrixKeypad<R, C> {
    pub fn new(rows: [R; 4], mut cols: [C; 4]) -> Result<Self, KeypadError> {
        for col in &mut cols {
            col.set_high().map_err(|_| KeypadError::ColumnWrite)?;
        }
        Ok(Self {
            rows,
            cols,
            state: ScanState::Released,
        })
    }

    /// One pass over the matrix.  Returns the first pressed key found, if
    /// any; chords resolve to the lowest column, then the lowest row.
    fn scan(&mut self) -> Result<Option<char>, KeypadError> {
        let mut found = None;
        for c in 0..4 {
            self.cols[c].set_low().map_err(|_| KeypadError::ColumnWrite)?;
            for r in 0..4 {
                if found.is_none() && self.rows[r].is_low().map_err(|_| KeypadError::RowRead)? {
                    found = Some(LAYOUT[r][c]);
                }
            }
            self.cols[c].set_high().map_err(|_| KeypadError::ColumnWrite)?;
            if found.is_some() {
                break;
            }
        }
        Ok(found)
    }
}

impl<R: InputPin, C: OutputPin> KeypadPort for MatrixKeypad<R, C> {
    fn read_key(&mut self) -> Result<Option<char>, KeypadError> {
        let raw = self.scan()?;
        let (next, emit) = step(self.state, raw);
        self.state = next;
        Ok(emit)
    }
}

fn step(state: ScanState, raw: Option<char>) -> (ScanState, Option<char>) {
    match (state, raw) {
        (_, None) => (ScanState::Released, None),
        (ScanState::Released, Some(key)) => settle(key, 1),
        (ScanState::Settling { key, seen }, Some(now)) if now == key => settle(key, seen + 1),
        (ScanState::Settling { .. }, Some(now)) => settle(now, 1),
        (ScanState::Held { key }, Some(_)) => (ScanState::Held { key }, None),
    }
}

fn settle(key: char, seen: u8) -> (ScanState, Option<char>) {
    if seen >= SETTLE_SCANS {
        (ScanState::Held { key }, Some(key))
    } else {
        (ScanState::Settling { key, seen }, None)
    }
}
