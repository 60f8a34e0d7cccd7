//! Fuzz target: `TwinDelta::parse`
//!
//! Feeds arbitrary bytes to the twin document parser and asserts that it
//! never panics and that every value it accepts is inside its domain.
//!
//! cargo fuzz run fuzz_twin_delta

#![no_main]

use doorlock::config::{CODE_CAPACITY, MAX_HOLD_SECS};
use doorlock::twin::TwinDelta;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(delta) = TwinDelta::parse(text) else {
        return;
    };

    if let Some(secs) = delta.mono_hold_secs {
        assert!((1..=MAX_HOLD_SECS).contains(&secs), "hold time out of range");
    }
    for code in [&delta.user_code, &delta.admin_code].into_iter().flatten() {
        let s = code.as_str();
        assert!(!s.is_empty() && s.len() <= CODE_CAPACITY);
        assert!(s.bytes().all(|b| b.is_ascii_digit()), "non-digit code accepted");
    }
});
