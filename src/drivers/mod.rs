//! Actuator and input drivers.

pub mod keypad;
pub mod lock_relay;
