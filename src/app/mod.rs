//! Application core. Domain logic behind port traits.
//!
//! This module contains the business rules of the door lock: the menu
//! state machine and its timers, lock and alarm handling, twin
//! application, and the two-task runtime.  All interaction with hardware
//! and the cloud happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod runtime;
pub mod service;
