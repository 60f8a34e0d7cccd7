//! DoorLock firmware library.
//!
//! Exposes the pure-logic modules for integration testing and bench
//! simulation. All ESP-IDF-specific code is guarded by the `espidf`
//! feature within each module.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod fsm;
pub mod lockout;
pub mod pins;
pub mod scheduler;
pub mod timing;
pub mod twin;

// Peripheral-facing modules.  The host build uses their simulation paths.
pub mod adapters;
pub mod drivers;
pub mod sensors;
