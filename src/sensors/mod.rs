//! Sensor subsystem.
//!
//! The door lock has a single binary sensor: a reed contact on the door
//! frame.  It is read through the [`LinePort`](crate::app::ports::LinePort)
//! like every other line, so the monitor itself holds no pin.

pub mod door;
