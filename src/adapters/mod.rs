//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements              | Connects to                  |
//! |------------|-------------------------|------------------------------|
//! | `hardware` | LinePort                | embedded-hal GPIO pins       |
//! |            | DisplayPort, KeypadPort | (forwarded to collaborators) |
//! | `display`  | DisplayPort             | Serial log output            |
//! | `keypad`   | KeypadPort              | Console / test key queue     |
//! | `cloud`    | CloudPort               | IoT hub over MQTT, or memory |
//! | `time`     | Clock                   | ESP32 system timer           |

pub mod cloud;
pub mod display;
pub mod hardware;
pub mod keypad;
pub mod time;
