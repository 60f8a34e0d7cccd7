//! GPIO pin assignments for the DoorLock controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Door and relays
// ---------------------------------------------------------------------------

/// Digital input: reed contact on the door frame, pull-up.
/// HIGH = door open (magnet away), LOW = door closed.
pub const DOOR_SENSOR_GPIO: i32 = 4;
/// Digital output: lock relay.  Its meaning (locked / unlocked) depends on
/// the configured contact mode.
pub const LOCK_RELAY_GPIO: i32 = 5;
/// Digital output: alarm siren relay (active HIGH).
pub const ALARM_RELAY_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// 4x4 matrix keypad
// ---------------------------------------------------------------------------

/// Row inputs with internal pull-ups, top to bottom.
pub const KEYPAD_ROW_GPIOS: [i32; 4] = [15, 16, 17, 18];
/// Column outputs, idle HIGH, left to right.
pub const KEYPAD_COL_GPIOS: [i32; 4] = [8, 3, 46, 9];

