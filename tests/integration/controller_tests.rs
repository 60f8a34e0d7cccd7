//! Integration tests for the keypad → LockController → lines pipeline.
//!
//! Every test drives the controller tick by tick with a hand-advanced
//! clock, one key per tick, exactly as the control task does.

use crate::mock_hw::{MockHw, RecordingSink};

use doorlock::app::commands::{AdminCommand, CommandOutcome};
use doorlock::app::events::TelemetryCategory;
use doorlock::app::ports::Level;
use doorlock::app::service::LockController;
use doorlock::config::{ContactMode, DisplayMode, LockMode, SystemConfig};
use doorlock::display::Screen;
use doorlock::drivers::lock_relay::LockPosition;
use doorlock::error::{Error, LineError};
use doorlock::fsm::MenuState;
use doorlock::timing::ManualClock;
use doorlock::twin::{Property, TwinDelta};

struct Bench {
    ctl: LockController<ManualClock>,
    hw: MockHw,
    sink: RecordingSink,
    clock: ManualClock,
}

impl Bench {
    /// Started but not yet synchronised.
    fn new() -> Self {
        let clock = ManualClock::new();
        let mut ctl = LockController::new(SystemConfig::default(), clock.clone());
        let mut hw = MockHw::new();
        let mut sink = RecordingSink::new();
        ctl.start(&mut hw, &mut sink).unwrap();
        Self { ctl, hw, sink, clock }
    }

    /// Started, synchronised with an empty twin, door monitor seeded.
    fn synced() -> Self {
        let mut b = Self::new();
        b.twin("{}");
        b.tick();
        b.sink.clear();
        b
    }

    fn tick(&mut self) {
        self.ctl.tick(&mut self.hw, &mut self.sink).unwrap();
        self.clock.advance(10);
    }

    fn press(&mut self, keys: &str) {
        for key in keys.chars() {
            self.hw.keys.push_back(key);
            self.tick();
        }
    }

    fn twin(&mut self, json: &str) {
        let delta = TwinDelta::parse(json).unwrap();
        self.ctl.apply_twin(&delta, &mut self.hw, &mut self.sink).unwrap();
    }

    fn idle(&mut self, ms: u64) {
        self.clock.advance(ms);
        self.tick();
    }
}

// ── Start-up and synchronisation ──────────────────────────────

#[test]
fn start_locks_and_waits_for_sync() {
    let b = Bench::new();
    assert_eq!(b.hw.lock, Level::Low, "normally-open contact locks low");
    assert!(!b.hw.alarm);
    assert_eq!(b.hw.last_screen(), Some(Screen::Wait));
    assert!(!b.ctl.is_synced());
}

#[test]
fn nothing_happens_before_first_twin() {
    let mut b = Bench::new();
    b.hw.type_keys("1234#");
    b.hw.door_open = true;
    for _ in 0..10 {
        b.tick();
    }
    assert_eq!(b.hw.keys.len(), 5, "keypad is not read while unsynchronised");
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed);
    assert!(!b.ctl.is_alarm_active());
}

#[test]
fn first_twin_shows_normal_operation() {
    let mut b = Bench::new();
    b.twin(r#"{"desired": {"$version": 1}, "reported": {}}"#);
    assert!(b.ctl.is_synced());
    assert_eq!(b.hw.last_screen(), Some(Screen::Locked));
}

// ── Opening with a code ───────────────────────────────────────

#[test]
fn user_code_unlocks_and_monostable_relocks() {
    let mut b = Bench::synced();
    b.press("1234#");

    assert_eq!(b.ctl.lock_position(), LockPosition::Open);
    assert_eq!(b.hw.lock, Level::High);
    assert_eq!(b.hw.last_screen(), Some(Screen::Unlocked));
    assert_eq!(b.sink.last_report(Property::IsLockOpen).as_deref(), Some("true"));
    assert!(b.sink.has_telemetry(TelemetryCategory::LockEvent, "Lock unlocked."));
    assert_eq!(b.ctl.input(), "");

    b.idle(4_900);
    assert_eq!(b.ctl.lock_position(), LockPosition::Open, "hold time not yet over");

    b.idle(200);
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed);
    assert_eq!(b.hw.lock, Level::Low);
    assert!(b.sink.has_telemetry(TelemetryCategory::LockEvent, "Lock locked."));
    assert_eq!(b.hw.last_screen(), Some(Screen::Locked));
}

#[test]
fn admin_code_also_opens() {
    let mut b = Bench::synced();
    b.press("12345#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Open);
}

#[test]
fn bistable_toggles_on_each_valid_code() {
    let mut b = Bench::synced();
    b.twin(r#"{"LockMode": "Bistable"}"#);

    b.press("1234#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Open);

    b.idle(60_000);
    assert_eq!(b.ctl.lock_position(), LockPosition::Open, "bistable never relocks by itself");

    b.press("1234#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed);
    assert_eq!(b.hw.lock, Level::Low);
}

#[test]
fn clear_key_discards_partial_code() {
    let mut b = Bench::synced();
    b.press("12C1234#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Open);
}

#[test]
fn input_stops_at_twelve_digits() {
    let mut b = Bench::synced();
    b.press("1234567890123");
    assert_eq!(b.ctl.input(), "123456789012");
}

#[test]
fn unmapped_keys_are_ignored() {
    let mut b = Bench::synced();
    b.press("12A3D4#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Open);
}

// ── Invalid credentials and lockout ───────────────────────────

#[test]
fn three_failures_lock_out_the_keypad() {
    let mut b = Bench::synced();
    b.press("9999#");
    b.press("9999#");
    assert_eq!(b.ctl.lockout().invalid_attempts(), 2);
    assert!(!b.ctl.lockout().is_active());

    b.press("9999#");
    assert!(b.ctl.lockout().is_active());
    assert_eq!(b.hw.last_screen(), Some(Screen::BlockLock));
    let warnings = b
        .sink
        .telemetry()
        .into_iter()
        .filter(|(c, m)| *c == TelemetryCategory::ConfigWarning && m == "Invalid credentials.")
        .count();
    assert_eq!(warnings, 3);
    assert!(b.sink.has_telemetry(
        TelemetryCategory::LockWarning,
        "Three invalid attempts, lock functionality disabled for 30 seconds."
    ));

    // Even the right code does nothing while locked out.
    b.press("1234#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed);
    assert_eq!(b.ctl.input(), "");

    // After the lockout the code works again.
    b.idle(30_000);
    assert!(!b.ctl.lockout().is_active());
    assert_eq!(b.ctl.lockout().invalid_attempts(), 0);
    b.press("1234#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Open);
}

#[test]
fn failure_count_resets_after_quiet_period() {
    let mut b = Bench::synced();
    b.press("9999#");
    b.press("9999#");
    b.idle(31_000);
    assert_eq!(b.ctl.lockout().invalid_attempts(), 0);

    b.press("9999#");
    assert!(!b.ctl.lockout().is_active(), "one failure after the reset is not a lockout");
}

#[test]
fn valid_code_resets_failure_count() {
    let mut b = Bench::synced();
    b.press("9999#");
    b.press("9999#");
    b.press("1234#");
    assert_eq!(b.ctl.lockout().invalid_attempts(), 0);
}

#[test]
fn wrong_code_with_star_warns() {
    let mut b = Bench::synced();
    b.press("4321*");
    assert_eq!(b.ctl.menu_state(), MenuState::NormalOperation);
    assert!(b.sink.has_telemetry(
        TelemetryCategory::ConfigWarning,
        "Invalid credentials for star function."
    ));
    assert_eq!(b.ctl.lockout().invalid_attempts(), 1);
}

// ── Door and alarm ────────────────────────────────────────────

#[test]
fn door_changes_are_reported() {
    let mut b = Bench::synced();
    b.press("1234#");
    b.hw.door_open = true;
    b.tick();
    assert_eq!(b.sink.last_report(Property::IsDoorOpen).as_deref(), Some("true"));
    assert!(b.sink.has_telemetry(TelemetryCategory::DoorEvent, "Door opened."));
    assert!(!b.ctl.is_alarm_active(), "door opened while unlocked is not an intrusion");

    b.hw.door_open = false;
    b.tick();
    assert_eq!(b.sink.last_report(Property::IsDoorOpen).as_deref(), Some("false"));
    assert!(b.sink.has_telemetry(TelemetryCategory::DoorEvent, "Door closed."));
}

#[test]
fn forced_door_trips_alarm_and_code_clears_it() {
    let mut b = Bench::synced();
    b.hw.door_open = true;
    b.tick();

    assert!(b.ctl.is_alarm_active());
    assert!(b.hw.alarm);
    assert_eq!(b.hw.last_screen(), Some(Screen::Alarm));
    assert_eq!(b.sink.last_report(Property::IsAlarm).as_deref(), Some("true"));
    assert!(b.sink.has_telemetry(TelemetryCategory::LockCritical, "Intrusion!"));

    b.press("1234#");
    assert!(!b.ctl.is_alarm_active());
    assert!(!b.hw.alarm);
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed, "clearing the alarm does not open");
    assert_eq!(b.sink.last_report(Property::IsAlarm).as_deref(), Some("false"));
    assert!(b.sink.has_telemetry(TelemetryCategory::LockCritical, "Alarm cleared."));
    assert_eq!(b.hw.last_screen(), Some(Screen::Locked));
}

#[test]
fn alarm_screen_survives_idle_timeout() {
    let mut b = Bench::synced();
    b.hw.door_open = true;
    b.tick();
    b.idle(20_000);
    assert_eq!(b.hw.last_screen(), Some(Screen::Alarm));
    assert!(!b.ctl.is_display_dimmed());
}

#[test]
fn no_alarm_while_in_a_menu() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.hw.door_open = true;
    b.tick();
    assert!(!b.ctl.is_alarm_active());
}

#[test]
fn reset_alarm_command() {
    let mut b = Bench::synced();
    b.hw.door_open = true;
    b.tick();

    let outcome = b
        .ctl
        .handle_command(AdminCommand::ResetAlarm, &mut b.hw, &mut b.sink)
        .unwrap();
    assert_eq!(outcome, CommandOutcome::Handled);
    assert!(!b.ctl.is_alarm_active());
    assert!(!b.hw.alarm);
}

// ── Menus ─────────────────────────────────────────────────────

#[test]
fn admin_code_with_star_enters_config() {
    let mut b = Bench::synced();
    b.press("12345*");
    assert_eq!(b.ctl.menu_state(), MenuState::Config);
    assert_eq!(b.hw.last_screen(), Some(Screen::Config));
    assert!(b.sink.has_telemetry(TelemetryCategory::ConfigEvent, "Config accessed."));

    b.press("B");
    assert_eq!(b.ctl.menu_state(), MenuState::NormalOperation);
    assert!(b.sink.has_telemetry(TelemetryCategory::ConfigEvent, "Config exited."));
    assert_eq!(b.hw.last_screen(), Some(Screen::Locked));
}

#[test]
fn change_user_password() {
    let mut b = Bench::synced();
    b.press("1234*");
    assert_eq!(b.ctl.menu_state(), MenuState::ChangeUserPassword);
    assert_eq!(b.hw.last_screen(), Some(Screen::ChangePassword));

    b.press("5678#");
    assert_eq!(b.ctl.menu_state(), MenuState::NormalOperation);
    assert_eq!(b.ctl.config().lock.user_code.as_str(), "5678");
    assert_eq!(b.sink.last_report(Property::UserPassword).as_deref(), Some("\"5678\""));
    assert!(b.sink.has_telemetry(TelemetryCategory::ConfigEvent, "User password changed."));

    b.press("1234#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed, "old code no longer works");
    b.press("5678#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Open);
}

#[test]
fn user_password_equal_to_admin_is_refused() {
    let mut b = Bench::synced();
    b.press("1234*");
    b.press("12345#");
    assert_eq!(b.ctl.config().lock.user_code.as_str(), "1234");
    assert!(b.sink.reports(Property::UserPassword).is_empty());

    b.press("1234*");
    b.press("#");
    assert_eq!(b.ctl.config().lock.user_code.as_str(), "1234", "empty input is not a code");
}

#[test]
fn change_config_password() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.press("1#");
    assert_eq!(b.ctl.menu_state(), MenuState::ChangeConfigPassword);
    b.press("24680#");
    assert_eq!(b.ctl.menu_state(), MenuState::Config);
    assert_eq!(b.ctl.config().lock.admin_code.as_str(), "24680");
    assert!(b.sink.has_telemetry(TelemetryCategory::ConfigEvent, "Config password changed."));
}

#[test]
fn change_lock_mode() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.press("2#");
    assert_eq!(b.hw.last_screen(), Some(Screen::ChangeLockMode));
    b.press("2#");
    assert_eq!(b.ctl.config().lock.lock_mode, LockMode::Bistable);
    assert_eq!(b.ctl.menu_state(), MenuState::Config);
    assert_eq!(b.sink.last_report(Property::LockMode).as_deref(), Some("\"Bistable\""));
    assert!(b.sink.has_telemetry(TelemetryCategory::ConfigEvent, "Lock mode changed to bistable."));
}

#[test]
fn invalid_choice_returns_to_config_unchanged() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.press("2#");
    b.press("7#");
    assert_eq!(b.ctl.menu_state(), MenuState::Config);
    assert_eq!(b.ctl.config().lock.lock_mode, LockMode::Monostable);
    assert!(b.sink.reports(Property::LockMode).is_empty());
}

#[test]
fn change_contact_mode_relocks_with_new_polarity() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.press("3#");
    b.press("2#");
    assert_eq!(b.ctl.config().lock.contact_mode, ContactMode::NormallyClosed);
    assert_eq!(b.hw.lock, Level::High, "normally-closed contact locks high");
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed);
    assert_eq!(
        b.sink.last_report(Property::ContactMode).as_deref(),
        Some("\"Normal closed\"")
    );
    assert!(b.sink.has_telemetry(
        TelemetryCategory::ConfigEvent,
        "Lock contact mode changed to normal closed."
    ));
}

#[test]
fn change_mono_switch_time() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.press("4#");
    b.press("12#");
    assert_eq!(b.ctl.config().lock.mono_hold_secs(), 12);
    assert_eq!(b.sink.last_report(Property::MonoSwitchTime).as_deref(), Some("\"12\""));
    assert!(b.sink.has_telemetry(
        TelemetryCategory::ConfigEvent,
        "Changed mono switch time to 12 seconds."
    ));

    b.press("4#");
    b.press("1000#");
    assert_eq!(b.ctl.config().lock.mono_hold_secs(), 12, "out of range value is dropped");
    assert_eq!(b.ctl.menu_state(), MenuState::Config);
}

#[test]
fn change_display_mode() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.press("5#");
    b.press("3#");
    assert_eq!(b.ctl.config().lock.display_mode, DisplayMode::Constant);
    assert_eq!(
        b.sink.last_report(Property::DisplayBacklightMode).as_deref(),
        Some("\"Constant\"")
    );
    assert!(b.sink.has_telemetry(
        TelemetryCategory::ConfigEvent,
        "Changed display backlight mode to constant."
    ));
}

#[test]
fn reserved_config_option_stays_in_config() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.press("6#");
    assert_eq!(b.ctl.menu_state(), MenuState::Config);
    b.press("9#");
    assert_eq!(b.ctl.menu_state(), MenuState::Config);
}

#[test]
fn back_from_sub_menu_goes_to_config() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.press("4#");
    b.press("B");
    assert_eq!(b.ctl.menu_state(), MenuState::Config);
    assert_eq!(b.hw.last_screen(), Some(Screen::Config));
}

#[test]
fn star_does_nothing_inside_menus() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.press("12345*");
    assert_eq!(b.ctl.menu_state(), MenuState::Config);
}

// ── Timeouts and display ──────────────────────────────────────

#[test]
fn idle_config_times_out_and_display_blanks() {
    let mut b = Bench::synced();
    b.press("12345*");
    b.idle(15_000);

    assert_eq!(b.ctl.menu_state(), MenuState::NormalOperation);
    assert!(b.sink.has_telemetry(TelemetryCategory::ConfigEvent, "Config exited due to timeout."));
    assert!(b.ctl.is_display_dimmed());
    assert_eq!(b.hw.last_screen(), Some(Screen::Blank));
}

#[test]
fn key_wakes_a_blank_display() {
    let mut b = Bench::synced();
    b.idle(15_000);
    assert!(b.ctl.is_display_dimmed());

    b.press("1");
    assert!(!b.ctl.is_display_dimmed());
    assert_eq!(b.hw.last_screen(), Some(Screen::Locked));
}

#[test]
fn constant_display_never_blanks() {
    let mut b = Bench::synced();
    b.twin(r#"{"DisplayBacklightMode": "Constant"}"#);
    b.press("12345*");
    b.idle(15_000);
    assert!(!b.ctl.is_display_dimmed());
    assert_eq!(b.hw.last_screen(), Some(Screen::Locked));
}

#[test]
fn display_off_shows_only_the_alarm() {
    let mut b = Bench::synced();
    b.twin(r#"{"DisplayBacklightMode": "None"}"#);
    b.tick();
    assert_eq!(b.hw.last_screen(), Some(Screen::Blank));

    b.press("1234#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Open);
    assert_eq!(b.hw.last_screen(), Some(Screen::Blank));

    b.idle(6_000);
    b.hw.door_open = true;
    b.tick();
    assert_eq!(b.hw.last_screen(), Some(Screen::Alarm));
}

// ── Remote overrides ──────────────────────────────────────────

#[test]
fn always_open_holds_the_lock_open() {
    let mut b = Bench::synced();
    b.twin(r#"{"AlwaysOpen": {"value": true}}"#);
    b.tick();
    assert_eq!(b.ctl.lock_position(), LockPosition::Open);

    b.idle(60_000);
    assert_eq!(b.ctl.lock_position(), LockPosition::Open, "no monostable relock while forced");

    b.twin(r#"{"AlwaysOpen": {"value": false}}"#);
    b.idle(5_000);
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed);
}

#[test]
fn always_closed_refuses_codes() {
    let mut b = Bench::synced();
    b.twin(r#"{"AlwaysClosed": {"value": true}}"#);
    b.press("1234#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed);
    assert_eq!(b.hw.lock, Level::Low);
    assert_eq!(b.hw.lock_writes, 0);
}

#[test]
fn relocking_a_locked_door_reports_nothing() {
    let mut b = Bench::synced();
    b.twin(r#"{"AlwaysClosed": {"value": true}}"#);
    for _ in 0..5 {
        b.tick();
    }
    b.press("1234#");
    assert!(b.sink.reports(Property::IsLockOpen).is_empty());
    assert!(b.sink.telemetry().iter().all(|(cat, _)| *cat != TelemetryCategory::LockEvent));
}

#[test]
fn twin_contact_mode_relocks() {
    let mut b = Bench::synced();
    b.twin(r#"{"reported": {"ContactMode": "Normal closed"}}"#);
    assert_eq!(b.hw.lock, Level::High);
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed);
}

#[test]
fn twin_codes_are_applied_as_a_pair() {
    let mut b = Bench::synced();
    b.twin(r#"{"UserPassword": "12345", "ConfigPassword": "1234"}"#);
    assert_eq!(b.ctl.config().lock.user_code.as_str(), "12345");
    assert_eq!(b.ctl.config().lock.admin_code.as_str(), "1234");

    b.twin(r#"{"UserPassword": "1234"}"#);
    assert_eq!(b.ctl.config().lock.user_code.as_str(), "12345", "equal codes are refused");
}

// ── Factory reset ─────────────────────────────────────────────

#[test]
fn factory_reset_restores_defaults_and_reports() {
    let mut b = Bench::synced();
    b.twin(r#"{"LockMode": "Bistable", "ContactMode": "Normal closed", "MonoSwitchTime": 30}"#);
    b.press("1234#");
    assert_eq!(b.ctl.lock_position(), LockPosition::Open);
    b.sink.clear();

    let outcome = b
        .ctl
        .handle_command(AdminCommand::FactoryReset, &mut b.hw, &mut b.sink)
        .unwrap();
    assert_eq!(outcome, CommandOutcome::Handled);

    assert_eq!(b.ctl.config().lock, SystemConfig::default().lock);
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed);
    assert_eq!(b.hw.lock, Level::Low);
    assert_eq!(b.sink.last_report(Property::LockMode).as_deref(), Some("\"Monostable\""));
    assert_eq!(b.sink.last_report(Property::ContactMode).as_deref(), Some("\"Normal open\""));
    assert_eq!(b.sink.last_report(Property::MonoSwitchTime).as_deref(), Some("\"5\""));
    assert_eq!(b.sink.last_report(Property::UserPassword).as_deref(), Some("\"1234\""));
    assert!(b.sink.has_telemetry(TelemetryCategory::ConfigEvent, "Factory reset performed."));
}

#[test]
fn forced_factory_reset_menu_resets_on_hash() {
    let mut b = Bench::synced();
    b.twin(r#"{"DisplayBacklightMode": "Constant"}"#);
    b.ctl.force_menu(MenuState::FactoryReset, &mut b.sink);
    b.press("#");
    assert_eq!(b.ctl.menu_state(), MenuState::NormalOperation);
    assert_eq!(b.ctl.config().lock.display_mode, DisplayMode::Auto);
}

// ── Hardware faults ───────────────────────────────────────────

#[test]
fn relay_fault_ends_the_tick() {
    let mut b = Bench::synced();
    b.hw.fail_lock_write = true;
    b.press("1234");
    b.hw.keys.push_back('#');
    let err = b.ctl.tick(&mut b.hw, &mut b.sink).unwrap_err();
    assert_eq!(err, Error::Line(LineError::LockWrite));
    assert_eq!(b.ctl.lock_position(), LockPosition::Closed);
}

#[test]
fn reported_state_covers_every_property() {
    let b = Bench::synced();
    let all = b.ctl.reported_state();
    let names: Vec<_> = all.iter().map(|r| r.property).collect();
    assert_eq!(names, Property::ALL.to_vec());
    assert_eq!(all[0].value, "false");
}
