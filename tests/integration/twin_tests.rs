//! Integration tests for the cloud housekeeping pass: connection
//! backoff, inbound twin documents and direct methods, and the outbox.

use crate::mock_hw::MockHw;

use doorlock::adapters::cloud::SimCloud;
use doorlock::app::ports::CloudPort;
use doorlock::app::service::LockController;
use doorlock::config::{DisplayMode, LockMode, SystemConfig};
use doorlock::display::Screen;
use doorlock::timing::ManualClock;
use doorlock::twin::{Property, StateReport, TwinSync};

struct Hub {
    ctl: LockController<ManualClock>,
    twin: TwinSync,
    hw: MockHw,
    cloud: SimCloud,
    clock: ManualClock,
}

impl Hub {
    fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    fn with_config(config: SystemConfig) -> Self {
        let clock = ManualClock::new();
        let mut twin = TwinSync::new(&config.timing);
        let mut ctl = LockController::new(config, clock.clone());
        let mut hw = MockHw::new();
        ctl.start(&mut hw, twin.outbox()).unwrap();
        Self {
            ctl,
            twin,
            hw,
            cloud: SimCloud::new(),
            clock,
        }
    }

    fn service(&mut self) -> u32 {
        self.twin
            .service(&mut self.ctl, &mut self.hw, &mut self.cloud)
            .unwrap()
    }

    fn tick(&mut self) {
        self.ctl.tick(&mut self.hw, self.twin.outbox()).unwrap();
        self.clock.advance(10);
    }
}

#[test]
fn first_pass_connects_and_reports_everything() {
    let mut hub = Hub::new();
    assert_eq!(hub.service(), 5);
    assert_eq!(hub.cloud.connect_attempts(), 1);
    assert_eq!(hub.cloud.work_calls(), 1);

    let names: Vec<_> = hub.cloud.reports().iter().map(|(p, _)| p.as_str()).collect();
    let expected: Vec<_> = Property::ALL.iter().map(|p| p.name()).collect();
    assert_eq!(names, expected);
    assert_eq!(hub.cloud.last_report("LockMode"), Some("\"Monostable\""));
    assert_eq!(hub.cloud.last_report("IsLockOpen"), Some("false"));
}

#[test]
fn twin_document_synchronises_the_controller() {
    let mut hub = Hub::new();
    hub.cloud.push_twin(
        r#"{ "desired":  { "AlwaysOpen": { "value": false }, "$version": 2 },
             "reported": { "LockMode": "Bistable", "DisplayBacklightMode": "Constant" } }"#,
    );
    hub.service();

    assert!(hub.ctl.is_synced());
    assert_eq!(hub.ctl.config().lock.lock_mode, LockMode::Bistable);
    assert_eq!(hub.hw.last_screen(), Some(Screen::Locked));
}

#[test]
fn malformed_twin_is_dropped() {
    let mut hub = Hub::new();
    hub.cloud.push_twin("{ not json");
    hub.cloud.push_twin("[true]");
    hub.service();
    assert!(!hub.ctl.is_synced());
    assert_eq!(hub.hw.last_screen(), Some(Screen::Wait));
}

#[test]
fn direct_methods_are_answered() {
    let mut hub = Hub::new();
    hub.cloud.push_twin("{}");
    hub.service();
    hub.tick();

    hub.hw.door_open = true;
    hub.tick();
    assert!(hub.ctl.is_alarm_active());

    hub.cloud.push_method("7", "ResetAlarm");
    hub.cloud.push_method("8", "Reboot");
    hub.service();

    assert!(!hub.ctl.is_alarm_active());
    assert_eq!(
        hub.cloud.responses(),
        &[
            ("7".to_string(), 200, r#"{ "Response": "Ok" }"#.to_string()),
            ("8".to_string(), 404, "{ }".to_string()),
        ]
    );
}

#[test]
fn telemetry_follows_reports() {
    let mut hub = Hub::new();
    hub.cloud.push_twin("{}");
    hub.service();
    hub.tick();
    hub.cloud.clear_sent();

    hub.hw.door_open = true;
    hub.tick();
    hub.service();

    assert_eq!(hub.cloud.last_report("IsDoorOpen"), Some("true"));
    assert_eq!(hub.cloud.last_report("IsAlarm"), Some("true"));
    let telemetry: Vec<_> = hub
        .cloud
        .telemetry()
        .iter()
        .map(|(k, m)| (k.as_str(), m.as_str()))
        .collect();
    assert_eq!(
        telemetry,
        vec![("DoorEvent", "Door opened."), ("LockCritical", "Intrusion!")]
    );
}

#[test]
fn connect_failures_back_off_exponentially() {
    let mut hub = Hub::new();
    hub.cloud.set_accept_connect(false);

    let delays: Vec<u32> = (0..7).map(|_| hub.service()).collect();
    assert_eq!(delays, vec![2, 4, 8, 16, 32, 60, 60]);
    assert!(hub.cloud.reports().is_empty());

    hub.cloud.set_accept_connect(true);
    assert_eq!(hub.service(), 5);

    hub.cloud.drop_session();
    hub.cloud.set_accept_connect(false);
    assert_eq!(hub.service(), 2, "backoff starts over after a good session");
}

#[test]
fn no_connect_without_network() {
    let mut hub = Hub::new();
    hub.cloud.set_network_ready(false);
    assert_eq!(hub.service(), 5);
    assert_eq!(hub.cloud.connect_attempts(), 0);
}

#[test]
fn offline_changes_are_sent_after_reconnect() {
    let mut hub = Hub::new();
    hub.cloud.push_twin("{}");
    hub.service();
    hub.tick();

    hub.cloud.drop_session();
    hub.cloud.set_accept_connect(false);
    hub.cloud.clear_sent();

    hub.hw.type_keys("1234#");
    for _ in 0..5 {
        hub.tick();
    }
    hub.service();
    assert!(hub.cloud.reports().is_empty());
    assert!(hub.twin.outbox().pending() > 0);

    hub.cloud.set_accept_connect(true);
    hub.service();
    assert_eq!(hub.cloud.last_report("IsLockOpen"), Some("true"));
    assert!(
        hub.cloud
            .telemetry()
            .iter()
            .any(|(k, m)| k == "LockEvent" && m == "Lock unlocked.")
    );
    assert_eq!(hub.twin.outbox().pending(), 0);
}

#[test]
fn publish_failure_keeps_items_queued() {
    let mut hub = Hub::new();
    hub.service();
    hub.cloud.push_twin("{}");
    hub.service();
    hub.tick();

    hub.cloud.set_fail_publish(true);
    hub.hw.door_open = true;
    hub.tick();
    hub.service();
    assert!(hub.twin.outbox().pending() > 0);

    hub.cloud.set_fail_publish(false);
    hub.service();
    assert_eq!(hub.twin.outbox().pending(), 0);
    assert_eq!(hub.cloud.last_report("IsDoorOpen"), Some("true"));
}

#[test]
fn backoff_saturates_near_the_integer_limit() {
    let mut config = SystemConfig::default();
    config.timing.cloud_backoff_initial_secs = u32::MAX / 2 + 1;
    config.timing.cloud_backoff_max_secs = u32::MAX;
    let mut hub = Hub::with_config(config);
    hub.cloud.set_accept_connect(false);

    assert_eq!(hub.service(), u32::MAX / 2 + 1);
    assert_eq!(hub.service(), u32::MAX);
    assert_eq!(hub.service(), u32::MAX);
}

#[test]
fn pending_session_is_kept_until_it_authenticates() {
    let mut hub = Hub::new();
    hub.cloud.set_lazy_connect(true);

    assert_eq!(hub.service(), 5);
    assert!(hub.cloud.is_connecting());
    assert!(hub.cloud.reports().is_empty());

    assert_eq!(hub.service(), 5);
    assert_eq!(hub.cloud.connect_attempts(), 1, "attempt in progress is not restarted");

    hub.cloud.complete_connect();
    assert_eq!(hub.service(), 5);
    assert_eq!(hub.cloud.reports().len(), Property::ALL.len());
}

#[test]
fn refused_pending_sessions_back_off() {
    let mut hub = Hub::new();
    hub.cloud.set_lazy_connect(true);
    hub.cloud.set_accept_connect(false);

    let mut delays = Vec::new();
    for _ in 0..3 {
        assert_eq!(hub.service(), 5, "attempt started");
        hub.cloud.complete_connect();
        delays.push(hub.service());
    }
    assert_eq!(delays, vec![2, 4, 8]);
    assert_eq!(hub.cloud.connect_attempts(), 3);

    hub.cloud.set_accept_connect(true);
    hub.service();
    hub.cloud.complete_connect();
    assert_eq!(hub.service(), 5);
    assert!(hub.cloud.is_authenticated());

    hub.cloud.drop_session();
    hub.cloud.set_accept_connect(false);
    hub.service();
    hub.cloud.complete_connect();
    assert_eq!(hub.service(), 2, "an authenticated session resets the backoff");
}

#[test]
fn twin_display_mode_is_reported_back_verbatim() {
    let mut hub = Hub::new();
    hub.cloud.push_twin(r#"{ "reported": { "DisplayBacklightMode": "Constant" } }"#);
    hub.service();
    hub.tick();
    assert_eq!(hub.ctl.config().lock.display_mode, DisplayMode::Constant);

    hub.hw.type_keys("12345*2#2#");
    for _ in 0..10 {
        hub.tick();
    }
    assert_eq!(hub.ctl.config().lock.lock_mode, LockMode::Bistable);
    assert!(
        hub.ctl
            .reported_state()
            .contains(&StateReport::text(Property::DisplayBacklightMode, "Constant"))
    );

    hub.cloud.drop_session();
    hub.cloud.clear_sent();
    hub.service();
    assert_eq!(hub.cloud.last_report("DisplayBacklightMode"), Some("\"Constant\""));
    assert_eq!(hub.cloud.last_report("LockMode"), Some("\"Bistable\""));
}
