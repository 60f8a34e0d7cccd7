//! Integration tests for the two-task runtime: scheduling, cloud period
//! changes, shutdown, and fatal tick errors.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::mock_hw::MockHw;

use doorlock::adapters::cloud::SimCloud;
use doorlock::app::ports::TaskKind;
use doorlock::app::runtime::Runtime;
use doorlock::config::SystemConfig;
use doorlock::drivers::lock_relay::LockPosition;
use doorlock::error::{Error, LineError};
use doorlock::timing::{Clock, Instant, ManualClock};

fn runtime() -> (Runtime<ManualClock, MockHw, SimCloud>, ManualClock, Arc<AtomicBool>) {
    let clock = ManualClock::new();
    let shutdown = Arc::new(AtomicBool::new(false));
    let mut rt = Runtime::new(
        SystemConfig::default(),
        clock.clone(),
        MockHw::new(),
        SimCloud::new(),
        Arc::clone(&shutdown),
    );
    rt.start().unwrap();
    (rt, clock, shutdown)
}

#[test]
fn cloud_runs_immediately_then_every_poll_period() {
    let (mut rt, clock, _) = runtime();

    assert_eq!(rt.step().unwrap(), 1, "only the cloud task is due at start");
    assert_eq!(rt.tasks_mut().cloud.connect_attempts(), 1);
    assert_eq!(rt.scheduler().period_ms(TaskKind::Cloud), Some(5_000));

    clock.advance(10);
    assert_eq!(rt.step().unwrap(), 1, "control tick");

    clock.set(5_000);
    assert_eq!(rt.step().unwrap(), 2, "control and cloud together");
}

#[test]
fn cloud_period_follows_backoff() {
    let (mut rt, clock, _) = runtime();
    rt.tasks_mut().cloud.set_accept_connect(false);

    rt.step().unwrap();
    assert_eq!(rt.scheduler().period_ms(TaskKind::Cloud), Some(2_000));

    clock.set(2_000);
    rt.step().unwrap();
    assert_eq!(rt.scheduler().period_ms(TaskKind::Cloud), Some(4_000));

    rt.tasks_mut().cloud.set_accept_connect(true);
    clock.set(6_000);
    rt.step().unwrap();
    assert_eq!(rt.scheduler().period_ms(TaskKind::Cloud), Some(5_000));
}

#[test]
fn loop_syncs_and_opens_with_a_code() {
    let (mut rt, clock, shutdown) = runtime();
    rt.tasks_mut().cloud.push_twin(r#"{"reported": {"LockMode": "Monostable"}}"#);
    rt.tasks_mut().hw.type_keys("1234#");

    let idle_clock = clock.clone();
    let flag = Arc::clone(&shutdown);
    rt.run(move |wait_ms| {
        idle_clock.advance(wait_ms.max(1));
        if idle_clock.now() >= Instant::from_millis(1_000) {
            flag.store(true, Ordering::Release);
        }
    })
    .unwrap();

    assert!(rt.controller().is_synced());
    assert_eq!(rt.controller().lock_position(), LockPosition::Open);
    assert!(rt.tasks_mut().hw.keys.is_empty());
}

#[test]
fn preset_shutdown_runs_nothing() {
    let (mut rt, _, shutdown) = runtime();
    shutdown.store(true, Ordering::Release);
    rt.run(|_| panic!("loop body must not run")).unwrap();
    assert_eq!(rt.tasks_mut().cloud.connect_attempts(), 0);
}

#[test]
fn line_fault_stops_the_loop() {
    let (mut rt, clock, _) = runtime();
    rt.tasks_mut().cloud.push_twin("{}");
    rt.tasks_mut().hw.fail_door_read = true;

    let idle_clock = clock.clone();
    let err = rt
        .run(move |wait_ms| idle_clock.advance(wait_ms.max(1)))
        .unwrap_err();
    assert_eq!(err, Error::Line(LineError::DoorRead));
}
