//! DoorLock firmware entry point.
//!
//! Hexagonal architecture with a two-task cooperative scheduler.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogDisplay     MatrixKeypad            │
//! │  (door, lock, alarm)    (DisplayPort)  (KeypadPort)            │
//! │  EspHubClient           MonotonicClock                         │
//! │  (CloudPort, MQTT)      (Clock)                                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            LockController (pure logic)                 │    │
//! │  │  Menu FSM · Lockout · Alarm · Door monitor · Relay     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (control 10 ms · cloud 5 s) · TwinSync (outbox)     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, anyhow};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_hal::prelude::Peripherals;
use esp_idf_hal::reset::restart;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{ClientConfiguration, Configuration, EspWifi};
use log::{info, warn};

use doorlock::adapters::cloud::esp_impl::{EspHubClient, HubCredentials};
use doorlock::adapters::display::LogDisplay;
use doorlock::adapters::hardware::{HardwareAdapter, LinePolarity};
use doorlock::adapters::time::MonotonicClock;
use doorlock::app::runtime::Runtime;
use doorlock::config::SystemConfig;
use doorlock::drivers::keypad::MatrixKeypad;
use doorlock::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  DoorLock v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 2. Configuration (factory defaults, no persistence) ───
    let config = SystemConfig::default();
    config.validate().map_err(|e| anyhow!("config: {}", e))?;

    // ── 3. Wi-Fi station ──────────────────────────────────────
    let mut wifi = EspWifi::new(peripherals.modem, sysloop, Some(nvs))?;
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: option_env!("DOORLOCK_WIFI_SSID")
            .unwrap_or_default()
            .try_into()
            .map_err(|()| anyhow!("Wi-Fi SSID too long"))?,
        password: option_env!("DOORLOCK_WIFI_PASS")
            .unwrap_or_default()
            .try_into()
            .map_err(|()| anyhow!("Wi-Fi password too long"))?,
        ..Default::default()
    }))?;
    wifi.start()?;
    if let Err(e) = wifi.connect() {
        // The slow tick keeps checking the link; the lock works offline.
        warn!("Wi-Fi connect failed: {}", e);
    }

    // ── 4. Lines, keypad, display ─────────────────────────────
    // SAFETY: every GPIO number comes from `pins` and is claimed once.
    let mut door = PinDriver::input(unsafe { AnyIOPin::new(pins::DOOR_SENSOR_GPIO) })?;
    door.set_pull(Pull::Up)?;
    let lock = PinDriver::input_output(unsafe { AnyIOPin::new(pins::LOCK_RELAY_GPIO) })?;
    let alarm = PinDriver::output(unsafe { AnyIOPin::new(pins::ALARM_RELAY_GPIO) })?;

    let mut rows = Vec::with_capacity(4);
    for gpio in pins::KEYPAD_ROW_GPIOS {
        let mut row = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
        row.set_pull(Pull::Up)?;
        rows.push(row);
    }
    let mut cols = Vec::with_capacity(4);
    for gpio in pins::KEYPAD_COL_GPIOS {
        cols.push(PinDriver::output(unsafe { AnyIOPin::new(gpio) })?);
    }
    let rows = rows.try_into().map_err(|_| anyhow!("keypad needs 4 rows"))?;
    let cols = cols.try_into().map_err(|_| anyhow!("keypad needs 4 columns"))?;
    let keypad = MatrixKeypad::new(rows, cols).map_err(|e| anyhow!("keypad: {}", e))?;

    let hw = HardwareAdapter::new(door, lock, alarm, LogDisplay::new(), keypad, LinePolarity::default());

    // ── 5. Cloud ──────────────────────────────────────────────
    let cloud = EspHubClient::new(
        wifi,
        HubCredentials {
            host: option_env!("DOORLOCK_HUB_HOST").unwrap_or_default().into(),
            device_id: option_env!("DOORLOCK_DEVICE_ID").unwrap_or("doorlock").into(),
            sas_token: option_env!("DOORLOCK_SAS_TOKEN").unwrap_or_default().into(),
        },
    );

    // ── 6. Runtime ────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_console(Arc::clone(&shutdown))?;
    let mut runtime = Runtime::new(config, MonotonicClock::new(), hw, cloud, shutdown);
    runtime.start().map_err(|e| anyhow!("start: {}", e))?;

    info!("System ready. Entering control loop.");
    runtime
        .run(|wait_ms| FreeRtos::delay_ms(wait_ms.clamp(1, 1_000) as u32))
        .map_err(|e| anyhow!("control loop stopped: {}", e))?;

    info!("Control loop stopped, restarting");
    restart()
}

/// Serial console: `restart` stops the control loop at the top of its next
/// iteration, after which `main` reboots the chip.
fn spawn_console(shutdown: Arc<AtomicBool>) -> Result<()> {
    std::thread::Builder::new()
        .name("console".into())
        .stack_size(4096)
        .spawn(move || {
            for line in std::io::stdin().lines() {
                match line.as_deref().map(str::trim) {
                    Ok("restart") => {
                        warn!("Console: restart requested");
                        shutdown.store(true, Ordering::Release);
                        return;
                    }
                    Ok("") => {}
                    Ok(other) => info!("Console: unknown command '{}'", other),
                    Err(e) => {
                        warn!("Console: read failed ({})", e);
                        return;
                    }
                }
            }
        })?;
    Ok(())
}
