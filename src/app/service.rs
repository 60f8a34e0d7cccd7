//! Application service, the hexagonal core.
//!
//! [`LockController`] owns the lock configuration, the menu state machine,
//! the lockout guard, the door monitor, the alarm latch and the relay
//! bookkeeping.  It exposes a hardware-agnostic API; all I/O flows through
//! port traits injected at call sites, so the whole controller runs
//! against mock adapters and a [`ManualClock`](crate::timing::ManualClock).
//!
//! ```text
//!  LinePort ─────▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  KeypadPort ───▶ │        LockController        │     (reports, telemetry)
//!                  │ Menu FSM · Lockout · Alarm   │
//!  DisplayPort ◀── │ Door monitor · Lock relay    │ ◀── TwinDelta / AdminCommand
//!                  └──────────────────────────────┘
//! ```
//!
//! Every hardware error is returned to the caller and ends the tick.
//! Nothing here retries a relay write.

use log::{debug, info, warn};

use crate::alarm::AlarmManager;
use crate::config::{AccessCode, ContactMode, DisplayMode, LockConfig, LockMode, SystemConfig};
use crate::display::Screen;
use crate::drivers::lock_relay::{Actuation, LockPosition, LockRelay};
use crate::error::Result;
use crate::fsm::input::InputBuffer;
use crate::fsm::states::{self, ConfigSelection};
use crate::fsm::{Key, MenuState};
use crate::lockout::{FailureOutcome, LockoutGuard};
use crate::sensors::door::{DoorMonitor, DoorState};
use crate::timing::{Clock, Deadline, Instant};
use crate::twin::{Property, StateReport, TwinDelta};

use super::commands::{AdminCommand, CommandOutcome};
use super::events::{AppEvent, TelemetryCategory};
use super::ports::{DisplayPort, EventSink, KeypadPort, LinePort};

// ───────────────────────────────────────────────────────────────
// LockController
// ───────────────────────────────────────────────────────────────

pub struct LockController<C: Clock> {
    config: SystemConfig,
    clock: C,
    menu: MenuState,
    input: InputBuffer,
    relay: LockRelay,
    alarm: AlarmManager,
    door: DoorMonitor,
    lockout: LockoutGuard,
    /// The blank screen is showing.
    display_dimmed: bool,
    /// At least one twin document has been applied.
    synced: bool,
    last_action_at: Instant,
    unlock_started_at: Instant,
}

impl<C: Clock> LockController<C> {
    /// Construct the controller.  Does **not** touch hardware; call
    /// [`start`](Self::start) next.
    pub fn new(config: SystemConfig, clock: C) -> Self {
        let lockout = LockoutGuard::new(&config.timing);
        let now = clock.now();
        Self {
            config,
            clock,
            menu: MenuState::NormalOperation,
            input: InputBuffer::new(),
            relay: LockRelay::new(),
            alarm: AlarmManager::new(),
            door: DoorMonitor::new(),
            lockout,
            display_dimmed: false,
            synced: false,
            last_action_at: now,
            unlock_started_at: now,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Lock the door, silence the alarm output and show the wait screen
    /// until the first twin document arrives.
    pub fn start(&mut self, hw: &mut (impl LinePort + DisplayPort), sink: &mut impl EventSink) -> Result<()> {
        self.lock(hw, sink)?;
        hw.set_alarm(false)?;
        self.last_action_at = self.clock.now();
        self.draw(hw, Screen::Wait)?;
        sink.emit(&AppEvent::Started);
        info!("LockController started, waiting for twin sync");
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one fast control cycle.  Does nothing until synchronised.
    ///
    /// Order: remote overrides → door monitor → alarm auto-trip →
    /// monostable relock → display-off blanking → idle timeout →
    /// lockout timers → at most one key.
    pub fn tick(
        &mut self,
        hw: &mut (impl LinePort + DisplayPort + KeypadPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if !self.synced {
            return Ok(());
        }
        let now = self.clock.now();

        // 1. Remote overrides
        if self.relay.forced_open() {
            self.unlock(hw, sink)?;
            self.unlock_started_at = now;
        }
        if self.relay.forced_closed() {
            self.lock(hw, sink)?;
        }

        // 2. Door monitor
        let door_changed = self.door.changed(hw)?;
        let door_open = self.door.last().is_some_and(DoorState::is_open);
        if door_changed {
            let msg = if door_open { "Door opened." } else { "Door closed." };
            info!("{}", msg);
            sink.emit(&AppEvent::Reported(StateReport::flag(Property::IsDoorOpen, door_open)));
            sink.emit(&AppEvent::telemetry(TelemetryCategory::DoorEvent, msg));
        }

        // 3. Alarm auto-trip
        if self
            .alarm
            .should_trip(door_changed && door_open, self.menu, self.relay.position())
        {
            self.trip_alarm(hw, sink)?;
        }

        // 4. Monostable relock
        let hold = Deadline::after(self.unlock_started_at, u64::from(self.config.lock.mono_hold_ms));
        if self.relay.position() == LockPosition::Open
            && self.config.lock.lock_mode == LockMode::Monostable
            && hold.is_expired(now)
        {
            self.lock(hw, sink)?;
        }

        // 5. Display off
        if self.config.lock.display_mode == DisplayMode::Off && !self.display_dimmed && !self.alarm.is_active() {
            self.draw(hw, Screen::Blank)?;
        }

        // 6. Idle timeout
        if self.action_deadline().is_expired(now) {
            self.on_idle_timeout(hw, sink)?;
        }

        // 7. Lockout timers
        if self.lockout.tick(now) && self.config.lock.display_mode == DisplayMode::Constant {
            self.draw_normal_op(hw)?;
        }

        // 8. One key
        if let Some(raw) = hw.read_key()? {
            self.handle_key(raw, hw, sink)?;
        }

        Ok(())
    }

    // ── Administrative commands ───────────────────────────────

    pub fn handle_command(
        &mut self,
        cmd: AdminCommand,
        hw: &mut (impl LinePort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> Result<CommandOutcome> {
        info!("Command: {}", cmd.method_name());
        match cmd {
            AdminCommand::ResetAlarm => {
                self.clear_alarm(hw, sink)?;
                self.last_action_at = self.clock.now();
            }
            AdminCommand::FactoryReset => self.factory_reset(hw, sink)?,
        }
        Ok(CommandOutcome::Handled)
    }

    /// Restore the factory lock configuration and report every field.
    pub fn factory_reset(&mut self, hw: &mut (impl LinePort + DisplayPort), sink: &mut impl EventSink) -> Result<()> {
        self.config.lock = LockConfig::default();
        for report in self.config_reports() {
            sink.emit(&AppEvent::Reported(report));
        }
        self.lock(hw, sink)?;
        self.input.clear();
        self.set_menu(MenuState::NormalOperation, sink);
        self.draw_normal_op(hw)?;
        info!("Factory reset performed");
        sink.emit(&AppEvent::telemetry(TelemetryCategory::ConfigEvent, "Factory reset performed."));
        Ok(())
    }

    // ── Twin inbound ──────────────────────────────────────────

    /// Apply a parsed twin document.  The first one marks the controller
    /// synchronised and brings up the normal-operation screen.
    pub fn apply_twin(
        &mut self,
        delta: &TwinDelta,
        hw: &mut (impl LinePort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let first = !self.synced;
        self.synced = true;
        let now = self.clock.now();

        if let Some(on) = delta.always_open {
            info!("Twin: AlwaysOpen = {}", on);
            self.relay.set_forced_open(on);
            self.last_action_at = now;
        }
        if let Some(on) = delta.always_closed {
            info!("Twin: AlwaysClosed = {}", on);
            self.relay.set_forced_closed(on);
            self.last_action_at = now;
        }

        let lock = &mut self.config.lock;
        if let Some(mode) = delta.lock_mode {
            lock.lock_mode = mode;
        }
        if let Some(mode) = delta.display_mode {
            lock.display_mode = mode;
        }
        if let Some(secs) = delta.mono_hold_secs {
            if let Err(e) = lock.set_mono_hold_secs(secs) {
                warn!("Twin: MonoSwitchTime {}", e);
            }
        }
        if delta.user_code.is_some() || delta.admin_code.is_some() {
            let user = delta.user_code.clone().unwrap_or_else(|| lock.user_code.clone());
            let admin = delta.admin_code.clone().unwrap_or_else(|| lock.admin_code.clone());
            if user == admin {
                warn!("Twin: user and config passwords would be equal, both ignored");
            } else {
                lock.user_code = user;
                lock.admin_code = admin;
            }
        }
        if let Some(mode) = delta.contact_mode {
            self.config.lock.contact_mode = mode;
            self.lock(hw, sink)?;
        }

        if first {
            info!("Synchronised with cloud twin");
            self.redraw(hw)?;
        }
        Ok(())
    }

    // ── Debug / bring-up ──────────────────────────────────────

    /// Jump straight to `state`.  Bench and test use only; the keypad has
    /// no path into [`MenuState::FactoryReset`].
    pub fn force_menu(&mut self, state: MenuState, sink: &mut impl EventSink) {
        warn!("Menu forced to {}", state);
        self.input.clear();
        self.last_action_at = self.clock.now();
        self.set_menu(state, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn menu_state(&self) -> MenuState {
        self.menu
    }

    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    pub fn lock_position(&self) -> LockPosition {
        self.relay.position()
    }

    pub fn is_alarm_active(&self) -> bool {
        self.alarm.is_active()
    }

    pub fn is_display_dimmed(&self) -> bool {
        self.display_dimmed
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn forced_open(&self) -> bool {
        self.relay.forced_open()
    }

    pub fn forced_closed(&self) -> bool {
        self.relay.forced_closed()
    }

    pub fn lockout(&self) -> &LockoutGuard {
        &self.lockout
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn last_action_at(&self) -> Instant {
        self.last_action_at
    }

    /// Every reported property, for a full resync after reconnect.
    pub fn reported_state(&self) -> Vec<StateReport> {
        let mut all = vec![
            StateReport::flag(Property::IsDoorOpen, self.door.last().is_some_and(DoorState::is_open)),
            StateReport::flag(Property::IsLockOpen, self.relay.position() == LockPosition::Open),
            StateReport::flag(Property::IsAlarm, self.alarm.is_active()),
        ];
        all.extend(self.config_reports());
        all
    }

    // ── Keypad ────────────────────────────────────────────────

    fn handle_key(
        &mut self,
        raw: char,
        hw: &mut (impl LinePort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        debug!("Key pressed: {}", raw);
        self.last_action_at = self.clock.now();

        if self.lockout.is_active() {
            debug!("Keypad locked out, key ignored");
            self.show(hw, Screen::BlockLock)?;
            return Ok(());
        }

        if self.display_dimmed {
            self.redraw(hw)?;
        }

        let Some(key) = Key::from_char(raw) else {
            return Ok(());
        };

        match key {
            Key::Digit(d) => {
                if !self.input.push_digit(d) {
                    debug!("Input buffer full, digit dropped");
                }
            }
            Key::Star => {
                if self.menu == MenuState::NormalOperation {
                    self.star_action(hw, sink)?;
                    self.input.clear();
                }
            }
            Key::Hash => {
                self.hash_action(hw, sink)?;
                self.input.clear();
            }
            Key::Back => {
                self.go_back(hw, sink)?;
                self.input.clear();
            }
            Key::Clear => self.input.clear(),
        }
        Ok(())
    }

    /// `*` in normal operation: enter a menu by code.
    fn star_action(&mut self, hw: &mut (impl LinePort + DisplayPort), sink: &mut impl EventSink) -> Result<()> {
        let lock = &self.config.lock;
        let target = if lock.user_code.matches(self.input.as_str()) {
            MenuState::ChangeUserPassword
        } else if lock.admin_code.matches(self.input.as_str()) {
            MenuState::Config
        } else {
            return self.credential_failure(hw, sink, "Invalid credentials for star function.");
        };

        self.lockout.record_success();
        self.clear_alarm(hw, sink)?;
        self.set_menu(target, sink);
        self.redraw(hw)?;
        if target == MenuState::Config {
            sink.emit(&AppEvent::telemetry(TelemetryCategory::ConfigEvent, "Config accessed."));
        }
        Ok(())
    }

    /// `#`: confirm in the current state.
    fn hash_action(&mut self, hw: &mut (impl LinePort + DisplayPort), sink: &mut impl EventSink) -> Result<()> {
        match self.menu {
            MenuState::NormalOperation => self.confirm_credentials(hw, sink),
            MenuState::ChangeUserPassword => {
                self.change_code(false, sink);
                self.set_menu(MenuState::NormalOperation, sink);
                self.redraw(hw)
            }
            MenuState::Config => {
                match states::config_selection(self.input.as_str()) {
                    Some(ConfigSelection::Enter(next)) => {
                        self.set_menu(next, sink);
                        self.redraw(hw)?;
                    }
                    Some(ConfigSelection::Reserved) => debug!("Config option 6 has no action"),
                    None => debug!("Config: no option '{}'", self.input.as_str()),
                }
                Ok(())
            }
            MenuState::ChangeConfigPassword => {
                self.change_code(true, sink);
                self.back_to_config(hw, sink)
            }
            MenuState::ChangeLockMode => {
                if let Some(mode) = states::lock_mode_choice(self.input.as_str()) {
                    self.config.lock.lock_mode = mode;
                    let msg = match mode {
                        LockMode::Monostable => "Lock mode changed to monostable.",
                        LockMode::Bistable => "Lock mode changed to bistable.",
                    };
                    self.config_changed(StateReport::text(Property::LockMode, mode.twin_name()), msg, sink);
                }
                self.back_to_config(hw, sink)
            }
            MenuState::ChangeContactMode => {
                if let Some(mode) = states::contact_mode_choice(self.input.as_str()) {
                    self.config.lock.contact_mode = mode;
                    self.lock(hw, sink)?;
                    let msg = match mode {
                        ContactMode::NormallyOpen => "Lock contact mode changed to normal open.",
                        ContactMode::NormallyClosed => "Lock contact mode changed to normal closed.",
                    };
                    self.config_changed(StateReport::text(Property::ContactMode, mode.twin_name()), msg, sink);
                }
                self.back_to_config(hw, sink)
            }
            MenuState::ChangeMonoSwitchTime => {
                if let Some(secs) = states::hold_secs_choice(self.input.as_str()) {
                    if self.config.lock.set_mono_hold_secs(secs).is_ok() {
                        let msg = format!("Changed mono switch time to {} seconds.", secs);
                        self.config_changed(StateReport::seconds(Property::MonoSwitchTime, secs), &msg, sink);
                    }
                }
                self.back_to_config(hw, sink)
            }
            MenuState::ChangeDisplayMode => {
                if let Some(mode) = states::display_mode_choice(self.input.as_str()) {
                    self.config.lock.display_mode = mode;
                    let msg = match mode {
                        DisplayMode::Off => "Changed display backlight mode to none.",
                        DisplayMode::Auto => "Changed display backlight mode to auto.",
                        DisplayMode::Constant => "Changed display backlight mode to constant.",
                    };
                    self.config_changed(
                        StateReport::text(Property::DisplayBacklightMode, mode.twin_name()),
                        msg,
                        sink,
                    );
                }
                self.back_to_config(hw, sink)
            }
            MenuState::FactoryReset => self.factory_reset(hw, sink),
        }
    }

    /// `#` in normal operation: clear the alarm, or toggle the lock.
    fn confirm_credentials(
        &mut self,
        hw: &mut (impl LinePort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let lock = &self.config.lock;
        let typed = self.input.as_str();
        if !lock.user_code.matches(typed) && !lock.admin_code.matches(typed) {
            return self.credential_failure(hw, sink, "Invalid credentials.");
        }

        self.lockout.record_success();
        if self.alarm.is_active() {
            return self.clear_alarm(hw, sink);
        }

        let contact = self.config.lock.contact_mode;
        let locked = self.relay.is_locked(hw, contact)?;
        if self.config.lock.lock_mode == LockMode::Bistable && !locked {
            self.lock(hw, sink)
        } else {
            self.unlock(hw, sink)?;
            self.unlock_started_at = self.clock.now();
            Ok(())
        }
    }

    fn credential_failure(
        &mut self,
        hw: &mut (impl LinePort + DisplayPort),
        sink: &mut impl EventSink,
        msg: &'static str,
    ) -> Result<()> {
        sink.emit(&AppEvent::telemetry(TelemetryCategory::ConfigWarning, msg));
        if self.lockout.record_failure(self.clock.now()) == FailureOutcome::LockedOut {
            let secs = self.config.timing.block_lock_timeout_ms / 1000;
            sink.emit(&AppEvent::telemetry(
                TelemetryCategory::LockWarning,
                format!("Three invalid attempts, lock functionality disabled for {} seconds.", secs),
            ));
            self.show(hw, Screen::BlockLock)?;
        }
        Ok(())
    }

    /// Take the buffer as a new user (`admin == false`) or config code.
    /// Empty input and a code equal to the other one are refused.
    fn change_code(&mut self, admin: bool, sink: &mut impl EventSink) {
        let code = match AccessCode::parse(self.input.as_str()) {
            Ok(code) => code,
            Err(e) => {
                info!("Password not changed: {}", e);
                return;
            }
        };
        let lock = &mut self.config.lock;
        let (result, property, msg) = if admin {
            (lock.set_admin_code(code), Property::ConfigPassword, "Config password changed.")
        } else {
            (lock.set_user_code(code), Property::UserPassword, "User password changed.")
        };
        match result {
            Ok(()) => {
                let value = if admin { &lock.admin_code } else { &lock.user_code };
                let report = StateReport::text(property, value.as_str());
                self.config_changed(report, msg, sink);
            }
            Err(e) => info!("Password not changed: {}", e),
        }
    }

    fn config_changed(&self, report: StateReport, msg: &str, sink: &mut impl EventSink) {
        info!("{}", msg);
        sink.emit(&AppEvent::Reported(report));
        sink.emit(&AppEvent::telemetry(TelemetryCategory::ConfigEvent, msg));
    }

    fn back_to_config(&mut self, hw: &mut impl DisplayPort, sink: &mut impl EventSink) -> Result<()> {
        self.set_menu(MenuState::Config, sink);
        self.redraw(hw)
    }

    /// `B`: one level up.
    fn go_back(&mut self, hw: &mut impl DisplayPort, sink: &mut impl EventSink) -> Result<()> {
        let Some(target) = states::back_target(self.menu) else {
            return Ok(());
        };
        if self.menu == MenuState::Config {
            sink.emit(&AppEvent::telemetry(TelemetryCategory::ConfigEvent, "Config exited."));
        }
        self.set_menu(target, sink);
        self.redraw(hw)
    }

    fn on_idle_timeout(&mut self, hw: &mut impl DisplayPort, sink: &mut impl EventSink) -> Result<()> {
        if !matches!(self.menu, MenuState::NormalOperation | MenuState::ChangeUserPassword) {
            sink.emit(&AppEvent::telemetry(
                TelemetryCategory::ConfigEvent,
                "Config exited due to timeout.",
            ));
        }
        if self.config.lock.display_mode == DisplayMode::Auto && !self.alarm.is_active() && !self.display_dimmed {
            self.draw(hw, Screen::Blank)?;
        }
        if self.menu != MenuState::NormalOperation {
            self.set_menu(MenuState::NormalOperation, sink);
            if self.config.lock.display_mode == DisplayMode::Constant {
                self.draw_normal_op(hw)?;
            }
        }
        self.input.clear();
        Ok(())
    }

    // ── Lock and alarm with side effects ──────────────────────

    fn lock(&mut self, hw: &mut (impl LinePort + DisplayPort), sink: &mut impl EventSink) -> Result<()> {
        let outcome = self.relay.lock(hw, self.config.lock.contact_mode)?;
        self.after_actuation(outcome, false, hw, sink)
    }

    fn unlock(&mut self, hw: &mut (impl LinePort + DisplayPort), sink: &mut impl EventSink) -> Result<()> {
        let outcome = self.relay.unlock(hw, self.config.lock.contact_mode)?;
        self.after_actuation(outcome, true, hw, sink)
    }

    fn after_actuation(
        &mut self,
        outcome: Actuation,
        open: bool,
        hw: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if outcome != Actuation::Changed {
            return Ok(());
        }
        let msg = if open { "Lock unlocked." } else { "Lock locked." };
        info!("{}", msg);
        sink.emit(&AppEvent::Reported(StateReport::flag(Property::IsLockOpen, open)));
        sink.emit(&AppEvent::telemetry(TelemetryCategory::LockEvent, msg));
        if self.menu == MenuState::NormalOperation && self.display_live() {
            self.draw_normal_op(hw)?;
        }
        Ok(())
    }

    fn trip_alarm(&mut self, hw: &mut (impl LinePort + DisplayPort), sink: &mut impl EventSink) -> Result<()> {
        if self.alarm.trip(hw)? {
            warn!("Alarm! Door opened while locked");
            sink.emit(&AppEvent::Reported(StateReport::flag(Property::IsAlarm, true)));
            sink.emit(&AppEvent::telemetry(TelemetryCategory::LockCritical, "Intrusion!"));
            self.draw(hw, Screen::Alarm)?;
        }
        Ok(())
    }

    fn clear_alarm(&mut self, hw: &mut (impl LinePort + DisplayPort), sink: &mut impl EventSink) -> Result<()> {
        if self.alarm.clear(hw)? {
            info!("Alarm cleared");
            sink.emit(&AppEvent::Reported(StateReport::flag(Property::IsAlarm, false)));
            sink.emit(&AppEvent::telemetry(TelemetryCategory::LockCritical, "Alarm cleared."));
            self.redraw(hw)?;
        }
        Ok(())
    }

    // ── Rendering ─────────────────────────────────────────────

    fn draw(&mut self, hw: &mut impl DisplayPort, screen: Screen) -> Result<()> {
        hw.draw(screen)?;
        self.display_dimmed = screen == Screen::Blank;
        Ok(())
    }

    /// Draw `screen` unless the display is configured off.
    fn show(&mut self, hw: &mut impl DisplayPort, screen: Screen) -> Result<()> {
        if self.config.lock.display_mode == DisplayMode::Off {
            return Ok(());
        }
        self.draw(hw, screen)
    }

    /// Alarm, locked or unlocked.  The alarm screen ignores the display
    /// mode; the others respect it.
    fn draw_normal_op(&mut self, hw: &mut impl DisplayPort) -> Result<()> {
        if self.alarm.is_active() {
            return self.draw(hw, Screen::Alarm);
        }
        let screen = match self.relay.position() {
            LockPosition::Closed => Screen::Locked,
            LockPosition::Open => Screen::Unlocked,
        };
        self.show(hw, screen)
    }

    /// Screen for the current menu state.
    fn redraw(&mut self, hw: &mut impl DisplayPort) -> Result<()> {
        match states::menu_screen(self.menu) {
            Some(screen) => self.show(hw, screen),
            None => self.draw_normal_op(hw),
        }
    }

    fn display_live(&self) -> bool {
        self.synced && !self.display_dimmed && self.config.lock.display_mode != DisplayMode::Off
    }

    // ── Helpers ───────────────────────────────────────────────

    fn set_menu(&mut self, to: MenuState, sink: &mut impl EventSink) {
        let from = self.menu;
        if from == to {
            return;
        }
        self.menu = to;
        info!("Menu: {} -> {}", from, to);
        sink.emit(&AppEvent::MenuChanged { from, to });
    }

    fn action_deadline(&self) -> Deadline {
        Deadline::after(self.last_action_at, u64::from(self.config.timing.action_timeout_ms))
    }

    fn config_reports(&self) -> [StateReport; 6] {
        let lock = &self.config.lock;
        [
            StateReport::text(Property::UserPassword, lock.user_code.as_str()),
            StateReport::text(Property::ConfigPassword, lock.admin_code.as_str()),
            StateReport::text(Property::LockMode, lock.lock_mode.twin_name()),
            StateReport::text(Property::ContactMode, lock.contact_mode.twin_name()),
            StateReport::text(Property::DisplayBacklightMode, lock.display_mode.twin_name()),
            StateReport::seconds(Property::MonoSwitchTime, lock.mono_hold_secs()),
        ]
    }
}
