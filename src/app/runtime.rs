//! Cooperative runtime: two periodic tasks on one thread.
//!
//! [`Runtime`] owns the scheduler and everything the tasks touch.  The
//! tasks themselves live in [`Tasks`], which implements
//! [`SchedulerDelegate`]; keeping it apart from the scheduler lets the
//! scheduler borrow it mutably during a pass.
//!
//! ## Shutdown
//!
//! A shared `AtomicBool` is checked at the top of every loop iteration.
//! Setting it (signal handler, console command, test) stops the loop after
//! the in-flight tick completes.  A fatal tick error stops it too; no
//! actuation is rolled back either way.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{error, info};

use crate::config::SystemConfig;
use crate::error::Result;
use crate::scheduler::Scheduler;
use crate::timing::Clock;
use crate::twin::TwinSync;

use super::ports::{CloudPort, DisplayPort, KeypadPort, LinePort, SchedulerDelegate, TaskKind};
use super::service::LockController;

/// Everything the two periodic tasks operate on.
pub struct Tasks<C: Clock, H, N> {
    pub controller: LockController<C>,
    pub twin: TwinSync,
    pub hw: H,
    pub cloud: N,
    /// Cloud period requested by the last housekeeping pass (seconds).
    requested_cloud_secs: Option<u32>,
}

impl<C, H, N> SchedulerDelegate for Tasks<C, H, N>
where
    C: Clock,
    H: LinePort + DisplayPort + KeypadPort,
    N: CloudPort,
{
    fn on_task_due(&mut self, _label: &str, kind: TaskKind) -> Result<()> {
        match kind {
            TaskKind::Control => self.controller.tick(&mut self.hw, self.twin.outbox()),
            TaskKind::Cloud => {
                let secs = self.twin.service(&mut self.controller, &mut self.hw, &mut self.cloud)?;
                self.requested_cloud_secs = Some(secs);
                Ok(())
            }
        }
    }
}

pub struct Runtime<C: Clock, H, N> {
    scheduler: Scheduler,
    tasks: Tasks<C, H, N>,
    clock: C,
    shutdown: Arc<AtomicBool>,
    cloud_secs: u32,
}

impl<C, H, N> Runtime<C, H, N>
where
    C: Clock + Clone,
    H: LinePort + DisplayPort + KeypadPort,
    N: CloudPort,
{
    pub fn new(config: SystemConfig, clock: C, hw: H, cloud: N, shutdown: Arc<AtomicBool>) -> Self {
        let now = clock.now();
        let mut scheduler = Scheduler::new();
        let cloud_secs = config.timing.cloud_poll_secs;
        scheduler.add("control", TaskKind::Control, u64::from(config.timing.control_tick_ms), now);
        // The first housekeeping pass runs immediately so the hub session
        // starts without waiting a full poll period.
        scheduler.add("cloud", TaskKind::Cloud, 0, now);

        let twin = TwinSync::new(&config.timing);
        let controller = LockController::new(config, clock.clone());
        Self {
            scheduler,
            tasks: Tasks {
                controller,
                twin,
                hw,
                cloud,
                requested_cloud_secs: None,
            },
            clock,
            shutdown,
            cloud_secs,
        }
    }

    /// Bring the lock into its safe start-up state.
    pub fn start(&mut self) -> Result<()> {
        let t = &mut self.tasks;
        t.controller.start(&mut t.hw, t.twin.outbox())
    }

    /// One scheduler pass at the current time.  Returns how many tasks ran.
    pub fn step(&mut self) -> Result<usize> {
        let now = self.clock.now();
        let fired = self.scheduler.tick(now, &mut self.tasks)?;
        if let Some(secs) = self.tasks.requested_cloud_secs.take() {
            if secs != self.cloud_secs || self.scheduler.period_ms(TaskKind::Cloud) == Some(0) {
                self.cloud_secs = secs;
                self.scheduler.set_period(TaskKind::Cloud, u64::from(secs) * 1000, now);
            }
        }
        Ok(fired)
    }

    /// Run until the shutdown flag is set or a tick fails.
    ///
    /// `idle` is called with the number of milliseconds until the next
    /// task is due; it should sleep (or yield) that long.
    pub fn run(&mut self, mut idle: impl FnMut(u64)) -> Result<()> {
        info!("Runtime: entering loop");
        while !self.shutdown.load(Ordering::Acquire) {
            if let Err(e) = self.step() {
                error!("Runtime: fatal tick error: {}", e);
                return Err(e);
            }
            let now = self.clock.now();
            let wait = self
                .scheduler
                .next_due()
                .map_or(0, |due| due.millis_since(now));
            idle(wait);
        }
        info!("Runtime: shutdown requested, loop stopped");
        Ok(())
    }

    pub fn controller(&self) -> &LockController<C> {
        &self.tasks.controller
    }

    pub fn tasks_mut(&mut self) -> &mut Tasks<C, H, N> {
        &mut self.tasks
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
