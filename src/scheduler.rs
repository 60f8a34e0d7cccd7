//! Periodic task scheduler.
//!
//! Two cooperative tasks share one thread: the fast control tick and the
//! slow cloud housekeeping tick.  The scheduler only tracks *when* each
//! is due; it notifies a [`SchedulerDelegate`] and the delegate does the
//! work.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Periodic tasks                          │
//! │                                                              │
//! │     ┌──────────────────┐          ┌──────────────────┐       │
//! │     │ Control  (10 ms) │          │ Cloud  (5 s /    │       │
//! │     │                  │          │  2 s → 60 s)     │       │
//! │     └────────┬─────────┘          └────────┬─────────┘       │
//! │              │                             │                 │
//! │              ▼                             ▼                 │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │                 SchedulerDelegate                      │  │
//! │  │        (Runtime: controller tick / twin service)       │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! A task fires at most once per [`Scheduler::tick`] and is re-armed from
//! the tick's `now`, so a stalled loop never replays missed periods.

use log::info;

use crate::app::ports::{SchedulerDelegate, TaskKind};
use crate::error::Result;
use crate::timing::{Deadline, Instant};

// ═══════════════════════════════════════════════════════════════
//  Task entries
// ═══════════════════════════════════════════════════════════════

/// Maximum number of tasks (stack-allocated).
const MAX_TASKS: usize = 4;

#[derive(Debug, Clone)]
struct TaskEntry {
    label: &'static str,
    kind: TaskKind,
    period_ms: u64,
    next: Deadline,
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// The scheduler engine.
///
/// Decoupled from the work it schedules: when a task is due it invokes
/// the [`SchedulerDelegate`] callback, which makes the timing logic
/// testable with a recording delegate and a hand-driven clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: heapless::Vec<TaskEntry, MAX_TASKS>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a periodic task, first due one period after `now`.
    /// Returns the slot index, or `None` if full.
    pub fn add(&mut self, label: &'static str, kind: TaskKind, period_ms: u64, now: Instant) -> Option<usize> {
        let entry = TaskEntry {
            label,
            kind,
            period_ms,
            next: Deadline::after(now, period_ms),
        };
        self.tasks.push(entry).ok()?;
        info!("Scheduler: added '{}' every {} ms", label, period_ms);
        Some(self.tasks.len() - 1)
    }

    /// Change the period of every task of `kind` and re-arm it from `now`.
    pub fn set_period(&mut self, kind: TaskKind, period_ms: u64, now: Instant) {
        for task in self.tasks.iter_mut().filter(|t| t.kind == kind) {
            if task.period_ms != period_ms {
                info!("Scheduler: '{}' period {} -> {} ms", task.label, task.period_ms, period_ms);
            }
            task.period_ms = period_ms;
            task.next = Deadline::after(now, period_ms);
        }
    }

    pub fn period_ms(&self, kind: TaskKind) -> Option<u64> {
        self.tasks.iter().find(|t| t.kind == kind).map(|t| t.period_ms)
    }

    /// Fire every task whose deadline has passed.
    ///
    /// Returns how many fired.  A delegate error stops the pass
    /// immediately; the failing task is already re-armed, the ones after
    /// it are left due.
    pub fn tick(&mut self, now: Instant, delegate: &mut dyn SchedulerDelegate) -> Result<usize> {
        let mut fired = 0;
        for task in self.tasks.iter_mut() {
            if !task.next.is_expired(now) {
                continue;
            }
            task.next = Deadline::after(now, task.period_ms);
            fired += 1;
            delegate.on_task_due(task.label, task.kind)?;
        }
        Ok(fired)
    }

    /// Earliest deadline among all tasks.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.iter().map(|t| t.next.at()).min()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
