//! Cooperative scheduling primitives: a millisecond clock, cancellation tokens and a
//! single-occupancy repeating task slot.
//!
//! Nothing here spawns timers. The owner polls a [`TaskSlot`] with the current time and acts on
//! the firings it reports, so every callback runs to completion on the caller's thread.

use crate::foundation::error::{SketchError, SketchResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

/// Source of monotonic milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction.
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock; clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(start_ms)))
    }

    pub fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Shared cancellation flag. Cancelling is idempotent and visible to all clones.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancelled.
    pub fn check(&self, what: &str) -> SketchResult<()> {
        if self.is_cancelled() {
            return Err(SketchError::cancelled(what.to_owned()));
        }
        Ok(())
    }
}

/// Handle to a scheduled task; cancelling it stops the task at its next poll.
#[derive(Clone, Debug)]
pub struct TaskHandle {
    id: u64,
    token: CancelToken,
}

impl TaskHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[derive(Debug)]
struct Scheduled {
    handle: TaskHandle,
    period_ms: u64,
    next_due_ms: u64,
}

/// Holds at most one repeating task. Starting a new task cancels the current one first.
#[derive(Debug)]
pub struct TaskSlot {
    name: &'static str,
    active: Option<Scheduled>,
    next_id: u64,
}

impl TaskSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            active: None,
            next_id: 1,
        }
    }

    /// Schedule a task firing every `period_ms`, first at `now_ms + period_ms`.
    pub fn start(&mut self, now_ms: u64, period_ms: u64) -> SketchResult<TaskHandle> {
        if period_ms == 0 {
            return Err(SketchError::validation(format!(
                "{} period must be > 0 ms",
                self.name
            )));
        }
        self.stop();

        let handle = TaskHandle {
            id: self.next_id,
            token: CancelToken::new(),
        };
        self.next_id += 1;
        self.active = Some(Scheduled {
            handle: handle.clone(),
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        });
        tracing::debug!(task = self.name, id = handle.id, period_ms, "task started");
        Ok(handle)
    }

    /// Cancel the active task, if any. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(task) => {
                task.handle.cancel();
                tracing::debug!(task = self.name, id = task.handle.id, "task stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|t| !t.handle.is_cancelled())
    }

    pub fn period_ms(&self) -> Option<u64> {
        self.active.as_ref().map(|t| t.period_ms)
    }

    /// Whether the task is due at `now_ms`. Missed periods coalesce into a single firing.
    ///
    /// A task cancelled through its handle is dropped here.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let Some(task) = self.active.as_mut() else {
            return false;
        };
        if task.handle.is_cancelled() {
            self.active = None;
            return false;
        }
        if now_ms < task.next_due_ms {
            return false;
        }
        let behind = now_ms - task.next_due_ms;
        task.next_due_ms = now_ms + task.period_ms - behind % task.period_ms;
        true
    }
}

#[cfg(test)]
#[path = "../tests/unit/schedule.rs"]
mod tests;
