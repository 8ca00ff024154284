//! One-shot lifecycle timers.
//!
//! Each toast owns at most one pending timer per [`TimerKind`]. Timers run as
//! tasks on the tokio runtime captured at construction, so tests can drive them
//! with tokio's paused clock. Cancelling is optional: a timer firing against a
//! toast that is already gone resolves to a no-op transition.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::error::Result;
use crate::notification::ToastId;

/// Delay between insertion and the steady visible phase, lets the enter
/// animation engage
pub const SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Length of the exit animation before a toast is purged
pub const EXIT_DELAY: Duration = Duration::from_millis(300);

/// Time-to-live applied when the caller does not set one
pub const DEFAULT_DURATION: Duration = Duration::from_millis(4000);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Entering -> visible
    Settle,
    /// Duration elapsed, start the exit phase
    Expire,
    /// Exit animation done, purge the record
    Exit,
}

impl TimerKind {
    pub const ALL: [TimerKind; 3] = [TimerKind::Settle, TimerKind::Expire, TimerKind::Exit];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKind::Settle => "settle",
            TimerKind::Expire => "expire",
            TimerKind::Exit => "exit",
        }
    }
}

struct ArmedTimer {
    generation: u64,
    handle: AbortHandle,
}

/// Arms and cancels per-toast timers
pub struct Scheduler {
    runtime: Handle,
    timers: Arc<DashMap<(ToastId, TimerKind), ArmedTimer>>,
    generation: AtomicU64,
}

impl Scheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            timers: Arc::new(DashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Create a scheduler bound to the runtime of the calling context
    pub fn current() -> Result<Self> {
        Ok(Self::new(Handle::try_current()?))
    }

    /// Schedule `on_fire(id)` to run once after `delay`.
    ///
    /// Re-arming the same id and kind replaces the pending timer.
    pub fn arm<F>(&self, id: ToastId, kind: TimerKind, delay: Duration, on_fire: F)
    where
        F: FnOnce(ToastId) + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);
        let key = (id, kind);
        let task_key = key.clone();

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            // Drop our own entry before firing so the callback may re-arm
            timers.remove_if(&task_key, |_, armed| armed.generation == generation);

            let (id, kind) = task_key;
            tracing::trace!(toast_id = %id, timer = kind.as_str(), "Timer fired");
            on_fire(id);
        });

        tracing::trace!(
            toast_id = %key.0,
            timer = kind.as_str(),
            delay_ms = delay.as_millis() as u64,
            "Timer armed"
        );

        let armed = ArmedTimer {
            generation,
            handle: task.abort_handle(),
        };
        if let Some(previous) = self.timers.insert(key, armed) {
            previous.handle.abort();
        }
    }

    /// Cancel a pending timer. Returns true if one was pending.
    pub fn disarm(&self, id: &ToastId, kind: TimerKind) -> bool {
        match self.timers.remove(&(id.clone(), kind)) {
            Some((_, armed)) => {
                armed.handle.abort();
                tracing::trace!(toast_id = %id, timer = kind.as_str(), "Timer disarmed");
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer of a toast
    pub fn disarm_all(&self, id: &ToastId) {
        for kind in TimerKind::ALL {
            self.disarm(id, kind);
        }
    }

    pub fn is_armed(&self, id: &ToastId, kind: TimerKind) -> bool {
        self.timers.contains_key(&(id.clone(), kind))
    }

    /// Number of timers still pending
    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for entry in self.timers.iter() {
            entry.value().handle.abort();
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("armed", &self.timers.len())
            .finish()
    }
}
