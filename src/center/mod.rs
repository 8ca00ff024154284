//! Toast center: the public entry point of the engine.
//!
//! A `ToastCenter` owns the toast collection, the lifecycle timers and a handle
//! to the theme. It is created once at the composition root and cloned into
//! whatever needs to raise or read toasts.
//!
//! # Lifecycle
//!
//! 1. `notify` appends the toast in the `Entering` phase and arms a settle timer
//!    and, for finite durations, an expiry timer
//! 2. the settle timer moves it to `Visible`
//! 3. expiry or `dismiss` moves it to `Exiting` and arms the exit timer
//! 4. the exit timer purges it from the collection
//!
//! Every removal goes through the exit phase, whether it was requested by the
//! user or by the expiry timer.
//!
//! # Example
//!
//! ```rust,ignore
//! let center = ToastCenter::from_settings(&settings)?;
//! let id = center.notify(ToastInput::loading("Pushing products").persistent());
//! // ...
//! center.patch(&id, ToastPatch::new().variant(Variant::Success).title("Pushed").duration_ms(3000));
//! ```

mod types;

use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tokio_stream::wrappers::WatchStream;

use crate::config::{EngineConfig, Settings};
use crate::error::{Result, ToastError};
use crate::metrics::{ExitCause, ToastMetrics};
use crate::notification::{Position, Toast, ToastId, ToastInput, ToastPatch};
use crate::router::{Layout, Phase};
use crate::scheduler::{Scheduler, TimerKind};
use crate::store::{reduce, Transition};
use crate::theme::{render, RenderedGroup, ThemeOverride, ThemeRegistry};

pub use types::{ToastEvent, ToastSnapshot};

struct Inner {
    config: EngineConfig,
    state: watch::Sender<ToastSnapshot>,
    events: broadcast::Sender<ToastEvent>,
    scheduler: Scheduler,
    theme: ThemeRegistry,
    /// Creation instants, used to re-arm expiry relative to creation
    born: DashMap<ToastId, Instant>,
}

/// Cloneable handle to a toast collection and its timers
#[derive(Clone)]
pub struct ToastCenter {
    inner: Arc<Inner>,
}

impl ToastCenter {
    /// Create a center bound to the tokio runtime of the calling context
    pub fn new(config: EngineConfig, theme: ThemeRegistry) -> Result<Self> {
        Ok(Self::with_runtime(config, theme, Handle::try_current()?))
    }

    /// Create a center with default engine settings and the built-in theme
    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default(), ThemeRegistry::default())
    }

    /// Create a center from loaded settings, applying the configured theme
    /// overrides before anything is rendered
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let theme = ThemeRegistry::default();
        if !settings.theme.is_empty() {
            theme.configure(settings.theme.clone());
        }
        Self::new(settings.engine.clone(), theme)
    }

    pub fn with_runtime(config: EngineConfig, theme: ThemeRegistry, runtime: Handle) -> Self {
        let (state, _) = watch::channel(ToastSnapshot::default());
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        tracing::info!(
            default_duration_ms = config.default_duration_ms,
            settle_delay_ms = config.settle_delay_ms,
            exit_delay_ms = config.exit_delay_ms,
            max_visible = ?config.max_visible,
            "Toast center initialized"
        );

        Self {
            inner: Arc::new(Inner {
                config,
                state,
                events,
                scheduler: Scheduler::new(runtime),
                theme,
                born: DashMap::new(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Enqueue a toast and return its id.
    ///
    /// Unset fields take their defaults (`duration` from the engine config,
    /// `dismissible = true`). Negative durations clamp to zero.
    pub fn notify(&self, input: ToastInput) -> ToastId {
        if input.duration.is_negative() {
            tracing::warn!(
                duration = ?input.duration,
                title = %input.title,
                "Negative toast duration clamped to zero"
            );
        }

        let id = ToastId::generate();
        let toast = input.into_toast(id.clone(), self.inner.config.default_duration());
        let duration = toast.duration;
        let position = toast.position;
        let variant = toast.variant.clone();

        self.inner.born.insert(id.clone(), Instant::now());
        self.inner.state.send_modify(|snapshot| {
            apply(snapshot, Transition::Add(toast));
            snapshot.phases.insert(id.clone(), Phase::Entering);
            snapshot.revision += 1;
        });

        ToastMetrics::record_created(&variant);
        tracing::debug!(
            toast_id = %id,
            variant = %variant,
            position = position.as_str(),
            duration_ms = ?duration.map(|d| d.as_millis() as u64),
            "Toast added"
        );
        self.emit(ToastEvent::Added(id.clone()));

        self.arm(&id, TimerKind::Settle, self.inner.config.settle_delay());
        if let Some(duration) = duration {
            self.arm(&id, TimerKind::Expire, duration);
        }
        self.enforce_max_visible(position);

        id
    }

    /// Request removal: starts the exit animation, the toast is purged once it
    /// completes. Unknown ids and toasts already exiting are left alone.
    pub fn dismiss(&self, id: &ToastId) {
        if !self.begin_exit(id, ExitCause::Dismissed) {
            tracing::trace!(toast_id = %id, "Dismiss ignored");
        }
    }

    /// Dismiss every toast that is not already exiting
    pub fn dismiss_all(&self) {
        let ids: Vec<ToastId> = self.inner.state.borrow().state.ids().cloned().collect();
        for id in ids {
            self.begin_exit(&id, ExitCause::Dismissed);
        }
    }

    /// Shallow-merge `patch` into a toast; unknown ids are a no-op.
    ///
    /// Changing `duration` re-arms expiry relative to the toast's creation
    /// time; clearing it makes the toast persistent.
    pub fn patch(&self, id: &ToastId, patch: ToastPatch) {
        if patch.is_empty() {
            return;
        }

        let duration_change = patch.duration;
        let position_change = patch.position;
        let transition = Transition::Update {
            id: id.clone(),
            patch,
        };

        let updated = self.inner.state.send_if_modified(|snapshot| {
            if !snapshot.state.contains(id) {
                return false;
            }
            apply(snapshot, transition);
            snapshot.revision += 1;
            true
        });

        if !updated {
            tracing::trace!(toast_id = %id, "Patch ignored, toast not found");
            return;
        }

        tracing::debug!(toast_id = %id, "Toast updated");
        self.emit(ToastEvent::Updated(id.clone()));

        if let Some(duration) = duration_change {
            self.rearm_expiry(id, duration);
        }
        if let Some(position) = position_change {
            self.enforce_max_visible(position);
        }
    }

    /// Run the trigger of an inline action
    pub fn trigger_action(&self, id: &ToastId, index: usize) -> Result<()> {
        // Clone out of the snapshot so the trigger may re-enter the center
        let action = {
            let snapshot = self.inner.state.borrow();
            let toast = snapshot
                .get(id)
                .ok_or_else(|| ToastError::NotFound(id.clone()))?;
            toast
                .action
                .get(index)
                .filter(|action| action.enabled)
                .cloned()
                .ok_or_else(|| ToastError::ActionUnavailable {
                    id: id.clone(),
                    index,
                })?
        };

        tracing::debug!(toast_id = %id, action = %action.label, "Toast action triggered");
        if let Some(trigger) = action.trigger {
            trigger(id);
        }
        Ok(())
    }

    /// Merge theme overrides; takes effect from the next render
    pub fn configure_theme(&self, patch: ThemeOverride) {
        self.inner.theme.configure(patch);
        self.inner.state.send_modify(|snapshot| snapshot.revision += 1);
        self.emit(ToastEvent::ThemeChanged);
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<ToastSnapshot> {
        self.inner.state.subscribe()
    }

    /// Snapshots as a stream, starting with the current one
    pub fn stream(&self) -> WatchStream<ToastSnapshot> {
        WatchStream::new(self.subscribe())
    }

    /// Lifecycle events from now on
    pub fn events(&self) -> broadcast::Receiver<ToastEvent> {
        self.inner.events.subscribe()
    }

    pub fn snapshot(&self) -> ToastSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Active toasts in insertion order
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.state.borrow().state.toasts.clone()
    }

    pub fn get(&self, id: &ToastId) -> Option<Toast> {
        self.inner.state.borrow().get(id).cloned()
    }

    pub fn phase(&self, id: &ToastId) -> Option<Phase> {
        self.inner.state.borrow().phase(id)
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().state.is_empty()
    }

    /// Active toasts grouped by position
    pub fn layout(&self) -> Layout {
        self.inner.state.borrow().layout()
    }

    /// Layout resolved against the current theme
    pub fn render(&self) -> Vec<RenderedGroup> {
        let layout = self.layout();
        self.inner.theme.read(|theme| render(&layout, theme))
    }

    pub fn theme(&self) -> &ThemeRegistry {
        &self.inner.theme
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    fn arm(&self, id: &ToastId, kind: TimerKind, delay: Duration) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        self.inner.scheduler.arm(id.clone(), kind, delay, move |id| {
            if let Some(inner) = weak.upgrade() {
                ToastCenter { inner }.on_timer(kind, &id);
            }
        });
    }

    fn on_timer(&self, kind: TimerKind, id: &ToastId) {
        match kind {
            TimerKind::Settle => self.settle(id),
            TimerKind::Expire => {
                self.begin_exit(id, ExitCause::Expired);
            }
            TimerKind::Exit => self.purge(id),
        }
    }

    fn settle(&self, id: &ToastId) {
        let settled = self.inner.state.send_if_modified(|snapshot| {
            match snapshot.phases.get_mut(id) {
                Some(phase @ Phase::Entering) => {
                    *phase = Phase::Visible;
                    snapshot.revision += 1;
                    true
                }
                _ => false,
            }
        });

        if settled {
            self.emit(ToastEvent::Settled(id.clone()));
        }
    }

    /// Move a toast into the exit phase. Returns false if it is unknown or
    /// already exiting.
    fn begin_exit(&self, id: &ToastId, cause: ExitCause) -> bool {
        let started = self.inner.state.send_if_modified(|snapshot| {
            if !snapshot.state.contains(id) {
                return false;
            }
            match snapshot.phases.get(id) {
                Some(Phase::Exiting) => false,
                _ => {
                    snapshot.phases.insert(id.clone(), Phase::Exiting);
                    snapshot.revision += 1;
                    true
                }
            }
        });

        if !started {
            return false;
        }

        self.inner.scheduler.disarm(id, TimerKind::Settle);
        self.inner.scheduler.disarm(id, TimerKind::Expire);
        self.arm(id, TimerKind::Exit, self.inner.config.exit_delay());

        ToastMetrics::record_exit(cause);
        tracing::debug!(toast_id = %id, cause = cause.as_str(), "Toast exit started");
        self.emit(ToastEvent::ExitStarted {
            id: id.clone(),
            cause,
        });
        true
    }

    fn purge(&self, id: &ToastId) {
        let removed = self.inner.state.send_if_modified(|snapshot| {
            if !snapshot.state.contains(id) {
                return false;
            }
            apply(snapshot, Transition::Remove(id.clone()));
            snapshot.phases.remove(id);
            snapshot.revision += 1;
            true
        });

        if !removed {
            return;
        }

        self.inner.scheduler.disarm_all(id);
        self.inner.born.remove(id);

        ToastMetrics::record_removed();
        tracing::debug!(toast_id = %id, "Toast removed");
        self.emit(ToastEvent::Removed(id.clone()));
    }

    fn rearm_expiry(&self, id: &ToastId, duration: Option<Duration>) {
        if self.phase(id).is_some_and(|phase| phase.is_exiting()) {
            return;
        }

        match duration {
            None => {
                self.inner.scheduler.disarm(id, TimerKind::Expire);
                tracing::debug!(toast_id = %id, "Toast made persistent");
            }
            Some(duration) => {
                let age = self
                    .inner
                    .born
                    .get(id)
                    .map(|born| born.elapsed())
                    .unwrap_or_default();
                let remaining = duration.saturating_sub(age);
                self.arm(id, TimerKind::Expire, remaining);
                tracing::debug!(
                    toast_id = %id,
                    remaining_ms = remaining.as_millis() as u64,
                    "Toast expiry re-armed"
                );
            }
        }
    }

    /// Push the oldest toasts at `position` into the exit phase while more
    /// than `max_visible` of them are not exiting
    fn enforce_max_visible(&self, position: Position) {
        let Some(max) = self.inner.config.max_visible else {
            return;
        };

        let overflow: Vec<ToastId> = {
            let snapshot = self.inner.state.borrow();
            let live: Vec<&ToastId> = snapshot
                .toasts()
                .iter()
                .filter(|t| t.position == position)
                .filter(|t| !snapshot.phase(&t.id).is_some_and(|p| p.is_exiting()))
                .map(|t| &t.id)
                .collect();
            let excess = live.len().saturating_sub(max);
            live.into_iter().take(excess).cloned().collect()
        };

        for id in overflow {
            self.begin_exit(&id, ExitCause::Overflow);
        }
    }

    fn emit(&self, event: ToastEvent) {
        tracing::trace!(toast_id = ?event.id(), event = ?event, "Toast event");
        // No receivers is fine
        let _ = self.inner.events.send(event);
    }
}

fn apply(snapshot: &mut ToastSnapshot, transition: Transition) {
    tracing::trace!(transition = transition.kind(), "Applying transition");
    snapshot.state = reduce(&snapshot.state, transition);
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Pending exit timers die with the scheduler, so release what is left
        let remaining = self.state.borrow().state.len();
        if remaining > 0 {
            ToastMetrics::record_released(remaining);
            tracing::debug!(remaining, "Toast center dropped with live toasts");
        }
    }
}

impl std::fmt::Debug for ToastCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastCenter")
            .field("toasts", &self.len())
            .field("scheduler", &self.inner.scheduler)
            .field("config", &self.inner.config)
            .finish()
    }
}
