use serde::Serialize;

use crate::metrics::ExitCause;
use crate::notification::{Toast, ToastId};
use crate::router::{route, Layout, Phase, PhaseMap};
use crate::store::ToastState;

/// Published state of a `ToastCenter`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToastSnapshot {
    pub state: ToastState,
    pub phases: PhaseMap,
    /// Bumped on every transition, phase change or theme change
    pub revision: u64,
}

impl ToastSnapshot {
    pub fn toasts(&self) -> &[Toast] {
        &self.state.toasts
    }

    pub fn get(&self, id: &ToastId) -> Option<&Toast> {
        self.state.get(id)
    }

    pub fn phase(&self, id: &ToastId) -> Option<Phase> {
        self.phases.get(id).copied()
    }

    /// Group by position with phase and slide direction
    pub fn layout(&self) -> Layout {
        route(&self.state, &self.phases)
    }
}

/// One lifecycle step, broadcast to `ToastCenter::events` subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEvent {
    Added(ToastId),
    Updated(ToastId),
    Settled(ToastId),
    ExitStarted { id: ToastId, cause: ExitCause },
    Removed(ToastId),
    ThemeChanged,
}

impl ToastEvent {
    pub fn id(&self) -> Option<&ToastId> {
        match self {
            ToastEvent::Added(id)
            | ToastEvent::Updated(id)
            | ToastEvent::Settled(id)
            | ToastEvent::Removed(id) => Some(id),
            ToastEvent::ExitStarted { id, .. } => Some(id),
            ToastEvent::ThemeChanged => None,
        }
    }
}
