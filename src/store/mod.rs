//! Toast collection state and its transitions.
//!
//! The collection only changes through [`reduce`], which maps the current
//! state and a [`Transition`] to the next state without side effects.

use serde::Serialize;

use crate::notification::{Toast, ToastId, ToastPatch};

/// Ordered collection of active toasts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
}

/// State transition applied by [`reduce`]
#[derive(Debug, Clone)]
pub enum Transition {
    /// Append a record to the end of the collection
    Add(Toast),
    /// Drop every record with this id
    Remove(ToastId),
    /// Shallow-merge a patch into the matching record
    Update { id: ToastId, patch: ToastPatch },
}

impl Transition {
    pub fn kind(&self) -> &'static str {
        match self {
            Transition::Add(_) => "add",
            Transition::Remove(_) => "remove",
            Transition::Update { .. } => "update",
        }
    }
}

impl ToastState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &ToastId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ToastId> {
        self.toasts.iter().map(|t| &t.id)
    }
}

/// Compute the next state.
///
/// Unknown ids make `Remove` and `Update` no-ops. `Add` performs no
/// uniqueness check; callers must not pass duplicate ids.
pub fn reduce(state: &ToastState, transition: Transition) -> ToastState {
    match transition {
        Transition::Add(toast) => {
            let mut toasts = Vec::with_capacity(state.toasts.len() + 1);
            toasts.extend(state.toasts.iter().cloned());
            toasts.push(toast);
            ToastState { toasts }
        }
        Transition::Remove(id) => ToastState {
            toasts: state
                .toasts
                .iter()
                .filter(|t| t.id != id)
                .cloned()
                .collect(),
        },
        Transition::Update { id, patch } => ToastState {
            toasts: state
                .toasts
                .iter()
                .map(|t| if t.id == id { merge(t, &patch) } else { t.clone() })
                .collect(),
        },
    }
}

fn merge(toast: &Toast, patch: &ToastPatch) -> Toast {
    let mut merged = toast.clone();

    if let Some(variant) = &patch.variant {
        merged.variant = variant.clone();
    }
    if let Some(title) = &patch.title {
        merged.title = title.clone();
    }
    if let Some(description) = &patch.description {
        merged.description = description.clone();
    }
    if let Some(duration) = patch.duration {
        merged.duration = duration;
    }
    if let Some(dismissible) = patch.dismissible {
        merged.dismissible = dismissible;
    }
    if let Some(action) = &patch.action {
        merged.action = action.clone();
    }
    if let Some(position) = patch.position {
        merged.position = position;
    }

    merged
}
