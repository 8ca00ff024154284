//! Presentation routing: groups active toasts by screen position and
//! classifies each one for enter/exit animation.
//!
//! Routing is a pure read of the current state; nothing here mutates the
//! collection.

use std::collections::HashMap;

use serde::Serialize;

use crate::notification::{Position, Toast, ToastId};
use crate::store::ToastState;

/// Classes shared by every position container
pub const CONTAINER_CLASS: &str = "fixed z-90 flex flex-col space-y-2";

/// Transition classes applied to every toast card
pub const TRANSITION_CLASS: &str = "transition-all duration-300 ease-in-out";

/// Animation phase of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Just inserted, still off-screen so the enter animation can engage
    #[default]
    Entering,
    /// Settled and fully shown
    Visible,
    /// Removal requested, animating out until purged
    Exiting,
}

impl Phase {
    pub fn is_exiting(&self) -> bool {
        matches!(self, Phase::Exiting)
    }
}

/// Per-toast phase bookkeeping kept next to the collection
pub type PhaseMap = HashMap<ToastId, Phase>;

/// Edge a toast slides in from and back out to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideFrom {
    Top,
    Bottom,
    Left,
    Right,
}

impl SlideFrom {
    pub fn for_position(position: Position) -> Self {
        match position {
            Position::Top => SlideFrom::Top,
            Position::Bottom => SlideFrom::Bottom,
            Position::TopLeft | Position::BottomLeft => SlideFrom::Left,
            Position::TopRight | Position::BottomRight => SlideFrom::Right,
        }
    }

    /// Resting transform once the toast is shown
    pub fn enter_class(&self) -> &'static str {
        match self {
            SlideFrom::Top | SlideFrom::Bottom => "translate-y-0 opacity-100",
            SlideFrom::Left | SlideFrom::Right => "translate-x-0 opacity-100",
        }
    }

    /// Off-screen transform before entering and while exiting
    pub fn exit_class(&self) -> &'static str {
        match self {
            SlideFrom::Top => "-translate-y-full opacity-0",
            SlideFrom::Bottom => "translate-y-full opacity-0",
            SlideFrom::Left => "-translate-x-full opacity-0",
            SlideFrom::Right => "translate-x-full opacity-0",
        }
    }
}

/// Anchor classes for a position container
pub fn anchor_class(position: Position) -> &'static str {
    match position {
        Position::Top => "top-4 left-1/2 -translate-x-1/2",
        Position::Bottom => "bottom-4 left-1/2 -translate-x-1/2",
        Position::TopLeft => "top-4 left-4",
        Position::TopRight => "top-4 right-4",
        Position::BottomLeft => "bottom-4 left-4",
        Position::BottomRight => "bottom-4 right-4",
    }
}

/// A toast together with its derived presentation state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedToast {
    pub toast: Toast,
    pub phase: Phase,
    pub slide_from: SlideFrom,
}

impl RoutedToast {
    /// Transform classes for the current phase
    pub fn motion_class(&self) -> &'static str {
        match self.phase {
            Phase::Visible => self.slide_from.enter_class(),
            Phase::Entering | Phase::Exiting => self.slide_from.exit_class(),
        }
    }
}

/// Toasts anchored at one position, in insertion order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionGroup {
    pub position: Position,
    pub toasts: Vec<RoutedToast>,
}

impl PositionGroup {
    pub fn anchor_class(&self) -> &'static str {
        anchor_class(self.position)
    }
}

/// Non-empty position groups, ordered as [`Position::ALL`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub groups: Vec<PositionGroup>,
}

impl Layout {
    pub fn group(&self, position: Position) -> Option<&PositionGroup> {
        self.groups.iter().find(|g| g.position == position)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of routed toasts across groups
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.toasts.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoutedToast> {
        self.groups.iter().flat_map(|g| g.toasts.iter())
    }
}

/// Group the collection by position and attach phase and slide direction.
///
/// Toasts without a phase entry are treated as entering.
pub fn route(state: &ToastState, phases: &PhaseMap) -> Layout {
    let mut buckets: HashMap<Position, Vec<RoutedToast>> = HashMap::new();

    for toast in &state.toasts {
        let phase = phases.get(&toast.id).copied().unwrap_or_default();
        buckets.entry(toast.position).or_default().push(RoutedToast {
            toast: toast.clone(),
            phase,
            slide_from: SlideFrom::for_position(toast.position),
        });
    }

    let groups = Position::ALL
        .iter()
        .filter_map(|position| {
            buckets.remove(position).map(|toasts| PositionGroup {
                position: *position,
                toasts,
            })
        })
        .collect();

    Layout { groups }
}
