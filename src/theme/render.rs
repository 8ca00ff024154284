//! Resolve routed toasts against a theme into ready-to-draw style classes.

use serde::Serialize;

use super::Theme;
use crate::notification::{Position, ToastId};
use crate::router::{Layout, Phase, RoutedToast, CONTAINER_CLASS, TRANSITION_CLASS};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedAction {
    pub index: usize,
    pub label: String,
    pub enabled: bool,
    pub class: String,
}

/// Manual close control
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDismiss {
    pub class: String,
    pub aria_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedToast {
    pub id: ToastId,
    pub phase: Phase,
    pub class: String,
    pub icon: Option<String>,
    pub icon_class: String,
    pub title: String,
    pub title_class: String,
    pub description: Option<String>,
    pub description_class: String,
    pub actions: Vec<RenderedAction>,
    pub dismiss: Option<RenderedDismiss>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedGroup {
    pub position: Position,
    pub class: String,
    pub toasts: Vec<RenderedToast>,
}

/// Join non-empty class fragments with single spaces
fn cn(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve every group of a layout against `theme`
pub fn render(layout: &Layout, theme: &Theme) -> Vec<RenderedGroup> {
    layout
        .groups
        .iter()
        .map(|group| RenderedGroup {
            position: group.position,
            class: cn(&[CONTAINER_CLASS, group.anchor_class()]),
            toasts: group.toasts.iter().map(|t| render_toast(t, theme)).collect(),
        })
        .collect()
}

fn render_toast(routed: &RoutedToast, theme: &Theme) -> RenderedToast {
    let toast = &routed.toast;
    let variant = theme.variant_style(&toast.variant);
    let variant_title = variant.map_or("", |v| v.title.as_str());
    let variant_description = variant.map_or("", |v| v.description.as_str());
    let variant_action = variant.map_or("", |v| v.action.as_str());

    let actions = toast
        .action
        .iter()
        .enumerate()
        .map(|(index, action)| RenderedAction {
            index,
            label: action.label.clone(),
            enabled: action.enabled,
            class: cn(&[
                theme.action.base.as_str(),
                theme.action.class_name.as_str(),
                variant_action,
                action.class_name.as_deref().unwrap_or(""),
            ]),
        })
        .collect();

    let dismiss = toast.dismissible.then(|| RenderedDismiss {
        class: cn(&[theme.dismissible.base.as_str(), theme.dismissible.class_name.as_str()]),
        aria_label: "Close",
    });

    RenderedToast {
        id: toast.id.clone(),
        phase: routed.phase,
        class: cn(&[
            theme.base.as_str(),
            TRANSITION_CLASS,
            routed.motion_class(),
            theme.class_name.as_str(),
        ]),
        icon: variant.and_then(|v| v.icon.clone()),
        icon_class: variant.map(|v| v.icon_class.clone()).unwrap_or_default(),
        title: toast.title.clone(),
        title_class: cn(&[theme.title.base.as_str(), theme.title.class_name.as_str(), variant_title]),
        description: toast.description.clone(),
        description_class: cn(&[
            theme.description.base.as_str(),
            theme.description.class_name.as_str(),
            variant_description,
        ]),
        actions,
        dismiss,
    }
}
