//! Toast theme configuration.
//!
//! A [`Theme`] maps the toast surface to opaque style identifiers: a base style
//! for the card, one style per section (title, description, action, dismiss
//! control) and a per-variant table of icon and section extras. Style strings
//! are never validated; they pass straight through to the render output.
//!
//! The theme is shared through a [`ThemeRegistry`] handle created at the
//! composition root. [`ThemeRegistry::configure`] merges a partial
//! [`ThemeOverride`]: omitted fields keep their current value, sections merge
//! field by field and variants merge per variant, so overriding `info` never
//! touches `success`.

mod render;

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::notification::Variant;

pub use render::{render, RenderedAction, RenderedDismiss, RenderedGroup, RenderedToast};

/// Base style plus an extra class appended after it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStyle {
    pub base: String,
    #[serde(default)]
    pub class_name: String,
}

impl SectionStyle {
    fn new(base: &str) -> Self {
        Self {
            base: base.to_string(),
            class_name: String::new(),
        }
    }

    fn merge(&mut self, patch: SectionOverride) {
        if let Some(base) = patch.base {
            self.base = base;
        }
        if let Some(class_name) = patch.class_name {
            self.class_name = class_name;
        }
    }
}

/// Icon and per-section extras for one variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantStyle {
    /// Icon identifier; `None` renders no icon
    pub icon: Option<String>,
    #[serde(default)]
    pub icon_class: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub action: String,
}

impl VariantStyle {
    fn icon(icon: &str, icon_class: &str) -> Self {
        Self {
            icon: Some(icon.to_string()),
            icon_class: icon_class.to_string(),
            ..Default::default()
        }
    }

    fn merge(&mut self, patch: VariantOverride) {
        if let Some(icon) = patch.icon {
            self.icon = Some(icon);
        }
        if let Some(icon_class) = patch.icon_class {
            self.icon_class = icon_class;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(action) = patch.action {
            self.action = action;
        }
    }
}

/// Complete theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub base: String,
    pub class_name: String,
    pub title: SectionStyle,
    pub description: SectionStyle,
    pub action: SectionStyle,
    pub dismissible: SectionStyle,
    /// Keyed by variant name; custom variants live here too
    pub variants: BTreeMap<String, VariantStyle>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut variants = BTreeMap::new();
        variants.insert(
            "success".to_string(),
            VariantStyle::icon("circle-check-filled", "w-5 h-5 flex-shrink-0 mr-3 text-green-500"),
        );
        variants.insert(
            "error".to_string(),
            VariantStyle::icon("circle-x-filled", "w-5 h-5 flex-shrink-0 mr-3 text-red-500"),
        );
        variants.insert(
            "warning".to_string(),
            VariantStyle::icon("alert-triangle-filled", "w-5 h-5 flex-shrink-0 mr-3 text-yellow-500"),
        );
        variants.insert(
            "info".to_string(),
            VariantStyle::icon("info-circle-filled", "w-5 h-5 flex-shrink-0 mr-3 text-blue-500"),
        );
        variants.insert(
            "loading".to_string(),
            VariantStyle::icon(
                "spinner",
                "w-5 h-5 flex-shrink-0 mr-3 text-onSurface animate-spin rounded-full border-2 border-current border-t-transparent",
            ),
        );

        Self {
            base: "shadow-md max-w-sm w-full p-4 rounded-lg bg-surfaceContainerHighest text-onSurface"
                .to_string(),
            class_name: String::new(),
            title: SectionStyle::new("text-onSurface label-medium-bold"),
            description: SectionStyle::new("text-onSurfaceVariant label-small mt-1"),
            action: SectionStyle::new(
                "label-medium-bold text-primary hover:text-primary/80 focus:outline-none cursor-pointer mr-2",
            ),
            dismissible: SectionStyle::new(
                "hover:opacity-80 focus:outline-none transition-colors cursor-pointer",
            ),
            variants,
        }
    }
}

impl Theme {
    /// Merge a partial override into this theme
    pub fn merge(&mut self, patch: ThemeOverride) {
        if let Some(base) = patch.base {
            self.base = base;
        }
        if let Some(class_name) = patch.class_name {
            self.class_name = class_name;
        }
        if let Some(title) = patch.title {
            self.title.merge(title);
        }
        if let Some(description) = patch.description {
            self.description.merge(description);
        }
        if let Some(action) = patch.action {
            self.action.merge(action);
        }
        if let Some(dismissible) = patch.dismissible {
            self.dismissible.merge(dismissible);
        }
        for (name, variant) in patch.variants {
            self.variants.entry(name).or_default().merge(variant);
        }
    }

    /// Style for `variant`, falling back to a case-insensitive name match
    pub fn variant_style(&self, variant: &Variant) -> Option<&VariantStyle> {
        let name = variant.as_str();
        self.variants.get(name).or_else(|| {
            self.variants
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, style)| style)
        })
    }
}

/// Partial section override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOverride {
    pub base: Option<String>,
    #[serde(alias = "classname")]
    pub class_name: Option<String>,
}

impl SectionOverride {
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

/// Partial variant override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOverride {
    pub icon: Option<String>,
    #[serde(alias = "iconclass")]
    pub icon_class: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub action: Option<String>,
}

impl VariantOverride {
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn icon_class(mut self, icon_class: impl Into<String>) -> Self {
        self.icon_class = Some(icon_class.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Partial theme, as accepted by [`ThemeRegistry::configure`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeOverride {
    pub base: Option<String>,
    // Keys loaded through `config` arrive lowercased
    #[serde(alias = "classname")]
    pub class_name: Option<String>,
    pub title: Option<SectionOverride>,
    pub description: Option<SectionOverride>,
    pub action: Option<SectionOverride>,
    pub dismissible: Option<SectionOverride>,
    pub variants: BTreeMap<String, VariantOverride>,
}

impl ThemeOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn title(mut self, title: SectionOverride) -> Self {
        self.title = Some(title);
        self
    }

    pub fn description(mut self, description: SectionOverride) -> Self {
        self.description = Some(description);
        self
    }

    pub fn action(mut self, action: SectionOverride) -> Self {
        self.action = Some(action);
        self
    }

    pub fn dismissible(mut self, dismissible: SectionOverride) -> Self {
        self.dismissible = Some(dismissible);
        self
    }

    pub fn variant(mut self, variant: &Variant, style: VariantOverride) -> Self {
        self.variants.insert(variant.as_str().to_string(), style);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Shared handle to the active theme.
///
/// Cloning the handle shares the same theme. Readers take a snapshot per draw,
/// so a `configure` call affects everything rendered afterwards.
#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    inner: Arc<RwLock<Theme>>,
}

impl ThemeRegistry {
    pub fn new(theme: Theme) -> Self {
        Self {
            inner: Arc::new(RwLock::new(theme)),
        }
    }

    /// Merge overrides into the shared theme
    pub fn configure(&self, patch: ThemeOverride) {
        let variants: Vec<String> = patch.variants.keys().cloned().collect();
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(patch);

        tracing::debug!(variants = ?variants, "Theme configured");
    }

    /// Copy of the current theme
    pub fn snapshot(&self) -> Theme {
        self.read(Theme::clone)
    }

    /// Run `f` against the current theme without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&Theme) -> R) -> R {
        let theme = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_has_builtin_variants() {
        let theme = Theme::default();
        for variant in Variant::BUILT_IN {
            let style = theme.variant_style(&variant).unwrap();
            assert!(style.icon.is_some(), "{variant} should have an icon");
        }
    }

    #[test]
    fn test_override_single_variant_icon() {
        let registry = ThemeRegistry::default();
        let before = registry.snapshot();

        registry.configure(
            ThemeOverride::new().variant(&Variant::Info, VariantOverride::default().icon("X")),
        );
        let after = registry.snapshot();

        let info = after.variant_style(&Variant::Info).unwrap();
        assert_eq!(info.icon.as_deref(), Some("X"));
        assert_eq!(info.icon_class, before.variants["info"].icon_class);
        for variant in [Variant::Success, Variant::Error, Variant::Warning, Variant::Loading] {
            assert_eq!(after.variant_style(&variant), before.variant_style(&variant));
        }
        assert_eq!(after.base, before.base);
        assert_eq!(after.title, before.title);
    }

    #[test]
    fn test_section_merge_keeps_unset_fields() {
        let mut theme = Theme::default();
        let base_before = theme.title.base.clone();

        theme.merge(ThemeOverride::new().title(SectionOverride::default().class_name("text-lg")));

        assert_eq!(theme.title.base, base_before);
        assert_eq!(theme.title.class_name, "text-lg");
    }

    #[test]
    fn test_unknown_variant_is_added() {
        let mut theme = Theme::default();
        theme.merge(ThemeOverride::new().variant(
            &Variant::Custom("promo".to_string()),
            VariantOverride::default().icon("gift").title("text-pink-500"),
        ));

        let promo = theme.variant_style(&Variant::parse("promo")).unwrap();
        assert_eq!(promo.icon.as_deref(), Some("gift"));
        assert_eq!(promo.title, "text-pink-500");
        assert_eq!(promo.description, "");
    }

    #[test]
    fn test_variant_lookup_ignores_case() {
        let mut theme = Theme::default();
        theme.merge(ThemeOverride::new().variant(
            &Variant::Custom("mypromo".to_string()),
            VariantOverride::default().icon("gift"),
        ));

        let promo = theme.variant_style(&Variant::parse("myPromo")).unwrap();
        assert_eq!(promo.icon.as_deref(), Some("gift"));
        assert!(theme.variant_style(&Variant::parse("other")).is_none());
    }

    #[test]
    fn test_empty_override_is_noop() {
        let mut theme = Theme::default();
        theme.merge(ThemeOverride::new());
        assert_eq!(theme, Theme::default());
        assert!(ThemeOverride::new().is_empty());
    }

    #[test]
    fn test_registry_clones_share_theme() {
        let registry = ThemeRegistry::default();
        let other = registry.clone();

        other.configure(ThemeOverride::new().base("card"));
        assert_eq!(registry.read(|t| t.base.clone()), "card");
    }

    #[test]
    fn test_override_from_json() {
        let patch: ThemeOverride = serde_json::from_str(
            r#"{"className":"shadow-xl","dismissible":{"base":"opacity-50"},"variants":{"error":{"action":"text-red-700"}}}"#,
        )
        .unwrap();

        let mut theme = Theme::default();
        theme.merge(patch);

        assert_eq!(theme.class_name, "shadow-xl");
        assert_eq!(theme.dismissible.base, "opacity-50");
        assert_eq!(theme.variants["error"].action, "text-red-700");
        assert_eq!(theme.variants["error"].icon.as_deref(), Some("circle-x-filled"));
    }
}
