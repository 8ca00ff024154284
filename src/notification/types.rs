use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque toast identifier.
///
/// Generated ids combine a random component, the creation time in epoch
/// milliseconds and a process-wide sequence number, so an id is never handed
/// out twice while the process runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(String);

impl ToastId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        static SEQUENCE: AtomicU64 = AtomicU64::new(0);

        let random: u64 = rand::rng().random();
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);

        Self(format!(
            "{}-{}-{}",
            to_base36(random),
            to_base36(millis),
            to_base36(sequence)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToastId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ToastId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::with_capacity(13);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

/// Semantic category of a toast, drives the default icon and styling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    Success,
    Error,
    Warning,
    /// Informational message (default)
    #[default]
    Info,
    Loading,
    /// Caller-defined tag, looked up in the theme by name
    Custom(String),
}

impl Variant {
    /// Built-in variants, in theme declaration order
    pub const BUILT_IN: [Variant; 5] = [
        Variant::Success,
        Variant::Error,
        Variant::Warning,
        Variant::Info,
        Variant::Loading,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Variant::Success => "success",
            Variant::Error => "error",
            Variant::Warning => "warning",
            Variant::Info => "info",
            Variant::Loading => "loading",
            Variant::Custom(tag) => tag,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "success" => Variant::Success,
            "error" => Variant::Error,
            "warning" => Variant::Warning,
            "info" => Variant::Info,
            "loading" => Variant::Loading,
            other => Variant::Custom(other.to_string()),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Variant::Custom(_))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::parse(value)
    }
}

impl Serialize for Variant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Variant::parse(&value))
    }
}

/// Screen anchor a toast is grouped and animated within
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    /// Bottom-right corner (default)
    #[default]
    BottomRight,
}

impl Position {
    /// All positions, in rendering order
    pub const ALL: [Position; 6] = [
        Position::Top,
        Position::Bottom,
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Bottom => "bottom",
            Position::TopLeft => "topLeft",
            Position::TopRight => "topRight",
            Position::BottomLeft => "bottomLeft",
            Position::BottomRight => "bottomRight",
        }
    }
}

/// Callback run when an inline action control is activated
pub type ActionTrigger = Arc<dyn Fn(&ToastId) + Send + Sync>;

/// Inline control rendered inside a toast
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastAction {
    pub label: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Extra style identifier appended after the theme's action styles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip)]
    pub trigger: Option<ActionTrigger>,
}

impl ToastAction {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            class_name: None,
            trigger: None,
        }
    }

    /// Set the callback invoked when the action is activated
    pub fn on_trigger<F>(mut self, trigger: F) -> Self
    where
        F: Fn(&ToastId) + Send + Sync + 'static,
    {
        self.trigger = Some(Arc::new(trigger));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

impl fmt::Debug for ToastAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastAction")
            .field("label", &self.label)
            .field("enabled", &self.enabled)
            .field("class_name", &self.class_name)
            .field("trigger", &self.trigger.as_ref().map(|_| "Fn(&ToastId)"))
            .finish()
    }
}

impl PartialEq for ToastAction {
    fn eq(&self, other: &Self) -> bool {
        let same_trigger = match (&self.trigger, &other.trigger) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.label == other.label
            && self.enabled == other.enabled
            && self.class_name == other.class_name
            && same_trigger
    }
}

/// An active toast record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: ToastId,
    pub variant: Variant,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Time-to-live; `None` persists until dismissed
    #[serde(default, with = "duration_millis")]
    pub duration: Option<Duration>,
    pub dismissible: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action: Vec<ToastAction>,
    #[serde(default)]
    pub position: Position,
    pub created_at: DateTime<Utc>,
}

/// Requested lifetime of a new toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// Use the engine's default duration
    #[default]
    Default,
    /// Persist until explicitly dismissed
    Never,
    /// Expire after the given milliseconds; negative values clamp to zero
    AfterMillis(i64),
}

impl Timeout {
    /// Resolve to a concrete time-to-live
    pub fn resolve(self, default: Duration) -> Option<Duration> {
        match self {
            Timeout::Default => Some(default),
            Timeout::Never => None,
            Timeout::AfterMillis(ms) => Some(clamp_millis(ms)),
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Timeout::AfterMillis(ms) if *ms < 0)
    }
}

fn clamp_millis(ms: i64) -> Duration {
    Duration::from_millis(ms.max(0) as u64)
}

/// Caller input for a new toast; everything but the id
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastInput {
    #[serde(default)]
    pub variant: Variant,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Absent means default duration, `null` means persistent
    #[serde(default, deserialize_with = "deserialize_timeout")]
    pub duration: Timeout,
    #[serde(default)]
    pub dismissible: Option<bool>,
    #[serde(default)]
    pub action: Vec<ToastAction>,
    #[serde(default)]
    pub position: Position,
}

impl ToastInput {
    pub fn new(variant: Variant, title: impl Into<String>) -> Self {
        Self {
            variant,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(Variant::Success, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(Variant::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(Variant::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(Variant::Info, title)
    }

    pub fn loading(title: impl Into<String>) -> Self {
        Self::new(Variant::Loading, title)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Timeout::AfterMillis(duration.as_millis().min(i64::MAX as u128) as i64);
        self
    }

    pub fn duration_ms(mut self, ms: i64) -> Self {
        self.duration = Timeout::AfterMillis(ms);
        self
    }

    /// Keep the toast until it is dismissed
    pub fn persistent(mut self) -> Self {
        self.duration = Timeout::Never;
        self
    }

    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = Some(dismissible);
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.action.push(action);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Build the record, filling unset fields with defaults
    pub fn into_toast(self, id: ToastId, default_duration: Duration) -> Toast {
        Toast {
            id,
            variant: self.variant,
            title: self.title,
            description: self.description,
            duration: self.duration.resolve(default_duration),
            dismissible: self.dismissible.unwrap_or(true),
            action: self.action,
            position: self.position,
            created_at: Utc::now(),
        }
    }
}

/// Partial update for an existing toast. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastPatch {
    #[serde(default)]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub title: Option<String>,
    /// `Some(None)` clears the description
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    /// `Some(None)` makes the toast persistent
    #[serde(default, deserialize_with = "deserialize_patch_duration")]
    pub duration: Option<Option<Duration>>,
    #[serde(default)]
    pub dismissible: Option<bool>,
    #[serde(default)]
    pub action: Option<Vec<ToastAction>>,
    #[serde(default)]
    pub position: Option<Position>,
}

impl ToastPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn duration_ms(mut self, ms: i64) -> Self {
        self.duration = Some(Some(clamp_millis(ms)));
        self
    }

    pub fn persistent(mut self) -> Self {
        self.duration = Some(None);
        self
    }

    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = Some(dismissible);
        self
    }

    pub fn action(mut self, action: Vec<ToastAction>) -> Self {
        self.action = Some(action);
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn default_true() -> bool {
    true
}

fn deserialize_timeout<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timeout, D::Error> {
    Ok(match Option::<i64>::deserialize(deserializer)? {
        Some(ms) => Timeout::AfterMillis(ms),
        None => Timeout::Never,
    })
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn deserialize_patch_duration<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<Duration>>, D::Error> {
    Ok(Some(Option::<i64>::deserialize(deserializer)?.map(clamp_millis)))
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
