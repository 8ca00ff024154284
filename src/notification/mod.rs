//! Toast record types.
//!
//! - `Toast`: an active notification record as held by the store
//! - `ToastInput`: caller input for `ToastCenter::notify` (everything but the id)
//! - `ToastPatch`: partial update for `ToastCenter::patch`
//!
//! Inputs and patches deserialize from JSON, so the host application can
//! forward payloads as-is:
//!
//! ```rust,ignore
//! let input: ToastInput = serde_json::from_str(r#"{"variant":"error","title":"Sync failed"}"#)?;
//! let id = center.notify(input);
//! ```

mod types;

pub use types::{
    ActionTrigger, Position, Timeout, Toast, ToastAction, ToastId, ToastInput, ToastPatch, Variant,
};
