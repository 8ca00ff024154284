// Shared components
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Toast engine
pub mod center;
pub mod notification;
pub mod router;
pub mod scheduler;
pub mod store;
pub mod theme;

pub use center::{ToastCenter, ToastEvent, ToastSnapshot};
pub use error::{Result, ToastError};
pub use notification::{
    Position, Timeout, Toast, ToastAction, ToastId, ToastInput, ToastPatch, Variant,
};
pub use router::{Layout, Phase, PositionGroup, RoutedToast, SlideFrom};
pub use theme::{Theme, ThemeOverride, ThemeRegistry};
