use thiserror::Error;

use crate::notification::ToastId;

#[derive(Error, Debug)]
pub enum ToastError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("Toast not found: {0}")]
    NotFound(ToastId),

    #[error("Action {index} on toast {id} is missing or disabled")]
    ActionUnavailable { id: ToastId, index: usize },

    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl ToastError {
    /// Short machine-readable code, used as a log field.
    pub fn code(&self) -> &'static str {
        match self {
            ToastError::Config(_) => "CONFIG_ERROR",
            ToastError::NoRuntime(_) => "NO_RUNTIME",
            ToastError::NotFound(_) => "NOT_FOUND",
            ToastError::ActionUnavailable { .. } => "ACTION_UNAVAILABLE",
            ToastError::Telemetry(_) => "TELEMETRY_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, ToastError>;
