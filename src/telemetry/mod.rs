//! Tracing subscriber setup for hosts embedding the toast engine.
//!
//! The engine itself only emits `tracing` events; installing a subscriber is
//! left to the host. [`init_tracing`] is the stock setup: an `EnvFilter` that
//! honours `RUST_LOG` (falling back to the configured level) and either the
//! human-readable or the JSON `fmt` layer.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RUST_LOG` | Filter directives | `log.level` from settings |
//! | `TOAST_LOG__LEVEL` | Fallback filter | `info` |
//! | `TOAST_LOG__FORMAT` | `pretty` or `json` | `pretty` |

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogConfig, LogFormat};
use crate::error::{Result, ToastError};

/// Install the global tracing subscriber.
///
/// Fails instead of panicking when a global subscriber is already set.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ToastError::Telemetry(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match config.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    result.map_err(|e| ToastError::Telemetry(e.to_string()))?;

    tracing::info!(level = %config.level, format = ?config.format, "Tracing initialized");
    Ok(())
}
