use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::scheduler::{DEFAULT_DURATION, EXIT_DELAY, SETTLE_DELAY};
use crate::theme::ThemeOverride;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// Applied on top of the built-in theme at startup
    #[serde(default)]
    pub theme: ThemeOverride,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Time-to-live for toasts that do not set one, in milliseconds
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,
    /// Delay before an entering toast settles, in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Exit animation length before purge, in milliseconds
    #[serde(default = "default_exit_delay_ms")]
    pub exit_delay_ms: u64,
    /// Buffered lifecycle events per subscriber
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// Cap on non-exiting toasts per position (None = unlimited)
    #[serde(default)]
    pub max_visible: Option<usize>,
}

fn default_duration_ms() -> u64 {
    DEFAULT_DURATION.as_millis() as u64
}

fn default_settle_delay_ms() -> u64 {
    SETTLE_DELAY.as_millis() as u64
}

fn default_exit_delay_ms() -> u64 {
    EXIT_DELAY.as_millis() as u64
}

fn default_event_capacity() -> usize {
    64
}

impl EngineConfig {
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            exit_delay_ms: default_exit_delay_ms(),
            event_capacity: default_event_capacity(),
            max_visible: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // TOAST_ENGINE__EXIT_DELAY_MS, TOAST_LOG__LEVEL, TOAST_THEME__BASE, ...
            .add_source(
                Environment::with_prefix("TOAST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Parse settings from a TOML document layered over the defaults
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("engine.default_duration_ms", default_duration_ms())?
            .set_default("engine.settle_delay_ms", default_settle_delay_ms())?
            .set_default("engine.exit_delay_ms", default_exit_delay_ms())?
            .set_default("engine.event_capacity", default_event_capacity() as u64)?
            .set_default("log.level", default_log_level())
    }
}
