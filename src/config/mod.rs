mod settings;

pub use settings::{EngineConfig, LogConfig, LogFormat, Settings};
