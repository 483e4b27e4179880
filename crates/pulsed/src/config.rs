//! Configuration file parsing and structures.
//!
//! pulsed uses a single TOML file. The `[pulse]` section configures the
//! vendor cloud account and poll cadence, `[mqtt]` the broker the bridge
//! publishes to, and `[api]` the local status endpoint. Sections other than
//! `[pulse]` are optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

pub use crate::integrations::mqtt::MqttConfig;
pub use crate::integrations::pulse::PulseConfig;

/// Top-level configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Pulse cloud account and poll cadence. The daemon has nothing to do
    /// without it; `None` only makes sense for dry configuration checks.
    #[serde(default)]
    pub pulse: Option<PulseConfig>,

    /// MQTT broker the bridge publishes to. When absent the daemon still
    /// polls and serves its status API, but publishes nothing.
    #[serde(default)]
    pub mqtt: Option<MqttConfig>,

    /// Local HTTP status endpoint
    #[serde(default)]
    pub api: Option<ApiConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub level: LogLevel,
}

/// Local HTTP status endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// IP address to listen on
    pub listen: String,

    /// Port to listen on
    pub port: u16,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().to_path_buf(), e))?;

        toml::from_str(&contents).map_err(ConfigError::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
