use std::time::Duration;

use serde::Deserialize;

fn default_base_url() -> String {
    pulse_api::DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_update_interval_secs() -> u64 {
    60
}

fn default_discovery_interval_secs() -> u64 {
    3600
}

/// Configuration for the Pulse cloud account and poll cadence
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// API key for the Pulse account. Falls back to the `PULSE_API_KEY`
    /// environment variable when unset; missing in both places is fatal.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the Pulse API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Seconds between state-publish cycles
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,

    /// Seconds between discovery cycles
    #[serde(default = "default_discovery_interval_secs")]
    pub discovery_interval_secs: u64,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    pub fn discovery_interval(&self) -> Duration {
        Duration::from_secs(self.discovery_interval_secs)
    }
}
