//! Configuration for the dynawrap client

use crate::store::{BackoffPolicy, SegmentCount};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix, e.g. `DYNAWRAP_ENDPOINT`.
pub const ENV_PREFIX: &str = "DYNAWRAP";

/// Backoff schedule used before talking to a non-production store.
pub const DEVELOPMENT_BACKOFF_MS: [u64; 8] = [0, 500, 1000, 2000, 4000, 8000, 16000, 32000];

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Store endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Target environment
    #[serde(default)]
    pub environment: Environment,

    /// Default scan segment count (0 = host parallelism)
    #[serde(default)]
    pub scan_segments: usize,

    /// Capacity of the record channel shared by scan workers
    #[serde(default = "default_scan_channel_capacity")]
    pub scan_channel_capacity: usize,

    /// Connectivity probe schedule
    #[serde(default = "default_backoff_intervals")]
    pub backoff_intervals_ms: Vec<u64>,

    /// Per-attempt connect timeout for the probe
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_endpoint() -> String {
    "http://localhost:8000".to_string()
}
fn default_scan_channel_capacity() -> usize {
    1
}
fn default_backoff_intervals() -> Vec<u64> {
    DEVELOPMENT_BACKOFF_MS.to_vec()
}
fn default_connect_timeout() -> u64 {
    1000
}
fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
    Test,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            environment: Environment::default(),
            scan_segments: 0,
            scan_channel_capacity: default_scan_channel_capacity(),
            backoff_intervals_ms: default_backoff_intervals(),
            connect_timeout_ms: default_connect_timeout(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from an optional TOML file, then `DYNAWRAP_*`
    /// environment variables. Missing fields fall back to defaults.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("backoff_intervals_ms"),
        );

        let config: ClientConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        tracing::debug!(
            endpoint = %config.endpoint,
            environment = ?config.environment,
            "Loaded client config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(crate::Error::InvalidConfig("endpoint cannot be empty".into()));
        }
        if self.scan_channel_capacity == 0 {
            return Err(crate::Error::InvalidConfig(
                "scan_channel_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy::from_millis(&self.backoff_intervals_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn default_segments(&self) -> SegmentCount {
        SegmentCount::from(self.scan_segments)
    }
}
