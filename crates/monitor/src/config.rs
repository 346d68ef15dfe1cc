//! Monitor configuration

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use swarm_lib::MonitorConfig;

/// Monitor configuration, read from `MONITOR_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSettings {
    /// Comma-separated service name filters
    #[serde(default = "default_service_filters")]
    pub service_filters: String,

    /// Fixed wait between monitor passes, seconds
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_service_filters() -> String {
    "mystack_web-app,mystack_nginx-rtmp".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            service_filters: default_service_filters(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl MonitorSettings {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("MONITOR"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }

    /// Translate into the library's monitor configuration.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            service_filters: self
                .service_filters
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }
}
