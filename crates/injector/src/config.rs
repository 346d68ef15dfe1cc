//! Injector configuration

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use swarm_lib::InjectorConfig;

/// Injector configuration, read from `CHAOS_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ChaosConfig {
    /// Comma-separated service names eligible for fault injection
    #[serde(default = "default_target_services")]
    pub target_services: String,

    /// Lower bound for the pause between faults, seconds
    #[serde(default = "default_min_pause_secs")]
    pub min_pause_secs: u64,

    /// Upper bound for the pause between faults, seconds
    #[serde(default = "default_max_pause_secs")]
    pub max_pause_secs: u64,

    /// Deadline for draining one exec session, seconds. Must exceed the
    /// longest stressor duration (5 minutes for combined stress).
    #[serde(default = "default_exec_timeout_secs")]
    pub exec_timeout_secs: u64,
}

fn default_target_services() -> String {
    "mystack_web-app,mystack_nginx-rtmp".to_string()
}

fn default_min_pause_secs() -> u64 {
    5
}

fn default_max_pause_secs() -> u64 {
    15
}

fn default_exec_timeout_secs() -> u64 {
    360
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            target_services: default_target_services(),
            min_pause_secs: default_min_pause_secs(),
            max_pause_secs: default_max_pause_secs(),
            exec_timeout_secs: default_exec_timeout_secs(),
        }
    }
}

impl ChaosConfig {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("CHAOS"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }

    /// Translate into the library's injector configuration.
    pub fn injector_config(&self) -> InjectorConfig {
        InjectorConfig {
            target_services: self
                .target_services
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            pause_secs: self.min_pause_secs..=self.max_pause_secs,
            exec_timeout: Duration::from_secs(self.exec_timeout_secs),
        }
    }
}
