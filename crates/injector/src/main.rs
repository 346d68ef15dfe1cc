//! Chaos injector - randomized fault injection for swarm services
//!
//! Continuously selects one of the configured services at random and
//! applies a random fault to each of its running containers.

use anyhow::Result;
use std::sync::Arc;
use swarm_lib::{DockerApi, FaultInjector};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting chaos-injector");

    let config = config::ChaosConfig::load()?;
    let injector_config = config.injector_config();
    info!(targets = ?injector_config.target_services, "Injector configured");

    let client = Arc::new(DockerApi::connect_local()?);
    let injector = FaultInjector::new(client, injector_config);

    tokio::select! {
        result = injector.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("SIGINT received, shutting down");
            Ok(())
        }
    }
}
