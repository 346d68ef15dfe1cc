//! Heartbeat monitor - periodic swarm service health observation
//!
//! Polls the orchestrator for matching services, classifies each one
//! against its desired replica count, and logs per-task diagnostics.

use anyhow::Result;
use std::sync::Arc;
use swarm_lib::{DockerApi, HeartbeatMonitor};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting heartbeat-monitor");

    let settings = config::MonitorSettings::load()?;
    let monitor_config = settings.monitor_config();
    info!(filters = ?monitor_config.service_filters, "Monitor configured");

    let client = Arc::new(DockerApi::connect_local()?);
    let monitor = HeartbeatMonitor::new(client, monitor_config);

    tokio::select! {
        _ = monitor.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("SIGINT received, shutting down");
        }
    }

    Ok(())
}
