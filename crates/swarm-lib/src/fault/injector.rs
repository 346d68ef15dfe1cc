//! Fault injection scheduling loop
//!
//! Picks a target service at random, discovers its running containers,
//! applies one sampled fault per container with a sampled pause in
//! between, and repeats forever. Individual failures are logged and
//! never stop the loop.

use super::FaultAction;
use crate::exec;
use crate::models::ContainerInfo;
use crate::orchestrator::OrchestratorClient;
use anyhow::{bail, Context, Result};
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Configuration for the fault injection loop.
#[derive(Debug, Clone)]
pub struct InjectorConfig {
    /// Service names eligible for fault injection.
    pub target_services: Vec<String>,
    /// Inclusive bounds for the pause sampled after each fault, seconds.
    pub pause_secs: RangeInclusive<u64>,
    /// Deadline for draining a single exec session's output.
    pub exec_timeout: Duration,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            target_services: Vec::new(),
            pause_secs: 5..=15,
            exec_timeout: Duration::from_secs(360),
        }
    }
}

/// The chaos loop driver.
pub struct FaultInjector {
    client: Arc<dyn OrchestratorClient>,
    config: InjectorConfig,
}

impl FaultInjector {
    pub fn new(client: Arc<dyn OrchestratorClient>, config: InjectorConfig) -> Self {
        Self { client, config }
    }

    /// Run the injection loop until the process terminates.
    pub async fn run(&self) -> Result<()> {
        if self.config.target_services.is_empty() {
            bail!("no target services configured for fault injection");
        }

        info!(
            targets = ?self.config.target_services,
            "Starting fault injection loop"
        );

        loop {
            let service = {
                let mut rng = rand::thread_rng();
                let index = rng.gen_range(0..self.config.target_services.len());
                self.config.target_services[index].clone()
            };

            info!(service = %service, "Selected service for fault injection");
            self.run_cycle(&service).await;
        }
    }

    /// One pass over a service: discover, filter to running, fault each
    /// container. Returns the number of containers acted on.
    pub async fn run_cycle(&self, service: &str) -> usize {
        let containers = match self.client.list_containers(service, true).await {
            Ok(containers) => containers,
            Err(e) => {
                warn!(service = %service, error = %e, "Container discovery failed");
                return 0;
            }
        };

        let running: Vec<ContainerInfo> =
            containers.into_iter().filter(ContainerInfo::is_running).collect();

        if running.is_empty() {
            info!(service = %service, "No running containers found, reselecting immediately");
            return 0;
        }

        let mut applied = 0;
        for container in &running {
            // guards against the orchestrator flipping state between
            // discovery and application
            if !container.is_running() {
                info!(container_id = %container.id, "Container no longer running, skipping");
                continue;
            }

            let action = FaultAction::sample(&mut rand::thread_rng());
            info!(container_id = %container.id, action = %action, "Applying fault");

            if let Err(e) = self.apply(container, &action).await {
                warn!(
                    container_id = %container.id,
                    action = %action,
                    error = %e,
                    "Fault application failed"
                );
            }
            applied += 1;

            self.pause_between_faults().await;
        }

        applied
    }

    async fn apply(&self, container: &ContainerInfo, action: &FaultAction) -> Result<()> {
        match action {
            FaultAction::StopContainer => {
                self.client.stop_container(&container.id).await?;
                info!(container_id = %container.id, "Container stopped");
            }
            FaultAction::StopContainerNetwork => {
                let networks = self.client.container_networks(&container.id).await?;
                if networks.is_empty() {
                    bail!("container {} has no networks to disconnect", container.id);
                }
                for network in &networks {
                    self.client
                        .disconnect_network(network, &container.id, true)
                        .await?;
                }
                info!(
                    container_id = %container.id,
                    networks = networks.len(),
                    "Container disconnected from all networks"
                );
            }
            exec_action => {
                let argv = exec_action
                    .command()
                    .context("fault action carries no exec command")?;
                exec::run_in_container(
                    self.client.as_ref(),
                    &container.id,
                    &argv,
                    self.config.exec_timeout,
                )
                .await?;
            }
        }

        Ok(())
    }

    async fn pause_between_faults(&self) {
        let secs = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.config.pause_secs.clone())
        };
        info!(seconds = secs, "Waiting before next fault");
        sleep(Duration::from_secs(secs)).await;
    }
}
