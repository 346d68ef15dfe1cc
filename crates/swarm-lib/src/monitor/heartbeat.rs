//! Heartbeat monitoring loop
//!
//! One pass lists every matching service, records its rollout state,
//! groups its tasks, logs per-task diagnostics, and classifies health.
//! Passes repeat on a fixed cadence; a failed pass is logged and the
//! next one starts after the same wait.

use super::health::{group_tasks, ServiceHealth};
use crate::models::{ServiceHealthRecord, ServiceInfo, TaskInfo};
use crate::orchestrator::OrchestratorClient;
use anyhow::Result;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Configuration for the monitoring loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Service name filters passed to the orchestrator listing.
    pub service_filters: Vec<String>,
    /// Fixed wait between passes.
    pub poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            service_filters: Vec::new(),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Outcome of observing one service during a pass.
#[derive(Debug, Clone)]
pub struct ServiceReport {
    pub name: String,
    pub desired: u64,
    pub running: u64,
    pub total_tasks: usize,
    pub state_counts: BTreeMap<String, usize>,
    pub health: ServiceHealth,
}

/// The monitoring loop driver. Owns the per-service health records; no
/// other component reads or writes them.
pub struct HeartbeatMonitor {
    client: Arc<dyn OrchestratorClient>,
    config: MonitorConfig,
    records: HashMap<String, ServiceHealthRecord>,
}

impl HeartbeatMonitor {
    pub fn new(client: Arc<dyn OrchestratorClient>, config: MonitorConfig) -> Self {
        Self {
            client,
            config,
            records: HashMap::new(),
        }
    }

    /// Run the monitoring loop until the process terminates.
    pub async fn run(mut self) {
        info!(
            filters = ?self.config.service_filters,
            interval_secs = self.config.poll_interval.as_secs(),
            "Starting heartbeat monitor"
        );

        loop {
            match self.run_pass().await {
                Ok(reports) => {
                    info!(services = reports.len(), "Monitor pass complete");
                }
                Err(e) => {
                    warn!(error = %e, "Monitor pass failed");
                }
            }

            sleep(self.config.poll_interval).await;
        }
    }

    /// One full pass over every matching service.
    pub async fn run_pass(&mut self) -> Result<Vec<ServiceReport>> {
        let services = self
            .client
            .list_services(&self.config.service_filters)
            .await?;

        info!(matched = services.len(), "Services matched");

        let mut reports = Vec::with_capacity(services.len());
        for service in &services {
            reports.push(self.observe_service(service).await?);
        }

        Ok(reports)
    }

    async fn observe_service(&mut self, service: &ServiceInfo) -> Result<ServiceReport> {
        let update_state = service
            .update_state
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        let record = ServiceHealthRecord {
            update_state,
            last_observed: Utc::now(),
        };
        info!(
            service = %service.name,
            update_state = %record.update_state,
            last_observed = %record.last_observed,
            "Service update status"
        );
        self.records.insert(service.name.clone(), record);

        let tasks = self.client.list_tasks(&service.id).await?;
        let desired = service.desired_replicas.unwrap_or(0);
        let groups = group_tasks(&tasks);

        info!(
            service = %service.name,
            desired = desired,
            tasks = tasks.len(),
            "Task inventory"
        );

        for (state, group) in &groups {
            info!(
                service = %service.name,
                state = %state,
                count = group.len(),
                "Task state group"
            );
            for task in group {
                log_task_detail(task);
            }
        }

        let running = groups.get("running").map(|g| g.len() as u64).unwrap_or(0);
        let health = ServiceHealth::classify(desired, running);
        match health {
            ServiceHealth::Healthy => {
                info!(service = %service.name, running = running, "Service healthy");
            }
            ServiceHealth::Degraded { shortfall } => {
                warn!(
                    service = %service.name,
                    running = running,
                    desired = desired,
                    shortfall = shortfall,
                    "Service degraded"
                );
            }
            ServiceHealth::Unhealthy => {
                warn!(
                    service = %service.name,
                    desired = desired,
                    "Service unhealthy, no running tasks"
                );
            }
        }

        Ok(ServiceReport {
            name: service.name.clone(),
            desired,
            running,
            total_tasks: tasks.len(),
            state_counts: groups
                .into_iter()
                .map(|(state, group)| (state, group.len()))
                .collect(),
            health,
        })
    }

    /// Last observed rollout state per service name.
    pub fn records(&self) -> &HashMap<String, ServiceHealthRecord> {
        &self.records
    }
}

fn log_task_detail(task: &TaskInfo) {
    info!(
        task_id = %short_id(&task.id),
        container_id = %task
            .status
            .as_ref()
            .and_then(|s| s.container_id.as_deref())
            .unwrap_or("none"),
        node_id = %task.node_id.as_deref().unwrap_or("unassigned"),
        error = %task
            .status
            .as_ref()
            .and_then(|s| s.error.as_deref())
            .unwrap_or("no error"),
        "Task detail"
    );
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}
