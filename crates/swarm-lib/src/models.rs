//! Core data models shared by the injector and the monitor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A container as reported by the orchestrator's container listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: String,
    pub names: Vec<String>,
    /// Lifecycle state as reported at discovery time, absent when the
    /// orchestrator returned no state for the entry.
    pub state: Option<String>,
}

impl ContainerInfo {
    /// Whether the container was reported as running at discovery time.
    ///
    /// Containers are ephemeral; this says nothing about the state the
    /// container is in by the time an action reaches it.
    pub fn is_running(&self) -> bool {
        self.state
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("running"))
            .unwrap_or(false)
    }
}

/// A swarm service as reported by the service listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub id: String,
    pub name: String,
    /// Desired replica count from the replicated-mode spec; absent when
    /// the service is not replicated or the spec is unset.
    pub desired_replicas: Option<u64>,
    /// Rollout state from the service's update status, lowercased by the
    /// adapter; absent when the service has never been updated.
    pub update_state: Option<String>,
}

/// One scheduled instance of a service on a cluster node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInfo {
    pub id: String,
    pub node_id: Option<String>,
    pub status: Option<TaskStatusInfo>,
}

/// Status sub-fields of a task, each independently optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusInfo {
    /// Task lifecycle state, lowercased by the adapter.
    pub state: Option<String>,
    pub container_id: Option<String>,
    pub error: Option<String>,
}

/// Last observed rollout state for a service, overwritten on every
/// monitor pass. Entries are never pruned within the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealthRecord {
    pub update_state: String,
    pub last_observed: DateTime<Utc>,
}
