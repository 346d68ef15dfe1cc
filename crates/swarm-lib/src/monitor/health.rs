//! Health classification over grouped task counts

use crate::models::TaskInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Derived health of one service, from running-task count versus the
/// desired replica count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceHealth {
    /// Every desired replica is running.
    Healthy,
    /// Some replicas are running, `shortfall` are missing.
    Degraded { shortfall: u64 },
    /// No replica is running.
    Unhealthy,
}

impl ServiceHealth {
    /// Classify a service. Total and mutually exclusive over all inputs.
    ///
    /// More running tasks than desired (scale-down transients) counts as
    /// Healthy; so does a service with zero desired replicas.
    pub fn classify(desired: u64, running: u64) -> Self {
        if running >= desired {
            ServiceHealth::Healthy
        } else if running == 0 {
            ServiceHealth::Unhealthy
        } else {
            ServiceHealth::Degraded {
                shortfall: desired - running,
            }
        }
    }
}

/// Normalized state of a task: lowercased reported state, `"unknown"`
/// when the task carries no status.
pub fn normalized_state(task: &TaskInfo) -> String {
    task.status
        .as_ref()
        .and_then(|status| status.state.as_deref())
        .map(|state| state.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Group tasks by normalized state. The map iterates alphabetically, so
/// reporting order is deterministic regardless of input ordering.
pub fn group_tasks(tasks: &[TaskInfo]) -> BTreeMap<String, Vec<&TaskInfo>> {
    let mut groups: BTreeMap<String, Vec<&TaskInfo>> = BTreeMap::new();
    for task in tasks {
        groups.entry(normalized_state(task)).or_default().push(task);
    }
    groups
}
