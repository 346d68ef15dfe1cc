//! Orchestrator client capability
//!
//! The injector and the monitor talk to the Docker Engine / Swarm API
//! exclusively through the [`OrchestratorClient`] trait. The production
//! implementation is [`DockerApi`]; tests script the trait directly.

mod docker;

pub use docker::DockerApi;

use crate::models::{ContainerInfo, ServiceInfo, TaskInfo};
use bytes::Bytes;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

/// Errors surfaced by orchestrator operations.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The orchestrator rejected or failed a request.
    #[error("orchestrator request failed: {0}")]
    Request(String),
    /// A response lacked a field the caller depends on.
    #[error("orchestrator response missing {0}")]
    MissingField(&'static str),
}

/// Combined stdout/stderr byte stream of an exec session. Yields chunks
/// until the orchestrator signals end-of-data.
pub type ExecStream = Pin<Box<dyn Stream<Item = Result<Bytes, OrchestratorError>> + Send>>;

/// Operations this core consumes from the orchestrator.
#[async_trait::async_trait]
pub trait OrchestratorClient: Send + Sync {
    /// List containers whose name matches `name_filter`, optionally
    /// including non-running ones.
    async fn list_containers(
        &self,
        name_filter: &str,
        include_stopped: bool,
    ) -> Result<Vec<ContainerInfo>, OrchestratorError>;

    /// Names of every network the container is attached to.
    async fn container_networks(
        &self,
        container_id: &str,
    ) -> Result<Vec<String>, OrchestratorError>;

    /// Disconnect the container from the named network.
    async fn disconnect_network(
        &self,
        network: &str,
        container_id: &str,
        force: bool,
    ) -> Result<(), OrchestratorError>;

    /// Stop the container's main process.
    async fn stop_container(&self, container_id: &str) -> Result<(), OrchestratorError>;

    /// Create an exec session inside the container: stdout and stderr
    /// attached, privileged, no TTY. Returns the exec identifier.
    async fn create_exec(
        &self,
        container_id: &str,
        argv: &[String],
    ) -> Result<String, OrchestratorError>;

    /// Start a previously created exec session and attach to its output.
    async fn start_exec(&self, exec_id: &str) -> Result<ExecStream, OrchestratorError>;

    /// List swarm services whose name matches any of `name_filters`.
    async fn list_services(
        &self,
        name_filters: &[String],
    ) -> Result<Vec<ServiceInfo>, OrchestratorError>;

    /// List tasks belonging to the service with the given identifier.
    async fn list_tasks(&self, service_id: &str) -> Result<Vec<TaskInfo>, OrchestratorError>;
}
