//! Docker Engine implementation of the orchestrator capability
//!
//! Maps bollard's generated API models onto the crate's domain models,
//! preserving absent fields as `None` and lowercasing swarm states at
//! this boundary.

use super::{ExecStream, OrchestratorClient, OrchestratorError};
use crate::models::{ContainerInfo, ServiceInfo, TaskInfo, TaskStatusInfo};
use bollard::container::{ListContainersOptions, LogOutput};
use bollard::exec::{CreateExecOptions, StartExecResults};
use bollard::network::DisconnectNetworkOptions;
use bollard::service::ListServicesOptions;
use bollard::task::ListTasksOptions;
use bollard::Docker;
use std::collections::HashMap;
use tokio_stream::StreamExt;

impl From<bollard::errors::Error> for OrchestratorError {
    fn from(err: bollard::errors::Error) -> Self {
        OrchestratorError::Request(err.to_string())
    }
}

/// Docker Engine client.
///
/// Connects over the local socket: the unix socket on unix-like systems,
/// the named pipe on Windows.
pub struct DockerApi {
    docker: Docker,
}

impl DockerApi {
    pub fn connect_local() -> Result<Self, OrchestratorError> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker })
    }
}

#[async_trait::async_trait]
impl OrchestratorClient for DockerApi {
    async fn list_containers(
        &self,
        name_filter: &str,
        include_stopped: bool,
    ) -> Result<Vec<ContainerInfo>, OrchestratorError> {
        let options = ListContainersOptions::<String> {
            all: include_stopped,
            filters: HashMap::from([("name".to_string(), vec![name_filter.to_string()])]),
            ..Default::default()
        };

        let containers = self.docker.list_containers(Some(options)).await?;

        Ok(containers
            .into_iter()
            .map(|c| ContainerInfo {
                id: c.id.unwrap_or_default(),
                names: c.names.unwrap_or_default(),
                state: c.state.map(|state| state.to_string()),
            })
            .collect())
    }

    async fn container_networks(
        &self,
        container_id: &str,
    ) -> Result<Vec<String>, OrchestratorError> {
        let inspect = self
            .docker
            .inspect_container(
                container_id,
                None::<bollard::query_parameters::InspectContainerOptions>,
            )
            .await?;

        Ok(inspect
            .network_settings
            .and_then(|settings| settings.networks)
            .map(|networks| networks.into_keys().collect())
            .unwrap_or_default())
    }

    async fn disconnect_network(
        &self,
        network: &str,
        container_id: &str,
        force: bool,
    ) -> Result<(), OrchestratorError> {
        let options = DisconnectNetworkOptions {
            container: container_id.to_string(),
            force,
        };

        self.docker.disconnect_network(network, options).await?;
        Ok(())
    }

    async fn stop_container(&self, container_id: &str) -> Result<(), OrchestratorError> {
        self.docker
            .stop_container(
                container_id,
                None::<bollard::query_parameters::StopContainerOptions>,
            )
            .await?;
        Ok(())
    }

    async fn create_exec(
        &self,
        container_id: &str,
        argv: &[String],
    ) -> Result<String, OrchestratorError> {
        let options = CreateExecOptions::<String> {
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            cmd: Some(argv.to_vec()),
            privileged: Some(true),
            tty: Some(false),
            ..Default::default()
        };

        let created = self.docker.create_exec(container_id, options).await?;
        Ok(created.id)
    }

    async fn start_exec(&self, exec_id: &str) -> Result<ExecStream, OrchestratorError> {
        match self.docker.start_exec(exec_id, None).await? {
            StartExecResults::Attached { output, .. } => {
                let stream = output.map(|chunk| {
                    chunk
                        .map(LogOutput::into_bytes)
                        .map_err(OrchestratorError::from)
                });
                Ok(Box::pin(stream))
            }
            StartExecResults::Detached => {
                Err(OrchestratorError::MissingField("attached exec output stream"))
            }
        }
    }

    async fn list_services(
        &self,
        name_filters: &[String],
    ) -> Result<Vec<ServiceInfo>, OrchestratorError> {
        let options = ListServicesOptions::<String> {
            filters: HashMap::from([("name".to_string(), name_filters.to_vec())]),
            ..Default::default()
        };

        let services = self.docker.list_services(Some(options)).await?;

        Ok(services
            .into_iter()
            .map(|s| {
                let spec = s.spec.unwrap_or_default();
                ServiceInfo {
                    id: s.id.unwrap_or_default(),
                    name: spec.name.unwrap_or_default(),
                    desired_replicas: spec
                        .mode
                        .and_then(|mode| mode.replicated)
                        .and_then(|replicated| replicated.replicas)
                        .map(|replicas| replicas as u64),
                    update_state: s
                        .update_status
                        .and_then(|status| status.state)
                        .map(|state| state.to_string().to_lowercase()),
                }
            })
            .collect())
    }

    async fn list_tasks(&self, service_id: &str) -> Result<Vec<TaskInfo>, OrchestratorError> {
        let options = ListTasksOptions::<String> {
            filters: HashMap::from([("service".to_string(), vec![service_id.to_string()])]),
            ..Default::default()
        };

        let tasks = self.docker.list_tasks(Some(options)).await?;

        Ok(tasks
            .into_iter()
            .map(|t| TaskInfo {
                id: t.id.unwrap_or_default(),
                node_id: t.node_id,
                status: t.status.map(|status| TaskStatusInfo {
                    state: status.state.map(|state| state.to_string().to_lowercase()),
                    container_id: status
                        .container_status
                        .and_then(|container| container.container_id),
                    error: status.err,
                }),
            })
            .collect())
    }
}
