//! Scripted orchestrator mock shared by the test modules.

use crate::models::{ContainerInfo, ServiceInfo, TaskInfo};
use crate::orchestrator::{ExecStream, OrchestratorClient, OrchestratorError};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;

/// One recorded orchestrator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListContainers { filter: String },
    Networks { container: String },
    Disconnect { network: String, container: String },
    Stop { container: String },
    CreateExec { container: String, argv: Vec<String> },
    StartExec { exec: String },
    ListServices { filters: Vec<String> },
    ListTasks { service: String },
}

impl Call {
    /// The container a fault-applying call was aimed at, if any.
    pub fn fault_target(&self) -> Option<&str> {
        match self {
            Call::Stop { container }
            | Call::Disconnect { container, .. }
            | Call::CreateExec { container, .. } => Some(container),
            _ => None,
        }
    }
}

/// Scripted [`OrchestratorClient`] with a recorded call log.
pub struct MockOrchestrator {
    containers: Vec<ContainerInfo>,
    networks: HashMap<String, Vec<String>>,
    services: Mutex<Vec<ServiceInfo>>,
    tasks: HashMap<String, Vec<TaskInfo>>,
    exec_chunks: Vec<Vec<u8>>,
    hung_exec: bool,
    fail_stop: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockOrchestrator {
    pub fn new() -> Self {
        Self {
            containers: Vec::new(),
            networks: HashMap::new(),
            services: Mutex::new(Vec::new()),
            tasks: HashMap::new(),
            exec_chunks: vec![b"done".to_vec()],
            hung_exec: false,
            fail_stop: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_containers(mut self, containers: Vec<ContainerInfo>) -> Self {
        self.containers = containers;
        self
    }

    pub fn with_networks(mut self, container: &str, networks: Vec<String>) -> Self {
        self.networks.insert(container.to_string(), networks);
        self
    }

    pub fn with_services(self, services: Vec<ServiceInfo>) -> Self {
        *self.services.lock().unwrap() = services;
        self
    }

    pub fn with_tasks(mut self, service_id: &str, tasks: Vec<TaskInfo>) -> Self {
        self.tasks.insert(service_id.to_string(), tasks);
        self
    }

    pub fn with_exec_chunks(mut self, chunks: Vec<Vec<u8>>) -> Self {
        self.exec_chunks = chunks;
        self
    }

    pub fn with_hung_exec(mut self) -> Self {
        self.hung_exec = true;
        self
    }

    pub fn with_failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Replace the scripted service listing between monitor passes.
    pub fn set_services(&self, services: Vec<ServiceInfo>) {
        *self.services.lock().unwrap() = services;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl OrchestratorClient for MockOrchestrator {
    async fn list_containers(
        &self,
        name_filter: &str,
        _include_stopped: bool,
    ) -> Result<Vec<ContainerInfo>, OrchestratorError> {
        self.record(Call::ListContainers {
            filter: name_filter.to_string(),
        });
        Ok(self
            .containers
            .iter()
            .filter(|c| c.names.iter().any(|n| n.contains(name_filter)))
            .cloned()
            .collect())
    }

    async fn container_networks(
        &self,
        container_id: &str,
    ) -> Result<Vec<String>, OrchestratorError> {
        self.record(Call::Networks {
            container: container_id.to_string(),
        });
        Ok(self.networks.get(container_id).cloned().unwrap_or_default())
    }

    async fn disconnect_network(
        &self,
        network: &str,
        container_id: &str,
        _force: bool,
    ) -> Result<(), OrchestratorError> {
        self.record(Call::Disconnect {
            network: network.to_string(),
            container: container_id.to_string(),
        });
        Ok(())
    }

    async fn stop_container(&self, container_id: &str) -> Result<(), OrchestratorError> {
        self.record(Call::Stop {
            container: container_id.to_string(),
        });
        if self.fail_stop {
            return Err(OrchestratorError::Request(format!(
                "cannot stop {}",
                container_id
            )));
        }
        Ok(())
    }

    async fn create_exec(
        &self,
        container_id: &str,
        argv: &[String],
    ) -> Result<String, OrchestratorError> {
        self.record(Call::CreateExec {
            container: container_id.to_string(),
            argv: argv.to_vec(),
        });
        Ok(format!("exec-{}", container_id))
    }

    async fn start_exec(&self, exec_id: &str) -> Result<ExecStream, OrchestratorError> {
        self.record(Call::StartExec {
            exec: exec_id.to_string(),
        });
        if self.hung_exec {
            return Ok(Box::pin(tokio_stream::pending()));
        }
        let chunks: Vec<Result<Bytes, OrchestratorError>> = self
            .exec_chunks
            .iter()
            .map(|chunk| Ok(Bytes::from(chunk.clone())))
            .collect();
        Ok(Box::pin(tokio_stream::iter(chunks)))
    }

    async fn list_services(
        &self,
        name_filters: &[String],
    ) -> Result<Vec<ServiceInfo>, OrchestratorError> {
        self.record(Call::ListServices {
            filters: name_filters.to_vec(),
        });
        Ok(self.services.lock().unwrap().clone())
    }

    async fn list_tasks(&self, service_id: &str) -> Result<Vec<TaskInfo>, OrchestratorError> {
        self.record(Call::ListTasks {
            service: service_id.to_string(),
        });
        Ok(self.tasks.get(service_id).cloned().unwrap_or_default())
    }
}
