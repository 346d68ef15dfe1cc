//! Shared library for the swarm chaos tooling
//!
//! This crate provides the core functionality for:
//! - Talking to the Docker Engine / Swarm API through a capability trait
//! - Randomized fault action construction and scheduling
//! - Running commands inside containers and draining their output
//! - Periodic service health monitoring and classification

pub mod exec;
pub mod fault;
pub mod models;
pub mod monitor;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;

pub use fault::{FaultAction, FaultInjector, InjectorConfig, StressTimeout};
pub use models::*;
pub use monitor::{HeartbeatMonitor, MonitorConfig, ServiceHealth, ServiceReport};
pub use orchestrator::{DockerApi, ExecStream, OrchestratorClient, OrchestratorError};
