//! Fault action repertoire
//!
//! Each action carries its own randomly sampled parameters; sampling is
//! uniform over closed integer intervals and happens once per
//! application, so no two applications share parameters by construction.

mod injector;

pub use injector::{FaultInjector, InjectorConfig};

use rand::Rng;
use std::fmt;

/// Timeout for the combined stressor, expressed in the unit that was
/// drawn for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressTimeout {
    Seconds(u32),
    Minutes(u32),
}

impl fmt::Display for StressTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StressTimeout::Seconds(s) => write!(f, "{}s", s),
            StressTimeout::Minutes(m) => write!(f, "{}m", m),
        }
    }
}

/// A single randomized disruption applied to one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultAction {
    /// Terminate the container's main process.
    StopContainer,
    /// Forcibly disconnect the container from every attached network.
    StopContainerNetwork,
    /// Busy-load `cpus` workers for `seconds`.
    CpuStress { cpus: u32, seconds: u32 },
    /// Run `instances` memory hogs of `size_mb` each for `seconds`.
    MemoryStress {
        instances: u32,
        size_mb: u32,
        seconds: u32,
    },
    /// Queue an egress delay rule on the container's primary interface.
    ///
    /// The netem rule is additive: applying it again stacks a second
    /// rule on top of the first rather than replacing it.
    NetworkDelay { seconds: u32 },
    /// Run every available stressor at once.
    CombinedStress {
        instances: u32,
        timeout: StressTimeout,
    },
}

impl FaultAction {
    /// Uniformly select one of the six action kinds and sample its
    /// parameters from their documented inclusive bounds.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        match rng.gen_range(0..6) {
            0 => FaultAction::StopContainer,
            1 => FaultAction::StopContainerNetwork,
            2 => FaultAction::CpuStress {
                cpus: rng.gen_range(1..=4),
                seconds: rng.gen_range(5..=15),
            },
            3 => FaultAction::MemoryStress {
                instances: rng.gen_range(1..=4),
                size_mb: rng.gen_range(100..=500),
                seconds: rng.gen_range(5..=15),
            },
            4 => FaultAction::NetworkDelay {
                seconds: rng.gen_range(10..=29),
            },
            _ => FaultAction::CombinedStress {
                instances: rng.gen_range(3..=4),
                timeout: if rng.gen_range(1..=3) == 1 {
                    StressTimeout::Seconds(rng.gen_range(5..=15))
                } else {
                    StressTimeout::Minutes(rng.gen_range(1..=5))
                },
            },
        }
    }

    /// Argv to run inside the container, for the exec-based kinds.
    /// `None` for the kinds applied through orchestrator calls.
    pub fn command(&self) -> Option<Vec<String>> {
        let rendered = match self {
            FaultAction::StopContainer | FaultAction::StopContainerNetwork => return None,
            FaultAction::CpuStress { cpus, seconds } => {
                format!("stress-ng --cpu {} --timeout {}", cpus, seconds)
            }
            FaultAction::MemoryStress {
                instances,
                size_mb,
                seconds,
            } => format!(
                "stress-ng --vm {} --vm-bytes {}M --timeout {}",
                instances, size_mb, seconds
            ),
            FaultAction::NetworkDelay { seconds } => {
                let milliseconds = seconds * 1000;
                format!(
                    "tc qdisc add dev eth0 root netem delay {}ms",
                    milliseconds
                )
            }
            FaultAction::CombinedStress { instances, timeout } => {
                format!("stress-ng --all {} --timeout {}", instances, timeout)
            }
        };

        Some(crate::exec::split_command(&rendered))
    }
}

impl fmt::Display for FaultAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultAction::StopContainer => write!(f, "stop container"),
            FaultAction::StopContainerNetwork => write!(f, "disconnect all networks"),
            FaultAction::CpuStress { cpus, seconds } => {
                write!(f, "cpu stress ({} workers, {}s)", cpus, seconds)
            }
            FaultAction::MemoryStress {
                instances,
                size_mb,
                seconds,
            } => write!(
                f,
                "memory stress ({} x {}MB, {}s)",
                instances, size_mb, seconds
            ),
            FaultAction::NetworkDelay { seconds } => {
                write!(f, "network delay ({}s)", seconds)
            }
            FaultAction::CombinedStress { instances, timeout } => {
                write!(f, "combined stress ({} instances, {})", instances, timeout)
            }
        }
    }
}
