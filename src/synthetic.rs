//! Seeded synthetic workloads for tests and benchmarks.
//!
//! # Ranges
//!
//! | Field | Range |
//! |-------|-------|
//! | Task data size | 1–20 Mb |
//! | Computation intensity | 100–500 cycles/bit |
//! | Deadline | 1.5–4× the delay on a 2.5 GHz / 50 Mbps reference node |
//! | Fog CPU rate | 1–4 GHz |
//! | Fog bandwidth | 20–100 Mbps |
//! | Fog load | 0–0.8 |
//! | Devices | even index mobile (0.7/0.3 weights), odd index fixed |
//!
//! The cloud, when enabled, is a 10 GHz node behind a 50 Mbps WAN with a
//! 0.5 s latency penalty.

use rand::Rng;

use crate::models::{CloudNode, FogNode, Task, TerminalDevice, Workload, MAX_PRIORITY, MIN_PRIORITY};

const REFERENCE_HZ: f64 = 2.5e9;
const REFERENCE_MBPS: f64 = 50.0;

/// Generates random workloads of a fixed shape.
///
/// # Example
/// ```
/// use fog_schedule::synthetic::WorkloadGenerator;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let workload = WorkloadGenerator::new(50, 10, 20).generate(&mut StdRng::seed_from_u64(7));
/// assert_eq!(workload.tasks.len(), 50);
/// assert_eq!(workload.fog_nodes.len(), 10);
/// assert!(workload.cloud.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    task_count: usize,
    node_count: usize,
    device_count: usize,
    cloud: bool,
    max_load: f64,
}

impl Default for WorkloadGenerator {
    fn default() -> Self {
        Self::new(50, 10, 20)
    }
}

impl WorkloadGenerator {
    /// A generator for `tasks` tasks, `nodes` fog nodes and `devices` devices.
    ///
    /// At least one device is always generated so every task has an origin.
    pub fn new(tasks: usize, nodes: usize, devices: usize) -> Self {
        Self {
            task_count: tasks,
            node_count: nodes,
            device_count: devices.max(1),
            cloud: true,
            max_load: 0.8,
        }
    }

    /// Enables or disables the cloud tier.
    pub fn with_cloud(mut self, cloud: bool) -> Self {
        self.cloud = cloud;
        self
    }

    /// Sets the upper bound of generated fog loads, clamped to `[0, 1]`.
    pub fn with_max_load(mut self, max_load: f64) -> Self {
        self.max_load = max_load.clamp(0.0, 1.0);
        self
    }

    /// Draws a workload.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Workload {
        let devices: Vec<TerminalDevice> = (0..self.device_count)
            .map(|i| {
                let id = format!("D{i}");
                let tx = rng.random_range(0.1..1.0);
                let idle = rng.random_range(0.01..0.1);
                if i % 2 == 0 {
                    TerminalDevice::mobile(id, tx, idle, rng.random_range(500.0..5000.0))
                } else {
                    TerminalDevice::fixed(id, tx, idle)
                        .with_computing_resource(rng.random_range(0.5e9..1.0e9))
                }
            })
            .collect();

        let fog_nodes = (0..self.node_count)
            .map(|i| {
                let load = if self.max_load > 0.0 {
                    rng.random_range(0.0..=self.max_load)
                } else {
                    0.0
                };
                FogNode::new(
                    format!("F{i}"),
                    rng.random_range(1.0e9..4.0e9),
                    rng.random_range(20.0..100.0),
                )
                .with_storage(rng.random_range(100.0..1000.0))
                .with_load(load)
            })
            .collect();

        let tasks = (0..self.task_count)
            .map(|i| {
                let size: f64 = rng.random_range(1.0..20.0);
                let intensity: f64 = rng.random_range(100.0..500.0);
                let reference = size * 1e6 * 8.0 * intensity / REFERENCE_HZ + size / REFERENCE_MBPS;
                let deadline = reference * rng.random_range(1.5..4.0);
                let device = &devices[rng.random_range(0..devices.len())];
                Task::new(format!("T{i}"), size, intensity, deadline)
                    .with_device(device.id.clone())
                    .with_priority(rng.random_range(MIN_PRIORITY..=MAX_PRIORITY))
            })
            .collect();

        let mut workload = Workload::new(tasks, fog_nodes, devices);
        if self.cloud {
            workload = workload.with_cloud(CloudNode::new("cloud", 1.0e10, 50.0, 0.5, 0.001));
        }
        workload
    }
}
