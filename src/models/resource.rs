//! Compute resources: fog nodes and the optional cloud.
//!
//! Both tiers price tasks through the same [`ComputeNode`] trait, so the
//! cost model has a single implementation for either.

use serde::{Deserialize, Serialize};

/// Anything that can execute a task: a CPU rate and an uplink.
pub trait ComputeNode {
    /// Node identifier.
    fn id(&self) -> &str;

    /// CPU rate in Hz (cycles per second).
    fn computing_resource(&self) -> f64;

    /// Uplink bandwidth in Mbps.
    fn network_bandwidth(&self) -> f64;

    /// Fixed delay added to every task executed here (s).
    fn latency_penalty(&self) -> f64 {
        0.0
    }
}

/// A fog node between terminal devices and the cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FogNode {
    /// Unique node identifier.
    pub id: String,
    /// CPU rate (Hz).
    pub computing_resource: f64,
    /// Storage capacity. Advisory, not used by the cost model.
    pub storage_capacity: f64,
    /// Uplink bandwidth (Mbps).
    pub network_bandwidth: f64,
    /// Current utilization in `[0, 1]`.
    pub current_load: f64,
}

impl FogNode {
    /// Creates an idle fog node.
    pub fn new(id: impl Into<String>, computing_resource: f64, network_bandwidth: f64) -> Self {
        Self {
            id: id.into(),
            computing_resource,
            storage_capacity: 0.0,
            network_bandwidth,
            current_load: 0.0,
        }
    }

    /// Sets the current load, clamped to `[0, 1]`.
    pub fn with_load(mut self, load: f64) -> Self {
        self.current_load = load.clamp(0.0, 1.0);
        self
    }

    /// Sets the storage capacity.
    pub fn with_storage(mut self, capacity: f64) -> Self {
        self.storage_capacity = capacity;
        self
    }

    /// Whether the node is below the given load threshold.
    #[inline]
    pub fn is_usable(&self, load_threshold: f64) -> bool {
        self.current_load < load_threshold
    }
}

impl ComputeNode for FogNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn computing_resource(&self) -> f64 {
        self.computing_resource
    }

    fn network_bandwidth(&self) -> f64 {
        self.network_bandwidth
    }
}

/// The cloud tier: fast but remote and billed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudNode {
    /// Cloud identifier.
    pub id: String,
    /// CPU rate (Hz).
    pub computing_resource: f64,
    /// WAN bandwidth (Mbps).
    pub network_bandwidth: f64,
    /// Fixed WAN latency added to every offloaded task (s).
    pub latency_penalty: f64,
    /// Monetary cost per unit of `data_size * computation_intensity`.
    pub cost_per_unit: f64,
    /// Whether the cloud currently accepts work.
    pub available: bool,
}

impl CloudNode {
    /// Creates an available cloud node.
    pub fn new(
        id: impl Into<String>,
        computing_resource: f64,
        network_bandwidth: f64,
        latency_penalty: f64,
        cost_per_unit: f64,
    ) -> Self {
        Self {
            id: id.into(),
            computing_resource,
            network_bandwidth,
            latency_penalty,
            cost_per_unit,
            available: true,
        }
    }

    /// Sets availability.
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }
}

impl ComputeNode for CloudNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn computing_resource(&self) -> f64 {
        self.computing_resource
    }

    fn network_bandwidth(&self) -> f64 {
        self.network_bandwidth
    }

    fn latency_penalty(&self) -> f64 {
        self.latency_penalty
    }
}
