//! Workload container.

use serde::{Deserialize, Serialize};

use super::{CloudNode, FogNode, Task, TerminalDevice};

/// Everything a scheduling call needs: tasks, candidate nodes, devices and
/// an optional cloud tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    /// Tasks to place.
    pub tasks: Vec<Task>,
    /// Candidate fog nodes.
    pub fog_nodes: Vec<FogNode>,
    /// Devices originating the tasks.
    pub devices: Vec<TerminalDevice>,
    /// Optional cloud tier.
    pub cloud: Option<CloudNode>,
}

impl Workload {
    /// Creates a fog-only workload.
    pub fn new(tasks: Vec<Task>, fog_nodes: Vec<FogNode>, devices: Vec<TerminalDevice>) -> Self {
        Self {
            tasks,
            fog_nodes,
            devices,
            cloud: None,
        }
    }

    /// Adds a cloud tier.
    pub fn with_cloud(mut self, cloud: CloudNode) -> Self {
        self.cloud = Some(cloud);
        self
    }

    /// Looks up a device by id.
    pub fn device(&self, id: &str) -> Option<&TerminalDevice> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Looks up a fog node by id.
    pub fn fog_node(&self, id: &str) -> Option<&FogNode> {
        self.fog_nodes.iter().find(|n| n.id == id)
    }

    /// The cloud, if present and accepting work.
    pub fn available_cloud(&self) -> Option<&CloudNode> {
        self.cloud.as_ref().filter(|c| c.available)
    }
}
