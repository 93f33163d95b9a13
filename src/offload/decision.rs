//! Offload decision records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scheduler::Algorithm;

/// Tier a task ends up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "kebab-case")]
pub enum Placement {
    /// Processed on the originating device.
    Local,
    /// Processed on a fog node.
    Fog {
        /// Fog node id.
        node_id: String,
        /// Position of the node in the workload's fog node list.
        node_index: usize,
    },
    /// Offloaded to the cloud.
    Cloud {
        /// Cloud id.
        cloud_id: String,
    },
}

impl Placement {
    /// Whether the task stays on its device.
    pub fn is_local(&self) -> bool {
        matches!(self, Placement::Local)
    }

    /// Whether the task runs in the fog tier.
    pub fn is_fog(&self) -> bool {
        matches!(self, Placement::Fog { .. })
    }

    /// Whether the task is offloaded to the cloud.
    pub fn is_cloud(&self) -> bool {
        matches!(self, Placement::Cloud { .. })
    }

    /// Id of the executing node (`None` for local processing).
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Placement::Local => None,
            Placement::Fog { node_id, .. } => Some(node_id),
            Placement::Cloud { cloud_id } => Some(cloud_id),
        }
    }
}

/// Why a placement was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OffloadReason {
    /// Small task on a device with its own CPU.
    LocalSmallTask,
    /// No usable fog node meets the deadline and the device can afford the upload.
    FogMissesDeadline,
    /// Every fog node is at or above the load threshold (or there is none).
    FogSaturated,
    /// Best usable fog node meets the deadline.
    FogMeetsDeadline,
    /// Best usable fog node, deadline missed but the cloud was not an option.
    FogBestEffort,
    /// Nothing usable and no cloud: least-loaded fog node.
    FallbackLeastLoaded,
    /// Fog placement revised by a fog scheduling pass.
    Rescheduled(Algorithm),
}

impl fmt::Display for OffloadReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffloadReason::LocalSmallTask => f.write_str("small task processed on the device"),
            OffloadReason::FogMissesDeadline => {
                f.write_str("no usable fog node meets the deadline; offloaded to cloud")
            }
            OffloadReason::FogSaturated => {
                f.write_str("all fog nodes over the load threshold; offloaded to cloud")
            }
            OffloadReason::FogMeetsDeadline => f.write_str("best fog node meets the deadline"),
            OffloadReason::FogBestEffort => {
                f.write_str("best fog node; deadline missed and cloud not an option")
            }
            OffloadReason::FallbackLeastLoaded => {
                f.write_str("no usable fog node and no cloud; least-loaded fog node")
            }
            OffloadReason::Rescheduled(algorithm) => write!(f, "placed by {algorithm} fog pass"),
        }
    }
}

/// Placement of one task with its estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffloadDecision {
    /// Task identifier.
    pub task_id: String,
    /// Chosen tier and node.
    pub placement: Placement,
    /// Rule that produced the placement.
    pub reason: OffloadReason,
    /// Expected total delay (s).
    pub estimated_delay: f64,
    /// Device energy (J).
    pub estimated_energy: f64,
    /// Cloud bill. Set for cloud placements only.
    pub estimated_cost: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_accessors() {
        let fog = Placement::Fog {
            node_id: "F1".into(),
            node_index: 0,
        };
        assert!(fog.is_fog());
        assert_eq!(fog.node_id(), Some("F1"));
        assert!(Placement::Local.is_local());
        assert_eq!(Placement::Local.node_id(), None);
        let cloud = Placement::Cloud {
            cloud_id: "C".into(),
        };
        assert!(cloud.is_cloud());
        assert_eq!(cloud.node_id(), Some("C"));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Placement::Cloud {
            cloud_id: "C".into(),
        })
        .unwrap();
        assert_eq!(json["tier"], "cloud");
        assert_eq!(json["cloud_id"], "C");

        let reason = serde_json::to_value(OffloadReason::FogSaturated).unwrap();
        assert_eq!(reason, "fog-saturated");
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(
            OffloadReason::Rescheduled(Algorithm::MinMin).to_string(),
            "placed by min-min fog pass"
        );
    }
}
