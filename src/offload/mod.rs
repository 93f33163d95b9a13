//! Three-tier (device / fog / cloud) offloading.
//!
//! [`OffloadEngine::decide`] places a single task; [`OffloadEngine::plan`]
//! places a whole workload and aggregates an [`OffloadReport`].
//!
//! # Decision rules (first match wins)
//!
//! | # | Condition | Placement |
//! |---|-----------|-----------|
//! | 0 | `data_size <= local_data_threshold` and the device has a CPU | local |
//! | 1 | no usable fog node meets the deadline, cloud available, upload affordable | cloud |
//! | 2 | no usable fog node, cloud available | cloud |
//! | 3 | usable fog exists | fog node with the least total delay |
//! | 4 | fog nodes exist | least-loaded fog node (logged as a fallback) |
//!
//! A fog node is usable while `current_load < fog_load_threshold`.
//!
//! # Fog pass
//! When [`OffloadConfig::fog_algorithm`] is set, the fog-bound tasks are
//! rescheduled by that strategy over the usable fog nodes, replacing the
//! per-task greedy choice.

mod decision;

pub use decision::{OffloadDecision, OffloadReason, Placement};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::cost;
use crate::error::{Result, ScheduleError};
use crate::models::{Allocation, CloudNode, FogNode, Task, TerminalDevice, Workload};
use crate::problem::Problem;
use crate::scheduler::{self, Algorithm};
use crate::validation::validate_workload;

/// Offloading parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct OffloadConfig {
    /// Fog nodes at or above this load are unusable (default: 0.9).
    pub fog_load_threshold: f64,
    /// Tasks up to this size (Mb) stay on devices that can compute.
    pub local_data_threshold: Option<f64>,
    /// Strategy for the fog pass.
    pub fog_algorithm: Option<Algorithm>,
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            fog_load_threshold: 0.9,
            local_data_threshold: None,
            fog_algorithm: None,
        }
    }
}

/// Aggregate result of an offloading pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffloadReport {
    /// Fog-tier placements.
    pub fog_allocations: Vec<Allocation>,
    /// Ids of tasks sent to the cloud.
    pub cloud_offloaded: Vec<String>,
    /// Ids of tasks kept on their device.
    pub local_processed: Vec<String>,
    /// Sum of estimated delays of fog placements (s).
    pub total_fog_delay: f64,
    /// Sum of estimated delays of cloud placements (s).
    pub total_cloud_delay: f64,
    /// Sum of estimated delays of local placements (s).
    pub total_local_delay: f64,
    /// Sum of cloud bills.
    pub total_cost: f64,
    /// One decision per input task, in input order.
    pub decisions: Vec<OffloadDecision>,
}

impl OffloadReport {
    /// Number of placed tasks across all tiers.
    pub fn task_count(&self) -> usize {
        self.fog_allocations.len() + self.cloud_offloaded.len() + self.local_processed.len()
    }

    /// Decision for a task.
    pub fn decision(&self, task_id: &str) -> Option<&OffloadDecision> {
        self.decisions.iter().find(|d| d.task_id == task_id)
    }

    fn from_decisions(decisions: Vec<OffloadDecision>) -> Self {
        let mut report = Self::default();
        for d in &decisions {
            match &d.placement {
                Placement::Local => {
                    report.local_processed.push(d.task_id.clone());
                    report.total_local_delay += d.estimated_delay;
                }
                Placement::Fog {
                    node_id,
                    node_index,
                } => {
                    report
                        .fog_allocations
                        .push(Allocation::new(&d.task_id, node_id, *node_index));
                    report.total_fog_delay += d.estimated_delay;
                }
                Placement::Cloud { .. } => {
                    report.cloud_offloaded.push(d.task_id.clone());
                    report.total_cloud_delay += d.estimated_delay;
                }
            }
            report.total_cost += d.estimated_cost.unwrap_or(0.0);
        }
        report.decisions = decisions;
        report
    }
}

/// Places tasks across device, fog and cloud tiers.
///
/// # Example
/// ```
/// use fog_schedule::config::EngineConfig;
/// use fog_schedule::models::{CloudNode, FogNode, Task, TerminalDevice, Workload};
/// use fog_schedule::offload::OffloadEngine;
///
/// let workload = Workload::new(
///     vec![
///         Task::new("quick", 1.0, 100.0, 5.0).with_device("D"),
///         Task::new("heavy", 10.0, 500.0, 5.0).with_device("D"),
///     ],
///     vec![FogNode::new("F1", 2.0e9, 50.0)],
///     vec![TerminalDevice::fixed("D", 1.0, 0.1)],
/// )
/// .with_cloud(CloudNode::new("cloud", 5.0e10, 100.0, 0.2, 0.001));
///
/// let report = OffloadEngine::new(EngineConfig::default()).plan(&workload).unwrap();
/// assert_eq!(report.fog_allocations.len(), 1);
/// assert_eq!(report.cloud_offloaded, vec!["heavy".to_string()]);
/// assert!(report.total_cost > 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OffloadEngine {
    engine: EngineConfig,
    config: OffloadConfig,
}

impl OffloadEngine {
    /// Creates an engine; offloading parameters are derived from `engine`.
    pub fn new(engine: EngineConfig) -> Self {
        let config = engine.offload();
        Self { engine, config }
    }

    /// Offloading parameters in use.
    pub fn config(&self) -> &OffloadConfig {
        &self.config
    }

    /// Places a single task.
    ///
    /// `cloud` is ignored unless it is available.
    ///
    /// # Errors
    /// - [`ScheduleError::NoResourcesAvailable`] when there is neither a fog
    ///   node nor an available cloud (and the task does not stay local)
    /// - [`ScheduleError::Domain`] for non-positive numeric inputs
    pub fn decide(
        &self,
        task: &Task,
        fog_nodes: &[FogNode],
        device: &TerminalDevice,
        cloud: Option<&CloudNode>,
    ) -> Result<OffloadDecision> {
        if let Some(decision) = self.decide_local(task, device) {
            return Ok(decision);
        }

        let cloud = cloud.filter(|c| c.available);
        let threshold = self.config.fog_load_threshold;

        let mut best_fog: Option<(usize, f64)> = None;
        for (n, node) in fog_nodes.iter().enumerate() {
            if !node.is_usable(threshold) {
                continue;
            }
            let delay = cost::total_delay(task, node)?;
            if best_fog.is_none_or(|(_, best)| delay < best) {
                best_fog = Some((n, delay));
            }
        }

        match (best_fog, cloud) {
            (Some((_, delay)), Some(cloud)) if delay > task.max_tolerance_time => {
                let upload = cost::transmission_energy(task, cloud, device)?;
                if device.can_afford(upload) {
                    return cloud_decision(task, cloud, device, OffloadReason::FogMissesDeadline);
                }
                debug!(task = %task.id, upload, "cloud upload unaffordable, staying in fog");
            }
            (None, Some(cloud)) => {
                return cloud_decision(task, cloud, device, OffloadReason::FogSaturated);
            }
            _ => {}
        }

        if let Some((n, delay)) = best_fog {
            let reason = if delay <= task.max_tolerance_time {
                OffloadReason::FogMeetsDeadline
            } else {
                OffloadReason::FogBestEffort
            };
            return fog_decision(task, fog_nodes, n, device, reason);
        }

        let least_loaded = fog_nodes
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.current_load.total_cmp(&b.1.current_load))
            .map(|(n, _)| n)
            .ok_or(ScheduleError::NoResourcesAvailable { tasks: 1 })?;
        warn!(
            task = %task.id,
            node = %fog_nodes[least_loaded].id,
            load = fog_nodes[least_loaded].current_load,
            "no usable fog node and no cloud, falling back to least-loaded node"
        );
        fog_decision(task, fog_nodes, least_loaded, device, OffloadReason::FallbackLeastLoaded)
    }

    fn decide_local(&self, task: &Task, device: &TerminalDevice) -> Option<OffloadDecision> {
        let (Some(threshold), Some(hz)) =
            (self.config.local_data_threshold, device.computing_resource)
        else {
            return None;
        };
        if task.data_size > threshold || !(hz.is_finite() && hz > 0.0) {
            return None;
        }
        let execution = task.cycles() / hz;
        Some(OffloadDecision {
            task_id: task.id.clone(),
            placement: Placement::Local,
            reason: OffloadReason::LocalSmallTask,
            estimated_delay: execution,
            estimated_energy: execution * device.idle_power,
            estimated_cost: None,
        })
    }

    /// Places every task of `workload`.
    ///
    /// # Errors
    /// - [`ScheduleError::NoResourcesAvailable`] when some task cannot stay
    ///   on its device and there is no fog node and no available cloud
    /// - [`ScheduleError::Domain`] / [`ScheduleError::InvalidWorkload`] for bad input
    pub fn plan(&self, workload: &Workload) -> Result<OffloadReport> {
        validate_workload(workload).map_err(ScheduleError::from_validation)?;
        let cloud = workload.available_cloud();
        let devices: HashMap<&str, &TerminalDevice> =
            workload.devices.iter().map(|d| (d.id.as_str(), d)).collect();

        if workload.fog_nodes.is_empty() && cloud.is_none() {
            let remote = workload
                .tasks
                .iter()
                .filter(|task| {
                    devices
                        .get(task.device_id.as_str())
                        .is_none_or(|device| self.decide_local(task, device).is_none())
                })
                .count();
            if remote > 0 {
                return Err(ScheduleError::NoResourcesAvailable { tasks: remote });
            }
        }

        let mut decisions = workload
            .tasks
            .iter()
            .map(|task| {
                let device = devices.get(task.device_id.as_str()).ok_or_else(|| {
                    ScheduleError::domain(format!("task '{}' has no device", task.id))
                })?;
                self.decide(task, &workload.fog_nodes, device, cloud)
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(algorithm) = self.config.fog_algorithm {
            self.fog_pass(workload, algorithm, &mut decisions)?;
        }

        let report = OffloadReport::from_decisions(decisions);
        info!(
            tasks = workload.tasks.len(),
            fog = report.fog_allocations.len(),
            cloud = report.cloud_offloaded.len(),
            local = report.local_processed.len(),
            total_cost = report.total_cost,
            "offload plan finished"
        );
        Ok(report)
    }

    /// Reschedules the fog-bound tasks with `algorithm` over the usable fog nodes.
    fn fog_pass(
        &self,
        workload: &Workload,
        algorithm: Algorithm,
        decisions: &mut [OffloadDecision],
    ) -> Result<()> {
        let fog_bound: Vec<usize> = decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.placement.is_fog())
            .map(|(t, _)| t)
            .collect();
        if fog_bound.is_empty() {
            return Ok(());
        }

        let threshold = self.config.fog_load_threshold;
        let mut node_map: Vec<usize> = workload
            .fog_nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_usable(threshold))
            .map(|(i, _)| i)
            .collect();
        if node_map.is_empty() {
            // only fallback placements are fog-bound; keep them on every node
            node_map = (0..workload.fog_nodes.len()).collect();
        }

        let tasks: Vec<Task> = fog_bound.iter().map(|&t| workload.tasks[t].clone()).collect();
        let nodes: Vec<FogNode> = node_map.iter().map(|&n| workload.fog_nodes[n].clone()).collect();
        let problem = Problem::new(&tasks, &nodes, &workload.devices)?;
        let solution = scheduler::solve(&problem, algorithm, &self.engine, &mut self.engine.rng())?;
        debug!(
            %algorithm,
            tasks = tasks.len(),
            nodes = nodes.len(),
            objective = solution.objective,
            "fog pass finished"
        );

        for (k, allocation) in solution.allocations.iter().enumerate() {
            let n = allocation.node_index;
            let original = node_map[n];
            decisions[fog_bound[k]] = OffloadDecision {
                task_id: allocation.task_id.clone(),
                placement: Placement::Fog {
                    node_id: workload.fog_nodes[original].id.clone(),
                    node_index: original,
                },
                reason: OffloadReason::Rescheduled(algorithm),
                estimated_delay: problem.delay(k, n),
                estimated_energy: problem.energy(k, n),
                estimated_cost: None,
            };
        }
        Ok(())
    }
}

fn fog_decision(
    task: &Task,
    fog_nodes: &[FogNode],
    n: usize,
    device: &TerminalDevice,
    reason: OffloadReason,
) -> Result<OffloadDecision> {
    let node = &fog_nodes[n];
    Ok(OffloadDecision {
        task_id: task.id.clone(),
        placement: Placement::Fog {
            node_id: node.id.clone(),
            node_index: n,
        },
        reason,
        estimated_delay: cost::total_delay(task, node)?,
        estimated_energy: cost::energy_consumption(task, node, device)?,
        estimated_cost: None,
    })
}

fn cloud_decision(
    task: &Task,
    cloud: &CloudNode,
    device: &TerminalDevice,
    reason: OffloadReason,
) -> Result<OffloadDecision> {
    Ok(OffloadDecision {
        task_id: task.id.clone(),
        placement: Placement::Cloud {
            cloud_id: cloud.id.clone(),
        },
        reason,
        estimated_delay: cost::total_delay(task, cloud)?,
        estimated_energy: cost::energy_consumption(task, cloud, device)?,
        estimated_cost: Some(task.billing_units() * cloud.cost_per_unit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::WorkloadGenerator;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn cloud() -> CloudNode {
        CloudNode::new("cloud", 5.0e10, 100.0, 0.2, 0.001)
    }

    fn engine() -> OffloadEngine {
        OffloadEngine::new(EngineConfig::default())
    }

    #[test]
    fn test_fog_meets_deadline() {
        // F1: 0.4 + 0.02 s
        let task = Task::new("T", 1.0, 100.0, 1.0).with_device("D");
        let nodes = vec![FogNode::new("F0", 0.5e9, 50.0), FogNode::new("F1", 2.0e9, 50.0)];
        let device = TerminalDevice::fixed("D", 1.0, 0.1);
        let d = engine().decide(&task, &nodes, &device, Some(&cloud())).unwrap();

        assert_eq!(d.reason, OffloadReason::FogMeetsDeadline);
        assert_eq!(d.placement.node_id(), Some("F1"));
        assert!((d.estimated_delay - 0.42).abs() < 1e-9);
        assert!(d.estimated_cost.is_none());
    }

    #[test]
    fn test_deadline_miss_goes_to_cloud() {
        // fog: 20 s, cloud: 0.8 + 0.1 + 0.2 s
        let task = Task::new("T", 10.0, 500.0, 5.0).with_device("D");
        let nodes = vec![FogNode::new("F", 2.0e9, 50.0)];
        let device = TerminalDevice::mobile("D", 0.5, 0.1, 100.0);
        let d = engine().decide(&task, &nodes, &device, Some(&cloud())).unwrap();

        assert_eq!(d.reason, OffloadReason::FogMissesDeadline);
        assert!(d.placement.is_cloud());
        assert!((d.estimated_delay - 1.1).abs() < 1e-9);
        assert!((d.estimated_cost.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_unaffordable_upload_stays_in_fog() {
        let task = Task::new("T", 10.0, 500.0, 5.0).with_device("D");
        let nodes = vec![FogNode::new("F", 2.0e9, 50.0)];
        // upload to cloud costs 0.1 s * 0.5 W = 0.05 J
        let device = TerminalDevice::mobile("D", 0.5, 0.1, 0.01);
        let d = engine().decide(&task, &nodes, &device, Some(&cloud())).unwrap();
        assert_eq!(d.reason, OffloadReason::FogBestEffort);
        assert!(d.placement.is_fog());
    }

    #[test]
    fn test_saturated_fog_goes_to_cloud() {
        let task = Task::new("T", 1.0, 100.0, 10.0).with_device("D");
        let nodes = vec![FogNode::new("F", 2.0e9, 50.0).with_load(0.95)];
        let device = TerminalDevice::fixed("D", 1.0, 0.1);
        let d = engine().decide(&task, &nodes, &device, Some(&cloud())).unwrap();
        assert_eq!(d.reason, OffloadReason::FogSaturated);
        assert!(d.estimated_cost.unwrap() > 0.0);
    }

    #[test]
    fn test_fallback_without_cloud() {
        let task = Task::new("T", 1.0, 100.0, 10.0).with_device("D");
        let nodes = vec![
            FogNode::new("busy", 2.0e9, 50.0).with_load(0.99),
            FogNode::new("less", 1.0e9, 50.0).with_load(0.92),
        ];
        let device = TerminalDevice::fixed("D", 1.0, 0.1);
        let unavailable = cloud().with_available(false);
        let d = engine().decide(&task, &nodes, &device, Some(&unavailable)).unwrap();
        assert_eq!(d.reason, OffloadReason::FallbackLeastLoaded);
        assert_eq!(d.placement.node_id(), Some("less"));

        let err = engine().decide(&task, &[], &device, None).unwrap_err();
        assert_eq!(err, ScheduleError::NoResourcesAvailable { tasks: 1 });
    }

    #[test]
    fn test_local_tier() {
        let engine = OffloadEngine::new(EngineConfig::default().with_local_data_threshold(2.0));
        let nodes = vec![FogNode::new("F", 2.0e9, 50.0)];
        let capable = TerminalDevice::fixed("D", 1.0, 0.1).with_computing_resource(1.0e9);

        let small = Task::new("small", 1.0, 100.0, 10.0).with_device("D");
        let d = engine.decide(&small, &nodes, &capable, None).unwrap();
        assert!(d.placement.is_local());
        assert!((d.estimated_delay - 0.8).abs() < 1e-9);

        let big = Task::new("big", 3.0, 100.0, 10.0).with_device("D");
        assert!(engine.decide(&big, &nodes, &capable, None).unwrap().placement.is_fog());

        let plain = TerminalDevice::fixed("D", 1.0, 0.1);
        assert!(engine.decide(&small, &nodes, &plain, None).unwrap().placement.is_fog());
    }

    fn three_tier_workload() -> Workload {
        Workload::new(
            vec![
                // 1 Mb on a 1 GHz device: 0.8 s locally
                Task::new("local", 1.0, 100.0, 10.0).with_device("cpu"),
                // F0: 0.8 + 0.04 s
                Task::new("fog", 2.0, 100.0, 10.0).with_device("phone"),
                // F0: 20 + 0.2 s misses 5 s; cloud: 0.8 + 0.1 + 0.2 s
                Task::new("heavy", 10.0, 500.0, 5.0).with_device("phone"),
                // over the local threshold; F0: 1.2 + 0.06 s
                Task::new("bulk", 3.0, 100.0, 10.0).with_device("cpu"),
            ],
            vec![
                FogNode::new("F0", 2.0e9, 50.0).with_load(0.2),
                FogNode::new("F1", 1.0e9, 50.0).with_load(0.95),
            ],
            vec![
                TerminalDevice::fixed("cpu", 1.0, 0.1).with_computing_resource(1.0e9),
                TerminalDevice::mobile("phone", 0.5, 0.1, 100.0),
            ],
        )
        .with_cloud(cloud())
    }

    fn tier_delay(report: &OffloadReport, tier: fn(&Placement) -> bool) -> f64 {
        report
            .decisions
            .iter()
            .filter(|d| tier(&d.placement))
            .map(|d| d.estimated_delay)
            .sum()
    }

    #[test]
    fn test_plan_accounting() {
        let workload = three_tier_workload();
        let engine = OffloadEngine::new(EngineConfig::default().with_local_data_threshold(1.5));
        let report = engine.plan(&workload).unwrap();

        assert_eq!(report.local_processed, vec!["local".to_string()]);
        assert_eq!(report.cloud_offloaded, vec!["heavy".to_string()]);
        let fog_tasks: Vec<&str> =
            report.fog_allocations.iter().map(|a| a.task_id.as_str()).collect();
        assert_eq!(fog_tasks, vec!["fog", "bulk"]);
        for a in &report.fog_allocations {
            assert_eq!((a.node_id.as_str(), a.node_index), ("F0", 0));
        }
        let heavy = report.decision("heavy").unwrap();
        assert_eq!(heavy.reason, OffloadReason::FogMissesDeadline);

        assert_eq!(report.task_count(), workload.tasks.len());
        assert_eq!(report.decisions.len(), workload.tasks.len());
        for (task, decision) in workload.tasks.iter().zip(&report.decisions) {
            assert_eq!(task.id, decision.task_id);
        }
        for id in &report.cloud_offloaded {
            assert!(report.decision(id).unwrap().estimated_cost.unwrap() > 0.0);
        }
        let cost: f64 = report.decisions.iter().filter_map(|d| d.estimated_cost).sum();
        assert!(cost > 0.0);
        assert!((cost - report.total_cost).abs() < 1e-9);

        let local_delay = tier_delay(&report, Placement::is_local);
        let fog_delay = tier_delay(&report, Placement::is_fog);
        let cloud_delay = tier_delay(&report, Placement::is_cloud);
        assert!((report.total_local_delay - local_delay).abs() < 1e-9);
        assert!((report.total_fog_delay - fog_delay).abs() < 1e-9);
        assert!((report.total_cloud_delay - cloud_delay).abs() < 1e-9);
        assert!((report.total_local_delay - 0.8).abs() < 1e-9);
        assert!((report.total_fog_delay - (0.84 + 1.26)).abs() < 1e-9);
        assert!((report.total_cloud_delay - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_plan_local_only_needs_no_upstream() {
        let engine = OffloadEngine::new(EngineConfig::default().with_local_data_threshold(2.0));
        let device = TerminalDevice::fixed("D", 1.0, 0.1).with_computing_resource(1.0e9);
        let workload = Workload::new(
            vec![Task::new("T", 1.0, 100.0, 10.0).with_device("D")],
            Vec::new(),
            vec![device.clone()],
        );
        let report = engine.plan(&workload).unwrap();
        assert_eq!(report.local_processed, vec!["T".to_string()]);
        assert_eq!(report.task_count(), 1);

        let mixed = Workload::new(
            vec![
                Task::new("T", 1.0, 100.0, 10.0).with_device("D"),
                Task::new("big", 5.0, 100.0, 10.0).with_device("D"),
            ],
            Vec::new(),
            vec![device],
        );
        let err = engine.plan(&mixed).unwrap_err();
        assert_eq!(err, ScheduleError::NoResourcesAvailable { tasks: 1 });
    }

    #[test]
    fn test_plan_cloud_only() {
        let workload = Workload::new(
            vec![Task::new("T", 1.0, 100.0, 10.0).with_device("D")],
            Vec::new(),
            vec![TerminalDevice::fixed("D", 1.0, 0.1)],
        );
        let err = engine().plan(&workload).unwrap_err();
        assert_eq!(err, ScheduleError::NoResourcesAvailable { tasks: 1 });

        let report = engine().plan(&workload.with_cloud(cloud())).unwrap();
        assert_eq!(report.cloud_offloaded, vec!["T".to_string()]);
        assert!(report.fog_allocations.is_empty());
    }

    #[test]
    fn test_plan_with_fog_pass() {
        let workload = WorkloadGenerator::new(30, 5, 6)
            .with_cloud(false)
            .generate(&mut SmallRng::seed_from_u64(12));
        let engine = OffloadEngine::new(
            EngineConfig::default()
                .with_offload_algorithm(Algorithm::RoundRobin)
                .with_seed(1),
        );
        let report = engine.plan(&workload).unwrap();

        assert_eq!(report.fog_allocations.len(), 30);
        assert!(report
            .decisions
            .iter()
            .all(|d| d.reason == OffloadReason::Rescheduled(Algorithm::RoundRobin)));
        // usable nodes only (generated loads stay below the threshold)
        let used: std::collections::HashSet<&str> =
            report.fog_allocations.iter().map(|a| a.node_id.as_str()).collect();
        assert_eq!(used.len(), 5);
        for a in &report.fog_allocations {
            assert_eq!(workload.fog_nodes[a.node_index].id, a.node_id);
        }
    }

    #[test]
    fn test_plan_empty() {
        let report = engine().plan(&Workload::default()).unwrap();
        assert!(report.decisions.is_empty());
        assert_eq!(report.total_cost, 0.0);
    }
}
