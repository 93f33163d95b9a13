//! Solution model.
//!
//! A solution maps every task to exactly one fog node and carries the
//! aggregate metrics computed by the evaluator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::scheduler::Algorithm;

/// Output of any scheduling strategy.
///
/// `allocations` follows the input task order: `allocations[i]` belongs to
/// the i-th task of the workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Strategy that produced this solution.
    pub algorithm: Algorithm,
    /// Task → node mapping, one entry per task.
    pub allocations: Vec<Allocation>,
    /// Sum of per-task total delay (s).
    pub total_delay: f64,
    /// Sum of per-task energy (J).
    pub total_energy: f64,
    /// Weighted delay + energy objective (lower = better).
    pub objective: f64,
    /// `1 / objective` (higher = better). Zero for an empty workload.
    pub fitness: f64,
    /// Percentage of tasks meeting their deadline, in `[0, 100]`.
    pub reliability: f64,
    /// Best fitness after each optimizer iteration. Empty for baselines.
    pub convergence: Vec<f64>,
}

/// A single task → node placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Task identifier.
    pub task_id: String,
    /// Node identifier.
    pub node_id: String,
    /// Position of the node in the input node list.
    pub node_index: usize,
}

/// Per-task breakdown used for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetail {
    /// Task identifier.
    pub task_id: String,
    /// Resolved node identifier.
    pub node_id: String,
    /// Execution time on the node (s).
    pub execution_time: f64,
    /// Transmission time to the node (s).
    pub transmission_time: f64,
    /// Execution + transmission (s).
    pub total_delay: f64,
    /// Device energy spent (J).
    pub energy: f64,
    /// Whether `total_delay <= max_tolerance_time`.
    pub meets_deadline: bool,
}

impl Allocation {
    /// Creates an allocation.
    pub fn new(task_id: impl Into<String>, node_id: impl Into<String>, node_index: usize) -> Self {
        Self {
            task_id: task_id.into(),
            node_id: node_id.into(),
            node_index,
        }
    }
}

impl Solution {
    /// An empty solution for an empty workload.
    pub fn empty(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            allocations: Vec::new(),
            total_delay: 0.0,
            total_energy: 0.0,
            objective: 0.0,
            fitness: 0.0,
            reliability: 100.0,
            convergence: Vec::new(),
        }
    }

    /// Number of allocated tasks.
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    /// Whether no task is allocated.
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Node assigned to a task.
    pub fn node_for(&self, task_id: &str) -> Option<&str> {
        self.allocations
            .iter()
            .find(|a| a.task_id == task_id)
            .map(|a| a.node_id.as_str())
    }

    /// Node index per task position.
    pub fn assignment(&self) -> Vec<usize> {
        self.allocations.iter().map(|a| a.node_index).collect()
    }

    /// Task ids grouped by node id.
    pub fn tasks_by_node(&self) -> HashMap<&str, Vec<&str>> {
        let mut by_node: HashMap<&str, Vec<&str>> = HashMap::new();
        for a in &self.allocations {
            by_node
                .entry(a.node_id.as_str())
                .or_default()
                .push(a.task_id.as_str());
        }
        by_node
    }

    /// Task → node map keyed by id.
    pub fn as_map(&self) -> HashMap<&str, &str> {
        self.allocations
            .iter()
            .map(|a| (a.task_id.as_str(), a.node_id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Solution {
        Solution {
            algorithm: Algorithm::RoundRobin,
            allocations: vec![
                Allocation::new("T1", "F1", 0),
                Allocation::new("T2", "F2", 1),
                Allocation::new("T3", "F1", 0),
            ],
            total_delay: 6.0,
            total_energy: 1.5,
            objective: 6.0,
            fitness: 1.0 / 6.0,
            reliability: 66.7,
            convergence: Vec::new(),
        }
    }

    #[test]
    fn test_lookup() {
        let s = sample();
        assert_eq!(s.len(), 3);
        assert_eq!(s.node_for("T2"), Some("F2"));
        assert_eq!(s.node_for("T9"), None);
        assert_eq!(s.assignment(), vec![0, 1, 0]);
    }

    #[test]
    fn test_grouping() {
        let s = sample();
        let by_node = s.tasks_by_node();
        assert_eq!(by_node["F1"], vec!["T1", "T3"]);
        assert_eq!(by_node["F2"], vec!["T2"]);
        assert_eq!(s.as_map()["T3"], "F1");
    }

    #[test]
    fn test_empty_solution() {
        let s = Solution::empty(Algorithm::Hh);
        assert!(s.is_empty());
        assert!((s.reliability - 100.0).abs() < 1e-12);
        assert!((s.fitness - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_serde_uses_kebab_case_algorithm() {
        let s = sample();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"round-robin\""));
        let back: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
