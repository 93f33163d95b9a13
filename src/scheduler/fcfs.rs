//! First-Come-First-Served scheduler.
//!
//! FCFS only fixes the *order* in which tasks are placed (input order). The
//! node each task lands on is decided by an explicit [`NodeSelection`] rule.
//!
//! # Complexity
//! O(T · N) for least-loaded selection, O(T) for cyclic.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Algorithm, Assignment, Scheduler};
use crate::problem::Problem;

/// Node-selection rule paired with FCFS ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeSelection {
    /// Node with the least accumulated busy time so far (lowest index on ties).
    #[default]
    LeastLoaded,
    /// A pointer advancing one node per task. Equivalent to Round-Robin.
    Cyclic,
}

/// First-Come-First-Served baseline.
///
/// # Example
/// ```
/// use fog_schedule::models::{FogNode, Task, TerminalDevice};
/// use fog_schedule::problem::Problem;
/// use fog_schedule::scheduler::{FcfsScheduler, Scheduler};
///
/// let tasks = vec![Task::new("T1", 5.0, 100.0, 10.0).with_device("D1")];
/// let nodes = vec![FogNode::new("F1", 2.0e9, 100.0)];
/// let devices = vec![TerminalDevice::fixed("D1", 1.0, 0.1)];
/// let problem = Problem::new(&tasks, &nodes, &devices).unwrap();
///
/// let solution = FcfsScheduler::new().solve(&problem, &mut rand::rng()).unwrap();
/// assert_eq!(solution.node_for("T1"), Some("F1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FcfsScheduler {
    selection: NodeSelection,
}

impl FcfsScheduler {
    /// Creates an FCFS scheduler with least-loaded node selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node-selection rule.
    pub fn with_selection(mut self, selection: NodeSelection) -> Self {
        self.selection = selection;
        self
    }
}

impl Scheduler for FcfsScheduler {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Fcfs
    }

    fn assign<R: Rng>(&self, problem: &Problem<'_>, _rng: &mut R) -> Assignment {
        let node_count = problem.node_count();
        let mut busy = vec![0.0_f64; node_count];
        let mut nodes = Vec::with_capacity(problem.task_count());

        for t in 0..problem.task_count() {
            let n = match self.selection {
                NodeSelection::Cyclic => t % node_count,
                NodeSelection::LeastLoaded => (0..node_count)
                    .min_by(|&a, &b| busy[a].total_cmp(&busy[b]))
                    .unwrap_or(0),
            };
            busy[n] += problem.delay(t, n);
            nodes.push(n);
        }

        Assignment::new(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FogNode, Task, TerminalDevice};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn fixture(sizes: &[f64]) -> (Vec<Task>, Vec<FogNode>, Vec<TerminalDevice>) {
        let tasks = sizes
            .iter()
            .enumerate()
            .map(|(i, &s)| Task::new(format!("T{i}"), s, 100.0, 100.0).with_device("D"))
            .collect();
        let nodes = vec![FogNode::new("F0", 1.0e9, 100.0), FogNode::new("F1", 1.0e9, 100.0)];
        (tasks, nodes, vec![TerminalDevice::fixed("D", 1.0, 0.1)])
    }

    #[test]
    fn test_least_loaded_balances_busy_time() {
        // One big task, then small ones: the small ones pile onto the other node.
        let (tasks, nodes, devices) = fixture(&[40.0, 5.0, 5.0, 5.0]);
        let p = Problem::new(&tasks, &nodes, &devices).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let a = FcfsScheduler::new().assign(&p, &mut rng);
        assert_eq!(a.nodes, vec![0, 1, 1, 1]);
    }

    #[test]
    fn test_cyclic_matches_round_robin() {
        let (tasks, nodes, devices) = fixture(&[40.0, 5.0, 5.0, 5.0, 1.0]);
        let p = Problem::new(&tasks, &nodes, &devices).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let a = FcfsScheduler::new()
            .with_selection(NodeSelection::Cyclic)
            .assign(&p, &mut rng);
        assert_eq!(a.nodes, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_solve_covers_every_task() {
        let (tasks, nodes, devices) = fixture(&[3.0, 9.0, 1.0]);
        let p = Problem::new(&tasks, &nodes, &devices).unwrap();
        let s = FcfsScheduler::new()
            .solve(&p, &mut SmallRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(s.algorithm, Algorithm::Fcfs);
        assert_eq!(s.allocations.len(), 3);
        assert!(s.convergence.is_empty());
    }
}
