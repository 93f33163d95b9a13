//! Min-Min scheduler.
//!
//! # Algorithm
//!
//! 1. For every unassigned task and every node, compute the completion time:
//!    the node's ready time plus the task's total delay on it.
//! 2. Pick the globally smallest (task, node) pair. Ties go to the higher
//!    priority task, then to the lower task index and node index.
//! 3. Assign it, advance the node's ready time, and repeat.
//!
//! # Complexity
//! O(T² · N). Fine for the few hundred tasks a scheduling round carries.
//!
//! # Reference
//! Braun et al. (2001), "A Comparison of Eleven Static Heuristics for Mapping
//! a Class of Independent Tasks onto Heterogeneous Distributed Computing Systems"

use rand::Rng;

use super::{Algorithm, Assignment, Scheduler};
use crate::problem::Problem;

/// Min-Min baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMinScheduler;

impl MinMinScheduler {
    /// Creates a Min-Min scheduler.
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for MinMinScheduler {
    fn algorithm(&self) -> Algorithm {
        Algorithm::MinMin
    }

    fn assign<R: Rng>(&self, problem: &Problem<'_>, _rng: &mut R) -> Assignment {
        let tasks = problem.tasks();
        let mut ready = vec![0.0_f64; problem.node_count()];
        let mut nodes = vec![0usize; problem.task_count()];
        let mut unassigned: Vec<usize> = (0..problem.task_count()).collect();

        while !unassigned.is_empty() {
            // (position in `unassigned`, task, node, completion)
            let mut best: Option<(usize, usize, usize, f64)> = None;
            for (pos, &t) in unassigned.iter().enumerate() {
                for (n, &node_ready) in ready.iter().enumerate() {
                    let completion = node_ready + problem.delay(t, n);
                    let better = match best {
                        None => true,
                        Some((_, bt, _, bc)) => {
                            completion < bc
                                || (completion == bc && tasks[t].priority > tasks[bt].priority)
                        }
                    };
                    if better {
                        best = Some((pos, t, n, completion));
                    }
                }
            }

            let Some((pos, t, n, completion)) = best else {
                break;
            };
            nodes[t] = n;
            ready[n] = completion;
            unassigned.remove(pos);
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

    fn devices() -> Vec<TerminalDevice> {
        vec![TerminalDevice::fixed("D", 1.0, 0.1)]
    }

    #[test]
    fn test_smallest_task_goes_first_to_fastest_node() {
        let tasks = vec![
            Task::new("big", 50.0, 100.0, 100.0).with_device("D"),
            Task::new("small", 5.0, 100.0, 100.0).with_device("D"),
        ];
        let nodes = vec![FogNode::new("slow", 1.0e9, 100.0), FogNode::new("fast", 4.0e9, 100.0)];
        let devices = devices();
        let p = Problem::new(&tasks, &nodes, &devices).unwrap();
        let a = MinMinScheduler::new().assign(&p, &mut SmallRng::seed_from_u64(42));

        // small → fast (1.05 s); then big: fast ready at 1.05 + 10.5 = 11.55 < slow 40.5
        assert_eq!(a.nodes, vec![1, 1]);
    }

    #[test]
    fn test_ready_time_spreads_load() {
        let tasks: Vec<Task> = (0..4)
            .map(|i| Task::new(format!("T{i}"), 10.0, 100.0, 100.0).with_device("D"))
            .collect();
        let nodes = vec![FogNode::new("A", 1.0e9, 100.0), FogNode::new("B", 1.0e9, 100.0)];
        let devices = devices();
        let p = Problem::new(&tasks, &nodes, &devices).unwrap();
        let a = MinMinScheduler::new().assign(&p, &mut SmallRng::seed_from_u64(42));

        let on_a = a.nodes.iter().filter(|&&n| n == 0).count();
        assert_eq!(on_a, 2);
    }

    #[test]
    fn test_priority_breaks_ties() {
        let tasks = vec![
            Task::new("low", 10.0, 100.0, 100.0).with_device("D").with_priority(1),
            Task::new("high", 10.0, 100.0, 100.0).with_device("D").with_priority(5),
        ];
        let nodes = vec![FogNode::new("fast", 2.0e9, 100.0), FogNode::new("slow", 0.5e9, 100.0)];
        let devices = devices();
        let p = Problem::new(&tasks, &nodes, &devices).unwrap();
        let a = MinMinScheduler::new().assign(&p, &mut SmallRng::seed_from_u64(42));

        // equal completion times: the high-priority task claims the fast node first,
        // the other queues behind it (8.2 s) rather than run on the slow node (16.1 s)
        assert_eq!(a.nodes, vec![0, 0]);
    }

    #[test]
    fn test_many_tasks_few_nodes() {
        let tasks: Vec<Task> = (0..120)
            .map(|i| Task::new(format!("T{i}"), 1.0 + (i % 7) as f64, 150.0, 30.0).with_device("D"))
            .collect();
        let nodes = vec![
            FogNode::new("A", 1.0e9, 50.0),
            FogNode::new("B", 2.0e9, 80.0),
            FogNode::new("C", 3.0e9, 20.0),
        ];
        let devices = devices();
        let p = Problem::new(&tasks, &nodes, &devices).unwrap();
        let s = MinMinScheduler::new()
            .solve(&p, &mut SmallRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(s.allocations.len(), 120);
        let mut ids: Vec<&str> = s.allocations.iter().map(|a| a.task_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 120);
    }
}
