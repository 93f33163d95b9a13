//! Round-Robin scheduler: task `i` goes to node `i mod N`.

use rand::Rng;

use super::{Algorithm, Assignment, Scheduler};
use crate::problem::Problem;

/// Round-Robin baseline. Per-node task counts differ by at most one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinScheduler;

impl RoundRobinScheduler {
    /// Creates a Round-Robin scheduler.
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for RoundRobinScheduler {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RoundRobin
    }

    fn assign<R: Rng>(&self, problem: &Problem<'_>, _rng: &mut R) -> Assignment {
        let n = problem.node_count();
        Assignment::new((0..problem.task_count()).map(|t| t % n).collect())
    }
}
