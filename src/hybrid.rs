//! Hybrid heuristic (HH): IACO and IPSO combined.
//!
//! | Strategy | Pipeline |
//! |----------|----------|
//! | [`HybridStrategy::Seeded`] | IACO, then IPSO with one particle on the IACO best |
//! | [`HybridStrategy::Independent`] | IACO and IPSO from scratch |
//!
//! Either way the fitter of the two assignments is returned (IACO on ties)
//! and the convergence trace is the IACO trace followed by the IPSO trace.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aco::{AcoConfig, IacoScheduler};
use crate::models::{Solution, TaskDetail};
use crate::problem::Problem;
use crate::pso::{IpsoScheduler, PsoConfig};
use crate::scheduler::{Algorithm, Assignment, Scheduler};

/// How HH combines its two optimizers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HybridStrategy {
    /// IPSO starts from the IACO result.
    #[default]
    Seeded,
    /// Both run from scratch.
    Independent,
}

/// HH scheduler.
///
/// # Example
/// ```
/// use fog_schedule::aco::AcoConfig;
/// use fog_schedule::hybrid::HybridScheduler;
/// use fog_schedule::models::{FogNode, Task, TerminalDevice};
/// use fog_schedule::problem::Problem;
/// use fog_schedule::pso::PsoConfig;
/// use fog_schedule::scheduler::Scheduler;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let tasks = vec![
///     Task::new("T1", 2.0, 300.0, 5.0).with_device("D"),
///     Task::new("T2", 8.0, 100.0, 5.0).with_device("D"),
/// ];
/// let nodes = vec![FogNode::new("F1", 1.5e9, 75.0), FogNode::new("F2", 3.0e9, 25.0)];
/// let devices = vec![TerminalDevice::fixed("D", 1.0, 0.1)];
/// let problem = Problem::new(&tasks, &nodes, &devices).unwrap();
///
/// let hh = HybridScheduler::new(
///     PsoConfig::default().with_iterations(20),
///     AcoConfig::default().with_iterations(20),
/// );
/// let solution = hh.solve(&problem, &mut StdRng::seed_from_u64(42)).unwrap();
/// assert_eq!(solution.convergence.len(), 40);
///
/// for detail in HybridScheduler::details(&problem, &solution) {
///     assert!(detail.meets_deadline);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct HybridScheduler {
    pso: IpsoScheduler,
    aco: IacoScheduler,
    strategy: HybridStrategy,
}

impl HybridScheduler {
    /// Creates an HH scheduler with the seeded strategy.
    pub fn new(pso: PsoConfig, aco: AcoConfig) -> Self {
        Self {
            pso: IpsoScheduler::new(pso),
            aco: IacoScheduler::new(aco),
            strategy: HybridStrategy::default(),
        }
    }

    /// Sets the combination strategy.
    pub fn with_strategy(mut self, strategy: HybridStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Combination strategy in use.
    pub fn strategy(&self) -> HybridStrategy {
        self.strategy
    }

    /// Per-task breakdown of `solution`: resolved node, execution,
    /// transmission and total delay, energy, and deadline compliance.
    pub fn details(problem: &Problem<'_>, solution: &Solution) -> Vec<TaskDetail> {
        problem.details(solution)
    }
}

impl Scheduler for HybridScheduler {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Hh
    }

    fn assign<R: Rng>(&self, problem: &Problem<'_>, rng: &mut R) -> Assignment {
        let colony = self.aco.optimize(problem, None, rng);
        let swarm = match self.strategy {
            HybridStrategy::Seeded => {
                self.pso
                    .optimize(problem, std::slice::from_ref(&colony.nodes), rng)
            }
            HybridStrategy::Independent => self.pso.optimize(problem, &[], rng),
        };

        let colony_fitness = problem.fitness(&colony.nodes);
        let swarm_fitness = problem.fitness(&swarm.nodes);
        debug!(
            strategy = ?self.strategy,
            colony_fitness,
            swarm_fitness,
            "hh combined optimizers"
        );

        let mut convergence = colony.convergence;
        convergence.extend(swarm.convergence);
        let nodes = if swarm_fitness > colony_fitness {
            swarm.nodes
        } else {
            colony.nodes
        };
        Assignment::new(nodes).with_convergence(convergence)
    }
}
