//! Scheduling strategies and the engine facade.
//!
//! Every strategy implements [`Scheduler`]: it turns a [`Problem`] into an
//! [`Assignment`] (node index per task position), and the provided
//! [`Scheduler::solve`] evaluates that into a [`Solution`].
//!
//! # Strategies
//!
//! | [`Algorithm`] | Implementation | Kind |
//! |---------------|----------------|------|
//! | `hh` | [`HybridScheduler`](crate::hybrid::HybridScheduler) | IACO → IPSO pipeline |
//! | `ipso` | [`IpsoScheduler`](crate::pso::IpsoScheduler) | particle swarm |
//! | `iaco` | [`IacoScheduler`](crate::aco::IacoScheduler) | ant colony |
//! | `fcfs` | [`FcfsScheduler`] | baseline |
//! | `round-robin` | [`RoundRobinScheduler`] | baseline |
//! | `min-min` | [`MinMinScheduler`] | baseline |
//!
//! # Example
//! ```
//! use fog_schedule::config::EngineConfig;
//! use fog_schedule::models::{FogNode, Task, TerminalDevice, Workload};
//! use fog_schedule::scheduler::{schedule, Algorithm};
//!
//! let workload = Workload::new(
//!     vec![Task::new("T1", 5.0, 100.0, 10.0).with_device("D1")],
//!     vec![FogNode::new("F1", 2.0e9, 100.0), FogNode::new("F2", 1.0e9, 50.0)],
//!     vec![TerminalDevice::fixed("D1", 1.0, 0.1)],
//! );
//! let config = EngineConfig::default().with_iterations(20).with_seed(42);
//!
//! let solution = schedule(&workload, "hh".parse().unwrap(), &config).unwrap();
//! assert_eq!(solution.algorithm, Algorithm::Hh);
//! assert_eq!(solution.node_for("T1"), Some("F1"));
//! ```

mod fcfs;
mod kpi;
mod min_min;
mod round_robin;

pub use fcfs::{FcfsScheduler, NodeSelection};
pub use kpi::SolutionKpi;
pub use min_min::MinMinScheduler;
pub use round_robin::RoundRobinScheduler;

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aco::IacoScheduler;
use crate::config::EngineConfig;
use crate::error::{Result, ScheduleError};
use crate::hybrid::HybridScheduler;
use crate::models::{Solution, Workload};
use crate::problem::Problem;
use crate::pso::IpsoScheduler;

/// Scheduling strategy identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Hybrid heuristic (IACO + IPSO).
    Hh,
    /// Improved particle swarm optimization.
    Ipso,
    /// Improved ant colony optimization.
    Iaco,
    /// First-Come-First-Served.
    Fcfs,
    /// Round-Robin.
    RoundRobin,
    /// Min-Min.
    MinMin,
}

impl Algorithm {
    /// All strategies, metaheuristics first.
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Hh,
        Algorithm::Ipso,
        Algorithm::Iaco,
        Algorithm::Fcfs,
        Algorithm::RoundRobin,
        Algorithm::MinMin,
    ];

    /// Baselines only.
    pub const BASELINES: [Algorithm; 3] =
        [Algorithm::Fcfs, Algorithm::RoundRobin, Algorithm::MinMin];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Hh => "hh",
            Algorithm::Ipso => "ipso",
            Algorithm::Iaco => "iaco",
            Algorithm::Fcfs => "fcfs",
            Algorithm::RoundRobin => "round-robin",
            Algorithm::MinMin => "min-min",
        }
    }

    /// Whether this strategy is stochastic and reports convergence.
    pub fn is_metaheuristic(&self) -> bool {
        matches!(self, Algorithm::Hh | Algorithm::Ipso | Algorithm::Iaco)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| ScheduleError::UnknownAlgorithm(s.to_string()))
    }
}

/// Raw output of a strategy: node index per task position.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// `nodes[t]` is the node index of task `t`.
    pub nodes: Vec<usize>,
    /// Best fitness after each iteration (empty for baselines).
    pub convergence: Vec<f64>,
}

impl Assignment {
    /// An assignment without a convergence trace.
    pub fn new(nodes: Vec<usize>) -> Self {
        Self {
            nodes,
            convergence: Vec::new(),
        }
    }

    /// Attaches a convergence trace.
    pub fn with_convergence(mut self, convergence: Vec<f64>) -> Self {
        self.convergence = convergence;
        self
    }
}

/// A task → node placement strategy.
pub trait Scheduler {
    /// Identifier reported in produced solutions.
    fn algorithm(&self) -> Algorithm;

    /// Places every task of `problem`.
    ///
    /// The returned assignment covers each task exactly once with a valid
    /// node index. `problem` must have at least one node when it has tasks,
    /// which [`Problem::new`] guarantees.
    fn assign<R: Rng>(&self, problem: &Problem<'_>, rng: &mut R) -> Assignment;

    /// Places every task and evaluates the result.
    fn solve<R: Rng>(&self, problem: &Problem<'_>, rng: &mut R) -> Result<Solution> {
        if problem.task_count() == 0 {
            return Ok(Solution::empty(self.algorithm()));
        }
        let assignment = self.assign(problem, rng);
        problem.evaluate(self.algorithm(), &assignment.nodes, assignment.convergence)
    }
}

/// Runs `algorithm` on the fog tier of `workload`.
///
/// Uses a generator seeded from `config.seed` (OS entropy when unset), so a
/// fixed seed reproduces the same solution.
///
/// # Errors
/// - [`ScheduleError::NoResourcesAvailable`] when there are tasks but no fog nodes
/// - [`ScheduleError::Domain`] / [`ScheduleError::InvalidWorkload`] for bad input
pub fn schedule(
    workload: &Workload,
    algorithm: Algorithm,
    config: &EngineConfig,
) -> Result<Solution> {
    let problem = Problem::from_workload(workload)?;
    solve(&problem, algorithm, config, &mut config.rng())
}

/// Runs `algorithm` on an already-built problem with the given generator.
pub fn solve<R: Rng>(
    problem: &Problem<'_>,
    algorithm: Algorithm,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<Solution> {
    let solution = match algorithm {
        Algorithm::Hh => HybridScheduler::new(config.pso(), config.aco())
            .with_strategy(config.hybrid_strategy)
            .solve(problem, rng)?,
        Algorithm::Ipso => IpsoScheduler::new(config.pso()).solve(problem, rng)?,
        Algorithm::Iaco => IacoScheduler::new(config.aco()).solve(problem, rng)?,
        Algorithm::Fcfs => FcfsScheduler::new()
            .with_selection(config.fcfs_selection)
            .solve(problem, rng)?,
        Algorithm::RoundRobin => RoundRobinScheduler::new().solve(problem, rng)?,
        Algorithm::MinMin => MinMinScheduler::new().solve(problem, rng)?,
    };

    info!(
        algorithm = %algorithm,
        tasks = problem.task_count(),
        nodes = problem.node_count(),
        objective = solution.objective,
        reliability = solution.reliability,
        "scheduling finished"
    );
    Ok(solution)
}

/// Runs several strategies on the same workload in parallel.
///
/// Each run gets its own generator built from `config`. With `config.seed`
/// set, results are the same as calling [`schedule`] once per algorithm;
/// without it every run draws fresh OS entropy. Output order follows
/// `algorithms`.
pub fn compare(
    workload: &Workload,
    algorithms: &[Algorithm],
    config: &EngineConfig,
) -> Result<Vec<Solution>> {
    algorithms
        .par_iter()
        .map(|&algorithm| schedule(workload, algorithm, config))
        .collect()
}
