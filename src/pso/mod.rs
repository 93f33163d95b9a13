//! Improved particle swarm optimization (IPSO).
//!
//! Continuous PSO over the `[0, N]^T` box, decoded to node indices by
//! direct clamping ([`discretize`]).
//!
//! # Improvements over canonical PSO
//!
//! - Inertia weight decreasing linearly from `inertia_start` to `inertia_end`
//! - Clerc–Kennedy constriction factor on the whole velocity update
//! - Per-coordinate velocity clamp at `max_velocity_ratio · N`
//! - Absorbing walls: a coordinate hitting the box boundary stops
//! - Optional seeding from known-good assignments (used by HH)
//! - Early exit on stagnation or wall-clock budget
//!
//! # Complexity
//! O(iterations · swarm_size · T).
//!
//! # Reference
//! - Shi & Eberhart (1998), "A modified particle swarm optimizer"
//! - Clerc & Kennedy (2002), "The particle swarm: explosion, stability, and
//!   convergence in a multidimensional complex space"

mod particle;

pub use particle::{constriction, discretize, inertia};

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

use particle::{Coefficients, Particle};

use crate::problem::Problem;
use crate::scheduler::{Algorithm, Assignment, Scheduler};

/// IPSO parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PsoConfig {
    /// Iteration budget (default: 100).
    pub iterations: usize,
    /// Number of particles (default: 30).
    pub swarm_size: usize,
    /// Inertia weight at the first iteration (default: 0.9).
    pub inertia_start: f64,
    /// Inertia weight at the last iteration (default: 0.4).
    pub inertia_end: f64,
    /// Attraction to the personal best, c1 (default: 2.05).
    pub cognitive: f64,
    /// Attraction to the global best, c2 (default: 2.05).
    pub social: f64,
    /// Velocity clamp as a fraction of the node count (default: 0.5).
    pub max_velocity_ratio: f64,
    /// Stop after this many iterations without improvement.
    pub stagnation_limit: Option<usize>,
    /// Wall-clock budget.
    pub time_limit: Option<Duration>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            swarm_size: 30,
            inertia_start: 0.9,
            inertia_end: 0.4,
            cognitive: 2.05,
            social: 2.05,
            max_velocity_ratio: 0.5,
            stagnation_limit: None,
            time_limit: None,
        }
    }
}

impl PsoConfig {
    /// Sets the iteration budget.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the swarm size.
    pub fn with_swarm_size(mut self, swarm_size: usize) -> Self {
        self.swarm_size = swarm_size;
        self
    }

    /// Sets the inertia range.
    pub fn with_inertia(mut self, start: f64, end: f64) -> Self {
        self.inertia_start = start;
        self.inertia_end = end;
        self
    }

    /// Sets the acceleration coefficients.
    pub fn with_acceleration(mut self, cognitive: f64, social: f64) -> Self {
        self.cognitive = cognitive;
        self.social = social;
        self
    }

    /// Sets the stagnation limit.
    pub fn with_stagnation_limit(mut self, iterations: usize) -> Self {
        self.stagnation_limit = Some(iterations);
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// IPSO scheduler.
///
/// # Example
/// ```
/// use fog_schedule::models::{FogNode, Task, TerminalDevice};
/// use fog_schedule::problem::Problem;
/// use fog_schedule::pso::{IpsoScheduler, PsoConfig};
/// use fog_schedule::scheduler::Scheduler;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let tasks: Vec<Task> = (0..6)
///     .map(|i| Task::new(format!("T{i}"), 4.0, 100.0, 10.0).with_device("D"))
///     .collect();
/// let nodes = vec![FogNode::new("slow", 1.0e9, 20.0), FogNode::new("fast", 3.0e9, 80.0)];
/// let devices = vec![TerminalDevice::fixed("D", 1.0, 0.1)];
/// let problem = Problem::new(&tasks, &nodes, &devices).unwrap();
///
/// let scheduler = IpsoScheduler::new(PsoConfig::default().with_iterations(40));
/// let solution = scheduler.solve(&problem, &mut StdRng::seed_from_u64(42)).unwrap();
/// assert!(solution.allocations.iter().all(|a| a.node_id == "fast"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IpsoScheduler {
    config: PsoConfig,
}

impl IpsoScheduler {
    /// Creates an IPSO scheduler.
    pub fn new(config: PsoConfig) -> Self {
        Self { config }
    }

    /// Parameters in use.
    pub fn config(&self) -> &PsoConfig {
        &self.config
    }

    /// Runs the swarm, placing one particle on each of `seeds` first.
    ///
    /// Seeds of the wrong length or with out-of-range node indices are
    /// ignored. The returned assignment is never worse than the best seed.
    pub fn optimize<R: Rng>(
        &self,
        problem: &Problem<'_>,
        seeds: &[Vec<usize>],
        rng: &mut R,
    ) -> Assignment {
        let dim = problem.task_count();
        let node_count = problem.node_count();
        if dim == 0 || node_count == 0 {
            return Assignment::new(vec![0; dim]);
        }

        let config = &self.config;
        let swarm_size = config.swarm_size.max(1);
        let iterations = config.iterations.max(1);
        let upper = node_count as f64;
        let max_velocity = (config.max_velocity_ratio * upper).max(1e-6);
        let constriction = constriction(config.cognitive + config.social);
        debug!(
            tasks = dim,
            nodes = node_count,
            swarm_size,
            iterations,
            constriction,
            seeds = seeds.len(),
            "ipso started"
        );

        let valid_seeds = seeds
            .iter()
            .filter(|s| s.len() == dim && s.iter().all(|&n| n < node_count));
        let mut swarm: Vec<Particle> = valid_seeds
            .take(swarm_size)
            .map(|s| Particle::seeded(s, max_velocity, rng))
            .collect();
        while swarm.len() < swarm_size {
            swarm.push(Particle::random(dim, node_count, max_velocity, rng));
        }

        let mut best_position = swarm[0].position.clone();
        let mut best_assignment = swarm[0].decode(node_count);
        let mut best_objective = f64::INFINITY;
        for particle in &mut swarm {
            let assignment = particle.decode(node_count);
            let objective = problem.objective(&assignment);
            particle.observe(objective);
            if objective < best_objective {
                best_objective = objective;
                best_position.clone_from(&particle.position);
                best_assignment = assignment;
            }
        }

        let started = Instant::now();
        let mut convergence = Vec::with_capacity(iterations.min(1024));
        let mut stale = 0usize;
        for iteration in 0..iterations {
            if iteration > 0 && config.time_limit.is_some_and(|limit| started.elapsed() >= limit) {
                debug!(iteration, "ipso time limit reached");
                break;
            }

            let coefficients = Coefficients {
                inertia: inertia(iteration, iterations, config.inertia_start, config.inertia_end),
                cognitive: config.cognitive,
                social: config.social,
                constriction,
                max_velocity,
            };

            let mut improved = false;
            for particle in &mut swarm {
                particle.step(&best_position, upper, &coefficients, rng);
                let assignment = particle.decode(node_count);
                let objective = problem.objective(&assignment);
                particle.observe(objective);
                if objective < best_objective {
                    best_objective = objective;
                    best_position.clone_from(&particle.position);
                    best_assignment = assignment;
                    improved = true;
                }
            }

            convergence.push(fitness_of(best_objective));
            stale = if improved { 0 } else { stale + 1 };
            if config.stagnation_limit.is_some_and(|limit| stale >= limit) {
                debug!(iteration, stale, "ipso stagnated");
                break;
            }
        }

        debug!(objective = best_objective, iterations = convergence.len(), "ipso finished");
        Assignment::new(best_assignment).with_convergence(convergence)
    }
}

impl Scheduler for IpsoScheduler {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Ipso
    }

    fn assign<R: Rng>(&self, problem: &Problem<'_>, rng: &mut R) -> Assignment {
        self.optimize(problem, &[], rng)
    }
}

pub(crate) fn fitness_of(objective: f64) -> f64 {
    if objective > 0.0 && objective.is_finite() {
        1.0 / objective
    } else {
        0.0
    }
}
