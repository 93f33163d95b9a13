//! Engine configuration.
//!
//! [`EngineConfig`] is the caller-facing option set. It deserializes from
//! the camelCase keys the job layer sends (`iterations`, `swarmSize`,
//! `antCount`, `inertiaRange`, `pheromoneDecay`, `fogLoadThreshold`, ...),
//! with every key optional. Typed per-algorithm configs are derived from it.
//!
//! # Example
//! ```
//! use fog_schedule::config::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_iterations(50)
//!     .with_seed(42);
//! assert_eq!(config.pso().iterations, 50);
//! ```

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::aco::AcoConfig;
use crate::hybrid::HybridStrategy;
use crate::offload::OffloadConfig;
use crate::pso::PsoConfig;
use crate::scheduler::{Algorithm, NodeSelection};

/// Options recognised by the scheduling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Iteration budget of the metaheuristics (default: 100).
    pub iterations: usize,
    /// IPSO swarm size (default: 30).
    pub swarm_size: usize,
    /// IACO ants per iteration (default: 20).
    pub ant_count: usize,
    /// IPSO inertia weight, decreasing from `.0` to `.1` (default: 0.9 → 0.4).
    pub inertia_range: (f64, f64),
    /// IACO global evaporation rate ρ (default: 0.1).
    pub pheromone_decay: f64,
    /// Fog nodes at or above this load are unusable for offloading (default: 0.9).
    pub fog_load_threshold: f64,
    /// RNG seed. `None` draws a seed from the OS.
    pub seed: Option<u64>,
    /// Stop IPSO after this many iterations without improvement.
    pub stagnation_limit: Option<usize>,
    /// Wall-clock budget per optimizer run (ms). The best solution so far is returned.
    pub time_limit_ms: Option<u64>,
    /// How HH combines IACO and IPSO (default: seeded).
    pub hybrid_strategy: HybridStrategy,
    /// Node-selection rule paired with FCFS ordering (default: least-loaded).
    pub fcfs_selection: NodeSelection,
    /// Tasks up to this size (Mb) stay on capable devices during offloading.
    pub local_data_threshold: Option<f64>,
    /// Strategy used to place fog-bound tasks in the 3-layer pass.
    pub offload_algorithm: Option<Algorithm>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            swarm_size: 30,
            ant_count: 20,
            inertia_range: (0.9, 0.4),
            pheromone_decay: 0.1,
            fog_load_threshold: 0.9,
            seed: None,
            stagnation_limit: None,
            time_limit_ms: None,
            hybrid_strategy: HybridStrategy::default(),
            fcfs_selection: NodeSelection::default(),
            local_data_threshold: None,
            offload_algorithm: None,
        }
    }
}

impl EngineConfig {
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

    /// Sets the ant count.
    pub fn with_ant_count(mut self, ant_count: usize) -> Self {
        self.ant_count = ant_count;
        self
    }

    /// Sets the inertia range (start, end).
    pub fn with_inertia_range(mut self, start: f64, end: f64) -> Self {
        self.inertia_range = (start, end);
        self
    }

    /// Sets the pheromone evaporation rate.
    pub fn with_pheromone_decay(mut self, decay: f64) -> Self {
        self.pheromone_decay = decay;
        self
    }

    /// Sets the fog load threshold.
    pub fn with_fog_load_threshold(mut self, threshold: f64) -> Self {
        self.fog_load_threshold = threshold;
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the IPSO stagnation limit.
    pub fn with_stagnation_limit(mut self, iterations: usize) -> Self {
        self.stagnation_limit = Some(iterations);
        self
    }

    /// Sets the per-run wall-clock budget.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the HH combination strategy.
    pub fn with_hybrid_strategy(mut self, strategy: HybridStrategy) -> Self {
        self.hybrid_strategy = strategy;
        self
    }

    /// Sets the FCFS node-selection rule.
    pub fn with_fcfs_selection(mut self, selection: NodeSelection) -> Self {
        self.fcfs_selection = selection;
        self
    }

    /// Enables local processing of small tasks during offloading.
    pub fn with_local_data_threshold(mut self, megabits: f64) -> Self {
        self.local_data_threshold = Some(megabits);
        self
    }

    /// Places fog-bound tasks of the 3-layer pass with `algorithm`.
    pub fn with_offload_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.offload_algorithm = Some(algorithm);
        self
    }

    /// Wall-clock budget as a duration.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// A fresh generator: seeded when a seed is configured, OS entropy otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// IPSO parameters.
    pub fn pso(&self) -> PsoConfig {
        let (start, end) = self.inertia_range;
        let mut config = PsoConfig::default()
            .with_swarm_size(self.swarm_size)
            .with_iterations(self.iterations)
            .with_inertia(start, end);
        config.stagnation_limit = self.stagnation_limit;
        config.time_limit = self.time_limit();
        config
    }

    /// IACO parameters.
    pub fn aco(&self) -> AcoConfig {
        let mut config = AcoConfig::default()
            .with_ant_count(self.ant_count)
            .with_iterations(self.iterations)
            .with_evaporation(self.pheromone_decay);
        config.time_limit = self.time_limit();
        config
    }

    /// Offload engine parameters.
    pub fn offload(&self) -> OffloadConfig {
        OffloadConfig {
            fog_load_threshold: self.fog_load_threshold,
            local_data_threshold: self.local_data_threshold,
            fog_algorithm: self.offload_algorithm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.iterations, 100);
        assert_eq!(c.swarm_size, 30);
        assert_eq!(c.ant_count, 20);
        assert!((c.fog_load_threshold - 0.9).abs() < 1e-12);
        assert!(c.seed.is_none());
        assert!(c.time_limit().is_none());
    }

    #[test]
    fn test_deserialize_camel_case_partial() {
        let json = r#"{
            "iterations": 40,
            "swarmSize": 12,
            "antCount": 8,
            "inertiaRange": [0.95, 0.3],
            "pheromoneDecay": 0.2,
            "fogLoadThreshold": 0.8,
            "seed": 7,
            "hybridStrategy": "independent",
            "fcfsSelection": "cyclic",
            "offloadAlgorithm": "min-min"
        }"#;
        let c: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(c.iterations, 40);
        assert_eq!(c.swarm_size, 12);
        assert_eq!(c.ant_count, 8);
        assert_eq!(c.inertia_range, (0.95, 0.3));
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.hybrid_strategy, HybridStrategy::Independent);
        assert_eq!(c.fcfs_selection, NodeSelection::Cyclic);
        assert_eq!(c.offload_algorithm, Some(Algorithm::MinMin));
        // missing keys fall back to defaults
        assert!(c.stagnation_limit.is_none());

        let empty: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, EngineConfig::default());
    }

    #[test]
    fn test_derived_configs() {
        let c = EngineConfig::default()
            .with_iterations(25)
            .with_swarm_size(10)
            .with_ant_count(5)
            .with_inertia_range(0.8, 0.2)
            .with_pheromone_decay(0.3)
            .with_time_limit_ms(500)
            .with_stagnation_limit(4);

        let pso = c.pso();
        assert_eq!(pso.iterations, 25);
        assert_eq!(pso.swarm_size, 10);
        assert!((pso.inertia_start - 0.8).abs() < 1e-12);
        assert!((pso.inertia_end - 0.2).abs() < 1e-12);
        assert_eq!(pso.stagnation_limit, Some(4));
        assert_eq!(pso.time_limit, Some(Duration::from_millis(500)));

        let aco = c.aco();
        assert_eq!(aco.iterations, 25);
        assert_eq!(aco.ant_count, 5);
        assert!((aco.evaporation - 0.3).abs() < 1e-12);

        let offload = c.with_fog_load_threshold(0.75).offload();
        assert!((offload.fog_load_threshold - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let c = EngineConfig::default().with_seed(99);
        let a: Vec<u32> = (0..8).map(|_| c.rng().random()).collect();
        let mut r1 = c.rng();
        let mut r2 = c.rng();
        let s1: Vec<u64> = (0..8).map(|_| r1.random()).collect();
        let s2: Vec<u64> = (0..8).map(|_| r2.random()).collect();
        assert_eq!(s1, s2);
        // a fresh generator per call restarts the stream
        assert!(a.iter().all(|&x| x == a[0]));
    }
}
