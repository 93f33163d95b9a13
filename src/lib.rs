//! Task-to-node scheduling for fog computing.
//!
//! Places independent tasks, originated by terminal devices, onto fog nodes
//! (and optionally a cloud tier) so that the device-weighted sum of delay and
//! energy is minimized.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `FogNode`, `CloudNode`,
//!   `TerminalDevice`, `Workload`, `Solution`
//! - **`cost`**: Delay / energy cost model
//! - **`validation`**: Input integrity checks (duplicate IDs, device refs, numeric ranges)
//! - **`problem`**: Arena-indexed problem with precomputed cost matrices
//! - **`scheduler`**: `Algorithm`, the `Scheduler` trait, baselines (FCFS,
//!   Round-Robin, Min-Min), KPIs and the `schedule` / `compare` facade
//! - **`pso`**, **`aco`**, **`hybrid`**: IPSO, IACO and their combination (HH)
//! - **`offload`**: Device / fog / cloud placement decisions
//! - **`config`**: Serde-deserializable engine options
//! - **`synthetic`**: Seeded workload generator
//!
//! # Example
//! ```
//! use fog_schedule::{schedule, Algorithm, EngineConfig};
//! use fog_schedule::synthetic::WorkloadGenerator;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let workload = WorkloadGenerator::new(20, 4, 5).generate(&mut StdRng::seed_from_u64(1));
//! let config = EngineConfig::default().with_iterations(30).with_seed(7);
//!
//! let solution = schedule(&workload, Algorithm::Hh, &config).unwrap();
//! assert_eq!(solution.allocations.len(), 20);
//! assert!((0.0..=100.0).contains(&solution.reliability));
//! ```
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Dorigo & Stützle (2004), "Ant Colony Optimization"
//! - Bonomi et al. (2012), "Fog Computing and Its Role in the Internet of Things"

pub mod aco;
pub mod config;
pub mod cost;
pub mod error;
pub mod hybrid;
pub mod models;
pub mod offload;
pub mod problem;
pub mod pso;
pub mod scheduler;
pub mod synthetic;
pub mod validation;

pub use config::EngineConfig;
pub use error::{Result, ScheduleError};
pub use offload::{OffloadEngine, OffloadReport};
pub use problem::Problem;
pub use scheduler::{compare, schedule, Algorithm, Scheduler};
