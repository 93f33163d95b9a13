//! Particle state and the continuous → discrete mapping.
//!
//! A particle is a real vector with one coordinate per task. Coordinate `x`
//! decodes to node `min(floor(x), N - 1)`, so the search box is `[0, N]`.

use rand::Rng;

/// Maps a coordinate to a node index by direct clamping.
///
/// # Example
/// ```
/// use fog_schedule::pso::discretize;
///
/// assert_eq!(discretize(0.0, 4), 0);
/// assert_eq!(discretize(2.7, 4), 2);
/// assert_eq!(discretize(4.0, 4), 3);
/// assert_eq!(discretize(-1.0, 4), 0);
/// ```
#[inline]
pub fn discretize(x: f64, node_count: usize) -> usize {
    let upper = node_count.saturating_sub(1);
    if x.is_nan() || x <= 0.0 {
        return 0;
    }
    (x.floor() as usize).min(upper)
}

/// Clerc–Kennedy constriction factor for `φ = c1 + c2`.
///
/// `χ = 2 / |2 − φ − sqrt(φ² − 4φ)|` when `φ > 4`, otherwise 1.
pub fn constriction(phi: f64) -> f64 {
    if phi <= 4.0 {
        1.0
    } else {
        2.0 / (2.0 - phi - (phi * phi - 4.0 * phi).sqrt()).abs()
    }
}

/// Linearly decreasing inertia weight at `iteration` of `total`.
pub fn inertia(iteration: usize, total: usize, start: f64, end: f64) -> f64 {
    if total <= 1 {
        return start;
    }
    let progress = iteration.min(total - 1) as f64 / (total - 1) as f64;
    start - (start - end) * progress
}

/// Per-iteration velocity coefficients.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Coefficients {
    pub inertia: f64,
    pub cognitive: f64,
    pub social: f64,
    pub constriction: f64,
    pub max_velocity: f64,
}

/// One member of the swarm.
#[derive(Debug, Clone)]
pub(crate) struct Particle {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub best_position: Vec<f64>,
    pub best_objective: f64,
}

impl Particle {
    /// Uniformly random position in `[0, N)` and velocity in `[-v_max, v_max)`.
    pub fn random<R: Rng>(dim: usize, node_count: usize, max_velocity: f64, rng: &mut R) -> Self {
        let upper = node_count as f64;
        let position: Vec<f64> = (0..dim).map(|_| rng.random_range(0.0..upper)).collect();
        Self::at(position, max_velocity, rng)
    }

    /// Particle sitting at the centre of the cells of `assignment`.
    pub fn seeded<R: Rng>(assignment: &[usize], max_velocity: f64, rng: &mut R) -> Self {
        let position = assignment.iter().map(|&n| n as f64 + 0.5).collect();
        Self::at(position, max_velocity, rng)
    }

    fn at<R: Rng>(position: Vec<f64>, max_velocity: f64, rng: &mut R) -> Self {
        let velocity = position
            .iter()
            .map(|_| rng.random_range(-max_velocity..max_velocity))
            .collect();
        Self {
            best_position: position.clone(),
            position,
            velocity,
            best_objective: f64::INFINITY,
        }
    }

    /// Node index per task.
    pub fn decode(&self, node_count: usize) -> Vec<usize> {
        self.position
            .iter()
            .map(|&x| discretize(x, node_count))
            .collect()
    }

    /// Records `objective` for the current position; returns whether it is
    /// a new personal best.
    pub fn observe(&mut self, objective: f64) -> bool {
        if objective < self.best_objective {
            self.best_objective = objective;
            self.best_position.clone_from(&self.position);
            true
        } else {
            false
        }
    }

    /// Moves the particle towards its personal best and `global_best`.
    ///
    /// Coordinates that leave `[0, upper]` are clamped and lose their velocity.
    pub fn step<R: Rng>(&mut self, global_best: &[f64], upper: f64, c: &Coefficients, rng: &mut R) {
        for i in 0..self.position.len() {
            let r1: f64 = rng.random();
            let r2: f64 = rng.random();
            let x = self.position[i];
            let v = c.constriction
                * (c.inertia * self.velocity[i]
                    + c.cognitive * r1 * (self.best_position[i] - x)
                    + c.social * r2 * (global_best[i] - x));
            let v = v.clamp(-c.max_velocity, c.max_velocity);

            let next = x + v;
            if next < 0.0 {
                self.position[i] = 0.0;
                self.velocity[i] = 0.0;
            } else if next > upper {
                self.position[i] = upper;
                self.velocity[i] = 0.0;
            } else {
                self.position[i] = next;
                self.velocity[i] = v;
            }
        }
    }
}
