//! Bounded task × node pheromone matrix.

/// Pheromone trail `τ[t][n]`, kept within `[min, max]` after every update.
#[derive(Debug, Clone)]
pub struct PheromoneMatrix {
    nodes: usize,
    values: Vec<f64>,
    min: f64,
    max: f64,
}

impl PheromoneMatrix {
    /// A `tasks × nodes` matrix filled with `initial`.
    ///
    /// `initial` is clamped into `[min, max]`; `max` is raised to `min` if smaller.
    pub fn new(tasks: usize, nodes: usize, initial: f64, min: f64, max: f64) -> Self {
        let max = max.max(min);
        Self {
            nodes,
            values: vec![initial.clamp(min, max); tasks * nodes],
            min,
            max,
        }
    }

    /// Trail on edge (t, n).
    #[inline]
    pub fn get(&self, t: usize, n: usize) -> f64 {
        self.values[t * self.nodes + n]
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// `τ ← (1 − ρ) · τ` on every edge.
    pub fn evaporate(&mut self, rho: f64) {
        let keep = 1.0 - rho.clamp(0.0, 1.0);
        for v in &mut self.values {
            *v = (*v * keep).clamp(self.min, self.max);
        }
    }

    /// `τ ← τ + amount` on edge (t, n).
    pub fn deposit(&mut self, t: usize, n: usize, amount: f64) {
        let cell = t * self.nodes + n;
        self.values[cell] = (self.values[cell] + amount).clamp(self.min, self.max);
    }

    /// `τ ← (1 − ξ) · τ + ξ · target` on edge (t, n).
    pub fn blend(&mut self, t: usize, n: usize, xi: f64, target: f64) {
        let cell = t * self.nodes + n;
        let xi = xi.clamp(0.0, 1.0);
        let blended = (1.0 - xi) * self.values[cell] + xi * target;
        self.values[cell] = blended.clamp(self.min, self.max);
    }
}
