//! Arena-indexed scheduling problem and solution evaluator.
//!
//! A [`Problem`] resolves ids to positions once per call and precomputes
//! the task × node cost matrices, so schedulers work on plain
//! `Vec<usize>` assignments (node index per task position) and never hash
//! string ids in their inner loops.
//!
//! # Layout
//! All matrices are row-major `tasks × nodes`: entry `t * node_count + n`.

use std::collections::HashMap;

use tracing::debug;

use crate::cost;
use crate::error::{Result, ScheduleError};
use crate::models::{Allocation, FogNode, Solution, Task, TaskDetail, TerminalDevice, Workload};
use crate::scheduler::Algorithm;
use crate::validation::validate_input;

/// A validated placement problem with precomputed costs.
#[derive(Debug, Clone)]
pub struct Problem<'a> {
    tasks: &'a [Task],
    nodes: &'a [FogNode],
    devices: Vec<&'a TerminalDevice>,
    node_ids: HashMap<&'a str, usize>,
    task_ids: HashMap<&'a str, usize>,
    execution: Vec<f64>,
    transmission: Vec<f64>,
    energy: Vec<f64>,
    cost: Vec<f64>,
}

impl<'a> Problem<'a> {
    /// Validates the inputs and precomputes the cost matrices.
    ///
    /// # Errors
    /// - [`ScheduleError::Domain`] for non-positive numeric inputs
    /// - [`ScheduleError::InvalidWorkload`] for structural problems
    /// - [`ScheduleError::NoResourcesAvailable`] when tasks exist but nodes don't
    pub fn new(
        tasks: &'a [Task],
        nodes: &'a [FogNode],
        devices: &'a [TerminalDevice],
    ) -> Result<Self> {
        validate_input(tasks, nodes, devices).map_err(ScheduleError::from_validation)?;
        if !tasks.is_empty() && nodes.is_empty() {
            return Err(ScheduleError::NoResourcesAvailable { tasks: tasks.len() });
        }

        let by_id: HashMap<&str, &TerminalDevice> =
            devices.iter().map(|d| (d.id.as_str(), d)).collect();
        let task_devices: Vec<&TerminalDevice> = tasks
            .iter()
            .map(|t| {
                by_id.get(t.device_id.as_str()).copied().ok_or_else(|| {
                    ScheduleError::domain(format!("task '{}' has no device", t.id))
                })
            })
            .collect::<Result<_>>()?;

        let cells = tasks.len() * nodes.len();
        let mut execution = Vec::with_capacity(cells);
        let mut transmission = Vec::with_capacity(cells);
        let mut energy = Vec::with_capacity(cells);
        let mut weighted = Vec::with_capacity(cells);
        for (task, device) in tasks.iter().zip(&task_devices) {
            for node in nodes {
                execution.push(cost::execution_time(task, node)?);
                transmission.push(cost::transmission_time(task, node)?);
                energy.push(cost::energy_consumption(task, node, device)?);
                weighted.push(cost::weighted_cost(task, node, device)?);
            }
        }

        debug!(tasks = tasks.len(), nodes = nodes.len(), "built scheduling problem");

        Ok(Self {
            tasks,
            nodes,
            devices: task_devices,
            node_ids: nodes.iter().enumerate().map(|(i, n)| (n.id.as_str(), i)).collect(),
            task_ids: tasks.iter().enumerate().map(|(i, t)| (t.id.as_str(), i)).collect(),
            execution,
            transmission,
            energy,
            cost: weighted,
        })
    }

    /// Builds the fog-only problem of a workload.
    pub fn from_workload(workload: &'a Workload) -> Result<Self> {
        Self::new(&workload.tasks, &workload.fog_nodes, &workload.devices)
    }

    /// Number of tasks.
    #[inline]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of fog nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Input tasks.
    pub fn tasks(&self) -> &'a [Task] {
        self.tasks
    }

    /// Input fog nodes.
    pub fn nodes(&self) -> &'a [FogNode] {
        self.nodes
    }

    /// Device that originated task `t`.
    pub fn device(&self, t: usize) -> &'a TerminalDevice {
        self.devices[t]
    }

    /// Position of a node id.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.node_ids.get(id).copied()
    }

    /// Position of a task id.
    pub fn task_index(&self, id: &str) -> Option<usize> {
        self.task_ids.get(id).copied()
    }

    #[inline]
    fn cell(&self, t: usize, n: usize) -> usize {
        t * self.nodes.len() + n
    }

    /// Execution time of task `t` on node `n` (s).
    #[inline]
    pub fn execution_time(&self, t: usize, n: usize) -> f64 {
        self.execution[self.cell(t, n)]
    }

    /// Transmission time of task `t` to node `n` (s).
    #[inline]
    pub fn transmission_time(&self, t: usize, n: usize) -> f64 {
        self.transmission[self.cell(t, n)]
    }

    /// Total delay of task `t` on node `n` (s).
    #[inline]
    pub fn delay(&self, t: usize, n: usize) -> f64 {
        let c = self.cell(t, n);
        self.execution[c] + self.transmission[c]
    }

    /// Device energy of task `t` on node `n` (J).
    #[inline]
    pub fn energy(&self, t: usize, n: usize) -> f64 {
        self.energy[self.cell(t, n)]
    }

    /// Weighted objective contribution of task `t` on node `n`.
    #[inline]
    pub fn cost(&self, t: usize, n: usize) -> f64 {
        self.cost[self.cell(t, n)]
    }

    /// Whether task `t` meets its deadline on node `n`.
    #[inline]
    pub fn meets_deadline(&self, t: usize, n: usize) -> bool {
        self.delay(t, n) <= self.tasks[t].max_tolerance_time
    }

    /// Objective of an assignment (lower = better).
    pub fn objective(&self, assignment: &[usize]) -> f64 {
        debug_assert_eq!(assignment.len(), self.task_count());
        assignment
            .iter()
            .enumerate()
            .map(|(t, &n)| self.cost(t, n))
            .sum()
    }

    /// Fitness of an assignment (`1 / objective`, higher = better).
    ///
    /// Returns 0 for an empty assignment.
    pub fn fitness(&self, assignment: &[usize]) -> f64 {
        let objective = self.objective(assignment);
        if objective > 0.0 {
            1.0 / objective
        } else {
            0.0
        }
    }

    /// Node with the lowest weighted cost for task `t` (lowest index on ties).
    pub fn cheapest_node(&self, t: usize) -> usize {
        (0..self.node_count())
            .min_by(|&a, &b| self.cost(t, a).total_cmp(&self.cost(t, b)))
            .unwrap_or(0)
    }

    /// Percentage of tasks meeting their deadline under `assignment`.
    pub fn reliability(&self, assignment: &[usize]) -> f64 {
        if assignment.is_empty() {
            return 100.0;
        }
        let on_time = assignment
            .iter()
            .enumerate()
            .filter(|&(t, &n)| self.meets_deadline(t, n))
            .count();
        on_time as f64 / assignment.len() as f64 * 100.0
    }

    /// Turns an assignment into a [`Solution`] with all aggregate metrics.
    ///
    /// # Errors
    /// [`ScheduleError::Domain`] if the assignment does not cover every task
    /// exactly once with a valid node index.
    pub fn evaluate(
        &self,
        algorithm: Algorithm,
        assignment: &[usize],
        convergence: Vec<f64>,
    ) -> Result<Solution> {
        if assignment.len() != self.task_count() {
            return Err(ScheduleError::domain(format!(
                "assignment covers {} task(s), expected {}",
                assignment.len(),
                self.task_count()
            )));
        }
        if let Some((t, &n)) = assignment
            .iter()
            .enumerate()
            .find(|&(_, &n)| n >= self.node_count())
        {
            return Err(ScheduleError::domain(format!(
                "task '{}' assigned to node index {n}, only {} node(s)",
                self.tasks[t].id,
                self.node_count()
            )));
        }
        if self.task_count() == 0 {
            let mut empty = Solution::empty(algorithm);
            empty.convergence = convergence;
            return Ok(empty);
        }

        let allocations = assignment
            .iter()
            .enumerate()
            .map(|(t, &n)| Allocation::new(&self.tasks[t].id, &self.nodes[n].id, n))
            .collect();
        let total_delay = assignment.iter().enumerate().map(|(t, &n)| self.delay(t, n)).sum();
        let total_energy = assignment.iter().enumerate().map(|(t, &n)| self.energy(t, n)).sum();
        let objective = self.objective(assignment);

        Ok(Solution {
            algorithm,
            allocations,
            total_delay,
            total_energy,
            objective,
            fitness: cost::fitness(objective)?,
            reliability: self.reliability(assignment),
            convergence,
        })
    }

    /// Per-task breakdown of a solution produced for this problem.
    ///
    /// Allocations whose node index does not belong to this problem are skipped.
    pub fn details(&self, solution: &Solution) -> Vec<TaskDetail> {
        solution
            .allocations
            .iter()
            .filter_map(|a| {
                let t = self.task_index(&a.task_id)?;
                let n = self.node_index(&a.node_id)?;
                Some(TaskDetail {
                    task_id: a.task_id.clone(),
                    node_id: a.node_id.clone(),
                    execution_time: self.execution_time(t, n),
                    transmission_time: self.transmission_time(t, n),
                    total_delay: self.delay(t, n),
                    energy: self.energy(t, n),
                    meets_deadline: self.meets_deadline(t, n),
                })
            })
            .collect()
    }
}
