//! Solution quality metrics (KPIs).
//!
//! Computes load and deadline indicators for a [`Solution`] against the
//! [`Problem`] it was produced for. Nodes run their tasks back to back, so a
//! node's busy time is the sum of the total delays placed on it.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Largest per-node busy time |
//! | On-Time Rate | Fraction of tasks meeting `max_tolerance_time` |
//! | Avg / Max Delay | Mean and largest per-task total delay |
//! | Count Spread | Max − min tasks per node (idle nodes count as 0) |
//! | Avg Utilization | Mean of busy time / makespan over all nodes |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use crate::models::Solution;
use crate::problem::Problem;

/// Solution performance indicators. Times are in seconds.
#[derive(Debug, Clone)]
pub struct SolutionKpi {
    /// Largest per-node busy time.
    pub makespan: f64,
    /// Fraction of tasks meeting their deadline (0.0..1.0).
    pub on_time_rate: f64,
    /// Number of tasks missing their deadline.
    pub deadline_misses: usize,
    /// Mean per-task total delay.
    pub avg_delay: f64,
    /// Largest per-task total delay.
    pub max_delay: f64,
    /// Tasks per node id.
    pub tasks_by_node: HashMap<String, usize>,
    /// Busy time per node id.
    pub busy_by_node: HashMap<String, f64>,
    /// Difference between the most and least loaded node, in task counts.
    pub count_spread: usize,
    /// Average node utilization relative to the makespan (0.0..1.0).
    pub avg_utilization: f64,
}

impl SolutionKpi {
    /// Computes KPIs for `solution`.
    ///
    /// Allocations that do not resolve against `problem` are ignored.
    pub fn calculate(problem: &Problem<'_>, solution: &Solution) -> Self {
        let details = problem.details(solution);

        let mut tasks_by_node: HashMap<String, usize> = problem
            .nodes()
            .iter()
            .map(|n| (n.id.clone(), 0))
            .collect();
        let mut busy_by_node: HashMap<String, f64> = problem
            .nodes()
            .iter()
            .map(|n| (n.id.clone(), 0.0))
            .collect();

        let mut on_time = 0usize;
        let mut total_delay = 0.0;
        let mut max_delay: f64 = 0.0;
        for d in &details {
            *tasks_by_node.entry(d.node_id.clone()).or_default() += 1;
            *busy_by_node.entry(d.node_id.clone()).or_default() += d.total_delay;
            total_delay += d.total_delay;
            max_delay = max_delay.max(d.total_delay);
            if d.meets_deadline {
                on_time += 1;
            }
        }

        let makespan = busy_by_node.values().copied().fold(0.0, f64::max);
        let count_spread = match (tasks_by_node.values().max(), tasks_by_node.values().min()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        };
        let avg_utilization = if makespan > 0.0 && !busy_by_node.is_empty() {
            busy_by_node.values().map(|b| b / makespan).sum::<f64>() / busy_by_node.len() as f64
        } else {
            0.0
        };

        let counted = details.len();
        Self {
            makespan,
            on_time_rate: if counted == 0 { 1.0 } else { on_time as f64 / counted as f64 },
            deadline_misses: counted - on_time,
            avg_delay: if counted == 0 { 0.0 } else { total_delay / counted as f64 },
            max_delay,
            tasks_by_node,
            busy_by_node,
            count_spread,
            avg_utilization,
        }
    }

    /// Whether the solution meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_delay: f64, min_on_time_rate: f64) -> bool {
        self.max_delay <= max_delay && self.on_time_rate >= min_on_time_rate
    }
}
