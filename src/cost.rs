//! Delay and energy cost model.
//!
//! Pure functions pricing a (task, node, device) triple. Every other module
//! builds on these.
//!
//! # Formulas
//!
//! | Quantity | Definition |
//! |----------|-----------|
//! | Execution time | `data_size * 1e6 * 8 * computation_intensity / computing_resource` |
//! | Transmission time | `data_size / network_bandwidth` |
//! | Total delay | execution + transmission (+ node latency penalty) |
//! | Energy | `transmission_time * transmission_power + execution_time * idle_power` |
//! | Weighted cost | `delay_weight * total_delay + energy_weight * energy` |
//! | Fitness | `1 / Σ weighted cost` |
//!
//! All functions reject zero, negative or non-finite inputs with
//! [`ScheduleError::Domain`].

use crate::error::{Result, ScheduleError};
use crate::models::{ComputeNode, Task, TerminalDevice};

fn ensure_positive(value: f64, what: &str, owner: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ScheduleError::domain(format!(
            "{what} of '{owner}' must be positive and finite, got {value}"
        )))
    }
}

fn ensure_non_negative(value: f64, what: &str, owner: &str) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ScheduleError::domain(format!(
            "{what} of '{owner}' must be non-negative and finite, got {value}"
        )))
    }
}

/// Seconds the node needs to process the task.
///
/// # Example
/// ```
/// use fog_schedule::cost::execution_time;
/// use fog_schedule::models::{FogNode, Task};
///
/// let task = Task::new("T1", 2.0, 300.0, 5.0);
/// let node = FogNode::new("F1", 1.5e9, 75.0);
/// assert!((execution_time(&task, &node).unwrap() - 3.2).abs() < 1e-9);
/// ```
pub fn execution_time<N: ComputeNode + ?Sized>(task: &Task, node: &N) -> Result<f64> {
    let size = ensure_positive(task.data_size, "data_size", &task.id)?;
    let intensity = ensure_positive(task.computation_intensity, "computation_intensity", &task.id)?;
    let rate = ensure_positive(node.computing_resource(), "computing_resource", node.id())?;
    Ok(size * 1e6 * 8.0 * intensity / rate)
}

/// Seconds needed to ship the task's input to the node.
pub fn transmission_time<N: ComputeNode + ?Sized>(task: &Task, node: &N) -> Result<f64> {
    let size = ensure_positive(task.data_size, "data_size", &task.id)?;
    let bandwidth = ensure_positive(node.network_bandwidth(), "network_bandwidth", node.id())?;
    Ok(size / bandwidth)
}

/// Execution + transmission time, plus the node's fixed latency penalty.
pub fn total_delay<N: ComputeNode + ?Sized>(task: &Task, node: &N) -> Result<f64> {
    let penalty = ensure_non_negative(node.latency_penalty(), "latency_penalty", node.id())?;
    Ok(execution_time(task, node)? + transmission_time(task, node)? + penalty)
}

/// Energy the originating device spends while the task runs on `node` (J).
///
/// The device transmits during the upload and idles during remote execution.
pub fn energy_consumption<N: ComputeNode + ?Sized>(
    task: &Task,
    node: &N,
    device: &TerminalDevice,
) -> Result<f64> {
    let tx_power =
        ensure_non_negative(device.transmission_power, "transmission_power", &device.id)?;
    let idle_power = ensure_non_negative(device.idle_power, "idle_power", &device.id)?;
    Ok(transmission_time(task, node)? * tx_power + execution_time(task, node)? * idle_power)
}

/// Energy spent on the upload alone (J).
pub fn transmission_energy<N: ComputeNode + ?Sized>(
    task: &Task,
    node: &N,
    device: &TerminalDevice,
) -> Result<f64> {
    let tx_power =
        ensure_non_negative(device.transmission_power, "transmission_power", &device.id)?;
    Ok(transmission_time(task, node)? * tx_power)
}

/// The task's contribution to the objective on `node`.
pub fn weighted_cost<N: ComputeNode + ?Sized>(
    task: &Task,
    node: &N,
    device: &TerminalDevice,
) -> Result<f64> {
    let wd = ensure_non_negative(device.delay_weight, "delay_weight", &device.id)?;
    let we = ensure_non_negative(device.energy_weight, "energy_weight", &device.id)?;
    Ok(wd * total_delay(task, node)? + we * energy_consumption(task, node, device)?)
}

/// Weighted delay + energy objective of a full assignment.
///
/// `assignment[i]` is the index into `nodes` of the node running `tasks[i]`,
/// and `devices[i]` is the device that originated `tasks[i]`.
pub fn objective<N: ComputeNode>(
    tasks: &[Task],
    nodes: &[N],
    devices: &[&TerminalDevice],
    assignment: &[usize],
) -> Result<f64> {
    if tasks.len() != assignment.len() || tasks.len() != devices.len() {
        return Err(ScheduleError::domain(format!(
            "assignment covers {} task(s) and {} device(s), expected {}",
            assignment.len(),
            devices.len(),
            tasks.len()
        )));
    }
    tasks
        .iter()
        .zip(assignment)
        .zip(devices)
        .try_fold(0.0, |acc, ((task, &node_idx), device)| -> Result<f64> {
            let node = nodes.get(node_idx).ok_or_else(|| {
                ScheduleError::domain(format!(
                    "task '{}' assigned to node index {node_idx}, only {} node(s)",
                    task.id,
                    nodes.len()
                ))
            })?;
            Ok(acc + weighted_cost(task, node, device)?)
        })
}

/// Converts an objective value into fitness (`1 / objective`).
pub fn fitness(objective: f64) -> Result<f64> {
    if objective.is_finite() && objective > 0.0 {
        Ok(1.0 / objective)
    } else {
        Err(ScheduleError::domain(format!(
            "objective must be positive and finite to compute fitness, got {objective}"
        )))
    }
}
