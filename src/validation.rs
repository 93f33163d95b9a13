//! Input validation for fog scheduling workloads.
//!
//! Checks the structural and numeric integrity of tasks, fog nodes, devices
//! and the cloud before any cost is computed. Detects:
//! - Duplicate IDs
//! - Tasks referencing unknown devices
//! - Zero, negative or non-finite quantities where a positive one is required
//! - Loads, weights and priorities outside their ranges

use crate::models::{CloudNode, FogNode, Task, TerminalDevice, Workload, MAX_PRIORITY, MIN_PRIORITY};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A task references a device that doesn't exist.
    UnknownDevice,
    /// A quantity that must be positive is zero, negative or not finite.
    NonPositiveValue,
    /// A value lies outside its accepted range (load, priority, weights).
    OutOfRange,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn check_positive(
    errors: &mut Vec<ValidationError>,
    entity: &str,
    id: &str,
    field: &str,
    value: f64,
) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveValue,
            format!("{entity} '{id}' has non-positive {field}: {value}"),
        ));
    }
}

fn check_non_negative(
    errors: &mut Vec<ValidationError>,
    entity: &str,
    id: &str,
    field: &str,
    value: f64,
) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveValue,
            format!("{entity} '{id}' has negative {field}: {value}"),
        ));
    }
}

/// Validates tasks, fog nodes and devices of a scheduling call.
///
/// Checks:
/// 1. No duplicate task, node or device IDs
/// 2. Every task references an existing device
/// 3. Task size, intensity and deadline are positive
/// 4. Node CPU rate and bandwidth are positive, load within `[0, 1]`
/// 5. Device powers and weights are non-negative, weights not both zero
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    tasks: &[Task],
    nodes: &[FogNode],
    devices: &[TerminalDevice],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut node_ids = HashSet::new();
    for node in nodes {
        if !node_ids.insert(node.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate fog node ID: {}", node.id),
            ));
        }
        check_positive(
            &mut errors,
            "Fog node",
            &node.id,
            "computing_resource",
            node.computing_resource,
        );
        check_positive(
            &mut errors,
            "Fog node",
            &node.id,
            "network_bandwidth",
            node.network_bandwidth,
        );
        if !(0.0..=1.0).contains(&node.current_load) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!("Fog node '{}' has load outside [0, 1]: {}", node.id, node.current_load),
            ));
        }
    }

    let mut device_ids = HashSet::new();
    for device in devices {
        if !device_ids.insert(device.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate device ID: {}", device.id),
            ));
        }
        check_non_negative(
            &mut errors,
            "Device",
            &device.id,
            "transmission_power",
            device.transmission_power,
        );
        check_non_negative(&mut errors, "Device", &device.id, "idle_power", device.idle_power);
        check_non_negative(&mut errors, "Device", &device.id, "delay_weight", device.delay_weight);
        check_non_negative(
            &mut errors,
            "Device",
            &device.id,
            "energy_weight",
            device.energy_weight,
        );
        if device.delay_weight + device.energy_weight <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!("Device '{}' has both objective weights at zero", device.id),
            ));
        }
        if let Some(hz) = device.computing_resource {
            check_positive(&mut errors, "Device", &device.id, "computing_resource", hz);
        }
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
        check_positive(&mut errors, "Task", &task.id, "data_size", task.data_size);
        check_positive(
            &mut errors,
            "Task",
            &task.id,
            "computation_intensity",
            task.computation_intensity,
        );
        check_positive(
            &mut errors,
            "Task",
            &task.id,
            "max_tolerance_time",
            task.max_tolerance_time,
        );
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&task.priority) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!("Task '{}' has priority outside 1..=5: {}", task.id, task.priority),
            ));
        }
        if !device_ids.contains(task.device_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDevice,
                format!("Task '{}' references unknown device '{}'", task.id, task.device_id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a cloud tier.
pub fn validate_cloud(cloud: &CloudNode) -> ValidationResult {
    let mut errors = Vec::new();
    check_positive(&mut errors, "Cloud", &cloud.id, "computing_resource", cloud.computing_resource);
    check_positive(&mut errors, "Cloud", &cloud.id, "network_bandwidth", cloud.network_bandwidth);
    check_positive(&mut errors, "Cloud", &cloud.id, "cost_per_unit", cloud.cost_per_unit);
    check_non_negative(&mut errors, "Cloud", &cloud.id, "latency_penalty", cloud.latency_penalty);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a whole workload, cloud included.
pub fn validate_workload(workload: &Workload) -> ValidationResult {
    let mut errors = validate_input(&workload.tasks, &workload.fog_nodes, &workload.devices)
        .err()
        .unwrap_or_default();
    if let Some(cloud) = &workload.cloud {
        if let Err(cloud_errors) = validate_cloud(cloud) {
            errors.extend(cloud_errors);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nodes() -> Vec<FogNode> {
        vec![
            FogNode::new("F1", 2.0e9, 100.0).with_load(0.3),
            FogNode::new("F2", 1.0e9, 50.0),
        ]
    }

    fn sample_devices() -> Vec<TerminalDevice> {
        vec![
            TerminalDevice::mobile("D1", 0.5, 0.1, 1000.0),
            TerminalDevice::fixed("D2", 1.0, 0.2),
        ]
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task::new("T1", 20.0, 300.0, 10.0).with_device("D1"),
            Task::new("T2", 40.0, 200.0, 20.0).with_device("D2").with_priority(5),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_tasks(), &sample_nodes(), &sample_devices()).is_ok());
    }

    #[test]
    fn test_duplicate_task_id() {
        let mut tasks = sample_tasks();
        tasks[1].id = "T1".into();
        let errors = validate_input(&tasks, &sample_nodes(), &sample_devices()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("task")));
    }

    #[test]
    fn test_duplicate_node_id() {
        let nodes = vec![FogNode::new("F1", 1.0e9, 10.0), FogNode::new("F1", 1.0e9, 10.0)];
        let errors = validate_input(&sample_tasks(), &nodes, &sample_devices()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("fog node")));
    }

    #[test]
    fn test_unknown_device() {
        let tasks = vec![Task::new("T1", 1.0, 1.0, 1.0).with_device("NOPE")];
        let errors = validate_input(&tasks, &sample_nodes(), &sample_devices()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownDevice));
    }

    #[test]
    fn test_non_positive_quantities() {
        let nodes = vec![FogNode::new("F1", 0.0, -5.0)];
        let tasks = vec![Task::new("T1", 0.0, 100.0, 1.0).with_device("D1")];
        let errors = validate_input(&tasks, &nodes, &sample_devices()).unwrap_err();
        let numeric = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::NonPositiveValue)
            .count();
        assert_eq!(numeric, 3);
    }

    #[test]
    fn test_out_of_range() {
        let mut nodes = sample_nodes();
        nodes[0].current_load = 1.5;
        let mut tasks = sample_tasks();
        tasks[0].priority = 0;
        let devices = vec![
            TerminalDevice::mobile("D1", 0.5, 0.1, 1.0).with_weights(0.0, 0.0),
            TerminalDevice::fixed("D2", 1.0, 0.2),
        ];
        let errors = validate_input(&tasks, &nodes, &devices).unwrap_err();
        let out_of_range = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::OutOfRange)
            .count();
        assert_eq!(out_of_range, 3);
    }

    #[test]
    fn test_cloud_validation() {
        assert!(validate_cloud(&CloudNode::new("C", 1.0e10, 10.0, 0.1, 0.01)).is_ok());
        let errors = validate_cloud(&CloudNode::new("C", 1.0e10, 10.0, -0.1, 0.0)).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_workload_collects_everything() {
        let workload = Workload::new(
            vec![Task::new("T1", 1.0, 1.0, 1.0).with_device("UNKNOWN")],
            sample_nodes(),
            sample_devices(),
        )
        .with_cloud(CloudNode::new("C", 0.0, 10.0, 0.1, 0.01));

        let errors = validate_workload(&workload).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
