//! Task model.
//!
//! A task is a unit of work produced by a terminal device. Its size and
//! computation intensity drive every delay and energy figure in the cost model.

use serde::{Deserialize, Serialize};

/// Lowest accepted priority.
pub const MIN_PRIORITY: u8 = 1;
/// Highest accepted priority.
pub const MAX_PRIORITY: u8 = 5;

/// A task to be placed on a fog node or the cloud.
///
/// # Units
/// - `data_size`: megabits (Mb)
/// - `computation_intensity`: CPU cycles per bit
/// - `max_tolerance_time`, `expected_completion_time`: seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Input data size (Mb).
    pub data_size: f64,
    /// CPU cycles required per bit of input.
    pub computation_intensity: f64,
    /// Deadline: the latest acceptable total delay (s).
    pub max_tolerance_time: f64,
    /// Advisory completion estimate (s), e.g. from an external predictor. Not enforced.
    pub expected_completion_time: Option<f64>,
    /// Originating terminal device.
    pub device_id: String,
    /// Priority in `1..=5` (higher = more important). Only used for tie-breaks.
    pub priority: u8,
}

impl Task {
    /// Creates a task with the given size, intensity and deadline.
    pub fn new(
        id: impl Into<String>,
        data_size: f64,
        computation_intensity: f64,
        max_tolerance_time: f64,
    ) -> Self {
        Self {
            id: id.into(),
            data_size,
            computation_intensity,
            max_tolerance_time,
            expected_completion_time: None,
            device_id: String::new(),
            priority: MIN_PRIORITY,
        }
    }

    /// Sets the originating device.
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    /// Sets the priority, clamped to `1..=5`.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(MIN_PRIORITY, MAX_PRIORITY);
        self
    }

    /// Sets the advisory expected completion time (s).
    pub fn with_expected_completion(mut self, seconds: f64) -> Self {
        self.expected_completion_time = Some(seconds);
        self
    }

    /// Input size in bits.
    #[inline]
    pub fn data_bits(&self) -> f64 {
        self.data_size * 1e6 * 8.0
    }

    /// Total CPU cycles needed to process the task.
    #[inline]
    pub fn cycles(&self) -> f64 {
        self.data_bits() * self.computation_intensity
    }

    /// Workload units billed by the cloud (`data_size * computation_intensity`).
    #[inline]
    pub fn billing_units(&self) -> f64 {
        self.data_size * self.computation_intensity
    }
}
