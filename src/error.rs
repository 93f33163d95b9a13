//! Error type for scheduling operations.

use thiserror::Error;

use crate::validation::{ValidationError, ValidationErrorKind};

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors raised while building or solving a scheduling problem.
///
/// Metaheuristics never fail because of poor convergence: a weak result is
/// reported through the returned fitness and reliability, not through this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Tasks were supplied but there is no node to run them on.
    #[error("no resources available: {tasks} task(s) but no fog node")]
    NoResourcesAvailable {
        /// Number of tasks that could not be placed.
        tasks: usize,
    },

    /// The requested strategy name is not one of the known algorithms.
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// A numeric input is zero, negative or not finite where a positive value is required.
    #[error("domain error: {0}")]
    Domain(String),

    /// Structural problems in the workload (duplicate ids, dangling references, ...).
    #[error("invalid workload: {}", summarize(.0))]
    InvalidWorkload(Vec<ValidationError>),
}

impl ScheduleError {
    /// Builds a domain error.
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    /// Converts collected validation errors into a single error.
    ///
    /// Numeric problems take precedence and surface as [`ScheduleError::Domain`].
    pub fn from_validation(errors: Vec<ValidationError>) -> Self {
        let numeric: Vec<&ValidationError> = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::NonPositiveValue)
            .collect();
        if numeric.is_empty() {
            Self::InvalidWorkload(errors)
        } else {
            Self::Domain(
                numeric
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        }
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
