//! Error types for loading, configuration and estimation

use thiserror::Error;

/// Fatal input errors: the loan file or configuration cannot be used as given.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("The required column '{0}' was not found in the loan file.")]
    MissingColumn(&'static str),
    #[error("Row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("Invalid date '{value}' (expected {expected})")]
    InvalidDate {
        value: String,
        expected: &'static str,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Conditions under which a survival or hazard curve cannot be fitted.
///
/// Callers are expected to guard population size before fitting; these are
/// returned rather than panicking when they don't.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    #[error("cannot fit a curve on an empty population")]
    EmptyPopulation,
    #[error("duration {0} is negative or not finite")]
    InvalidDuration(f64),
}
