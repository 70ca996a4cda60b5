//! Error types for engine operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for engine operations.
///
/// Covers the failure modes of training and inference: empty datasets,
/// singular design matrices, dimension mismatches, and invalid
/// hyperparameters. All are synchronous, non-retryable input errors.
///
/// # Examples
///
/// ```
/// use pronostico::error::EngineError;
///
/// let err = EngineError::EmptyDataset {
///     context: "regression training".to_string(),
/// };
/// assert!(err.to_string().contains("empty dataset"));
/// ```
#[derive(Debug)]
pub enum EngineError {
    /// No training data was supplied, or fewer records than required.
    EmptyDataset {
        /// Which operation received the empty input
        context: String,
    },

    /// Matrix is singular (non-invertible); the design is degenerate or
    /// collinear.
    SingularMatrix {
        /// Pivot value that fell below the epsilon threshold
        pivot: f64,
        /// Pivot column at which elimination failed
        column: usize,
    },

    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::EmptyDataset { context } => {
                write!(f, "empty dataset: {context}")
            }
            EngineError::SingularMatrix { pivot, column } => {
                write!(
                    f,
                    "Singular matrix detected: pivot {pivot} in column {column}, cannot invert"
                )
            }
            EngineError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Matrix dimension mismatch: expected {expected}, got {actual}"
                )
            }
            EngineError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            EngineError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<&str> for EngineError {
    fn from(msg: &str) -> Self {
        EngineError::Other(msg.to_string())
    }
}

impl From<String> for EngineError {
    fn from(msg: String) -> Self {
        EngineError::Other(msg)
    }
}

impl EngineError {
    /// Create an empty dataset error with operation context.
    #[must_use]
    pub fn empty_dataset(context: &str) -> Self {
        Self::EmptyDataset {
            context: context.to_string(),
        }
    }

    /// Create a dimension mismatch error with descriptive context.
    #[must_use]
    pub fn dimension_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, EngineError>;
