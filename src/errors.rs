//! Error types for layerbudget
//!
//! Malformed input and aborted searches are errors. Infeasibility and
//! discretization loss are normal outcomes and live on `Solution` instead.

use thiserror::Error;

use crate::problem::ProblemDefect;

/// Main error type for the allocator
#[derive(Error, Debug)]
pub enum AllocatorError {
    /// Problem failed construction-time validation
    #[error("Invalid problem: {defect}")]
    InvalidProblem { defect: ProblemDefect },

    /// Cooperative cancellation observed mid-search
    #[error("Solve cancelled after {after} evaluations")]
    Cancelled { after: u64 },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("Allocator error: {0}")]
    Generic(String),
}

impl From<ProblemDefect> for AllocatorError {
    fn from(defect: ProblemDefect) -> Self {
        AllocatorError::InvalidProblem { defect }
    }
}

/// Result type alias for allocator operations
pub type Result<T> = std::result::Result<T, AllocatorError>;

/// Convert anyhow errors to AllocatorError
impl From<anyhow::Error> for AllocatorError {
    fn from(err: anyhow::Error) -> Self {
        AllocatorError::Generic(err.to_string())
    }
}
