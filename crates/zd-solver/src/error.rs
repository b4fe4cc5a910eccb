//! Error types for solver operations.

use thiserror::Error;
use zd_core::error::ZdError;
use zd_reactor::ReactorError;

/// Errors that can occur while integrating reactors.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Reactor error: {0}")]
    Reactor(#[from] ReactorError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for ZdError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::InvalidArg { what } => ZdError::InvalidArg { what },
            SolverError::Reactor(err) => err.into(),
            other => ZdError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
