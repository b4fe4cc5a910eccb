//! Error types for reactor operations.

use thiserror::Error;
use zd_core::error::ZdError;
use zd_kinetics::KineticsError;
use zd_thermo::{PhaseKind, ThermoError};

/// Errors raised by the reactor core. All of them are contract violations that
/// are reported to the caller as-is; nothing here is retried.
#[derive(Error, Debug, Clone)]
pub enum ReactorError {
    #[error("Reactor must be initialized first ({what})")]
    NotInitialized { what: &'static str },

    #[error("Incompatible phase type: expected {expected}, got {got}")]
    IncompatiblePhase { expected: PhaseKind, got: PhaseKind },

    #[error("Index {index} is out of bounds (len={len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("State buffer length mismatch for {what}: expected {expected}, got {got}")]
    StateLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    #[error("Species count mismatch for {what}: expected {expected}, got {got}")]
    SpeciesMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Thermo error: {0}")]
    Thermo(#[from] ThermoError),

    #[error("Kinetics error: {0}")]
    Kinetics(#[from] KineticsError),
}

pub type ReactorResult<T> = Result<T, ReactorError>;

impl From<ReactorError> for ZdError {
    fn from(e: ReactorError) -> Self {
        match e {
            ReactorError::IndexOutOfBounds { index, len } => ZdError::IndexOob {
                what: "reactor component",
                index,
                len,
            },
            ReactorError::StateLength { what, expected, got } => ZdError::IndexOob {
                what,
                index: got,
                len: expected,
            },
            ReactorError::Thermo(err) => err.into(),
            ReactorError::Kinetics(err) => err.into(),
            ReactorError::InvalidArg { what } => ZdError::InvalidArg { what },
            ReactorError::NonFinite { what, value } => ZdError::NonFinite { what, value },
            other => ZdError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

impl From<ZdError> for ReactorError {
    fn from(e: ZdError) -> Self {
        match e {
            ZdError::NonFinite { what, value } => ReactorError::NonFinite { what, value },
            ZdError::IndexOob { index, len, .. } => ReactorError::IndexOutOfBounds { index, len },
            ZdError::InvalidArg { what } | ZdError::Invariant { what } => {
                ReactorError::InvalidArg { what }
            }
        }
    }
}

pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> ReactorResult<()> {
    if expected != got {
        return Err(ReactorError::StateLength {
            what,
            expected,
            got,
        });
    }
    Ok(())
}
