//! Thermodynamic property errors.

use thiserror::Error;
use zd_core::ZdError;

/// Result type for thermodynamic operations.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors that can occur while setting or querying a phase.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Non-physical values (negative temperature, zero total moles, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    /// Species name not present in the phase.
    #[error("Unknown species '{name}'")]
    UnknownSpecies { name: String },

    /// Buffer length does not match the number of species.
    #[error("Length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}

impl From<ThermoError> for ZdError {
    fn from(err: ThermoError) -> Self {
        match err {
            ThermoError::NonPhysical { what } => ZdError::Invariant {
                what: format!("Non-physical thermo value: {}", what),
            },
            ThermoError::InvalidArg { what } => ZdError::InvalidArg { what },
            ThermoError::UnknownSpecies { name } => ZdError::InvalidArg {
                what: format!("unknown species {}", name),
            },
            ThermoError::LengthMismatch { what, expected, got } => ZdError::IndexOob {
                what,
                index: got,
                len: expected,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ThermoError::NonPhysical { what: "temperature" };
        assert!(err.to_string().contains("temperature"));

        let err = ThermoError::UnknownSpecies { name: "XY".into() };
        assert!(err.to_string().contains("XY"));
    }

    #[test]
    fn error_to_zd_error() {
        let err = ThermoError::LengthMismatch {
            what: "moles",
            expected: 3,
            got: 2,
        };
        let zd: ZdError = err.into();
        assert!(matches!(zd, ZdError::IndexOob { len: 3, .. }));
    }
}
