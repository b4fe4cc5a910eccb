//! Error types for kinetics operations.

use thiserror::Error;
use zd_core::error::ZdError;
use zd_thermo::ThermoError;

/// Errors that can occur while building or evaluating kinetics.
#[derive(Error, Debug, Clone)]
pub enum KineticsError {
    #[error("Cannot parse reaction '{equation}': {what}")]
    Parse { equation: String, what: String },

    #[error("Unknown species '{name}' in reaction '{equation}'")]
    UnknownSpecies { name: String, equation: String },

    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Thermo error: {0}")]
    Thermo(#[from] ThermoError),
}

pub type KineticsResult<T> = Result<T, KineticsError>;

impl From<KineticsError> for ZdError {
    fn from(e: KineticsError) -> Self {
        match e {
            KineticsError::LengthMismatch {
                what,
                expected,
                got,
            } => ZdError::IndexOob {
                what,
                index: got,
                len: expected,
            },
            KineticsError::Thermo(err) => err.into(),
            other => ZdError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}

pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> KineticsResult<()> {
    if expected != got {
        return Err(KineticsError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = KineticsError::UnknownSpecies {
            name: "Q".into(),
            equation: "A => Q".into(),
        };
        assert!(err.to_string().contains("A => Q"));
    }

    #[test]
    fn error_conversion() {
        let err = KineticsError::NotSupported { what: "reversible" };
        let zd: ZdError = err.into();
        assert!(matches!(zd, ZdError::InvalidArg { .. }));

        let err: KineticsError = ThermoError::NonPhysical { what: "t" }.into();
        let zd: ZdError = err.into();
        assert!(matches!(zd, ZdError::Invariant { .. }));
    }
}
