//! Modified Arrhenius rate constants.

use crate::error::{KineticsError, KineticsResult};
use zd_core::constants::GAS_CONSTANT;

/// k(T) = A·T^b·exp(−Ea/(R·T)), with Ea in J/kmol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrheniusRate {
    /// Pre-exponential factor (units depend on reaction order, kmol-m-s based)
    pub a: f64,
    /// Temperature exponent
    pub b: f64,
    /// Activation energy [J/kmol]
    pub ea: f64,
}

impl ArrheniusRate {
    pub fn new(a: f64, b: f64, ea: f64) -> Self {
        Self { a, b, ea }
    }

    pub fn validate(&self) -> KineticsResult<()> {
        if !(self.a.is_finite() && self.b.is_finite() && self.ea.is_finite()) {
            return Err(KineticsError::InvalidArg {
                what: "Arrhenius parameters must be finite".into(),
            });
        }
        Ok(())
    }

    /// Rate constant at temperature `t` [K].
    pub fn rate_constant(&self, t: f64) -> f64 {
        let mut k = self.a;
        if self.b != 0.0 {
            k *= t.powf(self.b);
        }
        if self.ea != 0.0 {
            k *= (-self.ea / (GAS_CONSTANT * t)).exp();
        }
        k
    }
}
