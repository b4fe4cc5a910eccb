//! Standard-state thermodynamic models for individual species.
//!
//! All molar quantities are per kmol: cp in J/(kmol·K), h in J/kmol, s in J/(kmol·K).

use crate::error::{ThermoError, ThermoResult};
use zd_core::constants::GAS_CONSTANT;

/// One temperature range of a NASA 7-coefficient polynomial.
pub type Nasa7Range = [f64; 7];

/// Temperature dependence of a species' standard-state properties.
#[derive(Debug, Clone, PartialEq)]
pub enum ThermoModel {
    /// Constant heat capacity around a reference point.
    ConstantCp {
        /// Reference temperature [K]
        t0: f64,
        /// Enthalpy at `t0` [J/kmol]
        h0: f64,
        /// Entropy at `t0` [J/(kmol·K)]
        s0: f64,
        /// Heat capacity [J/(kmol·K)]
        cp0: f64,
    },
    /// Two-range NASA polynomials, low range below `t_mid`.
    Nasa7 {
        t_mid: f64,
        low: Nasa7Range,
        high: Nasa7Range,
    },
}

/// Name, molar mass and standard-state model of one species.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesThermo {
    pub name: String,
    /// Molar mass [kg/kmol]
    pub molar_mass: f64,
    pub model: ThermoModel,
}

impl SpeciesThermo {
    /// Species with a constant heat capacity referenced to 298.15 K.
    pub fn constant_cp(name: &str, molar_mass: f64, h0: f64, s0: f64, cp0: f64) -> Self {
        Self {
            name: name.to_string(),
            molar_mass,
            model: ThermoModel::ConstantCp {
                t0: zd_core::constants::T_REF,
                h0,
                s0,
                cp0,
            },
        }
    }

    /// Species described by NASA 7-coefficient polynomials.
    pub fn nasa7(
        name: &str,
        molar_mass: f64,
        t_mid: f64,
        low: Nasa7Range,
        high: Nasa7Range,
    ) -> Self {
        Self {
            name: name.to_string(),
            molar_mass,
            model: ThermoModel::Nasa7 { t_mid, low, high },
        }
    }

    /// Check that the molar mass and model parameters are usable.
    pub fn validate(&self) -> ThermoResult<()> {
        if self.name.trim().is_empty() {
            return Err(ThermoError::InvalidArg {
                what: "species name must not be empty".into(),
            });
        }
        if !self.molar_mass.is_finite() || self.molar_mass <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "molar mass must be positive and finite",
            });
        }
        match &self.model {
            ThermoModel::ConstantCp { t0, h0, s0, cp0 } => {
                if !t0.is_finite() || *t0 <= 0.0 {
                    return Err(ThermoError::NonPhysical {
                        what: "reference temperature must be positive",
                    });
                }
                if !(h0.is_finite() && s0.is_finite() && cp0.is_finite()) {
                    return Err(ThermoError::NonPhysical {
                        what: "constant-cp parameters must be finite",
                    });
                }
            }
            ThermoModel::Nasa7 { t_mid, low, high } => {
                if !t_mid.is_finite() || *t_mid <= 0.0 {
                    return Err(ThermoError::NonPhysical {
                        what: "NASA midpoint temperature must be positive",
                    });
                }
                if low.iter().chain(high.iter()).any(|a| !a.is_finite()) {
                    return Err(ThermoError::NonPhysical {
                        what: "NASA coefficients must be finite",
                    });
                }
            }
        }
        Ok(())
    }

    /// Molar heat capacity at constant pressure [J/(kmol·K)].
    pub fn cp_mole(&self, t: f64) -> f64 {
        match &self.model {
            ThermoModel::ConstantCp { cp0, .. } => *cp0,
            ThermoModel::Nasa7 { t_mid, low, high } => {
                let a = nasa_range(*t_mid, low, high, t);
                GAS_CONSTANT * (a[0] + t * (a[1] + t * (a[2] + t * (a[3] + t * a[4]))))
            }
        }
    }

    /// Molar enthalpy [J/kmol].
    pub fn enthalpy_mole(&self, t: f64) -> f64 {
        match &self.model {
            ThermoModel::ConstantCp { t0, h0, cp0, .. } => h0 + cp0 * (t - t0),
            ThermoModel::Nasa7 { t_mid, low, high } => {
                let a = nasa_range(*t_mid, low, high, t);
                let h_rt = a[0]
                    + t * (a[1] / 2.0 + t * (a[2] / 3.0 + t * (a[3] / 4.0 + t * a[4] / 5.0)))
                    + a[5] / t;
                GAS_CONSTANT * t * h_rt
            }
        }
    }

    /// Standard-state molar entropy [J/(kmol·K)].
    pub fn entropy_mole(&self, t: f64) -> f64 {
        match &self.model {
            ThermoModel::ConstantCp { t0, s0, cp0, .. } => s0 + cp0 * (t / t0).ln(),
            ThermoModel::Nasa7 { t_mid, low, high } => {
                let a = nasa_range(*t_mid, low, high, t);
                let s_r = a[0] * t.ln()
                    + t * (a[1] + t * (a[2] / 2.0 + t * (a[3] / 3.0 + t * a[4] / 4.0)))
                    + a[6];
                GAS_CONSTANT * s_r
            }
        }
    }
}

fn nasa_range<'a>(t_mid: f64, low: &'a Nasa7Range, high: &'a Nasa7Range, t: f64) -> &'a Nasa7Range {
    if t < t_mid { low } else { high }
}
