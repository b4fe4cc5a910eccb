//! Ideal-gas mixture phase.

use crate::error::{ThermoError, ThermoResult};
use crate::phase::{PhaseKind, PhaseState, ThermoPhase, check_len, validate_tp};
use crate::species::SpeciesThermo;
use zd_core::constants::{GAS_CONSTANT, ONE_ATM, T_REF};
use zd_core::units::{Pressure, Temperature};

/// Ideal-gas mixture of species with independent standard-state models.
///
/// ρ = P·M̄/(R·T), partial molar enthalpies and heat capacities equal the
/// species' standard-state values (they depend on temperature only).
#[derive(Debug, Clone)]
pub struct IdealGasMixture {
    species: Vec<SpeciesThermo>,
    mw: Vec<f64>,
    inv_mw: Vec<f64>,
    t: f64,
    p: f64,
    x: Vec<f64>,
}

impl IdealGasMixture {
    /// Create a mixture at 298.15 K, 1 atm, composed of the first species.
    pub fn new(species: Vec<SpeciesThermo>) -> ThermoResult<Self> {
        if species.is_empty() {
            return Err(ThermoError::InvalidArg {
                what: "ideal gas needs at least one species".into(),
            });
        }
        for (i, sp) in species.iter().enumerate() {
            sp.validate()?;
            if species[..i].iter().any(|other| other.name == sp.name) {
                return Err(ThermoError::InvalidArg {
                    what: format!("duplicate species '{}'", sp.name),
                });
            }
        }
        let mw: Vec<f64> = species.iter().map(|s| s.molar_mass).collect();
        let inv_mw = mw.iter().map(|m| 1.0 / m).collect();
        let mut x = vec![0.0; species.len()];
        x[0] = 1.0;
        Ok(Self {
            species,
            mw,
            inv_mw,
            t: T_REF,
            p: ONE_ATM,
            x,
        })
    }

    /// Species definitions in index order.
    pub fn species(&self) -> &[SpeciesThermo] {
        &self.species
    }

    /// Set temperature and pressure from typed quantities.
    pub fn set_temperature_pressure(&mut self, t: Temperature, p: Pressure) -> ThermoResult<()> {
        self.set_state_tp(t.value, p.value)
    }

    /// Set mole fractions; they are normalized to sum to one.
    pub fn set_mole_fractions(&mut self, x: &[f64]) -> ThermoResult<()> {
        check_len("mole fractions", self.species.len(), x.len())?;
        if x.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "mole fractions must be non-negative and finite",
            });
        }
        let sum: f64 = x.iter().sum();
        if sum <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "mole fractions sum to zero",
            });
        }
        for (dst, src) in self.x.iter_mut().zip(x) {
            *dst = src / sum;
        }
        Ok(())
    }

    /// Set mass fractions; they are normalized to sum to one.
    pub fn set_mass_fractions(&mut self, y: &[f64]) -> ThermoResult<()> {
        check_len("mass fractions", self.species.len(), y.len())?;
        let moles: Vec<f64> = y.iter().zip(&self.inv_mw).map(|(yk, w)| yk * w).collect();
        self.set_mole_fractions(&moles)
    }

    /// Molar heat capacity of the mixture [J/(kmol·K)].
    pub fn cp_mole(&self) -> f64 {
        self.species
            .iter()
            .zip(&self.x)
            .map(|(s, xk)| xk * s.cp_mole(self.t))
            .sum()
    }

    /// Molar enthalpy of the mixture [J/kmol].
    pub fn enthalpy_mole(&self) -> f64 {
        self.species
            .iter()
            .zip(&self.x)
            .map(|(s, xk)| xk * s.enthalpy_mole(self.t))
            .sum()
    }

    /// Total molar concentration P/(R·T) [kmol/m³].
    pub fn molar_density(&self) -> f64 {
        self.p / (GAS_CONSTANT * self.t)
    }
}

impl ThermoPhase for IdealGasMixture {
    fn kind(&self) -> PhaseKind {
        PhaseKind::IdealGas
    }

    fn n_species(&self) -> usize {
        self.species.len()
    }

    fn species_name(&self, k: usize) -> &str {
        &self.species[k].name
    }

    fn temperature(&self) -> f64 {
        self.t
    }

    fn pressure(&self) -> f64 {
        self.p
    }

    fn set_state_tp(&mut self, t: f64, p: f64) -> ThermoResult<()> {
        validate_tp(t, p)?;
        self.t = t;
        self.p = p;
        Ok(())
    }

    fn set_moles_no_truncate(&mut self, n: &[f64]) -> ThermoResult<()> {
        check_len("moles", self.species.len(), n.len())?;
        if n.iter().any(|v| !v.is_finite()) {
            return Err(ThermoError::NonPhysical {
                what: "molar amounts must be finite",
            });
        }
        let total: f64 = n.iter().sum();
        if total == 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "total molar amount is zero",
            });
        }
        for (xk, nk) in self.x.iter_mut().zip(n) {
            *xk = nk / total;
        }
        Ok(())
    }

    fn save_state(&self) -> PhaseState {
        PhaseState {
            temperature: self.t,
            pressure: self.p,
            composition: self.x.clone(),
        }
    }

    fn restore_state(&mut self, state: &PhaseState) -> ThermoResult<()> {
        check_len("saved composition", self.species.len(), state.composition.len())?;
        validate_tp(state.temperature, state.pressure)?;
        self.t = state.temperature;
        self.p = state.pressure;
        self.x.copy_from_slice(&state.composition);
        Ok(())
    }

    fn mole_fractions(&self, x: &mut [f64]) {
        x.copy_from_slice(&self.x);
    }

    fn molecular_weights(&self) -> &[f64] {
        &self.mw
    }

    fn inverse_molecular_weights(&self) -> &[f64] {
        &self.inv_mw
    }

    fn mean_molecular_weight(&self) -> f64 {
        zd_core::dot(&self.x, &self.mw)
    }

    fn density(&self) -> f64 {
        self.p * self.mean_molecular_weight() / (GAS_CONSTANT * self.t)
    }

    fn molar_volume(&self) -> f64 {
        GAS_CONSTANT * self.t / self.p
    }

    fn cp_mass(&self) -> f64 {
        self.cp_mole() / self.mean_molecular_weight()
    }

    fn enthalpy_mass(&self) -> f64 {
        self.enthalpy_mole() / self.mean_molecular_weight()
    }

    fn partial_molar_enthalpies(&self, hbar: &mut [f64]) {
        for (h, s) in hbar.iter_mut().zip(&self.species) {
            *h = s.enthalpy_mole(self.t);
        }
    }

    fn partial_molar_cp(&self, cpbar: &mut [f64]) {
        for (c, s) in cpbar.iter_mut().zip(&self.species) {
            *c = s.cp_mole(self.t);
        }
    }

    fn concentrations(&self, c: &mut [f64]) {
        let ctot = self.molar_density();
        for (ck, xk) in c.iter_mut().zip(&self.x) {
            *ck = xk * ctot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zd_core::units::{k, pa};
    use zd_core::{Tolerances, nearly_equal};

    fn air() -> IdealGasMixture {
        let mut gas = IdealGasMixture::new(vec![
            SpeciesThermo::constant_cp("N2", 28.014, 0.0, 191_600.0, 29_124.0),
            SpeciesThermo::constant_cp("O2", 31.998, 0.0, 205_150.0, 29_378.0),
        ])
        .unwrap();
        gas.set_temperature_pressure(k(300.0), pa(101_325.0)).unwrap();
        gas.set_mole_fractions(&[0.79, 0.21]).unwrap();
        gas
    }

    fn tol() -> Tolerances {
        Tolerances {
            abs: 1e-12,
            rel: 1e-10,
        }
    }

    #[test]
    fn air_density_near_one_point_one_seven() {
        let gas = air();
        let rho = gas.density();
        assert!((rho - 1.17).abs() < 0.01, "rho = {rho}");
        assert_eq!(gas.kind(), PhaseKind::IdealGas);
    }

    #[test]
    fn molar_volume_times_molar_density_is_one() {
        let gas = air();
        assert!(nearly_equal(gas.molar_volume() * gas.molar_density(), 1.0, tol()));
    }

    #[test]
    fn cp_mass_is_mole_weighted() {
        let gas = air();
        let cp_mole = 0.79 * 29_124.0 + 0.21 * 29_378.0;
        assert!(nearly_equal(
            gas.cp_mass() * gas.mean_molecular_weight(),
            cp_mole,
            tol()
        ));
    }

    #[test]
    fn moles_set_mole_fractions_without_truncation() {
        let mut gas = air();
        gas.set_moles_no_truncate(&[3.0, -1.0]).unwrap();
        let mut x = [0.0; 2];
        gas.mole_fractions(&mut x);
        assert!(nearly_equal(x[0], 1.5, tol()));
        assert!(nearly_equal(x[1], -0.5, tol()));

        assert!(gas.set_moles_no_truncate(&[1.0, -1.0]).is_err());
        assert!(gas.set_moles_no_truncate(&[1.0]).is_err());
    }

    #[test]
    fn save_and_restore_round_trip() {
        let mut gas = air();
        let saved = gas.save_state();
        gas.set_state_tp(1200.0, 2.0e5).unwrap();
        gas.set_mole_fractions(&[0.0, 1.0]).unwrap();
        gas.restore_state(&saved).unwrap();
        assert_eq!(gas.save_state(), saved);
    }

    #[test]
    fn mass_fractions_sum_to_one() {
        let gas = air();
        let mut y = [0.0; 2];
        gas.mass_fractions(&mut y);
        assert!(nearly_equal(y.iter().sum::<f64>(), 1.0, tol()));
        assert!(y[1] > 0.21);
    }

    #[test]
    fn species_lookup() {
        let gas = air();
        assert_eq!(gas.species_index("O2"), Some(1));
        assert_eq!(gas.species_index("Ar"), None);
        assert_eq!(gas.species_names(), vec!["N2".to_string(), "O2".to_string()]);
    }

    #[test]
    fn duplicate_species_rejected() {
        let sp = SpeciesThermo::constant_cp("A", 10.0, 0.0, 0.0, 1.0);
        assert!(IdealGasMixture::new(vec![sp.clone(), sp]).is_err());
        assert!(IdealGasMixture::new(Vec::new()).is_err());
    }
}
