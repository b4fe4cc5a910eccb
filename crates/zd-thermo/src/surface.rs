//! Site-based surface phase for catalytic walls.

use crate::error::{ThermoError, ThermoResult};
use crate::phase::{PhaseKind, PhaseState, ThermoPhase, check_len, validate_tp};
use crate::species::SpeciesThermo;
use zd_core::constants::{ONE_ATM, T_REF};

/// Ideal surface: adsorbed species on a lattice of sites.
///
/// Concentrations are per unit area, C_k = θ_k·Γ/σ_k with Γ the site density
/// [kmol/m²] and σ_k the number of sites a species occupies.
#[derive(Debug, Clone)]
pub struct SurfacePhase {
    species: Vec<SpeciesThermo>,
    mw: Vec<f64>,
    inv_mw: Vec<f64>,
    sizes: Vec<f64>,
    site_density: f64,
    t: f64,
    p: f64,
    conc: Vec<f64>,
}

impl SurfacePhase {
    /// Create a surface fully covered by the first species, one site per species.
    pub fn new(species: Vec<SpeciesThermo>, site_density: f64) -> ThermoResult<Self> {
        let sizes = vec![1.0; species.len()];
        Self::with_sizes(species, sizes, site_density)
    }

    /// Create a surface with explicit site occupancy per species.
    pub fn with_sizes(
        species: Vec<SpeciesThermo>,
        sizes: Vec<f64>,
        site_density: f64,
    ) -> ThermoResult<Self> {
        if species.is_empty() {
            return Err(ThermoError::InvalidArg {
                what: "surface needs at least one species".into(),
            });
        }
        check_len("site sizes", species.len(), sizes.len())?;
        if !site_density.is_finite() || site_density <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "site density must be positive and finite",
            });
        }
        if sizes.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "site sizes must be positive and finite",
            });
        }
        for (i, sp) in species.iter().enumerate() {
            sp.validate()?;
            if species[..i].iter().any(|other| other.name == sp.name) {
                return Err(ThermoError::InvalidArg {
                    what: format!("duplicate surface species '{}'", sp.name),
                });
            }
        }
        let mw: Vec<f64> = species.iter().map(|s| s.molar_mass).collect();
        let inv_mw = mw.iter().map(|m| 1.0 / m).collect();
        let mut conc = vec![0.0; species.len()];
        conc[0] = site_density / sizes[0];
        Ok(Self {
            species,
            mw,
            inv_mw,
            sizes,
            site_density,
            t: T_REF,
            p: ONE_ATM,
            conc,
        })
    }

    /// Site density Γ [kmol/m²].
    pub fn site_density(&self) -> f64 {
        self.site_density
    }

    /// Set fractional coverages; normalized to sum to one.
    pub fn set_coverages(&mut self, theta: &[f64]) -> ThermoResult<()> {
        check_len("coverages", self.species.len(), theta.len())?;
        if theta.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "coverages must be non-negative and finite",
            });
        }
        let sum: f64 = theta.iter().sum();
        if sum <= 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "coverages sum to zero",
            });
        }
        for ((c, th), size) in self.conc.iter_mut().zip(theta).zip(&self.sizes) {
            *c = th / sum * self.site_density / size;
        }
        Ok(())
    }

    /// Current fractional coverages θ_k = C_k·σ_k/Γ.
    pub fn coverages(&self, theta: &mut [f64]) {
        for ((th, c), size) in theta.iter_mut().zip(&self.conc).zip(&self.sizes) {
            *th = c * size / self.site_density;
        }
    }

    /// Set concentrations [kmol/m²] as given, without normalizing coverages.
    pub fn set_concentrations_no_norm(&mut self, c: &[f64]) -> ThermoResult<()> {
        check_len("surface concentrations", self.species.len(), c.len())?;
        if c.iter().any(|v| !v.is_finite()) {
            return Err(ThermoError::NonPhysical {
                what: "surface concentrations must be finite",
            });
        }
        self.conc.copy_from_slice(c);
        Ok(())
    }

    fn total_concentration(&self) -> f64 {
        self.conc.iter().sum()
    }
}

impl ThermoPhase for SurfacePhase {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Surface
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

    /// Sets coverages proportional to `n_k·σ_k`, scaled to a full site lattice.
    fn set_moles_no_truncate(&mut self, n: &[f64]) -> ThermoResult<()> {
        check_len("surface moles", self.species.len(), n.len())?;
        let sites: f64 = n.iter().zip(&self.sizes).map(|(nk, s)| nk * s).sum();
        if !sites.is_finite() || sites == 0.0 {
            return Err(ThermoError::NonPhysical {
                what: "surface site total is zero or non-finite",
            });
        }
        for (c, nk) in self.conc.iter_mut().zip(n) {
            *c = nk * self.site_density / sites;
        }
        Ok(())
    }

    fn save_state(&self) -> PhaseState {
        PhaseState {
            temperature: self.t,
            pressure: self.p,
            composition: self.conc.clone(),
        }
    }

    fn restore_state(&mut self, state: &PhaseState) -> ThermoResult<()> {
        check_len("saved composition", self.species.len(), state.composition.len())?;
        validate_tp(state.temperature, state.pressure)?;
        self.t = state.temperature;
        self.p = state.pressure;
        self.conc.copy_from_slice(&state.composition);
        Ok(())
    }

    fn mole_fractions(&self, x: &mut [f64]) {
        let total = self.total_concentration();
        for (xk, c) in x.iter_mut().zip(&self.conc) {
            *xk = c / total;
        }
    }

    fn molecular_weights(&self) -> &[f64] {
        &self.mw
    }

    fn inverse_molecular_weights(&self) -> &[f64] {
        &self.inv_mw
    }

    fn mean_molecular_weight(&self) -> f64 {
        zd_core::dot(&self.conc, &self.mw) / self.total_concentration()
    }

    fn density(&self) -> f64 {
        zd_core::dot(&self.conc, &self.mw)
    }

    fn molar_volume(&self) -> f64 {
        1.0 / self.total_concentration()
    }

    fn cp_mass(&self) -> f64 {
        let cp: f64 = self
            .species
            .iter()
            .zip(&self.conc)
            .map(|(s, c)| c * s.cp_mole(self.t))
            .sum();
        cp / self.density()
    }

    fn enthalpy_mass(&self) -> f64 {
        let h: f64 = self
            .species
            .iter()
            .zip(&self.conc)
            .map(|(s, c)| c * s.enthalpy_mole(self.t))
            .sum();
        h / self.density()
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
        c.copy_from_slice(&self.conc);
    }
}
