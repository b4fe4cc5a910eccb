//! Phase trait and state snapshots.

use crate::error::{ThermoError, ThermoResult};
use std::fmt;

/// Type tag of a phase, checked by consumers that only accept one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    IdealGas,
    Surface,
}

impl PhaseKind {
    pub fn key(&self) -> &'static str {
        match self {
            PhaseKind::IdealGas => "ideal-gas",
            PhaseKind::Surface => "ideal-surface",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Snapshot of the independent state of a phase: T, P and composition.
///
/// `composition` holds mole fractions for bulk phases and concentrations for
/// surface phases; it is opaque to everything except the phase that produced it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseState {
    pub temperature: f64,
    pub pressure: f64,
    pub composition: Vec<f64>,
}

/// Thermodynamic property interface of a phase.
///
/// A phase is mutated in place (`set_state_tp`, `set_moles_no_truncate`,
/// `restore_state`) and queried for properties of its current state. Buffers passed
/// to the `get_*`-style methods must have length `n_species()`.
///
/// Implementations must be Send + Sync so that independent reactors, each owning
/// their own phases, can be evaluated on different threads.
pub trait ThermoPhase: Send + Sync {
    /// Phase type tag.
    fn kind(&self) -> PhaseKind;

    /// Number of species in the phase.
    fn n_species(&self) -> usize;

    /// Name of species `k`.
    fn species_name(&self, k: usize) -> &str;

    /// Index of the species named `name`, if present.
    fn species_index(&self, name: &str) -> Option<usize> {
        (0..self.n_species()).find(|&k| self.species_name(k) == name)
    }

    /// Temperature [K].
    fn temperature(&self) -> f64;

    /// Pressure [Pa].
    fn pressure(&self) -> f64;

    /// Set temperature and pressure, keeping the composition.
    fn set_state_tp(&mut self, t: f64, p: f64) -> ThermoResult<()>;

    /// Set the composition from molar amounts [kmol] without clipping negative values.
    fn set_moles_no_truncate(&mut self, n: &[f64]) -> ThermoResult<()>;

    /// Copy the current state into a snapshot.
    fn save_state(&self) -> PhaseState;

    /// Put back a snapshot previously produced by `save_state`.
    fn restore_state(&mut self, state: &PhaseState) -> ThermoResult<()>;

    /// Current mole fractions.
    fn mole_fractions(&self, x: &mut [f64]);

    /// Current mass fractions.
    fn mass_fractions(&self, y: &mut [f64]) {
        self.mole_fractions(y);
        let mw = self.molecular_weights();
        let mean = self.mean_molecular_weight();
        for (yk, mk) in y.iter_mut().zip(mw) {
            *yk *= mk / mean;
        }
    }

    /// Molecular weights [kg/kmol].
    fn molecular_weights(&self) -> &[f64];

    /// Inverse molecular weights [kmol/kg].
    fn inverse_molecular_weights(&self) -> &[f64];

    /// Mole-fraction-weighted molecular weight [kg/kmol].
    fn mean_molecular_weight(&self) -> f64;

    /// Density [kg/m³] for bulk phases, [kg/m²] for surfaces.
    fn density(&self) -> f64;

    /// Molar volume [m³/kmol] for bulk phases, [m²/kmol] for surfaces.
    fn molar_volume(&self) -> f64;

    /// Specific heat capacity at constant pressure [J/(kg·K)].
    fn cp_mass(&self) -> f64;

    /// Specific enthalpy [J/kg].
    fn enthalpy_mass(&self) -> f64;

    /// Partial molar enthalpies [J/kmol].
    fn partial_molar_enthalpies(&self, hbar: &mut [f64]);

    /// Partial molar heat capacities [J/(kmol·K)].
    fn partial_molar_cp(&self, cpbar: &mut [f64]);

    /// Species concentrations [kmol/m³] or [kmol/m²].
    fn concentrations(&self, c: &mut [f64]);

    /// Names of all species, in index order.
    fn species_names(&self) -> Vec<String> {
        (0..self.n_species())
            .map(|k| self.species_name(k).to_string())
            .collect()
    }
}

/// Ensure a buffer matches the species count.
pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> ThermoResult<()> {
    if expected != got {
        return Err(ThermoError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

/// Ensure temperature and pressure are positive and finite.
pub(crate) fn validate_tp(t: f64, p: f64) -> ThermoResult<()> {
    if !t.is_finite() || t <= 0.0 {
        return Err(ThermoError::NonPhysical {
            what: "temperature must be positive and finite",
        });
    }
    if !p.is_finite() || p <= 0.0 {
        return Err(ThermoError::NonPhysical {
            what: "pressure must be positive and finite",
        });
    }
    Ok(())
}
