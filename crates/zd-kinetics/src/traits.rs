//! Kinetics interfaces used by reactors.

use crate::error::KineticsResult;
use sprs::CsMat;
use zd_thermo::ThermoPhase;

/// Homogeneous kinetics in a single bulk phase.
pub trait Kinetics: Send + Sync {
    fn n_species(&self) -> usize;

    fn n_reactions(&self) -> usize;

    /// Net molar production rates ω̇_k [kmol/m³/s] at the phase's current state.
    fn net_production_rates(&self, phase: &dyn ThermoPhase, wdot: &mut [f64])
    -> KineticsResult<()>;

    /// Sparse V·∂ω̇_k/∂n_j at fixed temperature and pressure, with the volume
    /// treated as a function of the moles.
    ///
    /// The volume-change term ω̇_k·v̄ that turns this into ∂(V·ω̇_k)/∂n_j is left
    /// to the caller.
    fn net_production_rates_ddn(&self, phase: &dyn ThermoPhase) -> KineticsResult<CsMat<f64>>;
}

/// Heterogeneous kinetics on a surface bordering one bulk phase.
///
/// Species are ordered bulk first, then surface.
pub trait SurfaceKinetics: Send + Sync {
    fn n_bulk_species(&self) -> usize;

    fn n_surface_species(&self) -> usize;

    fn n_reactions(&self) -> usize;

    fn n_total_species(&self) -> usize {
        self.n_bulk_species() + self.n_surface_species()
    }

    /// Net production rates per unit area [kmol/m²/s], bulk then surface species.
    fn net_production_rates(
        &self,
        bulk: &dyn ThermoPhase,
        surface: &dyn ThermoPhase,
        sdot: &mut [f64],
    ) -> KineticsResult<()>;

    /// Sparse ∂ṡ_k/∂C_j at fixed temperature, over the combined species list.
    fn net_production_rates_ddc(
        &self,
        bulk: &dyn ThermoPhase,
        surface: &dyn ThermoPhase,
    ) -> KineticsResult<CsMat<f64>>;
}
