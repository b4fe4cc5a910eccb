//! Heterogeneous kinetics on a surface phase.

use crate::error::{KineticsError, KineticsResult, check_len};
use crate::mechanism::ReactionMechanism;
use crate::rate::ArrheniusRate;
use crate::traits::SurfaceKinetics;
use sprs::CsMat;
use zd_thermo::ThermoPhase;

/// Mass-action surface kinetics. Bulk species enter rate laws through their
/// volumetric concentrations, surface species through their areal concentrations.
#[derive(Debug, Clone)]
pub struct InterfaceKinetics {
    mechanism: ReactionMechanism,
    n_bulk: usize,
}

impl InterfaceKinetics {
    /// `mechanism` must list the bulk species first, followed by `n_surface` surface species.
    pub fn new(mechanism: ReactionMechanism, n_bulk: usize) -> KineticsResult<Self> {
        if n_bulk > mechanism.n_species() {
            return Err(KineticsError::LengthMismatch {
                what: "bulk species",
                expected: mechanism.n_species(),
                got: n_bulk,
            });
        }
        Ok(Self { mechanism, n_bulk })
    }

    pub fn from_equations(
        bulk: &dyn ThermoPhase,
        surface: &dyn ThermoPhase,
        equations: &[(&str, ArrheniusRate)],
    ) -> KineticsResult<Self> {
        let mut names = bulk.species_names();
        names.extend(surface.species_names());
        let mut mechanism = ReactionMechanism::new(names);
        for &(eq, rate) in equations {
            mechanism.add_equation(eq, rate)?;
        }
        Self::new(mechanism, bulk.n_species())
    }

    pub fn mechanism(&self) -> &ReactionMechanism {
        &self.mechanism
    }

    fn gather(&self, bulk: &dyn ThermoPhase, surface: &dyn ThermoPhase) -> KineticsResult<Vec<f64>> {
        check_len("bulk species", self.n_bulk, bulk.n_species())?;
        check_len(
            "surface species",
            self.n_surface_species(),
            surface.n_species(),
        )?;
        let mut conc = vec![0.0; self.mechanism.n_species()];
        let (cb, cs) = conc.split_at_mut(self.n_bulk);
        bulk.concentrations(cb);
        surface.concentrations(cs);
        Ok(conc)
    }
}

impl SurfaceKinetics for InterfaceKinetics {
    fn n_bulk_species(&self) -> usize {
        self.n_bulk
    }

    fn n_surface_species(&self) -> usize {
        self.mechanism.n_species() - self.n_bulk
    }

    fn n_reactions(&self) -> usize {
        self.mechanism.n_reactions()
    }

    fn net_production_rates(
        &self,
        bulk: &dyn ThermoPhase,
        surface: &dyn ThermoPhase,
        sdot: &mut [f64],
    ) -> KineticsResult<()> {
        let conc = self.gather(bulk, surface)?;
        self.mechanism
            .net_production_rates(surface.temperature(), &conc, sdot)
    }

    fn net_production_rates_ddc(
        &self,
        bulk: &dyn ThermoPhase,
        surface: &dyn ThermoPhase,
    ) -> KineticsResult<CsMat<f64>> {
        let conc = self.gather(bulk, surface)?;
        self.mechanism
            .production_rates_ddc(surface.temperature(), &conc)
    }
}
