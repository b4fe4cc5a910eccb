//! Homogeneous gas-phase kinetics.

use crate::error::{KineticsResult, check_len};
use crate::mechanism::{ReactionMechanism, to_csc};
use crate::rate::ArrheniusRate;
use crate::traits::Kinetics;
use sprs::CsMat;
use zd_thermo::ThermoPhase;

/// Mass-action kinetics evaluated against a bulk phase's concentrations.
#[derive(Debug, Clone)]
pub struct GasKinetics {
    mechanism: ReactionMechanism,
    skip_dilution: bool,
}

impl GasKinetics {
    pub fn new(mechanism: ReactionMechanism) -> Self {
        Self {
            mechanism,
            skip_dilution: false,
        }
    }

    /// Build a mechanism over the species of `phase` from `(equation, rate)` pairs.
    pub fn from_equations(
        phase: &dyn ThermoPhase,
        equations: &[(&str, ArrheniusRate)],
    ) -> KineticsResult<Self> {
        let mut mechanism = ReactionMechanism::new(phase.species_names());
        for &(eq, rate) in equations {
            mechanism.add_equation(eq, rate)?;
        }
        Ok(Self::new(mechanism))
    }

    /// Drop the dense dilution term from the mole derivatives. Cheaper and sparser,
    /// but no longer exact.
    pub fn with_skip_dilution(mut self, skip: bool) -> Self {
        self.skip_dilution = skip;
        self
    }

    pub fn skip_dilution(&self) -> bool {
        self.skip_dilution
    }

    pub fn mechanism(&self) -> &ReactionMechanism {
        &self.mechanism
    }

    fn check_phase(&self, phase: &dyn ThermoPhase) -> KineticsResult<()> {
        check_len("phase species", self.mechanism.n_species(), phase.n_species())
    }
}

impl Kinetics for GasKinetics {
    fn n_species(&self) -> usize {
        self.mechanism.n_species()
    }

    fn n_reactions(&self) -> usize {
        self.mechanism.n_reactions()
    }

    fn net_production_rates(
        &self,
        phase: &dyn ThermoPhase,
        wdot: &mut [f64],
    ) -> KineticsResult<()> {
        self.check_phase(phase)?;
        let mut conc = vec![0.0; phase.n_species()];
        phase.concentrations(&mut conc);
        self.mechanism
            .net_production_rates(phase.temperature(), &conc, wdot)
    }

    fn net_production_rates_ddn(&self, phase: &dyn ThermoPhase) -> KineticsResult<CsMat<f64>> {
        self.check_phase(phase)?;
        let n = phase.n_species();
        let mut conc = vec![0.0; n];
        phase.concentrations(&mut conc);
        let mut trips = self
            .mechanism
            .production_rates_ddc_triplets(phase.temperature(), &conc)?;

        if !self.skip_dilution {
            // ∂C_i/∂n_j = (δ_ij − X_i)/V at constant T, P
            let mut x = vec![0.0; n];
            phase.mole_fractions(&mut x);
            let mut dilution = vec![0.0; n];
            let mut touched = vec![false; n];
            for &(k, i, v) in &trips {
                dilution[k] += x[i] * v;
                touched[k] = true;
            }
            for k in (0..n).filter(|&k| touched[k]) {
                trips.extend((0..n).map(|j| (k, j, -dilution[k])));
            }
        }
        Ok(to_csc(n, n, &trips))
    }
}
