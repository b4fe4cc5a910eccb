//! Inlet and outlet contributions to the reactor balances.

use std::sync::Arc;

use crate::connector::FlowConnector;

/// Summed flow contributions: energy-row RHS [W] and species-row RHS [kmol/s].
#[derive(Debug, Clone, PartialEq)]
pub struct FlowTerms {
    pub energy: f64,
    pub species: Vec<f64>,
}

impl FlowTerms {
    /// Aggregate all connectors. Outlets are applied before inlets.
    ///
    /// Outlets remove each species in proportion to the reactor composition and
    /// carry no energy term, since the removed fluid has the bulk's own enthalpy.
    /// Inlets add `mdot·h_in` to the energy row and their molar species flows to
    /// the species rows, and remove `h_k·mdot_k/M_k` from the energy row at the
    /// reactor's partial molar enthalpies `hk`.
    pub fn collect(
        outlets: &[Arc<dyn FlowConnector>],
        inlets: &[Arc<dyn FlowConnector>],
        inv_mw: &[f64],
        hk: &[f64],
    ) -> Self {
        let mut terms = Self {
            energy: 0.0,
            species: vec![0.0; inv_mw.len()],
        };
        for outlet in outlets {
            for (n, dndt) in terms.species.iter_mut().enumerate() {
                *dndt -= outlet.outlet_species_mass_flow_rate(n) * inv_mw[n];
            }
        }
        for inlet in inlets {
            terms.energy += inlet.enthalpy_mass() * inlet.mass_flow_rate();
            for (n, dndt) in terms.species.iter_mut().enumerate() {
                let mdot_spec = inlet.outlet_species_mass_flow_rate(n);
                *dndt += mdot_spec * inv_mw[n];
                terms.energy -= hk[n] * inv_mw[n] * mdot_spec;
            }
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MassFlowController;
    use zd_core::units::kgps;
    use zd_core::{Tolerances, nearly_equal};
    use zd_thermo::{IdealGasMixture, SpeciesThermo, ThermoPhase};

    fn gas(x: &[f64]) -> IdealGasMixture {
        let mut g = IdealGasMixture::new(vec![
            SpeciesThermo::constant_cp("A", 10.0, 1.0e6, 0.0, 3.0e4),
            SpeciesThermo::constant_cp("B", 20.0, -2.0e6, 0.0, 2.0e4),
        ])
        .unwrap();
        g.set_mole_fractions(x).unwrap();
        g
    }

    #[test]
    fn no_connectors_no_terms() {
        let terms = FlowTerms::collect(&[], &[], &[0.1, 0.05], &[1.0, 2.0]);
        assert_eq!(terms.energy, 0.0);
        assert_eq!(terms.species, vec![0.0, 0.0]);
    }

    #[test]
    fn outlet_only_dilutes() {
        let g = gas(&[0.5, 0.5]);
        let out: Arc<dyn FlowConnector> =
            Arc::new(MassFlowController::from_reservoir("out", &g, kgps(3.0)).unwrap());
        let terms = FlowTerms::collect(&[out], &[], g.inverse_molecular_weights(), &[1.0, 1.0]);
        // Y = [1/3, 2/3]; molar flows 0.1 kmol/s each
        let tol = Tolerances::default();
        assert_eq!(terms.energy, 0.0);
        assert!(nearly_equal(terms.species[0], -0.1, tol));
        assert!(nearly_equal(terms.species[1], -0.1, tol));
    }

    #[test]
    fn inlet_carries_enthalpy_difference() {
        // Feed at the same state as the reactor: the energy term cancels
        let g = gas(&[0.25, 0.75]);
        let mut hk = [0.0; 2];
        g.partial_molar_enthalpies(&mut hk);
        let feed: Arc<dyn FlowConnector> =
            Arc::new(MassFlowController::from_reservoir("in", &g, kgps(1.5)).unwrap());
        let terms = FlowTerms::collect(&[], &[feed], g.inverse_molecular_weights(), &hk);
        let tol = Tolerances {
            abs: 1e-6,
            rel: 1e-12,
        };
        assert!(nearly_equal(terms.energy, 0.0, tol));
        let total: f64 = terms
            .species
            .iter()
            .zip(g.molecular_weights())
            .map(|(n, m)| n * m)
            .sum();
        assert!(nearly_equal(total, 1.5, Tolerances::default()));
    }
}
