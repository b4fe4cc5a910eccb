//! Flow connectors between reactors and reservoirs.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use zd_core::ensure_finite;
use zd_core::units::MassRate;
use zd_thermo::ThermoPhase;

use crate::error::{ReactorError, ReactorResult, check_len};

/// A directional mass and enthalpy link. One connector may be the outlet of one
/// reactor and the inlet of another, so it is shared behind an `Arc` and only read
/// by the reactor that consumes it.
pub trait FlowConnector: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Number of species carried (must match the connected reactors).
    fn n_species(&self) -> usize;

    /// Total mass flow rate [kg/s], never negative.
    fn mass_flow_rate(&self) -> f64;

    /// Specific enthalpy of the upstream fluid [J/kg].
    fn enthalpy_mass(&self) -> f64;

    /// Mass flow rate of species `k` leaving the upstream side [kg/s].
    fn outlet_species_mass_flow_rate(&self, k: usize) -> f64;

    /// Refresh the upstream snapshot from the phase feeding this connector.
    fn update_upstream(&self, upstream: &dyn ThermoPhase) -> ReactorResult<()>;
}

/// Composition and enthalpy of the fluid entering a connector.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamState {
    pub mass_fractions: Vec<f64>,
    pub enthalpy_mass: f64,
}

impl UpstreamState {
    pub fn from_phase(phase: &dyn ThermoPhase) -> Self {
        let mut mass_fractions = vec![0.0; phase.n_species()];
        phase.mass_fractions(&mut mass_fractions);
        Self {
            mass_fractions,
            enthalpy_mass: phase.enthalpy_mass(),
        }
    }
}

#[derive(Debug)]
struct ControllerState {
    mdot: f64,
    upstream: UpstreamState,
}

/// Connector with an imposed mass flow rate.
#[derive(Debug)]
pub struct MassFlowController {
    name: String,
    state: RwLock<ControllerState>,
}

impl MassFlowController {
    /// New controller carrying `n_species` species with no upstream composition yet.
    /// Used as a reactor outlet, the upstream is filled in by the reactor.
    pub fn new(name: impl Into<String>, n_species: usize, mdot: MassRate) -> ReactorResult<Self> {
        let mdot = checked_mdot(mdot)?;
        Ok(Self {
            name: name.into(),
            state: RwLock::new(ControllerState {
                mdot,
                upstream: UpstreamState {
                    mass_fractions: vec![0.0; n_species],
                    enthalpy_mass: 0.0,
                },
            }),
        })
    }

    /// Controller fed by a fixed reservoir in the given state.
    pub fn from_reservoir(
        name: impl Into<String>,
        reservoir: &dyn ThermoPhase,
        mdot: MassRate,
    ) -> ReactorResult<Self> {
        let ctrl = Self::new(name, reservoir.n_species(), mdot)?;
        ctrl.update_upstream(reservoir)?;
        Ok(ctrl)
    }

    pub fn set_mass_flow_rate(&self, mdot: MassRate) -> ReactorResult<()> {
        let mdot = checked_mdot(mdot)?;
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .mdot = mdot;
        Ok(())
    }

    pub fn upstream(&self) -> UpstreamState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .upstream
            .clone()
    }
}

fn checked_mdot(mdot: MassRate) -> ReactorResult<f64> {
    let v = ensure_finite(mdot.value, "mass flow rate")?;
    if v < 0.0 {
        return Err(ReactorError::InvalidArg {
            what: format!("mass flow rate must be non-negative, got {v}"),
        });
    }
    Ok(v)
}

impl FlowConnector for MassFlowController {
    fn name(&self) -> &str {
        &self.name
    }

    fn n_species(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .upstream
            .mass_fractions
            .len()
    }

    fn mass_flow_rate(&self) -> f64 {
        self.state.read().unwrap_or_else(PoisonError::into_inner).mdot
    }

    fn enthalpy_mass(&self) -> f64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .upstream
            .enthalpy_mass
    }

    fn outlet_species_mass_flow_rate(&self, k: usize) -> f64 {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .upstream
            .mass_fractions
            .get(k)
            .map_or(0.0, |y| state.mdot * y)
    }

    fn update_upstream(&self, upstream: &dyn ThermoPhase) -> ReactorResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        check_len(
            "connector species",
            state.upstream.mass_fractions.len(),
            upstream.n_species(),
        )?;
        state.upstream = UpstreamState::from_phase(upstream);
        Ok(())
    }
}
