//! Constant-pressure ideal-gas reactor with species moles as the state.
//!
//! State vector: `[T, n_1 … n_Ng, surface moles…]`. The governing equations are
//!
//! ```text
//! m·cp·dT/dt = Q̇ − Σ_k h_k·(V·ω̇_k + ṡ_k) + inlet terms
//!     dn_k/dt = V·ω̇_k + ṡ_k − outlet drain + inlet feed
//! ```
//!
//! with LHS = `m·cp` on the energy row and 1 everywhere else.

use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, info};
use zd_core::units::Volume;
use zd_kinetics::Kinetics;
use zd_thermo::{PhaseKind, PhaseState, ThermoPhase};

use crate::connector::FlowConnector;
use crate::error::{ReactorError, ReactorResult, check_len};
use crate::flow::FlowTerms;
use crate::layout::{SPECIES_OFFSET, StateLayout};
use crate::surface::AttachedSurface;
use crate::wall::Wall;

/// Which balances are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactorOptions {
    /// Solve the energy equation. When off, dT/dt = 0.
    pub energy: bool,
    /// Include homogeneous reactions. When off, ω̇ = 0.
    pub chemistry: bool,
}

impl Default for ReactorOptions {
    fn default() -> Self {
        Self {
            energy: true,
            chemistry: true,
        }
    }
}

/// Well-mixed reactor held at constant pressure.
///
/// The reactor owns its bulk phase. Solver calls leave the phase in the state last
/// set by [`update_state`](Self::update_state); handing the phase out through
/// [`thermo_mut`](Self::thermo_mut) marks the cached state stale, and the next
/// synchronization adopts whatever the caller set.
pub struct ConstPressureMoleReactor {
    pub(crate) name: String,
    pub(crate) thermo: Box<dyn ThermoPhase>,
    pub(crate) kinetics: Option<Box<dyn Kinetics>>,
    pub(crate) surfaces: Vec<Box<dyn AttachedSurface>>,
    pub(crate) inlets: Vec<Arc<dyn FlowConnector>>,
    pub(crate) outlets: Vec<Arc<dyn FlowConnector>>,
    pub(crate) walls: Vec<Box<dyn Wall>>,
    pub(crate) options: ReactorOptions,

    /// Set by `initialize`, cleared by any change to the component set.
    pub(crate) layout: Option<StateLayout>,
    pub(crate) blocks: Vec<Range<usize>>,

    pub(crate) saved: PhaseState,
    pub(crate) stale: bool,

    pub(crate) pressure: f64,
    pub(crate) volume: f64,
    pub(crate) mass: f64,
    pub(crate) time: f64,

    // Scratch, overwritten on every evaluation
    pub(crate) hk: Vec<f64>,
    pub(crate) wdot: Vec<f64>,
    pub(crate) sdot: Vec<f64>,
}

impl ConstPressureMoleReactor {
    /// Create a reactor filled with `thermo` in its current state.
    ///
    /// Only ideal-gas bulk phases are accepted.
    pub fn new(
        name: impl Into<String>,
        thermo: Box<dyn ThermoPhase>,
        volume: Volume,
    ) -> ReactorResult<Self> {
        if thermo.kind() != PhaseKind::IdealGas {
            return Err(ReactorError::IncompatiblePhase {
                expected: PhaseKind::IdealGas,
                got: thermo.kind(),
            });
        }
        let volume = volume.value;
        if !volume.is_finite() || volume <= 0.0 {
            return Err(ReactorError::InvalidArg {
                what: format!("reactor volume must be positive, got {volume}"),
            });
        }
        Ok(Self {
            name: name.into(),
            saved: thermo.save_state(),
            stale: false,
            pressure: thermo.pressure(),
            mass: thermo.density() * volume,
            volume,
            thermo,
            kinetics: None,
            surfaces: Vec::new(),
            inlets: Vec::new(),
            outlets: Vec::new(),
            walls: Vec::new(),
            options: ReactorOptions::default(),
            layout: None,
            blocks: Vec::new(),
            time: 0.0,
            hk: Vec::new(),
            wdot: Vec::new(),
            sdot: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thermo(&self) -> &dyn ThermoPhase {
        self.thermo.as_ref()
    }

    /// Mutable access to the bulk phase. The reactor adopts the phase's state at
    /// its next synchronization.
    pub fn thermo_mut(&mut self) -> &mut dyn ThermoPhase {
        self.stale = true;
        self.thermo.as_mut()
    }

    pub fn kinetics(&self) -> Option<&dyn Kinetics> {
        self.kinetics.as_deref()
    }

    pub fn set_kinetics(&mut self, kinetics: Box<dyn Kinetics>) {
        self.kinetics = Some(kinetics);
        self.invalidate("kinetics replaced");
    }

    pub fn add_surface(&mut self, surface: Box<dyn AttachedSurface>) {
        self.surfaces.push(surface);
        self.invalidate("surface added");
    }

    pub fn surfaces(&self) -> &[Box<dyn AttachedSurface>] {
        &self.surfaces
    }

    pub fn add_inlet(&mut self, inlet: Arc<dyn FlowConnector>) {
        self.inlets.push(inlet);
        self.invalidate("inlet added");
    }

    pub fn add_outlet(&mut self, outlet: Arc<dyn FlowConnector>) {
        self.outlets.push(outlet);
        self.invalidate("outlet added");
    }

    pub fn add_wall(&mut self, wall: Box<dyn Wall>) {
        self.walls.push(wall);
    }

    pub fn options(&self) -> ReactorOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ReactorOptions) {
        self.options = options;
    }

    pub fn set_energy_enabled(&mut self, on: bool) {
        self.options.energy = on;
    }

    pub fn set_chemistry_enabled(&mut self, on: bool) {
        self.options.chemistry = on;
    }

    /// Current volume [m³].
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Current mass [kg].
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Fixed pressure [Pa].
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Time of the last evaluation (or of initialization).
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn layout(&self) -> Option<&StateLayout> {
        self.layout.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.layout.is_some()
    }

    /// State length, 0 before initialization.
    pub fn neq(&self) -> usize {
        self.layout.as_ref().map_or(0, StateLayout::neq)
    }

    fn invalidate(&mut self, why: &'static str) {
        if self.layout.take().is_some() {
            debug!(reactor = %self.name, why, "layout invalidated, reinitialize before use");
        }
    }

    pub(crate) fn require_neq(&self, what: &'static str) -> ReactorResult<usize> {
        self.layout
            .as_ref()
            .map(StateLayout::neq)
            .ok_or(ReactorError::NotInitialized { what })
    }

    /// Bring the phase in line with the cached state, or adopt the phase's state
    /// if it was modified from outside.
    pub(crate) fn sync_phase(&mut self) -> ReactorResult<()> {
        if self.stale {
            self.adopt_phase()
        } else {
            Ok(self.thermo.restore_state(&self.saved)?)
        }
    }

    /// Take the phase's current state as the reactor state at fixed volume.
    fn adopt_phase(&mut self) -> ReactorResult<()> {
        self.saved = self.thermo.save_state();
        self.pressure = self.thermo.pressure();
        self.mass = self.thermo.density() * self.volume;
        self.stale = false;
        for outlet in &self.outlets {
            outlet.update_upstream(self.thermo.as_ref())?;
        }
        Ok(())
    }

    /// Fix the state layout once all species counts are known.
    pub fn initialize(&mut self, t0: f64) -> ReactorResult<()> {
        self.sync_phase()?;
        let nb = self.thermo.n_species();
        if let Some(kin) = &self.kinetics {
            if kin.n_species() != nb {
                return Err(ReactorError::SpeciesMismatch {
                    what: "reactor kinetics".into(),
                    expected: nb,
                    got: kin.n_species(),
                });
            }
        }
        for conn in self.inlets.iter().chain(&self.outlets) {
            if conn.n_species() != nb {
                return Err(ReactorError::SpeciesMismatch {
                    what: format!("connector '{}'", conn.name()),
                    expected: nb,
                    got: conn.n_species(),
                });
            }
        }
        for surface in self.surfaces.iter_mut() {
            surface.initialize(self.thermo.as_ref())?;
        }

        let layout = StateLayout::new(
            self.thermo.species_names(),
            self.surfaces
                .iter()
                .map(|s| s.thermo().species_names())
                .collect(),
        )?;
        self.blocks = (0..layout.n_surfaces())
            .map(|i| layout.surface_range(i))
            .collect::<ReactorResult<_>>()?;

        self.mass = self.thermo.density() * self.volume;
        self.time = t0;
        self.hk = vec![0.0; nb];
        self.wdot = vec![0.0; nb];
        self.sdot = vec![0.0; nb];
        for outlet in &self.outlets {
            outlet.update_upstream(self.thermo.as_ref())?;
        }
        info!(
            reactor = %self.name,
            neq = layout.neq(),
            surfaces = self.surfaces.len(),
            inlets = self.inlets.len(),
            outlets = self.outlets.len(),
            "reactor initialized"
        );
        self.layout = Some(layout);
        Ok(())
    }

    /// Write the current state: temperature, bulk moles, surface moles.
    pub fn get_state(&mut self, y: &mut [f64]) -> ReactorResult<()> {
        let neq = self.require_neq("get_state")?;
        check_len("state", neq, y.len())?;
        self.sync_phase()?;
        y[0] = self.thermo.temperature();

        let nb = self.thermo.n_species();
        let moles = &mut y[SPECIES_OFFSET..SPECIES_OFFSET + nb];
        self.thermo.mole_fractions(moles);
        let total = self.mass / self.thermo.mean_molecular_weight();
        for n in moles.iter_mut() {
            *n *= total;
        }
        for (surface, block) in self.surfaces.iter().zip(&self.blocks) {
            surface.get_state(&mut y[block.clone()])?;
        }
        Ok(())
    }

    /// Set the reactor from a state vector. Mass and volume follow from the moles
    /// at the fixed pressure.
    pub fn update_state(&mut self, y: &[f64]) -> ReactorResult<()> {
        let neq = self.require_neq("update_state")?;
        check_len("state", neq, y.len())?;
        if self.stale {
            self.pressure = self.thermo.pressure();
        }
        let nb = self.thermo.n_species();
        let t = y[0];
        let moles = &y[SPECIES_OFFSET..SPECIES_OFFSET + nb];

        self.mass = moles
            .iter()
            .zip(self.thermo.molecular_weights())
            .map(|(n, mw)| n * mw)
            .sum();
        self.thermo.set_moles_no_truncate(moles)?;
        self.thermo.set_state_tp(t, self.pressure)?;
        self.volume = self.mass / self.thermo.density();
        self.saved = self.thermo.save_state();
        self.stale = false;

        for outlet in &self.outlets {
            outlet.update_upstream(self.thermo.as_ref())?;
        }
        for (surface, block) in self.surfaces.iter_mut().zip(&self.blocks) {
            surface.update_state(&y[block.clone()], t, self.pressure)?;
        }
        Ok(())
    }

    /// Evaluate `LHS[i]·dy_i/dt = RHS[i]` at the current state. Both buffers are
    /// overwritten.
    pub fn eval(&mut self, time: f64, lhs: &mut [f64], rhs: &mut [f64]) -> ReactorResult<()> {
        let neq = self.require_neq("eval")?;
        check_len("lhs", neq, lhs.len())?;
        check_len("rhs", neq, rhs.len())?;
        lhs.fill(1.0);
        rhs.fill(0.0);
        self.time = time;
        self.sync_phase()?;

        let thermo = self.thermo.as_ref();
        let nb = thermo.n_species();
        let qdot_ext: f64 = self
            .walls
            .iter()
            .map(|w| w.heat_rate(time, thermo.temperature()))
            .sum();
        thermo.partial_molar_enthalpies(&mut self.hk);
        match (&self.kinetics, self.options.chemistry) {
            (Some(kin), true) => kin.net_production_rates(thermo, &mut self.wdot)?,
            _ => self.wdot.fill(0.0),
        }

        // Surfaces write their own rows and report bulk production
        self.sdot.fill(0.0);
        for (surface, block) in self.surfaces.iter_mut().zip(&self.blocks) {
            surface.eval(
                thermo,
                &mut lhs[block.clone()],
                &mut rhs[block.clone()],
                &mut self.sdot,
            )?;
        }

        let (energy_row, species_rows) = rhs.split_at_mut(SPECIES_OFFSET);
        let mcp_dtdt = &mut energy_row[0];
        let dndt = &mut species_rows[..nb];
        *mcp_dtdt = qdot_ext;
        for n in 0..nb {
            *mcp_dtdt -= self.wdot[n] * self.hk[n] * self.volume;
            *mcp_dtdt -= self.sdot[n] * self.hk[n];
            dndt[n] = self.wdot[n] * self.volume + self.sdot[n];
        }

        let flows = FlowTerms::collect(
            &self.outlets,
            &self.inlets,
            thermo.inverse_molecular_weights(),
            &self.hk,
        );
        *mcp_dtdt += flows.energy;
        for (d, f) in dndt.iter_mut().zip(&flows.species) {
            *d += f;
        }

        if self.options.energy {
            lhs[0] = self.mass * thermo.cp_mass();
        } else {
            rhs[0] = 0.0;
        }
        Ok(())
    }

    /// State index of a component: `"temperature"`, a bulk species, or a surface species.
    pub fn component_index(&self, name: &str) -> Option<usize> {
        self.layout.as_ref()?.component_index(name)
    }

    pub fn component_name(&self, index: usize) -> ReactorResult<String> {
        let layout = self
            .layout
            .as_ref()
            .ok_or(ReactorError::NotInitialized {
                what: "component_name",
            })?;
        layout.component_name(index).map(str::to_string)
    }
}

impl std::fmt::Debug for ConstPressureMoleReactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstPressureMoleReactor")
            .field("name", &self.name)
            .field("neq", &self.neq())
            .field("options", &self.options)
            .field("volume", &self.volume)
            .field("pressure", &self.pressure)
            .finish_non_exhaustive()
    }
}
