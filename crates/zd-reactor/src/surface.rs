//! Surfaces attached to a reactor.
//!
//! Each surface owns its phase and kinetics plus a block of the reactor state
//! (moles of its species). During evaluation it writes its own rows and reports
//! its bulk-species production back to the reactor.

use zd_core::units::Area;
use zd_kinetics::SurfaceKinetics;
use zd_thermo::{SurfacePhase, ThermoPhase};

use crate::error::{ReactorError, ReactorResult, check_len};
use crate::triplets::TripletAccumulator;

/// Quantities the reactor shares with its surfaces while assembling a Jacobian.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceJacobianContext<'a> {
    /// Whether the energy row is assembled.
    pub energy: bool,
    /// Σ n_i·cp_i over bulk and all surface species [J/K].
    pub ncp: f64,
    /// Heat release from gas and all surface reactions, Σ h_k·(V·ω̇_k + ṡ_k) [W].
    pub qdot_total: f64,
    /// Reactor volume [m³].
    pub volume: f64,
    /// State index of the first bulk species.
    pub species_offset: usize,
    /// State index of this surface's first species.
    pub block_offset: usize,
    pub bulk_cp: &'a [f64],
    pub bulk_enthalpies: &'a [f64],
    pub bulk_mole_fractions: &'a [f64],
}

/// A surface coupled to a reactor's bulk phase.
pub trait AttachedSurface: Send + Sync {
    fn name(&self) -> &str;

    fn thermo(&self) -> &dyn ThermoPhase;

    /// Area [m²].
    fn area(&self) -> f64;

    fn n_species(&self) -> usize {
        self.thermo().n_species()
    }

    /// Check compatibility with the bulk phase and sync temperature and pressure.
    fn initialize(&mut self, bulk: &dyn ThermoPhase) -> ReactorResult<()>;

    /// Write this surface's block of the state vector.
    fn get_state(&self, y: &mut [f64]) -> ReactorResult<()>;

    /// Read this surface's block of the state vector at the bulk temperature and pressure.
    fn update_state(&mut self, y: &[f64], t: f64, p: f64) -> ReactorResult<()>;

    /// Fill this surface's LHS/RHS rows and add its bulk-species production rates
    /// [kmol/s] to `sdot`.
    fn eval(
        &mut self,
        bulk: &dyn ThermoPhase,
        lhs: &mut [f64],
        rhs: &mut [f64],
        sdot: &mut [f64],
    ) -> ReactorResult<()>;

    /// Append this surface's Jacobian entries.
    fn add_jacobian(
        &self,
        bulk: &dyn ThermoPhase,
        ctx: &SurfaceJacobianContext<'_>,
        acc: &mut TripletAccumulator,
    ) -> ReactorResult<()>;
}

/// Catalytic surface with mass-action kinetics.
pub struct ReactorSurface {
    name: String,
    phase: SurfacePhase,
    kinetics: Box<dyn SurfaceKinetics>,
    area: f64,
    rates: Vec<f64>,
}

impl ReactorSurface {
    pub fn new(
        name: impl Into<String>,
        phase: SurfacePhase,
        kinetics: Box<dyn SurfaceKinetics>,
        area: Area,
    ) -> ReactorResult<Self> {
        if !area.value.is_finite() || area.value <= 0.0 {
            return Err(ReactorError::InvalidArg {
                what: format!("surface area must be positive, got {}", area.value),
            });
        }
        let name = name.into();
        if kinetics.n_surface_species() != phase.n_species() {
            return Err(ReactorError::SpeciesMismatch {
                what: format!("surface kinetics of '{name}'"),
                expected: phase.n_species(),
                got: kinetics.n_surface_species(),
            });
        }
        let rates = vec![0.0; kinetics.n_total_species()];
        Ok(Self {
            name,
            phase,
            kinetics,
            area: area.value,
            rates,
        })
    }

    pub fn phase(&self) -> &SurfacePhase {
        &self.phase
    }

    /// Mutable access to the surface phase, e.g. to set initial coverages.
    pub fn phase_mut(&mut self) -> &mut SurfacePhase {
        &mut self.phase
    }
}

impl AttachedSurface for ReactorSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn thermo(&self) -> &dyn ThermoPhase {
        &self.phase
    }

    fn area(&self) -> f64 {
        self.area
    }

    fn initialize(&mut self, bulk: &dyn ThermoPhase) -> ReactorResult<()> {
        if self.kinetics.n_bulk_species() != bulk.n_species() {
            return Err(ReactorError::SpeciesMismatch {
                what: format!("bulk species seen by surface '{}'", self.name),
                expected: bulk.n_species(),
                got: self.kinetics.n_bulk_species(),
            });
        }
        self.phase
            .set_state_tp(bulk.temperature(), bulk.pressure())?;
        Ok(())
    }

    fn get_state(&self, y: &mut [f64]) -> ReactorResult<()> {
        check_len("surface state", self.phase.n_species(), y.len())?;
        self.phase.concentrations(y);
        for n in y.iter_mut() {
            *n *= self.area;
        }
        Ok(())
    }

    fn update_state(&mut self, y: &[f64], t: f64, p: f64) -> ReactorResult<()> {
        check_len("surface state", self.phase.n_species(), y.len())?;
        let conc: Vec<f64> = y.iter().map(|n| n / self.area).collect();
        self.phase.set_state_tp(t, p)?;
        self.phase.set_concentrations_no_norm(&conc)?;
        Ok(())
    }

    fn eval(
        &mut self,
        bulk: &dyn ThermoPhase,
        lhs: &mut [f64],
        rhs: &mut [f64],
        sdot: &mut [f64],
    ) -> ReactorResult<()> {
        let nb = self.kinetics.n_bulk_species();
        check_len("surface rows", self.phase.n_species(), rhs.len())?;
        check_len("surface rows", self.phase.n_species(), lhs.len())?;
        check_len("bulk production", nb, sdot.len())?;
        self.kinetics
            .net_production_rates(bulk, &self.phase, &mut self.rates)?;
        let (bulk_rates, surf_rates) = self.rates.split_at(nb);
        for (s, r) in sdot.iter_mut().zip(bulk_rates) {
            *s += self.area * r;
        }
        for ((l, r), rate) in lhs.iter_mut().zip(rhs.iter_mut()).zip(surf_rates) {
            *l = 1.0;
            *r = self.area * rate;
        }
        Ok(())
    }

    fn add_jacobian(
        &self,
        bulk: &dyn ThermoPhase,
        ctx: &SurfaceJacobianContext<'_>,
        acc: &mut TripletAccumulator,
    ) -> ReactorResult<()> {
        let nb = self.kinetics.n_bulk_species();
        let ns = self.phase.n_species();
        check_len("bulk mole fractions", nb, ctx.bulk_mole_fractions.len())?;
        let ddc = self
            .kinetics
            .net_production_rates_ddc(bulk, &self.phase)?;
        let row_index = |k: usize| {
            if k < nb {
                ctx.species_offset + k
            } else {
                ctx.block_offset + k - nb
            }
        };
        let scale = self.area / ctx.volume;

        // Gas concentrations depend on every gas mole count through the volume:
        // ∂C_i/∂n_j = (δ_ij − X_i)/V.
        let mut dilution = vec![0.0; nb + ns];
        let mut gas_touched = vec![false; nb + ns];
        // Σ_k h_k·∂(A·ṡ_k)/∂n_c over bulk rows k, per column c (gas columns undiluted)
        let mut dq = vec![0.0; nb + ns];
        for (&v, (k, c)) in ddc.iter() {
            let (col, value) = if c < nb {
                dilution[k] += ctx.bulk_mole_fractions[c] * v;
                gas_touched[k] = true;
                (ctx.species_offset + c, scale * v)
            } else {
                (ctx.block_offset + c - nb, v)
            };
            acc.push(row_index(k), col, value)?;
            if k < nb {
                dq[c] += ctx.bulk_enthalpies[k] * value;
            }
        }
        for k in (0..nb + ns).filter(|&k| gas_touched[k]) {
            let value = -scale * dilution[k];
            for j in 0..nb {
                acc.push(row_index(k), ctx.species_offset + j, value)?;
                if k < nb {
                    dq[j] += ctx.bulk_enthalpies[k] * value;
                }
            }
        }

        if ctx.energy && ctx.ncp != 0.0 {
            check_len("bulk heat capacities", nb, ctx.bulk_cp.len())?;
            let mut bulk_rates = vec![0.0; nb + ns];
            self.kinetics
                .net_production_rates(bulk, &self.phase, &mut bulk_rates)?;
            let q_self: f64 = (0..nb)
                .map(|k| ctx.bulk_enthalpies[k] * self.area * bulk_rates[k])
                .sum();
            let mut cp_surf = vec![0.0; ns];
            self.phase.partial_molar_cp(&mut cp_surf);
            let denom = 1.0 / (ctx.ncp * ctx.ncp);
            for j in 0..nb {
                let value = (ctx.bulk_cp[j] * q_self - ctx.ncp * dq[j]) * denom;
                acc.push(0, ctx.species_offset + j, value)?;
            }
            for s in 0..ns {
                let value = (cp_surf[s] * ctx.qdot_total - ctx.ncp * dq[nb + s]) * denom;
                acc.push(0, ctx.block_offset + s, value)?;
            }
        }
        Ok(())
    }
}
