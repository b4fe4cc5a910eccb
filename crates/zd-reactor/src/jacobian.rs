//! Sparse Jacobian of the reactor equations.
//!
//! Species/species entries come from the kinetics' analytic mole derivatives.
//! The temperature column is a one-sided finite difference. The temperature row
//! is analytic. Surfaces append their own entries. Everything is collected as
//! triplets and summed into one compressed matrix at the end.

use sprs::CsMat;
use tracing::{debug, error};
use zd_core::numeric::{SQRT_EPSILON, dot};

use crate::error::{ReactorError, ReactorResult};
use crate::layout::SPECIES_OFFSET;
use crate::reactor::ConstPressureMoleReactor;
use crate::surface::SurfaceJacobianContext;
use crate::triplets::TripletAccumulator;

/// Restores a reactor to `saved` when dropped unless [`finish`](Self::finish) ran.
struct StateGuard<'a> {
    reactor: &'a mut ConstPressureMoleReactor,
    saved: &'a [f64],
    restored: bool,
}

impl<'a> StateGuard<'a> {
    fn new(reactor: &'a mut ConstPressureMoleReactor, saved: &'a [f64]) -> Self {
        Self {
            reactor,
            saved,
            restored: false,
        }
    }

    fn reactor(&mut self) -> &mut ConstPressureMoleReactor {
        &mut *self.reactor
    }

    fn finish(mut self) -> ReactorResult<()> {
        self.restored = true;
        self.reactor.update_state(self.saved)
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(err) = self.reactor.update_state(self.saved) {
            error!(reactor = %self.reactor.name, %err, "failed to restore reactor state");
        }
    }
}

impl ConstPressureMoleReactor {
    /// Assemble ∂(RHS/LHS)/∂y as an N×N sparse matrix.
    ///
    /// Fails with [`ReactorError::NotInitialized`] before [`initialize`](Self::initialize).
    pub fn jacobian(&mut self) -> ReactorResult<CsMat<f64>> {
        let neq = self.require_neq("jacobian")?;
        let mut acc = TripletAccumulator::new(neq);
        self.sync_phase()?;

        let nb = self.thermo.n_species();
        let dnk_dnj = self.species_block(&mut acc)?;

        let mut hk = vec![0.0; nb];
        let mut cp = vec![0.0; nb];
        self.thermo.partial_molar_enthalpies(&mut hk);
        self.thermo.partial_molar_cp(&mut cp);

        let mut ncp = 0.0;
        let mut qdot_total = 0.0;
        if self.options.energy {
            let y = self.temperature_column(&mut acc)?;
            let mut cp_all = cp.clone();
            for surface in &self.surfaces {
                let mut cp_s = vec![0.0; surface.n_species()];
                surface.thermo().partial_molar_cp(&mut cp_s);
                cp_all.extend(cp_s);
            }
            ncp = dot(&y[SPECIES_OFFSET..], &cp_all);
            if ncp == 0.0 || !ncp.is_finite() {
                return Err(ReactorError::InvalidArg {
                    what: format!("total heat capacity must be finite and non-zero, got {ncp}"),
                });
            }
            let qdot = self.volume * dot(&hk, &self.wdot);
            qdot_total = qdot + dot(&hk, &self.sdot);
            temperature_row(&mut acc, &dnk_dnj, &hk, &cp, qdot, ncp)?;
        }

        let mut x = vec![0.0; nb];
        self.thermo.mole_fractions(&mut x);
        let thermo = self.thermo.as_ref();
        for (surface, block) in self.surfaces.iter().zip(&self.blocks) {
            let ctx = SurfaceJacobianContext {
                energy: self.options.energy,
                ncp,
                qdot_total,
                volume: self.volume,
                species_offset: SPECIES_OFFSET,
                block_offset: block.start,
                bulk_cp: &cp,
                bulk_enthalpies: &hk,
                bulk_mole_fractions: &x,
            };
            surface.add_jacobian(thermo, &ctx, &mut acc)?;
        }

        debug!(reactor = %self.name, neq, triplets = acc.len(), "jacobian assembled");
        Ok(acc.finalize())
    }

    /// Kinetics mole derivatives corrected by ω̇_k·v̄ on their stored entries only;
    /// cells where only the correction would be non-zero stay structurally empty.
    /// Returns the corrected entries in species indices.
    fn species_block(
        &mut self,
        acc: &mut TripletAccumulator,
    ) -> ReactorResult<Vec<(usize, usize, f64)>> {
        let nb = self.thermo.n_species();
        let kin = match (&self.kinetics, self.options.chemistry) {
            (Some(kin), true) => kin,
            _ => {
                self.wdot.fill(0.0);
                return Ok(Vec::new());
            }
        };
        let thermo = self.thermo.as_ref();
        kin.net_production_rates(thermo, &mut self.wdot)?;
        let ddn = kin.net_production_rates_ddn(thermo)?;
        if ddn.shape() != (nb, nb) {
            return Err(ReactorError::SpeciesMismatch {
                what: "kinetics mole derivative rows".into(),
                expected: nb,
                got: ddn.rows(),
            });
        }
        let molar_volume = thermo.molar_volume();
        let mut corrected = Vec::with_capacity(ddn.nnz());
        for (&v, (k, j)) in ddn.iter() {
            let value = v + self.wdot[k] * molar_volume;
            acc.push(k + SPECIES_OFFSET, j + SPECIES_OFFSET, value)?;
            corrected.push((k, j, value));
        }
        Ok(corrected)
    }

    /// d(ẏ_j)/dT for every row j by a forward difference with step T·√ε.
    /// Leaves the reactor at its unperturbed state and returns that state.
    fn temperature_column(&mut self, acc: &mut TripletAccumulator) -> ReactorResult<Vec<f64>> {
        let neq = acc.dim();
        let mut y_current = vec![0.0; neq];
        self.get_state(&mut y_current)?;
        let delta_t = y_current[0] * SQRT_EPSILON;
        let mut y_perturbed = y_current.clone();
        y_perturbed[0] += delta_t;
        let time = self.time;

        let mut lhs_perturbed = vec![1.0; neq];
        let mut rhs_perturbed = vec![0.0; neq];
        {
            let mut guard = StateGuard::new(self, &y_current);
            guard.reactor().update_state(&y_perturbed)?;
            guard
                .reactor()
                .eval(time, &mut lhs_perturbed, &mut rhs_perturbed)?;
            guard.finish()?;
        }
        let mut lhs_current = vec![1.0; neq];
        let mut rhs_current = vec![0.0; neq];
        self.eval(time, &mut lhs_current, &mut rhs_current)?;

        for j in 0..neq {
            let ydot_perturbed = rhs_perturbed[j] / lhs_perturbed[j];
            let ydot_current = rhs_current[j] / lhs_current[j];
            acc.push(j, 0, (ydot_perturbed - ydot_current) / delta_t)?;
        }
        debug!(reactor = %self.name, delta_t, "temperature column by finite difference");
        Ok(y_current)
    }
}

/// d(dT/dt)/dn_j for bulk species j:
/// `(cp_j·qdot − NCp·Σ_k h_k·J_kj) / NCp²`.
fn temperature_row(
    acc: &mut TripletAccumulator,
    dnk_dnj: &[(usize, usize, f64)],
    hk: &[f64],
    cp: &[f64],
    qdot: f64,
    ncp: f64,
) -> ReactorResult<()> {
    let mut hk_dnkdnj_sum = vec![0.0; cp.len()];
    for &(k, j, v) in dnk_dnj {
        hk_dnkdnj_sum[j] += hk[k] * v;
    }
    let denom = 1.0 / (ncp * ncp);
    for (j, (&cp_j, &sum_j)) in cp.iter().zip(&hk_dnkdnj_sum).enumerate() {
        acc.push(0, j + SPECIES_OFFSET, (cp_j * qdot - ncp * sum_j) * denom)?;
    }
    Ok(())
}
