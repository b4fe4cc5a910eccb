//! Reaction mechanisms: mass-action rates and their concentration derivatives.

use crate::error::{KineticsError, KineticsResult, check_len};
use crate::rate::ArrheniusRate;
use crate::reaction::Reaction;
use sprs::{CsMat, TriMat};

/// A set of irreversible reactions over a fixed species list.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionMechanism {
    species: Vec<String>,
    reactions: Vec<Reaction>,
}

impl ReactionMechanism {
    pub fn new(species: Vec<String>) -> Self {
        Self {
            species,
            reactions: Vec::new(),
        }
    }

    /// Parse and append a reaction.
    pub fn add_equation(&mut self, equation: &str, rate: ArrheniusRate) -> KineticsResult<usize> {
        let reaction = Reaction::parse(equation, &self.species, rate)?;
        self.add_reaction(reaction)
    }

    /// Append an already-built reaction; returns its index.
    pub fn add_reaction(&mut self, reaction: Reaction) -> KineticsResult<usize> {
        if let Some(k) = reaction.max_species_index() {
            if k >= self.species.len() {
                return Err(KineticsError::LengthMismatch {
                    what: "reaction species index",
                    expected: self.species.len(),
                    got: k + 1,
                });
            }
        }
        reaction.rate.validate()?;
        self.reactions.push(reaction);
        Ok(self.reactions.len() - 1)
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn reaction_mut(&mut self, i: usize) -> Option<&mut Reaction> {
        self.reactions.get_mut(i)
    }

    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    pub fn n_reactions(&self) -> usize {
        self.reactions.len()
    }

    /// Rates of progress q_i = k_i(T)·Π C_j^{o_ij}.
    pub fn rates_of_progress(&self, t: f64, conc: &[f64], q: &mut [f64]) -> KineticsResult<()> {
        check_len("concentrations", self.species.len(), conc.len())?;
        check_len("rates of progress", self.reactions.len(), q.len())?;
        for (qi, r) in q.iter_mut().zip(&self.reactions) {
            *qi = r.rate.rate_constant(t)
                * r.orders
                    .iter()
                    .map(|&(k, o)| power(conc[k], o))
                    .product::<f64>();
        }
        Ok(())
    }

    /// Net production rates ω̇_k = Σ_i ν_ki·q_i.
    pub fn net_production_rates(
        &self,
        t: f64,
        conc: &[f64],
        wdot: &mut [f64],
    ) -> KineticsResult<()> {
        check_len("net production rates", self.species.len(), wdot.len())?;
        let mut q = vec![0.0; self.reactions.len()];
        self.rates_of_progress(t, conc, &mut q)?;
        wdot.fill(0.0);
        for (qi, r) in q.iter().zip(&self.reactions) {
            for (k, nu) in r.net_stoichiometry() {
                wdot[k] += nu * qi;
            }
        }
        Ok(())
    }

    /// Triplets (k, j, ∂ω̇_k/∂C_j) at fixed temperature. One entry is emitted for
    /// every (product-or-reactant, rate-law species) pair, so the structure does not
    /// depend on the current concentrations. Duplicates are expected.
    pub fn production_rates_ddc_triplets(
        &self,
        t: f64,
        conc: &[f64],
    ) -> KineticsResult<Vec<(usize, usize, f64)>> {
        check_len("concentrations", self.species.len(), conc.len())?;
        let mut trips = Vec::new();
        for r in &self.reactions {
            let kf = r.rate.rate_constant(t);
            let net = r.net_stoichiometry();
            for (a, &(j, oj)) in r.orders.iter().enumerate() {
                let mut dq = kf * dpower(conc[j], oj);
                for (b, &(i, oi)) in r.orders.iter().enumerate() {
                    if a != b {
                        dq *= power(conc[i], oi);
                    }
                }
                for &(k, nu) in &net {
                    trips.push((k, j, nu * dq));
                }
            }
        }
        Ok(trips)
    }

    /// Sparse ∂ω̇/∂C at fixed temperature, duplicates summed.
    pub fn production_rates_ddc(&self, t: f64, conc: &[f64]) -> KineticsResult<CsMat<f64>> {
        let trips = self.production_rates_ddc_triplets(t, conc)?;
        Ok(to_csc(self.species.len(), self.species.len(), &trips))
    }
}

pub(crate) fn to_csc(rows: usize, cols: usize, trips: &[(usize, usize, f64)]) -> CsMat<f64> {
    let mut tri = TriMat::with_capacity((rows, cols), trips.len());
    for &(r, c, v) in trips {
        tri.add_triplet(r, c, v);
    }
    tri.to_csc()
}

fn power(c: f64, order: f64) -> f64 {
    if order == 1.0 {
        c
    } else if order.fract() == 0.0 {
        c.powi(order as i32)
    } else {
        c.max(0.0).powf(order)
    }
}

fn dpower(c: f64, order: f64) -> f64 {
    if order == 1.0 {
        1.0
    } else if order.fract() == 0.0 {
        order * c.powi(order as i32 - 1)
    } else if c > 0.0 {
        order * c.powf(order - 1.0)
    } else {
        0.0
    }
}
