//! Implicit time stepping for reactor equations.

use nalgebra::{DMatrix, DVector};
use zd_reactor::ReactorOde;

use crate::error::{SolverError, SolverResult};
use crate::jacobian::{sparse_to_dense, ydot};
use crate::newton::{ImplicitSystem, NewtonConfig, newton_solve};

/// Backward Euler: solve `y − y_n − h·f(t_n + h, y) = 0` by Newton with the
/// reactor's sparse Jacobian, `I − h·J`.
///
/// Residual rows are weighted by `1 / (rtol·|y_n| + atol_i)`; the temperature row
/// uses `atol` in kelvin, species rows use `atol` scaled by the largest species
/// amount so the norm is independent of reactor size.
#[derive(Clone, Debug)]
pub struct BackwardEuler {
    pub newton: NewtonConfig,
    pub rtol: f64,
    pub atol: f64,
}

impl Default for BackwardEuler {
    fn default() -> Self {
        Self {
            newton: NewtonConfig {
                abs_tol: 1.0,
                rel_tol: 0.0,
                ..NewtonConfig::default()
            },
            rtol: 1e-7,
            atol: 1e-10,
        }
    }
}

struct StepSystem<'a, O: ReactorOde + ?Sized> {
    ode: &'a mut O,
    y_n: &'a [f64],
    t_new: f64,
    dt: f64,
    weights: Vec<f64>,
}

impl<O: ReactorOde + ?Sized> ImplicitSystem for StepSystem<'_, O> {
    fn residual(&mut self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        let f = ydot(&mut *self.ode, self.t_new, x.as_slice())?;
        Ok(DVector::from_iterator(
            x.len(),
            (0..x.len()).map(|i| (x[i] - self.y_n[i] - self.dt * f[i]) * self.weights[i]),
        ))
    }

    fn jacobian(&mut self, x: &DVector<f64>) -> SolverResult<DMatrix<f64>> {
        // refresh the reactor at x and t_new before assembling
        ydot(&mut *self.ode, self.t_new, x.as_slice())?;
        let jac = sparse_to_dense(&self.ode.jacobian()?);
        let n = x.len();
        let mut m = DMatrix::identity(n, n) - jac * self.dt;
        for (i, w) in self.weights.iter().enumerate() {
            m.row_mut(i).scale_mut(*w);
        }
        Ok(m)
    }

    fn is_admissible(&self, x: &DVector<f64>) -> bool {
        x.iter().all(|v| v.is_finite()) && x[0] > 0.0
    }
}

impl BackwardEuler {
    /// Advance `y` (the reactor's current state at `t`) by `dt`. On success the
    /// reactor is left at the new state.
    pub fn step<O: ReactorOde + ?Sized>(
        &self,
        ode: &mut O,
        t: f64,
        y: &[f64],
        dt: f64,
    ) -> SolverResult<Vec<f64>> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SolverError::InvalidArg {
                what: format!("time step must be positive, got {dt}"),
            });
        }
        if y.len() != ode.neq() {
            return Err(SolverError::InvalidArg {
                what: format!("state has {} entries, reactor expects {}", y.len(), ode.neq()),
            });
        }
        let species_scale = y[1..].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let weights = y
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let atol = if i == 0 {
                    self.atol
                } else {
                    (self.atol * species_scale).max(f64::MIN_POSITIVE)
                };
                1.0 / (self.rtol * v.abs() + atol)
            })
            .collect();
        let mut system = StepSystem {
            ode,
            y_n: y,
            t_new: t + dt,
            dt,
            weights,
        };
        let result = newton_solve(&mut system, DVector::from_column_slice(y), &self.newton)?;
        let y_new: Vec<f64> = result.x.iter().copied().collect();
        ydot(&mut *system.ode, t + dt, &y_new)?;
        Ok(y_new)
    }
}
