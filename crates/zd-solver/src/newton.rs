//! Newton solver with backtracking line search.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::error::{SolverError, SolverResult};

/// A square nonlinear system F(x) = 0.
///
/// Methods take `&mut self` so implementations can push `x` into a stateful model.
pub trait ImplicitSystem {
    fn residual(&mut self, x: &DVector<f64>) -> SolverResult<DVector<f64>>;

    fn jacobian(&mut self, x: &DVector<f64>) -> SolverResult<DMatrix<f64>>;

    /// Whether `x` may be evaluated at all (e.g. positive temperature).
    fn is_admissible(&self, _x: &DVector<f64>) -> bool {
        true
    }
}

/// Newton solver configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm
    pub rel_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            abs_tol: 1e-8,
            rel_tol: 1e-10,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
        }
    }
}

/// Newton iteration result.
#[derive(Clone, Debug)]
pub struct NewtonResult {
    pub x: DVector<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
}

/// Solve `system(x) = 0` from `x0`.
pub fn newton_solve<S: ImplicitSystem + ?Sized>(
    system: &mut S,
    x0: DVector<f64>,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult> {
    if !system.is_admissible(&x0) {
        return Err(SolverError::InvalidArg {
            what: "initial guess is not admissible".into(),
        });
    }
    let mut x = x0;
    let mut r = system.residual(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            debug!(iterations = iter, residual = r_norm, "newton converged");
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        let jac = system.jacobian(&x)?;
        let dx = jac.lu().solve(&(-&r)).ok_or_else(|| SolverError::Numeric {
            what: "singular Newton matrix".to_string(),
        })?;

        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..=config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            if system.is_admissible(&x_new) {
                let r_new = system.residual(&x_new)?;
                let r_new_norm = r_new.norm();
                if r_new_norm.is_finite() && r_new_norm < r_norm {
                    accepted = Some((x_new, r_new, r_new_norm));
                    break;
                }
            }
            alpha *= config.line_search_beta;
        }
        let Some((x_new, r_new, r_new_norm)) = accepted else {
            return Err(SolverError::ConvergenceFailed {
                what: format!("line search stagnated at iteration {iter}, residual = {r_norm:e}"),
            });
        };
        if alpha < 1.0 {
            warn!(iteration = iter, alpha, "newton step shortened by line search");
        }
        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
        return Ok(NewtonResult {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
        });
    }
    Err(SolverError::ConvergenceFailed {
        what: format!(
            "maximum iterations {} reached, residual = {:e}",
            config.max_iterations, r_norm
        ),
    })
}
