//! Dense Jacobians: finite-difference reference and sparse conversion.

use nalgebra::DMatrix;
use sprs::CsMat;
use zd_reactor::ReactorOde;

use crate::error::{SolverError, SolverResult};

/// Forward-difference Jacobian of `RHS/LHS` for a reactor, column by column.
///
/// Each column perturbs one state entry by `epsilon·max(|y_j|, floor_j)`, where the
/// floor keeps zero-valued species from getting a zero step. The reactor is left at
/// its original state.
pub fn finite_difference_jacobian<O: ReactorOde + ?Sized>(
    ode: &mut O,
    time: f64,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>> {
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(SolverError::InvalidArg {
            what: format!("finite-difference epsilon must be positive, got {epsilon}"),
        });
    }
    let n = ode.neq();
    if n == 0 {
        return Err(SolverError::InvalidArg {
            what: "reactor is not initialized".into(),
        });
    }
    let mut y = vec![0.0; n];
    ode.get_state(&mut y)?;
    let floor = (y[1..].iter().fold(0.0f64, |m, v| m.max(v.abs())) * 1e-6).max(1e-30);
    let f0 = ydot(ode, time, &y)?;

    let mut jac = DMatrix::zeros(n, n);
    let mut result = Ok(());
    for j in 0..n {
        let dy = epsilon * y[j].abs().max(if j == 0 { 1.0 } else { floor });
        let mut perturbed = y.clone();
        perturbed[j] += dy;
        match ydot(ode, time, &perturbed) {
            Ok(f) => {
                for i in 0..n {
                    jac[(i, j)] = (f[i] - f0[i]) / dy;
                }
            }
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }
    ode.update_state(&y)?;
    result.map(|_| jac)
}

/// `RHS/LHS` at state `y`.
pub(crate) fn ydot<O: ReactorOde + ?Sized>(
    ode: &mut O,
    time: f64,
    y: &[f64],
) -> SolverResult<Vec<f64>> {
    let n = y.len();
    ode.update_state(y)?;
    let mut lhs = vec![1.0; n];
    let mut rhs = vec![0.0; n];
    ode.eval(time, &mut lhs, &mut rhs)?;
    Ok(rhs.iter().zip(&lhs).map(|(r, l)| r / l).collect())
}

/// Expand a compressed sparse matrix into a dense one, summing any duplicates.
pub fn sparse_to_dense(m: &CsMat<f64>) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(m.rows(), m.cols());
    for (&v, (i, j)) in m.iter() {
        dense[(i, j)] += v;
    }
    dense
}

/// Largest entry-wise absolute difference.
pub fn max_abs_deviation(a: &DMatrix<f64>, b: &DMatrix<f64>) -> SolverResult<f64> {
    if a.shape() != b.shape() {
        return Err(SolverError::InvalidArg {
            what: format!("shape mismatch {:?} vs {:?}", a.shape(), b.shape()),
        });
    }
    Ok((a - b).amax())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprs::TriMat;

    #[test]
    fn sparse_expansion_sums_duplicates() {
        let mut tri = TriMat::new((2, 3));
        tri.add_triplet(0, 1, 1.0);
        tri.add_triplet(0, 1, 2.0);
        tri.add_triplet(1, 2, -4.0);
        let dense = sparse_to_dense(&tri.to_csc());
        assert_eq!(dense.shape(), (2, 3));
        assert_eq!(dense[(0, 1)], 3.0);
        assert_eq!(dense[(1, 2)], -4.0);
        assert_eq!(dense[(1, 0)], 0.0);
    }

    #[test]
    fn deviation() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = DMatrix::from_row_slice(2, 2, &[1.0, 2.5, 3.0, 3.0]);
        assert_eq!(max_abs_deviation(&a, &b).unwrap(), 1.0);
        assert!(max_abs_deviation(&a, &DMatrix::zeros(3, 2)).is_err());
    }
}
