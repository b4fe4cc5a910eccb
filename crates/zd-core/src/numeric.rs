use crate::ZdError;

/// Floating point type used throughout system
pub type Real = f64;

/// Relative step used for finite-difference perturbations: `sqrt(machine epsilon)`.
pub const SQRT_EPSILON: Real = 1.490_116_119_384_765_6e-8;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, ZdError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ZdError::NonFinite { what, value: v })
    }
}

/// Dot product of two equally sized slices.
pub fn dot(a: &[Real], b: &[Real]) -> Real {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn sqrt_epsilon_matches_machine_epsilon() {
        assert!(nearly_equal(
            SQRT_EPSILON,
            Real::EPSILON.sqrt(),
            Tolerances::default()
        ));
    }

    proptest! {
        #[test]
        fn dot_is_symmetric(v in prop::collection::vec(-1e3_f64..1e3, 0..8)) {
            let w: Vec<f64> = v.iter().rev().copied().collect();
            let tol = Tolerances { abs: 1e-9, rel: 1e-12 };
            prop_assert!(nearly_equal(dot(&v, &w), dot(&w, &v), tol));
        }
    }
}
