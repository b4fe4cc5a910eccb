//! Shared builders for reactor integration tests.

#![allow(dead_code)]

use sprs::CsMat;
use zd_core::units::{k, m2, m3, pa};
use zd_kinetics::{ArrheniusRate, GasKinetics, InterfaceKinetics};
use zd_reactor::{ConstPressureMoleReactor, ReactorSurface};
use zd_thermo::{IdealGasMixture, SpeciesThermo, SurfacePhase};

pub const P_ATM: f64 = 101_325.0;

/// A, B, C, N2 with distinct heats of formation and heat capacities.
pub fn four_species_gas(t: f64, x: &[f64]) -> IdealGasMixture {
    let mut gas = IdealGasMixture::new(vec![
        SpeciesThermo::constant_cp("A", 30.0, 0.0, 2.0e5, 3.0e4),
        SpeciesThermo::constant_cp("B", 30.0, -2.0e7, 2.1e5, 3.3e4),
        SpeciesThermo::constant_cp("C", 60.0, -5.0e7, 2.5e5, 4.5e4),
        SpeciesThermo::constant_cp("N2", 28.0, 0.0, 1.9e5, 2.9e4),
    ])
    .unwrap();
    gas.set_temperature_pressure(k(t), pa(P_ATM)).unwrap();
    gas.set_mole_fractions(x).unwrap();
    gas
}

pub fn gas_kinetics(gas: &IdealGasMixture) -> GasKinetics {
    GasKinetics::from_equations(
        gas,
        &[
            ("A => B", ArrheniusRate::new(8.0e3, 0.0, 5.0e7)),
            ("A + B => C", ArrheniusRate::new(30.0, 0.5, 0.0)),
        ],
    )
    .unwrap()
}

/// Closed reactor with homogeneous chemistry, not yet initialized.
pub fn reacting_reactor() -> ConstPressureMoleReactor {
    let gas = four_species_gas(1000.0, &[0.4, 0.3, 0.1, 0.2]);
    let kin = gas_kinetics(&gas);
    let mut r = ConstPressureMoleReactor::new("r1", Box::new(gas), m3(0.5)).unwrap();
    r.set_kinetics(Box::new(kin));
    r
}

/// Catalytic surface over `gas` with zero-heat-capacity adsorbates.
pub fn catalyst(gas: &IdealGasMixture) -> ReactorSurface {
    let mut phase = SurfacePhase::new(
        vec![
            SpeciesThermo::constant_cp("PT(S)", 195.0, 0.0, 0.0, 0.0),
            SpeciesThermo::constant_cp("A(S)", 225.0, -1.0e7, 0.0, 0.0),
        ],
        2.7e-9,
    )
    .unwrap();
    phase.set_coverages(&[0.6, 0.4]).unwrap();
    let kin = InterfaceKinetics::from_equations(
        gas,
        &phase,
        &[
            ("A + PT(S) => A(S)", ArrheniusRate::new(2.0e7, 0.0, 0.0)),
            ("A(S) => B + PT(S)", ArrheniusRate::new(1.0e3, 0.0, 2.0e7)),
        ],
    )
    .unwrap();
    ReactorSurface::new("cat", phase, Box::new(kin), m2(0.2)).unwrap()
}

pub fn state(r: &mut ConstPressureMoleReactor) -> Vec<f64> {
    let mut y = vec![0.0; r.neq()];
    r.get_state(&mut y).unwrap();
    y
}

pub fn rates(r: &mut ConstPressureMoleReactor, y: &[f64]) -> Vec<f64> {
    let n = y.len();
    r.update_state(y).unwrap();
    let mut lhs = vec![1.0; n];
    let mut rhs = vec![0.0; n];
    r.eval(0.0, &mut lhs, &mut rhs).unwrap();
    rhs.iter().zip(&lhs).map(|(a, b)| a / b).collect()
}

pub fn to_dense(m: &CsMat<f64>) -> Vec<Vec<f64>> {
    let mut out = vec![vec![0.0; m.cols()]; m.rows()];
    for (&v, (i, j)) in m.iter() {
        out[i][j] += v;
    }
    out
}

/// Central-difference Jacobian of RHS/LHS; leaves the reactor at `y0`.
pub fn central_difference(r: &mut ConstPressureMoleReactor, y0: &[f64]) -> Vec<Vec<f64>> {
    let n = y0.len();
    let mut jac = vec![vec![0.0; n]; n];
    for j in 0..n {
        let h = 1e-6 * y0[j].abs();
        let mut up = y0.to_vec();
        up[j] += h;
        let mut down = y0.to_vec();
        down[j] -= h;
        let fu = rates(r, &up);
        let fd = rates(r, &down);
        for i in 0..n {
            jac[i][j] = (fu[i] - fd[i]) / (2.0 * h);
        }
    }
    r.update_state(y0).unwrap();
    jac
}

/// Entry-wise comparison; entries below 1e-6·|f_i|/|y_j| are treated as noise.
pub fn assert_jacobians_close(analytic: &[Vec<f64>], fd: &[Vec<f64>], f0: &[f64], y0: &[f64]) {
    for i in 0..analytic.len() {
        for j in 0..analytic.len() {
            let (a, b) = (analytic[i][j], fd[i][j]);
            let floor = 1e-6 * f0[i].abs() / y0[j].abs();
            let tol = 1e-4 * a.abs().max(b.abs()) + floor;
            assert!(
                (a - b).abs() <= tol,
                "entry ({i}, {j}): analytic {a:e} vs finite difference {b:e}"
            );
        }
    }
}

pub fn phase_temperature(r: &ConstPressureMoleReactor) -> f64 {
    r.thermo().temperature()
}
