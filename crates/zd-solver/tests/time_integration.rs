//! Backward-Euler integration of gas-phase reactors.

use zd_core::units::{k, m3, pa};
use zd_kinetics::{ArrheniusRate, GasKinetics};
use zd_reactor::ConstPressureMoleReactor;
use zd_solver::{
    BackwardEuler, SimOptions, finite_difference_jacobian, max_abs_deviation, run_batch, run_sim,
    sparse_to_dense,
};
use zd_thermo::{IdealGasMixture, SpeciesThermo};

fn gas(t: f64) -> IdealGasMixture {
    let mut gas = IdealGasMixture::new(vec![
        SpeciesThermo::constant_cp("A", 30.0, 0.0, 2.0e5, 3.0e4),
        SpeciesThermo::constant_cp("B", 30.0, -2.0e7, 2.1e5, 3.3e4),
        SpeciesThermo::constant_cp("C", 60.0, -5.0e7, 2.5e5, 4.5e4),
        SpeciesThermo::constant_cp("N2", 28.0, 0.0, 1.9e5, 2.9e4),
    ])
    .unwrap();
    gas.set_temperature_pressure(k(t), pa(101_325.0)).unwrap();
    gas.set_mole_fractions(&[0.4, 0.3, 0.1, 0.2]).unwrap();
    gas
}

fn first_order() -> ArrheniusRate {
    ArrheniusRate::new(8.0e3, 0.0, 5.0e7)
}

fn reactor(t: f64, equations: &[(&str, ArrheniusRate)]) -> ConstPressureMoleReactor {
    let gas = gas(t);
    let kin = GasKinetics::from_equations(&gas, equations).unwrap();
    let mut r = ConstPressureMoleReactor::new("r", Box::new(gas), m3(0.5)).unwrap();
    r.set_kinetics(Box::new(kin));
    r
}

fn full_mechanism(t: f64) -> ConstPressureMoleReactor {
    reactor(
        t,
        &[
            ("A => B", first_order()),
            ("A + B => C", ArrheniusRate::new(30.0, 0.5, 0.0)),
        ],
    )
}

fn opts(dt: f64, t_end: f64) -> SimOptions {
    SimOptions {
        dt,
        t_end,
        record_every: 5,
        ..SimOptions::default()
    }
}

#[test]
fn closed_reactor_conserves_mass_and_heats_up() {
    let mut r = full_mechanism(1000.0);
    r.initialize(0.0).unwrap();
    let m0 = r.mass();

    let record = run_sim(&mut r, &opts(1e-4, 0.02)).unwrap();
    assert!((record.t.last().unwrap() - 0.02).abs() < 1e-12);
    assert!((r.mass() - m0).abs() < 1e-10 * m0);

    let temperature = record.series("temperature").unwrap();
    assert!(temperature.last().unwrap() > &1000.0);
    let a = record.series("A").unwrap();
    assert!(a.windows(2).all(|w| w[1] < w[0]));
    let n2 = record.series("N2").unwrap();
    assert!(n2.iter().all(|v| (v - n2[0]).abs() <= 1e-12 * n2[0]));
}

#[test]
fn disabled_energy_holds_temperature() {
    let mut r = full_mechanism(1000.0);
    r.set_energy_enabled(false);
    let record = run_sim(&mut r, &opts(1e-4, 0.01)).unwrap();
    for t in record.series("temperature").unwrap() {
        assert!((t - 1000.0).abs() < 1e-9);
    }
}

#[test]
fn isothermal_first_order_decay_matches_backward_euler_recurrence() {
    let mut r = reactor(1000.0, &[("A => B", first_order())]);
    r.set_energy_enabled(false);
    r.initialize(0.0).unwrap();
    let mut y = vec![0.0; r.neq()];
    r.get_state(&mut y).unwrap();
    let a0 = y[1];

    let dt = 1e-3;
    let steps = 40;
    let record = run_sim(
        &mut r,
        &SimOptions {
            dt,
            t_end: dt * steps as f64,
            record_every: 1,
            ..SimOptions::default()
        },
    )
    .unwrap();

    let rate = first_order().rate_constant(1000.0);
    let a = record.series("A").unwrap();
    assert_eq!(a.len(), steps + 1);
    for (n, value) in a.iter().enumerate() {
        let expected = a0 / (1.0 + rate * dt).powi(n as i32);
        assert!(
            (value - expected).abs() <= 1e-8 * a0,
            "step {n}: {value} vs {expected}"
        );
    }
    // first-order accurate against the exact solution
    let t_end = dt * steps as f64;
    let exact = a0 * (-rate * t_end).exp();
    assert!((a[steps] - exact).abs() < 0.05 * a0);
}

#[test]
fn batch_runs_are_independent() {
    let mut reactors = vec![full_mechanism(900.0), full_mechanism(1100.0)];
    let results = run_batch(&mut reactors, &opts(1e-4, 0.005));
    assert_eq!(results.len(), 2);
    let records: Vec<_> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(records[0].names, records[1].names);

    let a_cold = *records[0].series("A").unwrap().last().unwrap();
    let a_hot = *records[1].series("A").unwrap().last().unwrap();
    let a0_cold = records[0].series("A").unwrap()[0];
    let a0_hot = records[1].series("A").unwrap()[0];
    // the hotter reactor converts a larger fraction of A
    assert!(a_hot / a0_hot < a_cold / a0_cold);
}

#[test]
fn single_step_leaves_reactor_at_new_state() {
    let mut r = full_mechanism(1000.0);
    r.initialize(0.0).unwrap();
    let mut y0 = vec![0.0; r.neq()];
    r.get_state(&mut y0).unwrap();

    let y1 = BackwardEuler::default().step(&mut r, 0.0, &y0, 1e-4).unwrap();
    let mut y = vec![0.0; r.neq()];
    r.get_state(&mut y).unwrap();
    for (a, b) in y.iter().zip(&y1) {
        assert!((a - b).abs() <= 1e-12 * b.abs().max(1e-12));
    }
    assert!(y1[1] < y0[1]);
}

#[test]
fn analytic_jacobian_matches_finite_differences() {
    let mut r = full_mechanism(1000.0);
    r.initialize(0.0).unwrap();
    let mut y0 = vec![0.0; r.neq()];
    r.get_state(&mut y0).unwrap();

    let fd = finite_difference_jacobian(&mut r, 0.0, 1e-7).unwrap();
    let mut y = vec![0.0; r.neq()];
    r.get_state(&mut y).unwrap();
    assert_eq!(y, y0);

    let analytic = sparse_to_dense(&r.jacobian().unwrap());
    assert_eq!(analytic.shape(), fd.shape());
    for i in 0..analytic.nrows() {
        let scale = analytic.row(i).amax().max(fd.row(i).amax());
        for j in 0..analytic.ncols() {
            let diff = (analytic[(i, j)] - fd[(i, j)]).abs();
            assert!(
                diff <= 1e-4 * scale + 1e-14,
                "({i},{j}): analytic {} fd {}",
                analytic[(i, j)],
                fd[(i, j)]
            );
        }
    }
    assert!(max_abs_deviation(&analytic, &fd).unwrap().is_finite());
}
