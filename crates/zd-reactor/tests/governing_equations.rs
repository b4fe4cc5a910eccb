//! Integration tests: reactor balances for closed, flowing, and reacting cases.

mod common;

use std::sync::Arc;

use common::{P_ATM, four_species_gas, reacting_reactor, state};
use zd_core::constants::GAS_CONSTANT;
use zd_core::units::{k, kgps, m2, m3, pa, watts};
use zd_core::{Tolerances, nearly_equal};
use zd_kinetics::{ArrheniusRate, GasKinetics};
use zd_reactor::{
    ConstPressureMoleReactor, FixedHeatRate, FlowConnector, HeatTransferWall, MassFlowController,
    ReactorError, ReactorOptions,
};
use zd_thermo::{IdealGasMixture, SpeciesThermo, SurfacePhase, ThermoPhase};

fn eval(r: &mut ConstPressureMoleReactor) -> (Vec<f64>, Vec<f64>) {
    let n = r.neq();
    let mut lhs = vec![0.0; n];
    let mut rhs = vec![0.0; n];
    r.eval(0.0, &mut lhs, &mut rhs).unwrap();
    (lhs, rhs)
}

fn two_species_gas(t: f64, x: &[f64]) -> IdealGasMixture {
    let mut gas = IdealGasMixture::new(vec![
        SpeciesThermo::constant_cp("A", 20.0, 1.0e6, 1.5e5, 3.0e4),
        SpeciesThermo::constant_cp("B", 20.0, -4.0e7, 1.6e5, 3.5e4),
    ])
    .unwrap();
    gas.set_temperature_pressure(k(t), pa(P_ATM)).unwrap();
    gas.set_mole_fractions(x).unwrap();
    gas
}

#[test]
fn closed_reactor_without_reactions_is_at_rest() {
    for (t, x) in [(300.0, [0.25, 0.25, 0.25, 0.25]), (1500.0, [0.9, 0.0, 0.05, 0.05])] {
        let gas = four_species_gas(t, &x);
        let mut r = ConstPressureMoleReactor::new("closed", Box::new(gas), m3(2.0)).unwrap();
        r.initialize(0.0).unwrap();
        let (lhs, rhs) = eval(&mut r);
        assert!(rhs.iter().all(|&v| v == 0.0), "rhs = {rhs:?}");
        assert!(lhs[0] > 0.0);
        assert!(lhs[1..].iter().all(|&v| v == 1.0));
    }
}

#[test]
fn reactor_with_disabled_chemistry_is_at_rest() {
    let mut r = reacting_reactor();
    r.set_options(ReactorOptions {
        energy: true,
        chemistry: false,
    });
    r.initialize(0.0).unwrap();
    let (_, rhs) = eval(&mut r);
    assert!(rhs.iter().all(|&v| v == 0.0));
}

#[test]
fn outlet_drains_single_species() {
    let mut gas = IdealGasMixture::new(vec![SpeciesThermo::constant_cp(
        "N2", 28.0, 0.0, 1.9e5, 2.9e4,
    )])
    .unwrap();
    gas.set_temperature_pressure(k(400.0), pa(P_ATM)).unwrap();
    let mut r = ConstPressureMoleReactor::new("tank", Box::new(gas), m3(1.0)).unwrap();
    let outlet = Arc::new(MassFlowController::new("vent", 1, kgps(0.7)).unwrap());
    r.add_outlet(outlet.clone());
    r.add_wall(Box::new(FixedHeatRate::new(watts(500.0)).unwrap()));
    r.initialize(0.0).unwrap();

    let (lhs, rhs) = eval(&mut r);
    let tol = Tolerances::default();
    assert!(nearly_equal(rhs[1], -0.7 / 28.0, tol));
    assert_eq!(rhs[0], 500.0);
    assert!(nearly_equal(lhs[0], r.mass() * r.thermo().cp_mass(), tol));
    // the outlet sees the reactor contents
    assert_eq!(outlet.upstream().mass_fractions, vec![1.0]);
}

#[test]
fn outlet_removes_species_by_mass_fraction() {
    let gas = two_species_gas(500.0, &[0.5, 0.5]);
    let mut r = ConstPressureMoleReactor::new("mix", Box::new(gas), m3(1.0)).unwrap();
    r.add_outlet(Arc::new(MassFlowController::new("vent", 2, kgps(2.0)).unwrap()));
    r.initialize(0.0).unwrap();
    let (_, rhs) = eval(&mut r);
    let tol = Tolerances::default();
    assert!(nearly_equal(rhs[1], -0.05, tol));
    assert!(nearly_equal(rhs[2], -0.05, tol));
    assert_eq!(rhs[0], 0.0);
}

#[test]
fn inlet_feeds_species_and_enthalpy() {
    let feed = two_species_gas(800.0, &[1.0, 0.0]);
    let gas = two_species_gas(300.0, &[0.0, 1.0]);
    let mut r = ConstPressureMoleReactor::new("mix", Box::new(gas), m3(1.0)).unwrap();
    let inlet: Arc<dyn FlowConnector> =
        Arc::new(MassFlowController::from_reservoir("feed", &feed, kgps(0.4)).unwrap());
    r.add_inlet(inlet);
    r.initialize(0.0).unwrap();
    let (_, rhs) = eval(&mut r);

    let mut hk = [0.0; 2];
    r.thermo().partial_molar_enthalpies(&mut hk);
    let tol = Tolerances::default();
    assert!(nearly_equal(rhs[1], 0.4 / 20.0, tol));
    assert_eq!(rhs[2], 0.0);
    // mdot·(h_in − h_A(T_reactor)/M_A): the sensible heat of the hot feed
    let expected = 0.4 * (feed.enthalpy_mass() - hk[0] / 20.0);
    assert!(nearly_equal(rhs[0], expected, tol));
    assert!(nearly_equal(expected, 0.4 / 20.0 * 3.0e4 * 500.0, tol));
}

#[test]
fn forward_reaction_scenario() {
    let (t, v, kf) = (600.0, 0.25, 3.0);
    let gas = two_species_gas(t, &[0.7, 0.3]);
    let kin = GasKinetics::from_equations(&gas, &[("A => B", ArrheniusRate::new(kf, 0.0, 0.0))])
        .unwrap();
    let mut r = ConstPressureMoleReactor::new("ab", Box::new(gas), m3(v)).unwrap();
    r.set_kinetics(Box::new(kin));
    r.initialize(0.0).unwrap();
    let (lhs, rhs) = eval(&mut r);

    let rate = kf * 0.7 * P_ATM / (GAS_CONSTANT * t);
    let mut hk = [0.0; 2];
    r.thermo().partial_molar_enthalpies(&mut hk);
    let tol = Tolerances {
        abs: 1e-12,
        rel: 1e-10,
    };
    assert!(nearly_equal(rhs[1], -rate * v, tol));
    assert!(nearly_equal(rhs[2], rate * v, tol));
    assert!(nearly_equal(rhs[0], -rate * v * (hk[1] - hk[0]), tol));
    assert!(rhs[0] > 0.0, "A => B is exothermic here");
    assert!(nearly_equal(lhs[0], r.mass() * r.thermo().cp_mass(), tol));
}

#[test]
fn energy_disabled_pins_temperature() {
    let mut r = reacting_reactor();
    r.set_energy_enabled(false);
    r.add_wall(Box::new(FixedHeatRate::new(watts(1.0e6)).unwrap()));
    r.initialize(0.0).unwrap();
    let (lhs, rhs) = eval(&mut r);
    assert_eq!(rhs[0], 0.0);
    assert_eq!(lhs[0], 1.0);
    assert!(rhs[1] < 0.0);

    // temperature column and row are omitted
    let jac = r.jacobian().unwrap();
    assert!(jac.nnz() > 0);
    for (_, (row, col)) in jac.iter() {
        assert!(row != 0 && col != 0, "unexpected entry at ({row}, {col})");
    }
}

#[test]
fn eval_is_deterministic() {
    let mut r = reacting_reactor();
    r.add_wall(Box::new(
        HeatTransferWall::new(50.0, m2(1.0), k(300.0)).unwrap(),
    ));
    r.initialize(0.0).unwrap();
    let (lhs1, rhs1) = eval(&mut r);
    let (lhs2, rhs2) = eval(&mut r);
    assert_eq!(
        lhs1.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        lhs2.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
    assert_eq!(
        rhs1.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        rhs2.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn heat_transfer_wall_cools_hot_gas() {
    let gas = two_species_gas(900.0, &[0.5, 0.5]);
    let mut r = ConstPressureMoleReactor::new("hot", Box::new(gas), m3(1.0)).unwrap();
    r.add_wall(Box::new(
        HeatTransferWall::new(20.0, m2(3.0), k(300.0)).unwrap(),
    ));
    r.initialize(0.0).unwrap();
    let (_, rhs) = eval(&mut r);
    assert_eq!(rhs[0], 20.0 * 3.0 * (300.0 - 900.0));
}

#[test]
fn state_roundtrip_sets_mass_and_volume() {
    let mut r = reacting_reactor();
    r.initialize(0.0).unwrap();
    let mut y = state(&mut r);
    let tol = Tolerances::default();
    let n_total: f64 = y[1..].iter().sum();
    assert!(nearly_equal(
        n_total,
        P_ATM * 0.5 / (GAS_CONSTANT * 1000.0),
        tol
    ));

    // doubling the moles at fixed T and P doubles mass and volume
    let mass = r.mass();
    for n in &mut y[1..] {
        *n *= 2.0;
    }
    r.update_state(&y).unwrap();
    assert!(nearly_equal(r.mass(), 2.0 * mass, tol));
    assert!(nearly_equal(r.volume(), 1.0, tol));
    assert_eq!(r.pressure(), P_ATM);

    let back = state(&mut r);
    for (a, b) in back.iter().zip(&y) {
        assert!(nearly_equal(*a, *b, tol));
    }
}

#[test]
fn external_phase_change_is_adopted() {
    let mut r = reacting_reactor();
    r.initialize(0.0).unwrap();
    r.thermo_mut().set_state_tp(1200.0, P_ATM).unwrap();
    let y = state(&mut r);
    assert_eq!(y[0], 1200.0);

    // solver-set states win over stale reads afterwards
    let mut y2 = y.clone();
    y2[0] = 1100.0;
    r.update_state(&y2).unwrap();
    eval(&mut r);
    assert_eq!(r.thermo().temperature(), 1100.0);
}

#[test]
fn adopted_phase_refreshes_mass_and_outlets() {
    let mut r = reacting_reactor();
    let outlet = Arc::new(MassFlowController::new("vent", 4, kgps(0.01)).unwrap());
    r.add_outlet(outlet.clone());
    r.initialize(0.0).unwrap();
    let mass_before = r.mass();

    r.thermo_mut().set_state_tp(1500.0, P_ATM).unwrap();
    let (lhs1, rhs1) = eval(&mut r);
    // same volume, hotter gas: less mass
    assert!(r.mass() < mass_before);
    assert_eq!(r.mass(), r.thermo().density() * r.volume());
    assert_eq!(lhs1[0], r.mass() * r.thermo().cp_mass());
    assert_eq!(outlet.upstream().enthalpy_mass, r.thermo().enthalpy_mass());

    // reading the state must not change what eval returns
    let y = state(&mut r);
    assert_eq!(y[0], 1500.0);
    let (lhs2, rhs2) = eval(&mut r);
    assert_eq!(
        lhs1.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        lhs2.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
    assert_eq!(
        rhs1.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        rhs2.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );
}

#[test]
fn component_lookup() {
    let mut r = reacting_reactor();
    assert_eq!(r.component_index("A"), None);
    assert!(matches!(
        r.component_name(0),
        Err(ReactorError::NotInitialized { .. })
    ));
    r.initialize(0.0).unwrap();
    assert_eq!(r.component_index("temperature"), Some(0));
    assert_eq!(r.component_index("N2"), Some(4));
    assert_eq!(r.component_index("XE"), None);
    for i in 0..r.neq() {
        let name = r.component_name(i).unwrap();
        assert_eq!(r.component_index(&name), Some(i));
    }
    assert!(matches!(
        r.component_name(r.neq()),
        Err(ReactorError::IndexOutOfBounds { .. })
    ));
}

#[test]
fn preconditions_are_enforced() {
    let surface = SurfacePhase::new(
        vec![SpeciesThermo::constant_cp("PT(S)", 195.0, 0.0, 0.0, 0.0)],
        2.7e-9,
    )
    .unwrap();
    assert!(matches!(
        ConstPressureMoleReactor::new("bad", Box::new(surface), m3(1.0)),
        Err(ReactorError::IncompatiblePhase { .. })
    ));
    let gas = two_species_gas(300.0, &[0.5, 0.5]);
    assert!(ConstPressureMoleReactor::new("bad", Box::new(gas.clone()), m3(0.0)).is_err());

    let mut r = ConstPressureMoleReactor::new("r", Box::new(gas), m3(1.0)).unwrap();
    assert!(matches!(
        r.jacobian(),
        Err(ReactorError::NotInitialized { what: "jacobian" })
    ));
    let mut y = vec![0.0; 3];
    assert!(r.get_state(&mut y).is_err());
    let mut lhs = vec![0.0; 3];
    assert!(r.eval(0.0, &mut lhs, &mut y).is_err());

    r.initialize(0.0).unwrap();
    let mut short = vec![0.0; 2];
    assert!(matches!(
        r.get_state(&mut short),
        Err(ReactorError::StateLength { .. })
    ));
    // adding a connector afterwards requires re-initialization
    r.add_outlet(Arc::new(MassFlowController::new("vent", 2, kgps(0.1)).unwrap()));
    assert!(!r.is_initialized());
    r.initialize(0.0).unwrap();
    assert_eq!(r.neq(), 3);
}

#[test]
fn mismatched_collaborators_rejected() {
    let mut r = reacting_reactor();
    r.add_inlet(Arc::new(MassFlowController::new("feed", 3, kgps(0.1)).unwrap()));
    assert!(matches!(
        r.initialize(0.0),
        Err(ReactorError::SpeciesMismatch { .. })
    ));

    let gas = two_species_gas(300.0, &[0.5, 0.5]);
    let kin = GasKinetics::from_equations(&gas, &[("A => B", ArrheniusRate::new(1.0, 0.0, 0.0))])
        .unwrap();
    let mut r = reacting_reactor();
    r.set_kinetics(Box::new(kin));
    assert!(r.initialize(0.0).is_err());
}
