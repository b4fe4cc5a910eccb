//! Compile a validated case into a reactor and simulation options.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;
use zd_core::units::{k, kgps, m2, m3, pa, watts};
use zd_kinetics::{
    ArrheniusRate, GasKinetics, InterfaceKinetics, KineticsError, Reaction, ReactionMechanism,
};
use zd_reactor::{
    ConstPressureMoleReactor, FixedHeatRate, HeatTransferWall, MassFlowController,
    ReactorOptions, ReactorSurface,
};
use zd_solver::{BackwardEuler, NewtonConfig, SimOptions};
use zd_thermo::{Composition, IdealGasMixture, SpeciesThermo, SurfacePhase, ThermoPhase};

use crate::ProjectResult;
use crate::schema::{CaseDef, ReactionDef, SolverDef, SpeciesThermoDef, SurfaceDef, WallDef};
use crate::validate::validate_case;

/// A ready-to-run case. The reactor is not initialized yet.
#[derive(Debug)]
pub struct CompiledCase {
    pub reactor: ConstPressureMoleReactor,
    pub options: SimOptions,
}

pub fn compile_case(case: &CaseDef) -> ProjectResult<CompiledCase> {
    validate_case(case)?;

    let gas_species: Vec<SpeciesThermo> = case
        .species
        .iter()
        .map(|sp| species_thermo(&sp.name, sp.molar_mass_kg_per_kmol, &sp.thermo))
        .collect();
    let mut gas = IdealGasMixture::new(gas_species)?;
    let names = gas.species_names();
    let def = &case.reactor;
    set_gas_state(&mut gas, def.temperature_k, def.pressure_pa, &def.mole_fractions)?;

    let mut reactor = ConstPressureMoleReactor::new(&def.name, Box::new(gas.clone()), m3(def.volume_m3))?;
    reactor.set_options(ReactorOptions {
        energy: def.energy,
        chemistry: def.chemistry,
    });
    if !case.reactions.is_empty() {
        let mechanism = build_mechanism(names.clone(), &case.reactions)?;
        reactor.set_kinetics(Box::new(
            GasKinetics::new(mechanism).with_skip_dilution(def.skip_dilution),
        ));
    }

    for inlet in &case.inlets {
        let mut reservoir = gas.clone();
        set_gas_state(
            &mut reservoir,
            inlet.temperature_k,
            def.pressure_pa,
            &inlet.mole_fractions,
        )?;
        let mfc = MassFlowController::from_reservoir(
            &inlet.name,
            &reservoir,
            kgps(inlet.mass_flow_kg_per_s),
        )?;
        reactor.add_inlet(Arc::new(mfc));
    }
    for outlet in &case.outlets {
        let mfc = MassFlowController::new(
            &outlet.name,
            names.len(),
            kgps(outlet.mass_flow_kg_per_s),
        )?;
        reactor.add_outlet(Arc::new(mfc));
    }

    for wall in &case.walls {
        match wall {
            WallDef::Fixed { heat_rate_w } => {
                reactor.add_wall(Box::new(FixedHeatRate::new(watts(*heat_rate_w))?));
            }
            WallDef::HeatTransfer {
                u_w_per_m2_k,
                area_m2,
                ambient_temperature_k,
            } => {
                reactor.add_wall(Box::new(HeatTransferWall::new(
                    *u_w_per_m2_k,
                    m2(*area_m2),
                    k(*ambient_temperature_k),
                )?));
            }
        }
    }

    for surface in &case.surfaces {
        reactor.add_surface(Box::new(build_surface(surface, &names)?));
    }

    info!(
        case = %case.name,
        species = names.len(),
        reactions = case.reactions.len(),
        surfaces = case.surfaces.len(),
        "case compiled"
    );

    Ok(CompiledCase {
        reactor,
        options: sim_options(&case.solver),
    })
}

fn species_thermo(name: &str, molar_mass: f64, def: &SpeciesThermoDef) -> SpeciesThermo {
    match def {
        SpeciesThermoDef::ConstantCp {
            h0_j_per_kmol,
            s0_j_per_kmol_k,
            cp_j_per_kmol_k,
        } => SpeciesThermo::constant_cp(
            name,
            molar_mass,
            *h0_j_per_kmol,
            *s0_j_per_kmol_k,
            *cp_j_per_kmol_k,
        ),
        SpeciesThermoDef::Nasa7 { t_mid_k, low, high } => {
            SpeciesThermo::nasa7(name, molar_mass, *t_mid_k, *low, *high)
        }
    }
}

fn composition(fractions: &BTreeMap<String, f64>) -> ProjectResult<Composition> {
    Ok(Composition::new_mole_fractions(
        fractions.iter().map(|(name, x)| (name.clone(), *x)).collect(),
    )?)
}

fn set_gas_state(
    gas: &mut IdealGasMixture,
    t: f64,
    p: f64,
    fractions: &BTreeMap<String, f64>,
) -> ProjectResult<()> {
    let x = composition(fractions)?.to_dense(&gas.species_names())?;
    gas.set_temperature_pressure(k(t), pa(p))?;
    gas.set_mole_fractions(&x)?;
    Ok(())
}

fn build_mechanism(species: Vec<String>, reactions: &[ReactionDef]) -> ProjectResult<ReactionMechanism> {
    let mut mechanism = ReactionMechanism::new(species);
    for rxn in reactions {
        let rate = ArrheniusRate::new(rxn.a, rxn.b, rxn.ea_j_per_kmol);
        let mut reaction = Reaction::parse(&rxn.equation, mechanism.species(), rate)?;
        for (name, order) in &rxn.orders {
            let idx = mechanism
                .species()
                .iter()
                .position(|s| s == name)
                .ok_or_else(|| KineticsError::UnknownSpecies {
                    name: name.clone(),
                    equation: rxn.equation.clone(),
                })?;
            reaction = reaction.with_order(idx, *order)?;
        }
        mechanism.add_reaction(reaction)?;
    }
    Ok(mechanism)
}

fn build_surface(def: &SurfaceDef, gas_names: &[String]) -> ProjectResult<ReactorSurface> {
    let species: Vec<SpeciesThermo> = def
        .species
        .iter()
        .map(|sp| species_thermo(&sp.name, sp.molar_mass_kg_per_kmol, &sp.thermo))
        .collect();
    let sizes = def.species.iter().map(|sp| sp.sites).collect();
    let mut phase = SurfacePhase::with_sizes(species, sizes, def.site_density_kmol_per_m2)?;
    if !def.coverages.is_empty() {
        let theta = composition(&def.coverages)?.to_dense(&phase.species_names())?;
        phase.set_coverages(&theta)?;
    }

    let mut all = gas_names.to_vec();
    all.extend(phase.species_names());
    let mechanism = build_mechanism(all, &def.reactions)?;
    let kinetics = InterfaceKinetics::new(mechanism, gas_names.len())?;
    Ok(ReactorSurface::new(
        &def.name,
        phase,
        Box::new(kinetics),
        m2(def.area_m2),
    )?)
}

fn sim_options(def: &SolverDef) -> SimOptions {
    let defaults = BackwardEuler::default();
    SimOptions {
        dt: def.dt_s,
        t_end: def.t_end_s,
        max_steps: def.max_steps,
        record_every: def.record_every,
        integrator: BackwardEuler {
            newton: NewtonConfig {
                max_iterations: def.newton_max_iterations,
                ..defaults.newton
            },
            rtol: def.rtol,
            atol: def.atol,
        },
    }
}
