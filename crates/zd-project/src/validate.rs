//! Case validation. Errors name the first offending field by path,
//! e.g. `surfaces[0].species[1].sites`.

use std::collections::{BTreeMap, HashSet};

use crate::schema::{CaseDef, ReactionDef, SolverDef, SpeciesThermoDef, SurfaceDef, WallDef};
use zd_reactor::TEMPERATURE;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

type VResult = Result<(), ValidationError>;

pub fn validate_case(case: &CaseDef) -> VResult {
    if case.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }
    if case.version == 0 {
        return Err(invalid("version", 0, "must be at least 1"));
    }
    not_blank("name", &case.name)?;

    if case.species.is_empty() {
        return Err(invalid("species", "[]", "at least one gas species is required"));
    }
    // temperature is reserved for the first state component
    let mut components: HashSet<&str> = HashSet::from([TEMPERATURE]);
    let mut gas: Vec<&str> = Vec::with_capacity(case.species.len());
    for (i, sp) in case.species.iter().enumerate() {
        let path = format!("species[{i}]");
        not_blank(&format!("{path}.name"), &sp.name)?;
        if !components.insert(&sp.name) {
            return Err(ValidationError::DuplicateId {
                id: sp.name.clone(),
                context: "species".to_string(),
            });
        }
        gas.push(&sp.name);
        positive(&format!("{path}.molar_mass_kg_per_kmol"), sp.molar_mass_kg_per_kmol)?;
        validate_thermo(&format!("{path}.thermo"), &sp.thermo)?;
    }

    for (i, rxn) in case.reactions.iter().enumerate() {
        validate_reaction(&format!("reactions[{i}]"), rxn, &gas)?;
    }

    let reactor = &case.reactor;
    not_blank("reactor.name", &reactor.name)?;
    positive("reactor.volume_m3", reactor.volume_m3)?;
    positive("reactor.temperature_k", reactor.temperature_k)?;
    positive("reactor.pressure_pa", reactor.pressure_pa)?;
    validate_fractions("reactor.mole_fractions", &reactor.mole_fractions, &gas)?;

    let mut connectors = HashSet::new();
    for (i, inlet) in case.inlets.iter().enumerate() {
        let path = format!("inlets[{i}]");
        not_blank(&format!("{path}.name"), &inlet.name)?;
        if !connectors.insert(&inlet.name) {
            return Err(ValidationError::DuplicateId {
                id: inlet.name.clone(),
                context: "connectors".to_string(),
            });
        }
        non_negative(&format!("{path}.mass_flow_kg_per_s"), inlet.mass_flow_kg_per_s)?;
        positive(&format!("{path}.temperature_k"), inlet.temperature_k)?;
        validate_fractions(&format!("{path}.mole_fractions"), &inlet.mole_fractions, &gas)?;
    }
    for (i, outlet) in case.outlets.iter().enumerate() {
        let path = format!("outlets[{i}]");
        not_blank(&format!("{path}.name"), &outlet.name)?;
        if !connectors.insert(&outlet.name) {
            return Err(ValidationError::DuplicateId {
                id: outlet.name.clone(),
                context: "connectors".to_string(),
            });
        }
        non_negative(&format!("{path}.mass_flow_kg_per_s"), outlet.mass_flow_kg_per_s)?;
    }

    for (i, wall) in case.walls.iter().enumerate() {
        let path = format!("walls[{i}]");
        match wall {
            WallDef::Fixed { heat_rate_w } => finite(&format!("{path}.heat_rate_w"), *heat_rate_w)?,
            WallDef::HeatTransfer {
                u_w_per_m2_k,
                area_m2,
                ambient_temperature_k,
            } => {
                non_negative(&format!("{path}.u_w_per_m2_k"), *u_w_per_m2_k)?;
                positive(&format!("{path}.area_m2"), *area_m2)?;
                positive(&format!("{path}.ambient_temperature_k"), *ambient_temperature_k)?;
            }
        }
    }

    let mut surface_names = HashSet::new();
    for (i, surface) in case.surfaces.iter().enumerate() {
        if !surface_names.insert(&surface.name) {
            return Err(ValidationError::DuplicateId {
                id: surface.name.clone(),
                context: "surfaces".to_string(),
            });
        }
        validate_surface(&format!("surfaces[{i}]"), surface, &gas, &mut components)?;
    }

    validate_solver(&case.solver)
}

fn validate_surface<'a>(
    path: &str,
    surface: &'a SurfaceDef,
    gas: &[&str],
    components: &mut HashSet<&'a str>,
) -> VResult {
    not_blank(&format!("{path}.name"), &surface.name)?;
    positive(&format!("{path}.area_m2"), surface.area_m2)?;
    positive(
        &format!("{path}.site_density_kmol_per_m2"),
        surface.site_density_kmol_per_m2,
    )?;
    if surface.species.is_empty() {
        return Err(invalid(
            &format!("{path}.species"),
            "[]",
            "a surface needs at least one species",
        ));
    }
    let mut own: Vec<&str> = Vec::with_capacity(surface.species.len());
    for (j, sp) in surface.species.iter().enumerate() {
        let sp_path = format!("{path}.species[{j}]");
        not_blank(&format!("{sp_path}.name"), &sp.name)?;
        if !components.insert(&sp.name) {
            return Err(ValidationError::DuplicateId {
                id: sp.name.clone(),
                context: "components".to_string(),
            });
        }
        own.push(&sp.name);
        positive(&format!("{sp_path}.molar_mass_kg_per_kmol"), sp.molar_mass_kg_per_kmol)?;
        validate_thermo(&format!("{sp_path}.thermo"), &sp.thermo)?;
        positive(&format!("{sp_path}.sites"), sp.sites)?;
    }
    if !surface.coverages.is_empty() {
        validate_fractions(&format!("{path}.coverages"), &surface.coverages, &own)?;
    }

    let mut all: Vec<&str> = gas.to_vec();
    all.extend(&own);
    for (j, rxn) in surface.reactions.iter().enumerate() {
        validate_reaction(&format!("{path}.reactions[{j}]"), rxn, &all)?;
    }
    Ok(())
}

fn validate_thermo(path: &str, thermo: &SpeciesThermoDef) -> VResult {
    match thermo {
        SpeciesThermoDef::ConstantCp {
            h0_j_per_kmol,
            s0_j_per_kmol_k,
            cp_j_per_kmol_k,
        } => {
            finite(&format!("{path}.h0_j_per_kmol"), *h0_j_per_kmol)?;
            finite(&format!("{path}.s0_j_per_kmol_k"), *s0_j_per_kmol_k)?;
            non_negative(&format!("{path}.cp_j_per_kmol_k"), *cp_j_per_kmol_k)
        }
        SpeciesThermoDef::Nasa7 { t_mid_k, low, high } => {
            positive(&format!("{path}.t_mid_k"), *t_mid_k)?;
            for (i, a) in low.iter().enumerate() {
                finite(&format!("{path}.low[{i}]"), *a)?;
            }
            for (i, a) in high.iter().enumerate() {
                finite(&format!("{path}.high[{i}]"), *a)?;
            }
            Ok(())
        }
    }
}

fn validate_reaction(path: &str, rxn: &ReactionDef, species: &[&str]) -> VResult {
    not_blank(&format!("{path}.equation"), &rxn.equation)?;
    non_negative(&format!("{path}.a"), rxn.a)?;
    finite(&format!("{path}.b"), rxn.b)?;
    finite(&format!("{path}.ea_j_per_kmol"), rxn.ea_j_per_kmol)?;
    for (name, order) in &rxn.orders {
        if !species.contains(&name.as_str()) {
            return Err(ValidationError::MissingReference {
                id: name.clone(),
                context: format!("{path}.orders"),
            });
        }
        non_negative(&format!("{path}.orders.{name}"), *order)?;
    }
    Ok(())
}

fn validate_fractions(path: &str, fractions: &BTreeMap<String, f64>, species: &[&str]) -> VResult {
    if fractions.is_empty() {
        return Err(invalid(path, "{}", "at least one species is required"));
    }
    let mut sum = 0.0;
    for (name, x) in fractions {
        if !species.contains(&name.as_str()) {
            return Err(ValidationError::MissingReference {
                id: name.clone(),
                context: path.to_string(),
            });
        }
        non_negative(&format!("{path}.{name}"), *x)?;
        sum += x;
    }
    if sum <= 0.0 {
        return Err(invalid(path, sum, "fractions must have a positive sum"));
    }
    Ok(())
}

fn validate_solver(solver: &SolverDef) -> VResult {
    positive("solver.dt_s", solver.dt_s)?;
    non_negative("solver.t_end_s", solver.t_end_s)?;
    if solver.max_steps == 0 {
        return Err(invalid("solver.max_steps", 0, "must be positive"));
    }
    if solver.record_every == 0 {
        return Err(invalid("solver.record_every", 0, "must be positive"));
    }
    non_negative("solver.rtol", solver.rtol)?;
    positive("solver.atol", solver.atol)?;
    if solver.newton_max_iterations == 0 {
        return Err(invalid("solver.newton_max_iterations", 0, "must be positive"));
    }
    Ok(())
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn not_blank(field: &str, value: &str) -> VResult {
    if value.trim().is_empty() {
        return Err(invalid(field, "\"\"", "must not be empty"));
    }
    Ok(())
}

fn finite(field: &str, v: f64) -> VResult {
    if !v.is_finite() {
        return Err(invalid(field, v, "must be finite"));
    }
    Ok(())
}

fn positive(field: &str, v: f64) -> VResult {
    if !v.is_finite() || v <= 0.0 {
        return Err(invalid(field, v, "must be positive"));
    }
    Ok(())
}

fn non_negative(field: &str, v: f64) -> VResult {
    if !v.is_finite() || v < 0.0 {
        return Err(invalid(field, v, "must be non-negative"));
    }
    Ok(())
}
