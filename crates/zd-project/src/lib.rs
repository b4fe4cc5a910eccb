//! zd-project: reactor case file format, validation and compilation.
//!
//! A case file (YAML or JSON) describes the gas mechanism, the reactor and its
//! surroundings, attached surfaces and the integrator settings. `load_*` parses and
//! validates, `save_*` validates and writes, `compile_case` builds a reactor.

pub mod compile;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use compile::{CompiledCase, compile_case};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_case};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Thermo error: {0}")]
    Thermo(#[from] zd_thermo::ThermoError),

    #[error("Kinetics error: {0}")]
    Kinetics(#[from] zd_kinetics::KineticsError),

    #[error("Reactor error: {0}")]
    Reactor(#[from] zd_reactor::ReactorError),

    #[error("Solver error: {0}")]
    Solver(#[from] zd_solver::SolverError),
}

pub fn load_yaml(path: &Path) -> ProjectResult<CaseDef> {
    let content = std::fs::read_to_string(path)?;
    let case: CaseDef = serde_yaml::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_yaml(path: &Path, case: &CaseDef) -> ProjectResult<()> {
    validate_case(case)?;
    let content = serde_yaml::to_string(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<CaseDef> {
    let content = std::fs::read_to_string(path)?;
    let case: CaseDef = serde_json::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_json(path: &Path, case: &CaseDef) -> ProjectResult<()> {
    validate_case(case)?;
    let content = serde_json::to_string_pretty(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a case, choosing the format from the file extension (`.json`, otherwise YAML).
pub fn load_case(path: &Path) -> ProjectResult<CaseDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
