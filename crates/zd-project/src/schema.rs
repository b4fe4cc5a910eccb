//! Case file schema definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One reactor case: mechanism, reactor, surroundings and solver settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseDef {
    pub version: u32,
    pub name: String,
    pub species: Vec<SpeciesDef>,
    #[serde(default)]
    pub reactions: Vec<ReactionDef>,
    pub reactor: ReactorDef,
    #[serde(default)]
    pub inlets: Vec<InletDef>,
    #[serde(default)]
    pub outlets: Vec<OutletDef>,
    #[serde(default)]
    pub walls: Vec<WallDef>,
    #[serde(default)]
    pub surfaces: Vec<SurfaceDef>,
    #[serde(default)]
    pub solver: SolverDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeciesDef {
    pub name: String,
    pub molar_mass_kg_per_kmol: f64,
    pub thermo: SpeciesThermoDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "model")]
pub enum SpeciesThermoDef {
    ConstantCp {
        h0_j_per_kmol: f64,
        s0_j_per_kmol_k: f64,
        cp_j_per_kmol_k: f64,
    },
    Nasa7 {
        t_mid_k: f64,
        low: [f64; 7],
        high: [f64; 7],
    },
}

/// Irreversible reaction with modified Arrhenius rate `A·T^b·exp(-Ea/RT)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactionDef {
    pub equation: String,
    pub a: f64,
    #[serde(default)]
    pub b: f64,
    #[serde(default)]
    pub ea_j_per_kmol: f64,
    /// Rate-law orders that differ from the stoichiometric coefficients.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub orders: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReactorDef {
    pub name: String,
    pub volume_m3: f64,
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub mole_fractions: BTreeMap<String, f64>,
    #[serde(default = "default_true")]
    pub energy: bool,
    #[serde(default = "default_true")]
    pub chemistry: bool,
    /// Omit the dilution term from the gas-phase mole derivatives.
    #[serde(default)]
    pub skip_dilution: bool,
}

fn default_true() -> bool {
    true
}

/// Mass-flow-controlled feed from a fixed reservoir at the reactor pressure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InletDef {
    pub name: String,
    pub mass_flow_kg_per_s: f64,
    pub temperature_k: f64,
    pub mole_fractions: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutletDef {
    pub name: String,
    pub mass_flow_kg_per_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WallDef {
    /// Constant heat rate into the reactor.
    Fixed { heat_rate_w: f64 },
    /// Q = U·A·(T_ambient − T).
    HeatTransfer {
        u_w_per_m2_k: f64,
        area_m2: f64,
        ambient_temperature_k: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceDef {
    pub name: String,
    pub area_m2: f64,
    pub site_density_kmol_per_m2: f64,
    pub species: Vec<SurfaceSpeciesDef>,
    /// Initial coverages; a surface without coverages starts fully covered by its first
    /// species.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub coverages: BTreeMap<String, f64>,
    #[serde(default)]
    pub reactions: Vec<ReactionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceSpeciesDef {
    pub name: String,
    pub molar_mass_kg_per_kmol: f64,
    pub thermo: SpeciesThermoDef,
    /// Number of sites occupied.
    #[serde(default = "default_sites")]
    pub sites: f64,
}

fn default_sites() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_dt")]
    pub dt_s: f64,
    #[serde(default = "default_t_end")]
    pub t_end_s: f64,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    #[serde(default = "default_atol")]
    pub atol: f64,
    #[serde(default = "default_newton_iterations")]
    pub newton_max_iterations: usize,
}

fn default_dt() -> f64 {
    1e-4
}

fn default_t_end() -> f64 {
    0.1
}

fn default_max_steps() -> usize {
    100_000
}

fn default_record_every() -> usize {
    10
}

fn default_rtol() -> f64 {
    1e-7
}

fn default_atol() -> f64 {
    1e-10
}

fn default_newton_iterations() -> usize {
    25
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            dt_s: default_dt(),
            t_end_s: default_t_end(),
            max_steps: default_max_steps(),
            record_every: default_record_every(),
            rtol: default_rtol(),
            atol: default_atol(),
            newton_max_iterations: default_newton_iterations(),
        }
    }
}
