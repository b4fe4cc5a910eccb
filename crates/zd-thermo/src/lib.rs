//! zd-thermo: thermodynamic phases for the zero-dimensional reactor.
//!
//! Provides:
//! - Species standard-state models (constant cp, NASA 7-coefficient polynomials)
//! - Composition handling (named mole fractions)
//! - `ThermoPhase` trait: the property interface a reactor queries and mutates
//! - `IdealGasMixture`: the bulk gas phase
//! - `SurfacePhase`: site-based phase for catalytic walls
//!
//! # Architecture
//!
//! A phase is a mutable, uniquely owned property calculator. Its state (temperature,
//! pressure, composition) is set in place and can be snapshotted with `save_state`
//! and put back with `restore_state`. The reactor owns exactly one phase per bulk or
//! surface and is responsible for leaving it in a well-defined state.
//!
//! # Example
//!
//! ```
//! use zd_thermo::{IdealGasMixture, SpeciesThermo, ThermoPhase};
//! use zd_core::units::{k, pa};
//!
//! let species = vec![
//!     SpeciesThermo::constant_cp("N2", 28.014, 0.0, 191_600.0, 29_124.0),
//!     SpeciesThermo::constant_cp("O2", 31.998, 0.0, 205_150.0, 29_378.0),
//! ];
//! let mut gas = IdealGasMixture::new(species).unwrap();
//! gas.set_temperature_pressure(k(300.0), pa(101_325.0)).unwrap();
//! gas.set_mole_fractions(&[0.79, 0.21]).unwrap();
//! println!("Density: {} kg/m³", gas.density());
//! ```

pub mod composition;
pub mod error;
pub mod ideal_gas;
pub mod phase;
pub mod species;
pub mod surface;

// Re-exports for ergonomics
pub use composition::Composition;
pub use error::{ThermoError, ThermoResult};
pub use ideal_gas::IdealGasMixture;
pub use phase::{PhaseKind, PhaseState, ThermoPhase};
pub use species::{Nasa7Range, SpeciesThermo, ThermoModel};
pub use surface::SurfacePhase;
