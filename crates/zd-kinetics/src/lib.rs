//! zd-kinetics: chemical kinetics for the zero-dimensional reactor.
//!
//! Provides:
//! - Modified Arrhenius rate constants
//! - Irreversible mass-action reactions parsed from equations (`"A + 2 B => C"`)
//! - `ReactionMechanism`: rates of progress, net production rates, and their
//!   sparse derivatives with respect to concentrations
//! - `Kinetics` trait + `GasKinetics` for homogeneous chemistry in a bulk phase
//! - `SurfaceKinetics` trait + `InterfaceKinetics` for heterogeneous chemistry
//!
//! Kinetics objects hold no phase state. Every evaluation reads the current state
//! of the phase(s) passed in, so a reactor can re-evaluate after perturbing its
//! phase without touching the kinetics.
//!
//! # Example
//!
//! ```
//! use zd_kinetics::{ArrheniusRate, GasKinetics, Kinetics};
//! use zd_thermo::{IdealGasMixture, SpeciesThermo, ThermoPhase};
//!
//! let gas = IdealGasMixture::new(vec![
//!     SpeciesThermo::constant_cp("A", 30.0, 0.0, 0.0, 3.0e4),
//!     SpeciesThermo::constant_cp("B", 30.0, -1.0e7, 0.0, 3.0e4),
//! ])
//! .unwrap();
//! let kin = GasKinetics::from_equations(&gas, &[("A => B", ArrheniusRate::new(10.0, 0.0, 0.0))])
//!     .unwrap();
//! let mut wdot = vec![0.0; 2];
//! kin.net_production_rates(&gas, &mut wdot).unwrap();
//! assert!(wdot[0] < 0.0 && wdot[1] > 0.0);
//! ```

pub mod error;
pub mod gas;
pub mod interface;
pub mod mechanism;
pub mod rate;
pub mod reaction;
pub mod traits;

// Re-exports
pub use error::{KineticsError, KineticsResult};
pub use gas::GasKinetics;
pub use interface::InterfaceKinetics;
pub use mechanism::ReactionMechanism;
pub use rate::ArrheniusRate;
pub use reaction::Reaction;
pub use traits::{Kinetics, SurfaceKinetics};
