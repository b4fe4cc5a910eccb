//! zd-reactor: constant-pressure, well-mixed reactor with species moles as state.
//!
//! Provides:
//! - `StateLayout`: flat state vector ↔ component names
//! - `ConstPressureMoleReactor`: governing-equation evaluation and sparse Jacobian
//! - `AttachedSurface` / `ReactorSurface`: heterogeneous chemistry on walls
//! - `FlowConnector` / `MassFlowController`: inlets and outlets
//! - `Wall`: external heat exchange
//! - `ReactorOde`: the contract consumed by implicit integrators

pub mod connector;
pub mod error;
pub mod flow;
mod jacobian;
pub mod layout;
pub mod model;
pub mod reactor;
pub mod surface;
pub mod triplets;
pub mod wall;

// Re-exports
pub use connector::{FlowConnector, MassFlowController, UpstreamState};
pub use error::{ReactorError, ReactorResult};
pub use flow::FlowTerms;
pub use layout::{SPECIES_OFFSET, StateLayout, TEMPERATURE};
pub use model::ReactorOde;
pub use reactor::{ConstPressureMoleReactor, ReactorOptions};
pub use surface::{AttachedSurface, ReactorSurface, SurfaceJacobianContext};
pub use triplets::TripletAccumulator;
pub use wall::{FixedHeatRate, HeatTransferWall, Wall};
