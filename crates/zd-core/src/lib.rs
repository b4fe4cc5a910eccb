//! zd-core: stable foundation for the zero-dimensional reactor workspace.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - constants (gas constant, reference pressure)
//! - error (shared error types)

pub mod constants;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{ZdError, ZdResult};
pub use numeric::*;
