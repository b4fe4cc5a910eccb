//! zd-solver: outer driver for zero-dimensional reactors.
//!
//! Provides:
//! - Finite-difference reference Jacobians and sparse → dense conversion
//! - Newton iteration with backtracking line search (`ImplicitSystem`)
//! - Backward-Euler time stepping on the reactor's sparse Jacobian
//! - `run_sim` for one reactor, `run_batch` for independent reactors in parallel

pub mod error;
pub mod integrator;
pub mod jacobian;
pub mod newton;
pub mod sim;

pub use error::{SolverError, SolverResult};
pub use integrator::BackwardEuler;
pub use jacobian::{finite_difference_jacobian, max_abs_deviation, sparse_to_dense};
pub use newton::{ImplicitSystem, NewtonConfig, NewtonResult, newton_solve};
pub use sim::{SimOptions, SimRecord, run_batch, run_sim};
