//! Solver-facing contract for reactors.

use sprs::CsMat;

use crate::error::ReactorResult;
use crate::reactor::ConstPressureMoleReactor;

/// A reactor as seen by an implicit integrator: a mass-matrix ODE
/// `LHS ⊙ dy/dt = RHS` with a sparse Jacobian of `RHS/LHS`.
pub trait ReactorOde {
    /// State length (0 before initialization).
    fn neq(&self) -> usize;

    fn initialize(&mut self, t0: f64) -> ReactorResult<()>;

    fn get_state(&mut self, y: &mut [f64]) -> ReactorResult<()>;

    fn update_state(&mut self, y: &[f64]) -> ReactorResult<()>;

    fn eval(&mut self, time: f64, lhs: &mut [f64], rhs: &mut [f64]) -> ReactorResult<()>;

    fn jacobian(&mut self) -> ReactorResult<CsMat<f64>>;

    fn component_name(&self, index: usize) -> ReactorResult<String>;

    fn component_index(&self, name: &str) -> Option<usize>;

    /// Time of the last evaluation.
    fn time(&self) -> f64;
}

impl ReactorOde for ConstPressureMoleReactor {
    fn neq(&self) -> usize {
        ConstPressureMoleReactor::neq(self)
    }

    fn initialize(&mut self, t0: f64) -> ReactorResult<()> {
        ConstPressureMoleReactor::initialize(self, t0)
    }

    fn get_state(&mut self, y: &mut [f64]) -> ReactorResult<()> {
        ConstPressureMoleReactor::get_state(self, y)
    }

    fn update_state(&mut self, y: &[f64]) -> ReactorResult<()> {
        ConstPressureMoleReactor::update_state(self, y)
    }

    fn eval(&mut self, time: f64, lhs: &mut [f64], rhs: &mut [f64]) -> ReactorResult<()> {
        ConstPressureMoleReactor::eval(self, time, lhs, rhs)
    }

    fn jacobian(&mut self) -> ReactorResult<CsMat<f64>> {
        ConstPressureMoleReactor::jacobian(self)
    }

    fn component_name(&self, index: usize) -> ReactorResult<String> {
        ConstPressureMoleReactor::component_name(self, index)
    }

    fn component_index(&self, name: &str) -> Option<usize> {
        ConstPressureMoleReactor::component_index(self, name)
    }

    fn time(&self) -> f64 {
        ConstPressureMoleReactor::time(self)
    }
}
