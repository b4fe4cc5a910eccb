//! Simulation runner and result recording.

use rayon::prelude::*;
use tracing::{debug, info};
use zd_reactor::ReactorOde;

use crate::error::{SolverError, SolverResult};
use crate::integrator::BackwardEuler;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds)
    pub t_end: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    pub integrator: BackwardEuler,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1e-4,
            t_end: 0.1,
            max_steps: 100_000,
            record_every: 10,
            integrator: BackwardEuler::default(),
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SolverResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SolverError::InvalidArg {
                what: "dt must be positive".into(),
            });
        }
        if !self.t_end.is_finite() || self.t_end < 0.0 {
            return Err(SolverError::InvalidArg {
                what: "t_end must be non-negative".into(),
            });
        }
        if self.max_steps == 0 {
            return Err(SolverError::InvalidArg {
                what: "max_steps must be positive".into(),
            });
        }
        if self.record_every == 0 {
            return Err(SolverError::InvalidArg {
                what: "record_every must be positive".into(),
            });
        }
        Ok(())
    }
}

/// Record of simulation results.
#[derive(Clone, Debug, PartialEq)]
pub struct SimRecord {
    /// Component names, in state order
    pub names: Vec<String>,
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub y: Vec<Vec<f64>>,
}

impl SimRecord {
    /// Time series of one component.
    pub fn series(&self, name: &str) -> Option<Vec<f64>> {
        let i = self.names.iter().position(|n| n == name)?;
        Some(self.y.iter().map(|y| y[i]).collect())
    }

    pub fn last(&self) -> Option<&[f64]> {
        self.y.last().map(Vec::as_slice)
    }
}

/// Integrate a reactor from its current time to `opts.t_end` with backward Euler.
///
/// Initializes the reactor at t = 0 if it has not been initialized yet. The last
/// step is shortened to land on `t_end`.
pub fn run_sim<O: ReactorOde + ?Sized>(ode: &mut O, opts: &SimOptions) -> SolverResult<SimRecord> {
    opts.validate()?;
    if ode.neq() == 0 {
        ode.initialize(0.0)?;
    }
    let n = ode.neq();
    let names = (0..n)
        .map(|i| ode.component_name(i))
        .collect::<Result<Vec<_>, _>>()?;

    let mut t = ode.time();
    let mut y = vec![0.0; n];
    ode.get_state(&mut y)?;
    info!(neq = n, t0 = t, t_end = opts.t_end, dt = opts.dt, "simulation started");

    let mut t_record = vec![t];
    let mut y_record = vec![y.clone()];

    let mut step = 0;
    // tolerate round-off in the accumulated time
    let t_stop = opts.t_end - 1e-12 * opts.dt;
    while t < t_stop && step < opts.max_steps {
        let dt = opts.dt.min(opts.t_end - t);
        y = opts.integrator.step(ode, t, &y, dt)?;
        t += dt;
        step += 1;

        if step % opts.record_every == 0 {
            debug!(step, t, temperature = y[0], "recorded");
            t_record.push(t);
            y_record.push(y.clone());
        }
    }

    // Always record final state
    if step % opts.record_every != 0 {
        t_record.push(t);
        y_record.push(y);
    }
    info!(steps = step, t, "simulation finished");

    Ok(SimRecord {
        names,
        t: t_record,
        y: y_record,
    })
}

/// Integrate independent reactors in parallel. Each reactor owns its phase and
/// kinetics, so they can be advanced on separate threads.
pub fn run_batch<O: ReactorOde + Send>(
    odes: &mut [O],
    opts: &SimOptions,
) -> Vec<SolverResult<SimRecord>> {
    odes.par_iter_mut().map(|ode| run_sim(ode, opts)).collect()
}
