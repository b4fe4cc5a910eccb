//! External heat exchange through reactor walls.

use std::fmt;

use zd_core::ensure_finite;
use zd_core::units::{Area, Power, Temperature};

use crate::error::{ReactorError, ReactorResult};

/// A heat path into the reactor. Positive values heat the gas.
pub trait Wall: Send + Sync + fmt::Debug {
    /// Heat rate [W] into the reactor at `time` with gas temperature `t` [K].
    fn heat_rate(&self, time: f64, t: f64) -> f64;
}

/// Constant imposed heat rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedHeatRate {
    q: f64,
}

impl FixedHeatRate {
    pub fn new(q: Power) -> ReactorResult<Self> {
        let q = ensure_finite(q.value, "wall heat rate")?;
        Ok(Self { q })
    }
}

impl Wall for FixedHeatRate {
    fn heat_rate(&self, _time: f64, _t: f64) -> f64 {
        self.q
    }
}

/// Convective exchange with surroundings at a fixed temperature:
/// Q = U·A·(T_ambient − T).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatTransferWall {
    /// Heat transfer coefficient [W/(m²·K)]
    u: f64,
    area: f64,
    t_ambient: f64,
}

impl HeatTransferWall {
    pub fn new(u: f64, area: Area, t_ambient: Temperature) -> ReactorResult<Self> {
        let u = ensure_finite(u, "heat transfer coefficient")?;
        if u < 0.0 {
            return Err(ReactorError::InvalidArg {
                what: format!("heat transfer coefficient must be non-negative, got {u}"),
            });
        }
        if ensure_finite(area.value, "wall area")? < 0.0 {
            return Err(ReactorError::InvalidArg {
                what: "wall area must be non-negative".into(),
            });
        }
        if ensure_finite(t_ambient.value, "ambient temperature")? <= 0.0 {
            return Err(ReactorError::InvalidArg {
                what: "ambient temperature must be positive".into(),
            });
        }
        Ok(Self {
            u,
            area: area.value,
            t_ambient: t_ambient.value,
        })
    }
}

impl Wall for HeatTransferWall {
    fn heat_rate(&self, _time: f64, t: f64) -> f64 {
        self.u * self.area * (self.t_ambient - t)
    }
}
