//! Physical constants in kmol-based SI units.

/// Universal gas constant [J/(kmol·K)].
pub const GAS_CONSTANT: f64 = 8_314.462_618;

/// One standard atmosphere [Pa].
pub const ONE_ATM: f64 = 101_325.0;

/// Reference temperature for standard-state properties [K].
pub const T_REF: f64 = 298.15;
