mod freq;
mod rng;

pub use freq::*;
pub use rng::seeded_rng;

/// meter
pub const METER: f64 = 1.0;

/// millimeter
pub const MILLIMETER: f64 = METER / 1000.0;

/// centimeter
pub const CENTIMETER: f64 = METER / 100.0;

/// \[㎜\]
#[allow(non_upper_case_globals)]
pub const mm: f64 = MILLIMETER;

/// \[㎝\]
#[allow(non_upper_case_globals)]
pub const cm: f64 = CENTIMETER;

/// Conversion factor from neper to decibel (20 / ln 10).
pub const NEPER_TO_DB: f64 = 8.686;

/// The reference transmit frequency at which the beam widths are tabulated.
pub const REFERENCE_FREQ: Freq = Freq { freq: 3.5e6 };

/// Small value substituted for degenerate denominators.
pub const EPSILON: f64 = 1e-9;
