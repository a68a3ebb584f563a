#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::unescaped_backticks)]

//! Tissue-harmonic versus fundamental ultrasound imaging simulator.
//!
//! [`Simulator`] generates a speckle phantom with anechoic lesions and wire targets, forms
//! fundamental and harmonic B-mode images of it, and measures lateral resolution, side-lobe
//! level, CNR and SNR of both. The stateless building blocks ([`imaging::ForwardModel`],
//! [`metrics::Metrics::measure`], [`profile::DepthProfiles::new`]) are public as well.
//!
//! ```
//! use thi::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut sim = Simulator::new(SimulatorOption::default())?;
//! sim.create_phantom()?;
//! sim.run_imaging(ImagingMode::Fundamental, 3.5 * MHz, 0.35, false)?;
//! sim.run_imaging(ImagingMode::Harmonic, 3.5 * MHz, 0.35, false)?;
//! let metrics = sim.get_metrics()?;
//! assert!(metrics.harmonic.fwhm_mm <= metrics.fundamental.fwhm_mm);
//! # Ok(())
//! # }
//! ```

/// Errors of the simulator.
pub mod error;
/// Image formation.
pub mod imaging;
/// Image quality measurement.
pub mod metrics;
pub mod prelude;
/// Closed-form depth profiles.
pub mod profile;
/// Stateful simulator front end.
pub mod simulator;

pub use thi_core;

pub use error::SimulatorError;
pub use simulator::{Simulator, SimulatorOption};
