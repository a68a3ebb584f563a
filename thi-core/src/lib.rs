#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::unescaped_backticks)]

//! Core types and signal primitives for tissue-harmonic imaging simulation.
//!
//! This crate holds everything the imaging engine is built from: physical units,
//! the sampling [`Grid`](grid::Grid), the synthetic [`Phantom`](phantom::Phantom),
//! the [`Psf`](psf::Psf) synthesizer and the low-level signal operations
//! (convolution, log compression, sub-pixel half-maximum search).

/// Common constants, units and random sources.
pub mod common;
/// Parameter errors.
pub mod error;
/// Imaging plane sampling.
pub mod grid;
/// Propagation medium.
pub mod medium;
/// Imaging modes.
pub mod mode;
/// Synthetic tissue phantom.
pub mod phantom;
/// Point-spread-function synthesis.
pub mod psf;
/// Signal processing primitives.
pub mod signal;

pub use error::ParameterError;
