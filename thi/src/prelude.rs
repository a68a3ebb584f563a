//! Commonly used types.

pub use crate::{
    error::SimulatorError,
    imaging::{DisplayImage, ForwardModel, ImagingOption},
    metrics::{ImageQuality, Improvement, Metrics, MetricsOption},
    profile::DepthProfiles,
    simulator::{Simulator, SimulatorOption},
};

pub use thi_core::{
    common::{cm, kHz, mm, Freq, Hz, MHz},
    grid::{Grid, GridOption},
    medium::{Habitus, Medium},
    mode::ImagingMode,
    phantom::{Lesion, Phantom, PhantomOption},
    psf::{Psf, PsfOption},
    ParameterError,
};
