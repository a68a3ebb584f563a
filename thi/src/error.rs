use thi_core::{mode::ImagingMode, ParameterError};
use thiserror::Error;

/// An error produced by the [`Simulator`](crate::Simulator).
#[derive(Error, Debug, PartialEq, Clone)]
#[non_exhaustive]
pub enum SimulatorError {
    /// No phantom has been created yet.
    #[error("Phantom has not been created. Call `create_phantom` first")]
    PhantomNotCreated,
    /// An image required for the measurement has not been formed yet.
    #[error("The {0} image is not available. Call `run_imaging` for it first")]
    ImageNotAvailable(ImagingMode),
    /// A parameter is invalid.
    #[error("{0}")]
    Parameter(#[from] ParameterError),
}
