use getset::Getters;
use nalgebra::DVector;

use thi_core::{
    common::{Freq, CENTIMETER, EPSILON, NEPER_TO_DB},
    error::{check_freq, check_nonlinearity, check_positive},
    medium::Medium,
    ParameterError,
};

/// Number of depth samples of [`DepthProfiles`].
pub const NUM_PROFILE_SAMPLES: usize = 200;

/// Closed-form echo amplitude versus depth for both modes.
///
/// The fundamental decays with two-way attenuation. The harmonic builds up with
/// propagation distance before attenuation at the doubled frequency takes over.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct DepthProfiles {
    /// Depth of each sample \[m\].
    depth: DVector<f64>,
    /// Normalized fundamental amplitude.
    fundamental: DVector<f64>,
    /// Normalized harmonic amplitude.
    harmonic: DVector<f64>,
}

impl DepthProfiles {
    /// Samples both profiles from the surface down to `max_depth` \[m\].
    pub fn new(
        max_depth: f64,
        medium: &Medium,
        frequency: Freq,
        nonlinearity: f64,
    ) -> Result<Self, ParameterError> {
        let max_depth = check_positive(max_depth, ParameterError::ExtentInvalid)?;
        check_freq(frequency.hz())?;
        let nonlinearity = check_nonlinearity(nonlinearity)?;

        let alpha = medium.total_attenuation();
        let f = frequency.mhz();

        let depth = DVector::from_fn(NUM_PROFILE_SAMPLES, |i, _| {
            max_depth * i as f64 / (NUM_PROFILE_SAMPLES - 1) as f64
        });

        let fundamental = depth.map(|z| (-2. * alpha * f * z / CENTIMETER / NEPER_TO_DB).exp());
        let fundamental = &fundamental / fundamental.max().max(EPSILON);

        let harmonic = depth.map(|z| {
            let z = z / CENTIMETER;
            nonlinearity
                * f
                * f
                * z
                * (-2. * alpha * (2. * f) * (1. + nonlinearity) * z / NEPER_TO_DB).exp()
        });
        let harmonic = &harmonic / (harmonic.max() + EPSILON) * (1. - 0.6 * nonlinearity);

        Ok(Self {
            depth,
            fundamental,
            harmonic,
        })
    }

    /// Depth \[m\] at which the harmonic amplitude peaks.
    #[must_use]
    pub fn harmonic_peak_depth(&self) -> f64 {
        self.depth[self.harmonic.imax()]
    }
}
