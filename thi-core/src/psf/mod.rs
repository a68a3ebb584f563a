mod beam;

pub use beam::BeamShape;

use getset::{CopyGetters, Getters};
use nalgebra::{DMatrix, DVector};

use crate::{
    common::{Freq, REFERENCE_FREQ},
    error::{check_freq, check_nonlinearity, check_positive, ParameterError},
    mode::ImagingMode,
};

/// Fractional bandwidth at which the axial envelope takes its nominal width.
pub const NOMINAL_BANDWIDTH: f64 = 0.6;

/// The option of [`Psf`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsfOption {
    /// Number of kernel samples per axis. Must be odd.
    pub size: usize,
    /// Lateral half extent in kernel units.
    pub lateral_extent: f64,
    /// Axial half extent in kernel units.
    pub axial_extent: f64,
    /// Frequency at which the nominal beam widths apply.
    pub reference_frequency: Freq,
    /// Fractional transmit bandwidth.
    pub fractional_bandwidth: f64,
}

impl Default for PsfOption {
    fn default() -> Self {
        Self {
            size: 41,
            lateral_extent: 6.0,
            axial_extent: 3.0,
            reference_frequency: REFERENCE_FREQ,
            fractional_bandwidth: NOMINAL_BANDWIDTH,
        }
    }
}

impl PsfOption {
    /// Checks the kernel size, the extents, the reference frequency and the bandwidth.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.size % 2 == 0 {
            return Err(ParameterError::KernelSizeInvalid(self.size));
        }
        check_positive(self.lateral_extent, ParameterError::ExtentInvalid)?;
        check_positive(self.axial_extent, ParameterError::ExtentInvalid)?;
        check_freq(self.reference_frequency.hz())?;
        check_positive(self.fractional_bandwidth, ParameterError::BandwidthInvalid)?;
        Ok(())
    }
}

#[inline]
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (x * core::f64::consts::PI).sin() / (x * core::f64::consts::PI)
    }
}

fn linspace(extent: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = 2. * extent / (n - 1).max(1) as f64;
    (0..n).map(move |i| -extent + step * i as f64)
}

/// Separable point-spread function of the imaging system.
///
/// The kernel is the outer product of an axial pulse envelope (rows)
/// and a lateral beam profile (columns).
/// Both factors are normalized so that the sum of absolute kernel values is 1.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct Psf {
    #[getset(get_copy = "pub")]
    /// Mode the kernel was synthesized for.
    mode: ImagingMode,
    #[getset(get_copy = "pub")]
    /// Beam shaping parameters.
    shape: BeamShape,
    #[getset(get = "pub")]
    /// Lateral beam profile.
    lateral: DVector<f64>,
    #[getset(get = "pub")]
    /// Axial pulse envelope.
    axial: DVector<f64>,
    #[getset(get_copy = "pub")]
    /// Distance between lateral samples in kernel units.
    lateral_spacing: f64,
}

impl Psf {
    /// Synthesizes the kernel for `mode` at `frequency` with the given nonlinearity coefficient.
    pub fn new(
        mode: ImagingMode,
        frequency: Freq,
        nonlinearity: f64,
        option: &PsfOption,
    ) -> Result<Self, ParameterError> {
        check_freq(frequency.hz())?;
        let nonlinearity = check_nonlinearity(nonlinearity)?;
        option.validate()?;
        let bandwidth = option.fractional_bandwidth;

        let scale = option.reference_frequency / frequency;
        let shape = BeamShape::new(mode, scale, nonlinearity);

        let lateral = normalize(DVector::from_iterator(
            option.size,
            linspace(option.lateral_extent, option.size).map(|x| shape.profile(x.abs())),
        ));

        let envelope_width =
            0.8 * scale * (1. + 0.3 * nonlinearity) * NOMINAL_BANDWIDTH / bandwidth;
        let axial = normalize(DVector::from_iterator(
            option.size,
            linspace(option.axial_extent, option.size).map(|z| {
                (-z * z / envelope_width).exp() * (2. * core::f64::consts::PI * z).cos()
            }),
        ));

        tracing::trace!(
            "PSF synthesized: mode = {}, scale = {}, shape = {:?}",
            mode,
            scale,
            shape
        );

        Ok(Self {
            mode,
            shape,
            lateral,
            axial,
            lateral_spacing: 2. * option.lateral_extent / (option.size - 1).max(1) as f64,
        })
    }

    /// Number of kernel samples per axis.
    #[must_use]
    pub fn size(&self) -> usize {
        self.lateral.len()
    }

    /// The full 2-D kernel. Rows are axial, columns lateral.
    #[must_use]
    pub fn kernel(&self) -> DMatrix<f64> {
        &self.axial * self.lateral.transpose()
    }

    /// Analytic full width at half maximum of the main lobe in kernel units.
    #[must_use]
    pub fn main_lobe_fwhm(&self) -> f64 {
        self.shape.main_lobe_fwhm()
    }

    /// Analytic full width at half maximum of the main lobe in lateral kernel samples.
    #[must_use]
    pub fn main_lobe_fwhm_samples(&self) -> f64 {
        self.main_lobe_fwhm() / self.lateral_spacing
    }
}

fn normalize(v: DVector<f64>) -> DVector<f64> {
    let sum = v.iter().map(|x| x.abs()).sum::<f64>();
    if sum > 0. {
        v / sum
    } else {
        v
    }
}
