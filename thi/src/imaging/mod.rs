mod gain;

pub use gain::{leakage_fraction, PULSE_INVERSION_GAIN};

use gain::ModeGain;

use getset::{CopyGetters, Getters};
use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::StandardNormal;

use thi_core::{
    common::{seeded_rng, Freq},
    error::{check_nonlinearity, check_positive},
    grid::Grid,
    medium::Medium,
    mode::ImagingMode,
    phantom::Phantom,
    psf::{Psf, PsfOption},
    signal::{convolve_separable_same, db_to_linear, log_compress},
    ParameterError,
};

/// The option of [`ForwardModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImagingOption {
    /// Receive gain applied after beamforming.
    pub transmit_gain: f64,
    /// Standard deviation of the additive electronic noise before mode scaling.
    pub noise_std: f64,
    /// Seed of the noise realization. `None` draws fresh noise every time.
    pub noise_seed: Option<u64>,
    /// Displayed dynamic range \[dB\].
    pub dynamic_range: f64,
    /// Kernel synthesis option.
    pub psf: PsfOption,
}

impl Default for ImagingOption {
    fn default() -> Self {
        Self {
            transmit_gain: 250.,
            noise_std: 0.6,
            noise_seed: Some(999),
            dynamic_range: 60.,
            psf: PsfOption::default(),
        }
    }
}

impl ImagingOption {
    /// Checks the noise level, the dynamic range and the kernel option.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.noise_std.is_finite() && self.noise_std >= 0.) {
            return Err(ParameterError::NoiseStdInvalid(self.noise_std));
        }
        check_positive(self.dynamic_range, ParameterError::DynamicRangeInvalid)?;
        self.psf.validate()
    }
}

/// Log-compressed B-mode image in \[dB\], within `[-dynamic_range, 0]`.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct DisplayImage {
    #[getset(get_copy = "pub")]
    /// Mode the image was formed in.
    mode: ImagingMode,
    #[getset(get_copy = "pub")]
    /// Dynamic range the image was compressed to.
    dynamic_range: f64,
    #[getset(get = "pub")]
    /// Pixel values in \[dB\]. Rows are depth, columns lateral position.
    data: DMatrix<f64>,
}

impl DisplayImage {
    /// Wraps precomputed decibel data.
    ///
    /// Values are clamped into `[-dynamic_range, 0]`.
    #[must_use]
    pub fn new(mode: ImagingMode, data: DMatrix<f64>, dynamic_range: f64) -> Self {
        Self {
            mode,
            dynamic_range,
            data: data.map(|v| v.clamp(-dynamic_range, 0.)),
        }
    }

    /// The image in linear amplitude relative to its maximum.
    #[must_use]
    pub fn linear(&self) -> DMatrix<f64> {
        self.data.map(db_to_linear)
    }
}

/// Image formation chain of a linear-array scanner.
///
/// Convolves the phantom with the mode PSF, applies the receive gains and the habitus loss,
/// adds noise, detects the envelope and log-compresses it.
#[derive(Debug, Clone, Copy)]
pub struct ForwardModel<'a> {
    grid: &'a Grid,
    medium: &'a Medium,
    option: &'a ImagingOption,
}

impl<'a> ForwardModel<'a> {
    /// Creates a new [`ForwardModel`].
    #[must_use]
    pub const fn new(grid: &'a Grid, medium: &'a Medium, option: &'a ImagingOption) -> Self {
        Self {
            grid,
            medium,
            option,
        }
    }

    /// Forms a display image of `phantom` in `mode`.
    ///
    /// `pulse_inversion` only affects the harmonic mode.
    pub fn image(
        &self,
        phantom: &Phantom,
        mode: ImagingMode,
        frequency: Freq,
        nonlinearity: f64,
        pulse_inversion: bool,
    ) -> Result<DisplayImage, ParameterError> {
        let envelope = self.envelope(phantom, mode, frequency, nonlinearity, pulse_inversion)?;
        Ok(DisplayImage {
            mode,
            dynamic_range: self.option.dynamic_range,
            data: log_compress(&envelope, self.option.dynamic_range),
        })
    }

    /// Detected envelope before log compression.
    #[tracing::instrument(level = "debug", skip(self, phantom))]
    pub fn envelope(
        &self,
        phantom: &Phantom,
        mode: ImagingMode,
        frequency: Freq,
        nonlinearity: f64,
        pulse_inversion: bool,
    ) -> Result<DMatrix<f64>, ParameterError> {
        self.validate(phantom)?;
        let nonlinearity = check_nonlinearity(nonlinearity)?;

        let n = self.grid.size();
        let psf = Psf::new(mode, frequency, nonlinearity, &self.option.psf)?;
        let gain = ModeGain::new(mode, nonlinearity, self.medium.habitus);

        let row_gain = self.row_scale(mode, frequency, |z| {
            gain.depth_gain(z / self.grid.depth()) * gain.amplitude
        });
        let rf = convolve_separable_same(phantom.reflectivity(), psf.axial(), psf.lateral());

        let noise_std = self.option.noise_std * gain.noise_factor;
        let mut rng = seeded_rng(self.option.noise_seed);
        let noise = DMatrix::from_fn(n, n, |_, _| rng.sample::<f64, _>(StandardNormal));

        let mut envelope = DMatrix::from_fn(n, n, |i, j| {
            (rf[(i, j)] * row_gain[i] + noise_std * noise[(i, j)]).abs()
        });

        if mode == ImagingMode::Harmonic {
            if pulse_inversion {
                envelope *= PULSE_INVERSION_GAIN;
            } else {
                let fundamental = Psf::new(
                    ImagingMode::Fundamental,
                    frequency,
                    nonlinearity,
                    &self.option.psf,
                )?;
                let leak = convolve_separable_same(
                    phantom.reflectivity(),
                    fundamental.axial(),
                    fundamental.lateral(),
                );
                let leak_gain = self.row_scale(ImagingMode::Fundamental, frequency, |_| {
                    leakage_fraction(nonlinearity)
                });
                envelope
                    .iter_mut()
                    .zip(leak.iter())
                    .enumerate()
                    .for_each(|(k, (e, l))| *e += (l * leak_gain[k % n]).abs());
            }
        }

        tracing::debug!(
            "{} envelope formed: max = {}",
            mode,
            envelope.iter().copied().fold(0., f64::max)
        );

        Ok(envelope)
    }

    fn validate(&self, phantom: &Phantom) -> Result<(), ParameterError> {
        let n = self.grid.size();
        let (rows, cols) = phantom.reflectivity().shape();
        if rows != n || cols != n {
            return Err(ParameterError::ShapeMismatch(rows, cols, n));
        }
        self.option.validate()
    }

    // Receive gain times habitus loss for every depth row.
    fn row_scale(
        &self,
        mode: ImagingMode,
        frequency: Freq,
        f: impl Fn(f64) -> f64,
    ) -> DVector<f64> {
        DVector::from_iterator(
            self.grid.size(),
            self.grid.z().iter().map(|&z| {
                self.option.transmit_gain * f(z) * self.medium.excess_loss(mode, frequency, z)
            }),
        )
    }
}
