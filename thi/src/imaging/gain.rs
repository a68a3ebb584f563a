use thi_core::{medium::Habitus, mode::ImagingMode};

/// Gain applied to the harmonic envelope when pulse inversion cancels the fundamental.
///
/// The display is normalized to its own maximum, so this gain cancels in [`DisplayImage`].
/// Only the removed fundamental leakage is visible there; the gain shows in the envelope.
///
/// [`DisplayImage`]: super::DisplayImage
pub const PULSE_INVERSION_GAIN: f64 = core::f64::consts::SQRT_2;

/// Fraction of the fundamental echo that leaks into the harmonic band without pulse inversion.
#[must_use]
pub fn leakage_fraction(nonlinearity: f64) -> f64 {
    0.25 * (1. - nonlinearity)
}

/// Per-mode receive chain gains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ModeGain {
    depth_slope: f64,
    pub(crate) amplitude: f64,
    pub(crate) noise_factor: f64,
}

impl ModeGain {
    pub(crate) fn new(mode: ImagingMode, nonlinearity: f64, habitus: Habitus) -> Self {
        match mode {
            ImagingMode::Fundamental => Self {
                depth_slope: 0.2 * nonlinearity,
                amplitude: 1.0,
                noise_factor: habitus.clutter_factor(),
            },
            ImagingMode::Harmonic => Self {
                depth_slope: 2.5 * nonlinearity,
                amplitude: 0.8 + 4.0 * nonlinearity,
                noise_factor: 0.4,
            },
        }
    }

    /// Gain at normalized depth `z / depth` in `[0, 1]`.
    pub(crate) fn depth_gain(&self, normalized_depth: f64) -> f64 {
        1. + self.depth_slope * normalized_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case(1.0, 1.07, 1.0, ImagingMode::Fundamental, Habitus::Normal)]
    #[case(1.0, 1.07, 1.5, ImagingMode::Fundamental, Habitus::Obese)]
    #[case(2.2, 1.875, 0.4, ImagingMode::Harmonic, Habitus::Normal)]
    #[case(2.2, 1.875, 0.4, ImagingMode::Harmonic, Habitus::Obese)]
    fn table(
        #[case] amplitude: f64,
        #[case] gain_at_bottom: f64,
        #[case] noise_factor: f64,
        #[case] mode: ImagingMode,
        #[case] habitus: Habitus,
    ) {
        let gain = ModeGain::new(mode, 0.35, habitus);
        approx::assert_abs_diff_eq!(amplitude, gain.amplitude, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(noise_factor, gain.noise_factor, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(1.0, gain.depth_gain(0.), epsilon = 1e-12);
        approx::assert_abs_diff_eq!(gain_at_bottom, gain.depth_gain(1.), epsilon = 1e-12);
    }

    #[rstest::rstest]
    #[case(0.25, 0.)]
    #[case(0.1625, 0.35)]
    #[case(0., 1.)]
    fn leakage(#[case] expect: f64, #[case] nonlinearity: f64) {
        approx::assert_abs_diff_eq!(expect, leakage_fraction(nonlinearity), epsilon = 1e-12);
    }
}
