mod contrast;
mod resolution;

pub use contrast::{Contrast, ContrastRegions, RegionStats};
pub use resolution::LateralResolution;

use thi_core::{
    common::mm, error::check_positive, grid::Grid, phantom::Phantom, ParameterError,
};

use crate::imaging::DisplayImage;

/// The option of [`Metrics`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsOption {
    /// Nominal depth of the point target used for resolution \[m\].
    pub resolution_depth: f64,
    /// Rows searched above and below the nominal depth for the target peak.
    pub search_half_window: usize,
    /// Columns on each side of the center excluded from the side-lobe search.
    pub side_lobe_exclusion_half_width: usize,
    /// Side lobes below this level \[dB\] are reported as
    /// [`side_lobe_floor`](Self::side_lobe_floor).
    pub side_lobe_threshold: f64,
    /// Reported level of undetectable side lobes \[dB\].
    pub side_lobe_floor: f64,
    /// Border excluded from the background region in pixels.
    pub background_margin: usize,
    /// Columns on each side of the center excluded from the background region.
    pub center_strip_half_width: usize,
}

impl Default for MetricsOption {
    fn default() -> Self {
        Self {
            resolution_depth: 25. * mm,
            search_half_window: 15,
            side_lobe_exclusion_half_width: 12,
            side_lobe_threshold: -55.,
            side_lobe_floor: -60.,
            background_margin: 30,
            center_strip_half_width: 15,
        }
    }
}

impl MetricsOption {
    /// Checks the resolution depth.
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_positive(self.resolution_depth, ParameterError::ExtentInvalid)?;
        Ok(())
    }
}

/// Quality figures of one display image.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageQuality {
    /// Lateral full width at half maximum of the point target \[mm\].
    pub fwhm_mm: f64,
    /// Side-lobe level in the target row \[dB\].
    pub side_lobe_db: f64,
    /// Contrast-to-noise ratio of the first lesion.
    pub cnr: f64,
    /// Signal-to-noise ratio of the background.
    pub snr: f64,
}

impl ImageQuality {
    /// Measures `image` against precomputed contrast regions.
    #[must_use]
    pub fn measure(
        grid: &Grid,
        regions: &ContrastRegions,
        image: &DisplayImage,
        option: &MetricsOption,
    ) -> Self {
        let resolution = LateralResolution::measure(grid, image, option);
        let contrast = Contrast::measure(regions, image.data());
        Self {
            fwhm_mm: resolution.fwhm_mm(),
            side_lobe_db: resolution.side_lobe,
            cnr: contrast.cnr,
            snr: contrast.snr,
        }
    }
}

/// Relative gain of harmonic over fundamental imaging.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Improvement {
    /// FWHM reduction \[%\].
    pub resolution_percent: f64,
    /// CNR gain \[%\].
    pub cnr_percent: f64,
}

/// Side-by-side quality figures of the two modes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Fundamental image quality.
    pub fundamental: ImageQuality,
    /// Harmonic image quality.
    pub harmonic: ImageQuality,
}

impl Metrics {
    /// Measures both images of `phantom`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn measure(
        grid: &Grid,
        phantom: &Phantom,
        fundamental: &DisplayImage,
        harmonic: &DisplayImage,
        option: &MetricsOption,
    ) -> Self {
        let regions = ContrastRegions::new(grid, phantom, option);
        let metrics = Self {
            fundamental: ImageQuality::measure(grid, &regions, fundamental, option),
            harmonic: ImageQuality::measure(grid, &regions, harmonic, option),
        };
        tracing::debug!("{:?}", metrics);
        metrics
    }

    /// Percentage improvement of the harmonic image.
    ///
    /// Each figure is 0 when the fundamental reference is not positive.
    #[must_use]
    pub fn improvement(&self) -> Improvement {
        let percent = |gain: f64, reference: f64| {
            if reference > 0. {
                gain / reference * 100.
            } else {
                0.
            }
        };
        Improvement {
            resolution_percent: percent(
                self.fundamental.fwhm_mm - self.harmonic.fwhm_mm,
                self.fundamental.fwhm_mm,
            ),
            cnr_percent: percent(self.harmonic.cnr - self.fundamental.cnr, self.fundamental.cnr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quality(fwhm_mm: f64, cnr: f64) -> ImageQuality {
        ImageQuality {
            fwhm_mm,
            side_lobe_db: -60.,
            cnr,
            snr: 1.,
        }
    }

    #[rstest::rstest]
    #[case(Ok(()), 25. * mm)]
    #[case(Err(ParameterError::ExtentInvalid(0.)), 0.)]
    #[case(Err(ParameterError::ExtentInvalid(-1.)), -1.)]
    fn validate(#[case] expect: Result<(), ParameterError>, #[case] resolution_depth: f64) {
        assert_eq!(
            expect,
            MetricsOption {
                resolution_depth,
                ..Default::default()
            }
            .validate()
        );
    }

    #[rstest::rstest]
    #[case(
        Improvement { resolution_percent: 25., cnr_percent: 50. },
        quality(0.8, 1.0),
        quality(0.6, 1.5)
    )]
    #[case(
        Improvement { resolution_percent: -50., cnr_percent: -20. },
        quality(0.4, 1.0),
        quality(0.6, 0.8)
    )]
    #[case(
        Improvement { resolution_percent: 0., cnr_percent: 0. },
        quality(0., 0.),
        quality(0.6, 0.8)
    )]
    fn improvement(
        #[case] expect: Improvement,
        #[case] fundamental: ImageQuality,
        #[case] harmonic: ImageQuality,
    ) {
        let imp = Metrics {
            fundamental,
            harmonic,
        }
        .improvement();
        approx::assert_abs_diff_eq!(
            expect.resolution_percent,
            imp.resolution_percent,
            epsilon = 1e-9
        );
        approx::assert_abs_diff_eq!(expect.cnr_percent, imp.cnr_percent, epsilon = 1e-9);
    }
}
