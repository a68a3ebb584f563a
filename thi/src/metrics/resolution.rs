use thi_core::{
    common::mm,
    grid::Grid,
    signal::{argmax, db_to_linear, HalfMaxWidth},
};

use super::MetricsOption;
use crate::imaging::DisplayImage;

/// Lateral resolution of the point target at the configured depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralResolution {
    /// Row in which the target response peaks.
    pub row: usize,
    /// Half-maximum crossings in that row.
    pub half_max: HalfMaxWidth,
    /// Full width at half maximum \[m\].
    pub fwhm: f64,
    /// Strongest response outside the main lobe \[dB\].
    pub side_lobe: f64,
}

impl LateralResolution {
    /// Measures the point target nearest to `option.resolution_depth` in `image`.
    #[must_use]
    pub fn measure(grid: &Grid, image: &DisplayImage, option: &MetricsOption) -> Self {
        let data = image.data();
        let n = grid.size();
        let center = grid.center_column();

        let nominal =
            ((option.resolution_depth / grid.depth() * n as f64).max(0.) as usize).min(n - 1);
        let window = nominal.saturating_sub(option.search_half_window)
            ..(nominal + option.search_half_window).min(n);
        let row = window.start + argmax(window.clone().map(|i| data[(i, center)]));

        let profile: Vec<f64> = data.row(row).iter().map(|&v| db_to_linear(v)).collect();
        let half_max = HalfMaxWidth::measure(&profile);

        let excluded = center.saturating_sub(option.side_lobe_exclusion_half_width)
            ..(center + option.side_lobe_exclusion_half_width).min(n);
        let side_lobe = data
            .row(row)
            .iter()
            .enumerate()
            .filter(|(j, _)| !excluded.contains(j))
            .map(|(_, &v)| v)
            .fold(f64::NEG_INFINITY, f64::max);
        let side_lobe = if side_lobe < option.side_lobe_threshold {
            option.side_lobe_floor
        } else {
            side_lobe
        };

        tracing::trace!(
            "{} resolution: row = {}, crossings = ({}, {}), side lobe = {} dB",
            image.mode(),
            row,
            half_max.left,
            half_max.right,
            side_lobe
        );

        Self {
            row,
            half_max,
            fwhm: half_max.width() * grid.dx(),
            side_lobe,
        }
    }

    /// Full width at half maximum \[mm\].
    #[must_use]
    pub fn fwhm_mm(&self) -> f64 {
        self.fwhm / mm
    }
}
