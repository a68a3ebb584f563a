use nalgebra::DMatrix;

use thi_core::{
    common::EPSILON,
    grid::Grid,
    phantom::{background_mask, Phantom},
    signal::db_to_linear,
};

use super::MetricsOption;

/// Mean and population variance of a pixel region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegionStats {
    /// Number of pixels.
    pub count: usize,
    /// Mean value.
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
}

impl RegionStats {
    /// Statistics of `values`. An empty region yields all zeros.
    #[must_use]
    pub fn of(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self::default();
        }
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64;
        Self {
            count,
            mean,
            variance,
        }
    }

    /// Population standard deviation.
    #[must_use]
    pub fn std(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Lesion and background masks shared by every contrast measurement on one phantom.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastRegions {
    lesion: DMatrix<bool>,
    background: DMatrix<bool>,
}

impl ContrastRegions {
    /// The inner region of the first lesion against the lesion-free background.
    #[must_use]
    pub fn new(grid: &Grid, phantom: &Phantom, option: &MetricsOption) -> Self {
        let n = grid.size();
        let lesion = phantom
            .inner_masks()
            .first()
            .cloned()
            .unwrap_or_else(|| DMatrix::from_element(n, n, false));
        let background = background_mask(
            grid,
            phantom.lesions(),
            option.background_margin,
            option.center_strip_half_width,
        );
        Self::from_masks(lesion, background)
    }

    /// Regions from explicit masks.
    #[must_use]
    pub const fn from_masks(lesion: DMatrix<bool>, background: DMatrix<bool>) -> Self {
        Self { lesion, background }
    }

    fn stats(mask: &DMatrix<bool>, image: &DMatrix<f64>) -> RegionStats {
        let values: Vec<_> = image
            .iter()
            .zip(mask.iter())
            .filter(|(_, &m)| m)
            .map(|(&v, _)| v)
            .collect();
        RegionStats::of(&values)
    }
}

/// Contrast-to-noise and signal-to-noise ratio of one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contrast {
    /// Lesion statistics.
    pub lesion: RegionStats,
    /// Background statistics.
    pub background: RegionStats,
    /// `|mean_b - mean_l| / sqrt(var_b + var_l)`.
    pub cnr: f64,
    /// `mean_b / std_b`.
    pub snr: f64,
}

impl Contrast {
    /// Measures a log-compressed image \[dB\].
    #[must_use]
    pub fn measure(regions: &ContrastRegions, image_db: &DMatrix<f64>) -> Self {
        Self::measure_linear(regions, &image_db.map(db_to_linear))
    }

    /// Measures a linear-amplitude image.
    #[must_use]
    pub fn measure_linear(regions: &ContrastRegions, image: &DMatrix<f64>) -> Self {
        let lesion = ContrastRegions::stats(&regions.lesion, image);
        let background = ContrastRegions::stats(&regions.background, image);
        if lesion.count == 0 || background.count == 0 {
            tracing::warn!(
                "Contrast region is empty (lesion = {} px, background = {} px).",
                lesion.count,
                background.count
            );
            return Self {
                lesion,
                background,
                cnr: 0.,
                snr: 0.,
            };
        }
        Self {
            lesion,
            background,
            cnr: (background.mean - lesion.mean).abs()
                / ((background.variance + lesion.variance).sqrt() + EPSILON),
            snr: background.mean / (background.std() + EPSILON),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use thi_core::{
        common::mm,
        grid::GridOption,
        phantom::{Lesion, PhantomOption},
    };

    #[rstest::rstest]
    #[case(RegionStats { count: 0, mean: 0., variance: 0. }, vec![])]
    #[case(RegionStats { count: 1, mean: 2., variance: 0. }, vec![2.])]
    #[case(RegionStats { count: 4, mean: 2.5, variance: 1.25 }, vec![1., 2., 3., 4.])]
    fn region_stats(#[case] expect: RegionStats, #[case] values: Vec<f64>) {
        let stats = RegionStats::of(&values);
        assert_eq!(expect.count, stats.count);
        approx::assert_abs_diff_eq!(expect.mean, stats.mean, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(expect.variance, stats.variance, epsilon = 1e-12);
    }

    fn checkerboard_regions(n: usize) -> ContrastRegions {
        ContrastRegions::from_masks(
            DMatrix::from_fn(n, n, |i, j| i < n / 2 && j < n / 2),
            DMatrix::from_fn(n, n, |i, j| i >= n / 2 || j >= n / 2),
        )
    }

    #[rstest::rstest]
    #[case(1.0, 0.1)]
    #[case(0.5, 0.2)]
    #[case(3.0, 0.5)]
    fn closed_form(#[case] level: f64, #[case] spread: f64) {
        // Lesion is zero, background alternates level +- spread.
        let regions = checkerboard_regions(16);
        let image = DMatrix::from_fn(16, 16, |i, j| {
            if i < 8 && j < 8 {
                0.
            } else if (i + j) % 2 == 0 {
                level + spread
            } else {
                level - spread
            }
        });
        let c = Contrast::measure_linear(&regions, &image);
        approx::assert_abs_diff_eq!(0.0, c.lesion.mean);
        approx::assert_abs_diff_eq!(level, c.background.mean, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(spread * spread, c.background.variance, epsilon = 1e-12);
        approx::assert_relative_eq!(level / (spread + EPSILON), c.cnr, max_relative = 1e-9);
        approx::assert_relative_eq!(level / (spread + EPSILON), c.snr, max_relative = 1e-9);
    }

    #[test]
    fn uniform_regions_use_epsilon() {
        let regions = checkerboard_regions(8);
        let image = DMatrix::from_fn(8, 8, |i, j| if i < 4 && j < 4 { 0.25 } else { 1. });
        let c = Contrast::measure_linear(&regions, &image);
        approx::assert_relative_eq!(0.75 / EPSILON, c.cnr, max_relative = 1e-9);
        approx::assert_relative_eq!(1. / EPSILON, c.snr, max_relative = 1e-9);
    }

    #[test]
    fn decibel_input_is_linearized() {
        let regions = checkerboard_regions(8);
        let db = DMatrix::from_fn(8, 8, |i, j| if i < 4 && j < 4 { -60. } else { 0. });
        let c = Contrast::measure(&regions, &db);
        approx::assert_abs_diff_eq!(1e-3, c.lesion.mean, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(1.0, c.background.mean, epsilon = 1e-12);
    }

    #[test]
    fn empty_region_is_zero() -> anyhow::Result<()> {
        let grid = Grid::new(&GridOption {
            size: 16,
            ..Default::default()
        })?;
        let phantom = Phantom::from_reflectivity(&grid, DMatrix::from_element(16, 16, 1.), vec![])?;
        let regions = ContrastRegions::new(&grid, &phantom, &MetricsOption::default());
        let c = Contrast::measure(&regions, &DMatrix::zeros(16, 16));
        assert_eq!(0, c.lesion.count);
        approx::assert_abs_diff_eq!(0.0, c.cnr);
        approx::assert_abs_diff_eq!(0.0, c.snr);
        Ok(())
    }

    #[test]
    fn background_excludes_lesions_and_center() -> anyhow::Result<()> {
        let grid = Grid::new(&GridOption::default())?;
        let phantom = Phantom::new(&grid, &PhantomOption::default())?;
        let option = MetricsOption::default();
        let regions = ContrastRegions::new(&grid, &phantom, &option);
        assert!(regions.lesion.iter().any(|&m| m));
        assert!(!regions
            .lesion
            .iter()
            .zip(regions.background.iter())
            .any(|(&l, &b)| l && b));
        let center = grid.center_column();
        assert!((0..grid.size()).all(|i| !regions.background[(i, center)]));
        let lesion = Lesion::new(0., 30. * mm, 6. * mm).mask(&grid);
        assert!(!lesion
            .iter()
            .zip(regions.background.iter())
            .any(|(&l, &b)| l && b));
        Ok(())
    }
}
