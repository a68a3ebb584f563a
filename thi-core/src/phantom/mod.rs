mod lesion;

pub use lesion::{background_mask, Lesion, INNER_RADIUS_RATIO, LESION_LAYOUT};

use getset::Getters;
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::{
    common::{mm, seeded_rng},
    error::{check_positive, ParameterError},
    grid::Grid,
};

/// The option of [`Phantom`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhantomOption {
    /// Number of lesions taken from [`LESION_LAYOUT`].
    pub num_lesions: usize,
    /// Seed of the speckle pattern. `None` draws a fresh pattern every time.
    pub speckle_seed: Option<u64>,
    /// Depths of the point targets on the central line \[m\].
    pub point_target_depths: Vec<f64>,
    /// Reflectivity of the point targets.
    pub point_target_value: f64,
    /// Side length of the square point-target block in pixels.
    pub point_target_size: usize,
}

impl Default for PhantomOption {
    fn default() -> Self {
        Self {
            num_lesions: 3,
            speckle_seed: Some(42),
            point_target_depths: vec![10. * mm, 25. * mm, 40. * mm, 55. * mm],
            point_target_value: 50.0,
            point_target_size: 2,
        }
    }
}

impl PhantomOption {
    /// Checks the lesion count and the point-target reflectivity.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(1..=LESION_LAYOUT.len()).contains(&self.num_lesions) {
            return Err(ParameterError::LesionCountOutOfRange(
                self.num_lesions,
                LESION_LAYOUT.len(),
            ));
        }
        check_positive(
            self.point_target_value,
            ParameterError::PointTargetValueInvalid,
        )?;
        Ok(())
    }
}

/// Synthetic tissue reflectivity map.
///
/// Speckle background with anechoic lesions and bright point targets.
/// All values are non-negative and every pixel of a lesion mask is exactly zero.
///
/// A point target overlapping a lesion keeps its reflectivity; its pixels are removed from
/// that lesion's masks.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct Phantom {
    /// Reflectivity of every pixel.
    reflectivity: DMatrix<f64>,
    /// Lesion geometry.
    lesions: Vec<Lesion>,
    /// Per-lesion masks.
    lesion_masks: Vec<DMatrix<bool>>,
    /// Per-lesion inner masks at [`INNER_RADIUS_RATIO`] of the radius.
    inner_masks: Vec<DMatrix<bool>>,
    /// Top-left pixel `(row, column)` of every point target.
    point_targets: Vec<(usize, usize)>,
}

impl Phantom {
    /// Generates a new [`Phantom`] on `grid`.
    #[tracing::instrument(level = "debug", skip(grid))]
    pub fn new(grid: &Grid, option: &PhantomOption) -> Result<Self, ParameterError> {
        option.validate()?;
        let n = grid.size();

        let mut rng = seeded_rng(option.speckle_seed);
        let mut reflectivity =
            DMatrix::from_fn(n, n, |_, _| rng.sample::<f64, _>(StandardNormal).abs());

        let lesions = LESION_LAYOUT[..option.num_lesions].to_vec();
        let mut lesion_masks: Vec<_> = lesions.iter().map(|l| l.mask(grid)).collect();
        let mut inner_masks: Vec<_> = lesions.iter().map(|l| l.inner_mask(grid)).collect();
        lesion_masks.iter().for_each(|mask| {
            reflectivity
                .iter_mut()
                .zip(mask.iter())
                .filter(|(_, &m)| m)
                .for_each(|(r, _)| *r = 0.0);
        });

        let col = grid.nearest_x(0.);
        let point_targets: Vec<_> = option
            .point_target_depths
            .iter()
            .map(|&d| (grid.nearest_z(d), col))
            .collect();
        point_targets.iter().for_each(|&(row, col)| {
            (row..(row + option.point_target_size).min(n)).for_each(|i| {
                (col..(col + option.point_target_size).min(n)).for_each(|j| {
                    reflectivity[(i, j)] = option.point_target_value;
                    lesion_masks
                        .iter_mut()
                        .chain(inner_masks.iter_mut())
                        .for_each(|m| m[(i, j)] = false);
                })
            })
        });

        tracing::debug!(
            "Phantom created with {} lesions and {} point targets.",
            lesions.len(),
            point_targets.len()
        );

        Ok(Self {
            inner_masks,
            reflectivity,
            lesions,
            lesion_masks,
            point_targets,
        })
    }

    /// Creates a [`Phantom`] from an explicit reflectivity map.
    ///
    /// Masks are derived from `lesions`; the reflectivity is taken as is.
    pub fn from_reflectivity(
        grid: &Grid,
        reflectivity: DMatrix<f64>,
        lesions: Vec<Lesion>,
    ) -> Result<Self, ParameterError> {
        let n = grid.size();
        if reflectivity.nrows() != n || reflectivity.ncols() != n {
            return Err(ParameterError::ShapeMismatch(
                reflectivity.nrows(),
                reflectivity.ncols(),
                n,
            ));
        }
        Ok(Self {
            lesion_masks: lesions.iter().map(|l| l.mask(grid)).collect(),
            inner_masks: lesions.iter().map(|l| l.inner_mask(grid)).collect(),
            reflectivity,
            lesions,
            point_targets: Vec::new(),
        })
    }
}
