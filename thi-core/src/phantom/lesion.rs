use nalgebra::DMatrix;

use crate::{common::mm, grid::Grid};

/// A circular anechoic region of the phantom.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lesion {
    /// Lateral position of the center \[m\].
    pub center_x: f64,
    /// Axial position of the center \[m\].
    pub center_z: f64,
    /// Radius \[m\].
    pub radius: f64,
}

/// Fraction of the radius used for the low-variance inner region.
pub const INNER_RADIUS_RATIO: f64 = 0.5;

/// Predefined lesion placements. A phantom with `n` lesions uses the first `n`.
pub const LESION_LAYOUT: [Lesion; 5] = [
    Lesion::new(0. * mm, 30. * mm, 6. * mm),
    Lesion::new(-12. * mm, 45. * mm, 4. * mm),
    Lesion::new(12. * mm, 15. * mm, 3. * mm),
    Lesion::new(-12. * mm, 15. * mm, 3. * mm),
    Lesion::new(12. * mm, 45. * mm, 4. * mm),
];

impl Lesion {
    /// Creates a new [`Lesion`].
    #[must_use]
    pub const fn new(center_x: f64, center_z: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_z,
            radius,
        }
    }

    fn circle(&self, grid: &Grid, radius: f64) -> DMatrix<bool> {
        let r2 = radius * radius;
        grid.x_field().zip_map(grid.z_field(), |x, z| {
            (x - self.center_x).powi(2) + (z - self.center_z).powi(2) < r2
        })
    }

    /// Pixels strictly inside the lesion.
    #[must_use]
    pub fn mask(&self, grid: &Grid) -> DMatrix<bool> {
        self.circle(grid, self.radius)
    }

    /// Pixels inside half the radius, away from the partial-volume rim.
    #[must_use]
    pub fn inner_mask(&self, grid: &Grid) -> DMatrix<bool> {
        self.circle(grid, self.radius * INNER_RADIUS_RATIO)
    }
}

/// Tissue region used as the background reference for contrast statistics.
///
/// Pixels within `margin` of the border are excluded, as are every lesion and
/// the central lateral strip `[c - half_width, c + half_width)` holding the point targets.
#[must_use]
pub fn background_mask(
    grid: &Grid,
    lesions: &[Lesion],
    margin: usize,
    center_half_width: usize,
) -> DMatrix<bool> {
    let n = grid.size();
    let c = grid.center_column();
    let strip = c.saturating_sub(center_half_width)..(c + center_half_width).min(n);
    let inside = margin..n.saturating_sub(margin);
    let lesion_masks: Vec<_> = lesions.iter().map(|l| l.mask(grid)).collect();
    DMatrix::from_fn(n, n, |i, j| {
        inside.contains(&i)
            && inside.contains(&j)
            && !strip.contains(&j)
            && !lesion_masks.iter().any(|m| m[(i, j)])
    })
}
