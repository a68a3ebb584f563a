use getset::{CopyGetters, Getters};
use nalgebra::{DMatrix, DVector};

use crate::{
    common::mm,
    error::{check_positive, ParameterError},
};

/// The minimum number of samples per axis.
pub const GRID_SIZE_MIN: usize = 8;

/// The option of [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOption {
    /// Number of samples along each axis.
    pub size: usize,
    /// Lateral extent \[m\].
    pub width: f64,
    /// Axial extent \[m\].
    pub depth: f64,
}

impl Default for GridOption {
    fn default() -> Self {
        Self {
            size: 256,
            width: 40. * mm,
            depth: 60. * mm,
        }
    }
}

/// Sampling of the imaging plane.
///
/// `x` spans `[-width/2, width/2]` and `z` spans `[0, depth]`,
/// both with `size` evenly spaced samples.
/// Row `i` of every image corresponds to `z[i]`, column `j` to `x[j]`.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct Grid {
    #[getset(get_copy = "pub")]
    /// Number of samples along each axis.
    size: usize,
    #[getset(get_copy = "pub")]
    /// Lateral extent \[m\].
    width: f64,
    #[getset(get_copy = "pub")]
    /// Axial extent \[m\].
    depth: f64,
    #[getset(get = "pub")]
    /// Lateral sample positions \[m\].
    x: DVector<f64>,
    #[getset(get = "pub")]
    /// Axial sample positions \[m\].
    z: DVector<f64>,
    #[getset(get = "pub")]
    /// Lateral coordinate of every pixel.
    x_field: DMatrix<f64>,
    #[getset(get = "pub")]
    /// Axial coordinate of every pixel.
    z_field: DMatrix<f64>,
}

fn linspace(start: f64, end: f64, n: usize) -> DVector<f64> {
    let step = (end - start) / (n - 1) as f64;
    DVector::from_fn(n, |i, _| start + step * i as f64)
}

impl Grid {
    /// Creates a new [`Grid`].
    pub fn new(option: &GridOption) -> Result<Self, ParameterError> {
        if option.size < GRID_SIZE_MIN {
            return Err(ParameterError::GridTooSmall(option.size, GRID_SIZE_MIN));
        }
        let width = check_positive(option.width, ParameterError::ExtentInvalid)?;
        let depth = check_positive(option.depth, ParameterError::ExtentInvalid)?;
        let n = option.size;

        let x = linspace(-width / 2., width / 2., n);
        let z = linspace(0., depth, n);
        let x_field = DMatrix::from_fn(n, n, |_, j| x[j]);
        let z_field = DMatrix::from_fn(n, n, |i, _| z[i]);

        Ok(Self {
            size: n,
            width,
            depth,
            x,
            z,
            x_field,
            z_field,
        })
    }

    /// Lateral distance between adjacent samples \[m\].
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.width / (self.size - 1) as f64
    }

    /// Axial distance between adjacent samples \[m\].
    #[must_use]
    pub fn dz(&self) -> f64 {
        self.depth / (self.size - 1) as f64
    }

    /// Index of the axial sample closest to `depth`. Ties resolve to the shallower sample.
    #[must_use]
    pub fn nearest_z(&self, depth: f64) -> usize {
        nearest(&self.z, depth)
    }

    /// Index of the lateral sample closest to `x`. Ties resolve to the leftmost sample.
    #[must_use]
    pub fn nearest_x(&self, x: f64) -> usize {
        nearest(&self.x, x)
    }

    /// Index of the central column used as the lateral reference for measurements.
    #[must_use]
    pub const fn center_column(&self) -> usize {
        self.size / 2
    }
}

fn nearest(axis: &DVector<f64>, v: f64) -> usize {
    axis.iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, dist), (i, &p)| {
            let d = (p - v).abs();
            if d < dist {
                (i, d)
            } else {
                (best, dist)
            }
        })
        .0
}
