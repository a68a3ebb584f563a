use thiserror::Error;

/// An invalid numeric parameter was passed to the engine.
#[derive(Error, Debug, PartialEq, Clone, Copy)]
#[non_exhaustive]
pub enum ParameterError {
    /// Grid sample count is too small.
    #[error("Grid size ({0}) must be at least {1}")]
    GridTooSmall(usize, usize),
    /// Physical extent is not positive.
    #[error("Physical extent ({0}) must be positive and finite")]
    ExtentInvalid(f64),
    /// Frequency is not positive.
    #[error("Frequency ({0} Hz) must be positive and finite")]
    FreqInvalid(f64),
    /// Nonlinearity coefficient is out of range.
    #[error("Nonlinearity coefficient ({0}) is out of range ([0, 1])")]
    NonlinearityOutOfRange(f64),
    /// Kernel size must be odd.
    #[error("Kernel size ({0}) must be odd and non-zero")]
    KernelSizeInvalid(usize),
    /// Fractional bandwidth is not positive.
    #[error("Fractional bandwidth ({0}) must be positive and finite")]
    BandwidthInvalid(f64),
    /// Lesion count is out of range.
    #[error("Number of lesions ({0}) is out of range ([1, {1}])")]
    LesionCountOutOfRange(usize, usize),
    /// Noise standard deviation is negative.
    #[error("Noise standard deviation ({0}) must be non-negative")]
    NoiseStdInvalid(f64),
    /// Point-target reflectivity is not positive.
    #[error("Point target value ({0}) must be positive and finite")]
    PointTargetValueInvalid(f64),
    /// Displayed dynamic range is not positive.
    #[error("Dynamic range ({0} dB) must be positive and finite")]
    DynamicRangeInvalid(f64),
    /// Matrix shape does not match the grid.
    #[error("Matrix shape ({0}x{1}) does not match grid size ({2})")]
    ShapeMismatch(usize, usize, usize),
}

/// Validates that `v` is positive and finite, mapping a violation with `err`.
#[inline]
pub fn check_positive(v: f64, err: fn(f64) -> ParameterError) -> Result<f64, ParameterError> {
    if v.is_finite() && v > 0. {
        Ok(v)
    } else {
        Err(err(v))
    }
}

/// Validates a nonlinearity coefficient.
pub fn check_nonlinearity(v: f64) -> Result<f64, ParameterError> {
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(ParameterError::NonlinearityOutOfRange(v))
    }
}

/// Validates a frequency in Hz.
pub fn check_freq(v: f64) -> Result<f64, ParameterError> {
    check_positive(v, ParameterError::FreqInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case(Ok(0.), 0.)]
    #[case(Ok(0.35), 0.35)]
    #[case(Ok(1.), 1.)]
    #[case(Err(ParameterError::NonlinearityOutOfRange(-0.1)), -0.1)]
    #[case(Err(ParameterError::NonlinearityOutOfRange(1.5)), 1.5)]
    fn nonlinearity(#[case] expect: Result<f64, ParameterError>, #[case] v: f64) {
        assert_eq!(expect, check_nonlinearity(v));
    }

    #[test]
    fn nonlinearity_nan() {
        assert!(check_nonlinearity(f64::NAN).is_err());
    }

    #[rstest::rstest]
    #[case(true, 3.5e6)]
    #[case(false, 0.)]
    #[case(false, -1.)]
    #[case(false, f64::INFINITY)]
    fn freq(#[case] ok: bool, #[case] v: f64) {
        assert_eq!(ok, check_freq(v).is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(
            "Nonlinearity coefficient (1.5) is out of range ([0, 1])",
            ParameterError::NonlinearityOutOfRange(1.5).to_string()
        );
        assert_eq!(
            "Kernel size (40) must be odd and non-zero",
            ParameterError::KernelSizeInvalid(40).to_string()
        );
    }
}
