use nalgebra::DMatrix;

/// Offset added before taking the logarithm so that zero samples map to a finite level.
pub const LOG_EPSILON: f64 = 1e-6;

/// Log-compresses `envelope` relative to its own maximum into `[-dynamic_range, 0]` dB.
///
/// A degenerate envelope whose maximum does not exceed [`LOG_EPSILON`] is normalized by
/// [`LOG_EPSILON`] instead.
#[must_use]
pub fn log_compress(envelope: &DMatrix<f64>, dynamic_range: f64) -> DMatrix<f64> {
    let max = envelope.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let reference = if max > LOG_EPSILON {
        max
    } else {
        tracing::debug!("Envelope maximum ({}) is degenerate.", max);
        LOG_EPSILON
    };
    envelope.map(|v| (20. * (v / reference + LOG_EPSILON).log10()).clamp(-dynamic_range, 0.))
}

/// Converts a decibel amplitude to linear scale.
#[inline]
#[must_use]
pub fn db_to_linear(db: f64) -> f64 {
    10f64.powf(db / 20.)
}
