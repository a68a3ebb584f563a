use crate::common::EPSILON;

/// Index of the first maximum of `values`.
#[must_use]
pub fn argmax(values: impl IntoIterator<Item = f64>) -> usize {
    values
        .into_iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, max), (i, v)| {
            if v > max {
                (i, v)
            } else {
                (best, max)
            }
        })
        .0
}

/// Sub-sample half-maximum crossings of a single-peaked linear profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfMaxWidth {
    /// Index of the peak sample.
    pub peak: usize,
    /// Fractional position of the left half-maximum crossing.
    pub left: f64,
    /// Fractional position of the right half-maximum crossing.
    pub right: f64,
}

impl HalfMaxWidth {
    /// Locates the half-maximum crossings on both sides of the peak of `profile`.
    ///
    /// From the peak the search walks outward to the first sample below half the peak value and
    /// interpolates linearly between that sample and its inner neighbour. A side without a
    /// crossing before the profile boundary falls back to half a sample from the peak.
    #[must_use]
    pub fn measure(profile: &[f64]) -> Self {
        let peak = argmax(profile.iter().copied());
        let Some(&max) = profile.get(peak).filter(|&&m| m > 0.) else {
            return Self::fallback(peak);
        };
        let y = |i: usize| profile[i] / max;

        let left = (0..peak)
            .rev()
            .find(|&i| y(i) < 0.5)
            .map(|i| i as f64 + (0.5 - y(i)) / (y(i + 1) - y(i) + EPSILON))
            .unwrap_or(peak as f64 - 0.5);
        let right = (peak + 1..profile.len())
            .find(|&i| y(i) < 0.5)
            .map(|i| (i - 1) as f64 + (0.5 - y(i - 1)) / (y(i) - y(i - 1) + EPSILON))
            .unwrap_or(peak as f64 + 0.5);

        Self { peak, left, right }
    }

    fn fallback(peak: usize) -> Self {
        Self {
            peak,
            left: peak as f64 - 0.5,
            right: peak as f64 + 0.5,
        }
    }

    /// Distance between the crossings in samples.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}
