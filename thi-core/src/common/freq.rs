/// \[Hz\]
pub struct Hz;

/// \[kHz\]
#[allow(non_camel_case_types)]
pub struct kHz;

/// \[MHz\]
pub struct MHz;

/// Frequency
#[derive(Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Freq {
    pub(crate) freq: f64,
}

impl core::fmt::Debug for Freq {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} Hz", self.freq)
    }
}

impl Freq {
    /// Returns the frequency in Hz.
    #[inline]
    #[must_use]
    pub const fn hz(&self) -> f64 {
        self.freq
    }

    /// Returns the frequency in MHz.
    #[inline]
    #[must_use]
    pub fn mhz(&self) -> f64 {
        self.freq / 1e6
    }
}

impl core::ops::Mul<Hz> for f64 {
    type Output = Freq;

    fn mul(self, _rhs: Hz) -> Self::Output {
        Self::Output { freq: self }
    }
}

impl core::ops::Mul<kHz> for f64 {
    type Output = Freq;

    fn mul(self, _rhs: kHz) -> Self::Output {
        Self::Output { freq: self * 1e3 }
    }
}

impl core::ops::Mul<MHz> for f64 {
    type Output = Freq;

    fn mul(self, _rhs: MHz) -> Self::Output {
        Self::Output { freq: self * 1e6 }
    }
}

impl core::ops::Mul<f64> for Freq {
    type Output = Freq;

    fn mul(self, rhs: f64) -> Self::Output {
        Freq {
            freq: self.freq * rhs,
        }
    }
}

impl core::ops::Div<Freq> for Freq {
    type Output = f64;

    fn div(self, rhs: Freq) -> Self::Output {
        self.freq / rhs.freq
    }
}
