use derive_more::Display;

use crate::{
    common::{Freq, CENTIMETER, NEPER_TO_DB},
    mode::ImagingMode,
};

/// Body habitus of the simulated patient.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Habitus {
    /// Average body habitus.
    #[default]
    #[display("normal")]
    Normal,
    /// Thick subcutaneous fat layer.
    #[display("obese")]
    Obese,
}

impl Habitus {
    /// Attenuation added by the subcutaneous fat layer in \[dB/cm/MHz\].
    #[must_use]
    pub const fn excess_attenuation(&self) -> f64 {
        match self {
            Habitus::Normal => 0.0,
            Habitus::Obese => 0.2,
        }
    }

    /// Factor applied to the fundamental noise floor to model fat-layer reverberation clutter.
    #[must_use]
    pub const fn clutter_factor(&self) -> f64 {
        match self {
            Habitus::Normal => 1.0,
            Habitus::Obese => 1.5,
        }
    }
}

/// Acoustic properties of the tissue the beam propagates through.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Medium {
    /// Soft-tissue attenuation coefficient in \[dB/cm/MHz\].
    pub attenuation: f64,
    /// Patient habitus.
    pub habitus: Habitus,
}

impl Medium {
    /// Creates a soft-tissue medium (0.4 dB/cm/MHz) with normal habitus.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            attenuation: 0.4,
            habitus: Habitus::Normal,
        }
    }

    /// Sets the patient habitus.
    #[must_use]
    pub const fn with_habitus(self, habitus: Habitus) -> Self {
        Self { habitus, ..self }
    }

    /// Total attenuation coefficient including the habitus contribution in \[dB/cm/MHz\].
    #[must_use]
    pub const fn total_attenuation(&self) -> f64 {
        self.attenuation + self.habitus.excess_attenuation()
    }

    /// Amplitude factor of the habitus-induced attenuation at `depth` \[m\].
    ///
    /// The fundamental echo crosses the fat layer twice at the transmit frequency,
    /// the harmonic echo once at the transmit frequency and once at its double.
    #[must_use]
    pub fn excess_loss(&self, mode: ImagingMode, freq: Freq, depth: f64) -> f64 {
        let path = (1 + mode.harmonic_order()) as f64;
        (-self.habitus.excess_attenuation() * path * freq.mhz() * depth / CENTIMETER
            / NEPER_TO_DB)
            .exp()
    }
}

impl Default for Medium {
    fn default() -> Self {
        Self::new()
    }
}
