use derive_more::Display;

/// Receive mode of the scanner.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImagingMode {
    /// Echoes received at the transmit frequency.
    #[display("fundamental")]
    Fundamental,
    /// Echoes received at the second harmonic generated in tissue.
    #[display("harmonic")]
    Harmonic,
}

impl ImagingMode {
    /// Both modes, in the order a comparison pass runs them.
    pub const ALL: [ImagingMode; 2] = [ImagingMode::Fundamental, ImagingMode::Harmonic];

    /// Multiple of the transmit frequency at which this mode receives.
    #[must_use]
    pub const fn harmonic_order(&self) -> u32 {
        match self {
            ImagingMode::Fundamental => 1,
            ImagingMode::Harmonic => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case("fundamental", ImagingMode::Fundamental)]
    #[case("harmonic", ImagingMode::Harmonic)]
    fn display(#[case] expect: &str, #[case] mode: ImagingMode) {
        assert_eq!(expect, mode.to_string());
    }

    #[test]
    fn harmonic_order() {
        assert_eq!(1, ImagingMode::Fundamental.harmonic_order());
        assert_eq!(2, ImagingMode::Harmonic.harmonic_order());
    }
}
