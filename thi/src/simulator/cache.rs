use thi_core::mode::ImagingMode;

use crate::imaging::DisplayImage;

/// Last display image formed in each mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageCache {
    fundamental: Option<DisplayImage>,
    harmonic: Option<DisplayImage>,
}

impl ImageCache {
    fn slot(&mut self, mode: ImagingMode) -> &mut Option<DisplayImage> {
        match mode {
            ImagingMode::Fundamental => &mut self.fundamental,
            ImagingMode::Harmonic => &mut self.harmonic,
        }
    }

    /// Cached image of `mode`, if any.
    #[must_use]
    pub fn get(&self, mode: ImagingMode) -> Option<&DisplayImage> {
        match mode {
            ImagingMode::Fundamental => self.fundamental.as_ref(),
            ImagingMode::Harmonic => self.harmonic.as_ref(),
        }
    }

    /// Stores `image`, replacing the previous image of the same mode.
    pub fn insert(&mut self, image: DisplayImage) {
        let mode = image.mode();
        *self.slot(mode) = Some(image);
    }

    /// Drops every cached image.
    pub fn clear(&mut self) {
        self.fundamental = None;
        self.harmonic = None;
    }

    /// Whether no image is cached.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fundamental.is_none() && self.harmonic.is_none()
    }
}
