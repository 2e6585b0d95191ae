//! Data models for a sprite conversion (frames, variant sets, the finished result)

use image::RgbaImage;

use crate::palette::{PaletteDirection, ShinyPalette};

/// One animation frame and how long it is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub image: RgbaImage,
    /// Display time in milliseconds
    pub duration_ms: u32,
}

impl Frame {
    pub fn new(image: RgbaImage, duration_ms: u32) -> Self {
        Self { image, duration_ms }
    }
}

/// The three renderings produced for every sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Variants<T> {
    /// Normalized, background removed
    pub normal: T,
    /// Recolored with the extracted palette
    pub shiny: T,
    /// Recolored with the inverted palette
    pub inverted: T,
}

/// Result of one pipeline run, held in memory until exported or dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Front animation frames, in playback order
    pub front: Variants<Vec<RgbaImage>>,
    pub back: Variants<RgbaImage>,
    pub palette: ShinyPalette,
    /// Per-frame durations in milliseconds, one per front frame
    pub durations: Vec<u32>,
}

impl Conversion {
    pub fn frame_count(&self) -> usize {
        self.front.normal.len()
    }

    /// The palette as seen through `direction`.
    pub fn palette_for(&self, direction: PaletteDirection) -> ShinyPalette {
        self.palette.oriented(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn palette() -> ShinyPalette {
        ShinyPalette {
            dark_original: Rgba([1, 1, 1, 255]),
            dark_substitute: Rgba([2, 2, 2, 255]),
            light_original: Rgba([3, 3, 3, 255]),
            light_substitute: Rgba([4, 4, 4, 255]),
        }
    }

    #[test]
    fn test_frame_count_and_palette_direction() {
        let img = RgbaImage::new(1, 1);
        let conversion = Conversion {
            front: Variants {
                normal: vec![img.clone(), img.clone()],
                shiny: vec![img.clone(), img.clone()],
                inverted: vec![img.clone(), img.clone()],
            },
            back: Variants { normal: img.clone(), shiny: img.clone(), inverted: img },
            palette: palette(),
            durations: vec![100, 250],
        };

        assert_eq!(conversion.frame_count(), 2);
        assert_eq!(conversion.palette_for(PaletteDirection::Normal), palette());
        assert_eq!(conversion.palette_for(PaletteDirection::Swapped), palette().inverted());
    }
}
