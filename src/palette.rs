//! Two-slot shiny palettes
//!
//! A shiny sprite differs from its normal counterpart by exactly two colors. The
//! palette records both mappings, keyed by brightness: the darkest recolored
//! pixel fills the dark slot and the brightest fills the light slot.

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::color::{brightness, same_rgb, to_hex_no_alpha, BLACK, WHITE};

/// Error type for palette extraction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Shiny and reference bitmaps have different geometry
    #[error("shiny sprite is {shiny_width}x{shiny_height} but reference is {reference_width}x{reference_height}")]
    DimensionMismatch {
        shiny_width: u32,
        shiny_height: u32,
        reference_width: u32,
        reference_height: u32,
    },
    /// The shiny bitmap only contains black and white pixels
    #[error("no palette colors found: shiny sprite contains only black and white pixels")]
    NoPaletteColors,
}

/// Which substitute goes with which original when applying a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteDirection {
    /// Dark original → dark substitute, light original → light substitute
    #[default]
    Normal,
    /// Substitutes cross-assigned between slots
    Swapped,
}

impl PaletteDirection {
    /// `Swapped` when `swap` is set.
    pub fn from_swap(swap: bool) -> Self {
        if swap {
            Self::Swapped
        } else {
            Self::Normal
        }
    }
}

/// A two-color substitution palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShinyPalette {
    pub dark_original: Rgba<u8>,
    pub dark_substitute: Rgba<u8>,
    pub light_original: Rgba<u8>,
    pub light_substitute: Rgba<u8>,
}

impl ShinyPalette {
    /// Cross-assign the substitutes. Originals stay in their own slot.
    ///
    /// Applying this twice yields the original palette.
    pub fn inverted(&self) -> Self {
        Self {
            dark_original: self.dark_original,
            dark_substitute: self.light_substitute,
            light_original: self.light_original,
            light_substitute: self.dark_substitute,
        }
    }

    /// This palette as seen through `direction`.
    pub fn oriented(&self, direction: PaletteDirection) -> Self {
        match direction {
            PaletteDirection::Normal => *self,
            PaletteDirection::Swapped => self.inverted(),
        }
    }

    /// Dark and light slots as `(original, substitute)` hex pairs.
    pub fn hex_pairs(&self) -> ([String; 2], [String; 2]) {
        (
            [to_hex_no_alpha(self.dark_original), to_hex_no_alpha(self.dark_substitute)],
            [to_hex_no_alpha(self.light_original), to_hex_no_alpha(self.light_substitute)],
        )
    }
}

/// Derive the palette that turns `reference` into `shiny`.
///
/// Scans `shiny` row by row, skipping pure black and pure white (alpha is
/// ignored, so the transparent sentinel is skipped too). A pixel that undercuts
/// the running minimum brightness becomes the dark substitute; otherwise one
/// that exceeds the running maximum becomes the light substitute. A minimum
/// that gets undercut moves to the light slot if it is brighter than the
/// current maximum. Comparisons are strict, so the first pixel to reach an
/// extreme keeps it. The co-located `reference` pixels become the originals.
///
/// The minimum is tested first: the first candidate always lands in the dark
/// slot and an equally bright later pixel fills the light slot.
///
/// # Errors
///
/// - [`PaletteError::DimensionMismatch`] if the bitmaps differ in size
/// - [`PaletteError::NoPaletteColors`] if either extreme is never found
pub fn extract_palette(
    shiny: &RgbaImage,
    reference: &RgbaImage,
) -> Result<ShinyPalette, PaletteError> {
    if shiny.dimensions() != reference.dimensions() {
        return Err(PaletteError::DimensionMismatch {
            shiny_width: shiny.width(),
            shiny_height: shiny.height(),
            reference_width: reference.width(),
            reference_height: reference.height(),
        });
    }

    let mut min: Option<(Rgba<u8>, Rgba<u8>)> = None;
    let mut max: Option<(Rgba<u8>, Rgba<u8>)> = None;
    let mut min_brightness = brightness(WHITE);
    let mut max_brightness = brightness(BLACK);

    for (x, y, &color) in shiny.enumerate_pixels() {
        if same_rgb(color, BLACK) || same_rgb(color, WHITE) {
            continue;
        }
        let value = brightness(color);
        if value < min_brightness {
            // A displaced minimum may still be the brightest color seen so far
            if let Some(displaced) = min {
                if min_brightness > max_brightness {
                    max_brightness = min_brightness;
                    max = Some(displaced);
                }
            }
            min_brightness = value;
            min = Some((*reference.get_pixel(x, y), color));
        } else if value > max_brightness {
            max_brightness = value;
            max = Some((*reference.get_pixel(x, y), color));
        }
    }

    match (min, max) {
        (Some((dark_original, dark_substitute)), Some((light_original, light_substitute))) => {
            Ok(ShinyPalette { dark_original, dark_substitute, light_original, light_substitute })
        }
        _ => Err(PaletteError::NoPaletteColors),
    }
}

/// Return a recolored copy of `image`. The input is left untouched.
///
/// Matching is exact on the full RGBA value.
pub fn apply_palette(image: &RgbaImage, palette: &ShinyPalette) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        if *pixel == palette.dark_original {
            *pixel = palette.dark_substitute;
        } else if *pixel == palette.light_original {
            *pixel = palette.light_substitute;
        }
    }
    out
}

/// [`apply_palette`] with the palette seen through `direction`.
pub fn apply_palette_directed(
    image: &RgbaImage,
    palette: &ShinyPalette,
    direction: PaletteDirection,
) -> RgbaImage {
    apply_palette(image, &palette.oriented(direction))
}
