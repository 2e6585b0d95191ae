//! Color normalization
//!
//! Snaps near-white and near-black pixels to the exact sentinel colors so that
//! later passes (background removal, palette extraction) can rely on exact
//! equality.

use image::RgbaImage;

use crate::color::{within_tolerance, BLACK, TRANSPARENT, WHITE};

/// Default per-channel tolerance used when snapping to white or black.
pub const DEFAULT_TOLERANCE: u8 = 8;

/// Normalize every pixel of `image` in place.
///
/// - alpha 0 becomes [`TRANSPARENT`]
/// - otherwise, RGB within `tolerance` of white becomes opaque [`WHITE`]
/// - otherwise, RGB within `tolerance` of black becomes opaque [`BLACK`]
///
/// Any other pixel is left untouched. Dimensions never change.
///
/// # Examples
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use spritecomposer::normalize::{normalize_colors, DEFAULT_TOLERANCE};
///
/// let mut img = RgbaImage::from_pixel(1, 1, Rgba([250, 252, 249, 255]));
/// normalize_colors(&mut img, DEFAULT_TOLERANCE);
/// assert_eq!(*img.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
/// ```
pub fn normalize_colors(image: &mut RgbaImage, tolerance: u8) {
    for pixel in image.pixels_mut() {
        if pixel.0[3] == 0 {
            *pixel = TRANSPARENT;
        } else if within_tolerance(*pixel, WHITE, tolerance) {
            *pixel = WHITE;
        } else if within_tolerance(*pixel, BLACK, tolerance) {
            *pixel = BLACK;
        }
    }
}
