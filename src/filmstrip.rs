//! Filmstrip rendering - stacks animation frames top to bottom

use image::{imageops, RgbaImage};

use crate::color::TRANSPARENT;

/// Stack `frames` vertically into a single image.
///
/// The strip is as wide as the widest frame and as tall as all frames together.
/// Each frame is placed flush left; uncovered pixels stay transparent.
///
/// # Examples
///
/// ```
/// use image::RgbaImage;
/// use spritecomposer::filmstrip::render_filmstrip;
///
/// let frame = RgbaImage::from_pixel(2, 3, image::Rgba([255, 0, 0, 255]));
/// let strip = render_filmstrip(&[frame.clone(), frame.clone(), frame]);
/// assert_eq!(strip.dimensions(), (2, 9));
/// ```
pub fn render_filmstrip(frames: &[RgbaImage]) -> RgbaImage {
    if frames.is_empty() {
        return RgbaImage::from_pixel(1, 1, TRANSPARENT);
    }

    let width = frames.iter().map(|f| f.width()).max().unwrap_or(1);
    let height = frames.iter().map(|f| f.height()).sum();
    let mut strip = RgbaImage::from_pixel(width, height, TRANSPARENT);

    let mut y = 0;
    for frame in frames {
        imageops::replace(&mut strip, frame, 0, y as i64);
        y += frame.height();
    }

    strip
}
