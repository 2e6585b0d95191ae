//! Background removal
//!
//! Clears the white backdrop sprites are usually drawn on. Only white reachable
//! from the image border is removed; white enclosed by the sprite outline (eyes,
//! highlights) survives.

use std::collections::VecDeque;

use image::RgbaImage;

use crate::color::{TRANSPARENT, WHITE};

/// Replace every border-connected [`WHITE`] pixel with [`TRANSPARENT`].
///
/// Uses an iterative BFS seeded with all four edges, so large sprites never
/// grow the call stack. Expects an image already passed through
/// [`crate::normalize::normalize_colors`]. Returns the number of pixels cleared.
///
/// # Examples
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use spritecomposer::flood::remove_background;
///
/// let mut img = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]));
/// img.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
/// assert_eq!(remove_background(&mut img), 8);
/// ```
pub fn remove_background(image: &mut RgbaImage) -> usize {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return 0;
    }

    let mut queue = VecDeque::with_capacity(2 * (width + height) as usize);
    for x in 0..width {
        queue.push_back((x, 0));
        queue.push_back((x, height - 1));
    }
    for y in 0..height {
        queue.push_back((0, y));
        queue.push_back((width - 1, y));
    }

    let mut cleared = 0;
    while let Some((x, y)) = queue.pop_front() {
        // Clearing before pushing neighbors doubles as the visited mark
        if *image.get_pixel(x, y) != WHITE {
            continue;
        }
        image.put_pixel(x, y, TRANSPARENT);
        cleared += 1;

        if x > 0 {
            queue.push_back((x - 1, y));
        }
        if x < width - 1 {
            queue.push_back((x + 1, y));
        }
        if y > 0 {
            queue.push_back((x, y - 1));
        }
        if y < height - 1 {
            queue.push_back((x, y + 1));
        }
    }

    cleared
}
