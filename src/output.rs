//! PNG encoding for archive members

use image::{ImageOutputFormat, RgbaImage};
use std::io::Cursor;

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> image::ImageResult<Vec<u8>> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_encode_png_decodes_back() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 1, Rgba([200, 10, 10, 255]));

        let png = encode_png(&img).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }
}
