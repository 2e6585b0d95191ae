//! Source image decoding
//!
//! Animated fronts come in as GIFs; back sprites are any still format the
//! `image` crate understands. Everything is decoded to full-canvas RGBA.

use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::io::Reader as ImageReader;
use image::{AnimationDecoder, ImageFormat, RgbaImage};
use thiserror::Error;

use crate::models::Frame;

/// Error type for source decoding
#[derive(Debug, Error)]
pub enum DecodeError {
    /// File could not be opened or read
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File is not a decodable image
    #[error("failed to decode '{}': {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Animation decoded to zero frames
    #[error("'{}' contains no frames", path.display())]
    NoFrames { path: PathBuf },
}

impl DecodeError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    fn image(path: &Path, source: image::ImageError) -> Self {
        Self::Image { path: path.to_path_buf(), source }
    }
}

/// Decode an animation into frames with their native timings.
///
/// GIFs yield one composited frame per GIF frame, durations taken from the frame
/// delay. Any other format is treated as a one-frame animation with a zero
/// duration.
pub fn load_animation(path: &Path) -> Result<Vec<Frame>, DecodeError> {
    let reader = ImageReader::open(path)
        .map_err(|e| DecodeError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| DecodeError::io(path, e))?;

    let frames = if reader.format() == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(reader.into_inner()).map_err(|e| DecodeError::image(path, e))?;
        decoder
            .into_frames()
            .collect_frames()
            .map_err(|e| DecodeError::image(path, e))?
            .into_iter()
            .map(|frame| {
                let (numer, denom) = frame.delay().numer_denom_ms();
                Frame::new(frame.into_buffer(), numer / denom.max(1))
            })
            .collect::<Vec<_>>()
    } else {
        let image = reader.decode().map_err(|e| DecodeError::image(path, e))?;
        vec![Frame::new(image.to_rgba8(), 0)]
    };

    if frames.is_empty() {
        return Err(DecodeError::NoFrames { path: path.to_path_buf() });
    }
    log::debug!("decoded {} frame(s) from {}", frames.len(), path.display());
    Ok(frames)
}

/// Decode a still image to RGBA. Animated inputs yield their first frame.
pub fn load_still(path: &Path) -> Result<RgbaImage, DecodeError> {
    let image = ImageReader::open(path)
        .map_err(|e| DecodeError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| DecodeError::io(path, e))?
        .decode()
        .map_err(|e| DecodeError::image(path, e))?;
    Ok(image.to_rgba8())
}
