//! Color utilities shared by the sprite pipeline
//!
//! Provides the sentinel colors the normalizer snaps to, the brightness metric
//! used for palette slot ordering, and `#rrggbb` hex conversion for export
//! metadata.

use image::Rgba;
use thiserror::Error;

/// Fully transparent sentinel. Every pixel with zero alpha is rewritten to this.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Opaque pure white sentinel.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Opaque pure black sentinel.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 6 or 8 hex chars after #)
    #[error("invalid color length {0}, expected 6 or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// Sum of the red, green and blue channels. Alpha is ignored.
pub fn brightness(color: Rgba<u8>) -> u32 {
    let [r, g, b, _] = color.0;
    r as u32 + g as u32 + b as u32
}

/// Whether two colors have the same RGB channels, ignoring alpha.
pub fn same_rgb(a: Rgba<u8>, b: Rgba<u8>) -> bool {
    a.0[..3] == b.0[..3]
}

/// Whether every RGB channel of `color` lies strictly inside
/// `(other - tolerance, other + tolerance)`.
///
/// Bounds are computed in `i32` so `other ± tolerance` may leave the `0..=255`
/// range; a channel of 255 is therefore within any positive tolerance of 255.
pub fn within_tolerance(color: Rgba<u8>, other: Rgba<u8>, tolerance: u8) -> bool {
    let tolerance = tolerance as i32;
    color.0[..3].iter().zip(&other.0[..3]).all(|(&c, &o)| {
        let (c, o) = (c as i32, o as i32);
        c > o - tolerance && c < o + tolerance
    })
}

/// Format a color as lowercase `#rrggbb`, dropping alpha.
///
/// # Examples
///
/// ```
/// use image::Rgba;
/// use spritecomposer::color::to_hex_no_alpha;
///
/// assert_eq!(to_hex_no_alpha(Rgba([200, 0, 15, 255])), "#c8000f");
/// ```
pub fn to_hex_no_alpha(color: Rgba<u8>) -> String {
    let [r, g, b, _] = color.0;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Parse a `#RRGGBB` or `#RRGGBBAA` hex string into an RGBA color.
///
/// Six-digit colors are opaque. Digits are case-insensitive.
///
/// # Examples
///
/// ```
/// use spritecomposer::color::parse_hex_color;
///
/// let red = parse_hex_color("#ff0000").unwrap();
/// assert_eq!(red, image::Rgba([255, 0, 0, 255]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is empty, lacks the leading `#`, has the
/// wrong length or contains non-hex characters.
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    // Validate all characters are hex
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    match hex.len() {
        6 => Ok(Rgba([
            parse_hex_pair(&hex[0..2])?,
            parse_hex_pair(&hex[2..4])?,
            parse_hex_pair(&hex[4..6])?,
            255,
        ])),
        8 => Ok(Rgba([
            parse_hex_pair(&hex[0..2])?,
            parse_hex_pair(&hex[2..4])?,
            parse_hex_pair(&hex[4..6])?,
            parse_hex_pair(&hex[6..8])?,
        ])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Parse a two-character hex string to u8 (0-255)
fn parse_hex_pair(s: &str) -> Result<u8, ColorError> {
    u8::from_str_radix(s, 16).map_err(|_| ColorError::InvalidHex(s.chars().next().unwrap_or('?')))
}

/// Reduce an 8-bit channel to the 5-bit range used by legacy palettes.
pub fn to_five_bit(channel: u8) -> u8 {
    channel >> 3
}
