//! Modern archive format.
//!
//! # Layout
//!
//! ```text
//! <name>.zip
//! ├── front.png          first animation frame
//! ├── back.png
//! ├── data.json
//! └── animation/
//!     ├── 0.png
//!     ├── 1.png
//!     └── ...
//! ```
//!
//! # `data.json`
//!
//! ```json
//! {
//!   "animationFrameDurations": [100, 150],
//!   "credits": "sprite by someone",
//!   "palette": {
//!     "color1": ["#0a0a0a", "#c80000"],
//!     "color2": ["#f0f0f0", "#00c800"]
//!   }
//! }
//! ```
//!
//! `color1` is the dark slot and `color2` the light slot, each as
//! `[original, substitute]` after applying the requested palette direction.

use serde::{Deserialize, Serialize};

use super::{ExportError, ExportOptions, ExportRequest, Exporter, Result, StagedArchive};
use crate::color::{parse_hex_color, ColorError};
use crate::palette::ShinyPalette;

/// Palette section of `data.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonPalette {
    pub color1: [String; 2],
    pub color2: [String; 2],
}

impl From<&ShinyPalette> for JsonPalette {
    fn from(palette: &ShinyPalette) -> Self {
        let (color1, color2) = palette.hex_pairs();
        Self { color1, color2 }
    }
}

impl JsonPalette {
    /// Parse the hex pairs back into a palette. Alpha comes back opaque.
    pub fn to_palette(&self) -> std::result::Result<ShinyPalette, ColorError> {
        Ok(ShinyPalette {
            dark_original: parse_hex_color(&self.color1[0])?,
            dark_substitute: parse_hex_color(&self.color1[1])?,
            light_original: parse_hex_color(&self.color2[0])?,
            light_substitute: parse_hex_color(&self.color2[1])?,
        })
    }
}

/// Contents of `data.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    pub animation_frame_durations: Vec<u32>,
    pub credits: String,
    pub palette: JsonPalette,
}

impl DataFile {
    pub fn from_request(request: &ExportRequest<'_>) -> Self {
        Self {
            animation_frame_durations: request.conversion.durations.clone(),
            credits: request.credits.clone(),
            palette: JsonPalette::from(&request.palette()),
        }
    }

    pub fn to_json(&self, options: &ExportOptions) -> Result<String> {
        let json = if options.pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Writes `<name>.zip`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModernExporter;

impl Exporter for ModernExporter {
    fn write_entries(
        &self,
        request: &ExportRequest<'_>,
        archive: &mut StagedArchive,
        options: &ExportOptions,
    ) -> Result<()> {
        let conversion = request.conversion;
        let first = conversion.front.normal.first().ok_or(ExportError::NoFrames)?;

        archive.add_png("front.png", first)?;
        archive.add_png("back.png", &conversion.back.normal)?;
        let data = DataFile::from_request(request).to_json(options)?;
        archive.add_bytes("data.json", data.as_bytes())?;
        for (index, frame) in conversion.front.normal.iter().enumerate() {
            archive.add_png(&format!("animation/{}.png", index), frame)?;
        }
        Ok(())
    }

    fn archive_name(&self, name: &str) -> String {
        format!("{}.zip", name)
    }

    fn format_name(&self) -> &'static str {
        "modern"
    }
}
