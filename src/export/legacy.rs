//! Legacy archive format for the older assembly-based asset pipeline.
//!
//! # Layout
//!
//! ```text
//! <name>-legacy.zip
//! ├── front.png      all frames stacked top to bottom
//! ├── back.png
//! ├── anim.asm
//! ├── credits.txt
//! └── shiny.pal
//! ```
//!
//! `anim.asm` holds one `frame` line per animation frame followed by `endanim`,
//! with durations converted from milliseconds to 60 Hz ticks:
//!
//! ```text
//! 	frame 0, 06
//! 	frame 1, 09
//! 	endanim
//! ```
//!
//! `shiny.pal` holds the two substitute colors reduced to 5 bits per channel,
//! light slot first:
//!
//! ```text
//! 	RGB 00, 25, 00
//! 	RGB 25, 00, 00
//! ```

use image::Rgba;

use super::{ExportOptions, ExportRequest, Exporter, Result, StagedArchive};
use crate::color::to_five_bit;
use crate::filmstrip::render_filmstrip;
use crate::palette::ShinyPalette;

/// Convert a frame duration to 60 Hz ticks, truncating.
pub fn duration_to_ticks(duration_ms: u32) -> u32 {
    (duration_ms as f64 / 1000.0 * 60.0) as u32
}

/// Render the `anim.asm` timing script. No trailing newline.
pub fn anim_asm(durations: &[u32]) -> String {
    let mut lines: Vec<String> = durations
        .iter()
        .enumerate()
        .map(|(index, &ms)| format!("\tframe {}, {:02}", index, duration_to_ticks(ms)))
        .collect();
    lines.push("\tendanim".to_string());
    lines.join("\n")
}

fn pal_line(color: Rgba<u8>) -> String {
    let [r, g, b, _] = color.0;
    format!("\tRGB {:02}, {:02}, {:02}\n", to_five_bit(r), to_five_bit(g), to_five_bit(b))
}

/// Render `shiny.pal`: light substitute, then dark substitute.
pub fn shiny_pal(palette: &ShinyPalette) -> String {
    let mut out = pal_line(palette.light_substitute);
    out.push_str(&pal_line(palette.dark_substitute));
    out
}

/// Writes `<name>-legacy.zip`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyExporter;

impl Exporter for LegacyExporter {
    fn write_entries(
        &self,
        request: &ExportRequest<'_>,
        archive: &mut StagedArchive,
        _options: &ExportOptions,
    ) -> Result<()> {
        let conversion = request.conversion;

        archive.add_png("front.png", &render_filmstrip(&conversion.front.normal))?;
        archive.add_png("back.png", &conversion.back.normal)?;
        archive.add_bytes("anim.asm", anim_asm(&conversion.durations).as_bytes())?;
        archive.add_bytes("credits.txt", request.credits.as_bytes())?;
        archive.add_bytes("shiny.pal", shiny_pal(&request.palette()).as_bytes())?;
        Ok(())
    }

    fn archive_name(&self, name: &str) -> String {
        format!("{}-legacy.zip", name)
    }

    fn format_name(&self) -> &'static str {
        "legacy"
    }
}
