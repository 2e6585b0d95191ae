//! Palette command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::decode::load_still;
use crate::export::JsonPalette;
use crate::palette::{extract_palette, PaletteDirection, ShinyPalette};
use crate::pipeline::clean_sprite;

use super::{EXIT_ERROR, EXIT_SUCCESS};

fn format_palette(palette: &ShinyPalette) -> String {
    let (dark, light) = palette.hex_pairs();
    format!("dark:  {} -> {}\nlight: {} -> {}", dark[0], dark[1], light[0], light[1])
}

/// Execute the palette command
pub fn run_palette(back: &Path, shiny: &Path, tolerance: u8, swap: bool, json: bool) -> ExitCode {
    let loaded = load_still(back).and_then(|b| load_still(shiny).map(|s| (b, s)));
    let (mut back_img, mut shiny_img) = match loaded {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    clean_sprite(&mut back_img, tolerance);
    clean_sprite(&mut shiny_img, tolerance);

    let palette = match extract_palette(&shiny_img, &back_img) {
        Ok(palette) => palette.oriented(PaletteDirection::from_swap(swap)),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        match serde_json::to_string_pretty(&JsonPalette::from(&palette)) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("{}", format_palette(&palette));
    }
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_format_palette() {
        let palette = ShinyPalette {
            dark_original: Rgba([10, 10, 10, 255]),
            dark_substitute: Rgba([200, 0, 0, 255]),
            light_original: Rgba([240, 240, 240, 255]),
            light_substitute: Rgba([0, 200, 0, 255]),
        };
        assert_eq!(
            format_palette(&palette),
            "dark:  #0a0a0a -> #c80000\nlight: #f0f0f0 -> #00c800"
        );
    }
}
