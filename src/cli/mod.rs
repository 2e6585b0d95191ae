//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod convert;
mod palette;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Sprite composer - build shiny sprite archives from a front animation and back sprites
#[derive(Parser)]
#[command(name = "composer")]
#[command(about = "Build shiny sprite archives from a front animation and a back sprite pair")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a sprite set and write the export archives
    Convert {
        /// Front animation (GIF, or a still image for a single frame)
        front: PathBuf,

        /// Back sprite, the palette reference
        back: PathBuf,

        /// Shiny back sprite, same size as the back sprite
        shiny: PathBuf,

        /// Archive base name
        #[arg(short, long)]
        name: String,

        /// Credits text stored in the archives
        #[arg(long)]
        credits: Option<String>,

        /// Output directory (default: export, or [export] out in composer.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cross-assign the palette substitutes in exported metadata
        #[arg(long)]
        swap: bool,

        /// Per-channel tolerance for snapping near-white/near-black pixels (1-255)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
        tolerance: Option<u8>,

        /// Skip the legacy archive
        #[arg(long)]
        no_legacy: bool,

        /// Skip the modern archive
        #[arg(long)]
        no_modern: bool,

        /// Path to composer.toml (default: discovered from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print progress to stderr
        #[arg(short, long)]
        verbose: bool,
    },
    /// Extract and print the shiny palette of a back sprite pair
    Palette {
        /// Back sprite, the palette reference
        back: PathBuf,

        /// Shiny back sprite
        shiny: PathBuf,

        /// Per-channel tolerance for snapping near-white/near-black pixels (1-255)
        #[arg(long, default_value = "8", value_parser = clap::value_parser!(u8).range(1..))]
        tolerance: u8,

        /// Print the swapped palette
        #[arg(long)]
        swap: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            front,
            back,
            shiny,
            name,
            credits,
            output,
            swap,
            tolerance,
            no_legacy,
            no_modern,
            config,
            verbose,
        } => {
            let args = convert::ConvertArgs {
                front,
                back,
                shiny,
                name,
                credits,
                output,
                swap,
                tolerance,
                no_legacy,
                no_modern,
                config,
                verbose,
            };
            convert::run_convert(&args)
        }
        Commands::Palette { back, shiny, tolerance, swap, json } => {
            palette::run_palette(&back, &shiny, tolerance, swap, json)
        }
    }
}
