//! Frame set processing
//!
//! Runs one conversion: normalize and clear the background of every sprite,
//! extract the shiny palette from the back pair, then render the shiny and
//! inverted variants of every frame.
//!
//! Progress is reported as a fraction in `0.0..=1.0` that only ever increases.
//! A failed or cancelled run produces no [`Conversion`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use rayon::prelude::*;
use thiserror::Error;

use crate::decode::{load_animation, load_still, DecodeError};
use crate::flood::remove_background;
use crate::models::{Conversion, Frame, Variants};
use crate::normalize::{normalize_colors, DEFAULT_TOLERANCE};
use crate::palette::{apply_palette_directed, extract_palette, PaletteDirection, PaletteError};

/// Progress checkpoints
pub const PROGRESS_START: f32 = 0.0;
pub const PROGRESS_DECODED: f32 = 0.3;
pub const PROGRESS_NORMALIZED: f32 = 0.6;
pub const PROGRESS_PALETTE: f32 = 0.8;
pub const PROGRESS_DONE: f32 = 1.0;

/// Coarse error classification surfaced to callers that only need the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    DimensionMismatch,
    PaletteExtraction,
    Export,
    Cancelled,
    /// The worker thread died without reporting a result
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Decode => "decode error",
            ErrorKind::DimensionMismatch => "dimension mismatch",
            ErrorKind::PaletteExtraction => "palette extraction error",
            ErrorKind::Export => "export error",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal error",
        };
        f.write_str(name)
    }
}

/// Error type for a conversion run
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error("conversion cancelled")]
    Cancelled,
    #[error("conversion worker panicked: {0}")]
    WorkerPanicked(String),
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Decode(_) => ErrorKind::Decode,
            ConvertError::Palette(PaletteError::DimensionMismatch { .. }) => {
                ErrorKind::DimensionMismatch
            }
            ConvertError::Palette(PaletteError::NoPaletteColors) => ErrorKind::PaletteExtraction,
            ConvertError::Cancelled => ErrorKind::Cancelled,
            ConvertError::WorkerPanicked(_) => ErrorKind::Internal,
        }
    }
}

/// State of a conversion as observed by a caller.
#[derive(Debug)]
pub enum Progress {
    /// Sources are being opened
    Loading,
    /// Fraction of the run completed
    InProgress(f32),
    Ready(Box<Conversion>),
    Failed(ErrorKind),
}

impl Progress {
    /// Completed fraction, 1.0 once finished either way.
    pub fn fraction(&self) -> f32 {
        match self {
            Progress::Loading => PROGRESS_START,
            Progress::InProgress(fraction) => *fraction,
            Progress::Ready(_) | Progress::Failed(_) => PROGRESS_DONE,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Progress::Ready(_) | Progress::Failed(_))
    }
}

/// Shared flag a caller flips to abort a run between steps.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ConvertError> {
        if self.is_cancelled() {
            log::info!("conversion cancelled");
            Err(ConvertError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Tuning for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Per-channel tolerance for snapping to white/black
    pub tolerance: u8,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self { tolerance: DEFAULT_TOLERANCE }
    }
}

/// Decoded inputs for one run.
#[derive(Debug, Clone)]
pub struct SpriteSources {
    /// Front animation
    pub frames: Vec<Frame>,
    /// Back sprite, the palette reference
    pub back: RgbaImage,
    /// Recolored back sprite, same size as `back`
    pub shiny_back: RgbaImage,
}

/// Locations of the three source images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub front: PathBuf,
    pub back: PathBuf,
    pub shiny: PathBuf,
}

impl SourcePaths {
    pub fn new(front: impl Into<PathBuf>, back: impl Into<PathBuf>, shiny: impl Into<PathBuf>) -> Self {
        Self { front: front.into(), back: back.into(), shiny: shiny.into() }
    }
}

/// Decode all three sources. Fails before any processing if one is unreadable.
pub fn load_sources(paths: &SourcePaths) -> Result<SpriteSources, DecodeError> {
    Ok(SpriteSources {
        frames: load_animation(&paths.front)?,
        back: load_still(&paths.back)?,
        shiny_back: load_still(&paths.shiny)?,
    })
}

/// Snap near-white/near-black pixels, then clear the white backdrop.
pub fn clean_sprite(image: &mut RgbaImage, tolerance: u8) {
    normalize_colors(image, tolerance);
    remove_background(image);
}

/// Run the pipeline over already decoded sources.
///
/// Reports [`PROGRESS_NORMALIZED`], [`PROGRESS_PALETTE`] and [`PROGRESS_DONE`].
pub fn process(
    sources: SpriteSources,
    options: &ProcessOptions,
    cancel: &CancelToken,
    on_progress: &mut dyn FnMut(f32),
) -> Result<Conversion, ConvertError> {
    let SpriteSources { frames, mut back, mut shiny_back } = sources;
    let (mut images, durations): (Vec<RgbaImage>, Vec<u32>) =
        frames.into_iter().map(|f| (f.image, f.duration_ms)).unzip();
    cancel.check()?;

    images.par_iter_mut().for_each(|image| clean_sprite(image, options.tolerance));
    clean_sprite(&mut back, options.tolerance);
    clean_sprite(&mut shiny_back, options.tolerance);
    log::debug!("normalized {} frame(s) and back sprites", images.len());
    on_progress(PROGRESS_NORMALIZED);
    cancel.check()?;

    let palette = extract_palette(&shiny_back, &back)?;
    log::info!(
        "extracted palette: dark {:?} -> {:?}, light {:?} -> {:?}",
        palette.dark_original.0,
        palette.dark_substitute.0,
        palette.light_original.0,
        palette.light_substitute.0
    );
    on_progress(PROGRESS_PALETTE);
    cancel.check()?;

    let render = |img: &RgbaImage, direction: PaletteDirection| {
        apply_palette_directed(img, &palette, direction)
    };
    let shiny: Vec<RgbaImage> =
        images.par_iter().map(|img| render(img, PaletteDirection::Normal)).collect();
    let front_inverted: Vec<RgbaImage> =
        images.par_iter().map(|img| render(img, PaletteDirection::Swapped)).collect();
    let back_variants = Variants {
        shiny: render(&back, PaletteDirection::Normal),
        inverted: render(&back, PaletteDirection::Swapped),
        normal: back,
    };
    cancel.check()?;

    let conversion = Conversion {
        front: Variants { normal: images, shiny, inverted: front_inverted },
        back: back_variants,
        palette,
        durations,
    };
    on_progress(PROGRESS_DONE);
    Ok(conversion)
}

/// Decode the sources at `paths` and run the pipeline.
///
/// Reports every checkpoint from [`PROGRESS_START`] to [`PROGRESS_DONE`].
pub fn convert_files(
    paths: &SourcePaths,
    options: &ProcessOptions,
    cancel: &CancelToken,
    on_progress: &mut dyn FnMut(f32),
) -> Result<Conversion, ConvertError> {
    on_progress(PROGRESS_START);
    log::info!("converting {}", display_name(&paths.front));
    let sources = load_sources(paths)?;
    on_progress(PROGRESS_DECODED);
    cancel.check()?;
    process(sources, options, cancel, on_progress)
}

fn display_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}
