//! Export archives for finished conversions.
//!
//! Two archive schemas are produced from the same [`Conversion`]:
//!
//! - **Modern** (`<name>.zip`): first frame, back sprite, every animation frame
//!   and a `data.json` with timings, credits and the palette.
//! - **Legacy** (`<name>-legacy.zip`): a vertical filmstrip, the back sprite,
//!   an `anim.asm` timing script, `credits.txt` and a 5-bit `shiny.pal`.
//!
//! Archives are staged in a temporary file next to their destination and only
//! renamed into place once complete, so a failed or abandoned export never
//! leaves a truncated zip at the final path.
//!
//! # Example
//!
//! ```ignore
//! use spritecomposer::export::{export_all, ArchiveSelection, ExportOptions, ExportRequest};
//! use spritecomposer::palette::PaletteDirection;
//! use spritecomposer::pipeline::CancelToken;
//!
//! let request = ExportRequest::new(&conversion, PaletteDirection::Normal, "bulbasaur", "", "out");
//! let written = export_all(
//!     &request,
//!     ArchiveSelection::default(),
//!     &ExportOptions::default(),
//!     &CancelToken::new(),
//! )?;
//! ```

pub mod archive;
pub mod legacy;
pub mod modern;

pub use archive::StagedArchive;
pub use legacy::LegacyExporter;
pub use modern::{DataFile, JsonPalette, ModernExporter};

use std::path::PathBuf;

use thiserror::Error;

use crate::models::Conversion;
use crate::palette::{PaletteDirection, ShinyPalette};
use crate::pipeline::CancelToken;

/// Common error type for export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error during file writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Zip container error
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// PNG encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Archive name cannot be used as a file name
    #[error("Invalid archive name '{0}'")]
    InvalidName(String),
    /// Conversion has no front frames to export
    #[error("Conversion has no frames")]
    NoFrames,
    /// Caller cancelled the export
    #[error("Export cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Everything needed to write the archives for one conversion.
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub conversion: &'a Conversion,
    pub direction: PaletteDirection,
    /// Archive base name, e.g. the creature's name
    pub name: String,
    pub credits: String,
    /// Directory the archives are written to
    pub destination: PathBuf,
}

impl<'a> ExportRequest<'a> {
    pub fn new(
        conversion: &'a Conversion,
        direction: PaletteDirection,
        name: impl Into<String>,
        credits: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            conversion,
            direction,
            name: name.into(),
            credits: credits.into(),
            destination: destination.into(),
        }
    }

    /// The conversion palette seen through the requested direction.
    pub fn palette(&self) -> ShinyPalette {
        self.conversion.palette_for(self.direction)
    }

    fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\') {
            return Err(ExportError::InvalidName(self.name.clone()));
        }
        if self.conversion.frame_count() == 0 {
            return Err(ExportError::NoFrames);
        }
        Ok(())
    }
}

/// Options for export operations.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Pretty print `data.json` (compact by default)
    pub pretty: bool,
}

/// Which archives [`export_all`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSelection {
    pub modern: bool,
    pub legacy: bool,
}

impl Default for ArchiveSelection {
    fn default() -> Self {
        Self { modern: true, legacy: true }
    }
}

/// Trait for archive format implementations.
pub trait Exporter {
    /// Write this format's members into `archive`.
    fn write_entries(
        &self,
        request: &ExportRequest<'_>,
        archive: &mut StagedArchive,
        options: &ExportOptions,
    ) -> Result<()>;

    /// File name of the archive for a given base name.
    fn archive_name(&self, name: &str) -> String;

    /// Get the format name for this exporter.
    fn format_name(&self) -> &'static str;

    /// Build the archive in a temporary file without publishing it.
    ///
    /// `cancel` is checked before every member is written.
    fn stage(
        &self,
        request: &ExportRequest<'_>,
        options: &ExportOptions,
        cancel: &CancelToken,
    ) -> Result<StagedArchive> {
        request.validate()?;
        let target = request.destination.join(self.archive_name(request.name.trim()));
        let mut archive = StagedArchive::create(&target, cancel)?;
        self.write_entries(request, &mut archive, options)?;
        Ok(archive)
    }

    /// Build the archive and move it to its final path.
    fn export(
        &self,
        request: &ExportRequest<'_>,
        options: &ExportOptions,
        cancel: &CancelToken,
    ) -> Result<PathBuf> {
        let archive = self.stage(request, options, cancel)?;
        ensure_not_cancelled(cancel)?;
        let path = archive.commit()?;
        log::info!("wrote {} archive {}", self.format_name(), path.display());
        Ok(path)
    }
}

/// Write the selected archives for `request`.
///
/// Every archive is staged before any is published. If publishing one fails
/// or `cancel` is set in between, archives already moved into place by this
/// call are removed again.
pub fn export_all(
    request: &ExportRequest<'_>,
    selection: ArchiveSelection,
    options: &ExportOptions,
    cancel: &CancelToken,
) -> Result<Vec<PathBuf>> {
    let mut exporters: Vec<&dyn Exporter> = Vec::new();
    if selection.modern {
        exporters.push(&ModernExporter);
    }
    if selection.legacy {
        exporters.push(&LegacyExporter);
    }

    let staged = exporters
        .iter()
        .map(|exporter| exporter.stage(request, options, cancel))
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::with_capacity(staged.len());
    for archive in staged {
        match ensure_not_cancelled(cancel).and_then(|()| archive.commit()) {
            Ok(path) => {
                log::info!("wrote {}", path.display());
                written.push(path);
            }
            Err(e) => {
                remove_all(&written);
                return Err(e);
            }
        }
    }
    Ok(written)
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("failed to remove {}: {}", path.display(), e);
        }
    }
}

pub(crate) fn ensure_not_cancelled(cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() {
        log::info!("export cancelled");
        Err(ExportError::Cancelled)
    } else {
        Ok(())
    }
}
