//! Configuration schema types for `composer.toml`
//!
//! Defines the structure and validation rules for conversion and export settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::normalize::DEFAULT_TOLERANCE;

/// Pixel processing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Per-channel tolerance for snapping near-white/near-black pixels
    #[serde(default = "default_tolerance")]
    pub tolerance: u8,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self { tolerance: default_tolerance() }
    }
}

fn default_tolerance() -> u8 {
    DEFAULT_TOLERANCE
}

/// Archive output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory archives are written to
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// Cross-assign palette substitutes in exported metadata
    #[serde(default)]
    pub swap_palette: bool,
    /// Write `<name>.zip`
    #[serde(default = "default_true")]
    pub modern: bool,
    /// Write `<name>-legacy.zip`
    #[serde(default = "default_true")]
    pub legacy: bool,
    /// Credits used when none are given on the command line
    #[serde(default)]
    pub credits: String,
    /// Pretty print `data.json`
    #[serde(default)]
    pub pretty_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out: default_out(),
            swap_palette: false,
            modern: true,
            legacy: true,
            credits: String::new(),
            pretty_json: false,
        }
    }
}

fn default_out() -> PathBuf {
    PathBuf::from("export")
}

fn default_true() -> bool {
    true
}

/// Root configuration structure for `composer.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerConfig {
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "conversion.tolerance")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "composer.toml: '{}' {}", self.field, self.message)
    }
}

impl ComposerConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.conversion.tolerance == 0 {
            errors.push(ConfigValidationError {
                field: "conversion.tolerance".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if !self.export.modern && !self.export.legacy {
            errors.push(ConfigValidationError {
                field: "export".to_string(),
                message: "must enable at least one of 'modern' or 'legacy'".to_string(),
            });
        }

        if self.export.out.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "export.out".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        errors
    }
}
