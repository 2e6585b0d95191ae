//! Configuration loading and discovery for `composer.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::ComposerConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "composer.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse composer.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override snapping tolerance
    pub tolerance: Option<u8>,
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override palette direction
    pub swap_palette: Option<bool>,
    /// Override modern archive output
    pub modern: Option<bool>,
    /// Override legacy archive output
    pub legacy: Option<bool>,
    /// Override credits text
    pub credits: Option<String>,
}

/// Find composer.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for composer.toml
/// 2. Check XDG_CONFIG_HOME/spritecomposer/composer.toml (or ~/.config/spritecomposer/composer.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find composer.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("spritecomposer").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find composer.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a composer.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("sprites/composer.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<ComposerConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(ComposerConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<ComposerConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: ComposerConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut ComposerConfig, overrides: &CliOverrides) {
    if let Some(tolerance) = overrides.tolerance {
        config.conversion.tolerance = tolerance;
    }
    if let Some(ref out) = overrides.out {
        config.export.out = out.clone();
    }
    if let Some(swap) = overrides.swap_palette {
        config.export.swap_palette = swap;
    }
    if let Some(modern) = overrides.modern {
        config.export.modern = modern;
    }
    if let Some(legacy) = overrides.legacy {
        config.export.legacy = legacy;
    }
    if let Some(ref credits) = overrides.credits {
        config.export.credits = credits.clone();
    }
}
