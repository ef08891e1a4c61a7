//! Configuration loading and discovery for `chips.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{ChipsConfig, SizeConfig};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name searched for by [`find_config`]
pub const CONFIG_FILE_NAME: &str = "chips.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse chips.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override sprite size
    pub sprite_size: Option<(u32, u32)>,
    /// Override letter spacing
    pub letter_spacing: Option<u32>,
}

/// Find chips.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find chips.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        // Move to parent directory
        if !current.pop() {
            // Reached root, no config found
            return None;
        }
    }
}

/// Load configuration from a chips.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// # Returns
/// - `Ok(ChipsConfig)` on success
/// - `Err(ConfigError)` if the file cannot be read, parsed or validated
pub fn load_config(path: Option<&Path>) -> Result<ChipsConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            debug!("no chips.toml found, using defaults");
            Ok(ChipsConfig::default())
        }
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<ChipsConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: ChipsConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    debug!(path = %path.display(), fonts = config.fonts.len(), "config loaded");
    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut ChipsConfig, overrides: &CliOverrides) {
    if let Some((width, height)) = overrides.sprite_size {
        config.sprites = SizeConfig { width, height };
    }

    if let Some(letter_spacing) = overrides.letter_spacing {
        config.text.letter_spacing = letter_spacing;
    }
}
