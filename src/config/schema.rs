//! Configuration schema types for `chips.toml`
//!
//! Defines the structure and validation rules for a console's chip set.

use crate::font::{GLYPH_COUNT, MAX_FONTS, MAX_FONT_NAME_LEN};
use serde::{Deserialize, Serialize};

/// Width and height of a chip surface, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeConfig {
    pub width: u32,
    pub height: u32,
}

fn default_display() -> SizeConfig {
    SizeConfig {
        width: 128,
        height: 128,
    }
}

fn default_sprites() -> SizeConfig {
    SizeConfig { width: 8, height: 8 }
}

/// Text rasterization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    /// Blank columns after every glyph
    #[serde(default = "default_letter_spacing")]
    pub letter_spacing: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            letter_spacing: default_letter_spacing(),
        }
    }
}

fn default_letter_spacing() -> u32 {
    1
}

/// A font preloaded into the font chip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontConfig {
    /// Font name used by text conversion calls
    pub name: String,
    /// Sprite id of the space glyph; later glyphs follow consecutively
    #[serde(default)]
    pub first_sprite: u32,
    /// Explicit glyph table, overrides `first_sprite` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyphs: Option<Vec<u32>>,
}

/// Complete chips.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChipsConfig {
    /// Display chip resolution
    #[serde(default = "default_display")]
    pub display: SizeConfig,
    /// Size of every sprite in the sprite chip
    #[serde(default = "default_sprites")]
    pub sprites: SizeConfig,
    /// Text rasterization settings
    #[serde(default)]
    pub text: TextConfig,
    /// Fonts loaded at startup
    #[serde(default)]
    pub fonts: Vec<FontConfig>,
}

impl Default for ChipsConfig {
    fn default() -> Self {
        Self {
            display: default_display(),
            sprites: default_sprites(),
            text: TextConfig::default(),
            fonts: Vec::new(),
        }
    }
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "fonts[0].name")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chips.toml: '{}' {}", self.field, self.message)
    }
}

impl ChipsConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        for (field, size) in [("display", self.display), ("sprites", self.sprites)] {
            if size.width == 0 || size.height == 0 {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "dimensions must be positive".to_string(),
                });
            }
        }

        // The font chip would silently overwrite slot 0 past this count
        if self.fonts.len() > MAX_FONTS {
            errors.push(ConfigValidationError {
                field: "fonts".to_string(),
                message: format!("at most {} fonts can be loaded", MAX_FONTS),
            });
        }

        for (i, font) in self.fonts.iter().enumerate() {
            if font.name.is_empty() {
                errors.push(ConfigValidationError {
                    field: format!("fonts[{}].name", i),
                    message: "must be a non-empty string".to_string(),
                });
            }
            if font.name.chars().count() > MAX_FONT_NAME_LEN {
                errors.push(ConfigValidationError {
                    field: format!("fonts[{}].name", i),
                    message: format!("must be at most {} characters", MAX_FONT_NAME_LEN),
                });
            }
            if font.glyphs.as_ref().is_some_and(|g| g.len() > GLYPH_COUNT) {
                errors.push(ConfigValidationError {
                    field: format!("fonts[{}].glyphs", i),
                    message: format!("must have at most {} entries", GLYPH_COUNT),
                });
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
