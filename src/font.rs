//! Font chip: ASCII-to-glyph mapping and text rasterization
//!
//! A font is a name plus a table of 96 sprite ids, one per character code
//! from `' '` (0x20) through DEL (0x7F). The chip
//! holds at most [`MAX_FONTS`] fonts and draws glyphs from the sprite chip it
//! binds during `init`.
//!
//! # Layout
//!
//! [`FontChip::convert_text_to_texture`] lays text out on a fixed grid:
//! every glyph is one sprite wide and tall, followed by `letter_spacing`
//! blank columns. Lines are separated by `'\n'`; empty lines are skipped.

use crate::chip::{Chip, ChipError, ChipKind, ChipResolver};
use crate::config::FontConfig;
use crate::sprite::SpriteId;
use crate::sprite_chip::SpriteChip;
use crate::texture::{TextureData, TextureError};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Number of font slots in the chip.
pub const MAX_FONTS: usize = 4;

/// Number of glyphs in a font table.
pub const GLYPH_COUNT: usize = 96;

/// Longest font name kept; longer names are truncated.
pub const MAX_FONT_NAME_LEN: usize = 63;

/// Character code of the first glyph in a font table.
const FIRST_GLYPH: u32 = ' ' as u32;

/// Upper bound of the glyph index clamp.
///
/// This is one past the last table entry. Index 96 never hits a real glyph and
/// resolves to [`MISSING_GLYPH`].
const GLYPH_INDEX_CLAMP: u32 = GLYPH_COUNT as u32;

/// Sprite id used for characters past the end of the table.
const MISSING_GLYPH: SpriteId = SpriteId(0);

/// Errors from the font chip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    /// No font with this name is loaded
    #[error("unknown font '{0}'")]
    UnknownFont(String),
    /// The caller's output buffer cannot hold one id per character
    #[error("output holds {len} sprite ids but the text has {needed} characters")]
    OutputTooShort { needed: usize, len: usize },
    /// The chip has not been booted, so it has no sprite chip to draw from
    #[error("font chip is not bound to a sprite chip")]
    Unbound,
    /// The output texture could not be created
    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Glyph table index for a character: `code - ' '`, clamped into `[0, 96]`.
///
/// Control characters map to the space glyph. Anything above DEL maps to
/// index 96, which lies one past the table.
pub fn glyph_index(ch: char) -> usize {
    (ch as u32).saturating_sub(FIRST_GLYPH).min(GLYPH_INDEX_CLAMP) as usize
}

/// A named table of glyph sprites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    name: String,
    map: [SpriteId; GLYPH_COUNT],
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: String::new(),
            map: [SpriteId::default(); GLYPH_COUNT],
        }
    }
}

impl Font {
    /// Build a font, truncating the name to 63 characters and the table to 96
    /// entries. Missing entries are zero.
    pub fn new(name: &str, sprite_ids: &[SpriteId]) -> Self {
        let mut font = Self {
            name: name.chars().take(MAX_FONT_NAME_LEN).collect(),
            ..Default::default()
        };
        let len = sprite_ids.len().min(GLYPH_COUNT);
        font.map[..len].copy_from_slice(&sprite_ids[..len]);
        font
    }

    /// A font whose glyphs are consecutive sprites starting at `first`.
    ///
    /// ```
    /// use pixelchips::font::Font;
    /// use pixelchips::sprite::SpriteId;
    ///
    /// let font = Font::sequential("mono", SpriteId(100));
    /// assert_eq!(font.sprite_for(' '), SpriteId(100));
    /// assert_eq!(font.sprite_for('A'), SpriteId(133));
    /// ```
    pub fn sequential(name: &str, first: SpriteId) -> Self {
        let ids: Vec<SpriteId> = (0..GLYPH_COUNT as u32)
            .map(|i| SpriteId(first.0.saturating_add(i)))
            .collect();
        Self::new(name, &ids)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// An empty name marks a free slot.
    pub fn is_unused(&self) -> bool {
        self.name.is_empty()
    }

    pub fn glyphs(&self) -> &[SpriteId; GLYPH_COUNT] {
        &self.map
    }

    /// Sprite id drawn for `ch`.
    pub fn sprite_for(&self, ch: char) -> SpriteId {
        self.map.get(glyph_index(ch)).copied().unwrap_or(MISSING_GLYPH)
    }
}

/// Lines of `text` as drawn: split on `'\n'`, empty segments skipped.
fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.is_empty())
}

/// Holds up to [`MAX_FONTS`] fonts and rasterizes text with them.
#[derive(Debug, Default)]
pub struct FontChip {
    fonts: [Font; MAX_FONTS],
    sprites: Option<Rc<RefCell<SpriteChip>>>,
}

impl FontChip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chip preloaded with the fonts declared in configuration.
    pub fn from_config(fonts: &[FontConfig]) -> Self {
        let mut chip = Self::new();
        for font in fonts {
            match &font.glyphs {
                Some(glyphs) => {
                    let ids: Vec<SpriteId> = glyphs.iter().copied().map(SpriteId).collect();
                    chip.add_font(&font.name, &ids);
                }
                None => {
                    let sequential = Font::sequential(&font.name, SpriteId(font.first_sprite));
                    chip.add_font(&font.name, sequential.glyphs());
                }
            }
        }
        chip
    }

    /// Store a font and return the slot it went into.
    ///
    /// The first slot with an empty name is used. When every slot is taken
    /// the font overwrites slot 0, whichever font is there.
    pub fn add_font(&mut self, name: &str, sprite_ids: &[SpriteId]) -> usize {
        let slot = match self.fonts.iter().position(Font::is_unused) {
            Some(slot) => slot,
            None => {
                warn!(
                    font = name,
                    evicted = self.fonts[0].name(),
                    "font table full, overwriting slot 0"
                );
                0
            }
        };
        self.fonts[slot] = Font::new(name, sprite_ids);
        debug!(font = name, slot, "font added");
        slot
    }

    /// First loaded font named `name`.
    pub fn font(&self, name: &str) -> Option<&Font> {
        self.fonts.iter().find(|font| !font.is_unused() && font.name == name)
    }

    /// The font in slot `slot`, used or not.
    pub fn slot(&self, slot: usize) -> Option<&Font> {
        self.fonts.get(slot)
    }

    /// All loaded fonts, in slot order.
    pub fn fonts(&self) -> impl Iterator<Item = &Font> {
        self.fonts.iter().filter(|font| !font.is_unused())
    }

    pub fn is_bound(&self) -> bool {
        self.sprites.is_some()
    }

    /// Whether this chip draws from exactly `sprites`.
    pub fn is_bound_to(&self, sprites: &Rc<RefCell<SpriteChip>>) -> bool {
        self.sprites.as_ref().is_some_and(|bound| Rc::ptr_eq(bound, sprites))
    }

    /// Write the glyph sprite id of every character of `text` into `out`.
    ///
    /// Returns the number of ids written. On error `out` is left untouched.
    ///
    /// # Errors
    ///
    /// * [`FontError::UnknownFont`] if no font is named `font_name`
    /// * [`FontError::OutputTooShort`] if `out` has fewer slots than `text` has characters
    pub fn convert_text_to_sprites(
        &self,
        text: &str,
        font_name: &str,
        out: &mut [SpriteId],
    ) -> Result<usize, FontError> {
        let font = self.find_font(font_name)?;

        let needed = text.chars().count();
        if out.len() < needed {
            return Err(FontError::OutputTooShort {
                needed,
                len: out.len(),
            });
        }

        for (slot, ch) in out.iter_mut().zip(text.chars()) {
            *slot = font.sprite_for(ch);
        }
        Ok(needed)
    }

    /// Rasterize `text` with the font `font_name` into a new texture.
    ///
    /// The texture is `(glyph_width + letter_spacing) * longest_line` wide and
    /// `glyph_height * line_count` tall. Glyphs whose sprite is missing leave
    /// their cell transparent.
    ///
    /// After each line the pen moves down by the full texture height, not by
    /// one glyph row. Only the first line lands inside the texture; the rows
    /// reserved for later lines stay transparent.
    pub fn convert_text_to_texture(
        &self,
        text: &str,
        font_name: &str,
        letter_spacing: u32,
    ) -> Result<TextureData, FontError> {
        let font = self.find_font(font_name)?;
        let sprites = self.sprites.as_ref().ok_or(FontError::Unbound)?.borrow();

        let (line_count, longest_line) = text_lines(text).fold((0u32, 0usize), |(n, longest), line| {
            (n + 1, longest.max(line.chars().count()))
        });

        let cell_width = sprites.sprite_width() as u64 + letter_spacing as u64;
        let glyph_height = sprites.sprite_height() as u64;
        let width = cell_width * longest_line as u64;
        let height = glyph_height * line_count as u64;
        let (Ok(texture_width), Ok(texture_height)) = (u32::try_from(width), u32::try_from(height))
        else {
            return Err(TextureError::TooLarge { width, height }.into());
        };

        let mut texture = TextureData::try_new(texture_width, texture_height)?;

        let mut y = 0u32;
        for line in text_lines(text) {
            for (column, ch) in line.chars().enumerate() {
                let id = font.sprite_for(ch);
                let Some(sprite) = sprites.get_sprite(id) else {
                    trace!(%id, ?ch, "glyph sprite missing");
                    continue;
                };
                // column < longest_line, so the product fits in the texture width
                let x = (column as u64 * cell_width) as u32;
                sprite.copy_to_texture_at(&mut texture, x, y);
            }
            y = y.saturating_add(texture_height);
        }

        Ok(texture)
    }

    fn find_font(&self, name: &str) -> Result<&Font, FontError> {
        self.font(name)
            .ok_or_else(|| FontError::UnknownFont(name.to_string()))
    }
}

impl Chip for FontChip {
    fn kind(&self) -> ChipKind {
        ChipKind::Font
    }

    fn init(&mut self, resolver: &dyn ChipResolver) -> Result<(), ChipError> {
        self.sprites = Some(resolver.require::<SpriteChip>()?);
        Ok(())
    }

    fn destroy(&mut self) {
        *self = Self::default();
    }
}
