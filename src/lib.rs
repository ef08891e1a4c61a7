//! Pixelchips - a small set of fantasy-console chips
//!
//! This library provides:
//! - A typed chip registry with a two-phase boot and shutdown lifecycle
//! - A cartridge chip that hands out palettes, sprite tiles and scripts
//! - A sprite chip and a font chip that rasterizes ASCII text from sprites
//! - A display chip holding the framebuffer
//!
//! # Example
//!
//! ```
//! use pixelchips::chip::ChipSet;
//! use pixelchips::font::FontChip;
//! use pixelchips::sprite::SpriteId;
//! use pixelchips::sprite_chip::SpriteChip;
//! use pixelchips::texture::TextureData;
//!
//! let mut chips = ChipSet::new();
//! let sprites = chips.insert(SpriteChip::new(8, 8)).unwrap();
//! let fonts = chips.insert(FontChip::new()).unwrap();
//! chips.boot().unwrap();
//!
//! sprites.borrow_mut().load_sprites(vec![TextureData::new(8, 8); 96]).unwrap();
//! let ids: Vec<SpriteId> = (0..96).map(SpriteId).collect();
//! fonts.borrow_mut().add_font("main", &ids);
//!
//! let texture = fonts.borrow().convert_text_to_texture("HI", "main", 1).unwrap();
//! assert_eq!(texture.dimensions(), (18, 8));
//! chips.shutdown();
//! ```

pub mod cartridge;
pub mod chip;
pub mod cli;
pub mod color;
pub mod config;
pub mod display;
pub mod font;
pub mod output;
pub mod sprite;
pub mod sprite_chip;
pub mod texture;

pub use chip::{Chip, ChipError, ChipKind, ChipSet};
pub use color::Color;
pub use texture::TextureData;
