//! Sprite store shared by every chip that draws tiles

use crate::cartridge::{CartridgeChip, CartridgeError};
use crate::chip::{Chip, ChipError, ChipKind, ChipResolver};
use crate::color::Color;
use crate::sprite::{Sprite, SpriteId};
use crate::texture::TextureData;
use thiserror::Error;
use tracing::debug;

/// A texture whose size differs from the chip's sprite size.
///
/// Text layout spaces glyph cells by the sprite size, so every stored sprite
/// must match it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sprite is {width}x{height} but the chip stores {expected_width}x{expected_height} sprites")]
pub struct SpriteSizeError {
    pub width: u32,
    pub height: u32,
    pub expected_width: u32,
    pub expected_height: u32,
}

/// Owns the pixel data of every sprite; other chips refer to sprites by [`SpriteId`].
#[derive(Debug, Clone, Default)]
pub struct SpriteChip {
    sprite_width: u32,
    sprite_height: u32,
    sprites: Vec<TextureData>,
}

impl SpriteChip {
    /// Create an empty store for sprites of `sprite_width` x `sprite_height`.
    pub fn new(sprite_width: u32, sprite_height: u32) -> Self {
        Self {
            sprite_width,
            sprite_height,
            sprites: Vec::new(),
        }
    }

    pub fn sprite_width(&self) -> u32 {
        self.sprite_width
    }

    pub fn sprite_height(&self) -> u32 {
        self.sprite_height
    }

    /// Replace the whole store. Sprite ids are the positions in `sprites`.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteSizeError`] for the first texture of the wrong size. The
    /// store is left untouched.
    pub fn load_sprites(&mut self, sprites: Vec<TextureData>) -> Result<usize, SpriteSizeError> {
        for texture in &sprites {
            self.check_size(texture)?;
        }
        Ok(self.replace_sprites(sprites))
    }

    /// Slice the bound cartridge's sheet at this chip's sprite size and load the tiles.
    pub fn load_from_cartridge<F>(
        &mut self,
        cartridge: &CartridgeChip,
        resolve_color: F,
    ) -> Result<usize, CartridgeError>
    where
        F: FnMut(&[u8]) -> Color,
    {
        let tiles = cartridge.sprites(self.sprite_width, self.sprite_height, resolve_color)?;
        Ok(self.replace_sprites(tiles))
    }

    /// Append one sprite and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteSizeError`] if `texture` is not exactly the sprite size.
    pub fn add_sprite(&mut self, texture: TextureData) -> Result<SpriteId, SpriteSizeError> {
        self.check_size(&texture)?;
        self.sprites.push(texture);
        Ok(SpriteId((self.sprites.len() - 1) as u32))
    }

    pub fn get_sprite(&self, id: SpriteId) -> Option<Sprite<'_>> {
        self.sprites.get(id.index()).map(Sprite::from_texture)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    fn check_size(&self, texture: &TextureData) -> Result<(), SpriteSizeError> {
        let (width, height) = texture.dimensions();
        if (width, height) != (self.sprite_width, self.sprite_height) {
            debug!(width, height, "rejected sprite of the wrong size");
            return Err(SpriteSizeError {
                width,
                height,
                expected_width: self.sprite_width,
                expected_height: self.sprite_height,
            });
        }
        Ok(())
    }

    fn replace_sprites(&mut self, sprites: Vec<TextureData>) -> usize {
        self.sprites = sprites;
        debug!(count = self.sprites.len(), "sprites loaded");
        self.sprites.len()
    }
}

impl Chip for SpriteChip {
    fn kind(&self) -> ChipKind {
        ChipKind::Sprite
    }

    fn init(&mut self, _resolver: &dyn ChipResolver) -> Result<(), ChipError> {
        Ok(())
    }

    fn destroy(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::{rgba_resolver, Cartridge, RawSheet};
    use image::Rgba;

    fn solid(color: Color) -> TextureData {
        TextureData::from_pixels(2, 2, vec![color; 4]).unwrap()
    }

    #[test]
    fn test_add_and_get_sprite() {
        let mut chip = SpriteChip::new(2, 2);
        let red = Rgba([255, 0, 0, 255]);

        let id = chip.add_sprite(solid(red)).unwrap();
        assert_eq!(id, SpriteId(0));
        assert_eq!(chip.add_sprite(solid(red)), Ok(SpriteId(1)));

        let sprite = chip.get_sprite(id).unwrap();
        assert_eq!((sprite.width(), sprite.height()), (2, 2));
        assert_eq!(sprite.pixels(), &[red; 4]);
        assert!(chip.get_sprite(SpriteId(2)).is_none());
    }

    #[test]
    fn test_load_replaces_store() {
        let mut chip = SpriteChip::new(2, 2);
        chip.add_sprite(solid(Rgba([1, 1, 1, 255]))).unwrap();

        let count = chip.load_sprites(vec![solid(Rgba([2, 2, 2, 255])); 3]).unwrap();
        assert_eq!(count, 3);
        assert_eq!(chip.len(), 3);
        assert_eq!(chip.get_sprite(SpriteId(0)).unwrap().pixels()[0], Rgba([2, 2, 2, 255]));
    }

    #[test]
    fn test_load_from_cartridge_uses_sprite_size() {
        let mut cartridge = CartridgeChip::new();
        cartridge.insert_cartridge(Cartridge {
            palette: Vec::new(),
            sheet: RawSheet::new(4, 2, 4, vec![7; 4 * 2 * 4]),
            script: String::new(),
        });

        let mut chip = SpriteChip::new(2, 2);
        assert_eq!(chip.load_from_cartridge(&cartridge, rgba_resolver).unwrap(), 2);
        assert_eq!(chip.get_sprite(SpriteId(1)).unwrap().pixels()[3], Rgba([7, 7, 7, 7]));
    }

    #[test]
    fn test_destroy_clears_everything() {
        let mut chip = SpriteChip::new(2, 2);
        chip.add_sprite(solid(Rgba([0, 0, 0, 255]))).unwrap();

        chip.destroy();
        assert!(chip.is_empty());
        assert_eq!(chip.sprite_width(), 0);
    }

    #[test]
    fn test_wrong_size_sprites_rejected() {
        let mut chip = SpriteChip::new(2, 2);
        chip.add_sprite(solid(Rgba([1, 1, 1, 255]))).unwrap();

        let wide = TextureData::new(3, 2);
        assert_eq!(
            chip.add_sprite(wide.clone()),
            Err(SpriteSizeError {
                width: 3,
                height: 2,
                expected_width: 2,
                expected_height: 2,
            })
        );
        assert_eq!(chip.len(), 1);

        let err = chip.load_sprites(vec![solid(Rgba([2, 2, 2, 255])), wide]).unwrap_err();
        assert_eq!(err.to_string(), "sprite is 3x2 but the chip stores 2x2 sprites");
        assert_eq!(chip.len(), 1);
        assert_eq!(chip.get_sprite(SpriteId(0)).unwrap().pixels()[0], Rgba([1, 1, 1, 255]));
    }
}
