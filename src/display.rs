//! Display chip: the console's framebuffer

use crate::chip::{Chip, ChipError, ChipKind, ChipResolver};
use crate::color::Color;
use crate::sprite::Sprite;
use crate::texture::{TextureData, TextureError};

/// A fixed-size framebuffer other parts of the console draw into.
#[derive(Debug, Clone)]
pub struct DisplayChip {
    framebuffer: TextureData,
}

impl Default for DisplayChip {
    fn default() -> Self {
        Self {
            framebuffer: TextureData::default(),
        }
    }
}

impl DisplayChip {
    /// Create a transparent screen of `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// Returns a [`TextureError`] when the framebuffer cannot be allocated.
    pub fn new(width: u32, height: u32) -> Result<Self, TextureError> {
        Ok(Self {
            framebuffer: TextureData::try_new(width, height)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    /// Number of pixels on screen: width x height.
    pub fn pixel_count(&self) -> usize {
        self.framebuffer.pixels().len()
    }

    /// Pixel at a row-major index, or `None` past the end.
    pub fn pixel_at(&self, idx: usize) -> Option<Color> {
        self.framebuffer.pixels().get(idx).copied()
    }

    pub fn framebuffer(&self) -> &TextureData {
        &self.framebuffer
    }

    pub fn clear(&mut self, color: Color) {
        self.framebuffer.fill(color);
    }

    /// Draw `texture` with its top-left corner at (x, y), clipped to the screen.
    pub fn draw_texture(&mut self, texture: &TextureData, x: u32, y: u32) {
        Sprite::from_texture(texture).copy_to_texture_at(&mut self.framebuffer, x, y);
    }
}

impl Chip for DisplayChip {
    fn kind(&self) -> ChipKind {
        ChipKind::Display
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
    use crate::color::TRANSPARENT;
    use image::Rgba;

    #[test]
    fn test_pixel_queries() {
        let display = DisplayChip::new(4, 3).unwrap();
        assert_eq!(display.pixel_count(), 12);
        assert_eq!(display.pixel_at(11), Some(TRANSPARENT));
        assert_eq!(display.pixel_at(12), None);
    }

    #[test]
    fn test_draw_texture_clips() {
        let red = Rgba([255, 0, 0, 255]);
        let mut display = DisplayChip::new(4, 4).unwrap();
        let texture = TextureData::from_pixels(2, 2, vec![red; 4]).unwrap();

        display.draw_texture(&texture, 3, 3);
        assert_eq!(display.pixel_at(15), Some(red));
        assert_eq!(display.pixels_set(red), 1);
    }

    #[test]
    fn test_clear_and_destroy() {
        let blue = Rgba([0, 0, 255, 255]);
        let mut display = DisplayChip::new(2, 2).unwrap();
        display.clear(blue);
        assert_eq!(display.pixels_set(blue), 4);

        display.destroy();
        assert_eq!(display.pixel_count(), 0);
    }

    #[test]
    fn test_oversized_screen_is_an_error() {
        let err = DisplayChip::new(u32::MAX, u32::MAX).unwrap_err();
        assert!(matches!(
            err,
            TextureError::Allocation { width: u32::MAX, height: u32::MAX, .. }
                | TextureError::TooLarge { .. }
        ));
    }

    impl DisplayChip {
        fn pixels_set(&self, color: Color) -> usize {
            self.framebuffer.pixels().iter().filter(|p| **p == color).count()
        }
    }
}
