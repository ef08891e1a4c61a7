//! Sprite handles and the sprite-to-texture blit

use crate::color::Color;
use crate::texture::TextureData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a sprite owned by the sprite chip.
///
/// The default id (0) doubles as the "missing glyph" value in font tables.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SpriteId(pub u32);

impl SpriteId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for SpriteId {
    fn from(id: u32) -> Self {
        SpriteId(id)
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A borrowed view of one sprite's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite<'a> {
    width: u32,
    height: u32,
    pixels: &'a [Color],
}

impl<'a> Sprite<'a> {
    /// View `pixels` as a `width` x `height` sprite. Returns `None` on a length mismatch.
    pub fn new(width: u32, height: u32, pixels: &'a [Color]) -> Option<Self> {
        if (width as usize).checked_mul(height as usize)? != pixels.len() {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    pub fn from_texture(texture: &'a TextureData) -> Self {
        Self {
            width: texture.width(),
            height: texture.height(),
            pixels: texture.pixels(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &'a [Color] {
        self.pixels
    }

    /// Copy every pixel of the sprite into `dest` with its top-left corner at (x, y).
    ///
    /// Pixels that land outside `dest` are dropped. Returns the number of pixels written.
    pub fn copy_to_texture_at(&self, dest: &mut TextureData, x: u32, y: u32) -> usize {
        let mut written = 0;
        for sy in 0..self.height {
            let Some(dy) = y.checked_add(sy).filter(|dy| *dy < dest.height()) else {
                break;
            };
            let start = sy as usize * self.width as usize;
            let row = &self.pixels[start..start + self.width as usize];
            for (sx, color) in row.iter().enumerate() {
                let Some(dx) = x.checked_add(sx as u32) else {
                    break;
                };
                if !dest.put_pixel(dx, dy, *color) {
                    break;
                }
                written += 1;
            }
        }
        written
    }
}
