//! Owned pixel buffers produced by text rasterization and sprite-sheet slicing

use crate::color::{Color, TRANSPARENT};
use image::RgbaImage;
use std::collections::TryReserveError;
use thiserror::Error;

/// Error when a texture buffer cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureError {
    /// `width * height` does not fit in memory addressing
    #[error("texture {width}x{height} is too large")]
    TooLarge { width: u64, height: u64 },
    /// The allocator refused the pixel buffer
    #[error("failed to allocate a {width}x{height} texture")]
    Allocation {
        width: u32,
        height: u32,
        #[source]
        source: TryReserveError,
    },
}

/// A width x height buffer of colors, stored row-major.
///
/// Every pixel of a fresh texture is [`TRANSPARENT`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureData {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl TextureData {
    /// Allocate a transparent texture.
    ///
    /// # Panics
    ///
    /// Panics if the buffer cannot be allocated, like `vec!`. Use
    /// [`TextureData::try_new`] where the size comes from untrusted input.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Allocate a transparent texture, reporting allocation failure instead of aborting.
    pub fn try_new(width: u32, height: u32) -> Result<Self, TextureError> {
        let len = pixel_len(width, height).ok_or(TextureError::TooLarge {
            width: width as u64,
            height: height as u64,
        })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|source| TextureError::Allocation { width, height, source })?;
        pixels.resize(len, TRANSPARENT);

        Ok(Self { width, height, pixels })
    }

    /// Wrap an existing buffer. Returns `None` when `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        if pixel_len(width, height)? != pixels.len() {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    /// Copy an `image` buffer into a texture.
    pub fn from_image(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.pixels().copied().collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Get the pixel at (x, y), or `None` outside the texture.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index_of(x, y).map(|idx| self.pixels[idx])
    }

    /// Set the pixel at (x, y). Writes outside the texture are dropped and return `false`.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) -> bool {
        match self.index_of(x, y) {
            Some(idx) => {
                self.pixels[idx] = color;
                true
            }
            None => false,
        }
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Convert to an `image` buffer for encoding.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            self.pixels[y as usize * self.width as usize + x as usize]
        })
    }

    fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

fn pixel_len(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)
}
