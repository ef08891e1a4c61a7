//! Cartridge chip: palette, sprite-sheet and script extraction
//!
//! A [`Cartridge`] is the decoded asset blob of a game: a color palette, a raw
//! sprite sheet and the script source. The [`CartridgeChip`] hands these out
//! to the rest of the console. It never interprets the raw pixel format of the
//! sheet itself; callers pass a color resolver that turns the raw bytes of one
//! pixel into a [`Color`].
//!
//! # Cartridge JSON
//!
//! ```json
//! {
//!   "palette": ["#000000", "#FFFFFF"],
//!   "sheet": { "width": 16, "height": 8, "bytes_per_pixel": 1, "data": [0, 1, 1, 0] },
//!   "script": "print('hello')"
//! }
//! ```

use crate::chip::{Chip, ChipError, ChipKind, ChipResolver};
use crate::color::{hex_palette, Color, TRANSPARENT};
use crate::texture::{TextureData, TextureError};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors from cartridge access and decoding.
#[derive(Debug, Error)]
pub enum CartridgeError {
    /// No cartridge is inserted in the chip
    #[error("no cartridge inserted")]
    NoCartridge,
    /// Tiles must be at least one pixel wide and tall
    #[error("invalid tile size {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },
    /// Raw pixels must take at least one byte
    #[error("sprite sheet declares zero bytes per pixel")]
    ZeroBytesPerPixel,
    /// Sheet dimensions overflow addressable memory
    #[error("sprite sheet {width}x{height} is too large")]
    SheetTooLarge { width: u32, height: u32 },
    /// Raw data is shorter than the declared sheet dimensions
    #[error("sprite sheet {width}x{height} needs {expected} bytes but has {actual}")]
    SheetTruncated {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    /// A tile texture could not be created
    #[error(transparent)]
    Texture(#[from] TextureError),
    /// Cartridge file could not be read
    #[error("failed to read cartridge: {0}")]
    Io(#[from] std::io::Error),
    /// Cartridge file is not valid cartridge JSON
    #[error("failed to decode cartridge: {0}")]
    Decode(#[from] serde_json::Error),
}

fn default_bytes_per_pixel() -> u32 {
    1
}

/// Undecoded sprite-sheet pixels, row-major, `bytes_per_pixel` bytes each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSheet {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_bytes_per_pixel")]
    pub bytes_per_pixel: u32,
    #[serde(default)]
    pub data: Vec<u8>,
}

impl Default for RawSheet {
    fn default() -> Self {
        Self::new(0, 0, default_bytes_per_pixel(), Vec::new())
    }
}

impl RawSheet {
    pub fn new(width: u32, height: u32, bytes_per_pixel: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bytes_per_pixel,
            data,
        }
    }

    /// Raw bytes of the pixel at (x, y), or `None` outside the sheet or past the data.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.bytes_per_pixel as usize;
        let offset = (y as usize * self.width as usize + x as usize) * bpp;
        self.data.get(offset..offset + bpp)
    }

    /// Check that the data covers every declared pixel.
    fn validate(&self) -> Result<(), CartridgeError> {
        if self.bytes_per_pixel == 0 {
            return Err(CartridgeError::ZeroBytesPerPixel);
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.bytes_per_pixel as usize))
            .ok_or(CartridgeError::SheetTooLarge {
                width: self.width,
                height: self.height,
            })?;
        if self.data.len() < expected {
            return Err(CartridgeError::SheetTruncated {
                width: self.width,
                height: self.height,
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

/// The decoded asset blob of one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cartridge {
    #[serde(with = "hex_palette", default)]
    pub palette: Vec<Color>,
    #[serde(default)]
    pub sheet: RawSheet,
    #[serde(default)]
    pub script: String,
}

impl Cartridge {
    /// Decode a cartridge from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, CartridgeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CartridgeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read and decode a cartridge JSON file.
pub fn load_cartridge(path: &Path) -> Result<Cartridge, CartridgeError> {
    let json = fs::read_to_string(path)?;
    let cartridge = Cartridge::from_json(&json)?;
    debug!(
        path = %path.display(),
        colors = cartridge.palette.len(),
        sheet_width = cartridge.sheet.width,
        sheet_height = cartridge.sheet.height,
        "cartridge loaded"
    );
    Ok(cartridge)
}

/// Color resolver for sheets that store one palette index byte per pixel.
///
/// Indices outside the palette resolve to transparent.
pub fn palette_resolver(palette: &[Color]) -> impl Fn(&[u8]) -> Color + '_ {
    move |raw: &[u8]| {
        raw.first()
            .and_then(|idx| palette.get(*idx as usize))
            .copied()
            .unwrap_or(TRANSPARENT)
    }
}

/// Color resolver for sheets that store RGBA (or RGB, opaque) bytes per pixel.
pub fn rgba_resolver(raw: &[u8]) -> Color {
    match raw {
        [r, g, b, a, ..] => Rgba([*r, *g, *b, *a]),
        [r, g, b] => Rgba([*r, *g, *b, 255]),
        _ => TRANSPARENT,
    }
}

/// Slot for a [`Cartridge`]; hands out its palette, sprite tiles and script.
#[derive(Debug, Default)]
pub struct CartridgeChip {
    cartridge: Option<Cartridge>,
}

impl CartridgeChip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cartridge, returning the one it replaces.
    pub fn insert_cartridge(&mut self, cartridge: Cartridge) -> Option<Cartridge> {
        debug!(colors = cartridge.palette.len(), "cartridge inserted");
        self.cartridge.replace(cartridge)
    }

    pub fn eject(&mut self) -> Option<Cartridge> {
        self.cartridge.take()
    }

    pub fn is_inserted(&self) -> bool {
        self.cartridge.is_some()
    }

    pub fn cartridge(&self) -> Result<&Cartridge, CartridgeError> {
        self.cartridge.as_ref().ok_or(CartridgeError::NoCartridge)
    }

    /// The palette exactly as stored in the cartridge.
    pub fn colors(&self) -> Result<&[Color], CartridgeError> {
        Ok(&self.cartridge()?.palette)
    }

    /// The script source exactly as stored in the cartridge.
    pub fn script(&self) -> Result<&str, CartridgeError> {
        Ok(&self.cartridge()?.script)
    }

    /// Slice the sprite sheet into `tile_width` x `tile_height` tiles.
    ///
    /// Tiles come out row-major: left to right, then top to bottom. Partial
    /// tiles at the right and bottom edges are dropped. Every pixel's color is
    /// `resolve_color` applied to that pixel's raw bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use pixelchips::cartridge::{palette_resolver, Cartridge, CartridgeChip, RawSheet};
    /// use image::Rgba;
    ///
    /// let mut chip = CartridgeChip::new();
    /// chip.insert_cartridge(Cartridge {
    ///     palette: vec![Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255])],
    ///     sheet: RawSheet::new(4, 2, 1, vec![0, 0, 1, 1, 0, 0, 1, 1]),
    ///     script: String::new(),
    /// });
    ///
    /// let palette = chip.colors().unwrap();
    /// let tiles = chip.sprites(2, 2, palette_resolver(palette)).unwrap();
    /// assert_eq!(tiles.len(), 2);
    /// assert_eq!(tiles[1].get_pixel(0, 0), Some(Rgba([255, 255, 255, 255])));
    /// ```
    pub fn sprites<F>(
        &self,
        tile_width: u32,
        tile_height: u32,
        mut resolve_color: F,
    ) -> Result<Vec<TextureData>, CartridgeError>
    where
        F: FnMut(&[u8]) -> Color,
    {
        let sheet = &self.cartridge()?.sheet;
        if tile_width == 0 || tile_height == 0 {
            return Err(CartridgeError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        sheet.validate()?;

        let columns = sheet.width / tile_width;
        let rows = sheet.height / tile_height;
        let bpp = sheet.bytes_per_pixel as usize;

        let mut tiles = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            for column in 0..columns {
                let mut tile = TextureData::try_new(tile_width, tile_height)?;
                for y in 0..tile_height {
                    let sheet_y = (row * tile_height + y) as usize;
                    for x in 0..tile_width {
                        let sheet_x = (column * tile_width + x) as usize;
                        let offset = (sheet_y * sheet.width as usize + sheet_x) * bpp;
                        tile.put_pixel(x, y, resolve_color(&sheet.data[offset..offset + bpp]));
                    }
                }
                tiles.push(tile);
            }
        }

        debug!(count = tiles.len(), tile_width, tile_height, "sprite sheet sliced");
        Ok(tiles)
    }
}

impl Chip for CartridgeChip {
    fn kind(&self) -> ChipKind {
        ChipKind::Cartridge
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

    const BLACK: Color = Rgba([0, 0, 0, 255]);
    const WHITE: Color = Rgba([255, 255, 255, 255]);
    const RED: Color = Rgba([255, 0, 0, 255]);

    /// A 4x4 one-byte-per-pixel sheet where each pixel stores `x + 4 * y`.
    fn counting_sheet() -> RawSheet {
        RawSheet::new(4, 4, 1, (0..16).collect())
    }

    fn chip_with(sheet: RawSheet) -> CartridgeChip {
        let mut chip = CartridgeChip::new();
        chip.insert_cartridge(Cartridge {
            palette: vec![BLACK, WHITE, RED],
            sheet,
            script: "print('hi')\n".to_string(),
        });
        chip
    }

    fn shade(raw: &[u8]) -> Color {
        Rgba([raw[0], raw[0], raw[0], 255])
    }

    #[test]
    fn test_colors_and_script_verbatim() {
        let chip = chip_with(counting_sheet());
        assert_eq!(chip.colors().unwrap(), &[BLACK, WHITE, RED]);
        assert_eq!(chip.script().unwrap(), "print('hi')\n");
    }

    #[test]
    fn test_no_cartridge() {
        let chip = CartridgeChip::new();
        assert!(matches!(chip.colors(), Err(CartridgeError::NoCartridge)));
        assert!(matches!(chip.script(), Err(CartridgeError::NoCartridge)));
        assert!(matches!(chip.sprites(1, 1, shade), Err(CartridgeError::NoCartridge)));
    }

    #[test]
    fn test_insert_replaces_and_eject() {
        let mut chip = chip_with(counting_sheet());
        let previous = chip.insert_cartridge(Cartridge {
            script: "second".to_string(),
            ..Default::default()
        });

        assert_eq!(previous.unwrap().script, "print('hi')\n");
        assert_eq!(chip.script().unwrap(), "second");
        assert!(chip.eject().is_some());
        assert!(!chip.is_inserted());
    }

    #[test]
    fn test_tiles_are_row_major() {
        let chip = chip_with(counting_sheet());
        let tiles = chip.sprites(2, 2, shade).unwrap();
        assert_eq!(tiles.len(), 4);

        // Top-left pixel of each tile: (0,0), (2,0), (0,2), (2,2)
        let corners: Vec<u8> = tiles.iter().map(|t| t.get_pixel(0, 0).unwrap()[0]).collect();
        assert_eq!(corners, vec![0, 2, 8, 10]);

        // Tile 3 covers sheet pixels 10, 11, 14, 15
        let last: Vec<u8> = tiles[3].pixels().iter().map(|p| p[0]).collect();
        assert_eq!(last, vec![10, 11, 14, 15]);
    }

    #[test]
    fn test_every_pixel_goes_through_resolver() {
        let chip = chip_with(counting_sheet());
        let mut calls = 0;
        let tiles = chip
            .sprites(4, 1, |raw: &[u8]| {
                calls += 1;
                shade(raw)
            })
            .unwrap();

        assert_eq!(tiles.len(), 4);
        assert_eq!(calls, 16);
    }

    #[test]
    fn test_partial_edge_tiles_dropped() {
        let chip = chip_with(RawSheet::new(5, 3, 1, vec![0; 15]));
        let tiles = chip.sprites(2, 2, shade).unwrap();
        assert_eq!(tiles.len(), 2);
        assert!(tiles.iter().all(|t| t.dimensions() == (2, 2)));

        assert!(chip.sprites(8, 8, shade).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_sheets() {
        let chip = chip_with(counting_sheet());
        assert!(matches!(
            chip.sprites(0, 2, shade),
            Err(CartridgeError::InvalidTileSize { width: 0, height: 2 })
        ));

        let chip = chip_with(RawSheet::new(4, 4, 2, vec![0; 20]));
        assert!(matches!(
            chip.sprites(2, 2, shade),
            Err(CartridgeError::SheetTruncated { expected: 32, actual: 20, .. })
        ));

        let chip = chip_with(RawSheet::new(4, 4, 0, Vec::new()));
        assert!(matches!(chip.sprites(2, 2, shade), Err(CartridgeError::ZeroBytesPerPixel)));
    }

    #[test]
    fn test_palette_resolver() {
        let palette = [BLACK, WHITE];
        let resolve = palette_resolver(&palette);
        assert_eq!(resolve(&[1u8][..]), WHITE);
        assert_eq!(resolve(&[2u8][..]), TRANSPARENT);
        assert_eq!(resolve(&[0u8; 0][..]), TRANSPARENT);
    }

    #[test]
    fn test_rgba_resolver() {
        assert_eq!(rgba_resolver(&[1, 2, 3, 4]), Rgba([1, 2, 3, 4]));
        assert_eq!(rgba_resolver(&[1, 2, 3]), Rgba([1, 2, 3, 255]));
        assert_eq!(rgba_resolver(&[1]), TRANSPARENT);
    }

    #[test]
    fn test_raw_pixel_access() {
        let sheet = RawSheet::new(2, 2, 2, vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(sheet.pixel(1, 1), Some(&[6, 7][..]));
        assert_eq!(sheet.pixel(2, 0), None);
    }

    #[test]
    fn test_json_decoding() {
        let json = r##"{
            "palette": ["#000", "#FFFFFF", "#FF000080"],
            "sheet": { "width": 2, "height": 1, "data": [2, 1] },
            "script": "x = 1"
        }"##;

        let cartridge = Cartridge::from_json(json).unwrap();
        assert_eq!(cartridge.palette, vec![BLACK, WHITE, Rgba([255, 0, 0, 128])]);
        assert_eq!(cartridge.sheet.bytes_per_pixel, 1);
        assert_eq!(cartridge.script, "x = 1");

        let again = Cartridge::from_json(&cartridge.to_json().unwrap()).unwrap();
        assert_eq!(again, cartridge);
    }

    #[test]
    fn test_json_rejects_bad_palette() {
        let err = Cartridge::from_json(r#"{ "palette": ["red"] }"#).unwrap_err();
        assert!(matches!(err, CartridgeError::Decode(_)));
        assert!(err.to_string().contains("must start with '#'"));
    }

    #[test]
    fn test_destroy_ejects() {
        let mut chip = chip_with(counting_sheet());
        chip.destroy();
        assert!(!chip.is_inserted());
        assert_eq!(chip.kind(), ChipKind::Cartridge);
    }
}
