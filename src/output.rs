//! PNG output and file path generation for textures

use crate::texture::TextureData;
use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image encoding error
    Image(image::ImageError),
    /// PNG cannot encode a texture with no pixels
    EmptyTexture,
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
            OutputError::EmptyTexture => write!(f, "texture has no pixels"),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
            OutputError::EmptyTexture => None,
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

/// Save a texture to a PNG file, scaled up by an integer factor.
///
/// Parent directories are created as needed.
pub fn save_png(texture: &TextureData, path: &Path, scale: u8) -> Result<(), OutputError> {
    if texture.is_empty() {
        return Err(OutputError::EmptyTexture);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    scale_image(texture.to_image(), scale).save(path)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges. A factor of 0 or 1 returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor as u32, h * factor as u32, FilterType::Nearest)
}

/// Path for the `index`-th tile sliced from a sheet: `dir/{prefix}_{index:03}.png`.
pub fn tile_output_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{}_{:03}.png", prefix, index))
}
