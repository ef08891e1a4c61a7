//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod inspect;
mod render;
mod slice;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

use crate::cartridge::{load_cartridge, palette_resolver, rgba_resolver, CartridgeChip};
use crate::chip::ChipSet;
use crate::color::Color;
use crate::config::{load_config, merge_cli_overrides, ChipsConfig, CliOverrides, FontConfig};
use crate::sprite_chip::SpriteChip;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Font added when the configuration declares none
pub(crate) const DEFAULT_FONT: &str = "default";

/// Pixelchips - run a cartridge's assets through the console chips
#[derive(Parser)]
#[command(name = "pxchip")]
#[command(about = "Pixelchips - rasterize text and slice sprite sheets from cartridge assets")]
#[command(version)]
pub struct Cli {
    /// Path to chips.toml (default: search upwards from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render text with a cartridge font to PNG
    RenderText {
        /// Cartridge JSON file
        cartridge: PathBuf,

        /// Text to render; a literal `\n` starts a new line
        #[arg(short, long)]
        text: String,

        /// Font name from chips.toml
        #[arg(short, long, default_value = DEFAULT_FONT)]
        font: String,

        /// Output PNG file
        #[arg(short, long, default_value = "text.png")]
        output: PathBuf,

        /// Blank columns after every glyph (overrides chips.toml)
        #[arg(long)]
        spacing: Option<u32>,

        /// Scale output by integer factor (1-16, default: 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,
    },

    /// Slice a cartridge's sprite sheet into one PNG per tile
    Slice {
        /// Cartridge JSON file
        cartridge: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "tiles")]
        output: PathBuf,

        /// Tile size as WxH (default: sprite size from chips.toml)
        #[arg(long)]
        tile: Option<String>,

        /// Scale output by integer factor (1-16, default: 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,
    },

    /// Print a cartridge's palette
    Palette {
        /// Cartridge JSON file
        cartridge: PathBuf,
    },

    /// Print a cartridge's script
    Script {
        /// Cartridge JSON file
        cartridge: PathBuf,
    },
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::RenderText {
            cartridge,
            text,
            font,
            output,
            spacing,
            scale,
        } => render::run_render_text(
            config_path,
            &cartridge,
            &text,
            &font,
            &output,
            spacing,
            scale,
        ),
        Commands::Slice {
            cartridge,
            output,
            tile,
            scale,
        } => slice::run_slice(config_path, &cartridge, &output, tile.as_deref(), scale),
        Commands::Palette { cartridge } => inspect::run_palette(&cartridge),
        Commands::Script { cartridge } => inspect::run_script(&cartridge),
    }
}

/// Parse a `WxH` size such as `8x8`.
pub(crate) fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    if w == 0 || h == 0 {
        return None;
    }
    Some((w, h))
}

/// Load chips.toml and apply command-line overrides.
pub(crate) fn load_chips_config(
    path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<ChipsConfig, String> {
    let mut config = load_config(path).map_err(|e| e.to_string())?;
    merge_cli_overrides(&mut config, overrides);
    if config.fonts.is_empty() {
        config.fonts.push(FontConfig {
            name: DEFAULT_FONT.to_string(),
            first_sprite: 0,
            glyphs: None,
        });
    }
    Ok(config)
}

/// Color resolver matching the sheet's pixel size: one byte is a palette index,
/// three bytes are RGB and four bytes are RGBA.
///
/// Any other pixel size has no color interpretation and is rejected.
pub(crate) fn sheet_resolver(
    palette: &[Color],
    bytes_per_pixel: u32,
) -> Result<impl Fn(&[u8]) -> Color + '_, String> {
    if !matches!(bytes_per_pixel, 1 | 3 | 4) {
        return Err(format!(
            "unsupported sprite sheet format: {} bytes per pixel (expected 1, 3 or 4)",
            bytes_per_pixel
        ));
    }
    let by_index = palette_resolver(palette);
    Ok(move |raw: &[u8]| {
        if raw.len() == 1 {
            by_index(raw)
        } else {
            rgba_resolver(raw)
        }
    })
}

/// Build and boot a console from `config`, insert the cartridge and load its
/// sprite sheet into the sprite chip.
pub(crate) fn boot_console(config: &ChipsConfig, cartridge_path: &Path) -> Result<ChipSet, String> {
    let cartridge = load_cartridge(cartridge_path)
        .map_err(|e| format!("{}: {}", cartridge_path.display(), e))?;

    let mut chips = ChipSet::from_config(config).map_err(|e| e.to_string())?;
    chips.boot().map_err(|e| e.to_string())?;

    let (Some(cartridge_chip), Some(sprites)) =
        (chips.get::<CartridgeChip>(), chips.get::<SpriteChip>())
    else {
        return Err("console is missing its cartridge or sprite chip".to_string());
    };

    cartridge_chip.borrow_mut().insert_cartridge(cartridge);
    let cartridge_chip = cartridge_chip.borrow();
    let cartridge = cartridge_chip.cartridge().map_err(|e| e.to_string())?;
    let resolver = sheet_resolver(&cartridge.palette, cartridge.sheet.bytes_per_pixel)
        .map_err(|e| format!("{}: {}", cartridge_path.display(), e))?;
    let count = sprites
        .borrow_mut()
        .load_from_cartridge(&cartridge_chip, resolver)
        .map_err(|e| format!("{}: {}", cartridge_path.display(), e))?;
    debug!(sprites = count, "console booted");

    Ok(chips)
}
