//! Slice command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::cartridge::{load_cartridge, CartridgeChip};
use crate::config::CliOverrides;
use crate::output::{save_png, tile_output_path};

use super::{load_chips_config, parse_size, sheet_resolver, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the slice command
pub fn run_slice(
    config_path: Option<&Path>,
    cartridge_path: &Path,
    output_dir: &Path,
    tile: Option<&str>,
    scale: u8,
) -> ExitCode {
    let tile_size = match tile.map(|t| (t, parse_size(t))) {
        None => None,
        Some((_, Some(size))) => Some(size),
        Some((raw, None)) => {
            eprintln!("Error: Invalid tile size '{}'. Use WxH format (e.g., '8x8')", raw);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let overrides = CliOverrides {
        sprite_size: tile_size,
        ..Default::default()
    };
    let config = match load_chips_config(config_path, &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let cartridge = match load_cartridge(cartridge_path) {
        Ok(cartridge) => cartridge,
        Err(e) => {
            eprintln!("Error: {}: {}", cartridge_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut chip = CartridgeChip::new();
    chip.insert_cartridge(cartridge);

    let (palette, bytes_per_pixel) = match chip.cartridge() {
        Ok(cartridge) => (&cartridge.palette, cartridge.sheet.bytes_per_pixel),
        Err(e) => {
            eprintln!("Error: {}: {}", cartridge_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let resolver = match sheet_resolver(palette, bytes_per_pixel) {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("Error: {}: {}", cartridge_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let tiles = match chip.sprites(config.sprites.width, config.sprites.height, resolver) {
        Ok(tiles) => tiles,
        Err(e) => {
            eprintln!("Error: {}: {}", cartridge_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    for (index, tile) in tiles.iter().enumerate() {
        let path = tile_output_path(output_dir, "tile", index);
        if let Err(e) = save_png(tile, &path, scale) {
            eprintln!("Error: {}: {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    println!(
        "Sliced {} tiles of {}x{} into {}",
        tiles.len(),
        config.sprites.width,
        config.sprites.height,
        output_dir.display()
    );
    ExitCode::from(EXIT_SUCCESS)
}
