//! Palette and script commands

use std::path::Path;
use std::process::ExitCode;

use crate::cartridge::{load_cartridge, CartridgeChip};
use crate::color::format_color;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// Load the cartridge at `path` into a fresh cartridge chip.
fn insert(path: &Path) -> Option<CartridgeChip> {
    match load_cartridge(path) {
        Ok(cartridge) => {
            let mut chip = CartridgeChip::new();
            chip.insert_cartridge(cartridge);
            Some(chip)
        }
        Err(e) => {
            eprintln!("Error: {}: {}", path.display(), e);
            None
        }
    }
}

/// Execute the palette command
pub fn run_palette(path: &Path) -> ExitCode {
    let Some(chip) = insert(path) else {
        return ExitCode::from(EXIT_ERROR);
    };

    match chip.colors() {
        Ok(colors) => {
            for (index, color) in colors.iter().enumerate() {
                println!("{:3}  {}", index, format_color(*color));
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}: {}", path.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the script command
pub fn run_script(path: &Path) -> ExitCode {
    let Some(chip) = insert(path) else {
        return ExitCode::from(EXIT_ERROR);
    };

    match chip.script() {
        Ok(script) => {
            print!("{}", script);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}: {}", path.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
