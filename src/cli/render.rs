//! Render-text command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::font::{FontChip, FontError};
use crate::output::save_png;

use super::{boot_console, load_chips_config, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the render-text command
pub fn run_render_text(
    config_path: Option<&Path>,
    cartridge_path: &Path,
    text: &str,
    font_name: &str,
    output: &Path,
    spacing: Option<u32>,
    scale: u8,
) -> ExitCode {
    let overrides = CliOverrides {
        letter_spacing: spacing,
        ..Default::default()
    };
    let config = match load_chips_config(config_path, &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let chips = match boot_console(&config, cartridge_path) {
        Ok(chips) => chips,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let Some(font_chip) = chips.get::<FontChip>() else {
        eprintln!("Error: console has no font chip");
        return ExitCode::from(EXIT_ERROR);
    };

    let text = text.replace("\\n", "\n");
    let result = font_chip
        .borrow()
        .convert_text_to_texture(&text, font_name, config.text.letter_spacing);
    let texture = match result {
        Ok(texture) => texture,
        Err(e @ FontError::UnknownFont(_)) => {
            eprintln!("Error: {}", e);
            let names: Vec<String> =
                font_chip.borrow().fonts().map(|f| f.name().to_string()).collect();
            eprintln!("Available fonts: {}", names.join(", "));
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = save_png(&texture, output, scale) {
        eprintln!("Error: {}: {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!(
        "Rendered {}x{} text to {}",
        texture.width(),
        texture.height(),
        output.display()
    );
    chips.shutdown();
    ExitCode::from(EXIT_SUCCESS)
}
