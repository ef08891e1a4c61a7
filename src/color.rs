//! Colors as stored in textures and cartridge palettes
//!
//! Palettes travel through cartridge assets as hex strings:
//! `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`.

use image::Rgba;
use serde::{Deserialize, Deserializer, Serializer};
use thiserror::Error;

/// A single RGBA8 color value.
pub type Color = Rgba<u8>;

/// Fully transparent black, the value of every pixel in a fresh texture.
pub const TRANSPARENT: Color = Rgba([0, 0, 0, 0]);

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// Parse a hex color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use pixelchips::color::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("#00FF0080").unwrap(), image::Rgba([0, 255, 0, 128]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is empty, lacks the leading `#`, has a
/// length other than 3, 4, 6 or 8 digits, or contains non-hex characters.
pub fn parse_color(s: &str) -> Result<Color, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    let digits = hex
        .chars()
        .map(parse_hex_digit)
        .collect::<Result<Vec<u8>, ColorError>>()?;

    match digits.as_slice() {
        // #RGB / #RGBA: each digit is doubled
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r0, g1, g0, b1, b0] => Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, 255])),
        [r1, r0, g1, g0, b1, b0, a1, a0] => {
            Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, a1 * 16 + a0]))
        }
        _ => Err(ColorError::InvalidLength(digits.len())),
    }
}

/// Format a color as `#RRGGBBAA`.
pub fn format_color(color: Color) -> String {
    let [r, g, b, a] = color.0;
    format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
}

/// Parse a single hex digit (0-9, A-F, a-f) to u8 (0-15)
fn parse_hex_digit(c: char) -> Result<u8, ColorError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        _ => Err(ColorError::InvalidHex(c)),
    }
}

/// Serde adapter for palettes stored as lists of hex strings.
pub(crate) mod hex_palette {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(colors: &[Color], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(colors.len()))?;
        for color in colors {
            seq.serialize_element(&format_color(*color))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Color>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| parse_color(s).map_err(|e| serde::de::Error::custom(format!("'{}': {}", s, e))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_forms_double_digits() {
        assert_eq!(parse_color("#fff").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("#0008").unwrap(), Rgba([0, 0, 0, 136]));
    }

    #[test]
    fn test_long_forms() {
        assert_eq!(parse_color("#1A2b3C").unwrap(), Rgba([0x1A, 0x2B, 0x3C, 255]));
        assert_eq!(parse_color("#1A2B3C4D").unwrap(), Rgba([0x1A, 0x2B, 0x3C, 0x4D]));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert_eq!(parse_color("FF0000"), Err(ColorError::MissingHash));
        assert_eq!(parse_color("#FF00"), Ok(Rgba([255, 255, 0, 0])));
        assert_eq!(parse_color("#FF000"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_color("#GG0000"), Err(ColorError::InvalidHex('G')));
    }

    #[test]
    fn test_format_color_is_parseable() {
        let color = Rgba([1, 2, 254, 255]);
        assert_eq!(format_color(color), "#0102FEFF");
        assert_eq!(parse_color(&format_color(color)).unwrap(), color);
    }
}
