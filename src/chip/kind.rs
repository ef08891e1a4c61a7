//! The closed set of chip kinds and their lookup names.

use super::ChipError;
use std::fmt;
use std::str::FromStr;

/// Every kind of chip a console can be composed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipKind {
    Display,
    Sprite,
    Font,
    Cartridge,
}

impl ChipKind {
    /// All kinds, in the order [`ChipSet::boot`](super::ChipSet::boot) initializes them.
    pub const ALL: [ChipKind; 4] = [
        ChipKind::Display,
        ChipKind::Sprite,
        ChipKind::Font,
        ChipKind::Cartridge,
    ];

    /// The lookup name of this chip kind.
    pub const fn name(self) -> &'static str {
        match self {
            ChipKind::Display => "DisplayChip",
            ChipKind::Sprite => "SpriteChip",
            ChipKind::Font => "FontChip",
            ChipKind::Cartridge => "CartridgeChip",
        }
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ChipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChipKind {
    type Err = ChipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChipKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ChipError::UnknownChip(s.to_string()))
    }
}
