//! Shared chip handles and the resolver capability used during `init`.

use super::{Chip, ChipError, ChipKind};
use crate::cartridge::CartridgeChip;
use crate::display::DisplayChip;
use crate::font::FontChip;
use crate::sprite_chip::SpriteChip;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

/// A shared reference to one registered chip.
///
/// Chips live for the whole session on a single thread, so they are shared as
/// `Rc<RefCell<_>>`. Cloning a handle clones the reference, not the chip.
#[derive(Debug, Clone)]
pub enum ChipHandle {
    Display(Rc<RefCell<DisplayChip>>),
    Sprite(Rc<RefCell<SpriteChip>>),
    Font(Rc<RefCell<FontChip>>),
    Cartridge(Rc<RefCell<CartridgeChip>>),
}

impl ChipHandle {
    pub fn kind(&self) -> ChipKind {
        match self {
            ChipHandle::Display(_) => ChipKind::Display,
            ChipHandle::Sprite(_) => ChipKind::Sprite,
            ChipHandle::Font(_) => ChipKind::Font,
            ChipHandle::Cartridge(_) => ChipKind::Cartridge,
        }
    }

    /// Mutably borrow the chip behind the handle as a plain [`Chip`].
    ///
    /// # Panics
    ///
    /// Panics if the chip is already borrowed, like [`RefCell::borrow_mut`].
    pub fn borrow_chip_mut(&self) -> RefMut<'_, dyn Chip> {
        match self {
            ChipHandle::Display(chip) => RefMut::map(chip.borrow_mut(), |c| c as &mut dyn Chip),
            ChipHandle::Sprite(chip) => RefMut::map(chip.borrow_mut(), |c| c as &mut dyn Chip),
            ChipHandle::Font(chip) => RefMut::map(chip.borrow_mut(), |c| c as &mut dyn Chip),
            ChipHandle::Cartridge(chip) => RefMut::map(chip.borrow_mut(), |c| c as &mut dyn Chip),
        }
    }
}

/// A concrete chip type that maps onto exactly one [`ChipKind`].
pub trait ChipVariant: Chip + Sized {
    const KIND: ChipKind;

    fn into_handle(chip: Rc<RefCell<Self>>) -> ChipHandle;

    fn from_handle(handle: ChipHandle) -> Option<Rc<RefCell<Self>>>;
}

macro_rules! chip_variant {
    ($ty:ty, $variant:ident) => {
        impl ChipVariant for $ty {
            const KIND: ChipKind = ChipKind::$variant;

            fn into_handle(chip: Rc<RefCell<Self>>) -> ChipHandle {
                ChipHandle::$variant(chip)
            }

            fn from_handle(handle: ChipHandle) -> Option<Rc<RefCell<Self>>> {
                match handle {
                    ChipHandle::$variant(chip) => Some(chip),
                    _ => None,
                }
            }
        }
    };
}

chip_variant!(DisplayChip, Display);
chip_variant!(SpriteChip, Sprite);
chip_variant!(FontChip, Font);
chip_variant!(CartridgeChip, Cartridge);

/// Lookup capability injected into every chip's `init`.
pub trait ChipResolver {
    /// Find the registered chip of the given kind.
    fn resolve(&self, kind: ChipKind) -> Option<ChipHandle>;
}

impl dyn ChipResolver + '_ {
    /// Find a sibling chip by type.
    ///
    /// A missing chip is an error that aborts composition, never a silent null.
    pub fn require<T: ChipVariant>(&self) -> Result<Rc<RefCell<T>>, ChipError> {
        self.resolve(T::KIND)
            .and_then(T::from_handle)
            .ok_or(ChipError::Unresolved { name: T::KIND.name() })
    }

    /// Find a sibling chip by its lookup name, e.g. `"SpriteChip"`.
    pub fn require_named(&self, name: &str) -> Result<ChipHandle, ChipError> {
        let kind: ChipKind = name.parse()?;
        self.resolve(kind)
            .ok_or(ChipError::Unresolved { name: kind.name() })
    }
}
