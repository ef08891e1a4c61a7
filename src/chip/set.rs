//! The composition root: owns every chip and drives the init/destroy lifecycle.

use super::{ChipError, ChipHandle, ChipKind, ChipResolver, ChipVariant};
use crate::cartridge::CartridgeChip;
use crate::config::ChipsConfig;
use crate::display::DisplayChip;
use crate::font::FontChip;
use crate::sprite_chip::SpriteChip;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// A set of chips, at most one per [`ChipKind`].
///
/// # Example
///
/// ```
/// use pixelchips::chip::ChipSet;
/// use pixelchips::font::FontChip;
/// use pixelchips::sprite_chip::SpriteChip;
///
/// let mut chips = ChipSet::new();
/// // Registration order does not matter: the font chip finds the sprite chip at boot.
/// let font = chips.insert(FontChip::new()).unwrap();
/// chips.insert(SpriteChip::new(8, 8)).unwrap();
/// chips.boot().unwrap();
///
/// assert!(font.borrow().is_bound());
/// chips.shutdown();
/// ```
#[derive(Debug, Default)]
pub struct ChipSet {
    slots: [Option<ChipHandle>; 4],
    booted: bool,
}

impl ChipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard console: display, sprite, font and cartridge chips
    /// configured from `config`. The set still needs to be booted.
    ///
    /// # Errors
    ///
    /// Returns [`ChipError::Memory`] when the display framebuffer cannot be
    /// allocated.
    pub fn from_config(config: &ChipsConfig) -> Result<Self, ChipError> {
        let display = DisplayChip::new(config.display.width, config.display.height)?;

        let mut set = Self::new();
        set.register(ChipHandle::Display(Rc::new(RefCell::new(display))));
        set.register(ChipHandle::Sprite(Rc::new(RefCell::new(SpriteChip::new(
            config.sprites.width,
            config.sprites.height,
        )))));
        set.register(ChipHandle::Font(Rc::new(RefCell::new(FontChip::from_config(
            &config.fonts,
        )))));
        set.register(ChipHandle::Cartridge(Rc::new(RefCell::new(CartridgeChip::new()))));
        Ok(set)
    }

    /// Register a chip and get back a shared handle to it.
    ///
    /// A chip of the same kind registered earlier is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ChipError::AlreadyBooted`] once the set has been booted.
    pub fn insert<T: ChipVariant>(&mut self, chip: T) -> Result<Rc<RefCell<T>>, ChipError> {
        if self.booted {
            return Err(ChipError::AlreadyBooted);
        }
        let chip = Rc::new(RefCell::new(chip));
        self.register(T::into_handle(Rc::clone(&chip)));
        Ok(chip)
    }

    /// Typed access to a registered chip.
    pub fn get<T: ChipVariant>(&self) -> Option<Rc<RefCell<T>>> {
        self.resolve(T::KIND).and_then(T::from_handle)
    }

    pub fn contains(&self, kind: ChipKind) -> bool {
        self.slots[kind.slot()].is_some()
    }

    /// Kinds of all registered chips, in boot order.
    pub fn kinds(&self) -> impl Iterator<Item = ChipKind> + '_ {
        ChipKind::ALL.into_iter().filter(|kind| self.contains(*kind))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_booted(&self) -> bool {
        self.booted
    }

    /// Initialize every registered chip exactly once.
    ///
    /// Boot can only be attempted once: if a chip fails to resolve a sibling the
    /// error is returned and the set stays unusable for a second boot.
    pub fn boot(&mut self) -> Result<(), ChipError> {
        if self.booted {
            return Err(ChipError::AlreadyBooted);
        }
        self.booted = true;

        let resolver: &dyn ChipResolver = &*self;
        for handle in self.slots.iter().flatten() {
            let mut chip = handle.borrow_chip_mut();
            debug!(chip = chip.name(), "init");
            chip.init(resolver)?;
        }
        Ok(())
    }

    /// Destroy every chip exactly once and drop the set.
    pub fn shutdown(self) {
        for handle in self.slots.iter().flatten() {
            let mut chip = handle.borrow_chip_mut();
            debug!(chip = chip.name(), "destroy");
            chip.destroy();
        }
    }

    fn register(&mut self, handle: ChipHandle) {
        let kind = handle.kind();
        if self.slots[kind.slot()].replace(handle).is_some() {
            debug!(chip = kind.name(), "replaced registered chip");
        }
    }
}

impl ChipResolver for ChipSet {
    fn resolve(&self, kind: ChipKind) -> Option<ChipHandle> {
        self.slots[kind.slot()].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::Chip;
    use crate::config::{FontConfig, SizeConfig};
    use crate::sprite::SpriteId;

    #[test]
    fn test_insert_and_get() {
        let mut set = ChipSet::new();
        assert!(set.is_empty());

        let sprites = set.insert(SpriteChip::new(8, 8)).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(ChipKind::Sprite));
        assert!(!set.contains(ChipKind::Font));

        let again = set.get::<SpriteChip>().unwrap();
        assert!(Rc::ptr_eq(&sprites, &again));
        assert!(set.get::<FontChip>().is_none());
    }

    #[test]
    fn test_insert_replaces_same_kind() {
        let mut set = ChipSet::new();
        set.insert(SpriteChip::new(8, 8)).unwrap();
        set.insert(SpriteChip::new(16, 16)).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.get::<SpriteChip>().unwrap().borrow().sprite_width(), 16);
    }

    #[test]
    fn test_boot_binds_font_regardless_of_order() {
        let mut set = ChipSet::new();
        let font = set.insert(FontChip::new()).unwrap();
        let sprites = set.insert(SpriteChip::new(8, 8)).unwrap();

        assert!(!font.borrow().is_bound());
        set.boot().unwrap();
        assert!(font.borrow().is_bound());
        assert!(font.borrow().is_bound_to(&sprites));
    }

    #[test]
    fn test_boot_fails_when_dependency_missing() {
        let mut set = ChipSet::new();
        set.insert(FontChip::new()).unwrap();

        assert_eq!(set.boot(), Err(ChipError::Unresolved { name: "SpriteChip" }));
    }

    #[test]
    fn test_boot_only_once() {
        let mut set = ChipSet::new();
        set.insert(SpriteChip::new(8, 8)).unwrap();
        set.boot().unwrap();

        assert!(set.is_booted());
        assert_eq!(set.boot(), Err(ChipError::AlreadyBooted));
        assert_eq!(
            set.insert(DisplayChip::new(4, 4).unwrap()).map(|_| ()),
            Err(ChipError::AlreadyBooted)
        );
    }

    #[test]
    fn test_resolver_by_name() {
        let mut set = ChipSet::new();
        set.insert(SpriteChip::new(8, 8)).unwrap();
        let resolver: &dyn ChipResolver = &set;

        let handle = resolver.require_named("SpriteChip").unwrap();
        assert_eq!(handle.kind(), ChipKind::Sprite);

        assert_eq!(
            resolver.require_named("FontChip").map(|_| ()),
            Err(ChipError::Unresolved { name: "FontChip" })
        );
        assert_eq!(
            resolver.require_named("SoundChip").map(|_| ()),
            Err(ChipError::UnknownChip("SoundChip".to_string()))
        );
    }

    #[test]
    fn test_shutdown_wipes_chips() {
        let mut set = ChipSet::new();
        let font = set.insert(FontChip::new()).unwrap();
        set.insert(SpriteChip::new(8, 8)).unwrap();
        font.borrow_mut().add_font("main", &[SpriteId(1)]);
        set.boot().unwrap();

        set.shutdown();

        let font = font.borrow();
        assert!(!font.is_bound());
        assert_eq!(font.fonts().count(), 0);
    }

    #[test]
    fn test_from_config_registers_standard_chips() {
        let config = ChipsConfig {
            sprites: SizeConfig { width: 4, height: 6 },
            fonts: vec![FontConfig {
                name: "tiny".to_string(),
                first_sprite: 10,
                glyphs: None,
            }],
            ..Default::default()
        };

        let mut set = ChipSet::from_config(&config).unwrap();
        assert_eq!(set.kinds().collect::<Vec<_>>(), ChipKind::ALL.to_vec());
        set.boot().unwrap();

        let font = set.get::<FontChip>().unwrap();
        assert!(font.borrow().font("tiny").is_some());
        assert_eq!(set.get::<SpriteChip>().unwrap().borrow().sprite_height(), 6);
        assert_eq!(set.get::<CartridgeChip>().unwrap().borrow().name(), "CartridgeChip");
    }

    #[test]
    fn test_from_config_reports_unallocatable_display() {
        let config = ChipsConfig {
            display: SizeConfig {
                width: u32::MAX,
                height: u32::MAX,
            },
            ..Default::default()
        };
        assert!(config.is_valid());

        assert!(matches!(ChipSet::from_config(&config), Err(ChipError::Memory(_))));
    }
}
