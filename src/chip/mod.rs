//! Chip composition framework.
//!
//! This module provides:
//! - The [`Chip`] trait every piece of virtual hardware implements
//! - [`ChipKind`], the closed set of chips a console is built from
//! - [`ChipHandle`] and [`ChipVariant`] for typed access to shared chips
//! - [`ChipResolver`], the lookup capability handed to [`Chip::init`]
//! - [`ChipSet`], the composition root that owns the lifecycle
//!
//! Chips are constructed independently and registered in any order. Once all
//! of them exist, [`ChipSet::boot`] calls `init` on each so a chip can bind its
//! siblings through the resolver. [`ChipSet::shutdown`] calls `destroy` once on
//! each chip and consumes the set.

mod handle;
mod kind;
mod set;

pub use handle::{ChipHandle, ChipResolver, ChipVariant};
pub use kind::ChipKind;
pub use set::ChipSet;

use crate::texture::TextureError;
use thiserror::Error;

/// Errors raised while composing chips.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChipError {
    /// A chip name that is not one of the known chip kinds
    #[error("unknown chip name '{0}'")]
    UnknownChip(String),
    /// A chip required during `init` is not registered in the set
    #[error("chip '{name}' is required but not registered")]
    Unresolved { name: &'static str },
    /// The set was already booted; chips are initialized exactly once
    #[error("chip set is already booted")]
    AlreadyBooted,
    /// A chip's memory could not be allocated
    #[error("failed to allocate chip memory: {0}")]
    Memory(#[from] TextureError),
}

/// A self-contained virtual-hardware component.
pub trait Chip {
    /// Which chip this is. The kind determines the chip's lookup name.
    fn kind(&self) -> ChipKind;

    /// The name siblings use to find this chip.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Bind sibling chips. Called exactly once, after every chip in the set exists.
    fn init(&mut self, resolver: &dyn ChipResolver) -> Result<(), ChipError>;

    /// Release everything the chip holds and reset it to its zeroed state.
    fn destroy(&mut self);
}
