//! Entity handles.
//!
//! An [`Id`] carries no data of its own. It names a slot in the
//! [`AstStore`](crate::AstStore) plus the generation that slot had when the
//! entity was created, so a handle to a released entity never aliases a later
//! entity that reuses the slot.

use std::fmt;

/// Handle to one AST node.
///
/// Ordering is by slot index first, which is the order queries visit entities.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Id {
    index: u32,
    generation: u32,
}

crate::static_assert_size!(Id, 8);

impl Id {
    /// Sentinel for "no entity".
    pub const NONE: Id = Id {
        index: u32::MAX,
        generation: 0,
    };

    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Id { index, generation }
    }

    /// Slot index inside the store.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Check if this is not the [`Id::NONE`] sentinel.
    ///
    /// This says nothing about liveness; use
    /// [`AstStore::is_valid`](crate::AstStore::is_valid) for that.
    #[inline]
    pub const fn is_some(self) -> bool {
        self.index != u32::MAX
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_some() {
            write!(f, "Id({}v{})", self.index, self.generation)
        } else {
            write!(f, "Id::NONE")
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
