//! Interned identifier handles.

use std::fmt;

/// Interned identifier.
///
/// A `Name` is an index into the [`StringInterner`](crate::StringInterner)
/// that created it. Equality and hashing are O(1) and compare the handle, so
/// two `Name`s from the same interner are equal iff their strings are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub(crate) const fn from_index(index: u32) -> Self {
        Name(index)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}
