//! String interner for identifier storage.
//!
//! Provides O(1) interning and lookup. Interned strings are leaked to give
//! them `'static` lifetime, which lets `resolve` hand out references without
//! holding the interner lock; a compilation interns a bounded set of
//! identifiers, so the leak is bounded by the source text.

use crate::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct InternerState {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<&'static str>,
}

/// String interner.
///
/// # Thread Safety
/// Uses an `RwLock` internally so a shared reference can intern; the resolver
/// itself is single-threaded but shares the interner with the program builder.
pub struct StringInterner {
    state: RwLock<InternerState>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned as
    /// [`Name::EMPTY`].
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        map.insert("", 0u32);
        StringInterner {
            state: RwLock::new(InternerState {
                map,
                strings: vec![""],
            }),
        }
    }

    /// Intern a string, returning its handle.
    pub fn intern(&self, s: &str) -> Name {
        {
            let state = self.state.read();
            if let Some(&idx) = state.map.get(s) {
                return Name::from_index(idx);
            }
        }
        let mut state = self.state.write();
        // Double-checked: another caller may have interned between locks.
        if let Some(&idx) = state.map.get(s) {
            return Name::from_index(idx);
        }
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let idx = u32::try_from(state.strings.len()).unwrap_or_else(|_| {
            panic!("string interner exceeded {} entries", u32::MAX)
        });
        state.strings.push(leaked);
        state.map.insert(leaked, idx);
        Name::from_index(idx)
    }

    /// Look up the string for a handle.
    ///
    /// # Panics
    /// Panics if `name` did not come from this interner.
    pub fn resolve(&self, name: Name) -> &'static str {
        self.state.read().strings[name.index()]
    }

    /// Number of interned strings (including the empty string).
    pub fn len(&self) -> usize {
        self.state.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        false // the empty string is always interned
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        StringInterner::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_dedupes() {
        let interner = StringInterner::new();
        let a = interner.intern("main");
        let b = interner.intern("main");
        let c = interner.intern("other");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "main");
        assert_eq!(interner.resolve(c), "other");
    }

    #[test]
    fn empty_is_preinterned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
    }
}
