//! String interner for property, type and template names.
//!
//! Names are interned once into a pool owned by the type registry and handed
//! around as `Atom` indices, so property lookups and nominal name comparisons
//! are integer comparisons.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

/// An interned string identifier.
///
/// Atoms are a plain `u32` and compare with `==` in O(1).
/// Use [`Interner::resolve`] to get the text back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// Sentinel for "no name" (the empty string).
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Names every registry needs while building its native types.
const COMMON_STRINGS: &[&str] = &[
    "Object",
    "Function",
    "Array",
    "Boolean",
    "Number",
    "String",
    "prototype",
    "constructor",
    "length",
    "call",
    "apply",
    "bind",
    "toString",
    "valueOf",
    "hasOwnProperty",
    "T",
    "K",
    "V",
    "IObject#KEY",
    "IObject#VALUE",
];

/// String interner that deduplicates strings and returns `Atom` handles.
///
/// # Example
/// ```
/// use jsty_common::interner::Interner;
/// let mut interner = Interner::new();
/// let a1 = interner.intern("width");
/// let a2 = interner.intern("width");
/// assert_eq!(a1, a2);
/// assert_eq!(interner.resolve(a1), "width");
/// ```
#[derive(Default)]
pub struct Interner {
    map: FxHashMap<Arc<str>, Atom>,
    /// Index 0 is the empty string.
    strings: Vec<Arc<str>>,
}

impl Interner {
    /// Create an interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut interner = Interner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        let empty: Arc<str> = Arc::from("");
        interner.strings.push(empty.clone());
        interner.map.insert(empty, Atom::NONE);
        interner
    }

    /// Intern a string, returning the existing atom if it was seen before.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let owned: Arc<str> = Arc::from(s);
        self.strings.push(owned.clone());
        self.map.insert(owned, atom);
        atom
    }

    /// Look up a string without interning it.
    #[inline]
    pub fn lookup(&self, s: &str) -> Option<Atom> {
        self.map.get(s).copied()
    }

    /// Resolve an atom back to its text.
    /// Out-of-range atoms resolve to the empty string.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }

    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<&str> {
        self.strings.get(atom.0 as usize).map(|s| s.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// True when only the empty string is interned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }

    /// Pre-intern the names used by native types.
    pub fn intern_common(&mut self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }
}

#[cfg(test)]
#[path = "tests/interner_tests.rs"]
mod tests;
