//! Per-query pair cache for structural comparisons.
//!
//! A pair is marked `Processing` before the walk over its members and
//! settled after. Meeting a `Processing` pair again means the walk has come
//! back around a cycle, and the pair is assumed to match.
//!
//! A cache belongs to one top-level query and is dropped with it.

use rustc_hash::FxHashMap;

use crate::types::TypeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStatus {
    Match,
    NoMatch,
    Processing,
}

impl MatchStatus {
    /// The answer a revisited pair contributes. A pair still in progress
    /// counts as a match.
    #[inline]
    pub fn subtype_value(self) -> bool {
        !matches!(self, Self::NoMatch)
    }

    pub fn from_bool(matched: bool) -> Self {
        if matched { Self::Match } else { Self::NoMatch }
    }
}

#[derive(Debug, Default)]
pub struct MatchCache {
    statuses: FxHashMap<(TypeId, TypeId), MatchStatus>,
    /// Treat `(a, b)` and `(b, a)` as the same pair.
    symmetric: bool,
}

impl MatchCache {
    /// For equivalence, where the pair order does not matter.
    pub fn symmetric() -> Self {
        Self {
            statuses: FxHashMap::default(),
            symmetric: true,
        }
    }

    /// For subtyping, where `(sub, sup)` and `(sup, sub)` differ.
    pub fn directed() -> Self {
        Self::default()
    }

    #[inline]
    fn key(&self, a: TypeId, b: TypeId) -> (TypeId, TypeId) {
        if self.symmetric && b < a { (b, a) } else { (a, b) }
    }

    pub fn status(&self, a: TypeId, b: TypeId) -> Option<MatchStatus> {
        self.statuses.get(&self.key(a, b)).copied()
    }

    /// Return the known status of the pair, or mark it `Processing` and
    /// return `None` if it has none yet.
    pub fn begin(&mut self, a: TypeId, b: TypeId) -> Option<MatchStatus> {
        let key = self.key(a, b);
        match self.statuses.get(&key) {
            Some(&status) => Some(status),
            None => {
                self.statuses.insert(key, MatchStatus::Processing);
                None
            }
        }
    }

    /// Settle a pair and hand the answer back.
    pub fn finish(&mut self, a: TypeId, b: TypeId, matched: bool) -> bool {
        let key = self.key(a, b);
        self.statuses.insert(key, MatchStatus::from_bool(matched));
        matched
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
