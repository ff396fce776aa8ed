//! Join (`least_supertype`) and meet (`greatest_subtype`).
//!
//! Both operations are total: when nothing sensible exists the result is a
//! lattice value (`?`, a bottom kind, or one of the two function sentinels),
//! never an error.
//!
//! Function types form their own sub-lattice that is not a true lattice:
//! `a ⊑ b` does not guarantee `a ⊔ b == b` there. Callers rely on the current
//! answers, so the function rules in `meet_rules/functions.rs` are kept as
//! they are.

use tracing::trace;

use crate::registry::TypeRegistry;
use crate::types::*;

impl TypeRegistry {
    // =========================================================================
    // Join
    // =========================================================================

    /// `a ⊔ b`.
    pub fn least_supertype(&mut self, a: TypeId, b: TypeId) -> TypeId {
        let a = self.canonical(a);
        let b = self.canonical(b);
        if let Some(joined) = self.join_into_union(a, b) {
            return joined;
        }
        if let Some(joined) = self.join_into_union(b, a) {
            return joined;
        }
        if self.is_equivalent(a, b) {
            return a;
        }
        let union = self.union([a, b]);
        self.filter_no_resolved(union)
    }

    /// `union` itself when `other` already fits one of its known alternates.
    fn join_into_union(&self, union: TypeId, other: TypeId) -> Option<TypeId> {
        let alternates = self.union_alternates(union)?;
        if self.is_unknown_type(other) || self.is_union(other) {
            return None;
        }
        alternates
            .iter()
            .any(|&alt| !self.is_unknown_type(alt) && self.is_subtype(other, alt))
            .then_some(union)
    }

    /// Collapse named `NoResolvedType`s to the canonical one, so joins over
    /// distinct unresolved names agree regardless of order.
    pub fn filter_no_resolved(&mut self, id: TypeId) -> TypeId {
        let id = self.canonical(id);
        if self.is_no_resolved_type(id) {
            return TypeId::NO_RESOLVED_TYPE;
        }
        let Some(alternates) = self.union_alternates(id) else {
            return id;
        };
        if !alternates.iter().any(|&alt| self.is_no_resolved_type(alt)) {
            return id;
        }
        let kept: TypeList = alternates
            .iter()
            .copied()
            .filter(|&alt| !self.is_no_resolved_type(alt))
            .collect();
        self.union(std::iter::once(TypeId::NO_RESOLVED_TYPE).chain(kept))
    }

    /// Join where a missing side contributes nothing.
    pub fn null_accepting_join(&mut self, a: Option<TypeId>, b: Option<TypeId>) -> Option<TypeId> {
        match (a, b) {
            (Some(a), Some(b)) => Some(self.least_supertype(a, b)),
            (a, b) => a.or(b),
        }
    }

    /// Meet where a missing side contributes nothing.
    pub fn null_accepting_meet(&mut self, a: Option<TypeId>, b: Option<TypeId>) -> Option<TypeId> {
        match (a, b) {
            (Some(a), Some(b)) => Some(self.greatest_subtype(a, b)),
            (a, b) => a.or(b),
        }
    }

    // =========================================================================
    // Meet
    // =========================================================================

    /// `a ⊓ b`.
    pub fn greatest_subtype(&mut self, a: TypeId, b: TypeId) -> TypeId {
        let a = self.canonical(a);
        let b = self.canonical(b);

        if self.is_function(a) && self.is_function(b) {
            return self.sup_and_inf(a, b, false);
        }
        if self.is_equivalent(a, b) {
            return a;
        }
        if self.is_unknown_type(a) || self.is_unknown_type(b) {
            return TypeId::UNKNOWN;
        }
        if self.is_union(a) {
            return self.union_meet(a, b);
        }
        if self.is_union(b) {
            return self.union_meet(b, a);
        }
        if self.is_templatized(a) {
            return self.templatized_meet(a, b);
        }
        if self.is_templatized(b) {
            return self.templatized_meet(b, a);
        }
        if self.is_subtype(a, b) {
            return self.filter_no_resolved(a);
        }
        if self.is_subtype(b, a) {
            return self.filter_no_resolved(b);
        }
        if self.is_record(a) {
            return self.record_meet(a, b);
        }
        if self.is_record(b) {
            return self.record_meet(b, a);
        }
        if self.is_enum_element(a) {
            if let Some(met) = self.enum_element_meet(a, b) {
                return met;
            }
        } else if self.is_enum_element(b) {
            if let Some(met) = self.enum_element_meet(b, a) {
                return met;
            }
        }
        trace!(a = a.0, b = b.0, "meet is empty");
        self.object_bottom(a, b)
    }

    /// `NoObject` when both sides are objects, `None` otherwise.
    pub(crate) fn object_bottom(&self, a: TypeId, b: TypeId) -> TypeId {
        if self.is_object(a) && self.is_object(b) {
            TypeId::NO_OBJECT_TYPE
        } else {
            TypeId::NO_TYPE
        }
    }
}

#[cfg(test)]
#[path = "tests/lattice_tests.rs"]
mod tests;
