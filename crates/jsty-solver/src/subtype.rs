//! Subtype relation.
//!
//! `SubtypeChecker` answers `a ⊑ b` for one top-level query. It carries the
//! structural typing switch, a directed [`MatchCache`] for implicit structural
//! matches and a recursion guard; everything is dropped with the checker.
//!
//! The relation is split by the kind of the left-hand side. The shared
//! prologue (`check_helper`) runs first for most kinds; the per-kind rules in
//! `subtype_rules/` apply when it does not settle the question.
//!
//! Known permissive cases that are kept on purpose:
//! - `?` is a subtype and a supertype of everything.
//! - Covariant containers compare their element binding in either direction.

use indexmap::IndexSet;
use tracing::trace;

use crate::match_cache::MatchCache;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::registry::TypeRegistry;
use crate::types::*;

/// Per-query switches for [`SubtypeChecker`].
#[derive(Clone, Debug)]
pub struct SubtypeOptions<'a> {
    pub structural_typing: bool,
    /// Reference names whose element binding is compared covariantly.
    pub covariant_containers: &'a IndexSet<String>,
    pub profile: RecursionProfile,
}

impl<'a> SubtypeOptions<'a> {
    pub fn from_registry(registry: &'a TypeRegistry) -> Self {
        let options = registry.options();
        Self {
            structural_typing: options.structural_typing,
            covariant_containers: &options.covariant_containers,
            profile: RecursionProfile::SubtypeCheck,
        }
    }

    pub fn with_structural_typing(mut self, structural: bool) -> Self {
        self.structural_typing = structural;
        self
    }
}

pub struct SubtypeChecker<'a> {
    pub(crate) registry: &'a TypeRegistry,
    pub(crate) structural: bool,
    pub(crate) covariant_containers: &'a IndexSet<String>,
    /// Implicit structural matches, keyed `(right, left)`.
    pub(crate) cache: MatchCache,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self::with_options(registry, SubtypeOptions::from_registry(registry))
    }

    pub fn with_options(registry: &'a TypeRegistry, options: SubtypeOptions<'a>) -> Self {
        Self {
            registry,
            structural: options.structural_typing,
            covariant_containers: options.covariant_containers,
            cache: MatchCache::directed(),
            guard: RecursionGuard::with_profile(options.profile),
        }
    }

    /// Whether the query compares structural types by shape.
    pub fn is_structural(&self) -> bool {
        self.structural
    }

    // =========================================================================
    // Entry point
    // =========================================================================

    /// `a ⊑ b`. A pair met again while it is being decided counts as a
    /// match; a walk that hits the depth or iteration limit does not.
    pub fn is_subtype(&mut self, a: TypeId, b: TypeId) -> bool {
        let a = self.registry.canonical(a);
        let b = self.registry.canonical(b);
        if a == b {
            return true;
        }
        match self.guard.enter((a, b)) {
            RecursionResult::Entered => {
                let result = self.check_inner(a, b);
                self.guard.leave((a, b));
                result
            }
            RecursionResult::Cycle => true,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                trace!(a = a.0, b = b.0, "subtype limit reached");
                false
            }
        }
    }

    fn check_inner(&mut self, a: TypeId, b: TypeId) -> bool {
        let reg = self.registry;
        match reg.data(a) {
            TypeData::Union(alternates) => self.union_is_subtype(alternates, b),
            TypeData::Bottom(BottomKind::NoType)
            | TypeData::Bottom(BottomKind::NoResolved)
            | TypeData::Unresolved(_) => true,
            TypeData::Bottom(BottomKind::NoObject) => {
                self.check_helper(a, b)
                    || (reg.is_object(b) && !reg.is_no_type(b) && !reg.is_no_resolved_type(b))
            }
            TypeData::Unknown { .. } | TypeData::Template { .. } | TypeData::Named(_) => true,
            TypeData::EnumElement(_) => {
                self.check_helper(a, b)
                    || reg
                        .enum_primitive_type(a)
                        .is_some_and(|primitive| self.is_subtype(primitive, b))
            }
            TypeData::Function(_) => self.function_is_subtype(a, b),
            TypeData::Record(_) => self.record_is_subtype(a, b),
            TypeData::Object(_) | TypeData::Enum(_) => self.object_is_subtype(a, b),
            TypeData::Templatized { .. }
            | TypeData::All
            | TypeData::Null
            | TypeData::Void
            | TypeData::Primitive(_) => self.check_helper(a, b),
        }
    }

    // =========================================================================
    // Shared prologue
    // =========================================================================

    /// Rules every left-hand kind goes through before its own.
    pub(crate) fn check_helper(&mut self, a: TypeId, b: TypeId) -> bool {
        let reg = self.registry;
        if reg.is_unknown_type(b) || reg.is_all_type(b) {
            return true;
        }
        if reg.is_equivalent_structural(a, b, self.structural) {
            return true;
        }
        if let Some(alternates) = reg.union_alternates(b) {
            return alternates.iter().any(|&alt| self.is_subtype(a, alt));
        }

        if !self.template_maps_match(a, b) {
            return self.structural && self.implicit_match(a, b);
        }

        if let TypeData::Templatized { base, .. } = reg.data(a) {
            return self.is_subtype(*base, b);
        }
        if let Some(target) = reg.referenced_type(b) {
            return self.is_subtype(a, target);
        }
        self.structural && self.implicit_match(a, b)
    }
}

impl TypeRegistry {
    /// `a ⊑ b` under the registry's options.
    pub fn is_subtype(&self, a: TypeId, b: TypeId) -> bool {
        SubtypeChecker::new(self).is_subtype(a, b)
    }

    /// `a ⊑ b` by declared relationships only.
    pub fn is_subtype_without_structural_typing(&self, a: TypeId, b: TypeId) -> bool {
        let options = SubtypeOptions::from_registry(self).with_structural_typing(false);
        SubtypeChecker::with_options(self, options).is_subtype(a, b)
    }

    /// A union is nullable when one alternate is; anything else when it is a
    /// subtype of `null`. `?` is nullable, `*` is not.
    pub fn is_nullable(&self, id: TypeId) -> bool {
        match self.union_alternates(id) {
            Some(alternates) => alternates.iter().any(|&alt| self.is_nullable(alt)),
            None => self.is_subtype(id, TypeId::NULL),
        }
    }

    pub fn is_voidable(&self, id: TypeId) -> bool {
        match self.union_alternates(id) {
            Some(alternates) => alternates.iter().any(|&alt| self.is_voidable(alt)),
            None => self.is_subtype(id, TypeId::VOID),
        }
    }
}

#[cfg(test)]
#[path = "tests/subtype_tests.rs"]
mod tests;
