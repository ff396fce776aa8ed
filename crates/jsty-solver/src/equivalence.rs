//! Type equivalence under the three policies of [`EquivalenceMethod`].
//!
//! - `Identity`: same declared type.
//! - `DataFlow`: did re-inferring a flow fact change anything. Two unknowns
//!   are the same; an unknown and a known type differ.
//! - `Invariant`: generic argument compatibility. Unknown matches everything.
//!
//! Records and structural types are compared member by member through a
//! [`MatchCache`], so mutually referential shapes terminate.

use tracing::trace;

use crate::class_hierarchy::MemberTypeMap;
use crate::match_cache::MatchCache;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::registry::TypeRegistry;
use crate::template_map::TemplateTypeMap;
use crate::types::*;

/// Outcome of matching one template key against the other map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyMatch {
    NoKeyMatch,
    ValueMismatch,
    ValueMatch,
}

impl KeyMatch {
    fn fails(self, method: EquivalenceMethod) -> bool {
        match self {
            Self::ValueMismatch => true,
            Self::NoKeyMatch => method != EquivalenceMethod::Invariant,
            Self::ValueMatch => false,
        }
    }
}

/// One equivalence query. Build a fresh checker per top-level question.
pub struct EquivalenceChecker<'a> {
    registry: &'a TypeRegistry,
    structural: bool,
    cache: MatchCache,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl<'a> EquivalenceChecker<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            structural: registry.options().structural_typing,
            cache: MatchCache::symmetric(),
            guard: RecursionGuard::with_profile(RecursionProfile::Equivalence),
        }
    }

    /// Compare structural types member by member (`true`), or only by name.
    pub fn with_structural_typing(mut self, structural: bool) -> Self {
        self.structural = structural;
        self
    }

    pub fn check(&mut self, a: TypeId, b: TypeId, method: EquivalenceMethod) -> bool {
        let a = self.registry.canonical(a);
        let b = self.registry.canonical(b);
        if a == b {
            return true;
        }
        match self.guard.enter((a, b)) {
            RecursionResult::Entered => {
                let result = self.check_inner(a, b, method);
                self.guard.leave((a, b));
                result
            }
            RecursionResult::Cycle => true,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                trace!(a = a.0, b = b.0, "equivalence limit reached");
                false
            }
        }
    }

    fn check_inner(&mut self, a: TypeId, b: TypeId, method: EquivalenceMethod) -> bool {
        let reg = self.registry;

        if reg.is_no_resolved_type(a) && reg.is_no_resolved_type(b) {
            return match (reg.data(a), reg.data(b)) {
                (TypeData::Unresolved(x), TypeData::Unresolved(y)) => x == y,
                _ => true,
            };
        }

        let a_unknown = reg.is_unknown_type(a);
        let b_unknown = reg.is_unknown_type(b);
        if a_unknown || b_unknown {
            match method {
                EquivalenceMethod::Invariant => return true,
                EquivalenceMethod::DataFlow => return a_unknown && b_unknown,
                EquivalenceMethod::Identity => {
                    if a_unknown && b_unknown && (reg.is_nominal_type(a) ^ reg.is_nominal_type(b)) {
                        return false;
                    }
                }
            }
        }

        if let (Some(xs), Some(ys)) = (reg.union_alternates(a), reg.union_alternates(b)) {
            return self.unions_equivalent(xs, ys, method);
        }

        if reg.is_function(a) && reg.is_function(b) {
            return self.functions_equivalent(a, b, method);
        }

        if let (Some(x), Some(y)) = (reg.record_shape(a), reg.record_shape(b)) {
            return self.records_equivalent(a, x, b, y, method);
        }

        if !self.template_maps_equivalent(reg.template_map(a), reg.template_map(b), method) {
            return false;
        }

        if self.structural && reg.is_structural_type(a) && reg.is_structural_type(b) {
            return self.structural_equivalent(a, b, method);
        }

        if reg.is_nominal_type(a) && reg.is_nominal_type(b) {
            return reg.concrete_nominal_name(a) == reg.concrete_nominal_name(b);
        }

        if reg.is_template(a) && reg.is_template(b) {
            return false;
        }

        if let Some(target) = reg.referenced_type(a) {
            return self.check(target, b, method);
        }
        if let Some(target) = reg.referenced_type(b) {
            return self.check(a, target, method);
        }
        false
    }

    // -------------------------------------------------------------------------
    // Composite kinds
    // -------------------------------------------------------------------------

    fn unions_equivalent(&mut self, xs: &[TypeId], ys: &[TypeId], method: EquivalenceMethod) -> bool {
        if method == EquivalenceMethod::Identity && xs.len() != ys.len() {
            return false;
        }
        ys.iter().all(|&y| xs.iter().any(|&x| self.check(x, y, method)))
            && xs.iter().all(|&x| ys.iter().any(|&y| self.check(x, y, method)))
    }

    fn functions_equivalent(&mut self, a: TypeId, b: TypeId, method: EquivalenceMethod) -> bool {
        let reg = self.registry;
        let (Some(f), Some(g)) = (reg.function_info(a), reg.function_info(b)) else {
            return false;
        };
        if f.kind != g.kind {
            return false;
        }
        match f.kind {
            FunctionKind::Constructor => false,
            FunctionKind::Interface => reg.reference_name(a) == reg.reference_name(b),
            FunctionKind::Ordinary => {
                self.check(f.this_type, g.this_type, method)
                    && self.check(f.signature.return_type, g.signature.return_type, method)
                    && self.parameters_equal(&f.signature, &g.signature, method)
            }
        }
    }

    fn parameters_equal(
        &mut self,
        f: &CallSignature,
        g: &CallSignature,
        method: EquivalenceMethod,
    ) -> bool {
        if f.params.len() != g.params.len() {
            return false;
        }
        f.params.iter().zip(g.params.iter()).all(|(p, q)| {
            p.optional == q.optional && p.rest == q.rest && self.check(p.type_id, q.type_id, method)
        })
    }

    fn records_equivalent(
        &mut self,
        a: TypeId,
        x: &RecordShape,
        b: TypeId,
        y: &RecordShape,
        method: EquivalenceMethod,
    ) -> bool {
        if let Some(status) = self.cache.begin(a, b) {
            return status.subtype_value();
        }
        let same_names =
            x.properties.len() == y.properties.len() && x.names().eq(y.names());
        let result = same_names
            && x.properties
                .iter()
                .zip(y.properties.iter())
                .all(|(p, q)| self.check(q.type_id, p.type_id, method));
        self.cache.finish(a, b, result)
    }

    /// Cross-match keys by identity, in both directions. An unbound key
    /// reads as `?`.
    pub(crate) fn template_maps_equivalent(
        &mut self,
        m: &TemplateTypeMap,
        n: &TemplateTypeMap,
        method: EquivalenceMethod,
    ) -> bool {
        if m.is_empty() && n.is_empty() {
            return true;
        }
        self.template_map_covers(m, n, method) && self.template_map_covers(n, m, method)
    }

    fn template_map_covers(
        &mut self,
        this: &TemplateTypeMap,
        that: &TemplateTypeMap,
        method: EquivalenceMethod,
    ) -> bool {
        for key in this.keys() {
            let this_value = this.resolved_value(key);
            let matched = if that.has_key(key) {
                if self.check(this_value, that.resolved_value(key), method) {
                    KeyMatch::ValueMatch
                } else {
                    KeyMatch::ValueMismatch
                }
            } else {
                KeyMatch::NoKeyMatch
            };
            if matched.fails(method) {
                return false;
            }
        }
        true
    }

    // -------------------------------------------------------------------------
    // Structural types
    // -------------------------------------------------------------------------

    /// Two structural interface instances, or one and a record. Instances
    /// contribute the member map of their interface.
    fn structural_equivalent(&mut self, a: TypeId, b: TypeId, method: EquivalenceMethod) -> bool {
        let reg = self.registry;
        if reg.is_function(a) || reg.is_function(b) {
            return false;
        }
        if reg.is_nominal_type(a)
            && reg.is_nominal_type(b)
            && reg.concrete_nominal_name(a) == reg.concrete_nominal_name(b)
        {
            return true;
        }

        if let Some(status) = self.cache.begin(a, b) {
            return status.subtype_value();
        }
        let ours = self.structural_members(a);
        let theirs = self.structural_members(b);
        let result = ours.len() == theirs.len()
            && ours.iter().all(|(name, &type_id)| {
                theirs
                    .get(name)
                    .is_some_and(|&other| self.check(type_id, other, method))
            });
        trace!(a = a.0, b = b.0, result, "structural equivalence");
        self.cache.finish(a, b, result)
    }

    fn structural_members(&self, id: TypeId) -> MemberTypeMap {
        let reg = self.registry;
        match reg.record_shape(id) {
            Some(shape) => shape.properties.iter().map(|p| (p.name, p.type_id)).collect(),
            None => reg
                .constructor_of(id)
                .map(|ctor| reg.member_type_map(ctor))
                .unwrap_or_default(),
        }
    }
}

impl TypeRegistry {
    /// `Identity` equivalence.
    pub fn is_equivalent(&self, a: TypeId, b: TypeId) -> bool {
        EquivalenceChecker::new(self).check(a, b, EquivalenceMethod::Identity)
    }

    /// `Identity` equivalence, comparing structural types member by member
    /// when `structural` is set.
    pub fn is_equivalent_structural(&self, a: TypeId, b: TypeId, structural: bool) -> bool {
        EquivalenceChecker::new(self)
            .with_structural_typing(structural)
            .check(a, b, EquivalenceMethod::Identity)
    }

    pub fn is_equivalent_under(&self, a: TypeId, b: TypeId, method: EquivalenceMethod) -> bool {
        EquivalenceChecker::new(self).check(a, b, method)
    }

    /// Whether re-inferring `a` as `b` changes anything for flow analysis.
    pub fn differs_from(&self, a: TypeId, b: TypeId) -> bool {
        !self.is_equivalent_under(a, b, EquivalenceMethod::DataFlow)
    }
}

#[cfg(test)]
#[path = "tests/equivalence_tests.rs"]
mod tests;
