//! Implicit structural matching against structural interfaces.
//!
//! `implicit_match(right, left)` asks whether `right`'s members satisfy the
//! contract of `left` without a declared `@implements`. Unions and
//! templatized interfaces never match implicitly.

use tracing::trace;

use crate::subtype::SubtypeChecker;
use crate::types::*;

impl<'a> SubtypeChecker<'a> {
    pub(crate) fn implicit_match(&mut self, right: TypeId, left: TypeId) -> bool {
        let reg = self.registry;
        if reg.is_union(right) || reg.is_union(left) {
            return false;
        }
        if !reg.is_object(right) || !reg.is_object(left) {
            return false;
        }
        if reg.is_templatized(left) {
            return false;
        }

        if reg.is_structural_interface(left) {
            if reg.is_function(right) {
                return self.constructor_implicit_match(right, left, None);
            }
            if reg.is_record(right) {
                return self.object_implicit_match(right, left);
            }
        }

        let Some(left_ctor) = reg
            .constructor_of(left)
            .filter(|&ctor| reg.is_structural_interface(ctor))
        else {
            return false;
        };
        match reg.constructor_of(right) {
            Some(right_ctor) => self.constructor_implicit_match(right_ctor, left_ctor, Some(right)),
            None => self.object_implicit_match(right, left_ctor),
        }
    }

    /// Every member of the interface `left` must appear on `right` with a
    /// subtype. Members come from `right`'s member map, then from `instance`
    /// for fields assigned on instances.
    fn constructor_implicit_match(
        &mut self,
        right: TypeId,
        left: TypeId,
        instance: Option<TypeId>,
    ) -> bool {
        let reg = self.registry;
        assert!(
            reg.is_structural_interface(left),
            "constructor_implicit_match: {left:?} is not a structural interface"
        );
        if reg.explicitly_implements_or_extends(right, left) {
            return true;
        }
        if let Some(status) = self.cache.begin(right, left) {
            return status.subtype_value();
        }
        if reg.has_any_template_types(left) || reg.template_map(left).has_unfilled_keys() {
            trace!(right = right.0, left = left.0, "generic interface, no implicit match");
            return self.cache.finish(right, left, false);
        }

        let required = reg.member_type_map(left);
        let available = reg.member_type_map(right);
        let result = required.iter().all(|(&name, &wanted)| {
            let found = available.get(&name).copied().or_else(|| {
                instance
                    .filter(|&i| reg.find_property(i, name).is_some())
                    .map(|i| reg.property_type(i, name))
            });
            found.is_some_and(|have| self.is_subtype(have, wanted))
        });
        trace!(right = right.0, left = left.0, result, "implicit interface match");
        self.cache.finish(right, left, result)
    }

    /// Like `constructor_implicit_match`, over the properties `right` can
    /// reach. A missing member is fine when the interface lists `undefined`
    /// for it.
    fn object_implicit_match(&mut self, right: TypeId, left: TypeId) -> bool {
        let reg = self.registry;
        assert!(
            reg.is_structural_interface(left),
            "object_implicit_match: {left:?} is not a structural interface"
        );
        if let Some(status) = self.cache.begin(right, left) {
            return status.subtype_value();
        }
        let required = reg.member_type_map(left);
        let result = required.iter().all(|(&name, &wanted)| {
            if reg.find_property(right, name).is_none() {
                return reg.is_explicitly_voidable(wanted);
            }
            let have = reg.property_type(right, name);
            self.is_subtype(have, wanted)
        });
        trace!(right = right.0, left = left.0, result, "implicit object match");
        self.cache.finish(right, left, result)
    }
}
