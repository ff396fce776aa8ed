//! Instances, prototypes, enums and records on the left-hand side.

use tracing::trace;

use crate::subtype::SubtypeChecker;
use crate::types::*;

impl<'a> SubtypeChecker<'a> {
    /// Nominal objects: declared interfaces first, then the prototype chain.
    pub(crate) fn object_is_subtype(&mut self, a: TypeId, b: TypeId) -> bool {
        if self.check_helper(a, b) {
            return true;
        }
        let reg = self.registry;
        if reg.is_union(b) {
            return false;
        }
        if reg.is_record(b) {
            return self.record_structural_subtype(a, b);
        }

        let this_ctor = reg.constructor_of(a);
        if let Some(ctor) = this_ctor.filter(|&c| reg.is_interface(c)) {
            if reg
                .extended_interfaces(ctor)
                .iter()
                .any(|&iface| self.is_subtype(iface, b))
            {
                return true;
            }
        } else if reg.constructor_of(b).is_some_and(|c| reg.is_interface(c)) {
            let implemented = this_ctor
                .map(|ctor| reg.all_implemented_interfaces(ctor))
                .unwrap_or_default();
            if implemented.iter().any(|&iface| self.is_subtype(iface, b)) {
                return true;
            }
        }

        if reg.is_unknown_type(a) {
            return true;
        }
        reg.is_implicit_prototype(a, b)
    }

    /// Records are objects; a record against another record compares shape.
    pub(crate) fn record_is_subtype(&mut self, a: TypeId, b: TypeId) -> bool {
        if self.check_helper(a, b) || self.is_subtype(TypeId::OBJECT, b) {
            return true;
        }
        self.registry.is_record(b) && self.record_structural_subtype(a, b)
    }

    /// `a` carries every property of the record `b`, each a subtype of
    /// `b`'s. A property `a` lacks is fine when `b` lists `undefined` for it.
    pub(crate) fn record_structural_subtype(&mut self, a: TypeId, b: TypeId) -> bool {
        let reg = self.registry;
        let Some(shape) = reg.record_shape(b) else {
            return false;
        };
        if let Some(status) = self.cache.begin(a, b) {
            return status.subtype_value();
        }
        let result = shape.properties.iter().all(|prop| {
            if !reg.has_property(a, prop.name) {
                return reg.is_explicitly_voidable(prop.type_id);
            }
            let own = reg.property_type(a, prop.name);
            self.is_subtype(own, prop.type_id)
        });
        trace!(a = a.0, record = b.0, result, "record subtype");
        self.cache.finish(a, b, result)
    }
}
