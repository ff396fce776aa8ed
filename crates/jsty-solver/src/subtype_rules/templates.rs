//! Template map compatibility.
//!
//! Bindings are compared invariantly, except for covariant containers: when
//! the supertype is one (or has no object type at all), only the element
//! binding is compared, and a subtype relation in either direction suffices.

use crate::equivalence::EquivalenceChecker;
use crate::subtype::SubtypeChecker;
use crate::types::*;

impl<'a> SubtypeChecker<'a> {
    pub(crate) fn template_maps_match(&mut self, a: TypeId, b: TypeId) -> bool {
        let reg = self.registry;
        let this_map = reg.template_map(a);
        let that_map = reg.template_map(b);
        if this_map.is_empty() && that_map.is_empty() {
            return true;
        }

        if let Some(key) = self.covariant_element_key(b) {
            let this_element = this_map.resolved_value(key);
            let that_element = that_map.resolved_value(key);
            return self.is_subtype(this_element, that_element)
                || self.is_subtype(that_element, this_element);
        }

        EquivalenceChecker::new(reg)
            .with_structural_typing(self.structural)
            .template_maps_equivalent(this_map, that_map, EquivalenceMethod::Invariant)
    }

    /// The key whose binding is compared when `b` is exempt from invariance.
    /// Containers carry their element parameter last.
    fn covariant_element_key(&self, b: TypeId) -> Option<TypeId> {
        let reg = self.registry;
        let exempt = !has_object_type(reg.data(b))
            || reg
                .reference_name(b)
                .is_some_and(|name| self.covariant_containers.contains(reg.name_text(name)));
        exempt.then(|| {
            reg.template_map(b)
                .keys()
                .last()
                .unwrap_or(TypeId::OBJECT_ELEMENT_KEY)
        })
    }
}

/// Kinds that are not objects in any reading.
fn has_object_type(data: &TypeData) -> bool {
    !matches!(
        data,
        TypeData::Union(_)
            | TypeData::All
            | TypeData::Null
            | TypeData::Void
            | TypeData::Primitive(_)
    )
}
