use crate::registry::TypeRegistry;
use crate::types::*;

impl TypeRegistry {
    /// An enum element meets `other` when its backing primitive does.
    /// The result is the element itself, never narrowed to the met
    /// primitive, so `enum{Mixed} ⊓ number` is still `enum{Mixed}`.
    /// `None` lets the caller fall through to the bottom rule.
    pub(crate) fn enum_element_meet(&mut self, element: TypeId, other: TypeId) -> Option<TypeId> {
        let primitive = self.enum_primitive_type(element)?;
        let met = self.greatest_subtype(primitive, other);
        (!self.is_empty_type(met)).then_some(element)
    }
}
