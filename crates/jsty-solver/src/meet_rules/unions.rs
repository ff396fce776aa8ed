//! Meet with a union operand.

use crate::registry::TypeRegistry;
use crate::types::*;

impl TypeRegistry {
    /// Distribute the meet over the alternates of `union` and keep the
    /// non-empty results.
    pub(crate) fn union_meet(&mut self, union: TypeId, other: TypeId) -> TypeId {
        let alternates: TypeList = self
            .union_alternates(union)
            .map(|alts| alts.iter().copied().collect())
            .unwrap_or_default();

        let mut met = TypeList::new();
        for alternate in alternates {
            let part = self.greatest_subtype(alternate, other);
            if !self.is_empty_type(part) {
                met.push(part);
            }
        }

        let result = self.union(met);
        if result == TypeId::NO_TYPE {
            self.object_bottom(union, other)
        } else {
            result
        }
    }
}
