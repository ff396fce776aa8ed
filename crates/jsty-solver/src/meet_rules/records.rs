//! Record meet.
//!
//! Properties present on both sides meet pairwise. A property only one side
//! lists survives when its type admits `undefined`; any other difference
//! leaves no common subtype.

use jsty_common::Atom;
use tracing::trace;

use crate::registry::TypeRegistry;
use crate::types::*;

impl TypeRegistry {
    pub(crate) fn record_meet(&mut self, record: TypeId, other: TypeId) -> TypeId {
        let (Some(ours), Some(theirs)) = (
            self.record_shape(record).cloned(),
            self.record_shape(other).cloned(),
        ) else {
            return self.object_bottom(record, other);
        };

        let mut properties: Vec<(Atom, TypeId)> = Vec::with_capacity(ours.properties.len());
        for prop in &ours.properties {
            let type_id = match theirs.get(prop.name) {
                Some(other_type) => {
                    let met = self.greatest_subtype(prop.type_id, other_type);
                    if self.is_empty_type(met) {
                        trace!(record = record.0, other = other.0, "record meet conflict");
                        return TypeId::NO_OBJECT_TYPE;
                    }
                    met
                }
                None if self.is_explicitly_voidable(prop.type_id) => prop.type_id,
                None => return TypeId::NO_OBJECT_TYPE,
            };
            properties.push((prop.name, type_id));
        }
        for prop in &theirs.properties {
            if ours.get(prop.name).is_some() {
                continue;
            }
            if !self.is_explicitly_voidable(prop.type_id) {
                return TypeId::NO_OBJECT_TYPE;
            }
            properties.push((prop.name, prop.type_id));
        }
        self.record(properties)
    }
}
