//! Unions on the left-hand side.

use crate::subtype::SubtypeChecker;
use crate::types::TypeId;

impl<'a> SubtypeChecker<'a> {
    /// A union is a subtype when every alternate is. A union with an unknown
    /// alternate reads as `?` and is a subtype of everything.
    pub(crate) fn union_is_subtype(&mut self, alternates: &[TypeId], b: TypeId) -> bool {
        let reg = self.registry;
        if reg.is_unknown_type(b) || reg.is_all_type(b) {
            return true;
        }
        if alternates.iter().any(|&alt| reg.is_unknown_type(alt)) {
            return true;
        }
        alternates.iter().all(|&alt| self.is_subtype(alt, b))
    }
}
