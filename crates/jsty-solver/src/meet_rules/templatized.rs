//! Meet with a templatized operand.

use crate::equivalence::EquivalenceChecker;
use crate::registry::TypeRegistry;
use crate::types::*;

impl TypeRegistry {
    /// `this` is templatized. Two instantiations of one raw type meet on
    /// their arguments; anything else goes by subtyping.
    pub(crate) fn templatized_meet(&mut self, this: TypeId, that: TypeId) -> TypeId {
        let TypeData::Templatized { base, args } = self.data(this).clone() else {
            return self.object_bottom(this, that);
        };

        let that_instantiation = match self.data(that) {
            TypeData::Templatized { base, args } => Some((*base, args.clone())),
            _ => None,
        };
        match that_instantiation {
            Some((that_base, that_args)) if self.is_equivalent(base, that_base) => {
                let same_bindings = EquivalenceChecker::new(self).template_maps_equivalent(
                    self.template_map(this),
                    self.template_map(that),
                    EquivalenceMethod::Invariant,
                );
                if same_bindings {
                    return this;
                }
                let mut met = TypeList::new();
                for (&arg, &other) in args.iter().zip(that_args.iter()) {
                    let part = self.greatest_subtype(arg, other);
                    if self.is_empty_type(part) {
                        return base;
                    }
                    met.push(part);
                }
                self.templatized(base, &met)
            }
            Some(_) => self.object_bottom(this, that),
            None => {
                if self.is_subtype(this, that) {
                    this
                } else if self.is_subtype(that, this) {
                    self.filter_no_resolved(that)
                } else {
                    self.object_bottom(this, that)
                }
            }
        }
    }
}
