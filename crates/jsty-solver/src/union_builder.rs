//! Union normalization.
//!
//! `UnionBuilder` accumulates alternates and keeps them pairwise
//! non-redundant: an alternate subsumed by one already present is dropped,
//! and alternates it subsumes are removed. Subsumption here uses declared
//! relationships only, so two structurally compatible interfaces both stay.
//!
//! Function alternates live in their own sub-lattice and are merged into a
//! single alternate through the function join.
//!
//! The finished union is sorted by display text, then by id for alternates
//! that render alike, so equal sets of alternates always intern to the same
//! node.

use tracing::{debug, trace};

use crate::format::TypeFormatter;
use crate::registry::TypeRegistry;
use crate::template_map::TemplateTypeMap;
use crate::types::*;

pub struct UnionBuilder<'a> {
    registry: &'a mut TypeRegistry,
    alternates: Vec<TypeId>,
    /// Index of the single function alternate, if any.
    function_position: Option<usize>,
    all: bool,
    native_unknown: bool,
    all_unknowns_checked: bool,
    max_size: usize,
}

impl<'a> UnionBuilder<'a> {
    pub fn new(registry: &'a mut TypeRegistry) -> Self {
        let max_size = registry.options().max_union_size;
        Self {
            registry,
            alternates: Vec::new(),
            function_position: None,
            all: false,
            native_unknown: false,
            all_unknowns_checked: true,
            max_size,
        }
    }

    pub fn add_all(mut self, alternates: impl IntoIterator<Item = TypeId>) -> Self {
        for alternate in alternates {
            self.add(alternate);
        }
        self
    }

    pub fn add(&mut self, alternate: TypeId) -> &mut Self {
        let alternate = self.registry.canonical(alternate);
        if alternate == TypeId::NO_TYPE {
            return self;
        }
        self.all |= self.registry.is_all_type(alternate);
        if self.registry.is_native_unknown_type(alternate) {
            self.native_unknown = true;
            self.all_unknowns_checked &= self.registry.is_checked_unknown_type(alternate);
        }
        if self.all || self.native_unknown {
            return self;
        }

        if let Some(nested) = self.registry.union_alternates(alternate) {
            let nested: TypeList = nested.iter().copied().collect();
            for alt in nested {
                self.add(alt);
            }
            return self;
        }
        if self.alternates.len() > self.max_size {
            return self;
        }

        if self.registry.is_function(alternate) {
            if let Some(position) = self.function_position {
                let current = self.alternates[position];
                self.alternates[position] = self.registry.sup_and_inf(alternate, current, true);
                return self;
            }
        }

        let mut index = 0;
        while index < self.alternates.len() {
            let current = self.alternates[index];
            match self.compare(alternate, current) {
                Subsumption::Redundant => return self,
                Subsumption::Replaces => {
                    self.alternates.remove(index);
                    self.function_position = match self.function_position {
                        Some(p) if p == index => None,
                        Some(p) if p > index => Some(p - 1),
                        other => other,
                    };
                    continue;
                }
                Subsumption::Merge(merged) => {
                    self.alternates[index] = merged;
                    return self;
                }
                Subsumption::Keep => {}
            }
            index += 1;
        }

        if self.registry.is_function(alternate) {
            self.function_position = Some(self.alternates.len());
        }
        self.alternates.push(alternate);
        self
    }

    /// How `alternate` relates to an alternate already present.
    fn compare(&mut self, alternate: TypeId, current: TypeId) -> Subsumption {
        let reg = &*self.registry;
        let loose = |id: TypeId| {
            reg.is_unknown_type(id) || reg.is_no_resolved_type(id) || reg.has_any_template_types(id)
        };
        if loose(alternate) || loose(current) {
            return if reg.is_equivalent_structural(alternate, current, false) {
                Subsumption::Redundant
            } else {
                Subsumption::Keep
            };
        }

        let (alt_generic, cur_generic) = (reg.is_templatized(alternate), reg.is_templatized(current));
        if alt_generic || cur_generic {
            return match (alt_generic, cur_generic) {
                (true, false) if reg.is_subtype_without_structural_typing(alternate, current) => {
                    Subsumption::Redundant
                }
                (false, true) if reg.is_subtype_without_structural_typing(current, alternate) => {
                    Subsumption::Replaces
                }
                (true, true) => self.compare_templatized(alternate, current),
                _ => Subsumption::Keep,
            };
        }

        if reg.is_subtype_without_structural_typing(alternate, current) {
            Subsumption::Redundant
        } else if reg.is_subtype_without_structural_typing(current, alternate) {
            Subsumption::Replaces
        } else {
            Subsumption::Keep
        }
    }

    /// `Array<string>` and `Array<number>` merge to `Array<?>`.
    fn compare_templatized(&mut self, alternate: TypeId, current: TypeId) -> Subsumption {
        let (TypeData::Templatized { base: a, .. }, TypeData::Templatized { base: c, .. }) =
            (self.registry.data(alternate).clone(), self.registry.data(current).clone())
        else {
            return Subsumption::Keep;
        };
        if !self.registry.is_equivalent(a, c) {
            return Subsumption::Keep;
        }
        if self.registry.is_equivalent_structural(alternate, current, false) {
            return Subsumption::Redundant;
        }
        let arity = self.registry.template_map(a).len();
        let unknowns = vec![TypeId::UNKNOWN; arity];
        Subsumption::Merge(self.registry.templatized(a, &unknowns))
    }

    pub fn build(self) -> TypeId {
        if self.all {
            return TypeId::ALL;
        }
        if self.native_unknown {
            return if self.all_unknowns_checked {
                TypeId::CHECKED_UNKNOWN
            } else {
                TypeId::UNKNOWN
            };
        }
        match self.alternates.len() {
            0 => TypeId::NO_TYPE,
            1 => self.alternates[0],
            n if n > self.max_size => {
                debug!(alternates = n, max = self.max_size, "union too large, collapsed to ?");
                TypeId::UNKNOWN
            }
            _ => {
                let Self {
                    registry,
                    mut alternates,
                    ..
                } = self;
                let formatter = TypeFormatter::new(registry);
                alternates.sort_by_cached_key(|&id| (formatter.format(id), id));
                let list: TypeList = alternates.into_iter().collect();
                trace!(alternates = list.len(), "union built");
                registry.intern_node(TypeData::Union(list), TemplateTypeMap::new())
            }
        }
    }
}

enum Subsumption {
    /// The new alternate adds nothing.
    Redundant,
    /// The new alternate makes the current one obsolete.
    Replaces,
    /// Both collapse into the given alternate.
    Merge(TypeId),
    Keep,
}

impl TypeRegistry {
    /// The normalized union of `alternates`. No alternates gives `NO_TYPE`.
    pub fn union(&mut self, alternates: impl IntoIterator<Item = TypeId>) -> TypeId {
        UnionBuilder::new(self).add_all(alternates).build()
    }
}

#[cfg(test)]
#[path = "tests/union_builder_tests.rs"]
mod tests;
