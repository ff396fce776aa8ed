//! Property maps and enums.
//!
//! Object types collect properties during the declaration phase. A property
//! is either declared (from an annotation) or inferred (from an assignment);
//! an inferred definition never hides a declared one. Lookups walk the
//! implicit prototype chain.

use indexmap::IndexSet;
use jsty_common::limits::MAX_PROTOTYPE_CHAIN_LENGTH;
use jsty_common::{Atom, NodeIndex};
use rustc_hash::FxBuildHasher;
use thiserror::Error;
use tracing::trace;

use crate::registry::TypeRegistry;
use crate::template_map::TemplateTypeMap;
use crate::types::*;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("declarations are closed; cannot add properties to type {owner:?}")]
    TypeClosed { owner: TypeId },
    #[error("type {0:?} cannot hold properties")]
    NotAnObject(TypeId),
    #[error("type {0:?} has a fixed shape")]
    Immutable(TypeId),
}

/// Ordered set of property names.
pub type PropertyNames = IndexSet<Atom, FxBuildHasher>;

impl TypeRegistry {
    // =========================================================================
    // Definitions
    // =========================================================================

    /// Declare `name` on `owner`.
    ///
    /// Returns `Ok(false)` when a declared property of that name already
    /// exists on `owner` itself; the earlier declaration wins.
    pub fn define_declared_property(
        &mut self,
        owner: TypeId,
        name: Atom,
        type_id: TypeId,
        node: NodeIndex,
    ) -> Result<bool, DeclarationError> {
        let owner = self.property_owner(owner)?;
        let data = self.object_data_mut_checked(owner)?;
        if data.properties.get(&name).is_some_and(|p| !p.inferred) {
            return Ok(false);
        }
        data.properties
            .insert(name, PropertyInfo::declared(type_id, node));
        trace!(owner = owner.0, name = name.0, "declared property");
        Ok(true)
    }

    /// Record an assignment to `name` on `owner`.
    ///
    /// A declared property anywhere on the chain is left alone. Otherwise the
    /// new type is joined with whatever type the chain already infers.
    pub fn define_inferred_property(
        &mut self,
        owner: TypeId,
        name: Atom,
        type_id: TypeId,
        node: NodeIndex,
    ) -> Result<bool, DeclarationError> {
        let owner = self.property_owner(owner)?;
        self.object_data_mut_checked(owner)?;

        let type_id = match self.find_property(owner, name) {
            Some(existing) if !existing.inferred => return Ok(true),
            Some(existing) => self.least_supertype(existing.type_id, type_id),
            None => type_id,
        };
        let data = self.object_data_mut_checked(owner)?;
        data.properties
            .insert(name, PropertyInfo::inferred(type_id, node));
        trace!(owner = owner.0, name = name.0, "inferred property");
        Ok(true)
    }

    /// The object that stores properties written through `id`.
    fn property_owner(&self, id: TypeId) -> Result<TypeId, DeclarationError> {
        let id = self.canonical(id);
        if self.declarations_closed() {
            return Err(DeclarationError::TypeClosed { owner: id });
        }
        match self.data(id) {
            TypeData::Templatized { base, .. } => Ok(self.canonical(*base)),
            TypeData::Record(_) => Err(DeclarationError::Immutable(id)),
            TypeData::Object(_) | TypeData::Function(_) | TypeData::Enum(_) => Ok(id),
            _ => Err(DeclarationError::NotAnObject(id)),
        }
    }

    fn object_data_mut_checked(
        &mut self,
        owner: TypeId,
    ) -> Result<&mut ObjectData, DeclarationError> {
        let data = self
            .object_data_mut(owner)
            .ok_or(DeclarationError::NotAnObject(owner))?;
        if data.flags.contains(ObjectFlags::SYNTHESIZED) {
            return Err(DeclarationError::Immutable(owner));
        }
        Ok(data)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The slot `id` itself holds for `name`.
    pub fn own_property(&self, id: TypeId, name: Atom) -> Option<PropertyInfo> {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Object(obj) | TypeData::Function(obj) | TypeData::Enum(obj) => {
                self.object(*obj).properties.get(&name).copied()
            }
            TypeData::Record(shape) => shape
                .get(name)
                .map(|t| PropertyInfo::declared(t, self.record_property_node(id, name))),
            TypeData::Templatized { base, .. } => self.own_property(*base, name),
            _ => None,
        }
    }

    /// The nearest slot for `name` along the implicit prototype chain.
    pub fn find_property(&self, id: TypeId, name: Atom) -> Option<PropertyInfo> {
        let mut current = Some(self.canonical(id));
        let mut steps = 0;
        while let Some(link) = current {
            if steps > MAX_PROTOTYPE_CHAIN_LENGTH {
                return None;
            }
            if let Some(slot) = self.own_property(link, name) {
                return Some(slot);
            }
            current = self.implicit_prototype(link);
            steps += 1;
        }
        None
    }

    pub fn has_own_property(&self, id: TypeId, name: Atom) -> bool {
        self.own_property(id, name).is_some()
    }

    /// Empty and unknown types have every property.
    pub fn has_property(&self, id: TypeId, name: Atom) -> bool {
        let id = self.canonical(id);
        if self.is_empty_type(id) || self.is_unknown_type(id) {
            return true;
        }
        if let Some(alternates) = self.union_alternates(id) {
            return alternates.iter().any(|&alt| self.has_property(alt, name));
        }
        self.find_property(self.property_receiver(id), name).is_some()
    }

    /// The type of `name` on `id`.
    pub fn property_type(&self, id: TypeId, name: Atom) -> TypeId {
        let id = self.canonical(id);
        if let Some(alternates) = self.union_alternates(id) {
            let mut types = alternates.iter().map(|&alt| self.property_type(alt, name));
            let first = types.next().unwrap_or(TypeId::UNKNOWN);
            return if types.all(|t| t == first) {
                first
            } else {
                TypeId::UNKNOWN
            };
        }

        let receiver = self.property_receiver(id);
        match self.find_property(receiver, name) {
            Some(slot) => match self.data(id) {
                TypeData::Templatized { .. } => {
                    let map = self.template_map(id);
                    map.value(self.canonical(slot.type_id))
                        .unwrap_or(slot.type_id)
                }
                _ => slot.type_id,
            },
            None if self.is_no_resolved_type(id) || self.is_checked_unknown_type(id) => {
                TypeId::CHECKED_UNKNOWN
            }
            None if self.is_empty_type(id) => TypeId::NO_TYPE,
            None => TypeId::UNKNOWN,
        }
    }

    /// Scalars and enum elements look up properties on their boxed form.
    fn property_receiver(&self, id: TypeId) -> TypeId {
        self.autoboxes_to(id).unwrap_or(id)
    }

    pub fn is_property_type_declared(&self, id: TypeId, name: Atom) -> bool {
        self.find_property(id, name).is_some_and(|p| !p.inferred)
    }

    pub fn is_property_type_inferred(&self, id: TypeId, name: Atom) -> bool {
        self.find_property(id, name).is_some_and(|p| p.inferred)
    }

    /// Names `id` itself holds, in definition order.
    pub fn own_property_names(&self, id: TypeId) -> Vec<Atom> {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Object(obj) | TypeData::Function(obj) | TypeData::Enum(obj) => {
                self.object(*obj).properties.keys().copied().collect()
            }
            TypeData::Record(shape) => shape.names().collect(),
            TypeData::Templatized { base, .. } => self.own_property_names(*base),
            _ => Vec::new(),
        }
    }

    /// Every name reachable along the prototype chain, nearest first.
    pub fn property_names(&self, id: TypeId) -> PropertyNames {
        let mut names = PropertyNames::default();
        let mut current = Some(self.canonical(id));
        let mut steps = 0;
        while let Some(link) = current {
            if steps > MAX_PROTOTYPE_CHAIN_LENGTH {
                break;
            }
            names.extend(self.own_property_names(link));
            current = self.implicit_prototype(link);
            steps += 1;
        }
        names
    }

    // =========================================================================
    // Enums
    // =========================================================================

    /// Declare an enum whose elements are backed by `primitive`.
    pub fn enum_type(&mut self, name: &str, primitive: TypeId) -> TypeId {
        let name = self.intern_name(name);
        let element = TypeId(self.len() as u32 + 1);
        let data = ObjectData::new(
            Some(name),
            Some(TypeId::OBJECT),
            ObjectKind::Enum { element, primitive },
        );
        let enum_id = self.alloc_object(data, TypeData::Enum, TemplateTypeMap::new());
        let pushed = self.push_node(TypeNode::new(TypeData::EnumElement(enum_id)));
        debug_assert_eq!(pushed, element);
        enum_id
    }

    /// Add a member to an enum. Every member has the element type.
    pub fn add_enum_value(
        &mut self,
        enum_id: TypeId,
        name: Atom,
        node: NodeIndex,
    ) -> Result<bool, DeclarationError> {
        let element = self
            .enum_element_type(enum_id)
            .ok_or(DeclarationError::NotAnObject(enum_id))?;
        self.define_declared_property(enum_id, name, element, node)
    }

    pub fn enum_element_type(&self, enum_id: TypeId) -> Option<TypeId> {
        match self.object_data(self.canonical(enum_id))?.kind {
            ObjectKind::Enum { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Backing type of an enum or of one of its elements.
    pub fn enum_primitive_type(&self, id: TypeId) -> Option<TypeId> {
        let id = self.canonical(id);
        let enum_id = match self.data(id) {
            TypeData::EnumElement(owner) => *owner,
            TypeData::Enum(_) => id,
            _ => return None,
        };
        match self.object_data(enum_id)?.kind {
            ObjectKind::Enum { primitive, .. } => Some(primitive),
            _ => None,
        }
    }

    /// The enum an element belongs to.
    pub fn enum_of_element(&self, id: TypeId) -> Option<TypeId> {
        match self.data(self.canonical(id)) {
            TypeData::EnumElement(owner) => Some(*owner),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/objects_tests.rs"]
mod tests;
