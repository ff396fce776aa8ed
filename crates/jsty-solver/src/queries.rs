//! Type Query Functions
//!
//! Kind predicates, names and prototype links. Every query looks through a
//! settled resolution first, so callers can pass forward references and
//! their targets interchangeably.
//!
//! # Proxies
//!
//! Three variants stand in for another type:
//! - an unresolved `Named` reference reads as `?`
//! - a `Template` variable reads as `?`
//! - a `Templatized` type forwards to its raw base
//!
//! [`TypeRegistry::referenced_type`] gives the stand-in target.

use jsty_common::Atom;
use jsty_common::limits::MAX_PROTOTYPE_CHAIN_LENGTH;
use rustc_hash::FxHashSet;

use crate::registry::TypeRegistry;
use crate::types::*;

impl TypeRegistry {
    // =========================================================================
    // Kind checks
    // =========================================================================

    pub fn is_no_type(&self, id: TypeId) -> bool {
        self.canonical(id) == TypeId::NO_TYPE
    }

    pub fn is_no_object_type(&self, id: TypeId) -> bool {
        self.canonical(id) == TypeId::NO_OBJECT_TYPE
    }

    /// The canonical `NoResolvedType` or a named one.
    pub fn is_no_resolved_type(&self, id: TypeId) -> bool {
        matches!(
            self.data(self.canonical(id)),
            TypeData::Bottom(BottomKind::NoResolved) | TypeData::Unresolved(_)
        )
    }

    /// Uninhabited: every bottom kind and the least function.
    pub fn is_empty_type(&self, id: TypeId) -> bool {
        let id = self.canonical(id);
        id == TypeId::LEAST_FUNCTION
            || matches!(self.data(id), TypeData::Bottom(_) | TypeData::Unresolved(_))
    }

    pub fn is_all_type(&self, id: TypeId) -> bool {
        matches!(self.data(self.canonical(id)), TypeData::All)
    }

    pub fn is_checked_unknown_type(&self, id: TypeId) -> bool {
        matches!(
            self.data(self.canonical(id)),
            TypeData::Unknown { checked: true }
        )
    }

    /// The `?` type itself, as opposed to anything that merely reads as `?`.
    pub fn is_native_unknown_type(&self, id: TypeId) -> bool {
        matches!(self.data(self.canonical(id)), TypeData::Unknown { .. })
    }

    pub fn is_null_type(&self, id: TypeId) -> bool {
        self.canonical(id) == TypeId::NULL
    }

    pub fn is_void_type(&self, id: TypeId) -> bool {
        self.canonical(id) == TypeId::VOID
    }

    pub fn is_union(&self, id: TypeId) -> bool {
        matches!(self.data(self.canonical(id)), TypeData::Union(_))
    }

    pub fn is_record(&self, id: TypeId) -> bool {
        matches!(self.data(self.canonical(id)), TypeData::Record(_))
    }

    pub fn is_function(&self, id: TypeId) -> bool {
        matches!(self.data(self.canonical(id)), TypeData::Function(_))
    }

    pub fn is_templatized(&self, id: TypeId) -> bool {
        matches!(
            self.data(self.canonical(id)),
            TypeData::Templatized { .. }
        )
    }

    pub fn is_template(&self, id: TypeId) -> bool {
        matches!(self.data(self.canonical(id)), TypeData::Template { .. })
    }

    pub fn is_enum(&self, id: TypeId) -> bool {
        matches!(self.data(self.canonical(id)), TypeData::Enum(_))
    }

    pub fn is_enum_element(&self, id: TypeId) -> bool {
        matches!(self.data(self.canonical(id)), TypeData::EnumElement(_))
    }

    /// A forward reference that has not been resolved.
    pub fn is_named_proxy(&self, id: TypeId) -> bool {
        matches!(self.data(self.canonical(id)), TypeData::Named(_))
    }

    pub fn is_constructor(&self, id: TypeId) -> bool {
        self.function_info(self.canonical(id))
            .is_some_and(|f| f.is_constructor())
    }

    pub fn is_interface(&self, id: TypeId) -> bool {
        self.function_info(self.canonical(id))
            .is_some_and(|f| f.is_interface())
    }

    pub fn is_ordinary_function(&self, id: TypeId) -> bool {
        self.function_info(self.canonical(id))
            .is_some_and(|f| f.is_ordinary())
    }

    pub fn is_native_object(&self, id: TypeId) -> bool {
        self.object_data(self.canonical(id))
            .is_some_and(|o| o.flags.contains(ObjectFlags::NATIVE))
    }

    pub fn is_prototype_object(&self, id: TypeId) -> bool {
        self.object_data(self.canonical(id))
            .is_some_and(|o| o.flags.contains(ObjectFlags::PROTOTYPE))
    }

    /// An instance object of some constructor or interface.
    pub fn is_instance_type(&self, id: TypeId) -> bool {
        self.object_data(self.canonical(id))
            .is_some_and(|o| matches!(o.kind, ObjectKind::Instance))
    }

    /// Alternates of a union.
    pub fn union_alternates(&self, id: TypeId) -> Option<&[TypeId]> {
        match self.data(self.canonical(id)) {
            TypeData::Union(alternates) => Some(alternates),
            _ => None,
        }
    }

    pub fn record_shape(&self, id: TypeId) -> Option<&RecordShape> {
        match self.data(self.canonical(id)) {
            TypeData::Record(shape) => Some(shape),
            _ => None,
        }
    }

    // =========================================================================
    // Proxies and unknowns
    // =========================================================================

    /// The type a proxy stands for.
    pub fn referenced_type(&self, id: TypeId) -> Option<TypeId> {
        match self.data(self.canonical(id)) {
            TypeData::Named(_) | TypeData::Template { .. } => Some(TypeId::UNKNOWN),
            TypeData::Templatized { base, .. } => Some(self.canonical(*base)),
            _ => None,
        }
    }

    pub fn is_proxy(&self, id: TypeId) -> bool {
        self.referenced_type(id).is_some()
    }

    /// Whether `id` reads as `?`.
    ///
    /// An object type is unknown when its prototype chain is, or, at the top
    /// of a chain, when one of the interfaces it extends is.
    pub fn is_unknown_type(&self, id: TypeId) -> bool {
        self.is_unknown_at(id, 0)
    }

    fn is_unknown_at(&self, id: TypeId, depth: u32) -> bool {
        if depth > MAX_PROTOTYPE_CHAIN_LENGTH {
            return false;
        }
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Unknown { .. } | TypeData::Named(_) | TypeData::Template { .. } => true,
            TypeData::Templatized { base, .. } => self.is_unknown_at(*base, depth + 1),
            TypeData::Union(alternates) => alternates
                .iter()
                .any(|&alt| self.is_unknown_at(alt, depth + 1)),
            TypeData::Object(obj) | TypeData::Function(obj) | TypeData::Enum(obj) => {
                self.object_is_unknown(*obj, depth)
            }
            _ => false,
        }
    }

    fn object_is_unknown(&self, obj: ObjectId, depth: u32) -> bool {
        let data = self.object(obj);
        if let Some(&cached) = data.unknown.get() {
            return cached;
        }
        let result = match data.implicit_prototype.map(|p| self.canonical(p)) {
            Some(proto) if !self.is_native_object(proto) => self.is_unknown_at(proto, depth + 1),
            _ => self
                .ctor_extended_interfaces(obj)
                .iter()
                .any(|&iface| self.is_unknown_at(iface, depth + 1)),
        };
        if self.declarations_closed() {
            let _ = data.unknown.set(result);
        }
        result
    }

    /// Interfaces extended by the interface an instance or prototype
    /// belongs to.
    fn ctor_extended_interfaces(&self, obj: ObjectId) -> TypeList {
        let data = self.object(obj);
        let owner = match data.kind {
            ObjectKind::Instance => data.constructor,
            ObjectKind::Prototype { owner } => Some(owner),
            _ => None,
        };
        owner
            .and_then(|ctor| self.function_info(self.canonical(ctor)))
            .filter(|f| f.is_interface())
            .map(|f| f.extended.clone())
            .unwrap_or_default()
    }

    // =========================================================================
    // Object classification
    // =========================================================================

    /// Whether values of `id` are objects.
    pub fn is_object(&self, id: TypeId) -> bool {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Bottom(BottomKind::NoType) => false,
            TypeData::Bottom(_) | TypeData::Unresolved(_) => true,
            TypeData::Object(_)
            | TypeData::Function(_)
            | TypeData::Enum(_)
            | TypeData::Record(_)
            | TypeData::Templatized { .. }
            | TypeData::Named(_) => true,
            TypeData::EnumElement(_) => self
                .enum_primitive_type(id)
                .is_some_and(|p| self.is_object(p)),
            TypeData::Union(alternates) => alternates.iter().all(|&alt| self.is_object(alt)),
            _ => false,
        }
    }

    /// Named instances, enum elements and references to them.
    pub fn is_nominal_type(&self, id: TypeId) -> bool {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Object(obj) => {
                let data = self.object(*obj);
                data.name.is_some() && matches!(data.kind, ObjectKind::Instance)
            }
            TypeData::EnumElement(_) | TypeData::Named(_) => true,
            TypeData::Templatized { base, .. } => self.is_nominal_type(*base),
            _ => false,
        }
    }

    /// An interface function marked for implicit structural matching.
    pub fn is_structural_interface(&self, id: TypeId) -> bool {
        self.function_info(self.canonical(id))
            .is_some_and(|f| f.is_interface() && f.structural)
    }

    /// A record, or an instance of a structural interface.
    pub fn is_structural_type(&self, id: TypeId) -> bool {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Record(_) => true,
            TypeData::Object(obj) => {
                let data = self.object(*obj);
                matches!(data.kind, ObjectKind::Instance)
                    && data
                        .constructor
                        .is_some_and(|ctor| self.is_structural_interface(ctor))
            }
            TypeData::Templatized { base, .. } => self.is_structural_type(*base),
            _ => false,
        }
    }

    /// `undefined`, or a union listing it.
    pub fn is_explicitly_voidable(&self, id: TypeId) -> bool {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Void => true,
            TypeData::Union(alternates) => alternates.iter().any(|&alt| alt == TypeId::VOID),
            _ => false,
        }
    }

    /// Whether a type mentions a type variable anywhere in its bindings or
    /// signature.
    pub fn has_any_template_types(&self, id: TypeId) -> bool {
        let mut visiting = FxHashSet::default();
        self.has_template_types_in(id, &mut visiting)
    }

    fn has_template_types_in(&self, id: TypeId, visiting: &mut FxHashSet<TypeId>) -> bool {
        let id = self.canonical(id);
        if !visiting.insert(id) {
            return false;
        }
        let found = match self.data(id) {
            TypeData::Template { .. } => true,
            TypeData::Templatized { args, .. } => args
                .iter()
                .any(|&arg| self.has_template_types_in(arg, visiting)),
            TypeData::Union(alternates) => alternates
                .iter()
                .any(|&alt| self.has_template_types_in(alt, visiting)),
            TypeData::Record(shape) => shape
                .properties
                .iter()
                .any(|p| self.has_template_types_in(p.type_id, visiting)),
            TypeData::Function(_) => {
                let info = self.function_info(id);
                info.is_some_and(|f| {
                    f.signature
                        .params
                        .iter()
                        .any(|p| self.has_template_types_in(p.type_id, visiting))
                        || self.has_template_types_in(f.signature.return_type, visiting)
                        || (f.is_ordinary() && self.has_template_types_in(f.this_type, visiting))
                })
            }
            TypeData::Object(_) => {
                let values: TypeList = self.template_map(id).bound_values().collect();
                values
                    .iter()
                    .any(|&value| self.has_template_types_in(value, visiting))
            }
            _ => false,
        };
        visiting.remove(&id);
        found
    }

    // =========================================================================
    // Boxing
    // =========================================================================

    /// The object type a scalar boxes to.
    pub fn autoboxes_to(&self, id: TypeId) -> Option<TypeId> {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Primitive(kind) => Some(kind.object_type()),
            TypeData::EnumElement(_) => self
                .enum_primitive_type(id)
                .and_then(|p| self.autoboxes_to(p)),
            _ => None,
        }
    }

    /// The scalar a boxed object unboxes to.
    pub fn unboxes_to(&self, id: TypeId) -> Option<TypeId> {
        match self.canonical(id) {
            TypeId::BOOLEAN_OBJECT => Some(TypeId::BOOLEAN),
            TypeId::NUMBER_OBJECT => Some(TypeId::NUMBER),
            TypeId::STRING_OBJECT => Some(TypeId::STRING),
            _ => None,
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub fn reference_name(&self, id: TypeId) -> Option<Atom> {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Object(obj) | TypeData::Function(obj) | TypeData::Enum(obj) => {
                self.object(*obj).name
            }
            TypeData::Templatized { base, .. } => self.reference_name(*base),
            TypeData::EnumElement(owner) => self.reference_name(*owner),
            TypeData::Named(name) | TypeData::Unresolved(name) => Some(*name),
            _ => None,
        }
    }

    /// The name of the nominal type behind any proxies.
    pub fn concrete_nominal_name(&self, id: TypeId) -> Option<Atom> {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Templatized { base, .. } if self.is_nominal_type(*base) => {
                self.concrete_nominal_name(*base)
            }
            _ => self.reference_name(id),
        }
    }

    /// Reference name without a `(...)` suffix.
    pub fn normalized_reference_name(&self, id: TypeId) -> Option<&str> {
        let name = self.name_text(self.reference_name(id)?);
        Some(match name.find('(') {
            Some(pos) => &name[..pos],
            None => name,
        })
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// The constructor or interface function an object was created by.
    pub fn constructor_of(&self, id: TypeId) -> Option<TypeId> {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Object(obj) | TypeData::Function(obj) | TypeData::Enum(obj) => self
                .object(*obj)
                .constructor
                .map(|ctor| self.canonical(ctor)),
            TypeData::Templatized { base, .. } => self.constructor_of(*base),
            _ => None,
        }
    }

    /// The next link of the prototype chain.
    pub fn implicit_prototype(&self, id: TypeId) -> Option<TypeId> {
        let id = self.canonical(id);
        match self.data(id) {
            TypeData::Object(obj) | TypeData::Function(obj) | TypeData::Enum(obj) => self
                .object(*obj)
                .implicit_prototype
                .map(|p| self.canonical(p)),
            TypeData::Record(_) => Some(TypeId::OBJECT),
            TypeData::Templatized { base, .. } => self.implicit_prototype(*base),
            _ => None,
        }
    }

    /// The template key of `id` spelled `name`.
    pub fn template_key_named(&self, id: TypeId, name: &str) -> Option<TypeId> {
        let atom = self.interner().lookup(name)?;
        self.template_map(self.canonical(id))
            .keys()
            .find(|&key| self.template_name(key) == Some(atom))
    }

    /// The name of a type variable.
    pub fn template_name(&self, id: TypeId) -> Option<Atom> {
        match self.data(self.canonical(id)) {
            TypeData::Template { name, .. } => Some(*name),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/queries_tests.rs"]
mod tests;
