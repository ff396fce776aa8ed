//! Class Hierarchy Type Construction
//!
//! This module builds the type triple behind a class or interface
//! declaration and answers questions about the resulting hierarchy.
//!
//! Responsibilities:
//! - Lay out constructor, instance and prototype object for a declaration
//! - Thread the superclass into the prototype chain and template map
//! - Collect implemented and extended interfaces
//! - Compute the member map used by structural matching
//!
//! Note: the implicit prototype chain is expected to be acyclic. The registry
//! detects and reports a cycle created through `set_implicit_prototype` but
//! does not break it.

use indexmap::IndexMap;
use jsty_common::diagnostics::diagnostic_codes;
use jsty_common::limits::MAX_PROTOTYPE_CHAIN_LENGTH;
use jsty_common::Atom;
use rustc_hash::{FxBuildHasher, FxHashSet};
use tracing::debug;

use crate::diagnostics::PendingDiagnostic;
use crate::registry::TypeRegistry;
use crate::template_map::TemplateTypeMap;
use crate::types::*;

/// Member name to declared type, as seen by structural matching.
pub type MemberTypeMap = IndexMap<Atom, TypeId, FxBuildHasher>;

/// The handles created for one class or interface declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeclaredClass {
    pub constructor: TypeId,
    pub instance: TypeId,
    pub prototype: TypeId,
}

/// Builder for class and interface declarations.
///
/// ```ignore
/// let foo = ClassTypeBuilder::class(&mut registry, "Foo")
///     .superclass(bar.instance)
///     .implements(iface.instance)
///     .build();
/// ```
pub struct ClassTypeBuilder<'a> {
    registry: &'a mut TypeRegistry,
    name: String,
    kind: FunctionKind,
    structural: bool,
    type_params: TypeList,
    superclass: Option<TypeId>,
    implemented: TypeList,
    extended: TypeList,
    params: Vec<ParamInfo>,
    flags: ObjectFlags,
}

impl<'a> ClassTypeBuilder<'a> {
    pub fn class(registry: &'a mut TypeRegistry, name: &str) -> Self {
        Self::new(registry, name, FunctionKind::Constructor)
    }

    pub fn interface(registry: &'a mut TypeRegistry, name: &str) -> Self {
        Self::new(registry, name, FunctionKind::Interface)
    }

    fn new(registry: &'a mut TypeRegistry, name: &str, kind: FunctionKind) -> Self {
        Self {
            registry,
            name: name.to_string(),
            kind,
            structural: false,
            type_params: TypeList::new(),
            superclass: None,
            implemented: TypeList::new(),
            extended: TypeList::new(),
            params: Vec::new(),
            flags: ObjectFlags::empty(),
        }
    }

    /// Mark an interface for implicit structural matching (`@record`).
    pub fn structural(mut self, structural: bool) -> Self {
        self.structural = structural;
        self
    }

    pub fn type_parameters(mut self, keys: &[TypeId]) -> Self {
        self.type_params = keys.iter().copied().collect();
        self
    }

    /// Instance type of the superclass, possibly templatized.
    pub fn superclass(mut self, instance: TypeId) -> Self {
        self.superclass = Some(instance);
        self
    }

    pub fn implements(mut self, instance: TypeId) -> Self {
        self.implemented.push(instance);
        self
    }

    pub fn extends(mut self, instance: TypeId) -> Self {
        self.extended.push(instance);
        self
    }

    /// A constructor parameter.
    pub fn param(mut self, param: ParamInfo) -> Self {
        self.params.push(param);
        self
    }

    /// Flags applied to the instance type.
    pub fn flags(mut self, flags: ObjectFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn build(self) -> DeclaredClass {
        let Self {
            registry,
            name,
            kind,
            structural,
            type_params,
            superclass,
            implemented,
            extended,
            params,
            flags,
        } = self;
        let atom = registry.intern_name(&name);

        let info = FunctionInfo {
            kind,
            structural: structural && kind == FunctionKind::Interface,
            signature: CallSignature::new(params, TypeId::UNKNOWN),
            this_type: TypeId::UNKNOWN,
            instance_type: None,
            prototype: None,
            implemented,
            extended,
            type_params: type_params.clone(),
        };
        let ctor_data = ObjectData::new(
            Some(atom),
            Some(TypeId::FUNCTION_PROTOTYPE),
            ObjectKind::Function(Box::new(info)),
        );
        let constructor = registry.alloc_object(
            ctor_data,
            TypeData::Function,
            TemplateTypeMap::from_keys(&type_params),
        );

        let superclass = superclass
            .filter(|_| kind == FunctionKind::Constructor)
            .map(|s| registry.canonical(s));
        let proto_name = registry.intern_name(&format!("{name}.prototype"));
        let mut proto_data = ObjectData::new(
            Some(proto_name),
            Some(superclass.unwrap_or(TypeId::OBJECT)),
            ObjectKind::Prototype { owner: constructor },
        );
        proto_data.constructor = Some(constructor);
        proto_data.flags = ObjectFlags::PROTOTYPE;
        let prototype = registry.alloc_object(proto_data, TypeData::Object, TemplateTypeMap::new());

        let own_keys = TemplateTypeMap::from_keys(&type_params);
        let instance_map = match superclass {
            Some(parent) => registry.template_map(parent).extend(&own_keys),
            None => own_keys,
        };
        let mut instance_data = ObjectData::new(Some(atom), Some(prototype), ObjectKind::Instance);
        instance_data.constructor = Some(constructor);
        instance_data.flags = flags;
        let instance = registry.alloc_object(instance_data, TypeData::Object, instance_map);

        if let Some(info) = registry.function_info_mut(constructor) {
            info.this_type = instance;
            info.instance_type = Some(instance);
            info.prototype = Some(prototype);
        }
        debug!(name = %name, ctor = constructor.0, ?kind, "declared class");

        DeclaredClass {
            constructor,
            instance,
            prototype,
        }
    }
}

impl TypeRegistry {
    // =========================================================================
    // Prototype chain
    // =========================================================================

    /// Relink `id` to a new implicit prototype. A link that closes a loop is
    /// kept and reported.
    pub fn set_implicit_prototype(&mut self, id: TypeId, proto: TypeId) {
        let id = self.canonical(id);
        let Some(data) = self.object_data_mut(id) else {
            return;
        };
        data.implicit_prototype = Some(proto);
        data.unknown.take();
        if self.detect_implicit_prototype_cycle(id) {
            self.report(PendingDiagnostic::warning(
                diagnostic_codes::INHERITANCE_CYCLE,
                vec![id.into()],
            ));
        }
    }

    /// Whether walking the chain from `id` revisits a link.
    pub fn detect_implicit_prototype_cycle(&self, id: TypeId) -> bool {
        let mut seen = FxHashSet::default();
        let mut current = Some(self.canonical(id));
        while let Some(link) = current {
            let link = self.canonical(link);
            if !seen.insert(link) || seen.len() as u32 > MAX_PROTOTYPE_CHAIN_LENGTH {
                return true;
            }
            current = self.implicit_prototype(link);
        }
        false
    }

    /// Whether a constructor or interface reaches itself through its
    /// superclass or extended interfaces.
    pub fn detect_inheritance_cycle(&self, ctor: TypeId) -> bool {
        let start = self.canonical(ctor);
        let mut seen = FxHashSet::default();
        let mut stack = self.parent_constructors(start);
        while let Some(next) = stack.pop() {
            if next == start {
                return true;
            }
            if seen.insert(next) {
                stack.extend(self.parent_constructors(next));
            }
        }
        false
    }

    fn parent_constructors(&self, ctor: TypeId) -> Vec<TypeId> {
        let mut parents: Vec<TypeId> = self
            .extended_interfaces(ctor)
            .iter()
            .filter_map(|&iface| self.constructor_of(iface))
            .collect();
        parents.extend(self.superclass_constructor(ctor));
        parents
    }

    /// Whether `proto` is `obj` or a link of its chain, looking through
    /// templatized links.
    pub fn is_implicit_prototype(&self, obj: TypeId, proto: TypeId) -> bool {
        let mut current = Some(self.canonical(obj));
        let mut steps = 0;
        while let Some(link) = current {
            if steps > MAX_PROTOTYPE_CHAIN_LENGTH {
                return false;
            }
            let link = match self.data(link) {
                TypeData::Templatized { base, .. } => self.canonical(*base),
                _ => link,
            };
            if self.is_equivalent(link, proto) {
                return true;
            }
            current = self.implicit_prototype(link);
            steps += 1;
        }
        false
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// The constructor of the instance `ctor`'s prototype inherits from.
    pub fn superclass_constructor(&self, ctor: TypeId) -> Option<TypeId> {
        let info = self.function_info(self.canonical(ctor))?;
        if !info.is_constructor() {
            return None;
        }
        let parent = self.implicit_prototype(info.prototype?)?;
        self.constructor_of(parent)
    }

    /// Instance types `ctor` declares through `@extends` on an interface.
    pub fn extended_interfaces(&self, ctor: TypeId) -> TypeList {
        self.function_info(self.canonical(ctor))
            .map(|f| f.extended.clone())
            .unwrap_or_default()
    }

    /// Every interface `ctor` implements, including those of superclasses
    /// and the interfaces they extend.
    pub fn all_implemented_interfaces(&self, ctor: TypeId) -> Vec<TypeId> {
        let mut result = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(self.canonical(ctor));
        let mut steps = 0;
        while let Some(class) = current {
            if steps > MAX_PROTOTYPE_CHAIN_LENGTH {
                break;
            }
            if let Some(info) = self.function_info(class) {
                for &iface in &info.implemented {
                    self.collect_related_interfaces(iface, &mut seen, &mut result);
                }
            }
            current = self.superclass_constructor(class);
            steps += 1;
        }
        result
    }

    fn collect_related_interfaces(
        &self,
        iface: TypeId,
        seen: &mut FxHashSet<TypeId>,
        out: &mut Vec<TypeId>,
    ) {
        let iface = self.canonical(iface);
        if !seen.insert(iface) {
            return;
        }
        out.push(iface);
        if let Some(ctor) = self.constructor_of(iface) {
            for parent in self.extended_interfaces(ctor) {
                self.collect_related_interfaces(parent, seen, out);
            }
        }
    }

    /// Whether `right` names `left` in its implements or extends clauses,
    /// directly or through a parent.
    pub fn explicitly_implements_or_extends(&self, right: TypeId, left: TypeId) -> bool {
        let mut seen = FxHashSet::default();
        self.explicitly_related(right, left, &mut seen)
    }

    fn explicitly_related(
        &self,
        right: TypeId,
        left: TypeId,
        seen: &mut FxHashSet<TypeId>,
    ) -> bool {
        let right = self.canonical(right);
        if !seen.insert(right) {
            return false;
        }
        let matches_left =
            |iface: &TypeId| self.constructor_of(*iface).is_some_and(|c| self.same_interface(c, left));
        if self.all_implemented_interfaces(right).iter().any(|i| matches_left(i)) {
            return true;
        }
        self.extended_interfaces(right).iter().any(|iface| {
            matches_left(iface)
                || self
                    .constructor_of(*iface)
                    .is_some_and(|c| self.explicitly_related(c, left, seen))
        })
    }

    /// Interface functions are the same interface when they share a name.
    fn same_interface(&self, a: TypeId, b: TypeId) -> bool {
        let (a, b) = (self.canonical(a), self.canonical(b));
        a == b
            || (self.is_interface(a)
                && self.is_interface(b)
                && self.reference_name(a).is_some()
                && self.reference_name(a) == self.reference_name(b))
    }

    /// Properties an instance of `ctor` must carry: its prototype's own
    /// properties, then those of extended interfaces, then the superclass's.
    /// The nearest definition of a name wins.
    pub fn member_type_map(&self, ctor: TypeId) -> MemberTypeMap {
        let mut members = MemberTypeMap::default();
        let mut visited = FxHashSet::default();
        self.collect_members(ctor, &mut members, &mut visited);
        members
    }

    fn collect_members(
        &self,
        ctor: TypeId,
        members: &mut MemberTypeMap,
        visited: &mut FxHashSet<TypeId>,
    ) {
        let ctor = self.canonical(ctor);
        if !visited.insert(ctor) {
            return;
        }
        let Some(info) = self.function_info(ctor) else {
            return;
        };
        if let Some(prototype) = info.prototype {
            for name in self.own_property_names(prototype) {
                let type_id = self.property_type(prototype, name);
                members.entry(name).or_insert(type_id);
            }
        }
        for iface in info.extended.clone() {
            if let Some(parent) = self.constructor_of(iface) {
                self.collect_members(parent, members, visited);
            }
        }
        if let Some(parent) = self.superclass_constructor(ctor) {
            self.collect_members(parent, members, visited);
        }
    }
}

#[cfg(test)]
#[path = "tests/class_hierarchy_tests.rs"]
mod tests;
