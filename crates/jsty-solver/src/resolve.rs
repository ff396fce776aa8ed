//! Resolution of forward references.
//!
//! Types built from annotations may mention names that are declared later.
//! Those names are `Named` proxies until `resolve` runs. Resolution settles
//! each node once: afterwards `canonical` maps the node to its answer.
//!
//! A name the scope does not know becomes a `NoResolvedType` carrying the
//! name, and an `UNRESOLVED_TYPE_NAME` warning is recorded. Hosts that want
//! to decide for themselves use [`lookup`] first.

use jsty_common::Atom;
use jsty_common::diagnostics::diagnostic_codes;
use jsty_common::limits::MAX_ALIAS_RESOLUTION_DEPTH;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, trace};

use crate::diagnostics::PendingDiagnostic;
use crate::registry::TypeRegistry;
use crate::types::*;

/// Where type names are looked up.
pub trait TypeScope {
    fn lookup_type(&self, name: &str) -> Option<TypeId>;
}

/// A flat name → type table.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    names: FxHashMap<Box<str>, TypeId>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, type_id: TypeId) -> Option<TypeId> {
        self.names.insert(name.into(), type_id)
    }

    pub fn with(mut self, name: &str, type_id: TypeId) -> Self {
        self.insert(name, type_id);
        self
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl TypeScope for NameTable {
    fn lookup_type(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown type name `{0}`")]
    UnknownName(String),
}

/// Look `name` up without touching the registry.
pub fn lookup(scope: &dyn TypeScope, name: &str) -> Result<TypeId, ResolveError> {
    scope
        .lookup_type(name)
        .ok_or_else(|| ResolveError::UnknownName(name.to_string()))
}

impl TypeRegistry {
    /// Resolve `id` against `scope` and settle the answer.
    ///
    /// A node met again while its own resolution is in progress resolves to
    /// `?`, and so does a name reached through too many nested aliases.
    pub fn resolve(&mut self, id: TypeId, scope: &dyn TypeScope) -> TypeId {
        if self.is_resolved(id) {
            return self.canonical(id);
        }
        if !self.resolving.insert(id) {
            // Declared objects are their own answer even mid-resolution.
            if self.is_declared_object(id) {
                return id;
            }
            trace!(type_id = id.0, "resolution cycle");
            return TypeId::UNKNOWN;
        }
        let resolved = self.resolve_inner(id, scope);
        self.resolving.remove(&id);
        self.settle_resolution(id, resolved);
        resolved
    }

    fn resolve_inner(&mut self, id: TypeId, scope: &dyn TypeScope) -> TypeId {
        match self.data(id).clone() {
            TypeData::Named(name) => self.resolve_name(name, scope),
            TypeData::Union(alternates) => {
                let resolved: TypeList =
                    alternates.iter().map(|&alt| self.resolve(alt, scope)).collect();
                self.union(resolved)
            }
            TypeData::Record(shape) => {
                let properties: Vec<(Atom, TypeId, jsty_common::NodeIndex)> = shape
                    .properties
                    .iter()
                    .map(|p| {
                        let node = self.record_property_node(id, p.name);
                        (p.name, self.resolve(p.type_id, scope), node)
                    })
                    .collect();
                self.record_with_nodes(properties)
            }
            TypeData::Templatized { base, args } => {
                let base = self.resolve(base, scope);
                let args: TypeList = args.iter().map(|&arg| self.resolve(arg, scope)).collect();
                self.templatized(base, &args)
            }
            TypeData::Function(_) if !self.is_declared_object(id) => {
                self.resolve_function_shape(id, scope)
            }
            TypeData::Object(_) | TypeData::Function(_) | TypeData::Enum(_) => {
                self.resolve_object_in_place(id, scope);
                id
            }
            _ => id,
        }
    }

    fn is_declared_object(&self, id: TypeId) -> bool {
        self.object_data(id)
            .is_some_and(|data| !data.flags.contains(ObjectFlags::SYNTHESIZED))
    }

    fn resolve_name(&mut self, name: Atom, scope: &dyn TypeScope) -> TypeId {
        let text = self.name_text(name).to_string();
        match lookup(scope, &text) {
            Ok(target) => {
                let target = self.canonical(target);
                let resolved = if self.resolving.contains(&target) {
                    target
                } else if self.resolving.len() as u32 > MAX_ALIAS_RESOLUTION_DEPTH {
                    debug!(name = %text, "alias chain too deep");
                    TypeId::UNKNOWN
                } else {
                    self.resolve(target, scope)
                };
                trace!(name = %text, target = resolved.0, "resolved name");
                resolved
            }
            Err(err) => {
                debug!(%err, "unresolved type name");
                self.report(PendingDiagnostic::warning(
                    diagnostic_codes::UNRESOLVED_TYPE_NAME,
                    vec![name.into()],
                ));
                self.unresolved(name)
            }
        }
    }

    /// Hash-consed ordinary functions are rebuilt from resolved parts.
    fn resolve_function_shape(&mut self, id: TypeId, scope: &dyn TypeScope) -> TypeId {
        let Some(info) = self.function_info(id).cloned() else {
            return id;
        };
        let params: Vec<ParamInfo> = info
            .signature
            .params
            .iter()
            .map(|p| ParamInfo {
                type_id: self.resolve(p.type_id, scope),
                ..*p
            })
            .collect();
        let return_type = self.resolve(info.signature.return_type, scope);
        let this_type = self.resolve(info.this_type, scope);
        let mut signature = CallSignature::new(params, return_type);
        signature.return_inferred = info.signature.return_inferred;
        self.generic_function(signature, Some(this_type), &info.type_params)
    }

    /// Declared objects keep their identity; their property types, prototype
    /// link and signature are resolved where they are.
    fn resolve_object_in_place(&mut self, id: TypeId, scope: &dyn TypeScope) {
        let Some(data) = self.object_data(id) else {
            return;
        };
        let properties: Vec<(Atom, TypeId)> = data
            .properties
            .iter()
            .map(|(&name, slot)| (name, slot.type_id))
            .collect();
        let prototype = data.implicit_prototype;

        for (name, type_id) in properties {
            let resolved = self.resolve(type_id, scope);
            if let Some(slot) = self
                .object_data_mut(id)
                .and_then(|data| data.properties.get_mut(&name))
            {
                slot.type_id = resolved;
            }
        }
        if let Some(prototype) = prototype {
            let resolved = self.resolve(prototype, scope);
            if let Some(data) = self.object_data_mut(id) {
                data.implicit_prototype = Some(resolved);
            }
        }

        let Some(info) = self.function_info(id).cloned() else {
            return;
        };
        let mut signature = info.signature.clone();
        for param in signature.params.iter_mut() {
            param.type_id = self.resolve(param.type_id, scope);
        }
        signature.return_type = self.resolve(signature.return_type, scope);
        let this_type = self.resolve(info.this_type, scope);
        if let Some(target) = self.function_info_mut(id) {
            target.signature = signature;
            target.this_type = this_type;
        }
    }
}

#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod tests;
