//! Generic instantiation: substituting bound template keys through a type.
//!
//! `TypeInstantiator` rebuilds structural types (unions, records, ordinary
//! functions, templatized types) from their substituted parts and leaves
//! nominal types alone. Unbound keys stay in place, so a partially bound map
//! gives a partially instantiated type.
//!
//! An ordinary function's own type parameters shadow outer bindings of the
//! same key: `function<T>(T): T` inside a class `Foo<T>` is not touched by
//! `Foo<number>`.
//!
//! The walk is depth-bounded. Past the limit the remaining subtree is kept
//! as is and an `EXCESSIVE_INSTANTIATION_DEPTH` warning is recorded.

use jsty_common::Atom;
use jsty_common::diagnostics::diagnostic_codes;
use tracing::{debug, trace};

use crate::diagnostics::PendingDiagnostic;
use crate::recursion::DepthCounter;
use crate::registry::TypeRegistry;
use crate::template_map::TemplateTypeMap;
use crate::types::*;

pub struct TypeInstantiator<'a> {
    registry: &'a mut TypeRegistry,
    bindings: TemplateTypeMap,
    depth: DepthCounter,
}

impl<'a> TypeInstantiator<'a> {
    pub fn new(registry: &'a mut TypeRegistry, bindings: &TemplateTypeMap) -> Self {
        let max_depth = registry.options().max_instantiation_depth;
        Self {
            registry,
            bindings: bindings.clone(),
            depth: DepthCounter::new(max_depth),
        }
    }

    /// Whether some subtree was cut off by the depth limit.
    pub fn depth_exceeded(&self) -> bool {
        self.depth.is_exceeded()
    }

    pub fn instantiate(&mut self, id: TypeId) -> TypeId {
        let id = self.registry.canonical(id);
        if self.bindings.is_empty() || !self.registry.has_any_template_types(id) {
            return id;
        }
        if !self.depth.enter() {
            return id;
        }
        let result = self.instantiate_inner(id);
        self.depth.leave();
        result
    }

    fn instantiate_inner(&mut self, id: TypeId) -> TypeId {
        match self.registry.data(id).clone() {
            TypeData::Template { .. } => self.bindings.value(id).unwrap_or(id),
            TypeData::Union(alternates) => {
                let substituted: TypeList =
                    alternates.iter().map(|&alt| self.instantiate(alt)).collect();
                self.registry.union(substituted)
            }
            TypeData::Record(shape) => {
                let properties: Vec<(Atom, TypeId)> = shape
                    .properties
                    .iter()
                    .map(|p| (p.name, self.instantiate(p.type_id)))
                    .collect();
                self.registry.record(properties)
            }
            TypeData::Templatized { base, args } => {
                let substituted: TypeList = args.iter().map(|&arg| self.instantiate(arg)).collect();
                self.registry.templatized(base, &substituted)
            }
            TypeData::Function(_) => self.instantiate_function(id),
            _ => id,
        }
    }

    fn instantiate_function(&mut self, id: TypeId) -> TypeId {
        let Some(info) = self.registry.function_info(id).cloned() else {
            return id;
        };
        if !info.is_ordinary() {
            return id;
        }

        let outer = if info.type_params.is_empty() {
            None
        } else {
            let shadowed = self
                .bindings
                .without_keys(|key| info.type_params.contains(&key));
            Some(std::mem::replace(&mut self.bindings, shadowed))
        };

        let params: Vec<ParamInfo> = info
            .signature
            .params
            .iter()
            .map(|p| ParamInfo {
                type_id: self.instantiate(p.type_id),
                ..*p
            })
            .collect();
        let return_type = self.instantiate(info.signature.return_type);
        let this_type = self.instantiate(info.this_type);

        if let Some(outer) = outer {
            self.bindings = outer;
        }

        let mut signature = CallSignature::new(params, return_type);
        signature.return_inferred = info.signature.return_inferred;
        self.registry
            .generic_function(signature, Some(this_type), &info.type_params)
    }
}

/// Substitute `bindings` through `id`, reporting a depth overrun.
pub fn instantiate_type(registry: &mut TypeRegistry, id: TypeId, bindings: &TemplateTypeMap) -> TypeId {
    let mut instantiator = TypeInstantiator::new(registry, bindings);
    let result = instantiator.instantiate(id);
    if instantiator.depth_exceeded() {
        debug!(type_id = id.0, "instantiation depth exceeded");
        registry.report(PendingDiagnostic::warning(
            diagnostic_codes::EXCESSIVE_INSTANTIATION_DEPTH,
            vec![id.into()],
        ));
    }
    result
}

impl TypeRegistry {
    /// `raw` applied to `args`.
    ///
    /// Missing trailing arguments become `?`. Surplus arguments are dropped
    /// with an `INVALID_GENERICS_INSTANTIATION` warning.
    pub fn instantiate_generics(&mut self, raw: TypeId, args: &[TypeId]) -> TypeId {
        let raw = self.canonical(raw);
        let raw = match self.data(raw) {
            TypeData::Templatized { base, .. } => *base,
            _ => raw,
        };
        let expected = self.template_map(raw).len();
        if args.len() > expected {
            debug!(raw = raw.0, expected, found = args.len(), "too many type arguments");
            self.report(PendingDiagnostic::warning(
                diagnostic_codes::INVALID_GENERICS_INSTANTIATION,
                vec![raw.into(), expected.into(), args.len().into()],
            ));
        }
        if expected == 0 {
            return raw;
        }

        let padded: TypeList = (0..expected)
            .map(|i| args.get(i).copied().unwrap_or(TypeId::UNKNOWN))
            .collect();
        trace!(raw = raw.0, args = padded.len(), "instantiate generics");
        self.templatized(raw, &padded)
    }

    /// The type of `name` on `id`, with `id`'s bindings substituted through.
    pub fn instantiated_property_type(&mut self, id: TypeId, name: Atom) -> TypeId {
        let id = self.canonical(id);
        let declared = match self.data(id) {
            TypeData::Templatized { base, .. } => self.property_type(*base, name),
            _ => self.property_type(id, name),
        };
        let bindings = self.template_map(id).clone();
        instantiate_type(self, declared, &bindings)
    }
}

#[cfg(test)]
#[path = "tests/instantiate_tests.rs"]
mod tests;
