//! Type formatting for diagnostics and annotation output.
//!
//! Every type has a deterministic text form. Union alternates are already
//! sorted by this text when the union is built, so repeated runs print the
//! same string.
//!
//! In annotation mode the output must parse back as a type annotation:
//! anonymous objects that have no annotation syntax print as `?`, and record
//! property lists are never abbreviated.

use jsty_common::limits::MAX_PRETTY_PRINTED_PROPERTIES;
use std::fmt::Write;

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::registry::TypeRegistry;
use crate::types::*;

pub struct TypeFormatter<'a> {
    registry: &'a TypeRegistry,
    for_annotations: bool,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            for_annotations: false,
        }
    }

    pub fn for_annotations(mut self) -> Self {
        self.for_annotations = true;
        self
    }

    pub fn format(&self, id: TypeId) -> String {
        let mut out = String::new();
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Display);
        self.write_type(&mut out, id, &mut guard);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId, guard: &mut RecursionGuard<TypeId>) {
        let id = self.registry.canonical(id);
        match guard.enter(id) {
            RecursionResult::Entered => {
                self.write_data(out, id, guard);
                guard.leave(id);
            }
            _ => out.push_str("..."),
        }
    }

    fn write_data(&self, out: &mut String, id: TypeId, guard: &mut RecursionGuard<TypeId>) {
        let reg = self.registry;
        match reg.data(id) {
            TypeData::Bottom(BottomKind::NoType) => out.push_str("None"),
            TypeData::Bottom(BottomKind::NoObject) => out.push_str("NoObject"),
            TypeData::Bottom(BottomKind::NoResolved) => out.push_str("NoResolvedType"),
            TypeData::Unresolved(name) => {
                if self.for_annotations {
                    out.push('?');
                } else {
                    out.push_str(reg.name_text(*name));
                }
            }
            TypeData::All => out.push('*'),
            TypeData::Unknown { .. } => out.push('?'),
            TypeData::Null => out.push_str("null"),
            TypeData::Void => out.push_str("undefined"),
            TypeData::Primitive(kind) => out.push_str(kind.name()),
            TypeData::Template { name, .. } | TypeData::Named(name) => {
                out.push_str(reg.name_text(*name))
            }
            TypeData::Object(obj) => match reg.object(*obj).name {
                Some(name) => out.push_str(reg.name_text(name)),
                None => self.write_anonymous_object(out, id, guard),
            },
            TypeData::Function(_) => self.write_function(out, id, guard),
            TypeData::Enum(obj) => {
                out.push_str("enum{");
                if let Some(name) = reg.object(*obj).name {
                    out.push_str(reg.name_text(name));
                }
                out.push('}');
            }
            TypeData::EnumElement(owner) => match reg.reference_name(*owner) {
                Some(name) => out.push_str(reg.name_text(name)),
                None => out.push('?'),
            },
            TypeData::Record(shape) => {
                let mut properties: Vec<(&str, TypeId)> = shape
                    .properties
                    .iter()
                    .map(|p| (reg.name_text(p.name), p.type_id))
                    .collect();
                properties.sort_by(|a, b| a.0.cmp(b.0));
                self.write_properties(out, &properties, guard);
            }
            TypeData::Templatized { base, args } => {
                self.write_type(out, *base, guard);
                out.push('<');
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, arg, guard);
                }
                out.push('>');
            }
            TypeData::Union(alternates) => {
                out.push('(');
                for (i, &alt) in alternates.iter().enumerate() {
                    if i > 0 {
                        out.push('|');
                    }
                    self.write_type(out, alt, guard);
                }
                out.push(')');
            }
        }
    }

    fn write_anonymous_object(&self, out: &mut String, id: TypeId, guard: &mut RecursionGuard<TypeId>) {
        if self.for_annotations {
            out.push('?');
            return;
        }
        let reg = self.registry;
        let mut properties: Vec<(&str, TypeId)> = reg
            .property_names(id)
            .iter()
            .map(|&name| (reg.name_text(name), reg.property_type(id, name)))
            .collect();
        properties.sort_by(|a, b| a.0.cmp(b.0));
        self.write_properties(out, &properties, guard);
    }

    fn write_properties(
        &self,
        out: &mut String,
        properties: &[(&str, TypeId)],
        guard: &mut RecursionGuard<TypeId>,
    ) {
        out.push('{');
        for (i, &(name, type_id)) in properties.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{name}: ");
            self.write_type(out, type_id, guard);
            if !self.for_annotations && i + 1 == MAX_PRETTY_PRINTED_PROPERTIES && properties.len() > i + 1 {
                out.push_str(", ...");
                break;
            }
        }
        out.push('}');
    }

    fn write_function(&self, out: &mut String, id: TypeId, guard: &mut RecursionGuard<TypeId>) {
        let reg = self.registry;
        if id == TypeId::FUNCTION_INSTANCE {
            out.push_str("Function");
            return;
        }
        let Some(info) = reg.function_info(id) else {
            out.push('?');
            return;
        };

        out.push_str("function (");
        let known_receiver = !reg.is_native_unknown_type(info.this_type);
        if known_receiver {
            out.push_str(if info.is_constructor() { "new:" } else { "this:" });
            self.write_type(out, info.this_type, guard);
        }
        for (i, param) in info.signature.params.iter().enumerate() {
            if i > 0 || known_receiver {
                out.push_str(", ");
            }
            if param.rest {
                out.push_str("...");
            }
            self.write_type(out, param.type_id, guard);
            if param.optional {
                out.push('=');
            }
        }
        out.push_str("): ");
        self.write_type(out, info.signature.return_type, guard);
    }
}

impl TypeRegistry {
    pub fn to_display_string(&self, id: TypeId, for_annotations: bool) -> String {
        let formatter = TypeFormatter::new(self);
        if for_annotations {
            formatter.for_annotations().format(id)
        } else {
            formatter.format(id)
        }
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
