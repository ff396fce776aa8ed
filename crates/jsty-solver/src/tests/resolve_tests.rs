use super::*;
use jsty_common::NodeIndex;

use crate::diagnostics::DiagnosticArg;
use crate::support::{class, declare, function};

#[test]
fn test_name_table() {
    let mut table = NameTable::new();
    assert!(table.is_empty());
    assert_eq!(table.insert("Foo", TypeId::NUMBER), None);
    assert_eq!(table.insert("Foo", TypeId::STRING), Some(TypeId::NUMBER));
    let table = table.with("Bar", TypeId::BOOLEAN);
    assert_eq!(table.len(), 2);
    assert_eq!(table.lookup_type("Foo"), Some(TypeId::STRING));
    assert_eq!(table.lookup_type("Baz"), None);
}

#[test]
fn test_lookup_reports_unknown_name() {
    let table = NameTable::new().with("Foo", TypeId::NUMBER);
    assert_eq!(lookup(&table, "Foo"), Ok(TypeId::NUMBER));
    let err = lookup(&table, "Bar").unwrap_err();
    assert_eq!(err, ResolveError::UnknownName("Bar".to_string()));
    assert_eq!(err.to_string(), "unknown type name `Bar`");
}

#[test]
fn test_named_resolves_through_scope() {
    let mut registry = TypeRegistry::new();
    let foo = class(&mut registry, "Foo");
    let named = registry.named("Foo");
    let scope = NameTable::new().with("Foo", foo.instance);

    assert!(!registry.is_resolved(named));
    assert_eq!(registry.resolve(named, &scope), foo.instance);
    assert!(registry.is_resolved(named));
    assert_eq!(registry.canonical(named), foo.instance);
    assert!(registry.diagnostics().is_empty());
}

#[test]
fn test_unknown_name_becomes_unresolved() {
    let mut registry = TypeRegistry::new();
    let named = registry.named("Missing");
    let resolved = registry.resolve(named, &NameTable::new());

    let atom = registry.intern_name("Missing");
    assert_eq!(resolved, registry.unresolved(atom));
    assert!(registry.is_no_resolved_type(resolved));
    let diagnostics = registry.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::UNRESOLVED_TYPE_NAME);
    assert_eq!(diagnostics[0].args, vec![DiagnosticArg::Atom(atom)]);
}

#[test]
fn test_resolution_settles_once() {
    let mut registry = TypeRegistry::new();
    let named = registry.named("Missing");
    let first = registry.resolve(named, &NameTable::new());
    let later = NameTable::new().with("Missing", TypeId::NUMBER);
    assert_eq!(registry.resolve(named, &later), first);
    assert_eq!(registry.diagnostics().len(), 1);
}

#[test]
fn test_structural_types_are_rebuilt() {
    let mut registry = TypeRegistry::new();
    let foo = class(&mut registry, "Foo");
    let scope = NameTable::new().with("Foo", foo.instance);

    let named = registry.named("Foo");
    let either = registry.union([named, TypeId::NUMBER]);
    let expected = registry.union([foo.instance, TypeId::NUMBER]);
    assert_eq!(registry.resolve(either, &scope), expected);

    let list = registry.templatized(TypeId::ARRAY, &[named]);
    let expected = registry.templatized(TypeId::ARRAY, &[foo.instance]);
    assert_eq!(registry.resolve(list, &scope), expected);

    let callback = function(&mut registry, &[named], TypeId::NUMBER);
    let expected = function(&mut registry, &[foo.instance], TypeId::NUMBER);
    assert_eq!(registry.resolve(callback, &scope), expected);
    assert_eq!(registry.canonical(callback), expected);
}

#[test]
fn test_record_keeps_property_nodes() {
    let mut registry = TypeRegistry::new();
    let foo = class(&mut registry, "Foo");
    let scope = NameTable::new().with("Foo", foo.instance);
    let named = registry.named("Foo");
    let field = registry.intern_name("field");
    let shape = registry.record_with_nodes([(field, named, NodeIndex(3))]);

    let resolved = registry.resolve(shape, &scope);
    let expected = registry.record([(field, foo.instance)]);
    assert_eq!(resolved, expected);
    assert_eq!(registry.record_property_node(resolved, field), NodeIndex(3));
}

#[test]
fn test_declared_object_resolves_in_place() {
    let mut registry = TypeRegistry::new();
    let foo = class(&mut registry, "Foo");
    let named = registry.named("Foo");
    declare(&mut registry, foo.instance, "next", named);
    let scope = NameTable::new().with("Foo", foo.instance);

    assert_eq!(registry.resolve(foo.instance, &scope), foo.instance);
    let next = registry.intern_name("next");
    assert_eq!(registry.property_type(foo.instance, next), foo.instance);
    assert_eq!(registry.canonical(named), foo.instance);
}

#[test]
fn test_declared_function_signature_resolves_in_place() {
    let mut registry = TypeRegistry::new();
    let foo = class(&mut registry, "Foo");
    let named = registry.named("Foo");
    if let Some(info) = registry.function_info_mut(foo.constructor) {
        info.signature.return_type = named;
    }
    let scope = NameTable::new().with("Foo", foo.instance);

    assert_eq!(registry.resolve(foo.constructor, &scope), foo.constructor);
    let info = registry.function_info(foo.constructor).unwrap();
    assert_eq!(info.signature.return_type, foo.instance);
}

#[test]
fn test_is_declared_object() {
    let mut registry = TypeRegistry::new();
    let foo = class(&mut registry, "Foo");
    let callback = function(&mut registry, &[], TypeId::NUMBER);
    assert!(registry.is_declared_object(foo.instance));
    assert!(registry.is_declared_object(foo.constructor));
    assert!(!registry.is_declared_object(callback));
    assert!(!registry.is_declared_object(TypeId::NUMBER));
}
