use super::*;
use crate::support::{class, declare, function, record};
use crate::template_map::TemplateTypeMap;

fn show(registry: &TypeRegistry, id: TypeId) -> String {
    TypeFormatter::new(registry).format(id)
}

fn anonymous_object(registry: &mut TypeRegistry) -> TypeId {
    let data = ObjectData::new(None, Some(TypeId::OBJECT), ObjectKind::Instance);
    registry.alloc_object(data, TypeData::Object, TemplateTypeMap::new())
}

#[test]
fn test_scalars_and_bottoms() {
    let registry = TypeRegistry::new();
    let cases = [
        (TypeId::NO_TYPE, "None"),
        (TypeId::NO_OBJECT_TYPE, "NoObject"),
        (TypeId::NO_RESOLVED_TYPE, "NoResolvedType"),
        (TypeId::ALL, "*"),
        (TypeId::UNKNOWN, "?"),
        (TypeId::CHECKED_UNKNOWN, "?"),
        (TypeId::NULL, "null"),
        (TypeId::VOID, "undefined"),
        (TypeId::BOOLEAN, "boolean"),
        (TypeId::NUMBER, "number"),
        (TypeId::STRING, "string"),
        (TypeId::OBJECT, "Object"),
        (TypeId::ARRAY_PROTOTYPE, "Array.prototype"),
        (TypeId::FUNCTION_INSTANCE, "Function"),
    ];
    for (id, expected) in cases {
        assert_eq!(show(&registry, id), expected);
    }
}

#[test]
fn test_union_text_is_sorted() {
    let mut registry = TypeRegistry::new();
    let union = registry.union([TypeId::STRING, TypeId::NULL, TypeId::NUMBER]);
    assert_eq!(show(&registry, union), "(null|number|string)");
}

#[test]
fn test_records() {
    let mut registry = TypeRegistry::new();
    let point = record(&mut registry, &[("y", TypeId::STRING), ("x", TypeId::NUMBER)]);
    assert_eq!(show(&registry, point), "{x: number, y: string}");

    let props: Vec<(String, TypeId)> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|n| (n.to_string(), TypeId::NUMBER))
        .collect();
    let props: Vec<(&str, TypeId)> = props.iter().map(|(n, t)| (n.as_str(), *t)).collect();
    let wide = record(&mut registry, &props);
    assert_eq!(
        show(&registry, wide),
        "{a: number, b: number, c: number, d: number, ...}"
    );
    assert_eq!(
        registry.to_display_string(wide, true),
        "{a: number, b: number, c: number, d: number, e: number}"
    );
}

#[test]
fn test_templatized() {
    let mut registry = TypeRegistry::new();
    let numbers = registry.templatized(TypeId::ARRAY, &[TypeId::NUMBER]);
    let map = registry.templatized(TypeId::OBJECT, &[TypeId::STRING, numbers]);
    assert_eq!(show(&registry, numbers), "Array<number>");
    assert_eq!(show(&registry, map), "Object<string, Array<number>>");
}

#[test]
fn test_functions() {
    let mut registry = TypeRegistry::new();
    let plain = function(&mut registry, &[TypeId::NUMBER, TypeId::STRING], TypeId::BOOLEAN);
    assert_eq!(show(&registry, plain), "function (number, string): boolean");

    let optional = registry.function(
        CallSignature::new(
            [ParamInfo::required(TypeId::NUMBER), ParamInfo::optional(TypeId::STRING)],
            TypeId::VOID,
        ),
        None,
    );
    assert_eq!(show(&registry, optional), "function (number, string=): undefined");

    let rest = registry.function(CallSignature::new([ParamInfo::rest(TypeId::NUMBER)], TypeId::VOID), None);
    assert_eq!(show(&registry, rest), "function (...number): undefined");

    let foo = class(&mut registry, "Foo");
    let method = registry.function(CallSignature::new([], TypeId::UNKNOWN), Some(foo.instance));
    assert_eq!(show(&registry, method), "function (this:Foo): ?");
    assert_eq!(show(&registry, foo.constructor), "function (new:Foo): ?");
}

#[test]
fn test_enums() {
    let mut registry = TypeRegistry::new();
    let color = registry.enum_type("Color", TypeId::STRING);
    let element = registry.enum_element_type(color).unwrap();
    assert_eq!(show(&registry, color), "enum{Color}");
    assert_eq!(show(&registry, element), "Color");
}

#[test]
fn test_names_and_variables() {
    let mut registry = TypeRegistry::new();
    let named = registry.named("Later");
    let t = registry.template_type("T");
    let atom = registry.intern_name("Missing");
    let missing = registry.unresolved(atom);

    assert_eq!(show(&registry, named), "Later");
    assert_eq!(show(&registry, t), "T");
    assert_eq!(registry.to_display_string(missing, false), "Missing");
    assert_eq!(registry.to_display_string(missing, true), "?");
}

#[test]
fn test_anonymous_objects() {
    let mut registry = TypeRegistry::new();
    let anon = anonymous_object(&mut registry);
    declare(&mut registry, anon, "b", TypeId::STRING);
    declare(&mut registry, anon, "a", TypeId::NUMBER);

    assert_eq!(registry.to_display_string(anon, false), "{a: number, b: string}");
    assert_eq!(registry.to_display_string(anon, true), "?");
}

#[test]
fn test_self_reference_is_cut() {
    let mut registry = TypeRegistry::new();
    let anon = anonymous_object(&mut registry);
    declare(&mut registry, anon, "next", anon);
    assert_eq!(show(&registry, anon), "{next: ...}");
}
