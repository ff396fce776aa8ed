use super::*;
use crate::class_hierarchy::ClassTypeBuilder;
use crate::options::SolverOptions;
use crate::support::{class, declare, function, record, structural_interface, subclass};

#[test]
fn test_top_and_bottom() {
    let mut registry = TypeRegistry::new();
    let foo = class(&mut registry, "Foo");
    for id in [TypeId::NUMBER, TypeId::NULL, foo.instance, TypeId::OBJECT] {
        assert!(registry.is_subtype(id, TypeId::ALL));
        assert!(registry.is_subtype(id, TypeId::UNKNOWN));
        assert!(registry.is_subtype(TypeId::UNKNOWN, id));
        assert!(registry.is_subtype(TypeId::NO_TYPE, id));
    }
    assert!(!registry.is_subtype(TypeId::ALL, TypeId::NUMBER));
}

#[test]
fn test_no_object_is_below_objects_only() {
    let mut registry = TypeRegistry::new();
    let foo = class(&mut registry, "Foo");
    assert!(registry.is_subtype(TypeId::NO_OBJECT_TYPE, foo.instance));
    assert!(registry.is_subtype(TypeId::NO_OBJECT_TYPE, TypeId::OBJECT));
    assert!(!registry.is_subtype(TypeId::NO_OBJECT_TYPE, TypeId::NUMBER));
    assert!(!registry.is_subtype(TypeId::NO_OBJECT_TYPE, TypeId::NO_TYPE));
}

#[test]
fn test_scalars() {
    let mut registry = TypeRegistry::new();
    let maybe = registry.union([TypeId::NUMBER, TypeId::STRING]);
    assert!(!registry.is_subtype(TypeId::NUMBER, TypeId::STRING));
    assert!(!registry.is_subtype(TypeId::NULL, TypeId::NUMBER));
    assert!(registry.is_subtype(TypeId::NUMBER, maybe));
    assert!(!registry.is_subtype(maybe, TypeId::NUMBER));
    assert!(!registry.is_subtype(TypeId::NUMBER, TypeId::NUMBER_OBJECT));
}

#[test]
fn test_union_with_unknown_alternate_is_subtype_of_anything() {
    let mut registry = TypeRegistry::new();
    let t = registry.template_type("T");
    let with_variable = registry.union([TypeId::NUMBER, t]);
    assert!(registry.is_union(with_variable));
    assert!(registry.is_subtype(with_variable, TypeId::STRING));
}

#[test]
fn test_nominal_chain() {
    let mut registry = TypeRegistry::new();
    let base = class(&mut registry, "Base");
    let derived = subclass(&mut registry, "Derived", base.instance);
    let other = class(&mut registry, "Other");

    assert!(registry.is_subtype(derived.instance, base.instance));
    assert!(!registry.is_subtype(base.instance, derived.instance));
    assert!(!registry.is_subtype(derived.instance, other.instance));
    assert!(registry.is_subtype(derived.instance, TypeId::OBJECT));
    assert!(registry.is_subtype(base.prototype, TypeId::OBJECT));
}

#[test]
fn test_declared_interfaces() {
    let mut registry = TypeRegistry::new();
    let parent = ClassTypeBuilder::interface(&mut registry, "Parent").build();
    let child = ClassTypeBuilder::interface(&mut registry, "Child")
        .extends(parent.instance)
        .build();
    let impl_class = ClassTypeBuilder::class(&mut registry, "Impl")
        .implements(child.instance)
        .build();
    let derived = subclass(&mut registry, "Derived", impl_class.instance);
    let unrelated = class(&mut registry, "Unrelated");

    assert!(registry.is_subtype(impl_class.instance, child.instance));
    assert!(registry.is_subtype(impl_class.instance, parent.instance));
    assert!(registry.is_subtype(derived.instance, parent.instance));
    assert!(registry.is_subtype(child.instance, parent.instance));
    assert!(!registry.is_subtype(parent.instance, child.instance));
    assert!(!registry.is_subtype(unrelated.instance, parent.instance));
}

#[test]
fn test_structural_interface_needs_structural_typing() {
    let mut registry = TypeRegistry::new();
    let iface = structural_interface(&mut registry, "HasX", &[("x", TypeId::NUMBER)]);
    let foo = class(&mut registry, "Foo");
    declare(&mut registry, foo.prototype, "x", TypeId::NUMBER);

    assert!(registry.is_subtype(foo.instance, iface.instance));
    assert!(!registry.is_subtype_without_structural_typing(foo.instance, iface.instance));
}

#[test]
fn test_objects_against_records() {
    let mut registry = TypeRegistry::new();
    let foo = class(&mut registry, "Foo");
    declare(&mut registry, foo.prototype, "x", TypeId::NUMBER);
    let want_x = record(&mut registry, &[("x", TypeId::NUMBER)]);
    let want_y = record(&mut registry, &[("y", TypeId::NUMBER)]);
    let optional_y = registry.union([TypeId::NUMBER, TypeId::VOID]);
    let maybe_y = record(&mut registry, &[("y", optional_y)]);

    assert!(registry.is_subtype(foo.instance, want_x));
    assert!(!registry.is_subtype(foo.instance, want_y));
    assert!(registry.is_subtype(foo.instance, maybe_y));
    assert!(!registry.is_subtype(want_x, foo.instance));
}

#[test]
fn test_record_width_and_depth() {
    let mut registry = TypeRegistry::new();
    let wide = record(&mut registry, &[("x", TypeId::NUMBER), ("y", TypeId::STRING)]);
    let narrow = record(&mut registry, &[("x", TypeId::NUMBER)]);
    let maybe = registry.union([TypeId::NUMBER, TypeId::STRING]);
    let loose = record(&mut registry, &[("x", maybe)]);

    assert!(registry.is_subtype(wide, narrow));
    assert!(!registry.is_subtype(narrow, wide));
    assert!(registry.is_subtype(narrow, loose));
    assert!(!registry.is_subtype(loose, narrow));
    assert!(registry.is_subtype(wide, TypeId::OBJECT));
}

#[test]
fn test_function_variance() {
    let mut registry = TypeRegistry::new();
    let maybe = registry.union([TypeId::NUMBER, TypeId::STRING]);
    let takes_number = function(&mut registry, &[TypeId::NUMBER], TypeId::VOID);
    let takes_either = function(&mut registry, &[maybe], TypeId::VOID);
    let gives_number = function(&mut registry, &[], TypeId::NUMBER);
    let gives_either = function(&mut registry, &[], maybe);

    assert!(registry.is_subtype(takes_either, takes_number));
    assert!(!registry.is_subtype(takes_number, takes_either));
    assert!(registry.is_subtype(gives_number, gives_either));
    assert!(!registry.is_subtype(gives_either, gives_number));
}

#[test]
fn test_function_arity() {
    let mut registry = TypeRegistry::new();
    let one = function(&mut registry, &[TypeId::NUMBER], TypeId::VOID);
    let two = function(&mut registry, &[TypeId::NUMBER, TypeId::STRING], TypeId::VOID);
    let optional_second = registry.function(
        CallSignature::new(
            [ParamInfo::required(TypeId::NUMBER), ParamInfo::optional(TypeId::STRING)],
            TypeId::VOID,
        ),
        None,
    );

    assert!(registry.is_subtype(one, two));
    assert!(!registry.is_subtype(two, one));
    assert!(registry.is_subtype(optional_second, one));
    assert!(!registry.is_subtype(two, optional_second));
}

#[test]
fn test_function_sentinels() {
    let mut registry = TypeRegistry::new();
    let f = function(&mut registry, &[TypeId::NUMBER], TypeId::STRING);
    assert!(registry.is_subtype(TypeId::LEAST_FUNCTION, f));
    assert!(registry.is_subtype(f, TypeId::GREATEST_FUNCTION));
}

#[test]
fn test_receivers_either_direction() {
    let mut registry = TypeRegistry::new();
    let base = class(&mut registry, "Base");
    let derived = subclass(&mut registry, "Derived", base.instance);
    let other = class(&mut registry, "Other");
    let sig = || CallSignature::new([], TypeId::VOID);
    let on_base = registry.function(sig(), Some(base.instance));
    let on_derived = registry.function(sig(), Some(derived.instance));
    let on_other = registry.function(sig(), Some(other.instance));

    assert!(registry.is_subtype(on_base, on_derived));
    assert!(registry.is_subtype(on_derived, on_base));
    assert!(!registry.is_subtype(on_other, on_base));
}

#[test]
fn test_any_function_fits_an_interface_function() {
    let mut registry = TypeRegistry::new();
    let iface = ClassTypeBuilder::interface(&mut registry, "Callable").build();
    let f = function(&mut registry, &[], TypeId::VOID);
    assert!(registry.is_subtype(f, iface.constructor));
    assert!(!registry.is_subtype(iface.constructor, f));
}

#[test]
fn test_generic_bindings_are_invariant() {
    let mut registry = TypeRegistry::new();
    let t = registry.template_type("T");
    let boxed = ClassTypeBuilder::class(&mut registry, "Box")
        .type_parameters(&[t])
        .build();
    let maybe = registry.union([TypeId::NUMBER, TypeId::STRING]);
    let of_number = registry.templatized(boxed.instance, &[TypeId::NUMBER]);
    let of_either = registry.templatized(boxed.instance, &[maybe]);
    let of_unknown = registry.templatized(boxed.instance, &[TypeId::UNKNOWN]);

    assert!(!registry.is_subtype(of_number, of_either));
    assert!(registry.is_subtype(of_number, of_unknown));
    assert!(registry.is_subtype(of_number, boxed.instance));
}

#[test]
fn test_covariant_containers() {
    let mut registry = TypeRegistry::new();
    let maybe = registry.union([TypeId::NUMBER, TypeId::STRING]);
    let numbers = registry.templatized(TypeId::ARRAY, &[TypeId::NUMBER]);
    let strings = registry.templatized(TypeId::ARRAY, &[TypeId::STRING]);
    let either = registry.templatized(TypeId::ARRAY, &[maybe]);

    assert!(registry.is_subtype(numbers, either));
    assert!(registry.is_subtype(either, numbers));
    assert!(!registry.is_subtype(numbers, strings));
    assert!(registry.is_subtype(numbers, TypeId::ARRAY));
    assert!(registry.is_subtype(numbers, TypeId::OBJECT));
}

#[test]
fn test_subclass_of_instantiated_generic() {
    let mut registry = TypeRegistry::new();
    let t = registry.template_type("T");
    let base = ClassTypeBuilder::class(&mut registry, "Base")
        .type_parameters(&[t])
        .build();
    let base_number = registry.templatized(base.instance, &[TypeId::NUMBER]);
    let base_string = registry.templatized(base.instance, &[TypeId::STRING]);
    let derived = subclass(&mut registry, "Derived", base_number);

    assert!(registry.is_subtype(derived.instance, base_number));
    assert!(registry.is_subtype(derived.instance, base.instance));
    assert!(!registry.is_subtype(derived.instance, base_string));
}

#[test]
fn test_enum_elements_use_primitive() {
    let mut registry = TypeRegistry::new();
    let color = registry.enum_type("Color", TypeId::STRING);
    let element = registry.enum_element_type(color).unwrap();
    assert!(registry.is_subtype(element, TypeId::STRING));
    assert!(!registry.is_subtype(element, TypeId::NUMBER));
    assert!(!registry.is_subtype(TypeId::STRING, element));
}

#[test]
fn test_bottoms_below_everything() {
    let mut registry = TypeRegistry::new();
    let x = registry.intern_name("X");
    let missing = registry.unresolved(x);
    assert!(registry.is_subtype(missing, TypeId::NUMBER));
    assert!(registry.is_subtype(TypeId::NO_RESOLVED_TYPE, TypeId::NULL));
}

#[test]
fn test_nullable_and_voidable() {
    let mut registry = TypeRegistry::new();
    let nullable = registry.union([TypeId::NUMBER, TypeId::NULL]);
    let optional = registry.union([TypeId::NUMBER, TypeId::VOID]);

    assert!(registry.is_nullable(TypeId::NULL));
    assert!(registry.is_nullable(nullable));
    assert!(registry.is_nullable(TypeId::UNKNOWN));
    assert!(!registry.is_nullable(TypeId::ALL));
    assert!(!registry.is_nullable(TypeId::NUMBER));
    assert!(registry.is_voidable(optional));
    assert!(!registry.is_voidable(nullable));
}

#[test]
fn test_checker_options() {
    let registry = TypeRegistry::with_options(SolverOptions::default().without_structural_typing());
    let checker = SubtypeChecker::new(&registry);
    assert!(!checker.is_structural());
    let options = SubtypeOptions::from_registry(&registry).with_structural_typing(true);
    let checker = SubtypeChecker::with_options(&registry, options);
    assert!(checker.is_structural());
}
