use super::*;

fn rec(registry: &mut TypeRegistry, props: &[(&str, TypeId)]) -> TypeId {
    let props: Vec<_> = props
        .iter()
        .map(|&(name, t)| (registry.intern_name(name), t))
        .collect();
    registry.record(props)
}

#[test]
fn test_native_layout() {
    let registry = TypeRegistry::new();
    assert_eq!(registry.len(), TypeId::FIRST_USER as usize);
    assert!(matches!(registry.data(TypeId::NO_TYPE), TypeData::Bottom(BottomKind::NoType)));
    assert!(matches!(
        registry.data(TypeId::CHECKED_UNKNOWN),
        TypeData::Unknown { checked: true }
    ));
    assert!(matches!(
        registry.data(TypeId::NUMBER),
        TypeData::Primitive(PrimitiveKind::Number)
    ));

    let object = registry.object_data(TypeId::OBJECT).unwrap();
    assert_eq!(object.implicit_prototype, Some(TypeId::OBJECT_PROTOTYPE));
    assert_eq!(object.constructor, Some(TypeId::OBJECT_FUNCTION));
    assert!(object.flags.contains(ObjectFlags::NATIVE));
    assert_eq!(registry.object_data(TypeId::OBJECT_PROTOTYPE).unwrap().implicit_prototype, None);
    assert_eq!(
        registry.object_data(TypeId::ARRAY_PROTOTYPE).unwrap().implicit_prototype,
        Some(TypeId::OBJECT)
    );
}

#[test]
fn test_native_template_keys() {
    let registry = TypeRegistry::new();
    let object_keys: Vec<_> = registry.template_map(TypeId::OBJECT).keys().collect();
    assert_eq!(object_keys, vec![TypeId::OBJECT_INDEX_KEY, TypeId::OBJECT_ELEMENT_KEY]);
    let array_keys: Vec<_> = registry.template_map(TypeId::ARRAY).keys().collect();
    assert_eq!(array_keys, vec![TypeId::ARRAY_ELEMENT_KEY]);
    assert!(registry.template_map(TypeId::STRING_OBJECT).is_empty());
}

#[test]
fn test_sentinel_functions() {
    let registry = TypeRegistry::new();
    let least = registry.function_info(TypeId::LEAST_FUNCTION).unwrap();
    assert!(least.is_ordinary());
    assert_eq!(least.signature.return_type, TypeId::NO_TYPE);
    assert!(least.signature.has_rest());

    let greatest = registry.function_info(TypeId::GREATEST_FUNCTION).unwrap();
    assert!(greatest.is_constructor());
    assert_eq!(greatest.instance_type, Some(TypeId::UNKNOWN));
    assert_eq!(greatest.signature.return_type, TypeId::UNKNOWN);
}

#[test]
fn test_records_are_hash_consed() {
    let mut registry = TypeRegistry::new();
    let a = rec(&mut registry, &[("x", TypeId::NUMBER), ("y", TypeId::STRING)]);
    let b = rec(&mut registry, &[("y", TypeId::STRING), ("x", TypeId::NUMBER)]);
    assert_eq!(a, b);

    let c = rec(&mut registry, &[("x", TypeId::NUMBER)]);
    assert_ne!(a, c);
}

#[test]
fn test_empty_record_is_object() {
    let mut registry = TypeRegistry::new();
    assert_eq!(registry.record(std::iter::empty()), TypeId::OBJECT);
}

#[test]
fn test_record_duplicate_name_keeps_last() {
    let mut registry = TypeRegistry::new();
    let id = rec(&mut registry, &[("x", TypeId::NUMBER), ("x", TypeId::STRING)]);
    let x = registry.intern_name("x");
    let shape = registry.data(id).clone();
    let TypeData::Record(shape) = shape else {
        panic!("expected a record");
    };
    assert_eq!(shape.properties.len(), 1);
    assert_eq!(shape.get(x), Some(TypeId::STRING));
}

#[test]
fn test_record_property_nodes() {
    let mut registry = TypeRegistry::new();
    let x = registry.intern_name("x");
    let node = NodeIndex(7);
    let id = registry.record_with_nodes([(x, TypeId::NUMBER, node)]);
    assert_eq!(registry.record_property_node(id, x), node);
    let y = registry.intern_name("y");
    assert_eq!(registry.record_property_node(id, y), NodeIndex::NONE);
}

#[test]
fn test_functions_are_hash_consed() {
    let mut registry = TypeRegistry::new();
    let sig = || CallSignature::new([ParamInfo::required(TypeId::NUMBER)], TypeId::STRING);
    let f = registry.function(sig(), None);
    let g = registry.function(sig(), Some(TypeId::UNKNOWN));
    assert_eq!(f, g);

    let h = registry.function(sig(), Some(TypeId::OBJECT));
    assert_ne!(f, h);

    let data = registry.object_data(f).unwrap();
    assert!(data.flags.contains(ObjectFlags::SYNTHESIZED));
    assert_eq!(data.implicit_prototype, Some(TypeId::FUNCTION_PROTOTYPE));
}

#[test]
fn test_template_types_are_fresh() {
    let mut registry = TypeRegistry::new();
    let t1 = registry.template_type("T");
    let t2 = registry.template_type("T");
    assert_ne!(t1, t2);
    assert_ne!(t1, TypeId::ARRAY_ELEMENT_KEY);
}

#[test]
fn test_named_is_interned() {
    let mut registry = TypeRegistry::new();
    assert_eq!(registry.named("Foo"), registry.named("Foo"));
    assert_ne!(registry.named("Foo"), registry.named("Bar"));
}

#[test]
fn test_templatized_binds_keys() {
    let mut registry = TypeRegistry::new();
    let strings = registry.templatized(TypeId::ARRAY, &[TypeId::STRING]);
    assert_eq!(
        registry.template_map(strings).value(TypeId::ARRAY_ELEMENT_KEY),
        Some(TypeId::STRING)
    );
    assert_eq!(strings, registry.templatized(TypeId::ARRAY, &[TypeId::STRING]));
}

#[test]
fn test_templatized_degenerate_cases() {
    let mut registry = TypeRegistry::new();
    assert_eq!(registry.templatized(TypeId::ARRAY, &[]), TypeId::ARRAY);
    assert_eq!(registry.templatized(TypeId::NUMBER_OBJECT, &[TypeId::STRING]), TypeId::NUMBER_OBJECT);

    // Args beyond the key count are dropped; a templatized base looks through.
    let numbers = registry.templatized(TypeId::ARRAY, &[TypeId::NUMBER, TypeId::STRING]);
    let TypeData::Templatized { base, args } = registry.data(numbers).clone() else {
        panic!("expected a templatized type");
    };
    assert_eq!(base, TypeId::ARRAY);
    assert_eq!(args.as_slice(), &[TypeId::NUMBER]);
    let strings = registry.templatized(numbers, &[TypeId::STRING]);
    assert_eq!(strings, registry.templatized(TypeId::ARRAY, &[TypeId::STRING]));
}

#[test]
fn test_close_declarations() {
    let mut registry = TypeRegistry::new();
    assert!(!registry.declarations_closed());
    registry.close_declarations();
    assert!(registry.declarations_closed());
}

#[test]
fn test_take_diagnostics_drains() {
    let mut registry = TypeRegistry::new();
    registry.report(PendingDiagnostic::warning(1, vec![]));
    assert_eq!(registry.diagnostics().len(), 1);
    assert_eq!(registry.take_diagnostics().len(), 1);
    assert!(registry.diagnostics().is_empty());
}
