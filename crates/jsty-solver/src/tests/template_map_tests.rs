use super::*;

const T: TypeId = TypeId(100);
const U: TypeId = TypeId(101);
const V: TypeId = TypeId(102);

#[test]
fn test_from_bindings_leaves_tail_unbound() {
    let map = TemplateTypeMap::from_bindings(&[T, U], &[TypeId::NUMBER]);
    assert_eq!(map.value(T), Some(TypeId::NUMBER));
    assert_eq!(map.value(U), None);
    assert_eq!(map.resolved_value(U), TypeId::UNKNOWN);
    assert_eq!(map.unfilled_count(), 1);
}

#[test]
fn test_keys_are_unique() {
    let map = TemplateTypeMap::from_keys(&[T, T, U]);
    assert_eq!(map.len(), 2);
}

#[test]
fn test_absent_key_reads_unknown() {
    let map = TemplateTypeMap::from_keys(&[T]);
    assert!(!map.has_key(V));
    assert_eq!(map.resolved_value(V), TypeId::UNKNOWN);
}

#[test]
fn test_extend_other_takes_precedence() {
    let general = TemplateTypeMap::from_bindings(&[T, U], &[TypeId::NUMBER, TypeId::STRING]);
    let specific = TemplateTypeMap::from_bindings(&[U, V], &[TypeId::BOOLEAN]);
    let merged = general.extend(&specific);

    let keys: Vec<_> = merged.keys().collect();
    assert_eq!(keys, vec![U, V, T]);
    assert_eq!(merged.value(U), Some(TypeId::BOOLEAN));
    assert_eq!(merged.value(V), None);
    assert_eq!(merged.value(T), Some(TypeId::NUMBER));
}

#[test]
fn test_extend_keeps_value_for_unbound_overlay_key() {
    let general = TemplateTypeMap::from_bindings(&[T], &[TypeId::NUMBER]);
    let overlay = TemplateTypeMap::from_keys(&[T]);
    assert_eq!(general.extend(&overlay).value(T), Some(TypeId::NUMBER));
}

#[test]
fn test_add_values_fills_unbound_in_order() {
    let map = TemplateTypeMap::from_bindings(&[T, U, V], &[TypeId::NUMBER]);
    let filled = map.add_values(&[TypeId::STRING, TypeId::BOOLEAN, TypeId::NULL]);
    assert_eq!(filled.value(T), Some(TypeId::NUMBER));
    assert_eq!(filled.value(U), Some(TypeId::STRING));
    assert_eq!(filled.value(V), Some(TypeId::BOOLEAN));
    assert!(!filled.has_unfilled_keys());
}

#[test]
fn test_without_keys() {
    let map = TemplateTypeMap::from_bindings(&[T, U], &[TypeId::NUMBER, TypeId::STRING]);
    let reduced = map.without_keys(|k| k == T);
    assert!(!reduced.has_key(T));
    assert_eq!(reduced.value(U), Some(TypeId::STRING));
}
