//! Lattice laws checked over generated combinations of a fixed leaf pool.

use proptest::prelude::*;

use crate::registry::TypeRegistry;
use crate::support::{class, function, record, subclass};
use crate::types::*;
use crate::EquivalenceMethod;

/// Leaves whose relations are fully determined: no unknowns, no bottoms.
const KNOWN_LEAVES: usize = 14;

struct Pool {
    registry: TypeRegistry,
    known: Vec<TypeId>,
    all: Vec<TypeId>,
}

fn pool() -> Pool {
    let mut registry = TypeRegistry::new();
    let foo = class(&mut registry, "Foo");
    let bar = subclass(&mut registry, "Bar", foo.instance);
    let point = record(&mut registry, &[("a", TypeId::NUMBER)]);
    let wide_point = record(&mut registry, &[("a", TypeId::NUMBER), ("b", TypeId::STRING)]);
    let callback = function(&mut registry, &[TypeId::NUMBER], TypeId::STRING);
    let numbers = registry.templatized(TypeId::ARRAY, &[TypeId::NUMBER]);
    let strings = registry.templatized(TypeId::ARRAY, &[TypeId::STRING]);

    let known = vec![
        TypeId::NUMBER,
        TypeId::STRING,
        TypeId::BOOLEAN,
        TypeId::NULL,
        TypeId::VOID,
        TypeId::OBJECT,
        TypeId::STRING_OBJECT,
        foo.instance,
        bar.instance,
        point,
        wide_point,
        callback,
        numbers,
        strings,
    ];
    assert_eq!(known.len(), KNOWN_LEAVES);
    let mut all = known.clone();
    all.extend([
        TypeId::UNKNOWN,
        TypeId::CHECKED_UNKNOWN,
        TypeId::ALL,
        TypeId::NO_TYPE,
        TypeId::NO_OBJECT_TYPE,
    ]);
    Pool {
        registry,
        known,
        all,
    }
}

fn join_all(registry: &mut TypeRegistry, ids: impl IntoIterator<Item = TypeId>) -> TypeId {
    ids.into_iter()
        .reduce(|acc, next| registry.least_supertype(acc, next))
        .unwrap_or(TypeId::NO_TYPE)
}

fn pick(leaves: &[TypeId], picks: &[usize]) -> Vec<TypeId> {
    picks.iter().map(|&i| leaves[i % leaves.len()]).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn subtype_is_reflexive(picks in prop::collection::vec(0usize..64, 1..4)) {
        let Pool { mut registry, all, .. } = pool();
        let chosen = pick(&all, &picks);
        let joined = join_all(&mut registry, chosen.iter().copied());
        for id in chosen.into_iter().chain([joined]) {
            prop_assert!(registry.is_subtype(id, id));
        }
    }

    #[test]
    fn mutual_subtypes_are_identical(
        left in prop::collection::vec(0usize..KNOWN_LEAVES, 1..3),
        right in prop::collection::vec(0usize..KNOWN_LEAVES, 1..3),
    ) {
        let Pool { mut registry, known, .. } = pool();
        let a = join_all(&mut registry, pick(&known, &left));
        let b = join_all(&mut registry, pick(&known, &right));
        if registry.is_subtype(a, b) && registry.is_subtype(b, a) {
            prop_assert!(registry.is_equivalent_under(a, b, EquivalenceMethod::Identity));
        }
    }

    #[test]
    fn join_never_nests_unions(picks in prop::collection::vec(0usize..64, 3..6)) {
        let Pool { mut registry, all, .. } = pool();
        let joined = join_all(&mut registry, pick(&all, &picks));
        if let Some(alternates) = registry.union_alternates(joined) {
            for &alt in alternates {
                prop_assert!(!registry.is_union(alt));
            }
        }
    }

    #[test]
    fn join_of_known_types_commutes(a in 0usize..KNOWN_LEAVES, b in 0usize..KNOWN_LEAVES) {
        let Pool { mut registry, known, .. } = pool();
        let ab = registry.least_supertype(known[a], known[b]);
        let ba = registry.least_supertype(known[b], known[a]);
        prop_assert_eq!(ab, ba);
        prop_assert!(registry.is_subtype(known[a], ab));
        prop_assert!(registry.is_subtype(known[b], ab));
    }

    #[test]
    fn unknown_absorbs_joins(picks in prop::collection::vec(0usize..64, 1..3)) {
        let Pool { mut registry, all, .. } = pool();
        let x = join_all(&mut registry, pick(&all, &picks));
        // `*` outranks `?`.
        prop_assume!(!registry.is_all_type(x));
        prop_assert_eq!(registry.least_supertype(TypeId::UNKNOWN, x), TypeId::UNKNOWN);
        prop_assert_eq!(registry.least_supertype(x, TypeId::UNKNOWN), TypeId::UNKNOWN);
    }

    #[test]
    fn unknown_absorbs_meets(picks in prop::collection::vec(0usize..64, 1..3)) {
        let Pool { mut registry, all, .. } = pool();
        let x = join_all(&mut registry, pick(&all, &picks));
        prop_assert_eq!(registry.greatest_subtype(TypeId::UNKNOWN, x), TypeId::UNKNOWN);
        prop_assert_eq!(registry.greatest_subtype(x, TypeId::UNKNOWN), TypeId::UNKNOWN);
    }

    #[test]
    fn meet_of_known_types_is_below_both(a in 0usize..KNOWN_LEAVES, b in 0usize..KNOWN_LEAVES) {
        let Pool { mut registry, known, .. } = pool();
        prop_assume!(!registry.is_function(known[a]) && !registry.is_function(known[b]));
        let met = registry.greatest_subtype(known[a], known[b]);
        prop_assert!(registry.is_subtype(met, known[a]));
        prop_assert!(registry.is_subtype(met, known[b]));
    }
}

#[test]
fn test_distinct_unresolved_names_meet_to_canonical_bottom() {
    let mut registry = TypeRegistry::new();
    let first = registry.intern_name("First");
    let second = registry.intern_name("Second");
    let first = registry.unresolved(first);
    let second = registry.unresolved(second);
    assert_ne!(first, second);
    assert_eq!(registry.greatest_subtype(first, second), TypeId::NO_RESOLVED_TYPE);
    assert_eq!(registry.greatest_subtype(second, first), TypeId::NO_RESOLVED_TYPE);
}
