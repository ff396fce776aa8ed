//! Lattice query benchmarks.
//!
//! Measures union normalization, structural subtyping over nested records and
//! implicit interface matching as the inputs grow.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jsty_common::NodeIndex;
use jsty_solver::{ClassTypeBuilder, TypeId, TypeRegistry};

/// `n` unrelated classes.
fn classes(registry: &mut TypeRegistry, n: usize) -> Vec<TypeId> {
    (0..n)
        .map(|i| ClassTypeBuilder::class(registry, &format!("C{i}")).build().instance)
        .collect()
}

/// `{inner: {inner: ... leaf}}`, `depth` levels deep.
fn nested_record(registry: &mut TypeRegistry, depth: usize, leaf: TypeId) -> TypeId {
    let inner = registry.intern_name("inner");
    (0..depth).fold(leaf, |acc, _| registry.record([(inner, acc)]))
}

fn bench_union_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("union_building");

    for n in [4, 16, 28] {
        group.bench_with_input(BenchmarkId::new("distinct_classes", n), &n, |b, &n| {
            b.iter(|| {
                let mut registry = TypeRegistry::new();
                let alternates = classes(&mut registry, n);
                black_box(registry.union(alternates))
            });
        });
        group.bench_with_input(BenchmarkId::new("join_chain", n), &n, |b, &n| {
            b.iter(|| {
                let mut registry = TypeRegistry::new();
                let alternates = classes(&mut registry, n);
                let joined = alternates
                    .into_iter()
                    .fold(TypeId::NO_TYPE, |acc, next| registry.least_supertype(acc, next));
                black_box(joined)
            });
        });
    }

    group.finish();
}

fn bench_structural_subtype(c: &mut Criterion) {
    let mut group = c.benchmark_group("structural_subtype");

    for depth in [5, 20, 50] {
        let mut registry = TypeRegistry::new();
        let either = registry.union([TypeId::NUMBER, TypeId::STRING]);
        let narrow = nested_record(&mut registry, depth, TypeId::NUMBER);
        let wide = nested_record(&mut registry, depth, either);

        group.bench_with_input(BenchmarkId::new("nested_records", depth), &depth, |b, _| {
            b.iter(|| black_box(registry.is_subtype(black_box(narrow), black_box(wide))));
        });
    }

    group.finish();
}

fn bench_implicit_interface_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("implicit_interface_match");

    for members in [2, 8, 32] {
        let mut registry = TypeRegistry::new();
        let iface = ClassTypeBuilder::interface(&mut registry, "Shape")
            .structural(true)
            .build();
        let class = ClassTypeBuilder::class(&mut registry, "Impl").build();
        for i in 0..members {
            let name = registry.intern_name(&format!("m{i}"));
            for owner in [iface.prototype, class.prototype] {
                let _ = registry.define_declared_property(owner, name, TypeId::NUMBER, NodeIndex::NONE);
            }
        }

        group.bench_with_input(BenchmarkId::new("members", members), &members, |b, _| {
            b.iter(|| black_box(registry.is_subtype(class.instance, iface.instance)));
        });
    }

    group.finish();
}

criterion_group!(
    lattice_benches,
    bench_union_building,
    bench_structural_subtype,
    bench_implicit_interface_match
);
criterion_main!(lattice_benches);
