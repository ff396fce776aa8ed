//! Type lattice for a gradually typed JavaScript checker.
//!
//! Types live in a [`TypeRegistry`] arena and are addressed by [`TypeId`].
//! Canonical singletons (`?`, `*`, the bottoms, the scalars and the native
//! objects) sit at fixed ids; structural shapes are hash-consed, so identity
//! is a valid fast path for equality.
//!
//! The registry answers the lattice questions:
//! - subtyping ([`TypeRegistry::is_subtype`]), nominal with optional
//!   structural matching for records and structural interfaces
//! - equivalence under three policies ([`EquivalenceMethod`])
//! - join and meet ([`TypeRegistry::least_supertype`],
//!   [`TypeRegistry::greatest_subtype`])
//! - generic instantiation and declared signatures
//!
//! None of these fail. Missing information degrades to `?`, a bottom type or
//! a conservative "no match".
mod class_hierarchy;
mod diagnostics;
mod equivalence;
mod format;
mod instantiate;
mod lattice;
mod match_cache;
mod meet_rules;
mod objects;
pub mod options;
mod queries;
pub mod recursion;
mod registry;
mod resolve;
mod signature;
mod subtype;
mod subtype_rules;
mod template_map;
pub mod types;
mod union_builder;

pub use class_hierarchy::{ClassTypeBuilder, DeclaredClass, MemberTypeMap};
pub use diagnostics::{DiagnosticArg, PendingDiagnostic};
pub use equivalence::EquivalenceChecker;
pub use format::TypeFormatter;
pub use instantiate::{TypeInstantiator, instantiate_type};
pub use match_cache::{MatchCache, MatchStatus};
pub use objects::{DeclarationError, PropertyNames};
pub use options::{OptionsError, SolverOptions};
pub use registry::TypeRegistry;
pub use resolve::{NameTable, ResolveError, TypeScope, lookup};
pub use signature::{DeclaredFunctionSignature, Formal, FunctionTypeBuilder};
pub use subtype::{SubtypeChecker, SubtypeOptions};
pub use template_map::{TemplateBinding, TemplateTypeMap};
pub use types::{
    BottomKind, CallSignature, EquivalenceMethod, FunctionInfo, FunctionKind, ObjectData,
    ObjectFlags, ObjectId, ObjectKind, ParamInfo, PrimitiveKind, PropertyInfo, RecordProperty,
    RecordShape, TypeData, TypeId, TypeList, TypeNode,
};
pub use union_builder::UnionBuilder;

// Unit tests are loaded by their source files via #[path = "tests/..."].
// The modules below cover behavior that spans several source files.
#[cfg(test)]
#[path = "../tests/lattice_law_tests.rs"]
mod lattice_law_tests;
#[cfg(test)]
#[path = "../tests/structural_match_tests.rs"]
mod structural_match_tests;
#[cfg(test)]
#[path = "../tests/signature_example_tests.rs"]
mod signature_example_tests;
#[cfg(test)]
#[path = "../tests/generics_tests.rs"]
mod generics_tests;
#[cfg(test)]
#[path = "../tests/resolution_tests.rs"]
mod resolution_tests;
#[cfg(test)]
#[path = "../tests/cycle_tests.rs"]
mod cycle_tests;
#[cfg(test)]
#[path = "../tests/support.rs"]
mod support;
#[cfg(test)]
#[path = "../tests/tracing_tests.rs"]
mod tracing_tests;
