//! Centralized limits and thresholds for the type lattice.
//!
//! Every bound the lattice enforces on recursive or growing structures lives
//! here, so a host can see in one place how far a query is allowed to go.
//!
//! # Categories
//!
//! - **Recursion Depths**: bounds on nested walks over the type graph
//! - **Capacity Limits**: bounds on the size of constructed types
//!
//! Recursion limits for the subtype and equivalence walks are expressed as
//! profiles in `jsty_solver::recursion::RecursionProfile`, which read their
//! numbers from this module.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum depth for template substitution.
///
/// Substituting the bindings of a generic class into its member types walks
/// nested function, record and union types. A walk deeper than this stops
/// and leaves the remaining subtree unsubstituted.
///
/// ```javascript
/// /** @template T */
/// class Box {
///   /** @return {function(function(T): T): T} */ nested() {}
/// }
/// ```
pub const MAX_INSTANTIATION_DEPTH: u32 = 50;

/// Maximum depth for subtype checks.
///
/// Structural matching of mutually recursive records and structural
/// interfaces recurses through property types. The match cache stops true
/// cycles; this bounds acyclic but very deep graphs.
///
/// ```javascript
/// /** @record */ function Node() {}
/// /** @type {Node} */ Node.prototype.next;
/// ```
pub const MAX_SUBTYPE_DEPTH: u32 = 100;

/// Maximum number of steps for a single subtype or equivalence query.
pub const MAX_SUBTYPE_ITERATIONS: u32 = 100_000;

/// Maximum depth for following named-type aliases during resolution.
///
/// A chain of typedef aliases longer than this resolves to the unknown type.
pub const MAX_ALIAS_RESOLUTION_DEPTH: u32 = 128;

/// Maximum depth when rendering a type for display.
///
/// Rendering past this depth prints `...` instead of the nested type.
pub const MAX_DISPLAY_DEPTH: u32 = 20;

/// Maximum length of an implicit prototype chain walk.
///
/// Chains longer than this are treated as cyclic.
pub const MAX_PROTOTYPE_CHAIN_LENGTH: u32 = 1_000;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Maximum number of alternates in a union before it collapses to `?`.
///
/// Flow inference can join many distinct object types at a merge point.
/// Past this size the union carries no useful information and every later
/// subtype check against it gets slower.
pub const MAX_UNION_SIZE: usize = 30;

/// Number of record properties shown when rendering a record type for a
/// diagnostic. Annotation rendering always prints every property.
pub const MAX_PRETTY_PRINTED_PROPERTIES: usize = 4;

/// Inline capacity for short type lists (union alternates, template bindings).
pub const TYPE_LIST_INLINE: usize = 4;
