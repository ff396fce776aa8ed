//! Common types and utilities for the jsty type lattice.
//!
//! This crate provides the leaf-level pieces every consumer of the lattice
//! shares:
//! - String interning (`Atom`, `Interner`)
//! - Opaque handles to program nodes (`NodeIndex`)
//! - Recursion and size limits
//! - Diagnostic catalogue and message formatting
//! - Tracing subscriber setup

// String interning for property and type names
pub mod interner;
pub use interner::{Atom, Interner};

// Opaque handles into the host's syntax tree
pub mod node;
pub use node::NodeIndex;

// Centralized limits and thresholds
pub mod limits;

// Diagnostic catalogue
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage, format_message};

// Tracing subscriber configuration
pub mod tracing_config;
