//! Diagnostics raised while building and instantiating types.
//!
//! ## Lazy Diagnostics
//!
//! Lattice code records a `PendingDiagnostic` holding the raw `TypeId`s and
//! names involved. The text is only produced by [`PendingDiagnostic::render`],
//! so the formatter never runs for diagnostics a caller decides to drop.

use std::sync::Arc;

use jsty_common::diagnostics::{Diagnostic, DiagnosticCategory, get_message};
use jsty_common::{Atom, NodeIndex};

use crate::format::TypeFormatter;
use crate::registry::TypeRegistry;
use crate::types::TypeId;

// =============================================================================
// Lazy Diagnostic Arguments
// =============================================================================

/// Argument for a diagnostic message template.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticArg {
    /// A type, rendered with `TypeFormatter`
    Type(TypeId),
    /// An interned name
    Atom(Atom),
    String(Arc<str>),
    Number(usize),
}

macro_rules! impl_from_diagnostic_arg {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(impl From<$source> for DiagnosticArg {
            fn from(v: $source) -> Self { Self::$variant(v) }
        })*
    };
}

impl_from_diagnostic_arg! {
    TypeId => Type,
    Atom   => Atom,
    usize  => Number,
}

impl From<&str> for DiagnosticArg {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for DiagnosticArg {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

/// A diagnostic that hasn't been rendered yet.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingDiagnostic {
    pub code: u32,
    pub args: Vec<DiagnosticArg>,
    pub category: DiagnosticCategory,
    /// Declaration the diagnostic points at, if the producer supplied one.
    pub node: NodeIndex,
}

impl PendingDiagnostic {
    pub fn warning(code: u32, args: Vec<DiagnosticArg>) -> Self {
        Self {
            code,
            args,
            category: DiagnosticCategory::Warning,
            node: NodeIndex::NONE,
        }
    }

    pub fn with_node(mut self, node: NodeIndex) -> Self {
        self.node = node;
        self
    }

    /// Format the arguments and fill the catalogue template for `code`.
    pub fn render(&self, registry: &TypeRegistry) -> Diagnostic {
        let formatter = TypeFormatter::new(registry);
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| match arg {
                DiagnosticArg::Type(id) => formatter.format(*id),
                DiagnosticArg::Atom(atom) => registry.name_text(*atom).to_string(),
                DiagnosticArg::String(s) => s.to_string(),
                DiagnosticArg::Number(n) => n.to_string(),
            })
            .collect();
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        match get_message(self.code) {
            Some(message) => {
                let mut diag = Diagnostic::new(message, &arg_refs).with_node(self.node);
                diag.category = self.category;
                diag
            }
            None => Diagnostic {
                category: self.category,
                code: self.code,
                message_text: arg_refs.join(" "),
                node: self.node,
            },
        }
    }
}
