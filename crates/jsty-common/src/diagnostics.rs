//! Diagnostic catalogue for the type lattice.
//!
//! The lattice itself never reports problems to the user. It records the
//! few conditions a host is expected to surface (bad generic arity, cyclic
//! inheritance, unknown names) as codes plus arguments, and the host renders
//! them with [`format_message`].

use crate::node::NodeIndex;
use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A catalogue entry: code, default category and message template.
///
/// Templates use `{0}`, `{1}`, ... placeholders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A rendered diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
    /// Where the offending type was written, if the host supplied it.
    pub node: NodeIndex,
}

impl Diagnostic {
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            category: message.category,
            code: message.code,
            message_text: format_message(message.message, args),
            node: NodeIndex::NONE,
        }
    }

    pub fn with_node(mut self, node: NodeIndex) -> Self {
        self.node = node;
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

// =============================================================================
// Catalogue
// =============================================================================

pub mod diagnostic_codes {
    pub const INVALID_GENERICS_INSTANTIATION: u32 = 1001;
    pub const INHERITANCE_CYCLE: u32 = 1002;
    pub const UNRESOLVED_TYPE_NAME: u32 = 1003;
    pub const EXCESSIVE_INSTANTIATION_DEPTH: u32 = 1004;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const INVALID_GENERICS_INSTANTIATION: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::INVALID_GENERICS_INSTANTIATION,
        category: DiagnosticCategory::Warning,
        message: "Invalid generics instantiation for {0}.\nExpected {1} type argument(s), but found {2}.",
    };

    pub const INHERITANCE_CYCLE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::INHERITANCE_CYCLE,
        category: DiagnosticCategory::Warning,
        message: "Cycle detected in inheritance chain of type {0}",
    };

    pub const UNRESOLVED_TYPE_NAME: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_TYPE_NAME,
        category: DiagnosticCategory::Warning,
        message: "Bad type annotation. Unknown type {0}",
    };

    pub const EXCESSIVE_INSTANTIATION_DEPTH: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::EXCESSIVE_INSTANTIATION_DEPTH,
        category: DiagnosticCategory::Warning,
        message: "Instantiation of {0} is excessively deep.",
    };
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::INVALID_GENERICS_INSTANTIATION,
    diagnostic_messages::INHERITANCE_CYCLE,
    diagnostic_messages::UNRESOLVED_TYPE_NAME,
    diagnostic_messages::EXCESSIVE_INSTANTIATION_DEPTH,
];

pub fn get_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_message(code).map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod tests;
