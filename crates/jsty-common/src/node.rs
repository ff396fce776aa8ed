//! Opaque handles to nodes of the host program's syntax tree.
//!
//! The lattice never inspects syntax. It only remembers where a property
//! was defined so diagnostics can point back at it.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// No source node (synthesized or native definitions).
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        Self::NONE
    }
}
