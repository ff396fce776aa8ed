//! Meet rules by kind, and the function join/meet shared with the union
//! builder.
//!
//! `greatest_subtype` in `lattice.rs` picks the rule; each file here handles
//! one family of operands.

mod enums;
mod functions;
mod records;
mod templatized;
mod unions;
