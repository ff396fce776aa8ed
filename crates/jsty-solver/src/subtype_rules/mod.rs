//! Per-kind subtype rules for [`SubtypeChecker`](crate::subtype::SubtypeChecker).
//!
//! Each file extends the checker with the rules for one family of left-hand
//! types. `templates` and `structural` are shared by every family through the
//! checker's prologue.

mod functions;
mod objects;
mod structural;
mod templates;
mod unions;
