//! Function join and meet.
//!
//! Two ordinary functions with fully known signatures join to the supertype
//! side when subtyping goes one way only, and otherwise merge piecewise when
//! their parameter lists are identical. Everything else degrades to one of
//! the two sentinels: `GREATEST_FUNCTION` for a join, `LEAST_FUNCTION` for a
//! meet.

use tracing::trace;

use crate::registry::TypeRegistry;
use crate::types::*;

impl TypeRegistry {
    /// Join (`least_super`) or meet of two function types.
    pub(crate) fn sup_and_inf(&mut self, a: TypeId, b: TypeId, least_super: bool) -> TypeId {
        if self.is_equivalent(a, b) {
            return a;
        }

        let both_known = match (self.function_info(a), self.function_info(b)) {
            (Some(f), Some(g)) => {
                f.is_ordinary()
                    && g.is_ordinary()
                    && !self.has_unknown_params_or_return(&f.signature)
                    && !self.has_unknown_params_or_return(&g.signature)
            }
            _ => false,
        };
        if both_known {
            let a_sub = self.is_subtype(a, b);
            let b_sub = self.is_subtype(b, a);
            if a_sub && !b_sub {
                return if least_super { b } else { a };
            }
            if b_sub && !a_sub {
                return if least_super { a } else { b };
            }
            if let Some(merged) = self.merge_functions_piecewise(a, b, least_super) {
                return merged;
            }
        }

        if self.is_equivalent(TypeId::FUNCTION_INSTANCE, b) {
            return if least_super { b } else { a };
        }
        if self.is_equivalent(TypeId::FUNCTION_INSTANCE, a) {
            return if least_super { a } else { b };
        }
        trace!(a = a.0, b = b.0, least_super, "function sentinel");
        if least_super {
            TypeId::GREATEST_FUNCTION
        } else {
            TypeId::LEAST_FUNCTION
        }
    }

    fn has_unknown_params_or_return(&self, signature: &CallSignature) -> bool {
        self.is_unknown_type(signature.return_type)
            || signature
                .params
                .iter()
                .any(|p| self.is_unknown_type(p.type_id))
    }

    /// Same parameters: combine the returns and receivers.
    fn merge_functions_piecewise(&mut self, a: TypeId, b: TypeId, least_super: bool) -> Option<TypeId> {
        let f = self.function_info(a)?.clone();
        let g = self.function_info(b)?.clone();
        if !self.parameters_identical(&f.signature, &g.signature) {
            return None;
        }

        let (return_type, this_type) = if least_super {
            (
                self.least_supertype(f.signature.return_type, g.signature.return_type),
                self.least_supertype(f.this_type, g.this_type),
            )
        } else {
            (
                self.greatest_subtype(f.signature.return_type, g.signature.return_type),
                self.greatest_subtype(f.this_type, g.this_type),
            )
        };
        let this_type = if self.is_object(this_type) || self.is_unknown_type(this_type) {
            this_type
        } else if least_super {
            TypeId::OBJECT
        } else {
            TypeId::NO_OBJECT_TYPE
        };

        let mut signature = CallSignature::new(f.signature.params.iter().copied(), return_type);
        signature.return_inferred = f.signature.return_inferred || g.signature.return_inferred;
        Some(self.function(signature, Some(this_type)))
    }

    fn parameters_identical(&self, f: &CallSignature, g: &CallSignature) -> bool {
        f.params.len() == g.params.len()
            && f.params.iter().zip(g.params.iter()).all(|(p, q)| {
                p.optional == q.optional && p.rest == q.rest && self.is_equivalent(p.type_id, q.type_id)
            })
    }
}
