//! Function types on the left-hand side.
//!
//! Return types are covariant and parameters contravariant. Receivers are
//! treated covariantly (either direction of subtyping is accepted) so that
//! method overrides type check.
//!
//! A required parameter of the subtype may not line up with an optional one
//! of the supertype, except against the top function (`function(...?)`). The
//! other direction is allowed: a function that ignores trailing arguments can
//! be passed where more are supplied.

use crate::subtype::SubtypeChecker;
use crate::types::*;

impl<'a> SubtypeChecker<'a> {
    pub(crate) fn function_is_subtype(&mut self, a: TypeId, b: TypeId) -> bool {
        if self.check_helper(a, b) {
            return true;
        }
        let reg = self.registry;
        let (Some(this_fn), Some(that_fn)) = (reg.function_info(a), reg.function_info(b)) else {
            return self.is_subtype(TypeId::FUNCTION_PROTOTYPE, b);
        };
        // Any function can stand in for an interface function; an interface
        // function stands in for nothing else.
        if that_fn.is_interface() {
            return true;
        }
        if this_fn.is_interface() {
            return false;
        }
        self.receivers_covariant(this_fn.this_type, that_fn.this_type)
            && self.signature_is_subtype(&this_fn.signature, &that_fn.signature)
    }

    fn receivers_covariant(&mut self, this_receiver: TypeId, that_receiver: TypeId) -> bool {
        let reg = self.registry;
        let interface_receiver = reg
            .constructor_of(that_receiver)
            .is_some_and(|ctor| reg.is_interface(ctor));
        interface_receiver
            || self.is_subtype(that_receiver, this_receiver)
            || self.is_subtype(this_receiver, that_receiver)
    }

    pub(crate) fn signature_is_subtype(&mut self, this: &CallSignature, that: &CallSignature) -> bool {
        if !self.is_subtype(this.return_type, that.return_type) {
            return false;
        }

        let (mut i, mut j) = (0, 0);
        while let (Some(&this_param), Some(&that_param)) = (this.params.get(i), that.params.get(j)) {
            if !self.is_subtype(that_param.type_id, this_param.type_id) {
                return false;
            }

            let this_optional = this_param.rest || this_param.optional;
            let that_optional = that_param.rest || that_param.optional;
            if !this_optional && that_optional {
                let top_function = that_param.rest
                    && (self.registry.is_unknown_type(that_param.type_id)
                        || self.registry.is_no_type(that_param.type_id));
                if !top_function {
                    return false;
                }
            }

            if this_param.rest && that_param.rest {
                return true;
            }
            if !this_param.rest {
                i += 1;
            }
            if !that_param.rest {
                j += 1;
            }
        }

        // The supertype ran out while the subtype still requires an argument.
        match this.params.get(i) {
            Some(param) if j >= that.params.len() => param.optional || param.rest,
            _ => true,
        }
    }
}
