//! Declared function signatures.
//!
//! A `DeclaredFunctionSignature` is the annotated shape of a function,
//! method or constructor before it becomes a function type: required and
//! optional formals (each possibly untyped), an optional rest formal, the
//! return type, the owning nominal type of a constructor or interface, the
//! receiver of a method, and the function's own type parameters.
//!
//! Signatures are plain values. Operations that need joins or meets take the
//! registry explicitly.

use smallvec::SmallVec;
use tracing::trace;

use crate::instantiate::TypeInstantiator;
use crate::registry::TypeRegistry;
use crate::template_map::TemplateTypeMap;
use crate::types::*;

/// `None` marks a slot that is declared but untyped.
pub type Formal = Option<TypeId>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclaredFunctionSignature {
    required: SmallVec<[Formal; 4]>,
    optional: SmallVec<[Formal; 4]>,
    has_rest: bool,
    rest: Formal,
    return_type: Formal,
    nominal: Option<TypeId>,
    receiver: Option<TypeId>,
    type_parameters: TypeList,
}

impl DeclaredFunctionSignature {
    pub fn builder() -> FunctionTypeBuilder {
        FunctionTypeBuilder::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The declared type at `index`, reading required, optional and rest
    /// formals as one sequence.
    pub fn formal_type_at(&self, index: usize) -> Formal {
        if let Some(&formal) = self.required.get(index) {
            return formal;
        }
        if let Some(&formal) = self.optional.get(index - self.required.len()) {
            return formal;
        }
        if self.has_rest { self.rest } else { None }
    }

    pub fn required_arity(&self) -> usize {
        self.required.len()
    }

    /// Required plus optional formals.
    pub fn optional_arity(&self) -> usize {
        self.required.len() + self.optional.len()
    }

    pub fn has_rest(&self) -> bool {
        self.has_rest
    }

    pub fn rest_type(&self) -> Formal {
        self.rest
    }

    pub fn return_type(&self) -> Formal {
        self.return_type
    }

    pub fn nominal_type(&self) -> Option<TypeId> {
        self.nominal
    }

    pub fn receiver_type(&self) -> Option<TypeId> {
        self.receiver
    }

    /// The nominal instance of a constructor, else the method receiver.
    pub fn this_type(&self) -> Option<TypeId> {
        self.nominal.or(self.receiver)
    }

    pub fn type_parameters(&self) -> &[TypeId] {
        &self.type_parameters
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn is_type_variable_defined_locally(&self, key: TypeId) -> bool {
        self.type_parameters.contains(&key)
    }

    pub fn with_receiver_type(&self, receiver: TypeId) -> Self {
        Self {
            receiver: Some(receiver),
            ..self.clone()
        }
    }

    /// The ordinary function type this signature declares. Untyped slots
    /// become `?`.
    pub fn to_function_type(&self, registry: &mut TypeRegistry) -> TypeId {
        let or_unknown = |formal: Formal| formal.unwrap_or(TypeId::UNKNOWN);
        let params = self
            .required
            .iter()
            .map(|&f| ParamInfo::required(or_unknown(f)))
            .chain(self.optional.iter().map(|&f| ParamInfo::optional(or_unknown(f))))
            .chain(self.has_rest.then(|| ParamInfo::rest(or_unknown(self.rest))));
        let signature = CallSignature::new(params, or_unknown(self.return_type));
        registry.generic_function(signature, self.this_type(), &self.type_parameters)
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    /// The signature of a method that overrides `parent`.
    ///
    /// With `inherits_parent_type_info` (the method carries no annotation at
    /// all) the parent's formals, return and type parameters are taken
    /// verbatim. Otherwise untyped slots of `own` are filled position by
    /// position. `own`'s nominal and receiver types are kept either way.
    pub fn merge_override(own: &Self, parent: &Self, inherits_parent_type_info: bool) -> Self {
        if inherits_parent_type_info {
            return Self {
                nominal: own.nominal,
                receiver: own.receiver,
                ..parent.clone()
            };
        }

        let required: SmallVec<[Formal; 4]> = own
            .required
            .iter()
            .enumerate()
            .map(|(i, &formal)| formal.or_else(|| parent.formal_type_at(i)))
            .collect();
        let offset = own.required.len();
        let optional: SmallVec<[Formal; 4]> = own
            .optional
            .iter()
            .enumerate()
            .map(|(i, &formal)| formal.or_else(|| parent.formal_type_at(offset + i)))
            .collect();
        let (has_rest, rest) = if own.has_rest {
            (true, own.rest)
        } else if parent.has_rest {
            (true, parent.rest)
        } else {
            (false, None)
        };
        let type_parameters = if own.type_parameters.is_empty() {
            parent.type_parameters.clone()
        } else {
            own.type_parameters.clone()
        };

        Self {
            required,
            optional,
            has_rest,
            rest,
            return_type: own.return_type.or(parent.return_type),
            nominal: own.nominal,
            receiver: own.receiver,
            type_parameters,
        }
    }

    // =========================================================================
    // Meet
    // =========================================================================

    /// The shape every candidate in `signatures` is guaranteed to accept and
    /// return. Panics on an empty slice.
    pub fn meet_many(registry: &mut TypeRegistry, signatures: &[Self]) -> Self {
        let (first, rest) = signatures
            .split_first()
            .unwrap_or_else(|| panic!("meet_many needs at least one signature"));
        rest.iter()
            .fold(first.clone(), |acc, next| Self::meet(registry, &acc, next))
    }

    /// Formals join, the return type meets.
    pub fn meet(registry: &mut TypeRegistry, f1: &Self, f2: &Self) -> Self {
        if f1 == f2 {
            return f1.clone();
        }

        let min_required = f1.required_arity().min(f2.required_arity());
        let max_total = f1.optional_arity().max(f2.optional_arity());
        let mut builder = Self::builder();
        for i in 0..min_required {
            builder = builder.add_required(
                registry.null_accepting_join(f1.formal_type_at(i), f2.formal_type_at(i)),
            );
        }
        for i in min_required..max_total {
            builder = builder.add_optional(
                registry.null_accepting_join(f1.formal_type_at(i), f2.formal_type_at(i)),
            );
        }
        if f1.has_rest || f2.has_rest {
            builder = builder.add_rest(registry.null_accepting_join(f1.rest, f2.rest));
        }
        let return_type = registry.null_accepting_meet(f1.return_type, f2.return_type);
        trace!(min_required, max_total, "signature meet");
        builder.add_return(return_type).build()
    }

    // =========================================================================
    // Instantiation
    // =========================================================================

    /// Substitute a class's bindings through the formals and return type.
    ///
    /// Nominal and receiver types are dropped; keys shadowed by this
    /// signature's own type parameters are left alone.
    pub fn substitute_for_instantiation(
        &self,
        registry: &mut TypeRegistry,
        bindings: &TemplateTypeMap,
    ) -> Self {
        let bindings = bindings.without_keys(|key| self.is_type_variable_defined_locally(key));
        let mut instantiator = TypeInstantiator::new(registry, &bindings);
        let mut substitute =
            |formal: Formal| formal.map(|type_id| instantiator.instantiate(type_id));

        Self {
            required: self.required.iter().map(|&f| substitute(f)).collect(),
            optional: self.optional.iter().map(|&f| substitute(f)).collect(),
            has_rest: self.has_rest,
            rest: substitute(self.rest),
            return_type: substitute(self.return_type),
            nominal: None,
            receiver: None,
            type_parameters: self.type_parameters.clone(),
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds a [`DeclaredFunctionSignature`] slot by slot. Required formals come
/// before optional ones, and the rest formal comes last.
#[derive(Default)]
pub struct FunctionTypeBuilder {
    signature: DeclaredFunctionSignature,
}

impl FunctionTypeBuilder {
    pub fn add_required(mut self, formal: impl Into<Formal>) -> Self {
        assert!(
            self.signature.optional.is_empty() && !self.signature.has_rest,
            "required formal added after optional or rest formals"
        );
        self.signature.required.push(formal.into());
        self
    }

    pub fn add_optional(mut self, formal: impl Into<Formal>) -> Self {
        assert!(!self.signature.has_rest, "optional formal added after the rest formal");
        self.signature.optional.push(formal.into());
        self
    }

    pub fn add_rest(mut self, formal: impl Into<Formal>) -> Self {
        assert!(!self.signature.has_rest, "rest formal added twice");
        self.signature.has_rest = true;
        self.signature.rest = formal.into();
        self
    }

    pub fn add_return(mut self, return_type: impl Into<Formal>) -> Self {
        self.signature.return_type = return_type.into();
        self
    }

    /// The instance type of the constructor or interface being declared.
    pub fn add_nominal(mut self, instance: TypeId) -> Self {
        self.signature.nominal = Some(instance);
        self
    }

    pub fn add_receiver(mut self, receiver: TypeId) -> Self {
        self.signature.receiver = Some(receiver);
        self
    }

    pub fn add_type_parameters(mut self, keys: &[TypeId]) -> Self {
        self.signature.type_parameters = keys.iter().copied().collect();
        self
    }

    pub fn build(self) -> DeclaredFunctionSignature {
        self.signature
    }
}

#[cfg(test)]
#[path = "tests/signature_tests.rs"]
mod tests;
