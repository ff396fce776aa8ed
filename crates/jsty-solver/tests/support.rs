//! Fixtures shared by the test modules.

use jsty_common::NodeIndex;

use crate::class_hierarchy::{ClassTypeBuilder, DeclaredClass};
use crate::registry::TypeRegistry;
use crate::types::*;

pub(crate) fn record(registry: &mut TypeRegistry, properties: &[(&str, TypeId)]) -> TypeId {
    let properties: Vec<_> = properties
        .iter()
        .map(|&(name, type_id)| (registry.intern_name(name), type_id))
        .collect();
    registry.record(properties)
}

/// `function(params...): ret` with required parameters and an unknown
/// receiver.
pub(crate) fn function(registry: &mut TypeRegistry, params: &[TypeId], ret: TypeId) -> TypeId {
    let params = params.iter().map(|&p| ParamInfo::required(p));
    registry.function(CallSignature::new(params, ret), None)
}

pub(crate) fn declare(registry: &mut TypeRegistry, owner: TypeId, name: &str, type_id: TypeId) {
    let name = registry.intern_name(name);
    let declared = registry
        .define_declared_property(owner, name, type_id, NodeIndex::NONE)
        .expect("owner accepts properties");
    assert!(declared);
}

pub(crate) fn class(registry: &mut TypeRegistry, name: &str) -> DeclaredClass {
    ClassTypeBuilder::class(registry, name).build()
}

pub(crate) fn subclass(registry: &mut TypeRegistry, name: &str, parent: TypeId) -> DeclaredClass {
    ClassTypeBuilder::class(registry, name)
        .superclass(parent)
        .build()
}

/// A structural interface (`@record`) whose prototype declares `members`.
pub(crate) fn structural_interface(
    registry: &mut TypeRegistry,
    name: &str,
    members: &[(&str, TypeId)],
) -> DeclaredClass {
    let iface = ClassTypeBuilder::interface(registry, name)
        .structural(true)
        .build();
    for &(member, type_id) in members {
        declare(registry, iface.prototype, member, type_id);
    }
    iface
}
