//! The type registry: arena storage, native types and hash-consing.
//!
//! One registry serves one compilation job. It owns every `TypeNode`, the
//! object records behind nominal types, the name interner and the
//! diagnostics raised while building types.
//!
//! Structural shapes (records, unions, ordinary functions, templatized types,
//! named references) go through the intern table, so building the same shape
//! twice yields the same `TypeId` and identity stays a valid fast path for
//! equality.

use jsty_common::{Atom, Interner, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;

use crate::diagnostics::PendingDiagnostic;
use crate::options::SolverOptions;
use crate::template_map::TemplateTypeMap;
use crate::types::*;

/// Hash-cons key. Records, unions, templatized types and names are keyed by
/// their data; ordinary functions by their shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum InternKey {
    Data(TypeData),
    Function(FunctionShapeKey),
}

/// A native constructor with its instance and prototype handles.
struct NativeClass {
    name: &'static str,
    constructor: TypeId,
    instance: TypeId,
    prototype: TypeId,
    type_params: &'static [TypeId],
}

const NATIVE_CLASSES: [NativeClass; 6] = [
    NativeClass {
        name: "Object",
        constructor: TypeId::OBJECT_FUNCTION,
        instance: TypeId::OBJECT,
        prototype: TypeId::OBJECT_PROTOTYPE,
        type_params: &[TypeId::OBJECT_INDEX_KEY, TypeId::OBJECT_ELEMENT_KEY],
    },
    NativeClass {
        name: "Function",
        constructor: TypeId::FUNCTION_FUNCTION,
        instance: TypeId::FUNCTION_INSTANCE,
        prototype: TypeId::FUNCTION_PROTOTYPE,
        type_params: &[],
    },
    NativeClass {
        name: "Array",
        constructor: TypeId::ARRAY_FUNCTION,
        instance: TypeId::ARRAY,
        prototype: TypeId::ARRAY_PROTOTYPE,
        type_params: &[TypeId::ARRAY_ELEMENT_KEY],
    },
    NativeClass {
        name: "Boolean",
        constructor: TypeId::BOOLEAN_OBJECT_FUNCTION,
        instance: TypeId::BOOLEAN_OBJECT,
        prototype: TypeId::BOOLEAN_PROTOTYPE,
        type_params: &[],
    },
    NativeClass {
        name: "Number",
        constructor: TypeId::NUMBER_OBJECT_FUNCTION,
        instance: TypeId::NUMBER_OBJECT,
        prototype: TypeId::NUMBER_PROTOTYPE,
        type_params: &[],
    },
    NativeClass {
        name: "String",
        constructor: TypeId::STRING_OBJECT_FUNCTION,
        instance: TypeId::STRING_OBJECT,
        prototype: TypeId::STRING_PROTOTYPE,
        type_params: &[],
    },
];

/// Names of the native template keys, in `TypeId` order.
const NATIVE_TEMPLATE_KEYS: [&str; 3] = ["IObject#KEY", "IObject#VALUE", "T"];

/// Arena and intern table for one compilation job.
pub struct TypeRegistry {
    nodes: Vec<TypeNode>,
    objects: Vec<ObjectData>,
    interned: FxHashMap<InternKey, TypeId>,
    /// Source nodes of record properties, keyed by `(record, name)`.
    record_nodes: FxHashMap<(TypeId, Atom), NodeIndex>,
    interner: Interner,
    options: SolverOptions,
    diagnostics: Vec<PendingDiagnostic>,
    declarations_closed: bool,
    /// Nodes whose resolution is in progress.
    pub(crate) resolving: FxHashSet<TypeId>,
    next_template_id: u32,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry with the native types laid out at their fixed ids.
    pub fn new() -> Self {
        Self::with_options(SolverOptions::default())
    }

    pub fn with_options(options: SolverOptions) -> Self {
        let mut interner = Interner::new();
        interner.intern_common();
        let mut registry = TypeRegistry {
            nodes: Vec::with_capacity(256),
            objects: Vec::with_capacity(64),
            interned: FxHashMap::default(),
            record_nodes: FxHashMap::default(),
            interner,
            options,
            diagnostics: Vec::new(),
            declarations_closed: false,
            resolving: FxHashSet::default(),
            next_template_id: 0,
        };
        registry.bootstrap();
        registry
    }

    // =========================================================================
    // Native bootstrap
    // =========================================================================

    fn bootstrap(&mut self) {
        let scalars = [
            TypeData::Bottom(BottomKind::NoType),
            TypeData::Bottom(BottomKind::NoObject),
            TypeData::Bottom(BottomKind::NoResolved),
            TypeData::All,
            TypeData::Unknown { checked: false },
            TypeData::Unknown { checked: true },
            TypeData::Null,
            TypeData::Void,
            TypeData::Primitive(PrimitiveKind::Boolean),
            TypeData::Primitive(PrimitiveKind::Number),
            TypeData::Primitive(PrimitiveKind::String),
        ];
        for data in scalars {
            self.push_node(TypeNode::new(data));
        }

        for class in &NATIVE_CLASSES {
            self.bootstrap_class(class);
        }

        for name in NATIVE_TEMPLATE_KEYS {
            let name = self.interner.intern(name);
            let id = self.next_template_id;
            self.next_template_id += 1;
            self.push_node(TypeNode::new(TypeData::Template { name, id }));
        }
        debug_assert_eq!(self.nodes.len(), TypeId::LEAST_FUNCTION.index());

        let least = self.native_function(
            None,
            FunctionKind::Ordinary,
            CallSignature::new([ParamInfo::rest(TypeId::ALL)], TypeId::NO_TYPE),
            TypeId::UNKNOWN,
            None,
        );
        debug_assert_eq!(least, TypeId::LEAST_FUNCTION);

        let greatest = self.native_function(
            None,
            FunctionKind::Constructor,
            CallSignature::new([ParamInfo::rest(TypeId::UNKNOWN)], TypeId::UNKNOWN),
            TypeId::UNKNOWN,
            None,
        );
        if let Some(info) = self.function_info_mut(greatest) {
            info.instance_type = Some(TypeId::UNKNOWN);
        }
        debug_assert_eq!(greatest, TypeId::GREATEST_FUNCTION);
        debug_assert_eq!(self.nodes.len(), TypeId::FIRST_USER as usize);
    }

    fn bootstrap_class(&mut self, class: &NativeClass) {
        let name = self.interner.intern(class.name);

        let ctor = self.native_function(
            Some(name),
            FunctionKind::Constructor,
            CallSignature::new([ParamInfo::rest(TypeId::UNKNOWN)], TypeId::UNKNOWN),
            class.instance,
            None,
        );
        debug_assert_eq!(ctor, class.constructor);
        if let Some(info) = self.function_info_mut(ctor) {
            info.instance_type = Some(class.instance);
            info.prototype = Some(class.prototype);
            info.type_params = class.type_params.iter().copied().collect();
        }

        let instance = if class.instance == TypeId::FUNCTION_INSTANCE {
            self.native_function(
                Some(name),
                FunctionKind::Ordinary,
                CallSignature::new([ParamInfo::rest(TypeId::UNKNOWN)], TypeId::UNKNOWN),
                TypeId::UNKNOWN,
                Some(ctor),
            )
        } else {
            let mut data = ObjectData::new(Some(name), Some(class.prototype), ObjectKind::Instance);
            data.constructor = Some(ctor);
            data.flags = ObjectFlags::NATIVE;
            self.alloc_object(
                data,
                TypeData::Object,
                TemplateTypeMap::from_keys(class.type_params),
            )
        };
        debug_assert_eq!(instance, class.instance);

        let proto_name = self.interner.intern(&format!("{}.prototype", class.name));
        let parent = (class.prototype != TypeId::OBJECT_PROTOTYPE).then_some(TypeId::OBJECT);
        let mut data = ObjectData::new(
            Some(proto_name),
            parent,
            ObjectKind::Prototype { owner: ctor },
        );
        data.constructor = Some(ctor);
        data.flags = ObjectFlags::NATIVE | ObjectFlags::PROTOTYPE;
        let prototype = self.alloc_object(data, TypeData::Object, TemplateTypeMap::new());
        debug_assert_eq!(prototype, class.prototype);
    }

    fn native_function(
        &mut self,
        name: Option<Atom>,
        kind: FunctionKind,
        signature: CallSignature,
        this_type: TypeId,
        constructor: Option<TypeId>,
    ) -> TypeId {
        let info = FunctionInfo {
            kind,
            structural: false,
            signature,
            this_type,
            instance_type: None,
            prototype: None,
            implemented: TypeList::new(),
            extended: TypeList::new(),
            type_params: TypeList::new(),
        };
        let mut data = ObjectData::new(
            name,
            Some(TypeId::FUNCTION_PROTOTYPE),
            ObjectKind::Function(Box::new(info)),
        );
        data.constructor = constructor;
        data.flags = ObjectFlags::NATIVE;
        self.alloc_object(data, TypeData::Function, TemplateTypeMap::new())
    }

    // =========================================================================
    // Arena
    // =========================================================================

    pub(crate) fn push_node(&mut self, node: TypeNode) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Store `data` as a new object and wrap it in a fresh node.
    pub(crate) fn alloc_object(
        &mut self,
        data: ObjectData,
        wrap: fn(ObjectId) -> TypeData,
        template_map: TemplateTypeMap,
    ) -> TypeId {
        let object = ObjectId(self.objects.len() as u32);
        self.objects.push(data);
        self.push_node(TypeNode::with_template_map(wrap(object), template_map))
    }

    /// Return the interned node for `data`, creating it on first use.
    pub(crate) fn intern_node(&mut self, data: TypeData, template_map: TemplateTypeMap) -> TypeId {
        let key = InternKey::Data(data.clone());
        if let Some(&id) = self.interned.get(&key) {
            return id;
        }
        let id = self.push_node(TypeNode::with_template_map(data, template_map));
        self.interned.insert(key, id);
        id
    }

    /// Number of nodes, natives included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn data(&self, id: TypeId) -> &TypeData {
        &self.nodes[id.index()].data
    }

    #[inline]
    pub fn object(&self, id: ObjectId) -> &ObjectData {
        &self.objects[id.0 as usize]
    }

    #[inline]
    pub(crate) fn object_mut(&mut self, id: ObjectId) -> &mut ObjectData {
        &mut self.objects[id.0 as usize]
    }

    /// The object record behind an instance, prototype, function or enum.
    pub fn object_id(&self, id: TypeId) -> Option<ObjectId> {
        match self.data(id) {
            TypeData::Object(obj) | TypeData::Function(obj) | TypeData::Enum(obj) => Some(*obj),
            _ => None,
        }
    }

    pub fn object_data(&self, id: TypeId) -> Option<&ObjectData> {
        self.object_id(id).map(|obj| self.object(obj))
    }

    pub(crate) fn object_data_mut(&mut self, id: TypeId) -> Option<&mut ObjectData> {
        self.object_id(id).map(|obj| self.object_mut(obj))
    }

    pub fn function_info(&self, id: TypeId) -> Option<&FunctionInfo> {
        match self.data(id) {
            TypeData::Function(obj) => self.object(*obj).function(),
            _ => None,
        }
    }

    pub(crate) fn function_info_mut(&mut self, id: TypeId) -> Option<&mut FunctionInfo> {
        match *self.data(id) {
            TypeData::Function(obj) => self.object_mut(obj).function_mut(),
            _ => None,
        }
    }

    pub fn template_map(&self, id: TypeId) -> &TemplateTypeMap {
        &self.nodes[id.index()].template_map
    }

    /// Follow a settled resolution. Unresolved nodes map to themselves.
    #[inline]
    pub fn canonical(&self, id: TypeId) -> TypeId {
        self.nodes[id.index()]
            .resolution
            .get()
            .copied()
            .unwrap_or(id)
    }

    pub fn is_resolved(&self, id: TypeId) -> bool {
        self.nodes[id.index()].is_resolved()
    }

    pub(crate) fn settle_resolution(&self, id: TypeId, resolved: TypeId) {
        // A second settle keeps the first answer.
        let _ = self.nodes[id.index()].resolution.set(resolved);
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn intern_name(&mut self, name: &str) -> Atom {
        self.interner.intern(name)
    }

    pub fn name_text(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    // =========================================================================
    // Structural builders
    // =========================================================================

    /// An anonymous record type. A later duplicate name replaces the earlier
    /// one; the empty record is `Object`.
    pub fn record(&mut self, properties: impl IntoIterator<Item = (Atom, TypeId)>) -> TypeId {
        self.record_with_nodes(
            properties
                .into_iter()
                .map(|(name, type_id)| (name, type_id, NodeIndex::NONE)),
        )
    }

    pub fn record_with_nodes(
        &mut self,
        properties: impl IntoIterator<Item = (Atom, TypeId, NodeIndex)>,
    ) -> TypeId {
        let mut shape = RecordShape::default();
        let mut nodes: SmallVec<[(Atom, NodeIndex); 4]> = SmallVec::new();
        for (name, type_id, node) in properties {
            match shape.properties.iter_mut().find(|p| p.name == name) {
                Some(existing) => existing.type_id = type_id,
                None => shape.properties.push(RecordProperty { name, type_id }),
            }
            if node.is_some() {
                nodes.push((name, node));
            }
        }
        if shape.properties.is_empty() {
            return TypeId::OBJECT;
        }
        shape.properties.sort_by_key(|p| p.name);

        let id = self.intern_node(TypeData::Record(shape), TemplateTypeMap::new());
        for (name, node) in nodes {
            self.record_nodes.entry((id, name)).or_insert(node);
        }
        id
    }

    /// Source node of `name` on a record, if one was supplied.
    pub fn record_property_node(&self, record: TypeId, name: Atom) -> NodeIndex {
        self.record_nodes
            .get(&(record, name))
            .copied()
            .unwrap_or(NodeIndex::NONE)
    }

    /// An ordinary function type. The receiver defaults to `?`.
    pub fn function(&mut self, signature: CallSignature, this_type: Option<TypeId>) -> TypeId {
        self.generic_function(signature, this_type, &[])
    }

    /// An ordinary function type with its own template keys.
    pub fn generic_function(
        &mut self,
        signature: CallSignature,
        this_type: Option<TypeId>,
        type_params: &[TypeId],
    ) -> TypeId {
        let shape = FunctionShapeKey {
            signature,
            this_type: this_type.unwrap_or(TypeId::UNKNOWN),
            type_params: type_params.iter().copied().collect(),
        };
        let key = InternKey::Function(shape.clone());
        if let Some(&id) = self.interned.get(&key) {
            return id;
        }

        let info = FunctionInfo {
            kind: FunctionKind::Ordinary,
            structural: false,
            signature: shape.signature,
            this_type: shape.this_type,
            instance_type: None,
            prototype: None,
            implemented: TypeList::new(),
            extended: TypeList::new(),
            type_params: shape.type_params,
        };
        let mut data = ObjectData::new(
            None,
            Some(TypeId::FUNCTION_PROTOTYPE),
            ObjectKind::Function(Box::new(info)),
        );
        data.flags = ObjectFlags::SYNTHESIZED;
        let id = self.alloc_object(
            data,
            TypeData::Function,
            TemplateTypeMap::from_keys(type_params),
        );
        self.interned.insert(key, id);
        id
    }

    /// A fresh type variable. Two calls with the same name give two
    /// distinct variables.
    pub fn template_type(&mut self, name: &str) -> TypeId {
        let name = self.interner.intern(name);
        let id = self.next_template_id;
        self.next_template_id += 1;
        self.push_node(TypeNode::new(TypeData::Template { name, id }))
    }

    /// A forward reference to `name`. It reads as `?` until resolved.
    pub fn named(&mut self, name: &str) -> TypeId {
        let name = self.interner.intern(name);
        self.intern_node(TypeData::Named(name), TemplateTypeMap::new())
    }

    /// The `NoResolvedType` standing for `name`.
    pub fn unresolved(&mut self, name: Atom) -> TypeId {
        self.intern_node(TypeData::Unresolved(name), TemplateTypeMap::new())
    }

    /// `base` with `args` bound to its template keys in order.
    ///
    /// Arguments beyond the base's key count are dropped here; arity checks
    /// belong to `instantiate_generics`.
    pub fn templatized(&mut self, base: TypeId, args: &[TypeId]) -> TypeId {
        let base = self.canonical(base);
        let raw = match self.data(base) {
            TypeData::Templatized { base: raw, .. } => *raw,
            _ => base,
        };
        if args.is_empty() {
            return raw;
        }
        let key_count = self.template_map(raw).len();
        if key_count == 0 {
            return raw;
        }
        let args: TypeList = args.iter().copied().take(key_count).collect();
        let template_map = self.template_map(raw).add_values(&args);
        trace!(raw = raw.0, args = args.len(), "templatized");
        self.intern_node(TypeData::Templatized { base: raw, args }, template_map)
    }

    // =========================================================================
    // Declaration phase and diagnostics
    // =========================================================================

    /// End declaration collection. Object types are closed from here on and
    /// cached answers about them become stable.
    pub fn close_declarations(&mut self) {
        self.declarations_closed = true;
    }

    pub fn declarations_closed(&self) -> bool {
        self.declarations_closed
    }

    pub(crate) fn report(&mut self, diagnostic: PendingDiagnostic) {
        trace!(code = diagnostic.code, "diagnostic recorded");
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[PendingDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<PendingDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
