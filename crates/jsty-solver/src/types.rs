//! Type representation for the jsty lattice.
//!
//! Every type is a `TypeId` handle into the [`TypeRegistry`](crate::TypeRegistry)
//! arena. Canonical scalar, bottom and top types are fixed handles
//! (`TypeId::NUMBER`, `TypeId::NO_TYPE`, ...) that every registry lays out at
//! the same index, so identity checks against them are integer compares.
//!
//! Structural kinds (records, unions, ordinary functions, templatized types,
//! named proxies) are hash-consed: building the same shape twice returns the
//! same handle. Nominal kinds (class/interface instances, constructors,
//! enums, template types) get a fresh handle per declaration.

use bitflags::bitflags;
use indexmap::IndexMap;
use jsty_common::{Atom, NodeIndex};
use once_cell::unsync::OnceCell;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

use crate::template_map::TemplateTypeMap;

/// Handle to a type node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    // ----- bottoms -----
    pub const NO_TYPE: TypeId = TypeId(0);
    pub const NO_OBJECT_TYPE: TypeId = TypeId(1);
    pub const NO_RESOLVED_TYPE: TypeId = TypeId(2);

    // ----- top and unknown -----
    pub const ALL: TypeId = TypeId(3);
    pub const UNKNOWN: TypeId = TypeId(4);
    /// An unknown that has already been reported to the user.
    pub const CHECKED_UNKNOWN: TypeId = TypeId(5);

    // ----- value types -----
    pub const NULL: TypeId = TypeId(6);
    pub const VOID: TypeId = TypeId(7);
    pub const BOOLEAN: TypeId = TypeId(8);
    pub const NUMBER: TypeId = TypeId(9);
    pub const STRING: TypeId = TypeId(10);

    // ----- native object graph -----
    pub const OBJECT_FUNCTION: TypeId = TypeId(11);
    pub const OBJECT: TypeId = TypeId(12);
    pub const OBJECT_PROTOTYPE: TypeId = TypeId(13);
    pub const FUNCTION_FUNCTION: TypeId = TypeId(14);
    pub const FUNCTION_INSTANCE: TypeId = TypeId(15);
    pub const FUNCTION_PROTOTYPE: TypeId = TypeId(16);
    pub const ARRAY_FUNCTION: TypeId = TypeId(17);
    pub const ARRAY: TypeId = TypeId(18);
    pub const ARRAY_PROTOTYPE: TypeId = TypeId(19);
    pub const BOOLEAN_OBJECT_FUNCTION: TypeId = TypeId(20);
    pub const BOOLEAN_OBJECT: TypeId = TypeId(21);
    pub const BOOLEAN_PROTOTYPE: TypeId = TypeId(22);
    pub const NUMBER_OBJECT_FUNCTION: TypeId = TypeId(23);
    pub const NUMBER_OBJECT: TypeId = TypeId(24);
    pub const NUMBER_PROTOTYPE: TypeId = TypeId(25);
    pub const STRING_OBJECT_FUNCTION: TypeId = TypeId(26);
    pub const STRING_OBJECT: TypeId = TypeId(27);
    pub const STRING_PROTOTYPE: TypeId = TypeId(28);

    // ----- native template keys -----
    /// `IObject#KEY`, the key parameter of `Object`.
    pub const OBJECT_INDEX_KEY: TypeId = TypeId(29);
    /// `IObject#VALUE`, the element parameter of `Object`.
    pub const OBJECT_ELEMENT_KEY: TypeId = TypeId(30);
    /// `T`, the element parameter of `Array`.
    pub const ARRAY_ELEMENT_KEY: TypeId = TypeId(31);

    // ----- function sub-lattice -----
    /// Bottom of the function sub-lattice: `function(...*): None`.
    pub const LEAST_FUNCTION: TypeId = TypeId(32);
    /// The unknown-to-unknown constructor used as the function join fallback.
    pub const GREATEST_FUNCTION: TypeId = TypeId(33);

    /// First handle available to non-native types.
    pub const FIRST_USER: u32 = 34;

    /// True for canonical handles shared by every registry.
    #[inline]
    pub fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to an object record (property map plus object metadata).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// Short list of type handles (union alternates, template arguments).
pub type TypeList = SmallVec<[TypeId; 4]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BottomKind {
    /// Uninhabited.
    NoType,
    /// Uninhabited object.
    NoObject,
    /// A forward-declared name that never resolved.
    NoResolved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Number,
    String,
}

impl PrimitiveKind {
    pub fn value_type(self) -> TypeId {
        match self {
            Self::Boolean => TypeId::BOOLEAN,
            Self::Number => TypeId::NUMBER,
            Self::String => TypeId::STRING,
        }
    }

    pub fn object_type(self) -> TypeId {
        match self {
            Self::Boolean => TypeId::BOOLEAN_OBJECT,
            Self::Number => TypeId::NUMBER_OBJECT,
            Self::String => TypeId::STRING_OBJECT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

/// The closed set of type variants.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Bottom(BottomKind),
    /// A `NoResolvedType` that remembers the name it stands for.
    Unresolved(Atom),
    All,
    Unknown {
        checked: bool,
    },
    Null,
    Void,
    Primitive(PrimitiveKind),
    /// Nominal instance, prototype object or boxed primitive object.
    Object(ObjectId),
    Function(ObjectId),
    Enum(ObjectId),
    /// An element of the enum whose type is the payload.
    EnumElement(TypeId),
    Record(RecordShape),
    /// A nominal type with concrete generic arguments.
    Templatized {
        base: TypeId,
        args: TypeList,
    },
    /// A type variable. `id` keeps same-named variables of different
    /// declarations apart.
    Template {
        name: Atom,
        id: u32,
    },
    /// A forward reference to a named type, transparent once resolved.
    Named(Atom),
    /// Flattened, non-empty set of alternates sorted by display text.
    Union(TypeList),
}

/// Anonymous structural object: property names sorted, unique.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecordShape {
    pub properties: SmallVec<[RecordProperty; 4]>,
}

impl RecordShape {
    pub fn get(&self, name: Atom) -> Option<TypeId> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.type_id)
    }

    pub fn names(&self) -> impl Iterator<Item = Atom> + '_ {
        self.properties.iter().map(|p| p.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordProperty {
    pub name: Atom,
    pub type_id: TypeId,
}

/// A slot in an object's property map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyInfo {
    pub type_id: TypeId,
    /// Inferred from an assignment rather than declared by annotation.
    pub inferred: bool,
    pub node: NodeIndex,
}

impl PropertyInfo {
    pub fn declared(type_id: TypeId, node: NodeIndex) -> Self {
        Self {
            type_id,
            inferred: false,
            node,
        }
    }

    pub fn inferred(type_id: TypeId, node: NodeIndex) -> Self {
        Self {
            type_id,
            inferred: true,
            node,
        }
    }
}

pub type PropertyMap = IndexMap<Atom, PropertyInfo, FxBuildHasher>;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u8 {
        /// Built by the registry itself.
        const NATIVE       = 1 << 0;
        /// The `prototype` object of a constructor or interface.
        const PROTOTYPE    = 1 << 1;
        /// Instances reject properties not declared on the type.
        const STRUCT       = 1 << 2;
        /// Instances only allow bracket access.
        const DICT         = 1 << 3;
        /// Hash-consed shape; the property map never changes.
        const SYNTHESIZED  = 1 << 4;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Ordinary,
    Constructor,
    Interface,
}

/// One formal parameter of a call signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
}

impl ParamInfo {
    pub fn required(type_id: TypeId) -> Self {
        Self {
            type_id,
            optional: false,
            rest: false,
        }
    }

    pub fn optional(type_id: TypeId) -> Self {
        Self {
            type_id,
            optional: true,
            rest: false,
        }
    }

    pub fn rest(type_id: TypeId) -> Self {
        Self {
            type_id,
            optional: false,
            rest: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallSignature {
    pub params: SmallVec<[ParamInfo; 4]>,
    pub return_type: TypeId,
    pub return_inferred: bool,
}

impl CallSignature {
    pub fn new(params: impl IntoIterator<Item = ParamInfo>, return_type: TypeId) -> Self {
        Self {
            params: params.into_iter().collect(),
            return_type,
            return_inferred: false,
        }
    }

    /// Number of parameters a caller must supply.
    pub fn min_arity(&self) -> usize {
        self.params
            .iter()
            .filter(|p| !p.optional && !p.rest)
            .count()
    }

    pub fn has_rest(&self) -> bool {
        self.params.last().is_some_and(|p| p.rest)
    }
}

/// Everything a function type carries beyond its property map.
#[derive(Clone, Debug)]
pub struct FunctionInfo {
    pub kind: FunctionKind,
    /// A structural interface (`@record`): instances match implicitly.
    pub structural: bool,
    pub signature: CallSignature,
    /// Receiver type. Constructors and interfaces receive their instance.
    pub this_type: TypeId,
    pub instance_type: Option<TypeId>,
    pub prototype: Option<TypeId>,
    /// Instance types of interfaces a constructor declares it implements.
    pub implemented: TypeList,
    /// Instance types of interfaces an interface declares it extends.
    pub extended: TypeList,
    pub type_params: TypeList,
}

impl FunctionInfo {
    pub fn is_constructor(&self) -> bool {
        self.kind == FunctionKind::Constructor
    }

    pub fn is_interface(&self) -> bool {
        self.kind == FunctionKind::Interface
    }

    pub fn is_ordinary(&self) -> bool {
        self.kind == FunctionKind::Ordinary
    }
}

/// Hash-cons key for ordinary function types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FunctionShapeKey {
    pub signature: CallSignature,
    pub this_type: TypeId,
    pub type_params: TypeList,
}

#[derive(Clone, Debug)]
pub enum ObjectKind {
    Instance,
    Prototype { owner: TypeId },
    Function(Box<FunctionInfo>),
    Enum { element: TypeId, primitive: TypeId },
}

/// Object metadata shared by instances, prototypes, functions and enums.
#[derive(Clone, Debug)]
pub struct ObjectData {
    pub name: Option<Atom>,
    /// Handle of the implicit prototype. Never owning.
    pub implicit_prototype: Option<TypeId>,
    pub constructor: Option<TypeId>,
    pub properties: PropertyMap,
    pub flags: ObjectFlags,
    pub kind: ObjectKind,
    /// Memoized answer to "is the prototype chain unknown".
    pub(crate) unknown: OnceCell<bool>,
}

impl ObjectData {
    pub fn new(name: Option<Atom>, implicit_prototype: Option<TypeId>, kind: ObjectKind) -> Self {
        Self {
            name,
            implicit_prototype,
            constructor: None,
            properties: PropertyMap::default(),
            flags: ObjectFlags::empty(),
            kind,
            unknown: OnceCell::new(),
        }
    }

    pub fn function(&self) -> Option<&FunctionInfo> {
        match &self.kind {
            ObjectKind::Function(info) => Some(info),
            _ => None,
        }
    }

    pub fn function_mut(&mut self) -> Option<&mut FunctionInfo> {
        match &mut self.kind {
            ObjectKind::Function(info) => Some(info),
            _ => None,
        }
    }
}

/// An arena slot.
#[derive(Clone, Debug)]
pub struct TypeNode {
    pub data: TypeData,
    pub template_map: TemplateTypeMap,
    /// Set exactly once by resolution.
    pub(crate) resolution: OnceCell<TypeId>,
}

impl TypeNode {
    pub fn new(data: TypeData) -> Self {
        Self {
            data,
            template_map: TemplateTypeMap::default(),
            resolution: OnceCell::new(),
        }
    }

    pub fn with_template_map(data: TypeData, template_map: TemplateTypeMap) -> Self {
        Self {
            data,
            template_map,
            resolution: OnceCell::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.get().is_some()
    }
}

/// Which notion of "same type" a caller wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EquivalenceMethod {
    /// Same declared type.
    Identity,
    /// Did re-inferring a flow fact change anything.
    DataFlow,
    /// Generic argument compatibility; unknown matches everything.
    Invariant,
}
