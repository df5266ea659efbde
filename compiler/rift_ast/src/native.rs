//! Built-in primitive types.
//!
//! Each built-in type is an ordinary entity holding a [`CIdentifier`] with its
//! Rift spelling and a [`CNativeType`] naming the kind. Backends stamp their own
//! spelling on these entities before emitting anything.

use crate::components::CIdentifier;
use crate::{AstStore, Component, Id};

/// Enum of every primitive type built into Rift.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinType {
    Bool,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    /// UTF-8 string
    String,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 12] = [
        BuiltinType::Bool,
        BuiltinType::Float,
        BuiltinType::Double,
        BuiltinType::U8,
        BuiltinType::I8,
        BuiltinType::U16,
        BuiltinType::I16,
        BuiltinType::U32,
        BuiltinType::I32,
        BuiltinType::U64,
        BuiltinType::I64,
        BuiltinType::String,
    ];

    /// Rift spelling of the type.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Bool => "bool",
            BuiltinType::Float => "float",
            BuiltinType::Double => "double",
            BuiltinType::U8 => "u8",
            BuiltinType::I8 => "i8",
            BuiltinType::U16 => "u16",
            BuiltinType::I16 => "i16",
            BuiltinType::U32 => "u32",
            BuiltinType::I32 => "i32",
            BuiltinType::U64 => "u64",
            BuiltinType::I64 => "i64",
            BuiltinType::String => "String",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Marks an entity as a built-in type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CNativeType {
    pub kind: BuiltinType,
}

impl Component for CNativeType {}

/// Registry of the built-in type entities, stored as a unique.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NativeTypes {
    ids: [Id; BuiltinType::ALL.len()],
}

impl NativeTypes {
    /// Create the built-in type entities once per store.
    ///
    /// Calling this again returns the existing registry.
    pub fn register(ast: &mut AstStore) -> NativeTypes {
        if let Some(existing) = ast.try_unique::<NativeTypes>() {
            return *existing;
        }

        let mut ids = [Id::NONE; BuiltinType::ALL.len()];
        for kind in BuiltinType::ALL {
            let id = ast.create();
            ast.insert(id, CIdentifier::new(kind.name()));
            ast.insert(id, CNativeType { kind });
            ids[kind.index()] = id;
        }
        tracing::debug!(count = ids.len(), "registered native types");
        *ast.set_unique(NativeTypes { ids })
    }

    /// Registry of `ast`, if native types were registered.
    pub fn of(ast: &AstStore) -> Option<&NativeTypes> {
        ast.try_unique()
    }

    pub fn id(&self, kind: BuiltinType) -> Id {
        self.ids[kind.index()]
    }
}
