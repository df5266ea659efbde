//! C++ spellings of the built-in Rift types.

use rift_ast::{AstStore, BuiltinType, CNativeType, Component, Id, NativeTypes};

/// C++ spelling stamped on a native-type entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CCppNativeName {
    pub spelling: String,
}

impl Component for CCppNativeName {}

/// Spelling used when no registry or stamp is available.
const FALLBACK_BOOL: &str = "bool";

/// C++ spelling for a built-in type.
pub fn cpp_spelling(kind: BuiltinType) -> &'static str {
    match kind {
        BuiltinType::Bool => "bool",
        BuiltinType::Float => "float",
        BuiltinType::Double => "double",
        BuiltinType::U8 => "uint8_t",
        BuiltinType::I8 => "int8_t",
        BuiltinType::U16 => "uint16_t",
        BuiltinType::I16 => "int16_t",
        BuiltinType::U32 => "uint32_t",
        BuiltinType::I32 => "int32_t",
        BuiltinType::U64 => "uint64_t",
        BuiltinType::I64 => "int64_t",
        BuiltinType::String => "std::string",
    }
}

/// Stamp [`CCppNativeName`] on every native-type entity.
pub fn stamp_native_names(ast: &mut AstStore) {
    let natives: Vec<Id> = ast.query::<(CNativeType,)>().iter().collect();
    for id in natives {
        let kind = ast.get::<CNativeType>(id).kind;
        ast.insert(
            id,
            CCppNativeName {
                spelling: cpp_spelling(kind).to_string(),
            },
        );
    }
}

/// Spelling of the member placeholder type.
///
/// Members are not type-resolved yet, so every member is emitted with the
/// boolean spelling.
pub(crate) fn member_placeholder(ast: &AstStore) -> &str {
    NativeTypes::of(ast)
        .map(|natives| natives.id(BuiltinType::Bool))
        .filter(|&id| ast.is_valid(id))
        .and_then(|id| ast.try_get::<CCppNativeName>(id))
        .map_or(FALLBACK_BOOL, |name| name.spelling.as_str())
}
