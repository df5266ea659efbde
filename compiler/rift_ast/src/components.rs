//! Language components.
//!
//! Roles are described by composition: a class is an entity holding
//! [`CType`] and [`CClassDecl`], a method is a [`CFunctionDecl`] whose parent
//! is a class, and so on. Hierarchy links live in [`crate::hierarchy`].

use std::path::PathBuf;

use crate::Component;

/// Kind of a top-level declared type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TypeCategory {
    #[default]
    Class,
    Struct,
    FunctionLibrary,
}

impl TypeCategory {
    pub fn name(self) -> &'static str {
        match self {
            TypeCategory::Class => "Class",
            TypeCategory::Struct => "Struct",
            TypeCategory::FunctionLibrary => "FunctionLibrary",
        }
    }

    /// Parse from the spelling used in asset files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Class" => Some(TypeCategory::Class),
            "Struct" => Some(TypeCategory::Struct),
            "FunctionLibrary" => Some(TypeCategory::FunctionLibrary),
            _ => None,
        }
    }
}

/// Marks an entity as a top-level declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CType {
    pub name: String,
    pub category: TypeCategory,
}

impl CType {
    pub fn new(name: impl Into<String>, category: TypeCategory) -> Self {
        CType {
            name: name.into(),
            category,
        }
    }
}

impl Component for CType {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CClassDecl;

impl Component for CClassDecl {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CStructDecl;

impl Component for CStructDecl {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CFunctionLibraryDecl;

impl Component for CFunctionLibraryDecl {}

/// Human-readable symbol of a type, function, variable, parameter or module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CIdentifier {
    pub name: String,
}

impl CIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        CIdentifier { name: name.into() }
    }
}

impl Component for CIdentifier {}

/// Build target produced for a module.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ModuleTarget {
    #[default]
    Executable,
    Shared,
    Static,
}

impl ModuleTarget {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Executable" => Some(ModuleTarget::Executable),
            "Shared" => Some(ModuleTarget::Shared),
            "Static" => Some(ModuleTarget::Static),
            _ => None,
        }
    }

    pub fn is_library(self) -> bool {
        !matches!(self, ModuleTarget::Executable)
    }
}

/// Marks an entity as a module root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CModule {
    pub target: ModuleTarget,
}

impl CModule {
    pub fn new(target: ModuleTarget) -> Self {
        CModule { target }
    }
}

impl Component for CModule {}

/// Backing file of a module or type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CFileRef {
    pub path: PathBuf,
}

impl CFileRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CFileRef { path: path.into() }
    }
}

impl Component for CFileRef {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CFunctionDecl;

impl Component for CFunctionDecl {}

/// Member variable of a type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CVariableDecl;

impl Component for CVariableDecl {}

/// Function parameter with its declared type spelling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CParameterDecl {
    pub type_name: String,
}

impl CParameterDecl {
    pub fn new(type_name: impl Into<String>) -> Self {
        CParameterDecl {
            type_name: type_name.into(),
        }
    }
}

impl Component for CParameterDecl {}
