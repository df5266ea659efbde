//! Loading a Rift project from disk.
//!
//! A project is a folder holding a `Module.rift` file. Every nested folder
//! with its own `Module.rift` is a sub-module, and every `*.rf` file is a type
//! owned by the closest module folder above it.
//!
//! Module files are JSON objects with optional `name` and `target` keys:
//!
//! ```text
//! { "name": "Game", "target": "Executable" }
//! ```
//!
//! Type files name their category and may list members and functions:
//!
//! ```text
//! {
//!     "type": "Class",
//!     "name": "Player",
//!     "variables": [{ "name": "alive" }],
//!     "functions": [{ "name": "Jump", "parameters": [{ "name": "height", "type": "float" }] }]
//! }
//! ```

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rift_ast::{
    hierarchy, AstStore, CClassDecl, CFileRef, CFunctionDecl, CFunctionLibraryDecl, CIdentifier,
    CModule, CParameterDecl, CStructDecl, CType, CVariableDecl, Id, ModuleTarget, NativeTypes,
    TypeCategory,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

/// File marking a module folder.
pub const MODULE_FILE: &str = "Module.rift";

/// Extension of type files.
pub const TYPE_EXTENSION: &str = "rf";

#[derive(Debug, Error)]
pub enum ProjectLoadError {
    #[error("no '{}' found at '{}'", MODULE_FILE, .path.display())]
    NotAProject { path: PathBuf },

    #[error("couldn't read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't scan '{}': {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid JSON in '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown type category '{category}' in '{}'", .path.display())]
    UnknownCategory { path: PathBuf, category: String },

    #[error("unknown module target '{target}' in '{}'", .path.display())]
    UnknownTarget { path: PathBuf, target: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModuleFile {
    name: Option<String>,
    target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TypeFile {
    #[serde(rename = "type")]
    category: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    variables: Vec<VariableEntry>,
    #[serde(default)]
    functions: Vec<FunctionEntry>,
}

#[derive(Debug, Deserialize)]
struct VariableEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FunctionEntry {
    name: String,
    #[serde(default)]
    parameters: Vec<ParameterEntry>,
}

#[derive(Debug, Deserialize)]
struct ParameterEntry {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
}

/// Attach the declaration tag matching a type's category.
///
/// A replaced `CType` may change category, so stale tags are dropped first.
fn tag_type_category(ast: &mut AstStore, id: Id) {
    ast.remove::<CClassDecl>(id);
    ast.remove::<CStructDecl>(id);
    ast.remove::<CFunctionLibraryDecl>(id);
    match ast.get::<CType>(id).category {
        TypeCategory::Class => {
            ast.insert(id, CClassDecl);
        }
        TypeCategory::Struct => {
            ast.insert(id, CStructDecl);
        }
        TypeCategory::FunctionLibrary => {
            ast.insert(id, CFunctionLibraryDecl);
        }
    }
}

/// Open the project at `path`, which is either a `Module.rift` file or its folder.
pub fn open_project(path: &Path) -> Result<AstStore, ProjectLoadError> {
    let module_file = if path.is_dir() {
        path.join(MODULE_FILE)
    } else {
        path.to_path_buf()
    };
    if !module_file.is_file() || module_file.file_name() != Some(OsStr::new(MODULE_FILE)) {
        return Err(ProjectLoadError::NotAProject {
            path: path.to_path_buf(),
        });
    }
    let root = module_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut ast = AstStore::new();
    NativeTypes::register(&mut ast);
    ast.on_insert::<CType>(tag_type_category);

    let project = load_module(&mut ast, &module_file)?;
    let mut modules = vec![(root.clone(), project)];

    let (mut module_files, type_files) = scan(&root, &module_file)?;
    // Parents before children so every module can be linked on creation.
    module_files.sort_by_key(|file| file.components().count());
    for file in module_files {
        let folder = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let owner = closest_module(&modules, &folder);
        let id = load_module(&mut ast, &file)?;
        hierarchy::add_child(&mut ast, owner, id);
        modules.push((folder, id));
    }

    let mut type_count = 0;
    for file in type_files {
        let folder = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let owner = closest_module(&modules, &folder);
        let id = load_type(&mut ast, &file)?;
        hierarchy::add_child(&mut ast, owner, id);
        type_count += 1;
    }

    tracing::info!(
        project = %rift_ast::module::project_name(&ast),
        modules = modules.len(),
        types = type_count,
        "opened project"
    );
    Ok(ast)
}

/// Module and type files below `root`, in file-name order, excluding `project_file`.
fn scan(
    root: &Path,
    project_file: &Path,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>), ProjectLoadError> {
    let mut module_files = Vec::new();
    let mut type_files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ProjectLoadError::Scan {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path == project_file {
            continue;
        }
        if entry.file_name() == MODULE_FILE {
            module_files.push(path.to_path_buf());
        } else if path.extension().is_some_and(|ext| ext == TYPE_EXTENSION) {
            type_files.push(path.to_path_buf());
        }
    }
    Ok((module_files, type_files))
}

/// Module whose folder is the deepest one containing `folder`.
fn closest_module(modules: &[(PathBuf, Id)], folder: &Path) -> Id {
    modules
        .iter()
        .filter(|(module_folder, _)| folder.starts_with(module_folder))
        .max_by_key(|(module_folder, _)| module_folder.components().count())
        .map_or(modules[0].1, |(_, id)| *id)
}

fn read(path: &Path) -> Result<String, ProjectLoadError> {
    fs::read_to_string(path).map_err(|source| ProjectLoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T, ProjectLoadError> {
    serde_json::from_str(text).map_err(|source| ProjectLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_module(ast: &mut AstStore, file: &Path) -> Result<Id, ProjectLoadError> {
    let text = read(file)?;
    let descriptor: ModuleFile = if text.trim().is_empty() {
        ModuleFile::default()
    } else {
        parse(file, &text)?
    };

    let target = match descriptor.target {
        Some(target) => {
            ModuleTarget::from_name(&target).ok_or_else(|| ProjectLoadError::UnknownTarget {
                path: file.to_path_buf(),
                target,
            })?
        }
        None => ModuleTarget::default(),
    };

    let id = ast.create();
    ast.insert(id, CModule::new(target));
    ast.insert(id, CFileRef::new(file));
    if let Some(name) = descriptor.name.filter(|name| !name.is_empty()) {
        ast.insert(id, CIdentifier::new(name));
    }
    Ok(id)
}

fn load_type(ast: &mut AstStore, file: &Path) -> Result<Id, ProjectLoadError> {
    let descriptor: TypeFile = parse(file, &read(file)?)?;
    let category = TypeCategory::from_name(&descriptor.category).ok_or_else(|| {
        ProjectLoadError::UnknownCategory {
            path: file.to_path_buf(),
            category: descriptor.category.clone(),
        }
    })?;
    let name = descriptor.name.filter(|name| !name.is_empty()).unwrap_or_else(|| {
        file.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let id = ast.create();
    ast.insert(id, CFileRef::new(file));
    ast.insert(id, CIdentifier::new(name.clone()));
    ast.insert(id, CType::new(name, category));

    for variable in descriptor.variables {
        let member = ast.create();
        ast.insert(member, CIdentifier::new(variable.name));
        ast.insert(member, CVariableDecl);
        hierarchy::add_child(ast, id, member);
    }

    for function in descriptor.functions {
        let function_id = ast.create();
        ast.insert(function_id, CIdentifier::new(function.name));
        ast.insert(function_id, CFunctionDecl);
        hierarchy::add_child(ast, id, function_id);

        for parameter in function.parameters {
            let parameter_id = ast.create();
            ast.insert(parameter_id, CIdentifier::new(parameter.name));
            ast.insert(parameter_id, CParameterDecl::new(parameter.type_name));
            hierarchy::add_child(ast, function_id, parameter_id);
        }
    }
    Ok(id)
}
