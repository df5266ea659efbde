//! Module resolution.
//!
//! Every entity holding [`CModule`] is a compilation unit backed by the folder
//! that contains its [`CFileRef`]. Exactly one module, the one with no
//! enclosing module, is the project.

use std::path::{Path, PathBuf};

use crate::components::{CFileRef, CIdentifier, CModule};
use crate::{hierarchy, AstStore, Id};

/// Every module in query order.
pub fn all_modules(ast: &AstStore) -> Vec<Id> {
    ast.query::<(CModule,)>().iter().collect()
}

/// Folder backing a module. Empty when the module has no file.
pub fn module_path(ast: &AstStore, id: Id) -> PathBuf {
    ast.try_get::<CFileRef>(id)
        .and_then(|file| file.path.parent())
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Display name of a module.
///
/// Uses the module's own identifier when it has a non-empty one, otherwise the
/// name of its folder.
pub fn module_name(ast: &AstStore, id: Id) -> String {
    if let Some(identifier) = ast.try_get::<CIdentifier>(id) {
        if !identifier.name.is_empty() {
            return identifier.name.clone();
        }
    }

    module_path(ast, id)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Module directly enclosing `id`.
///
/// A module linked below another module in the hierarchy is enclosed by it.
/// Otherwise the enclosing module is the one whose folder most closely
/// contains this module's folder.
pub fn enclosing_module(ast: &AstStore, id: Id) -> Option<Id> {
    if let Some(ancestor) =
        hierarchy::find_ancestor(ast, id, |ast, ancestor| ast.has::<CModule>(ancestor))
    {
        return Some(ancestor);
    }

    let path = module_path(ast, id);
    if path.as_os_str().is_empty() {
        return None;
    }

    all_modules(ast)
        .into_iter()
        .filter(|&other| other != id)
        .map(|other| (other, module_path(ast, other)))
        .filter(|(_, other_path)| {
            !other_path.as_os_str().is_empty() && path != *other_path && path.starts_with(other_path)
        })
        .max_by_key(|(_, other_path)| other_path.components().count())
        .map(|(other, _)| other)
}

/// The project module: the first module, in query order, with no enclosing module.
pub fn project_module(ast: &AstStore) -> Option<Id> {
    let mut roots = all_modules(ast)
        .into_iter()
        .filter(|&id| enclosing_module(ast, id).is_none());
    let project = roots.next()?;

    let extra: Vec<String> = roots.map(|id| module_name(ast, id)).collect();
    if !extra.is_empty() {
        tracing::warn!(
            project = %module_name(ast, project),
            ignored = ?extra,
            "several root modules found, using the first as project"
        );
    }
    Some(project)
}

/// Name of the project module. Empty when there is no project.
pub fn project_name(ast: &AstStore) -> String {
    project_module(ast)
        .map(|id| module_name(ast, id))
        .unwrap_or_default()
}

pub fn is_project(ast: &AstStore, id: Id) -> bool {
    project_module(ast) == Some(id)
}

#[cfg(test)]
mod tests;
