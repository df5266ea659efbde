use std::path::PathBuf;

use pretty_assertions::assert_eq;

use super::*;
use crate::components::ModuleTarget;

fn module(ast: &mut AstStore, file: &str) -> Id {
    let id = ast.create();
    ast.insert(id, CModule::new(ModuleTarget::Executable));
    ast.insert(id, CFileRef::new(file));
    id
}

#[test]
fn path_is_parent_of_module_file() {
    let mut ast = AstStore::new();
    let app = module(&mut ast, "/projects/App/Module.rift");
    assert_eq!(module_path(&ast, app), PathBuf::from("/projects/App"));
}

#[test]
fn path_is_empty_without_file() {
    let mut ast = AstStore::new();
    let id = ast.create();
    ast.insert(id, CModule::default());
    assert_eq!(module_path(&ast, id), PathBuf::new());
    assert_eq!(module_name(&ast, id), "");
}

#[test]
fn name_prefers_identifier() {
    let mut ast = AstStore::new();
    let app = module(&mut ast, "/projects/app_folder/Module.rift");
    assert_eq!(module_name(&ast, app), "app_folder");

    ast.insert(app, CIdentifier::new("App"));
    assert_eq!(module_name(&ast, app), "App");
}

#[test]
fn empty_identifier_falls_back_to_folder() {
    let mut ast = AstStore::new();
    let app = module(&mut ast, "/projects/Game/Module.rift");
    ast.insert(app, CIdentifier::new(""));
    assert_eq!(module_name(&ast, app), "Game");
}

#[test]
fn all_modules_in_query_order() {
    let mut ast = AstStore::new();
    let a = module(&mut ast, "/p/A/Module.rift");
    let _type = ast.create();
    let b = module(&mut ast, "/p/A/B/Module.rift");
    assert_eq!(all_modules(&ast), vec![a, b]);
}

#[test]
fn folder_containment_encloses_modules() {
    let mut ast = AstStore::new();
    let nested = module(&mut ast, "/p/App/Libs/Core/Module.rift");
    let app = module(&mut ast, "/p/App/Module.rift");
    let libs = module(&mut ast, "/p/App/Libs/Module.rift");
    let sibling = module(&mut ast, "/p/AppOther/Module.rift");

    assert_eq!(enclosing_module(&ast, nested), Some(libs));
    assert_eq!(enclosing_module(&ast, libs), Some(app));
    assert_eq!(enclosing_module(&ast, app), None);
    // Component-wise containment: "AppOther" is not inside "App".
    assert_eq!(enclosing_module(&ast, sibling), None);
}

#[test]
fn hierarchy_parent_encloses_before_folders() {
    let mut ast = AstStore::new();
    let app = module(&mut ast, "/p/App/Module.rift");
    let plugin = module(&mut ast, "/elsewhere/Plugin/Module.rift");
    hierarchy::add_child(&mut ast, app, plugin);

    assert_eq!(enclosing_module(&ast, plugin), Some(app));
    assert_eq!(project_module(&ast), Some(app));
}

#[test]
fn project_is_the_unenclosed_module() {
    let mut ast = AstStore::new();
    let lib = module(&mut ast, "/p/App/Libs/Core/Module.rift");
    let app = module(&mut ast, "/p/App/Module.rift");
    ast.insert(app, CIdentifier::new("App"));

    assert_eq!(project_module(&ast), Some(app));
    assert_eq!(project_name(&ast), "App");
    assert!(is_project(&ast, app));
    assert!(!is_project(&ast, lib));
}

#[test]
fn first_root_wins_when_several_exist() {
    let mut ast = AstStore::new();
    let first = module(&mut ast, "/p/One/Module.rift");
    let _second = module(&mut ast, "/p/Two/Module.rift");
    assert_eq!(project_module(&ast), Some(first));
}

#[test]
fn no_modules_means_no_project() {
    let ast = AstStore::new();
    assert_eq!(project_module(&ast), None);
    assert_eq!(project_name(&ast), "");
}
