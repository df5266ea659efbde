//! CMake build descriptors for the generated code.
//!
//! The `Code` folder gets a root `CMakeLists.txt` naming the project and one
//! subdirectory per module. Each module folder gets its own descriptor with
//! exactly one target: an executable, or a shared or static library, following
//! the module's [`ModuleTarget`].
//!
//! Targets place their output in `<build>/<Module>/<Config>` for every
//! generator, which is where artifacts are copied from after the build.

use std::path::Path;

use rift_ast::{module, AstStore, CModule, Id, ModuleTarget};
use rift_diagnostic::CompileContext;
use rustc_hash::FxHashSet;

use crate::save_text;
use crate::writer::CodeWriter;

/// File name CMake looks for in every source folder.
pub const DESCRIPTOR_FILE: &str = "CMakeLists.txt";

const CMAKE_MINIMUM_VERSION: &str = "3.12";
const PROJECT_VERSION: &str = "0.1";
const CXX_STANDARD: &str = "20";

/// Write the root and per-module descriptors into the configured `Code` folder.
///
/// Fails, recording diagnostics and writing nothing, when there is no project
/// module or two modules share a name.
pub fn generate_cmake(ast: &AstStore, context: &mut CompileContext) {
    let Some(project) = module::project_module(ast) else {
        context.add_error("No project module to generate build files for");
        return;
    };

    let modules: Vec<(Id, String)> = module::all_modules(ast)
        .into_iter()
        .map(|id| (id, module::module_name(ast, id)))
        .collect();
    if !check_module_names(&modules, context) {
        return;
    }

    let code_path = context.config().code_path();
    let names: Vec<&str> = modules.iter().map(|(_, name)| name.as_str()).collect();
    let root = emit_root_descriptor(&module::module_name(ast, project), &names);
    save_descriptor(&code_path.join(DESCRIPTOR_FILE), &root, context);

    for (id, name) in &modules {
        let target = ast.get::<CModule>(*id).target;
        tracing::debug!(module = %name, ?target, "generating CMake target");
        let descriptor = emit_module_descriptor(name, target);
        save_descriptor(&code_path.join(name).join(DESCRIPTOR_FILE), &descriptor, context);
    }
}

/// Every module needs a distinct, non-empty name to get its own folder and target.
fn check_module_names(modules: &[(Id, String)], context: &mut CompileContext) -> bool {
    let mut seen = FxHashSet::default();
    let mut valid = true;
    for (id, name) in modules {
        if name.is_empty() {
            context.add_error(format!("Module {id} has no name"));
            valid = false;
        } else if !seen.insert(name.as_str()) {
            context.add_error(format!("Duplicate module name '{name}'"));
            valid = false;
        }
    }
    valid
}

fn save_descriptor(path: &Path, text: &str, context: &mut CompileContext) {
    if let Err(error) = save_text(path, text) {
        context.add_error(format!(
            "Couldn't save build descriptor at '{}': {error}",
            path.display()
        ));
    }
}

/// Root descriptor: project declaration plus one subdirectory per module.
pub fn emit_root_descriptor(project_name: &str, modules: &[&str]) -> String {
    let mut w = CodeWriter::new();
    w.writeln(&format!(
        "cmake_minimum_required (VERSION {CMAKE_MINIMUM_VERSION})"
    ));
    w.writeln(&format!(
        "project({project_name} VERSION {PROJECT_VERSION} LANGUAGES CXX)"
    ));
    w.newline();
    for name in modules {
        w.writeln(&format!("add_subdirectory({name})"));
    }
    w.take_output()
}

/// Module descriptor with a single target named after the module.
pub fn emit_module_descriptor(name: &str, target: ModuleTarget) -> String {
    let mut w = CodeWriter::new();
    match target {
        ModuleTarget::Executable => w.writeln(&format!("add_executable({name})")),
        ModuleTarget::Shared => w.writeln(&format!("add_library({name} SHARED)")),
        ModuleTarget::Static => w.writeln(&format!("add_library({name} STATIC)")),
    }
    w.writeln(&format!(
        "set_target_properties ({name} PROPERTIES CXX_STANDARD {CXX_STANDARD})"
    ));
    w.writeln(&format!("set_target_properties ({name} PROPERTIES"));
    w.indent();
    for kind in ["RUNTIME", "LIBRARY", "ARCHIVE"] {
        w.writeln(&format!(
            "{kind}_OUTPUT_DIRECTORY ${{CMAKE_CURRENT_BINARY_DIR}}/$<CONFIG>"
        ));
    }
    w.dedent();
    w.writeln(")");
    w.writeln(&format!("target_include_directories({name} PUBLIC Include)"));
    w.writeln(&format!("target_sources({name} PRIVATE Src/code.cpp)"));
    w.take_output()
}
