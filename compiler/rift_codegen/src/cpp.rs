//! C++ lowering of Rift modules.
//!
//! Per module the header lays out, in this order: the pragma marker, native
//! includes, forward declarations, declarations, function declarations and
//! function definitions. Structs always come before classes, and each group
//! follows the store's query order.
//!
//! Functions are found at most two levels below the module (module, type,
//! function). A function whose parent is a class becomes an explicit-self free
//! function `void <Owner>_<Name>(<Owner>& self)`; every other function becomes
//! `void <Name>()`. Definitions are `inline` with an empty body so the header
//! can be included from several translation units.

use std::fmt;
use std::path::Path;

use rift_ast::{
    hierarchy, module, AstStore, CClassDecl, CFunctionDecl, CIdentifier, CStructDecl, CType,
    CVariableDecl, Component, Id,
};
use rift_diagnostic::CompileContext;

use crate::native::member_placeholder;
use crate::writer::CodeWriter;
use crate::{generate_parameter_fragments, save_text, stamp_native_names};

/// Depth of functions below their module: module, type, function.
const FUNCTION_DEPTH: usize = 2;

/// Generated text of one module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModuleCode {
    /// Contents of `Include/code.h`.
    pub header: String,
    /// Contents of `Src/code.cpp`.
    pub source: String,
}

impl ModuleCode {
    /// Lower `module`. Only the project module gets an entry point.
    pub fn emit(ast: &AstStore, module: Id, is_project: bool) -> Self {
        ModuleCode {
            header: emit_header(ast, module),
            source: emit_source(is_project),
        }
    }
}

/// Generate code for every module into the configured `Code` folder.
pub fn generate_code(ast: &mut AstStore, context: &mut CompileContext) {
    stamp_native_names(ast);
    generate_parameter_fragments(ast);

    let code_path = context.config().code_path();
    let project = module::project_module(ast);
    for id in module::all_modules(ast) {
        generate_module_code(ast, context, id, &code_path, project == Some(id));
    }
}

/// Write the header and source of one module under `code_path/<ModuleName>`.
///
/// A failed write is recorded on `context`; it never stops the other file.
pub fn generate_module_code(
    ast: &AstStore,
    context: &mut CompileContext,
    module: Id,
    code_path: &Path,
    is_project: bool,
) {
    let name = module::module_name(ast, module);
    tracing::debug!(module = %name, is_project, "generating C++ code");

    let module_path = code_path.join(&name);
    let code = ModuleCode::emit(ast, module, is_project);

    let header_file = module_path.join("Include").join("code.h");
    if let Err(error) = save_text(&header_file, &code.header) {
        context.add_error(format!(
            "Couldn't save generated header at '{}': {error}",
            header_file.display()
        ));
    }

    let source_file = module_path.join("Src").join("code.cpp");
    if let Err(error) = save_text(&source_file, &code.source) {
        context.add_error(format!(
            "Couldn't save generated source at '{}': {error}",
            source_file.display()
        ));
    }
}

/// Immediate children of `module` holding `Tag` and [`CType`], in query order.
fn module_types<Tag: Component>(ast: &AstStore, module: Id) -> Vec<Id> {
    ast.query::<(Tag, CType)>()
        .iter()
        .filter(|&id| hierarchy::parent(ast, id) == Some(module))
        .collect()
}

/// Named functions within [`FUNCTION_DEPTH`] levels of `module`.
fn module_functions(ast: &AstStore, module: Id) -> Vec<Id> {
    let mut functions = hierarchy::descendants(ast, module, FUNCTION_DEPTH);
    ast.query::<(CIdentifier, CFunctionDecl)>()
        .retain(&mut functions);
    functions
}

/// `void` signature of a generated function.
struct Signature<'a> {
    name: &'a str,
    owner: Option<&'a str>,
}

impl<'a> Signature<'a> {
    fn of(ast: &'a AstStore, function: Id) -> Self {
        let classes = ast.query::<(CType, CClassDecl)>();
        let owner = hierarchy::parent(ast, function)
            .and_then(|parent| classes.try_get::<CType>(parent))
            .map(|ty| ty.name.as_str());
        Signature {
            name: &ast.get::<CIdentifier>(function).name,
            owner,
        }
    }
}

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "void {owner}_{}({owner}& self)", self.name),
            None => write!(f, "void {}()", self.name),
        }
    }
}

fn emit_header(ast: &AstStore, module: Id) -> String {
    let mut w = CodeWriter::new();
    w.writeln("#pragma once");
    w.newline();
    w.include("stdint.h");

    let structs = module_types::<CStructDecl>(ast, module);
    let classes = module_types::<CClassDecl>(ast, module);

    w.newline();
    w.comment("Forward declarations");
    for &id in structs.iter().chain(&classes) {
        w.writeln(&format!("struct {};", ast.get::<CType>(id).name));
    }

    w.newline();
    w.comment("Declarations");
    for &id in structs.iter().chain(&classes) {
        declare_type(&mut w, ast, id);
    }

    let functions = module_functions(ast, module);

    w.newline();
    w.comment("Function Declarations");
    for &id in &functions {
        w.writeln(&format!("{};", Signature::of(ast, id)));
    }

    w.newline();
    w.comment("Function Definitions");
    for &id in &functions {
        w.writeln(&format!("inline {}", Signature::of(ast, id)));
        w.writeln("{");
        w.writeln("}");
    }

    w.take_output()
}

/// Full declaration of a type with its member variables.
///
/// Member types are not resolved yet: every member uses the boolean
/// placeholder initialized to `false`.
fn declare_type(w: &mut CodeWriter, ast: &AstStore, ty: Id) {
    let placeholder = member_placeholder(ast);
    let variables = ast.query::<(CIdentifier, CVariableDecl)>();

    w.writeln(&format!("struct {}", ast.get::<CType>(ty).name));
    w.writeln("{");
    w.indent();
    for &child in hierarchy::children(ast, ty) {
        if let Some(identifier) = variables.try_get::<CIdentifier>(child) {
            w.writeln(&format!("{placeholder} {} {{ false }};", identifier.name));
        }
    }
    w.dedent();
    w.writeln("};");
}

fn emit_source(is_project: bool) -> String {
    let mut w = CodeWriter::new();
    w.include("code.h");
    if is_project {
        w.newline();
        w.writeln("int main() { return 0; }");
    }
    w.take_output()
}
