//! Per-parameter C++ text fragments.
//!
//! Every parameter gets a `<Type> <Name>` fragment ahead of emission. Function
//! signatures do not splice these in yet; they are emitted without parameters.

use rift_ast::{AstStore, CIdentifier, CParameterDecl, Component, Id};

/// Generated C++ text for one AST node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CCppCodeGenFragment {
    pub code: String,
}

impl Component for CCppCodeGenFragment {}

/// Compute the fragment of every named parameter.
pub fn generate_parameter_fragments(ast: &mut AstStore) {
    let parameters: Vec<Id> = ast
        .query::<(CParameterDecl, CIdentifier)>()
        .iter()
        .collect();
    for id in parameters {
        let code = format!(
            "{} {}",
            ast.get::<CParameterDecl>(id).type_name,
            ast.get::<CIdentifier>(id).name
        );
        ast.insert(id, CCppCodeGenFragment { code });
    }
}
