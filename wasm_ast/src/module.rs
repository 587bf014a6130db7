use crate::expr::Expression;
use indexmap::IndexMap;

/// A compilation unit as handed over by the IR builder. Sub-modules are
/// full modules in their own right and end up embedded as named blobs in
/// the parent's binary.
#[derive(Debug, Default)]
pub struct Module {
    pub name: String,
    pub globals: Vec<VariableDeclaration>,
    pub imports: Vec<FunctionImport>,
    pub functions: Vec<FunctionDefinition>,
    pub sub_modules: IndexMap<String, Module>,
}

#[derive(Debug)]
pub struct VariableDeclaration {
    pub name: String,
}

/// An externally provided function. `internal_name` is the name the rest
/// of the module refers to it by; `module` and `external_name` identify it
/// on the host side.
#[derive(Debug)]
pub struct FunctionImport {
    pub module: String,
    pub external_name: String,
    pub internal_name: String,
    pub params: Vec<String>,
    pub returns: Option<String>,
}

#[derive(Debug)]
pub struct FunctionDefinition {
    pub name: String,
    pub parameters: Vec<String>,
    pub locals: Vec<VariableDeclaration>,
    pub returns: bool,
    pub body: Vec<Expression>,
}
