mod expr;
mod module;

pub use expr::Expression;
pub use module::{FunctionDefinition, FunctionImport, Module, VariableDeclaration};
