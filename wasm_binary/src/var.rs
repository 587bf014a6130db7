use crate::errors::{EncodeError, Result, SymbolKind};
use indexmap::IndexMap;
use wasm_ast::{FunctionDefinition, Module};

/// Global name to index, in declaration order across the whole module.
pub(crate) struct GlobalMapper<'m> {
    ids: IndexMap<&'m str, u32>,
}

impl<'m> GlobalMapper<'m> {
    pub(crate) fn build(module: &'m Module) -> GlobalMapper<'m> {
        let mut ids = IndexMap::new();
        for global in &module.globals {
            let next_id = ids.len() as u32;
            ids.insert(global.name.as_str(), next_id);
        }
        GlobalMapper { ids }
    }

    pub(crate) fn get(&self, name: &str) -> Result<u32> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| EncodeError::undefined(SymbolKind::Global, name))
    }

    pub(crate) fn len(&self) -> u32 {
        self.ids.len() as u32
    }
}

/// Function name to index. Imports come first in declaration order, then
/// definitions; both live in one contiguous index space.
pub(crate) struct FuncMapper<'m> {
    ids: IndexMap<&'m str, u32>,
}

impl<'m> FuncMapper<'m> {
    pub(crate) fn build(module: &'m Module) -> FuncMapper<'m> {
        let mut ids = IndexMap::new();
        for import in &module.imports {
            let next_id = ids.len() as u32;
            ids.insert(import.internal_name.as_str(), next_id);
        }
        for func in &module.functions {
            let next_id = ids.len() as u32;
            ids.insert(func.name.as_str(), next_id);
        }
        FuncMapper { ids }
    }

    pub(crate) fn get(&self, name: &str) -> Result<u32> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| EncodeError::undefined(SymbolKind::Function, name))
    }
}

/// Local name to index within one function: parameters first, then declared
/// locals. Rebuilt for every function body.
pub(crate) struct LocalMapper<'m> {
    ids: IndexMap<&'m str, u32>,
}

impl<'m> LocalMapper<'m> {
    pub(crate) fn build(func: &'m FunctionDefinition) -> LocalMapper<'m> {
        let mut ids = IndexMap::new();
        for param in &func.parameters {
            let next_id = ids.len() as u32;
            ids.insert(param.as_str(), next_id);
        }
        for local in &func.locals {
            let next_id = ids.len() as u32;
            ids.insert(local.name.as_str(), next_id);
        }
        LocalMapper { ids }
    }

    pub(crate) fn get(&self, name: &str) -> Result<u32> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| EncodeError::undefined(SymbolKind::Local, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_ast::{FunctionImport, VariableDeclaration};

    fn import(name: &str) -> FunctionImport {
        FunctionImport {
            module: "env".to_string(),
            external_name: name.to_string(),
            internal_name: name.to_string(),
            params: Vec::new(),
            returns: None,
        }
    }

    fn definition(name: &str) -> FunctionDefinition {
        FunctionDefinition {
            name: name.to_string(),
            parameters: Vec::new(),
            locals: Vec::new(),
            returns: false,
            body: Vec::new(),
        }
    }

    #[test]
    fn imports_precede_definitions_in_one_index_space() {
        let module = Module {
            imports: vec![import("a"), import("b")],
            functions: vec![definition("c"), definition("d")],
            ..Default::default()
        };
        let funcs = FuncMapper::build(&module);

        assert_eq!(funcs.get("a").unwrap(), 0);
        assert_eq!(funcs.get("b").unwrap(), 1);
        assert_eq!(funcs.get("c").unwrap(), 2);
        assert_eq!(funcs.get("d").unwrap(), 3);
        assert_eq!(
            funcs.get("e").unwrap_err(),
            EncodeError::undefined(SymbolKind::Function, "e"),
        );
    }

    #[test]
    fn globals_follow_declaration_order() {
        let module = Module {
            globals: vec![
                VariableDeclaration {
                    name: "x".to_string(),
                },
                VariableDeclaration {
                    name: "y".to_string(),
                },
            ],
            ..Default::default()
        };
        let globals = GlobalMapper::build(&module);

        assert_eq!(globals.len(), 2);
        assert_eq!(globals.get("x").unwrap(), 0);
        assert_eq!(globals.get("y").unwrap(), 1);
        assert_eq!(
            globals.get("z").unwrap_err(),
            EncodeError::undefined(SymbolKind::Global, "z"),
        );
    }

    #[test]
    fn parameters_precede_declared_locals() {
        let func = FunctionDefinition {
            name: "f".to_string(),
            parameters: vec!["p0".to_string(), "p1".to_string()],
            locals: vec![
                VariableDeclaration {
                    name: "v0".to_string(),
                },
                VariableDeclaration {
                    name: "v1".to_string(),
                },
            ],
            returns: false,
            body: Vec::new(),
        };
        let locals = LocalMapper::build(&func);

        assert_eq!(locals.get("p0").unwrap(), 0);
        assert_eq!(locals.get("p1").unwrap(), 1);
        assert_eq!(locals.get("v0").unwrap(), 2);
        assert_eq!(locals.get("v1").unwrap(), 3);
        assert_eq!(
            locals.get("missing").unwrap_err(),
            EncodeError::undefined(SymbolKind::Local, "missing"),
        );
    }
}
