use crate::errors::{EncodeError, Result, SymbolKind};
use crate::leb128::encode_unsigned;
use indexmap::IndexMap;
use std::collections::HashMap;
use wasm_ast::{FunctionDefinition, FunctionImport, Module};

/// Block type tag for structured instructions that leave nothing on the
/// stack.
pub(crate) const VOID: u8 = 0x40;

const FUNC_TYPE: u8 = 0x60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ValType {
    I32,
    I64,
}

impl ValType {
    pub(crate) fn byte(self) -> u8 {
        match self {
            ValType::I32 => 0x7f,
            ValType::I64 => 0x7e,
        }
    }

    fn from_name(name: &str) -> Result<ValType> {
        match name {
            "i32" => Ok(ValType::I32),
            "i64" => Ok(ValType::I64),
            _ => Err(EncodeError::Assertion(format!(
                "unknown value type named {name}"
            ))),
        }
    }
}

/// A function signature, used as the deduplication key of the type table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct FuncType {
    parameters: Vec<ValType>,
    returns: Vec<ValType>,
}

impl FuncType {
    fn of_import(import: &FunctionImport) -> Result<FuncType> {
        let parameters = import
            .params
            .iter()
            .map(|name| ValType::from_name(name))
            .collect::<Result<_>>()?;
        let returns = import
            .returns
            .iter()
            .map(|name| ValType::from_name(name))
            .collect::<Result<_>>()?;
        Ok(FuncType {
            parameters,
            returns,
        })
    }

    // Parameter types are not tracked for definitions; every parameter and
    // return slot is the one supported scalar type.
    fn of_definition(func: &FunctionDefinition) -> FuncType {
        FuncType {
            parameters: vec![ValType::I64; func.parameters.len()],
            returns: vec![ValType::I64; usize::from(func.returns)],
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.push(FUNC_TYPE);
        out.extend(encode_unsigned(self.parameters.len() as u64));
        out.extend(self.parameters.iter().map(|ty| ty.byte()));
        out.extend(encode_unsigned(self.returns.len() as u64));
        out.extend(self.returns.iter().map(|ty| ty.byte()));
    }
}

/// Deduplicates signatures into the type table and records the type index
/// assigned to each import and definition. Interning order is first seen.
#[derive(Debug)]
pub(crate) struct TypeManager<'m> {
    func_types: IndexMap<FuncType, u32>,
    ids: HashMap<&'m str, u32>,
}

impl<'m> TypeManager<'m> {
    pub(crate) fn build(module: &'m Module) -> Result<TypeManager<'m>> {
        let mut s = TypeManager {
            func_types: IndexMap::new(),
            ids: HashMap::new(),
        };
        for import in &module.imports {
            let id = s.intern(FuncType::of_import(import)?);
            s.ids.insert(&import.internal_name, id);
        }
        for func in &module.functions {
            let id = s.intern(FuncType::of_definition(func));
            s.ids.insert(&func.name, id);
        }
        Ok(s)
    }

    fn intern(&mut self, func_type: FuncType) -> u32 {
        let next_id = self.func_types.len() as u32;
        *self.func_types.entry(func_type).or_insert(next_id)
    }

    pub(crate) fn type_of(&self, func_name: &str) -> Result<u32> {
        self.ids
            .get(func_name)
            .copied()
            .ok_or_else(|| EncodeError::undefined(SymbolKind::Function, func_name))
    }

    /// Type section payload: entry count, then each deduplicated signature.
    pub(crate) fn section_payload(&self) -> Vec<u8> {
        let mut out = encode_unsigned(self.func_types.len() as u64);
        for func_type in self.func_types.keys() {
            func_type.encode(&mut out);
        }
        out
    }
}
