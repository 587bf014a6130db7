use crate::builtin;
use crate::errors::{EncodeError, Result};
use crate::expr;
use crate::leb128::{encode_signed, encode_unsigned, prefix_size};
use crate::ty::{TypeManager, ValType};
use crate::var::{FuncMapper, GlobalMapper};
use std::collections::HashMap;
use wasm_ast::Module;

const MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6d];
const VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

const SECTION_CUSTOM: u8 = 0x00;
const SECTION_TYPE: u8 = 0x01;
const SECTION_IMPORT: u8 = 0x02;
const SECTION_FUNCTION: u8 = 0x03;
const SECTION_MEMORY: u8 = 0x05;
const SECTION_GLOBAL: u8 = 0x06;
const SECTION_EXPORT: u8 = 0x07;
const SECTION_CODE: u8 = 0x0a;

const IMPORT_FUNC: u8 = 0x00;
const EXPORT_FUNC: u8 = 0x00;
const EXPORT_MEMORY: u8 = 0x02;

const GLOBAL_MUT: u8 = 0x01;

/// Encodes `module` into a complete wasm binary. The sole entry point; on
/// any error the produced bytes must be discarded.
pub fn encode(module: &Module) -> std::result::Result<Vec<u8>, EncodeError> {
    ModuleEncoder::build(module)?.run(module)
}

/// Drives one module encoding: the name and type tables are built in a
/// pre-pass, then each section is produced and appended in its fixed
/// order. Sub-modules recurse through `encode` with fresh state.
struct ModuleEncoder<'m> {
    globals: GlobalMapper<'m>,
    funcs: FuncMapper<'m>,
    types: TypeManager<'m>,
    sub_modules: HashMap<&'m str, (usize, usize)>,
}

impl<'m> ModuleEncoder<'m> {
    fn build(module: &'m Module) -> Result<ModuleEncoder<'m>> {
        Ok(ModuleEncoder {
            globals: GlobalMapper::build(module),
            funcs: FuncMapper::build(module),
            types: TypeManager::build(module)?,
            sub_modules: HashMap::new(),
        })
    }

    fn run(mut self, module: &'m Module) -> Result<Vec<u8>> {
        let mut out = Vec::from(MAGIC);
        out.extend(VERSION);
        out.extend(section(SECTION_TYPE, self.types.section_payload()));
        out.extend(self.import_section(module)?);
        out.extend(self.function_section(module)?);
        out.extend(memory_section());
        out.extend(self.global_section());
        out.extend(self.export_section()?);
        for (name, sub) in &module.sub_modules {
            // The placement of these custom sections between the export and
            // code sections is relied upon by downstream tooling; the
            // recorded offset points at the sub-module's own header.
            let data = encode(sub)?;
            let length = data.len();
            out.extend(custom_section(name, data));
            self.sub_modules.insert(name, (out.len() - length, length));
        }
        out.extend(self.code_section(module)?);
        Ok(out)
    }

    fn import_section(&self, module: &Module) -> Result<Vec<u8>> {
        let mut payload = encode_unsigned(module.imports.len() as u64);
        for import in &module.imports {
            payload.extend(encode_name(&import.module));
            payload.extend(encode_name(&import.external_name));
            payload.push(IMPORT_FUNC);
            payload.extend(encode_unsigned(u64::from(
                self.types.type_of(&import.internal_name)?,
            )));
        }
        Ok(section(SECTION_IMPORT, payload))
    }

    fn function_section(&self, module: &Module) -> Result<Vec<u8>> {
        let mut payload = encode_unsigned(module.functions.len() as u64);
        for func in &module.functions {
            payload.extend(encode_unsigned(u64::from(self.types.type_of(&func.name)?)));
        }
        Ok(section(SECTION_FUNCTION, payload))
    }

    fn global_section(&self) -> Vec<u8> {
        let mut payload = encode_unsigned(u64::from(self.globals.len()));
        for _ in 0..self.globals.len() {
            // Every global is a mutable i64 initialized to zero.
            payload.push(ValType::I64.byte());
            payload.push(GLOBAL_MUT);
            payload.push(builtin::I64_CONST);
            payload.extend(encode_signed(0));
            payload.push(builtin::END);
        }
        section(SECTION_GLOBAL, payload)
    }

    fn export_section(&self) -> Result<Vec<u8>> {
        let mut payload = encode_unsigned(2);
        payload.extend(encode_name("memory"));
        payload.push(EXPORT_MEMORY);
        payload.extend(encode_unsigned(0));
        payload.extend(encode_name("main"));
        payload.push(EXPORT_FUNC);
        payload.extend(encode_unsigned(u64::from(self.funcs.get("main")?)));
        Ok(section(SECTION_EXPORT, payload))
    }

    fn code_section(&self, module: &'m Module) -> Result<Vec<u8>> {
        let mut payload = encode_unsigned(module.functions.len() as u64);
        for func in &module.functions {
            payload.extend(expr::encode_function(
                func,
                &self.globals,
                &self.funcs,
                &self.sub_modules,
            )?);
        }
        Ok(section(SECTION_CODE, payload))
    }
}

fn memory_section() -> Vec<u8> {
    let mut payload = encode_unsigned(1);
    payload.push(0x00); // no maximum
    payload.push(0x01); // initial size, one page
    section(SECTION_MEMORY, payload)
}

fn custom_section(name: &str, data: Vec<u8>) -> Vec<u8> {
    let mut payload = encode_name(name);
    payload.extend(data);
    section(SECTION_CUSTOM, payload)
}

fn section(id: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut out = vec![id];
    out.extend(prefix_size(payload));
    out
}

fn encode_name(name: &str) -> Vec<u8> {
    let mut out = encode_unsigned(name.len() as u64);
    out.extend(name.as_bytes());
    out
}
