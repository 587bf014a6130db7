use crate::builtin;
use crate::errors::{EncodeError, Result, SymbolKind};
use crate::leb128::{encode_signed, encode_unsigned, prefix_size};
use crate::ty::{ValType, VOID};
use crate::var::{FuncMapper, GlobalMapper, LocalMapper};
use std::collections::HashMap;
use wasm_ast::{Expression, FunctionDefinition};

/// Encodes one function definition as a code-section entry: the local
/// declaration group, the body, the closing `end`, all length-prefixed.
pub(crate) fn encode_function<'a, 'm>(
    func: &'m FunctionDefinition,
    globals: &'a GlobalMapper<'m>,
    funcs: &'a FuncMapper<'m>,
    sub_modules: &'a HashMap<&'m str, (usize, usize)>,
) -> Result<Vec<u8>> {
    // Run-length encoding of the local declarations: always a single group
    // of the one supported scalar type.
    let mut body = encode_unsigned(1);
    body.extend(encode_unsigned(func.locals.len() as u64));
    body.push(ValType::I64.byte());

    let mut encoder = CodeEncoder::new(globals, funcs, LocalMapper::build(func), sub_modules);
    body.extend(encoder.encode_all(&func.body)?);
    body.push(builtin::END);

    Ok(prefix_size(body))
}

/// Walks one function body and produces its byte code. Borrows the shared
/// module-wide tables; owns the per-function local table and the label
/// scope stack.
pub(crate) struct CodeEncoder<'a, 'm> {
    globals: &'a GlobalMapper<'m>,
    funcs: &'a FuncMapper<'m>,
    locals: LocalMapper<'m>,
    sub_modules: &'a HashMap<&'m str, (usize, usize)>,
    labels: Vec<Option<&'m str>>,
}

impl<'a, 'm> CodeEncoder<'a, 'm> {
    pub(crate) fn new(
        globals: &'a GlobalMapper<'m>,
        funcs: &'a FuncMapper<'m>,
        locals: LocalMapper<'m>,
        sub_modules: &'a HashMap<&'m str, (usize, usize)>,
    ) -> CodeEncoder<'a, 'm> {
        CodeEncoder {
            globals,
            funcs,
            locals,
            sub_modules,
            labels: Vec::new(),
        }
    }

    pub(crate) fn encode(&mut self, expr: &'m Expression) -> Result<Vec<u8>> {
        match expr {
            Expression::Literal(value) => {
                let mut out = vec![builtin::I64_CONST];
                out.extend(encode_signed(*value as i64));
                Ok(out)
            }
            Expression::StringLiteral(..) => Err(EncodeError::Unimplemented("string literals")),
            Expression::LocalVariable(name) => {
                let mut out = vec![builtin::LOCAL_GET];
                out.extend(encode_unsigned(u64::from(self.locals.get(name)?)));
                Ok(out)
            }
            Expression::GlobalVariable(name) => {
                let mut out = vec![builtin::GLOBAL_GET];
                out.extend(encode_unsigned(u64::from(self.globals.get(name)?)));
                Ok(out)
            }
            Expression::BuiltinCall { name, arguments } => {
                self.encode_builtin_call(name, arguments)
            }
            Expression::FunctionCall { name, arguments } => {
                let mut out = self.encode_all(arguments)?;
                out.push(builtin::CALL);
                out.extend(encode_unsigned(u64::from(self.funcs.get(name)?)));
                Ok(out)
            }
            Expression::LocalAssignment { name, value } => {
                let mut out = self.encode(value)?;
                out.push(builtin::LOCAL_SET);
                out.extend(encode_unsigned(u64::from(self.locals.get(name)?)));
                Ok(out)
            }
            Expression::GlobalAssignment { name, value } => {
                let mut out = self.encode(value)?;
                out.push(builtin::GLOBAL_SET);
                out.extend(encode_unsigned(u64::from(self.globals.get(name)?)));
                Ok(out)
            }
            Expression::If {
                condition,
                statements,
                else_statements,
            } => {
                let mut out = self.encode(condition)?;
                out.push(builtin::IF);
                out.push(VOID);

                self.labels.push(None);
                out.extend(self.encode_all(statements)?);
                if let Some(else_statements) = else_statements {
                    out.push(builtin::ELSE);
                    out.extend(self.encode_all(else_statements)?);
                }
                self.labels.pop();

                out.push(builtin::END);
                Ok(out)
            }
            Expression::Loop { label, statements } => {
                let mut out = vec![builtin::LOOP, VOID];

                self.labels.push(Some(label));
                out.extend(self.encode_all(statements)?);
                self.labels.pop();

                out.push(builtin::END);
                Ok(out)
            }
            Expression::Break { label } => {
                // TODO: emit Br with branch_depth as the operand once the
                // IR builder settles the semantics of labeled breaks.
                self.branch_depth(label)?;
                Err(EncodeError::Unimplemented("br"))
            }
            Expression::BreakIf { label, .. } => {
                self.branch_depth(label)?;
                Err(EncodeError::Unimplemented("br_if"))
            }
            Expression::Block { statements } => {
                let mut out = vec![builtin::BLOCK, VOID];
                out.extend(self.encode_all(statements)?);
                out.push(builtin::END);
                Ok(out)
            }
        }
    }

    fn encode_all(&mut self, exprs: &'m [Expression]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for expr in exprs {
            out.extend(self.encode(expr)?);
        }
        Ok(out)
    }

    fn encode_builtin_call(&mut self, name: &'m str, arguments: &'m [Expression]) -> Result<Vec<u8>> {
        if name == "dataoffset" || name == "datasize" {
            let (offset, size) = self.sub_module_of(arguments)?;
            let value = if name == "dataoffset" { offset } else { size };
            let mut out = vec![builtin::I64_CONST];
            out.extend(encode_signed(value as i64));
            return Ok(out);
        }

        let args = self.encode_all(arguments)?;
        if name == "unreachable" {
            return Ok(vec![builtin::UNREACHABLE]);
        }

        let Some(op) = builtin::opcode_of(name) else {
            return Err(EncodeError::undefined(SymbolKind::Builtin, name));
        };
        let mut out = args;
        out.push(op);
        if builtin::has_memory_immediate(name) {
            out.extend(builtin::MEM_IMMEDIATE);
        }
        Ok(out)
    }

    /// Resolves the position and size of the embedded sub-module named by
    /// the sole string-literal argument.
    fn sub_module_of(&self, arguments: &'m [Expression]) -> Result<(usize, usize)> {
        let Some(Expression::StringLiteral(name)) = arguments.first() else {
            return Err(EncodeError::Assertion(
                "dataoffset and datasize take a string literal argument".to_string(),
            ));
        };
        self.sub_modules
            .get(name.as_str())
            .copied()
            .ok_or_else(|| EncodeError::undefined(SymbolKind::SubModule, name))
    }

    /// Nesting depth from the innermost scope out to the loop carrying
    /// `label`; the operand a branch instruction targeting it would take.
    /// A label with no enclosing loop is a malformed input tree.
    fn branch_depth(&self, label: &str) -> Result<u32> {
        self.labels
            .iter()
            .rev()
            .position(|scope| *scope == Some(label))
            .map(|depth| depth as u32)
            .ok_or_else(|| EncodeError::Assertion(format!("no enclosing loop labeled {label}")))
    }
}
