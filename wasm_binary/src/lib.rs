mod builtin;
mod errors;
mod expr;
mod gen;
mod leb128;
mod ty;
mod var;

pub use errors::{EncodeError, SymbolKind};
pub use gen::encode;
