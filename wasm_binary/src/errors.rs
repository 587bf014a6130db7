use std::fmt;

pub(crate) type Result<T> = std::result::Result<T, EncodeError>;

/// Every failure here is an invariant violation on the producer side: either
/// an unimplemented construct was exercised or the input tree refers to a
/// name that was never declared. Encoding aborts on the first one and any
/// partially produced bytes must be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    Unimplemented(&'static str),
    UndefinedSymbol { kind: SymbolKind, name: String },
    Assertion(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Local,
    Global,
    Function,
    Builtin,
    SubModule,
}

impl EncodeError {
    pub(crate) fn undefined(kind: SymbolKind, name: impl Into<String>) -> EncodeError {
        EncodeError::UndefinedSymbol {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            SymbolKind::Local => "local",
            SymbolKind::Global => "global",
            SymbolKind::Function => "function",
            SymbolKind::Builtin => "builtin",
            SymbolKind::SubModule => "sub-module",
        };
        f.write_str(kind)
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Unimplemented(what) => write!(f, "{what} not yet implemented"),
            EncodeError::UndefinedSymbol { kind, name } => {
                write!(f, "unknown {kind} named {name}")
            }
            EncodeError::Assertion(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for EncodeError {}
