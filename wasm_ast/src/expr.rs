/// One statement or expression of a function body. The set is closed on
/// purpose: the encoder matches exhaustively, so adding a form here forces
/// every consumer to handle it.
#[derive(Debug)]
pub enum Expression {
    Literal(u64),
    StringLiteral(String),
    LocalVariable(String),
    GlobalVariable(String),
    BuiltinCall {
        name: String,
        arguments: Vec<Expression>,
    },
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
    LocalAssignment {
        name: String,
        value: Box<Expression>,
    },
    GlobalAssignment {
        name: String,
        value: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        statements: Vec<Expression>,
        else_statements: Option<Vec<Expression>>,
    },
    Loop {
        label: String,
        statements: Vec<Expression>,
    },
    Break {
        label: String,
    },
    BreakIf {
        label: String,
        condition: Box<Expression>,
    },
    Block {
        statements: Vec<Expression>,
    },
}
