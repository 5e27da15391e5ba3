use crate::lexer::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    NumberLit(i64),
    StringLit(String),
    /// A variable reference (e.g. `foo`).
    Var(String),
    /// A binary arithmetic expression (e.g. `1+1`).
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    /// A prefix expression (e.g. `-x`).
    Unary { op: UnaryOp, arg: Box<Expr> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::Plus => Some(Self::Add),
            Token::Minus => Some(Self::Sub),
            Token::Asterisk => Some(Self::Mul),
            Token::Slash => Some(Self::Div),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

/// A comparison. Only valid as an `if` or `while` guard, never nested inside an [`Expr`].
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub lhs: Expr,
    pub op: ComparisonOp,
    pub rhs: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Greater,
    Less,
    GreaterEq,
    LessEq,
    Eq,
    NotEq,
}

impl ComparisonOp {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token {
            Token::GreaterThan => Some(Self::Greater),
            Token::LessThan => Some(Self::Less),
            Token::GreaterThanEquals => Some(Self::GreaterEq),
            Token::LessThanEquals => Some(Self::LessEq),
            Token::EqualsEquals => Some(Self::Eq),
            Token::NotEquals => Some(Self::NotEq),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `ident = value`
    Assign { ident: String, value: Expr },
    If {
        condition: Condition,
        then_block: Program,
        else_block: Option<Program>,
    },
    /// Loops over `start..=end`. `ident` is an ordinary variable and keeps its last value after the loop.
    For {
        ident: String,
        start: Expr,
        end: Expr,
        body: Program,
    },
    While { condition: Condition, body: Program },
    Print(Expr),
}

/// An ordered sequence of statements. Used both as the root and as the body of every block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}
