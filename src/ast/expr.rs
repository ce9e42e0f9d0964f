//! Expression AST nodes.

use super::node::NodeMeta;
use super::types::SourceType;

#[derive(Debug, Clone, PartialEq, Copy, serde::Serialize, serde::Deserialize)]
pub enum UnaryOp {
    Deref,
    AddressOf,
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq, Copy, serde::Serialize, serde::Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    ModMod,
    Pow,
    Eq,
    NotEq,
    Lt,
    Gt,
    Lte,
    Gte,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::ModMod => "%%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StructFieldInit {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ExprKind {
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    BinaryLiteral(String),
    BooleanLiteral(bool),
    NullLiteral,
    Identifier(String),
    Binary {
        operator: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Cast {
        expr: Box<Expr>,
        target_type: SourceType,
    },
    ArrayLiteral {
        elements: Vec<Expr>,
        element_type: SourceType,
    },
    IndexAccess {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    StructExpr {
        name: String,
        fields: Vec<StructFieldInit>,
    },
    ArrowExpression {
        target: Box<Expr>,
        field: String,
    },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub meta: NodeMeta,
}

impl Expr {
    pub fn new(kind: ExprKind, meta: NodeMeta) -> Self {
        Expr { kind, meta }
    }
}
