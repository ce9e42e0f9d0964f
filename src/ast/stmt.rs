//! Statement and top-level declaration AST nodes.

use super::expr::Expr;
use super::node::NodeMeta;
use super::symbol::CapturedScope;
use super::types::SourceType;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FunctionArg {
    pub id: String,
    pub source_type: SourceType,
    pub llvm_type: Option<super::types::LlvmType>,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExternFn {
    pub name: String,
    pub params: Vec<SourceType>,
    pub return_type: SourceType,
    pub is_variadic: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StructFieldDecl {
    pub name: String,
    pub field_type: SourceType,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StmtKind {
    VariableDeclaration {
        id: String,
        declared_type: Option<SourceType>,
        value: Expr,
        mutable: bool,
    },
    AssignmentDeclaration {
        id: Box<Expr>,
        value: Expr,
    },
    FunctionDeclaration {
        id: String,
        args: Vec<FunctionArg>,
        return_types: Vec<SourceType>,
        block: Vec<Stmt>,
        scope: Option<CapturedScope>,
    },
    ReturnStatement {
        expr: Option<Expr>,
    },
    IfStatement {
        condition: Expr,
        primary: Vec<Stmt>,
        secondary: Option<Box<Stmt>>,
    },
    ElifStatement {
        condition: Expr,
        primary: Vec<Stmt>,
        secondary: Option<Box<Stmt>>,
    },
    ElseStatement {
        primary: Vec<Stmt>,
    },
    WhileStatement {
        condition: Expr,
        block: Vec<Stmt>,
    },
    ForRangeStatement {
        id: Option<String>,
        from: Expr,
        to: Expr,
        step: Option<Expr>,
        inclusive: bool,
        block: Vec<Stmt>,
    },
    ImportStatement {
        path: String,
        is_stdlib: bool,
    },
    ExternStatement {
        functions: Vec<ExternFn>,
        code: String,
    },
    StructStatement {
        name: String,
        fields: Vec<StructFieldDecl>,
    },
    StructPAssignment {
        target: Box<Expr>,
        field: String,
        value: Expr,
    },
    ExpressionStatement {
        expr: Expr,
    },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub meta: NodeMeta,
}

impl Stmt {
    pub fn new(kind: StmtKind, meta: NodeMeta) -> Self {
        Stmt { kind, meta }
    }

    /// The declared name of a top-level binding, used by the dead-code
    /// analyzer to match against `identifiers_used`.
    pub fn declared_name(&self) -> Option<&str> {
        match &self.kind {
            StmtKind::FunctionDeclaration { id, .. } => Some(id),
            StmtKind::VariableDeclaration { id, .. } => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Program {
    pub body: Vec<Stmt>,
}
