//! The Farpy AST: a tagged union keyed on `kind`, with shared metadata
//! (`type`, `llvmType`, `loc`) factored into [`node::NodeMeta`] rather
//! than duplicated across every variant.
//!
//! The tree is owned top-down from [`stmt::Program`] with no cycles; we use
//! `Box` for child ownership rather than an arena, since Farpy programs are
//! small enough that arena indices would add bookkeeping without a
//! measurable benefit.

pub mod expr;
pub mod node;
pub mod stmt;
pub mod symbol;
pub mod types;

pub use expr::{BinaryOp, Expr, ExprKind, StructFieldInit, UnaryOp};
pub use node::NodeMeta;
pub use stmt::{ExternFn, FunctionArg, Program, Stmt, StmtKind, StructFieldDecl};
pub use symbol::{CapturedScope, SymbolInfo};
pub use types::{LlvmType, SourceType, TypeInfo};
