//! Top-level error type wrapping every pipeline stage's error.

use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::semantic::SemanticError;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("could not read source file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error("compilation finished with {0} error(s); see diagnostics for details")]
    HadErrors(usize),
}
