use std::fmt::Display;

use crate::lexer::TokenKind;
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
    },
    #[error("no prefix parser for {0:?}")]
    NoPrefixParser(TokenKind),
    #[error("unexpected token in argument list: {0:?}")]
    UnexpectedInArgumentList(TokenKind),
    #[error("unknown type name '{0}'")]
    UnknownTypeName(String),
}

/// A parse error token-locally thrown by a prefix/infix handler; `parse`
/// tolerates it, records a diagnostic, and resynchronizes at the next
/// top-level statement boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{location}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Location,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, location: Location) -> Self {
        ParseError { kind, location }
    }
}
