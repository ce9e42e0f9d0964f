use std::fmt::Display;

use crate::location::Location;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("numeric literal prefix without digits")]
    DigitlessNumericPrefix,
    #[error("unescaped newline inside string literal")]
    UnescapedNewlineInString,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: Location,
    pub suggestion: Option<String>,
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (help: {suggestion})")?;
        }
        Ok(())
    }
}

impl LexError {
    pub fn new(kind: LexErrorKind, location: Location, suggestion: impl Into<String>) -> Self {
        LexError {
            kind,
            location,
            suggestion: Some(suggestion.into()),
        }
    }
}
