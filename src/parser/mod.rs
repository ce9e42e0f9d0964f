//! The Farpy parser: tokens to typed AST.
//!
//! Expressions use Pratt-style precedence climbing ([`expressions`]);
//! statements and declarations use plain recursive descent
//! ([`statements`]). A prefix handler that cannot make progress throws a
//! token-local [`ParseError`]; the outer loop in [`Parser::parse`] records
//! it as a diagnostic and resynchronizes at the next top-level statement.

mod error;
mod expressions;
mod statements;

pub use error::{ParseError, ParseErrorKind};

use crate::ast::{Program, Stmt};
use crate::diagnostics::DiagnosticBag;
use crate::lexer::{Token, TokenKind};
use crate::location::Location;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Disabled while parsing an `if`/`while`/`for` condition so a bare
    /// `StructName { ... }` is not mistaken for the start of the block,
    /// the same "no struct literal in condition position" rule most
    /// curly-brace languages with struct literals adopt.
    pub(crate) allow_struct_literal: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            allow_struct_literal: true,
        }
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    expected: what.to_owned(),
                    found: self.peek_kind(),
                },
                self.peek().location.clone(),
            ))
        }
    }

    pub(crate) fn loc(&self) -> Location {
        self.peek().location.clone()
    }

    /// Skips tokens until the next plausible statement boundary, so a
    /// syntax error in one statement does not cascade into the rest of the
    /// file.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_eof() {
            match self.peek_kind() {
                TokenKind::New
                | TokenKind::Fn
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Import
                | TokenKind::Extern
                | TokenKind::Struct
                | TokenKind::RBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// `parse(tokens) -> Program`. A catastrophic parse failure returns
    /// whatever partial `Program` was built up to the failure point.
    pub fn parse(tokens: Vec<Token>, diagnostics: &mut DiagnosticBag) -> Program {
        let mut parser = Parser::new(tokens);
        let mut body: Vec<Stmt> = Vec::new();

        while !parser.is_eof() {
            match statements::parse_top_level_statement(&mut parser) {
                Ok(stmt) => body.push(stmt),
                Err(err) => {
                    diagnostics.error(err.location.clone(), err.kind.to_string());
                    parser.synchronize();
                }
            }
        }

        Program { body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticBag;
    use crate::lexer::lex;

    fn parse_source(source: &str) -> (Program, DiagnosticBag) {
        let mut diagnostics = DiagnosticBag::default();
        let tokens = lex("test.fp", source, ".", &mut diagnostics, false)
            .expect("lexing should succeed for parser tests");
        let program = Parser::parse(tokens, &mut diagnostics);
        (program, diagnostics)
    }

    #[test]
    fn parses_variable_declaration() {
        let (program, diagnostics) = parse_source("new x = 5");
        assert!(!diagnostics.has_errors());
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn parse_is_deterministic() {
        let source = "new x = 1 + 2 * 3";
        let (first, _) = parse_source(source);
        let (second, _) = parse_source(source);
        assert_eq!(first, second);
    }

    #[test]
    fn recovers_after_a_bad_statement() {
        let (program, diagnostics) = parse_source("new = = =\nnew y = 1");
        assert!(diagnostics.has_errors());
        assert!(program
            .body
            .iter()
            .any(|s| matches!(s.kind, crate::ast::StmtKind::VariableDeclaration { .. })));
    }
}
