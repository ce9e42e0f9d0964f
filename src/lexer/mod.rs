//! The Farpy lexer: byte stream to ordered token sequence.
//!
//! Single pass, one character of lookahead plus a longest-match probe for
//! multi-character operators. Lexical errors are pushed onto the shared
//! [`DiagnosticBag`] via the caller's [`Reporter`]; a *fatal* lexical error
//! (unterminated string/comment) stops the scan and returns no tokens, per
//! "a fatal lexer error returns no tokens."

mod error;
mod keyword_map;
mod token;

pub use error::{LexError, LexErrorKind};
pub use keyword_map::{KEYWORDS, MULTI_CHAR_OPERATORS, SINGLE_CHAR_TOKENS};
pub use token::{Token, TokenKind, TokenValue};

use std::{iter::Peekable, str::Chars};

use crate::diagnostics::DiagnosticBag;
use crate::location::Location;

pub struct Lexer<'a> {
    file: String,
    directory: String,
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
    ignore_newlines: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(
        file: impl Into<String>,
        source: &'a str,
        directory: impl Into<String>,
        ignore_newlines: bool,
    ) -> Self {
        Lexer {
            file: file.into(),
            directory: directory.into(),
            source,
            chars: source.chars().peekable(),
            line: 0,
            col: 0,
            ignore_newlines,
            tokens: Vec::new(),
        }
    }

    fn current_line_text(&self) -> String {
        self.source
            .lines()
            .nth(self.line)
            .unwrap_or_default()
            .to_owned()
    }

    fn loc(&self, start_col: usize, end_col: usize) -> Location {
        Location::new(
            self.file.clone(),
            self.directory.clone(),
            self.line,
            start_col,
            end_col,
            self.current_line_text(),
        )
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.chars.next();
        match next {
            Some('\n') => {
                self.line += 1;
                self.col = 0;
            }
            Some(_) => self.col += 1,
            None => {}
        }
        next
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek2(&self) -> Option<char> {
        let mut clone = self.chars.clone();
        clone.next();
        clone.next()
    }

    /// Runs the full scan, reporting diagnostics through `diagnostics`.
    /// Returns `None` (no tokens) on a fatal lexical error.
    pub fn lex(mut self, diagnostics: &mut DiagnosticBag) -> Option<Vec<Token>> {
        loop {
            match self.scan_one() {
                Ok(true) => continue,
                Ok(false) => break,
                Err(err) => {
                    diagnostics.error(err.location.clone(), err.kind.to_string());
                    if let Some(suggestion) = &err.suggestion {
                        log::debug!("lexer suggestion: {suggestion}");
                    }
                    return None;
                }
            }
        }
        let eof_loc = self.loc(self.col, self.col);
        self.tokens
            .push(Token::new(TokenKind::Eof, TokenValue::None, eof_loc));
        Some(self.tokens)
    }

    /// Scans one lexeme. Returns `Ok(false)` at end of input.
    fn scan_one(&mut self) -> Result<bool, LexError> {
        self.skip_trivia()?;
        let Some(c) = self.peek() else {
            return Ok(false);
        };

        match c {
            'A'..='Z' | 'a'..='z' | '_' => self.scan_identifier(),
            '0'..='9' => self.scan_number(),
            '"' => self.scan_string(),
            _ => self.scan_operator(),
        }?;
        Ok(true)
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    if c == '\n' && self.ignore_newlines {
                        // still advance the line counter, just don't special-case it
                    }
                    self.bump();
                }
                Some('/') if self.peek2() == Some('/') => {
                    while !matches!(self.peek(), Some('\n') | None) {
                        self.bump();
                    }
                }
                Some('/') if self.peek2() == Some('*') => {
                    let start = (self.line, self.col);
                    self.bump();
                    self.bump();
                    loop {
                        match (self.peek(), self.peek2()) {
                            (Some('*'), Some('/')) => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            (None, _) => {
                                return Err(LexError::new(
                                    LexErrorKind::UnterminatedBlockComment,
                                    self.loc(start.1, start.1 + 2),
                                    "close the block comment with '*/' before end of file",
                                ));
                            }
                            _ => {
                                self.bump();
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_identifier(&mut self) -> Result<(), LexError> {
        let start_col = self.col;
        let mut lexeme = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                lexeme.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let location = self.loc(start_col, self.col);
        if let Some(kind) = KEYWORDS.get(lexeme.as_str()) {
            self.tokens
                .push(Token::new(*kind, TokenValue::Identifier(lexeme), location));
        } else {
            self.tokens.push(Token::new(
                TokenKind::Identifier,
                TokenValue::Identifier(lexeme),
                location,
            ));
        }
        Ok(())
    }

    /// Numeric literals: decimal, float, binary-with-suffix (`101b`), hex
    /// (`0x..`), octal (`0o..`), binary-with-prefix (`0b..`).
    fn scan_number(&mut self) -> Result<(), LexError> {
        let start_col = self.col;

        if self.peek() == Some('0') && matches!(self.peek2(), Some('x') | Some('o') | Some('b')) {
            let prefix_kind = self.peek2().unwrap();
            self.bump(); // '0'
            self.bump(); // x/o/b
            let mut digits = String::new();
            let valid = |c: char| match prefix_kind {
                'x' => c.is_ascii_hexdigit(),
                'o' => ('0'..='7').contains(&c),
                'b' => c == '0' || c == '1',
                _ => unreachable!(),
            };
            while let Some(c) = self.peek() {
                if valid(c) {
                    digits.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            if digits.is_empty() {
                return Err(LexError::new(
                    LexErrorKind::DigitlessNumericPrefix,
                    self.loc(start_col, self.col),
                    format!("'0{prefix_kind}' must be followed by at least one digit"),
                ));
            }
            let radix = match prefix_kind {
                'x' => 16,
                'o' => 8,
                'b' => 2,
                _ => unreachable!(),
            };
            let value = i64::from_str_radix(&digits, radix).unwrap_or(0);
            let location = self.loc(start_col, self.col);
            self.tokens
                .push(Token::new(TokenKind::Int, TokenValue::Int(value), location));
            return Ok(());
        }

        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }

        // binary literal with trailing 'b' suffix, e.g. "101b"
        if self.peek() == Some('b') && digits.chars().all(|c| c == '0' || c == '1') {
            self.bump();
            let location = self.loc(start_col, self.col);
            self.tokens.push(Token::new(
                TokenKind::Binary,
                TokenValue::Binary(digits),
                location,
            ));
            return Ok(());
        }

        // a following '.' only starts a float if itself followed by a digit;
        // otherwise it defers to the range operator.
        if self.peek() == Some('.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
            digits.push('.');
            self.bump();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            let value: f64 = digits.parse().unwrap_or(0.0);
            let location = self.loc(start_col, self.col);
            self.tokens
                .push(Token::new(TokenKind::Float, TokenValue::Float(value), location));
            return Ok(());
        }

        let value: i64 = digits.parse().unwrap_or(0);
        let location = self.loc(start_col, self.col);
        self.tokens
            .push(Token::new(TokenKind::Int, TokenValue::Int(value), location));
        Ok(())
    }

    /// String literals with escape sequences `\n \t \r \\ \" \0`; an
    /// unescaped newline inside a string is an error.
    fn scan_string(&mut self) -> Result<(), LexError> {
        let start_col = self.col;
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedString,
                        self.loc(start_col, self.col),
                        "close the string literal with a matching '\"'",
                    ));
                }
                Some('\n') => {
                    return Err(LexError::new(
                        LexErrorKind::UnescapedNewlineInString,
                        self.loc(start_col, self.col),
                        "escape the newline as '\\n' or close the string before it",
                    ));
                }
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        Some('n') => {
                            value.push('\n');
                            self.bump();
                        }
                        Some('t') => {
                            value.push('\t');
                            self.bump();
                        }
                        Some('r') => {
                            value.push('\r');
                            self.bump();
                        }
                        Some('\\') => {
                            value.push('\\');
                            self.bump();
                        }
                        Some('"') => {
                            value.push('"');
                            self.bump();
                        }
                        Some('0') => {
                            value.push('\0');
                            self.bump();
                        }
                        // escape of an unknown character preserves the character
                        Some(other) => {
                            value.push(other);
                            self.bump();
                        }
                        None => {
                            return Err(LexError::new(
                                LexErrorKind::UnterminatedString,
                                self.loc(start_col, self.col),
                                "close the string literal with a matching '\"'",
                            ));
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }
        let location = self.loc(start_col, self.col);
        self.tokens
            .push(Token::new(TokenKind::Str, TokenValue::Str(value), location));
        Ok(())
    }

    /// Multi-character operators are tried before single-character ones.
    fn scan_operator(&mut self) -> Result<(), LexError> {
        let start_col = self.col;
        let c = self.peek().expect("scan_operator called at EOF");

        // try the longest multi-char operator match first (up to 3 chars).
        let mut probe = String::new();
        probe.push(c);
        let mut best: Option<(usize, TokenKind)> = None;
        {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            for len in 1..=3 {
                if MULTI_CHAR_OPERATORS.can_match(&probe) {
                    if let Some(terminal) = MULTI_CHAR_OPERATORS.get(&probe) {
                        best = Some((len, terminal.kind));
                    }
                    if let Some(next_char) = lookahead.next() {
                        probe.push(next_char);
                        continue;
                    }
                }
                break;
            }
        }

        if let Some((len, kind)) = best {
            let mut lexeme = String::new();
            for _ in 0..len {
                if let Some(ch) = self.bump() {
                    lexeme.push(ch);
                }
            }
            let location = self.loc(start_col, self.col);
            self.tokens
                .push(Token::new(kind, TokenValue::Operator(lexeme), location));
            return Ok(());
        }

        if let Some(kind) = SINGLE_CHAR_TOKENS.get(&c).copied() {
            self.bump();
            let location = self.loc(start_col, self.col);
            self.tokens.push(Token::new(
                kind,
                TokenValue::Operator(c.to_string()),
                location,
            ));
            return Ok(());
        }

        Err(LexError::new(
            LexErrorKind::UnexpectedCharacter(c),
            self.loc(start_col, start_col + 1),
            "remove or replace this character",
        ))
    }
}

/// Entry point matching `(filename, source, directory, reporter,
/// ignore_newlines?)` contract.
pub fn lex(
    filename: &str,
    source: &str,
    directory: &str,
    diagnostics: &mut DiagnosticBag,
    ignore_newlines: bool,
) -> Option<Vec<Token>> {
    Lexer::new(filename, source, directory, ignore_newlines).lex(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_ok(source: &str) -> Vec<Token> {
        let mut diagnostics = DiagnosticBag::default();
        let tokens = lex("test.fp", source, ".", &mut diagnostics, false);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.all());
        tokens.expect("expected tokens")
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_identifier_and_eof() {
        let tokens = lex_ok("letter");
        assert_eq!(kinds(&tokens), vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn lexes_keyword_vs_identifier() {
        let tokens = lex_ok("fn foo");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Fn, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_multi_char_operators_before_single_char() {
        let tokens = lex_ok("a == b");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::EqEq,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn division_operator_is_not_confused_with_comment() {
        let tokens = lex_ok("a / b");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn line_comment_is_skipped() {
        let tokens = lex_ok("a // comment\nb");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn block_comment_is_skipped() {
        let tokens = lex_ok("a /* comment \n spanning lines */ b");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_block_comment_is_fatal() {
        let mut diagnostics = DiagnosticBag::default();
        let tokens = lex("test.fp", "/* never closed", ".", &mut diagnostics, false);
        assert!(tokens.is_none());
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn float_requires_digit_after_dot() {
        let tokens = lex_ok("1.5");
        assert_eq!(kinds(&tokens), vec![TokenKind::Float, TokenKind::Eof]);
        assert_eq!(tokens[0].value, TokenValue::Float(1.5));
    }

    #[test]
    fn digit_dot_dot_yields_int_then_range() {
        let tokens = lex_ok("1..5");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Int, TokenKind::Range, TokenKind::Int, TokenKind::Eof]
        );
    }

    #[test]
    fn inclusive_range_operator() {
        let tokens = lex_ok("1...5");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Int,
                TokenKind::RangeInclusive,
                TokenKind::Int,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn binary_suffix_literal() {
        let tokens = lex_ok("101b");
        assert_eq!(kinds(&tokens), vec![TokenKind::Binary, TokenKind::Eof]);
    }

    #[test]
    fn hex_and_octal_prefixes() {
        let tokens = lex_ok("0xFF 0o17 0b101");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Int, TokenKind::Int, TokenKind::Int, TokenKind::Eof]
        );
        assert_eq!(tokens[0].value, TokenValue::Int(255));
        assert_eq!(tokens[1].value, TokenValue::Int(15));
        assert_eq!(tokens[2].value, TokenValue::Int(5));
    }

    #[test]
    fn string_escape_sequences() {
        let tokens = lex_ok(r#""a\nb\tc\"d""#);
        assert_eq!(tokens[0].value, TokenValue::Str("a\nb\tc\"d".to_owned()));
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let mut diagnostics = DiagnosticBag::default();
        let tokens = lex("test.fp", "\"never closed", ".", &mut diagnostics, false);
        assert!(tokens.is_none());
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn unescaped_newline_in_string_is_fatal() {
        let mut diagnostics = DiagnosticBag::default();
        let tokens = lex("test.fp", "\"a\nb\"", ".", &mut diagnostics, false);
        assert!(tokens.is_none());
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn unexpected_character_is_reported() {
        let mut diagnostics = DiagnosticBag::default();
        let tokens = lex("test.fp", "a $ b", ".", &mut diagnostics, false);
        assert!(tokens.is_none());
        assert!(diagnostics.has_errors());
    }
}
