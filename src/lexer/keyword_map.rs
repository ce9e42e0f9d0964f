//! Fixed lookup tables for keywords and multi-character operators.
//!
//! A table of terminal strings plus a `can_match` probe so the scanner
//! knows whether to keep consuming characters (`can_match("=")` while
//! looking for `==`) before committing to the longest match found so far.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::token::TokenKind;

#[derive(Debug, Clone, Copy)]
pub struct Terminal {
    pub kind: TokenKind,
}

#[derive(Debug, Default)]
pub struct LexMap {
    map: HashMap<&'static str, Terminal>,
}

impl LexMap {
    fn insert(&mut self, key: &'static str, kind: TokenKind) {
        self.map.insert(key, Terminal { kind });
    }

    pub fn can_match(&self, prefix: &str) -> bool {
        self.map.keys().any(|key| key.starts_with(prefix))
    }

    pub fn get(&self, key: &str) -> Option<Terminal> {
        self.map.get(key).copied()
    }
}

/// Multi-character operators, checked before the single-character table.
pub static MULTI_CHAR_OPERATORS: Lazy<LexMap> = Lazy::new(|| {
    let mut m = LexMap::default();
    m.insert("++", TokenKind::PlusPlus);
    m.insert("--", TokenKind::MinusMinus);
    m.insert("**", TokenKind::StarStar);
    m.insert("%%", TokenKind::PercentPercent);
    m.insert("==", TokenKind::EqEq);
    m.insert(">=", TokenKind::Gte);
    m.insert("<=", TokenKind::Lte);
    m.insert("&&", TokenKind::AndAnd);
    m.insert("||", TokenKind::OrOr);
    m.insert("!=", TokenKind::NotEq);
    m.insert("...", TokenKind::RangeInclusive);
    m.insert("..", TokenKind::Range);
    m.insert("->", TokenKind::Arrow);
    m
});

/// Single-character punctuation and operators.
pub static SINGLE_CHAR_TOKENS: Lazy<HashMap<char, TokenKind>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert('+', TokenKind::Plus);
    m.insert('-', TokenKind::Minus);
    m.insert('*', TokenKind::Star);
    m.insert('/', TokenKind::Slash);
    m.insert('%', TokenKind::Percent);
    m.insert('=', TokenKind::Eq);
    m.insert('>', TokenKind::Gt);
    m.insert('<', TokenKind::Lt);
    m.insert('!', TokenKind::Not);
    m.insert('&', TokenKind::Amp);
    m.insert('|', TokenKind::Pipe);
    m.insert('(', TokenKind::LParen);
    m.insert(')', TokenKind::RParen);
    m.insert('{', TokenKind::LBrace);
    m.insert('}', TokenKind::RBrace);
    m.insert('[', TokenKind::LBracket);
    m.insert(']', TokenKind::RBracket);
    m.insert(',', TokenKind::Comma);
    m.insert(':', TokenKind::Colon);
    m.insert(';', TokenKind::Semicolon);
    m.insert('.', TokenKind::Dot);
    m
});

/// `[A-Za-z_][A-Za-z0-9_]*` identifiers resolved against this table to pick
/// `Identifier` or a keyword kind.
pub static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("new", TokenKind::New);
    m.insert("mut", TokenKind::Mut);
    m.insert("fn", TokenKind::Fn);
    m.insert("return", TokenKind::Return);
    m.insert("if", TokenKind::If);
    m.insert("elif", TokenKind::Elif);
    m.insert("else", TokenKind::Else);
    m.insert("while", TokenKind::While);
    m.insert("for", TokenKind::For);
    m.insert("from", TokenKind::From);
    m.insert("step", TokenKind::Step);
    m.insert("import", TokenKind::Import);
    m.insert("extern", TokenKind::Extern);
    m.insert("struct", TokenKind::Struct);
    m.insert("cast", TokenKind::Cast);
    m.insert("true", TokenKind::True);
    m.insert("false", TokenKind::False);
    m.insert("null", TokenKind::Null);
    m
});
