//! Statement-level recursive descent.

use super::error::{ParseError, ParseErrorKind};
use super::expressions::{parse_condition_expression, parse_expression, parse_type_name};
use super::Parser;
use crate::ast::{
    ExprKind, ExternFn, FunctionArg, NodeMeta, SourceType, Stmt, StmtKind, StructFieldDecl,
    TypeInfo,
};
use crate::lexer::{TokenKind, TokenValue};

pub(crate) fn parse_top_level_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    parse_statement(parser)
}

pub(crate) fn parse_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    match parser.peek_kind() {
        TokenKind::New => parse_variable_declaration(parser),
        TokenKind::Fn => parse_function_declaration(parser),
        TokenKind::Return => parse_return_statement(parser),
        TokenKind::If => parse_if_statement(parser),
        TokenKind::While => parse_while_statement(parser),
        TokenKind::For => parse_for_range_statement(parser),
        TokenKind::Import => parse_import_statement(parser),
        TokenKind::Extern => parse_extern_statement(parser),
        TokenKind::Struct => parse_struct_declaration(parser),
        _ => parse_expression_or_assignment(parser),
    }
}

fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, ParseError> {
    parser.expect(TokenKind::LBrace, "'{'")?;
    let mut body = Vec::new();
    while !parser.check(TokenKind::RBrace) && !parser.is_eof() {
        body.push(parse_statement(parser)?);
    }
    parser.expect(TokenKind::RBrace, "'}'")?;
    Ok(body)
}

/// `new [mut] name [: Type] = expr`; mutable by default
/// the `mut` token is accepted but does not change that default.
fn parse_variable_declaration(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let location = parser.loc();
    parser.expect(TokenKind::New, "'new'")?;
    parser.matches(TokenKind::Mut);
    let name_token = parser.expect(TokenKind::Identifier, "identifier")?;
    let id = name_token.lexeme();

    let declared_type = if parser.matches(TokenKind::Colon) {
        Some(parse_type_name(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::Eq, "'='")?;
    let value = parse_expression(parser, 0)?;

    Ok(Stmt::new(
        StmtKind::VariableDeclaration {
            id,
            declared_type,
            value,
            mutable: true,
        },
        NodeMeta::new(TypeInfo::void(), location),
    ))
}

/// `fn name(arg: T [| T]*, …): T [| T]* { stmts }`. Union return types are
/// represented as multiple `SourceType`s on the signature.
fn parse_function_declaration(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let location = parser.loc();
    parser.expect(TokenKind::Fn, "'fn'")?;
    let id = parser.expect(TokenKind::Identifier, "function name")?.lexeme();
    parser.expect(TokenKind::LParen, "'('")?;

    let mut args = Vec::new();
    if !parser.check(TokenKind::RParen) {
        loop {
            let arg_name = parser.expect(TokenKind::Identifier, "parameter name")?.lexeme();
            parser.expect(TokenKind::Colon, "':'")?;
            let mut source_type = parse_type_name(parser)?;
            while parser.matches(TokenKind::Pipe) {
                // union types collapse to the first alternative's LLVM
                // shape at the type-checker boundary; the full union is
                // preserved only in diagnostics, matching how the type
                // checker's single-`llvm_type`-per-argument model works.
                source_type = parse_type_name(parser)?;
            }
            let default = if parser.matches(TokenKind::Eq) {
                Some(parse_expression(parser, 0)?)
            } else {
                None
            };
            args.push(FunctionArg {
                id: arg_name,
                source_type,
                llvm_type: None,
                default,
            });
            if !parser.matches(TokenKind::Comma) {
                break;
            }
        }
    }
    parser.expect(TokenKind::RParen, "')'")?;

    let mut return_types = Vec::new();
    if parser.matches(TokenKind::Colon) {
        return_types.push(parse_type_name(parser)?);
        while parser.matches(TokenKind::Pipe) {
            return_types.push(parse_type_name(parser)?);
        }
    } else {
        return_types.push(SourceType::Void);
    }

    let block = parse_block(parser)?;

    Ok(Stmt::new(
        StmtKind::FunctionDeclaration {
            id,
            args,
            return_types,
            block,
            scope: None,
        },
        NodeMeta::new(TypeInfo::void(), location),
    ))
}

fn parse_return_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let location = parser.loc();
    parser.expect(TokenKind::Return, "'return'")?;
    let expr = if matches!(
        parser.peek_kind(),
        TokenKind::RBrace | TokenKind::Eof
    ) {
        None
    } else {
        Some(parse_expression(parser, 0)?)
    };
    Ok(Stmt::new(
        StmtKind::ReturnStatement { expr },
        NodeMeta::new(TypeInfo::void(), location),
    ))
}

fn parse_if_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let location = parser.loc();
    parser.expect(TokenKind::If, "'if'")?;
    let condition = parse_condition_expression(parser)?;
    let primary = parse_block(parser)?;
    let secondary = parse_else_chain(parser)?;

    Ok(Stmt::new(
        StmtKind::IfStatement {
            condition,
            primary,
            secondary: secondary.map(Box::new),
        },
        NodeMeta::new(TypeInfo::void(), location),
    ))
}

fn parse_else_chain(parser: &mut Parser) -> Result<Option<Stmt>, ParseError> {
    if parser.matches(TokenKind::Elif) {
        let location = parser.loc();
        let condition = parse_condition_expression(parser)?;
        let primary = parse_block(parser)?;
        let secondary = parse_else_chain(parser)?;
        Ok(Some(Stmt::new(
            StmtKind::ElifStatement {
                condition,
                primary,
                secondary: secondary.map(Box::new),
            },
            NodeMeta::new(TypeInfo::void(), location),
        )))
    } else if parser.matches(TokenKind::Else) {
        let location = parser.loc();
        let primary = parse_block(parser)?;
        Ok(Some(Stmt::new(
            StmtKind::ElseStatement { primary },
            NodeMeta::new(TypeInfo::void(), location),
        )))
    } else {
        Ok(None)
    }
}

fn parse_while_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let location = parser.loc();
    parser.expect(TokenKind::While, "'while'")?;
    let condition = parse_condition_expression(parser)?;
    let block = parse_block(parser)?;
    Ok(Stmt::new(
        StmtKind::WhileStatement { condition, block },
        NodeMeta::new(TypeInfo::void(), location),
    ))
}

/// `for [id] from expr .. expr [step expr] { … }` (exclusive) or `...`
/// (inclusive) — the surface syntax chosen for open question.
fn parse_for_range_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let location = parser.loc();
    parser.expect(TokenKind::For, "'for'")?;

    let id = if parser.check(TokenKind::Identifier) {
        Some(parser.advance().lexeme())
    } else {
        None
    };

    parser.expect(TokenKind::From, "'from'")?;
    let from = parse_condition_expression(parser)?;

    let inclusive = if parser.matches(TokenKind::RangeInclusive) {
        true
    } else {
        parser.expect(TokenKind::Range, "'..' or '...'")?;
        false
    };
    let to = parse_condition_expression(parser)?;

    let step = if parser.matches(TokenKind::Step) {
        Some(parse_condition_expression(parser)?)
    } else {
        None
    };

    let block = parse_block(parser)?;

    Ok(Stmt::new(
        StmtKind::ForRangeStatement {
            id,
            from,
            to,
            step,
            inclusive,
            block,
        },
        NodeMeta::new(TypeInfo::void(), location),
    ))
}

/// `import "./sibling.fp"` (external) or `import io` (stdlib, no `.` in
/// the path).
fn parse_import_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let location = parser.loc();
    parser.expect(TokenKind::Import, "'import'")?;

    let (path, is_stdlib) = match parser.peek_kind() {
        TokenKind::Str => {
            let token = parser.advance();
            let TokenValue::Str(value) = token.value else {
                unreachable!()
            };
            let is_stdlib = !value.contains('.');
            (value, is_stdlib)
        }
        TokenKind::Identifier => {
            let token = parser.advance();
            (token.lexeme(), true)
        }
        other => {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    expected: "a module path or stdlib module name".to_owned(),
                    found: other,
                },
                parser.loc(),
            ))
        }
    };

    Ok(Stmt::new(
        StmtKind::ImportStatement { path, is_stdlib },
        NodeMeta::new(TypeInfo::void(), location),
    ))
}

/// `extern { fn name(args): T ... } "<raw C source>"`.
fn parse_extern_statement(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let location = parser.loc();
    parser.expect(TokenKind::Extern, "'extern'")?;
    parser.expect(TokenKind::LBrace, "'{'")?;

    let mut functions = Vec::new();
    while !parser.check(TokenKind::RBrace) && !parser.is_eof() {
        parser.expect(TokenKind::Fn, "'fn'")?;
        let name = parser.expect(TokenKind::Identifier, "function name")?.lexeme();
        parser.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        let mut is_variadic = false;
        if !parser.check(TokenKind::RParen) {
            loop {
                if parser.matches(TokenKind::RangeInclusive) {
                    is_variadic = true;
                    break;
                }
                if parser.check(TokenKind::Identifier) {
                    parser.advance();
                    parser.expect(TokenKind::Colon, "':'")?;
                }
                params.push(parse_type_name(parser)?);
                if !parser.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        parser.expect(TokenKind::RParen, "')'")?;
        let return_type = if parser.matches(TokenKind::Colon) {
            parse_type_name(parser)?
        } else {
            SourceType::Void
        };
        functions.push(ExternFn {
            name,
            params,
            return_type,
            is_variadic,
        });
    }
    parser.expect(TokenKind::RBrace, "'}'")?;

    let code_token = parser.expect(TokenKind::Str, "raw C source string")?;
    let TokenValue::Str(code) = code_token.value else {
        unreachable!()
    };

    Ok(Stmt::new(
        StmtKind::ExternStatement { functions, code },
        NodeMeta::new(TypeInfo::void(), location),
    ))
}

/// `struct Name { field: Type, field2: Type }`.
fn parse_struct_declaration(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let location = parser.loc();
    parser.expect(TokenKind::Struct, "'struct'")?;
    let name = parser.expect(TokenKind::Identifier, "struct name")?.lexeme();
    parser.expect(TokenKind::LBrace, "'{'")?;
    let mut fields = Vec::new();
    while !parser.check(TokenKind::RBrace) && !parser.is_eof() {
        let field_name = parser.expect(TokenKind::Identifier, "field name")?.lexeme();
        parser.expect(TokenKind::Colon, "':'")?;
        let field_type = parse_type_name(parser)?;
        fields.push(StructFieldDecl {
            name: field_name,
            field_type,
        });
        if !parser.matches(TokenKind::Comma) {
            break;
        }
    }
    parser.expect(TokenKind::RBrace, "'}'")?;
    Ok(Stmt::new(
        StmtKind::StructStatement { name, fields },
        NodeMeta::new(TypeInfo::void(), location),
    ))
}

/// Parses an expression; if it is immediately followed by `=`, the
/// already-parsed expression becomes an assignment target instead.
fn parse_expression_or_assignment(parser: &mut Parser) -> Result<Stmt, ParseError> {
    let location = parser.loc();
    let target = parse_expression(parser, 0)?;

    if parser.matches(TokenKind::Eq) {
        let value = parse_expression(parser, 0)?;
        return Ok(match target.kind {
            ExprKind::ArrowExpression { target, field } => Stmt::new(
                StmtKind::StructPAssignment {
                    target,
                    field,
                    value,
                },
                NodeMeta::new(TypeInfo::void(), location),
            ),
            _ => Stmt::new(
                StmtKind::AssignmentDeclaration {
                    id: Box::new(target),
                    value,
                },
                NodeMeta::new(TypeInfo::void(), location),
            ),
        });
    }

    Ok(Stmt::new(
        StmtKind::ExpressionStatement { expr: target },
        NodeMeta::new(TypeInfo::void(), location),
    ))
}
