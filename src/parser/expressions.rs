//! Pratt-style precedence climbing for expressions.

use super::error::{ParseError, ParseErrorKind};
use super::Parser;
use crate::ast::{BinaryOp, Expr, ExprKind, NodeMeta, SourceType, StructFieldInit, TypeInfo, UnaryOp};
use crate::lexer::{TokenKind, TokenValue};

/// Ascending precedence table (ASSIGN is handled by the statement parser,
/// not here; CALL/postfix binds tighter than anything).
fn binary_precedence(kind: TokenKind) -> Option<(u8, bool)> {
    // (precedence, right_associative)
    Some(match kind {
        TokenKind::OrOr => (1, false),
        TokenKind::AndAnd => (2, false),
        TokenKind::EqEq | TokenKind::NotEq => (3, false),
        TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => (4, false),
        TokenKind::Plus | TokenKind::Minus => (5, false),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent | TokenKind::PercentPercent => {
            (6, false)
        }
        TokenKind::StarStar => (7, true),
        _ => return None,
    })
}

fn to_binary_op(kind: TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::PercentPercent => BinaryOp::ModMod,
        TokenKind::StarStar => BinaryOp::Pow,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::Lte => BinaryOp::Lte,
        TokenKind::Gte => BinaryOp::Gte,
        TokenKind::AndAnd => BinaryOp::And,
        TokenKind::OrOr => BinaryOp::Or,
        other => unreachable!("{other:?} is not a binary operator"),
    }
}

/// Parse-time coarse type inference for a binary arithmetic result: string
/// wins over float, float wins over int.
fn coarse_binary_type(left: &TypeInfo, right: &TypeInfo) -> TypeInfo {
    if left.base_type == SourceType::String || right.base_type == SourceType::String {
        TypeInfo::simple(SourceType::String)
    } else if left.base_type == SourceType::Float
        || left.base_type == SourceType::Double
        || right.base_type == SourceType::Float
        || right.base_type == SourceType::Double
    {
        TypeInfo::simple(SourceType::Float)
    } else {
        TypeInfo::simple(SourceType::Int)
    }
}

pub(crate) fn parse_expression(parser: &mut Parser, min_prec: u8) -> Result<Expr, ParseError> {
    let mut lhs = parse_prefix(parser)?;

    loop {
        let Some((prec, right_assoc)) = binary_precedence(parser.peek_kind()) else {
            break;
        };
        if prec < min_prec {
            break;
        }
        let op_token = parser.advance();
        let operator = to_binary_op(op_token.kind);
        let next_min = if right_assoc { prec } else { prec + 1 };
        let rhs = parse_expression(parser, next_min)?;

        let location = lhs.meta.location.merge(&rhs.meta.location);
        let type_info = coarse_binary_type(&lhs.meta.type_info, &rhs.meta.type_info);
        lhs = Expr::new(
            ExprKind::Binary {
                operator,
                left: Box::new(lhs),
                right: Box::new(rhs),
            },
            NodeMeta::new(type_info, location),
        );
    }

    Ok(lhs)
}

fn parse_prefix(parser: &mut Parser) -> Result<Expr, ParseError> {
    let location = parser.loc();
    match parser.peek_kind() {
        TokenKind::Minus => {
            parser.advance();
            let operand = parse_expression(parser, 8)?;
            let type_info = operand.meta.type_info.clone();
            Ok(Expr::new(
                ExprKind::Unary {
                    operator: UnaryOp::Neg,
                    operand: Box::new(operand),
                },
                NodeMeta::new(type_info, location),
            ))
        }
        TokenKind::Not => {
            parser.advance();
            let operand = parse_expression(parser, 8)?;
            Ok(Expr::new(
                ExprKind::Unary {
                    operator: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                NodeMeta::new(TypeInfo::simple(SourceType::Bool), location),
            ))
        }
        TokenKind::Star => {
            parser.advance();
            let operand = parse_expression(parser, 8)?;
            let type_info = operand.meta.type_info.clone();
            Ok(Expr::new(
                ExprKind::Unary {
                    operator: UnaryOp::Deref,
                    operand: Box::new(operand),
                },
                NodeMeta::new(type_info, location),
            ))
        }
        TokenKind::Amp => {
            parser.advance();
            let operand = parse_expression(parser, 8)?;
            Ok(Expr::new(
                ExprKind::Unary {
                    operator: UnaryOp::AddressOf,
                    operand: Box::new(operand),
                },
                NodeMeta::new(TypeInfo::simple(SourceType::Ptr), location),
            ))
        }
        _ => parse_postfix(parser),
    }
}

fn parse_postfix(parser: &mut Parser) -> Result<Expr, ParseError> {
    let mut expr = parse_primary(parser)?;
    loop {
        match parser.peek_kind() {
            TokenKind::LParen => {
                let arguments = parse_argument_list(parser)?;
                let location = expr.meta.location.clone();
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        arguments,
                    },
                    NodeMeta::new(TypeInfo::simple(SourceType::Id("<unresolved>".into())), location),
                );
            }
            TokenKind::LBracket => {
                parser.advance();
                let index = parse_expression(parser, 0)?;
                parser.expect(TokenKind::RBracket, "']'")?;
                let location = expr.meta.location.clone();
                expr = Expr::new(
                    ExprKind::IndexAccess {
                        target: Box::new(expr),
                        index: Box::new(index),
                    },
                    NodeMeta::new(TypeInfo::simple(SourceType::Id("<unresolved>".into())), location),
                );
            }
            TokenKind::Arrow => {
                parser.advance();
                let field_token = parser.expect(TokenKind::Identifier, "field name")?;
                let field = field_token.lexeme();
                let location = expr.meta.location.clone();
                expr = Expr::new(
                    ExprKind::ArrowExpression {
                        target: Box::new(expr),
                        field,
                    },
                    NodeMeta::new(TypeInfo::simple(SourceType::Id("<unresolved>".into())), location),
                );
            }
            _ => break,
        }
    }
    Ok(expr)
}

fn parse_argument_list(parser: &mut Parser) -> Result<Vec<Expr>, ParseError> {
    parser.expect(TokenKind::LParen, "'('")?;
    let mut args = Vec::new();
    if !parser.check(TokenKind::RParen) {
        loop {
            args.push(parse_expression(parser, 0)?);
            if !parser.matches(TokenKind::Comma) {
                break;
            }
        }
    }
    if !parser.check(TokenKind::RParen) {
        return Err(ParseError::new(
            ParseErrorKind::UnexpectedInArgumentList(parser.peek_kind()),
            parser.loc(),
        ));
    }
    parser.advance();
    Ok(args)
}

pub(crate) fn parse_type_name(parser: &mut Parser) -> Result<SourceType, ParseError> {
    let token = parser.advance();
    let name = match &token.value {
        TokenValue::Identifier(name) => name.clone(),
        _ => token.lexeme(),
    };
    if parser.matches(TokenKind::Star) {
        return Ok(match name.as_str() {
            "i8" | "char" => SourceType::I8Ptr,
            "void" => SourceType::VoidPtr,
            _ => SourceType::Ptr,
        });
    }
    SourceType::from_keyword(&name)
        .ok_or_else(|| ParseError::new(ParseErrorKind::UnknownTypeName(name), token.location))
}

fn parse_primary(parser: &mut Parser) -> Result<Expr, ParseError> {
    let location = parser.loc();
    let token = parser.peek().clone();

    match token.kind {
        TokenKind::Int => {
            parser.advance();
            let TokenValue::Int(value) = token.value else {
                unreachable!()
            };
            Ok(Expr::new(
                ExprKind::IntLiteral(value),
                NodeMeta::new(TypeInfo::simple(SourceType::Int), location),
            ))
        }
        TokenKind::Float => {
            parser.advance();
            let TokenValue::Float(value) = token.value else {
                unreachable!()
            };
            Ok(Expr::new(
                ExprKind::FloatLiteral(value),
                NodeMeta::new(TypeInfo::simple(SourceType::Float), location),
            ))
        }
        TokenKind::Str => {
            parser.advance();
            let TokenValue::Str(value) = token.value else {
                unreachable!()
            };
            Ok(Expr::new(
                ExprKind::StringLiteral(value),
                NodeMeta::new(TypeInfo::simple(SourceType::String), location),
            ))
        }
        TokenKind::Binary => {
            parser.advance();
            let TokenValue::Binary(value) = token.value else {
                unreachable!()
            };
            Ok(Expr::new(
                ExprKind::BinaryLiteral(value),
                NodeMeta::new(TypeInfo::simple(SourceType::Binary), location),
            ))
        }
        TokenKind::True | TokenKind::False => {
            parser.advance();
            Ok(Expr::new(
                ExprKind::BooleanLiteral(token.kind == TokenKind::True),
                NodeMeta::new(TypeInfo::simple(SourceType::Bool), location),
            ))
        }
        TokenKind::Null => {
            parser.advance();
            Ok(Expr::new(
                ExprKind::NullLiteral,
                NodeMeta::new(TypeInfo::simple(SourceType::Null), location),
            ))
        }
        TokenKind::LBracket => {
            parser.advance();
            let mut elements = Vec::new();
            if !parser.check(TokenKind::RBracket) {
                loop {
                    elements.push(parse_expression(parser, 0)?);
                    if !parser.matches(TokenKind::Comma) {
                        break;
                    }
                }
            }
            parser.expect(TokenKind::RBracket, "']'")?;
            let element_type = elements
                .first()
                .map(|e| e.meta.type_info.base_type.clone())
                .unwrap_or(SourceType::Void);
            Ok(Expr::new(
                ExprKind::ArrayLiteral { elements, element_type },
                NodeMeta::new(TypeInfo::simple(SourceType::Id("array".into())), location),
            ))
        }
        TokenKind::Cast => {
            parser.advance();
            parser.expect(TokenKind::LParen, "'('")?;
            let expr = parse_expression(parser, 0)?;
            parser.expect(TokenKind::Comma, "','")?;
            let target_type = parse_type_name(parser)?;
            parser.expect(TokenKind::RParen, "')'")?;
            Ok(Expr::new(
                ExprKind::Cast {
                    expr: Box::new(expr),
                    target_type: target_type.clone(),
                },
                NodeMeta::new(TypeInfo::simple(target_type), location),
            ))
        }
        TokenKind::LParen => {
            parser.advance();
            let inner = parse_expression(parser, 0)?;
            parser.expect(TokenKind::RParen, "')'")?;
            Ok(inner)
        }
        TokenKind::Identifier => {
            parser.advance();
            let TokenValue::Identifier(name) = token.value else {
                unreachable!()
            };
            if parser.allow_struct_literal && parser.check(TokenKind::LBrace) {
                return parse_struct_expr(parser, name, location);
            }
            Ok(Expr::new(
                ExprKind::Identifier(name),
                NodeMeta::new(TypeInfo::simple(SourceType::Id("<unresolved>".into())), location),
            ))
        }
        other => Err(ParseError::new(
            ParseErrorKind::NoPrefixParser(other),
            location,
        )),
    }
}

fn parse_struct_expr(parser: &mut Parser, name: String, location: crate::location::Location) -> Result<Expr, ParseError> {
    parser.expect(TokenKind::LBrace, "'{'")?;
    let mut fields = Vec::new();
    if !parser.check(TokenKind::RBrace) {
        loop {
            let field_name = parser.expect(TokenKind::Identifier, "field name")?.lexeme();
            parser.expect(TokenKind::Colon, "':'")?;
            let value = parse_expression(parser, 0)?;
            fields.push(StructFieldInit {
                name: field_name,
                value,
            });
            if !parser.matches(TokenKind::Comma) {
                break;
            }
        }
    }
    parser.expect(TokenKind::RBrace, "'}'")?;
    Ok(Expr::new(
        ExprKind::StructExpr {
            name: name.clone(),
            fields,
        },
        NodeMeta::new(TypeInfo::struct_named(name), location),
    ))
}

/// Parses an expression with struct-literal parsing disabled, for use as
/// an `if`/`while`/`for` condition or range bound.
pub(crate) fn parse_condition_expression(parser: &mut Parser) -> Result<Expr, ParseError> {
    let previous = parser.allow_struct_literal;
    parser.allow_struct_literal = false;
    let result = parse_expression(parser, 0);
    parser.allow_struct_literal = previous;
    result
}
