//! Constant folding: collapses literal arithmetic, comparisons, and string
//! concatenation into a single literal node wherever both operands of a
//! binary expression are already literals.

use crate::ast::{BinaryOp, Expr, ExprKind, Program, Stmt, StmtKind};
use crate::diagnostics::DiagnosticBag;
use crate::location::Location;

pub fn optimize(program: Program, diagnostics: &mut DiagnosticBag) -> Program {
    let body = program
        .body
        .into_iter()
        .map(|stmt| fold_stmt(stmt, diagnostics))
        .collect();
    Program { body }
}

fn fold_stmt(stmt: Stmt, diagnostics: &mut DiagnosticBag) -> Stmt {
    let meta = stmt.meta;
    let kind = match stmt.kind {
        StmtKind::VariableDeclaration {
            id,
            declared_type,
            value,
            mutable,
        } => StmtKind::VariableDeclaration {
            id,
            declared_type,
            value: fold_expr(value, diagnostics),
            mutable,
        },
        StmtKind::AssignmentDeclaration { id, value } => StmtKind::AssignmentDeclaration {
            id,
            value: fold_expr(value, diagnostics),
        },
        StmtKind::FunctionDeclaration {
            id,
            args,
            return_types,
            block,
            scope,
        } => StmtKind::FunctionDeclaration {
            id,
            args,
            return_types,
            block: fold_block(block, diagnostics),
            scope,
        },
        StmtKind::ReturnStatement { expr } => StmtKind::ReturnStatement {
            expr: expr.map(|e| fold_expr(e, diagnostics)),
        },
        StmtKind::IfStatement {
            condition,
            primary,
            secondary,
        } => StmtKind::IfStatement {
            condition: fold_expr(condition, diagnostics),
            primary: fold_block(primary, diagnostics),
            secondary: secondary.map(|s| Box::new(fold_stmt(*s, diagnostics))),
        },
        StmtKind::ElifStatement {
            condition,
            primary,
            secondary,
        } => StmtKind::ElifStatement {
            condition: fold_expr(condition, diagnostics),
            primary: fold_block(primary, diagnostics),
            secondary: secondary.map(|s| Box::new(fold_stmt(*s, diagnostics))),
        },
        StmtKind::ElseStatement { primary } => StmtKind::ElseStatement {
            primary: fold_block(primary, diagnostics),
        },
        StmtKind::WhileStatement { condition, block } => StmtKind::WhileStatement {
            condition: fold_expr(condition, diagnostics),
            block: fold_block(block, diagnostics),
        },
        StmtKind::ForRangeStatement {
            id,
            from,
            to,
            step,
            inclusive,
            block,
        } => StmtKind::ForRangeStatement {
            id,
            from: fold_expr(from, diagnostics),
            to: fold_expr(to, diagnostics),
            step: step.map(|s| fold_expr(s, diagnostics)),
            inclusive,
            block: fold_block(block, diagnostics),
        },
        StmtKind::StructPAssignment {
            target,
            field,
            value,
        } => StmtKind::StructPAssignment {
            target: Box::new(fold_expr(*target, diagnostics)),
            field,
            value: fold_expr(value, diagnostics),
        },
        StmtKind::ExpressionStatement { expr } => StmtKind::ExpressionStatement {
            expr: fold_expr(expr, diagnostics),
        },
        other @ (StmtKind::ImportStatement { .. }
        | StmtKind::ExternStatement { .. }
        | StmtKind::StructStatement { .. }) => other,
    };
    Stmt::new(kind, meta)
}

fn fold_block(block: Vec<Stmt>, diagnostics: &mut DiagnosticBag) -> Vec<Stmt> {
    block.into_iter().map(|s| fold_stmt(s, diagnostics)).collect()
}

fn fold_expr(expr: Expr, diagnostics: &mut DiagnosticBag) -> Expr {
    let meta = expr.meta;
    match expr.kind {
        ExprKind::Binary {
            operator,
            left,
            right,
        } => {
            let left = fold_expr(*left, diagnostics);
            let right = fold_expr(*right, diagnostics);
            match fold_binary(operator, &left, &right, &meta.location, diagnostics) {
                Some(folded) => Expr::new(folded, meta),
                None => Expr::new(
                    ExprKind::Binary {
                        operator,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    meta,
                ),
            }
        }
        ExprKind::Unary { operator, operand } => {
            let operand = fold_expr(*operand, diagnostics);
            match fold_unary(operator, &operand) {
                Some(folded) => Expr::new(folded, meta),
                None => Expr::new(
                    ExprKind::Unary {
                        operator,
                        operand: Box::new(operand),
                    },
                    meta,
                ),
            }
        }
        ExprKind::Call { callee, arguments } => Expr::new(
            ExprKind::Call {
                callee: Box::new(fold_expr(*callee, diagnostics)),
                arguments: arguments.into_iter().map(|a| fold_expr(a, diagnostics)).collect(),
            },
            meta,
        ),
        ExprKind::Cast { expr, target_type } => Expr::new(
            ExprKind::Cast {
                expr: Box::new(fold_expr(*expr, diagnostics)),
                target_type,
            },
            meta,
        ),
        ExprKind::ArrayLiteral {
            elements,
            element_type,
        } => Expr::new(
            ExprKind::ArrayLiteral {
                elements: elements.into_iter().map(|e| fold_expr(e, diagnostics)).collect(),
                element_type,
            },
            meta,
        ),
        ExprKind::IndexAccess { target, index } => Expr::new(
            ExprKind::IndexAccess {
                target: Box::new(fold_expr(*target, diagnostics)),
                index: Box::new(fold_expr(*index, diagnostics)),
            },
            meta,
        ),
        ExprKind::StructExpr { name, fields } => Expr::new(
            ExprKind::StructExpr {
                name,
                fields: fields
                    .into_iter()
                    .map(|f| crate::ast::StructFieldInit {
                        name: f.name,
                        value: fold_expr(f.value, diagnostics),
                    })
                    .collect(),
            },
            meta,
        ),
        ExprKind::ArrowExpression { target, field } => Expr::new(
            ExprKind::ArrowExpression {
                target: Box::new(fold_expr(*target, diagnostics)),
                field,
            },
            meta,
        ),
        literal => Expr::new(literal, meta),
    }
}

fn fold_unary(operator: crate::ast::UnaryOp, operand: &Expr) -> Option<ExprKind> {
    use crate::ast::UnaryOp::*;
    match (operator, &operand.kind) {
        (Neg, ExprKind::IntLiteral(n)) => Some(ExprKind::IntLiteral(-n)),
        (Neg, ExprKind::FloatLiteral(n)) => Some(ExprKind::FloatLiteral(-n)),
        (Not, ExprKind::BooleanLiteral(b)) => Some(ExprKind::BooleanLiteral(!b)),
        _ => None,
    }
}

fn fold_binary(
    operator: BinaryOp,
    left: &Expr,
    right: &Expr,
    location: &Location,
    diagnostics: &mut DiagnosticBag,
) -> Option<ExprKind> {
    use BinaryOp::*;
    match (&left.kind, &right.kind) {
        (ExprKind::StringLiteral(a), ExprKind::StringLiteral(b)) if operator == Add => {
            Some(ExprKind::StringLiteral(format!("{a}{b}")))
        }
        (ExprKind::StringLiteral(a), other) if operator == Add => {
            Some(ExprKind::StringLiteral(format!("{a}{}", stringify_literal(other))))
        }
        (other, ExprKind::StringLiteral(b)) if operator == Add => {
            Some(ExprKind::StringLiteral(format!("{}{b}", stringify_literal(other))))
        }
        (ExprKind::IntLiteral(a), ExprKind::IntLiteral(b)) => fold_int_pair(operator, *a, *b, location, diagnostics),
        (ExprKind::FloatLiteral(a), ExprKind::FloatLiteral(b)) => fold_float_pair(operator, *a, *b, location, diagnostics),
        (ExprKind::IntLiteral(a), ExprKind::FloatLiteral(b)) => {
            fold_float_pair(operator, *a as f64, *b, location, diagnostics)
        }
        (ExprKind::FloatLiteral(a), ExprKind::IntLiteral(b)) => {
            fold_float_pair(operator, *a, *b as f64, location, diagnostics)
        }
        (ExprKind::BooleanLiteral(a), ExprKind::BooleanLiteral(b)) => match operator {
            And => Some(ExprKind::BooleanLiteral(*a && *b)),
            Or => Some(ExprKind::BooleanLiteral(*a || *b)),
            Eq => Some(ExprKind::BooleanLiteral(a == b)),
            NotEq => Some(ExprKind::BooleanLiteral(a != b)),
            _ => None,
        },
        _ => None,
    }
}

fn stringify_literal(kind: &ExprKind) -> String {
    match kind {
        ExprKind::IntLiteral(n) => n.to_string(),
        ExprKind::FloatLiteral(n) => n.to_string(),
        ExprKind::BooleanLiteral(b) => b.to_string(),
        ExprKind::StringLiteral(s) => s.clone(),
        _ => String::new(),
    }
}

/// Floor division: rounds the quotient toward negative infinity rather
/// than toward zero, so `7 / -2` folds to `-4`, not `-3`.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Floor modulo: the remainder takes the divisor's sign, consistent with
/// `floor_div` (`a == floor_div(a, b) * b + floor_mod(a, b)`).
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

fn fold_int_pair(
    operator: BinaryOp,
    a: i64,
    b: i64,
    location: &Location,
    diagnostics: &mut DiagnosticBag,
) -> Option<ExprKind> {
    use BinaryOp::*;
    match operator {
        Add => Some(ExprKind::IntLiteral(a.wrapping_add(b))),
        Sub => Some(ExprKind::IntLiteral(a.wrapping_sub(b))),
        Mul => Some(ExprKind::IntLiteral(a.wrapping_mul(b))),
        Div => {
            if b == 0 {
                diagnostics.error(location.clone(), "division by zero in constant expression");
                None
            } else {
                Some(ExprKind::IntLiteral(floor_div(a, b)))
            }
        }
        Mod | ModMod => {
            if b == 0 {
                diagnostics.error(location.clone(), "modulo by zero in constant expression");
                None
            } else {
                Some(ExprKind::IntLiteral(floor_mod(a, b)))
            }
        }
        Pow => Some(ExprKind::IntLiteral(a.pow(b.max(0) as u32))),
        Eq => Some(ExprKind::BooleanLiteral(a == b)),
        NotEq => Some(ExprKind::BooleanLiteral(a != b)),
        Lt => Some(ExprKind::BooleanLiteral(a < b)),
        Gt => Some(ExprKind::BooleanLiteral(a > b)),
        Lte => Some(ExprKind::BooleanLiteral(a <= b)),
        Gte => Some(ExprKind::BooleanLiteral(a >= b)),
        And | Or => None,
    }
}

fn fold_float_pair(
    operator: BinaryOp,
    a: f64,
    b: f64,
    location: &Location,
    diagnostics: &mut DiagnosticBag,
) -> Option<ExprKind> {
    use BinaryOp::*;
    match operator {
        Add => Some(ExprKind::FloatLiteral(a + b)),
        Sub => Some(ExprKind::FloatLiteral(a - b)),
        Mul => Some(ExprKind::FloatLiteral(a * b)),
        Div => {
            if b == 0.0 {
                diagnostics.error(location.clone(), "division by zero in constant expression");
                None
            } else {
                Some(ExprKind::FloatLiteral(a / b))
            }
        }
        Mod | ModMod => {
            if b == 0.0 {
                diagnostics.error(location.clone(), "modulo by zero in constant expression");
                None
            } else {
                Some(ExprKind::FloatLiteral(a % b))
            }
        }
        Pow => Some(ExprKind::FloatLiteral(a.powf(b))),
        Eq => Some(ExprKind::BooleanLiteral(a == b)),
        NotEq => Some(ExprKind::BooleanLiteral(a != b)),
        Lt => Some(ExprKind::BooleanLiteral(a < b)),
        Gt => Some(ExprKind::BooleanLiteral(a > b)),
        Lte => Some(ExprKind::BooleanLiteral(a <= b)),
        Gte => Some(ExprKind::BooleanLiteral(a >= b)),
        And | Or => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::Parser;

    fn optimize_source(source: &str) -> Program {
        let mut diagnostics = DiagnosticBag::default();
        let tokens = lex("test.fp", source, ".", &mut diagnostics, false).unwrap();
        let program = Parser::parse(tokens, &mut diagnostics);
        optimize(program, &mut diagnostics)
    }

    #[test]
    fn folds_arithmetic_precedence() {
        let program = optimize_source("new x = 1 + 2 * 3");
        let StmtKind::VariableDeclaration { value, .. } = &program.body[0].kind else {
            panic!("expected a variable declaration");
        };
        assert_eq!(value.kind, ExprKind::IntLiteral(7));
    }

    #[test]
    fn folding_is_idempotent() {
        let once = optimize_source("new x = 1 + 2 * 3");
        let mut diagnostics = DiagnosticBag::default();
        let twice = optimize(once.clone(), &mut diagnostics);
        assert_eq!(once, twice);
    }

    #[test]
    fn division_by_zero_literal_reports_a_diagnostic_and_leaves_the_expression_unfolded() {
        let mut diagnostics = DiagnosticBag::default();
        let tokens = lex("test.fp", "new x = 1 / 0", ".", &mut diagnostics, false).unwrap();
        let program = Parser::parse(tokens, &mut diagnostics);
        let program = optimize(program, &mut diagnostics);
        assert!(diagnostics.has_errors());
        let StmtKind::VariableDeclaration { value, .. } = &program.body[0].kind else {
            panic!("expected a variable declaration");
        };
        assert!(matches!(value.kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn string_concatenation_folds_to_a_single_literal() {
        let program = optimize_source(r#"new x = "a" + "b""#);
        let StmtKind::VariableDeclaration { value, .. } = &program.body[0].kind else {
            panic!("expected a variable declaration");
        };
        assert_eq!(value.kind, ExprKind::StringLiteral("ab".to_owned()));
    }
}
