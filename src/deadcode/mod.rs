//! Dead-code elimination: drops top-level function and variable
//! declarations that semantic analysis never marked as referenced,
//! reporting one warning per dropped declaration.

use std::collections::HashSet;

use crate::ast::Program;
use crate::diagnostics::DiagnosticBag;

pub fn remove_dead_code(
    program: Program,
    identifiers_used: &HashSet<String>,
    diagnostics: &mut DiagnosticBag,
) -> Program {
    let body = program
        .body
        .into_iter()
        .filter(|stmt| match stmt.declared_name() {
            Some(name) if !identifiers_used.contains(name) => {
                diagnostics.warning(
                    stmt.meta.location.clone(),
                    format!("'{name}' is never used and was removed"),
                );
                false
            }
            _ => true,
        })
        .collect();
    Program { body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeMeta, SourceType, Stmt, StmtKind, TypeInfo};
    use crate::location::Location;

    fn unused_function(name: &str) -> Stmt {
        Stmt::new(
            StmtKind::FunctionDeclaration {
                id: name.to_owned(),
                args: Vec::new(),
                return_types: vec![SourceType::Void],
                block: Vec::new(),
                scope: None,
            },
            NodeMeta::new(TypeInfo::void(), Location::synthetic()),
        )
    }

    #[test]
    fn drops_unreferenced_top_level_functions() {
        let program = Program {
            body: vec![unused_function("helper"), unused_function("main")],
        };
        let mut used = HashSet::new();
        used.insert("main".to_owned());
        let mut diagnostics = DiagnosticBag::default();
        let result = remove_dead_code(program, &used, &mut diagnostics);
        assert_eq!(result.body.len(), 1);
        assert_eq!(result.body[0].declared_name(), Some("main"));
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn leaves_statements_without_a_declared_name_untouched() {
        let expr_stmt = Stmt::new(
            StmtKind::ExpressionStatement {
                expr: crate::ast::Expr::new(
                    crate::ast::ExprKind::IntLiteral(1),
                    NodeMeta::new(TypeInfo::simple(SourceType::Int), Location::synthetic()),
                ),
            },
            NodeMeta::new(TypeInfo::void(), Location::synthetic()),
        );
        let program = Program {
            body: vec![expr_stmt],
        };
        let mut diagnostics = DiagnosticBag::default();
        let result = remove_dead_code(program, &HashSet::new(), &mut diagnostics);
        assert_eq!(result.body.len(), 1);
        assert!(diagnostics.all().is_empty());
    }
}
