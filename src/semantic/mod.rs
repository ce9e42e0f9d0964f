//! The semantic analyzer: scope/type/symbol engine with type promotion.
//! Recursive descent over the parsed AST, producing a new AST of the
//! same shape with `type`, `llvm_type`, and (for function declarations)
//! `scope` filled in.

pub mod error;
pub mod functions;
pub mod scope;
pub mod type_checker;

pub use error::{SemanticError, SemanticErrorKind};
pub use functions::{FunctionMeta, FunctionParam, FunctionRegistry};
pub use scope::ScopeStack;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::ast::{
    Expr, ExprKind, LlvmType, Program, SourceType, Stmt, StmtKind, SymbolInfo, TypeInfo,
};
use crate::diagnostics::DiagnosticBag;
use crate::lexer::lex;
use crate::location::Location;
use crate::parser::Parser;
use crate::stdlib::StandardLibrary;

pub struct Analyzer<'a> {
    pub scope: ScopeStack,
    pub functions: FunctionRegistry,
    pub identifiers_used: HashSet<String>,
    imported_stdlib_modules: HashSet<String>,
    stdlib: &'a StandardLibrary,
    directory: PathBuf,
    diagnostics: &'a mut DiagnosticBag,
}

/// Result of a full semantic pass: the annotated program plus the data the
/// dead-code analyzer and IR emitter need next.
pub struct AnalyzedProgram {
    pub program: Program,
    pub identifiers_used: HashSet<String>,
    pub functions: FunctionRegistry,
    pub imported_stdlib_modules: HashSet<String>,
}

pub fn analyze(
    program: Program,
    directory: impl AsRef<Path>,
    stdlib: &StandardLibrary,
    diagnostics: &mut DiagnosticBag,
) -> AnalyzedProgram {
    let mut analyzer = Analyzer {
        scope: ScopeStack::new(),
        functions: FunctionRegistry::new(),
        identifiers_used: HashSet::new(),
        imported_stdlib_modules: HashSet::new(),
        stdlib,
        directory: directory.as_ref().to_path_buf(),
        diagnostics,
    };

    let body = analyzer.analyze_block(program.body);

    AnalyzedProgram {
        program: Program { body },
        identifiers_used: analyzer.identifiers_used,
        functions: analyzer.functions,
        imported_stdlib_modules: analyzer.imported_stdlib_modules,
    }
}

impl<'a> Analyzer<'a> {
    fn report(&mut self, error: SemanticError) {
        self.diagnostics.error(error.location.clone(), error.kind.to_string());
    }

    fn analyze_block(&mut self, stmts: Vec<Stmt>) -> Vec<Stmt> {
        let mut prelude = Vec::new();
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            match self.analyze_stmt(stmt) {
                Ok(StmtOutcome::Single(s)) => out.push(s),
                Ok(StmtOutcome::Many(mut many)) => {
                    prelude.append(&mut many);
                }
                Err(err) => self.report(err),
            }
        }
        prelude.append(&mut out);
        prelude
    }

    fn analyze_stmt(&mut self, stmt: Stmt) -> Result<StmtOutcome, SemanticError> {
        let location = stmt.meta.location.clone();
        match stmt.kind {
            StmtKind::VariableDeclaration {
                id,
                declared_type,
                value,
                mutable,
            } => {
                if self.scope.exists_in_current_frame(&id) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::DuplicateDeclaration(id),
                        location,
                    ));
                }
                let value = self.analyze_expr(value)?;
                let source_type = declared_type.unwrap_or_else(|| value.meta.type_info.base_type.clone());
                // an array literal is always emitted as a pointer to its backing
                // stack allocation, never as the bare element type it holds.
                let llvm_type = if value.meta.type_info.is_array {
                    LlvmType::Ptr
                } else {
                    type_checker::map_source_type(&source_type)
                };
                self.scope.declare(SymbolInfo {
                    id: id.clone(),
                    source_type: source_type.clone(),
                    llvm_type: llvm_type.clone(),
                    mutable,
                    initialized: true,
                    location: location.clone(),
                });
                let mut meta = stmt.meta;
                meta.type_info = TypeInfo::simple(source_type);
                meta.llvm_type = Some(llvm_type);
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::VariableDeclaration {
                        id,
                        declared_type: None,
                        value,
                        mutable,
                    },
                    meta,
                )))
            }
            StmtKind::AssignmentDeclaration { id, value } => {
                let ExprKind::Identifier(name) = &id.kind else {
                    return Err(SemanticError::new(
                        SemanticErrorKind::InvalidAssignmentTarget,
                        location,
                    ));
                };
                let name = name.clone();
                let symbol = self
                    .scope
                    .resolve(&name)
                    .ok_or_else(|| {
                        SemanticError::new(SemanticErrorKind::UndefinedIdentifier(name.clone()), location.clone())
                    })?
                    .clone();
                if !symbol.mutable {
                    return Err(SemanticError::new(
                        SemanticErrorKind::AssignToImmutable(name.clone()),
                        location,
                    ));
                }
                self.identifiers_used.insert(name.clone());
                let value = self.analyze_expr(value)?;
                let id_expr = self.analyze_expr(*id)?;
                let mut meta = stmt.meta;
                meta.type_info = TypeInfo::simple(symbol.source_type);
                meta.llvm_type = Some(symbol.llvm_type);
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::AssignmentDeclaration {
                        id: Box::new(id_expr),
                        value,
                    },
                    meta,
                )))
            }
            StmtKind::FunctionDeclaration {
                id,
                args,
                return_types,
                block,
                scope: _,
            } => {
                if self.functions.contains(&id) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::DuplicateFunction(id),
                        location,
                    ));
                }

                let return_type = return_types.first().cloned().unwrap_or(SourceType::Void);
                let params: Vec<FunctionParam> = args
                    .iter()
                    .map(|a| FunctionParam {
                        name: a.id.clone(),
                        source_type: a.source_type.clone(),
                        llvm_type: type_checker::map_source_type(&a.source_type),
                    })
                    .collect();

                // register before analyzing the body so recursive calls resolve.
                self.functions.register(FunctionMeta {
                    name: id.clone(),
                    params: params.clone(),
                    return_type: return_type.clone(),
                    llvm_type: type_checker::map_source_type(&return_type),
                    is_variadic: false,
                    is_stdlib: false,
                    is_extern: false,
                    llvm_name: None,
                    ir_declaration: None,
                });

                self.scope.push_frame();
                let mut annotated_args = Vec::with_capacity(args.len());
                for arg in args {
                    let llvm_type = type_checker::map_source_type(&arg.source_type);
                    self.scope.declare(SymbolInfo {
                        id: arg.id.clone(),
                        source_type: arg.source_type.clone(),
                        llvm_type: llvm_type.clone(),
                        mutable: true,
                        initialized: true,
                        location: location.clone(),
                    });
                    let default = match arg.default {
                        Some(expr) => Some(self.analyze_expr(expr)?),
                        None => None,
                    };
                    annotated_args.push(crate::ast::FunctionArg {
                        id: arg.id,
                        source_type: arg.source_type,
                        llvm_type: Some(llvm_type),
                        default,
                    });
                }

                let analyzed_block = self.analyze_block(block);

                if !matches!(return_type, SourceType::Void) && !returns_on_all_paths(&analyzed_block) {
                    self.report(SemanticError::new(
                        SemanticErrorKind::MissingReturn(id.clone(), return_type.to_string()),
                        location.clone(),
                    ));
                }

                let captured = self.scope.pop_frame();

                let mut meta = stmt.meta;
                meta.type_info = TypeInfo::simple(return_type);
                meta.llvm_type = self.functions.get(&id).map(|f| f.llvm_type.clone());
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::FunctionDeclaration {
                        id,
                        args: annotated_args,
                        return_types,
                        block: analyzed_block,
                        scope: Some(captured),
                    },
                    meta,
                )))
            }
            StmtKind::ReturnStatement { expr } => {
                let expr = match expr {
                    Some(e) => Some(self.analyze_expr(e)?),
                    None => None,
                };
                let mut meta = stmt.meta;
                if let Some(e) = &expr {
                    meta.type_info = e.meta.type_info.clone();
                    meta.llvm_type = e.meta.llvm_type.clone();
                }
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::ReturnStatement { expr },
                    meta,
                )))
            }
            StmtKind::IfStatement {
                condition,
                primary,
                secondary,
            } => {
                let condition = self.analyze_expr(condition)?;
                let primary = self.analyze_block(primary);
                let secondary = match secondary {
                    Some(s) => Some(Box::new(self.analyze_single(*s)?)),
                    None => None,
                };
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::IfStatement {
                        condition,
                        primary,
                        secondary,
                    },
                    stmt.meta,
                )))
            }
            StmtKind::ElifStatement {
                condition,
                primary,
                secondary,
            } => {
                let condition = self.analyze_expr(condition)?;
                let primary = self.analyze_block(primary);
                let secondary = match secondary {
                    Some(s) => Some(Box::new(self.analyze_single(*s)?)),
                    None => None,
                };
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::ElifStatement {
                        condition,
                        primary,
                        secondary,
                    },
                    stmt.meta,
                )))
            }
            StmtKind::ElseStatement { primary } => {
                let primary = self.analyze_block(primary);
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::ElseStatement { primary },
                    stmt.meta,
                )))
            }
            StmtKind::WhileStatement { condition, block } => {
                let condition = self.analyze_expr(condition)?;
                let block = self.analyze_block(block);
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::WhileStatement { condition, block },
                    stmt.meta,
                )))
            }
            StmtKind::ForRangeStatement {
                id,
                from,
                to,
                step,
                inclusive,
                block,
            } => {
                let from = self.analyze_expr(from)?;
                let to = self.analyze_expr(to)?;
                let step = match step {
                    Some(s) => Some(self.analyze_expr(s)?),
                    None => None,
                };
                if let Some(name) = &id {
                    self.scope.declare(SymbolInfo {
                        id: name.clone(),
                        source_type: SourceType::Int,
                        llvm_type: LlvmType::I32,
                        mutable: true,
                        initialized: true,
                        location: location.clone(),
                    });
                }
                let block = self.analyze_block(block);
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::ForRangeStatement {
                        id,
                        from,
                        to,
                        step,
                        inclusive,
                        block,
                    },
                    stmt.meta,
                )))
            }
            StmtKind::ImportStatement { path, is_stdlib } => {
                if is_stdlib {
                    self.analyze_stdlib_import(&path, &location)?;
                    Ok(StmtOutcome::Single(Stmt::new(
                        StmtKind::ImportStatement { path, is_stdlib },
                        stmt.meta,
                    )))
                } else {
                    let nodes = self.analyze_external_import(&path, &location)?;
                    Ok(StmtOutcome::Many(nodes))
                }
            }
            StmtKind::ExternStatement { functions, code } => {
                for f in &functions {
                    self.functions.register(FunctionMeta {
                        name: f.name.clone(),
                        params: f
                            .params
                            .iter()
                            .enumerate()
                            .map(|(i, t)| FunctionParam {
                                name: format!("arg{i}"),
                                source_type: t.clone(),
                                llvm_type: type_checker::map_source_type(t),
                            })
                            .collect(),
                        return_type: f.return_type.clone(),
                        llvm_type: type_checker::map_source_type(&f.return_type),
                        is_variadic: f.is_variadic,
                        is_stdlib: false,
                        is_extern: true,
                        llvm_name: None,
                        ir_declaration: None,
                    });
                }
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::ExternStatement { functions, code },
                    stmt.meta,
                )))
            }
            StmtKind::StructStatement { name, fields } => Ok(StmtOutcome::Single(Stmt::new(
                StmtKind::StructStatement { name, fields },
                stmt.meta,
            ))),
            StmtKind::StructPAssignment {
                target,
                field,
                value,
            } => {
                let target = self.analyze_expr(*target)?;
                let value = self.analyze_expr(value)?;
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::StructPAssignment {
                        target: Box::new(target),
                        field,
                        value,
                    },
                    stmt.meta,
                )))
            }
            StmtKind::ExpressionStatement { expr } => {
                let expr = self.analyze_expr(expr)?;
                let mut meta = stmt.meta;
                meta.type_info = expr.meta.type_info.clone();
                meta.llvm_type = expr.meta.llvm_type.clone();
                Ok(StmtOutcome::Single(Stmt::new(
                    StmtKind::ExpressionStatement { expr },
                    meta,
                )))
            }
        }
    }

    fn analyze_single(&mut self, stmt: Stmt) -> Result<Stmt, SemanticError> {
        match self.analyze_stmt(stmt)? {
            StmtOutcome::Single(s) => Ok(s),
            StmtOutcome::Many(mut many) => Ok(many.pop().expect("else/elif never expands to many")),
        }
    }

    fn analyze_stdlib_import(&mut self, module: &str, location: &Location) -> Result<(), SemanticError> {
        if self.imported_stdlib_modules.contains(module) {
            // first import registers, subsequent imports are silent no-ops
            return Ok(());
        }
        let Some(def) = self.stdlib.module(module) else {
            return Err(SemanticError::new(
                SemanticErrorKind::UnknownStdlibModule(module.to_owned()),
                location.clone(),
            ));
        };
        for f in &def.functions {
            self.functions.register(FunctionMeta {
                name: f.name.clone(),
                params: f
                    .params
                    .iter()
                    .enumerate()
                    .map(|(i, t)| FunctionParam {
                        name: format!("arg{i}"),
                        source_type: t.clone(),
                        llvm_type: type_checker::map_source_type(t),
                    })
                    .collect(),
                return_type: f.return_type.clone(),
                llvm_type: type_checker::map_source_type(&f.return_type),
                is_variadic: f.is_variadic,
                is_stdlib: true,
                is_extern: false,
                llvm_name: f.llvm_name.clone(),
                ir_declaration: f.ir.clone(),
            });
        }
        self.imported_stdlib_modules.insert(module.to_owned());
        self.functions.mark_imported(module);
        Ok(())
    }

    fn analyze_external_import(
        &mut self,
        path: &str,
        location: &Location,
    ) -> Result<Vec<Stmt>, SemanticError> {
        let full_path = self.directory.join(path);
        let source = std::fs::read_to_string(&full_path).map_err(|err| {
            SemanticError::new(
                SemanticErrorKind::ModuleNotFound(path.to_owned(), err.to_string()),
                location.clone(),
            )
        })?;

        let file_name = full_path.to_string_lossy().into_owned();
        let sub_directory = full_path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut sub_diagnostics = DiagnosticBag::default();
        let Some(tokens) = lex(&file_name, &source, &sub_directory, &mut sub_diagnostics, false) else {
            self.diagnostics.extend(sub_diagnostics);
            return Ok(Vec::new());
        };
        let sub_program = Parser::parse(tokens, &mut sub_diagnostics);

        let mut sub_analyzer = Analyzer {
            scope: ScopeStack::new(),
            functions: FunctionRegistry::new(),
            identifiers_used: HashSet::new(),
            imported_stdlib_modules: HashSet::new(),
            stdlib: self.stdlib,
            directory: PathBuf::from(&sub_directory),
            diagnostics: &mut sub_diagnostics,
        };
        let analyzed_body = sub_analyzer.analyze_block(sub_program.body);

        // fold the sub-module's registered functions into our own registry
        // so calls to its functions resolve.
        for meta in sub_analyzer.functions.all() {
            if !self.functions.contains(&meta.name) {
                self.functions.register(meta.clone());
            }
        }

        self.diagnostics.extend(sub_diagnostics);

        // retain only whitelisted top-level nodes.
        Ok(analyzed_body
            .into_iter()
            .filter(|s| {
                matches!(
                    s.kind,
                    StmtKind::FunctionDeclaration { .. } | StmtKind::ImportStatement { .. }
                )
            })
            .collect())
    }

    fn analyze_expr(&mut self, expr: Expr) -> Result<Expr, SemanticError> {
        let location = expr.meta.location.clone();
        match expr.kind {
            ExprKind::Identifier(name) => {
                let symbol = self.scope.resolve(&name).ok_or_else(|| {
                    SemanticError::new(SemanticErrorKind::UndefinedIdentifier(name.clone()), location.clone())
                })?;
                let mut meta = expr.meta;
                meta.type_info = TypeInfo::simple(symbol.source_type.clone());
                meta.llvm_type = Some(symbol.llvm_type.clone());
                self.identifiers_used.insert(name.clone());
                Ok(Expr::new(ExprKind::Identifier(name), meta))
            }
            ExprKind::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.analyze_expr(*left)?;
                let right = self.analyze_expr(*right)?;
                let right_is_zero = matches!(&right.kind, ExprKind::IntLiteral(0))
                    || matches!(&right.kind, ExprKind::FloatLiteral(f) if *f == 0.0);
                let right_is_negative_int_literal = is_negative_int_literal(&right);
                let result_type = type_checker::check_binary_operator(
                    operator,
                    &left.meta.type_info.base_type,
                    &right.meta.type_info.base_type,
                    right_is_zero,
                    right_is_negative_int_literal,
                    &location,
                )?;
                let mut meta = expr.meta;
                meta.llvm_type = Some(type_checker::map_source_type(&result_type));
                meta.type_info = TypeInfo::simple(result_type);
                Ok(Expr::new(
                    ExprKind::Binary {
                        operator,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    meta,
                ))
            }
            ExprKind::Unary { operator, operand } => {
                let operand = self.analyze_expr(*operand)?;
                let mut meta = expr.meta;
                meta.type_info = match operator {
                    crate::ast::UnaryOp::Not => TypeInfo::simple(SourceType::Bool),
                    crate::ast::UnaryOp::AddressOf => TypeInfo::simple(SourceType::Ptr),
                    _ => operand.meta.type_info.clone(),
                };
                meta.llvm_type = Some(type_checker::map_source_type(&meta.type_info.base_type));
                Ok(Expr::new(
                    ExprKind::Unary {
                        operator,
                        operand: Box::new(operand),
                    },
                    meta,
                ))
            }
            ExprKind::Call { callee, arguments } => self.analyze_call(*callee, arguments, expr.meta),
            ExprKind::Cast { expr: inner, target_type } => {
                let inner = self.analyze_expr(*inner)?;
                let mut meta = expr.meta;
                meta.type_info = TypeInfo::simple(target_type.clone());
                meta.llvm_type = Some(type_checker::map_source_type(&target_type));
                Ok(Expr::new(
                    ExprKind::Cast {
                        expr: Box::new(inner),
                        target_type,
                    },
                    meta,
                ))
            }
            ExprKind::ArrayLiteral { elements, element_type } => {
                let mut analyzed = Vec::with_capacity(elements.len());
                for e in elements {
                    analyzed.push(self.analyze_expr(e)?);
                }
                let mut meta = expr.meta;
                meta.type_info = TypeInfo::array_of(element_type.clone(), 1);
                Ok(Expr::new(
                    ExprKind::ArrayLiteral {
                        elements: analyzed,
                        element_type,
                    },
                    meta,
                ))
            }
            ExprKind::IndexAccess { target, index } => {
                let target = self.analyze_expr(*target)?;
                let index = self.analyze_expr(*index)?;
                let element_type = target.meta.type_info.base_type.clone();
                let mut meta = expr.meta;
                meta.type_info = TypeInfo::simple(element_type.clone());
                meta.llvm_type = Some(type_checker::map_source_type(&element_type));
                Ok(Expr::new(
                    ExprKind::IndexAccess {
                        target: Box::new(target),
                        index: Box::new(index),
                    },
                    meta,
                ))
            }
            ExprKind::StructExpr { name, fields } => {
                let mut analyzed = Vec::with_capacity(fields.len());
                for f in fields {
                    analyzed.push(crate::ast::StructFieldInit {
                        name: f.name,
                        value: self.analyze_expr(f.value)?,
                    });
                }
                let mut meta = expr.meta;
                meta.type_info = TypeInfo::struct_named(name.clone());
                meta.llvm_type = Some(LlvmType::Struct(name.clone()));
                Ok(Expr::new(
                    ExprKind::StructExpr {
                        name,
                        fields: analyzed,
                    },
                    meta,
                ))
            }
            ExprKind::ArrowExpression { target, field } => {
                let target = self.analyze_expr(*target)?;
                let mut meta = expr.meta;
                meta.type_info = TypeInfo::simple(SourceType::Id(field.clone()));
                Ok(Expr::new(
                    ExprKind::ArrowExpression {
                        target: Box::new(target),
                        field,
                    },
                    meta,
                ))
            }
            literal @ (ExprKind::IntLiteral(_)
            | ExprKind::FloatLiteral(_)
            | ExprKind::StringLiteral(_)
            | ExprKind::BinaryLiteral(_)
            | ExprKind::BooleanLiteral(_)
            | ExprKind::NullLiteral) => {
                let mut meta = expr.meta;
                meta.llvm_type = Some(type_checker::map_source_type(&meta.type_info.base_type));
                Ok(Expr::new(literal, meta))
            }
        }
    }

    fn analyze_call(
        &mut self,
        callee: Expr,
        arguments: Vec<Expr>,
        meta: crate::ast::NodeMeta,
    ) -> Result<Expr, SemanticError> {
        let location = meta.location.clone();
        let ExprKind::Identifier(name) = &callee.kind else {
            let callee = self.analyze_expr(callee)?;
            let mut args = Vec::with_capacity(arguments.len());
            for a in arguments {
                args.push(self.analyze_expr(a)?);
            }
            return Ok(Expr::new(
                ExprKind::Call {
                    callee: Box::new(callee),
                    arguments: args,
                },
                meta,
            ));
        };
        let name = name.clone();

        let func = self
            .functions
            .get(&name)
            .ok_or_else(|| SemanticError::new(SemanticErrorKind::UndefinedFunction(name.clone()), location.clone()))?
            .clone();
        self.identifiers_used.insert(name.clone());

        if !func.is_variadic && arguments.len() != func.params.len() {
            return Err(SemanticError::new(
                SemanticErrorKind::ArityMismatch {
                    name: name.clone(),
                    expected: func.params.len(),
                    actual: arguments.len(),
                },
                location,
            ));
        }

        let mut analyzed_args = Vec::with_capacity(arguments.len());
        for (index, arg) in arguments.into_iter().enumerate() {
            let mut arg = self.analyze_expr(arg)?;
            if let Some(param) = func.params.get(index) {
                if matches!(param.source_type, SourceType::String)
                    && !matches!(arg.meta.type_info.base_type, SourceType::String)
                {
                    let arg_location = arg.meta.location.clone();
                    arg = Expr::new(
                        ExprKind::Cast {
                            expr: Box::new(arg),
                            target_type: SourceType::String,
                        },
                        crate::ast::NodeMeta::new(TypeInfo::simple(SourceType::String), arg_location),
                    );
                    arg.meta.llvm_type = Some(LlvmType::String);
                } else if !type_checker::compatible(&arg.meta.type_info.base_type, &param.source_type) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::TypeCheck(type_checker::TypeCheckError::new(
                            type_checker::TypeCheckErrorKind::IncompatibleOperands {
                                left: arg.meta.type_info.base_type.clone(),
                                right: param.source_type.clone(),
                                operator: "argument".to_owned(),
                            },
                            arg.meta.location.clone(),
                        )),
                        arg.meta.location.clone(),
                    ));
                } else if arg.meta.type_info.base_type != param.source_type {
                    arg.meta.llvm_type = Some(param.llvm_type.clone());
                }
            }
            analyzed_args.push(arg);
        }

        let callee = Expr::new(
            ExprKind::Identifier(name),
            crate::ast::NodeMeta {
                type_info: TypeInfo::simple(func.return_type.clone()),
                llvm_type: Some(func.llvm_type.clone()),
                location: callee.meta.location,
            },
        );

        let mut meta = meta;
        meta.type_info = TypeInfo::simple(func.return_type);
        meta.llvm_type = Some(func.llvm_type);

        Ok(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                arguments: analyzed_args,
            },
            meta,
        ))
    }
}

enum StmtOutcome {
    Single(Stmt),
    Many(Vec<Stmt>),
}

/// Whether `expr` is a negative integer literal as written in source —
/// either a raw negative literal, or the far more common `-3` shape the
/// parser actually produces (`Unary(Neg, IntLiteral(3))`, since the
/// lexer only ever scans non-negative digit runs). Checked ahead of
/// constant folding, so `**`'s negative-exponent rule can't be
/// sidestepped by leaving the optimizer disabled.
fn is_negative_int_literal(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::IntLiteral(n) => *n < 0,
        ExprKind::Unary {
            operator: crate::ast::UnaryOp::Neg,
            operand,
        } => matches!(&operand.kind, ExprKind::IntLiteral(_)),
        _ => false,
    }
}

/// Whether `stmts` guarantees a `return` is reached on every path
/// (used to reject a function whose return type is not void but whose
/// body might fall off the end). Conservative: only recognizes a
/// trailing `return`, or an exhaustive `if/elif/.../else` chain where
/// every branch terminates.
fn returns_on_all_paths(stmts: &[Stmt]) -> bool {
    stmts.iter().any(|stmt| match &stmt.kind {
        StmtKind::ReturnStatement { .. } => true,
        StmtKind::IfStatement {
            primary, secondary, ..
        }
        | StmtKind::ElifStatement {
            primary, secondary, ..
        } => {
            returns_on_all_paths(primary)
                && secondary
                    .as_ref()
                    .map(|s| branch_terminates(s))
                    .unwrap_or(false)
        }
        _ => false,
    })
}

fn branch_terminates(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::ElseStatement { primary } => returns_on_all_paths(primary),
        StmtKind::ElifStatement {
            primary, secondary, ..
        } => {
            returns_on_all_paths(primary)
                && secondary
                    .as_ref()
                    .map(|s| branch_terminates(s))
                    .unwrap_or(false)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn analyze_source(source: &str) -> (AnalyzedProgram, DiagnosticBag) {
        let mut diagnostics = DiagnosticBag::default();
        let tokens = lex("test.fp", source, ".", &mut diagnostics, false).unwrap();
        let program = Parser::parse(tokens, &mut diagnostics);
        let stdlib = StandardLibrary::with_builtin_modules();
        let analyzed = analyze(program, ".", &stdlib, &mut diagnostics);
        (analyzed, diagnostics)
    }

    #[test]
    fn resolves_variable_types() {
        let (analyzed, diagnostics) = analyze_source("new x = 5");
        assert!(!diagnostics.has_errors());
        let StmtKind::VariableDeclaration { value, .. } = &analyzed.program.body[0].kind else {
            panic!("expected variable declaration");
        };
        assert_eq!(value.meta.type_info.base_type, SourceType::Int);
    }

    #[test]
    fn undefined_identifier_is_an_error() {
        let (_analyzed, diagnostics) = analyze_source("new x = y");
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn duplicate_declaration_in_same_scope_is_an_error() {
        let (_analyzed, diagnostics) = analyze_source("new x = 1\nnew x = 2");
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn assignment_to_immutable_variable_is_allowed_since_new_defaults_mutable() {
        let (_analyzed, diagnostics) = analyze_source("new x = 1\nx = 2");
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn scope_depth_returns_to_baseline_after_function_declaration() {
        let mut diagnostics = DiagnosticBag::default();
        let tokens = lex(
            "test.fp",
            "fn add(a: int, b: int): int { return a + b }",
            ".",
            &mut diagnostics,
            false,
        )
        .unwrap();
        let program = Parser::parse(tokens, &mut diagnostics);
        let stdlib = StandardLibrary::with_builtin_modules();
        let mut analyzer = Analyzer {
            scope: ScopeStack::new(),
            functions: FunctionRegistry::new(),
            identifiers_used: HashSet::new(),
            imported_stdlib_modules: HashSet::new(),
            stdlib: &stdlib,
            directory: PathBuf::from("."),
            diagnostics: &mut diagnostics,
        };
        let before = analyzer.scope.depth();
        let _ = analyzer.analyze_block(program.body);
        assert_eq!(analyzer.scope.depth(), before);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn missing_return_in_non_void_function_is_reported() {
        let (_analyzed, diagnostics) =
            analyze_source("fn broken(): int { new x = 1 }");
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn call_argument_count_mismatch_is_an_error() {
        let (_analyzed, diagnostics) =
            analyze_source("fn add(a: int, b: int): int { return a + b }\nadd(1)");
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn stdlib_import_registers_functions() {
        let (analyzed, diagnostics) = analyze_source("import io\nprint(\"hi\")");
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.all());
        assert!(analyzed.functions.contains("print"));
    }

    #[test]
    fn unknown_stdlib_module_is_an_error() {
        let (_analyzed, diagnostics) = analyze_source("import nope");
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn reimporting_a_stdlib_module_is_a_silent_no_op() {
        let (_analyzed, diagnostics) = analyze_source("import io\nimport io\nprint(\"hi\")");
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.all());
    }
}
