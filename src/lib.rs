pub mod ast;
pub mod deadcode;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod location;
pub mod optimizer;
pub mod options;
pub mod parser;
pub mod semantic;
pub mod stdlib;

use std::path::Path;

pub use error::CompileError;
pub use options::CompileOptions;

use diagnostics::DiagnosticBag;

/// The result of a full compilation: rendered LLVM-IR text plus every
/// diagnostic collected along the way (errors do not necessarily stop
/// emission; `diagnostics.has_errors()` tells the caller whether to trust
/// the output).
pub struct CompileOutcome {
    pub llvm_ir: String,
    pub diagnostics: DiagnosticBag,
    pub link_flags: Vec<String>,
}

/// Runs the whole pipeline: lex, parse, analyze, optionally optimize and
/// strip dead code, then emit LLVM-IR text.
pub fn compile(
    filename: &str,
    source: &str,
    options: &CompileOptions,
) -> Result<CompileOutcome, CompileError> {
    let directory = Path::new(filename)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut diagnostics = DiagnosticBag::default();

    let Some(tokens) = lexer::lex(filename, source, &directory, &mut diagnostics, false) else {
        return Ok(CompileOutcome {
            llvm_ir: String::new(),
            diagnostics,
            link_flags: Vec::new(),
        });
    };

    let program = parser::Parser::parse(tokens, &mut diagnostics);

    let stdlib = stdlib::StandardLibrary::with_builtin_modules();
    let analyzed = semantic::analyze(program, &directory, &stdlib, &mut diagnostics);

    if diagnostics.has_errors() {
        return Ok(CompileOutcome {
            llvm_ir: String::new(),
            diagnostics,
            link_flags: Vec::new(),
        });
    }

    let mut program = analyzed.program;
    if options.run_optimizer {
        program = optimizer::optimize(program, &mut diagnostics);
    }
    if options.run_dead_code_elimination {
        program = deadcode::remove_dead_code(program, &analyzed.identifiers_used, &mut diagnostics);
    }

    let llvm_ir = if options.emit_llvm_ir {
        ir::emit_program(&program, &analyzed.functions, filename, options)
    } else {
        String::new()
    };

    let link_flags = collect_link_flags(&analyzed.imported_stdlib_modules, &stdlib);

    Ok(CompileOutcome {
        llvm_ir,
        diagnostics,
        link_flags,
    })
}

fn collect_link_flags(
    modules: &std::collections::HashSet<String>,
    stdlib: &stdlib::StandardLibrary,
) -> Vec<String> {
    let mut flags = Vec::new();
    for name in modules {
        if let Some(def) = stdlib.module(name) {
            for flag in &def.link_flags {
                if !flags.contains(flag) {
                    flags.push(flag.clone());
                }
            }
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_trivial_program_to_ir_text() {
        let options = CompileOptions::default();
        let outcome = compile("test.fp", "new x = 1 + 2", &options).unwrap();
        assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
        assert!(outcome.llvm_ir.contains("define i32 @main"));
    }

    #[test]
    fn reports_a_parse_error_without_panicking() {
        let options = CompileOptions::default();
        let outcome = compile("test.fp", "new = 1", &options).unwrap();
        assert!(outcome.diagnostics.has_errors());
    }

    #[test]
    fn math_import_contributes_the_lm_link_flag() {
        let options = CompileOptions::default();
        let outcome = compile("test.fp", "import math\nnew x = sqrt(2.0)", &options).unwrap();
        assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
        assert!(outcome.link_flags.contains(&"-lm".to_owned()));
    }
}
