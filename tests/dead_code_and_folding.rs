use farpy::{compile, CompileOptions};

#[test]
fn unused_top_level_function_is_dropped_and_warned_about() {
    let source = "\
fn unused_helper(x: int): int {
    return x + 1
}

new result = 42
";
    let outcome = compile("deadcode.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.diagnostics.all().iter().any(|d| d.message.contains("unused_helper")));
    assert!(!outcome.llvm_ir.contains("@unused_helper"));
}

#[test]
fn dead_code_elimination_can_be_disabled() {
    let source = "\
fn unused_helper(x: int): int {
    return x + 1
}

new result = 42
";
    let options = CompileOptions {
        run_dead_code_elimination: false,
        ..CompileOptions::default()
    };
    let outcome = compile("keepdead.fp", source, &options).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("@unused_helper"));
}

#[test]
fn constant_folding_reduces_arithmetic_to_a_single_literal_store() {
    let source = "new total = 1 + 2 * 3\n";
    let options = CompileOptions {
        run_dead_code_elimination: false,
        ..CompileOptions::default()
    };
    let outcome = compile("fold.fp", source, &options).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("store i32 7"));
    assert!(!outcome.llvm_ir.contains("add i32") && !outcome.llvm_ir.contains("mul i32"));
}

#[test]
fn folding_can_be_disabled_to_keep_the_raw_arithmetic() {
    let source = "new total = 1 + 2 * 3\n";
    let options = CompileOptions {
        run_optimizer: false,
        run_dead_code_elimination: false,
        ..CompileOptions::default()
    };
    let outcome = compile("nofold.fp", source, &options).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("mul i32") || outcome.llvm_ir.contains("add i32"));
}
