use farpy::{compile, CompileOptions};

#[test]
fn string_literal_concatenation_folds_to_one_global_constant() {
    let source = "\
import io

print(\"hello, \" + \"world\")
";
    let outcome = compile("greetfold.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("hello, world"));
}

#[test]
fn short_circuit_and_lowers_to_a_branch_and_a_phi() {
    let source = "\
fn both_positive(a: int, b: int): bool {
    return a > 0 && b > 0
}

new x = both_positive(1, 2)
";
    let outcome = compile("shortcircuit.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("phi i1"));
    assert!(outcome.llvm_ir.contains("br i1"));
}
