use farpy::{compile, CompileOptions};

#[test]
fn dividing_by_a_literal_zero_is_reported_as_a_constant_folding_error() {
    let source = "new x = 1 / 0\n";
    let outcome = compile("divzero.fp", source, &CompileOptions::default()).unwrap();
    assert!(outcome.diagnostics.has_errors());
    assert!(outcome
        .diagnostics
        .all()
        .iter()
        .any(|d| d.message.contains("division by zero")));
}

#[test]
fn modulo_by_a_literal_zero_is_also_reported() {
    let source = "new x = 1 % 0\n";
    let outcome = compile("modzero.fp", source, &CompileOptions::default()).unwrap();
    assert!(outcome.diagnostics.has_errors());
}

#[test]
fn a_divisor_that_only_folds_to_zero_is_caught_by_the_optimizer_not_the_type_checker() {
    // `2 - 2` is not a literal zero at parse time, so the semantic pass
    // lets it through; constant folding reduces it to zero afterward and
    // must catch the division itself.
    let source = "new x = 1 / (2 - 2)\n";
    let outcome = compile("foldzero.fp", source, &CompileOptions::default()).unwrap();
    assert!(outcome.diagnostics.has_errors());
    assert!(outcome
        .diagnostics
        .all()
        .iter()
        .any(|d| d.message.contains("division by zero in constant expression")));
}

#[test]
fn dividing_by_a_runtime_zero_is_not_a_constant_folding_error() {
    let source = "\
fn half(n: int, d: int): int {
    return n / d
}

new x = half(10, 0)
";
    let outcome = compile("divzero_runtime.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("sdiv i32"));
}
