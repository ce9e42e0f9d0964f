use farpy::{compile, CompileOptions};

#[test]
fn float_division_lowers_to_fdiv_and_promotes_a_mixed_int_operand() {
    let source = "\
fn average(a: double, b: int): double {
    return (a + b) / 2.0
}

new x = average(3.0, 1)
";
    let outcome = compile("avg.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("sitofp i32"));
    assert!(outcome.llvm_ir.contains("fadd double"));
    assert!(outcome.llvm_ir.contains("fdiv double"));
}

#[test]
fn comparing_two_doubles_lowers_to_fcmp() {
    let source = "\
fn is_close(a: double, b: double): bool {
    return a == b
}

new x = is_close(1.0, 1.0)
";
    let outcome = compile("close.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("fcmp oeq double"));
}
