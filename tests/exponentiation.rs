use farpy::{compile, CompileOptions};

#[test]
fn integer_exponentiation_is_computed_via_pow_and_converted_back_to_an_integer() {
    let source = "\
fn cube(n: int): int {
    return n ** 3
}

new x = cube(2)
";
    let outcome = compile("cube.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("call double @pow(double"));
    assert!(outcome.llvm_ir.contains("fptosi double"));
    assert!(outcome.llvm_ir.contains("declare double @pow(double, double)"));
}

#[test]
fn double_exponentiation_stays_a_double_with_no_trailing_conversion() {
    let source = "\
fn square(n: double): double {
    return n ** 2.0
}

new x = square(3.0)
";
    let outcome = compile("square.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("call double @pow(double"));
    assert!(!outcome.llvm_ir.contains("fptosi"));
}

#[test]
fn negative_integer_exponent_is_a_compile_time_error() {
    let source = "new x = 2 ** -3\n";
    let outcome = compile("negexp.fp", source, &CompileOptions::default()).unwrap();
    assert!(outcome.diagnostics.has_errors());
    assert!(outcome
        .diagnostics
        .all()
        .iter()
        .any(|d| d.message.contains("non-negative exponent")));
}

#[test]
fn negative_float_exponent_is_allowed() {
    let source = "new x = 2.0 ** -3.0\n";
    let outcome = compile("negfloatexp.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
}
