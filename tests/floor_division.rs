use farpy::{compile, CompileOptions};

fn keep_everything() -> CompileOptions {
    CompileOptions {
        run_dead_code_elimination: false,
        ..CompileOptions::default()
    }
}

#[test]
fn constant_folded_division_with_a_negative_divisor_rounds_toward_negative_infinity() {
    // 7 / -2 is -3.5; floor division rounds to -4, not truncating to -3.
    let source = "new x = 7 / (0 - 2)\n";
    let outcome = compile("floordiv.fp", source, &keep_everything()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("store i32 -4"));
}

#[test]
fn constant_folded_modulo_with_a_negative_divisor_takes_the_divisors_sign() {
    // 7 == -4 * -2 + (-1), so the floored remainder of 7 % -2 is -1.
    let source = "new x = 7 % (0 - 2)\n";
    let outcome = compile("floormod.fp", source, &keep_everything()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("store i32 -1"));
}

#[test]
fn constant_folded_division_with_a_positive_divisor_is_unchanged() {
    let source = "new x = 7 / 2\n";
    let outcome = compile("floordivpos.fp", source, &keep_everything()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("store i32 3"));
}
