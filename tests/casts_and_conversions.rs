use farpy::{compile, CompileOptions};

fn keep_everything() -> CompileOptions {
    CompileOptions {
        run_dead_code_elimination: false,
        ..CompileOptions::default()
    }
}

#[test]
fn explicit_cast_from_double_to_int_lowers_to_fptosi() {
    let source = "new x = cast(3.5, int)\n";
    let outcome = compile("cast.fp", source, &keep_everything()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("fptosi"));
}

#[test]
fn stdlib_itod_conversion_declares_and_calls_the_types_helper() {
    let source = "\
import types

new x = itod(7)
";
    let outcome = compile("itod.fp", source, &keep_everything()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("declare double @itod(i32)"));
    assert!(outcome.llvm_ir.contains("call double @itod"));
}

#[test]
fn int_to_i64_widening_lowers_to_sext() {
    let source = "new x = cast(5, long)\n";
    let outcome = compile("widen.fp", source, &keep_everything()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("sext"));
}
