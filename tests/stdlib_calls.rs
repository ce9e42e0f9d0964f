use farpy::{compile, CompileOptions};

#[test]
fn io_print_lowers_to_a_puts_call_and_contributes_the_lc_link_flag() {
    let source = "\
import io

print(\"hello\")
";
    let outcome = compile("greet.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("declare i32 @puts(i8*)") || outcome.llvm_ir.contains("declare void @puts(i8*)"));
    assert!(outcome.llvm_ir.contains("call") && outcome.llvm_ir.contains("@puts"));
    assert!(outcome.link_flags.contains(&"-lc".to_owned()));
}

#[test]
fn math_sqrt_declares_the_external_function_once_even_with_two_call_sites() {
    let source = "\
import math

new a = sqrt(4.0)
new b = sqrt(9.0)
";
    let options = CompileOptions {
        run_dead_code_elimination: false,
        ..CompileOptions::default()
    };
    let outcome = compile("roots.fp", source, &options).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    let occurrences = outcome.llvm_ir.matches("declare double @sqrt(double)").count();
    assert_eq!(occurrences, 1);
}

#[test]
fn reimporting_the_same_stdlib_module_is_harmless() {
    let source = "\
import math
import math

new x = sqrt(16.0)
";
    let outcome = compile("reimport.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
}

#[test]
fn unknown_stdlib_module_is_a_compile_error() {
    let source = "import not_a_real_module\n";
    let outcome = compile("badimport.fp", source, &CompileOptions::default()).unwrap();
    assert!(outcome.diagnostics.has_errors());
}
