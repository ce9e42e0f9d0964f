use farpy::{compile, CompileOptions};

fn keep_everything() -> CompileOptions {
    CompileOptions {
        run_dead_code_elimination: false,
        ..CompileOptions::default()
    }
}

#[test]
fn extern_function_gets_a_declare_line_instead_of_a_conflicting_define() {
    let source = "\
extern {
    fn double_it(x: int): int
} \"int double_it(int x) { return x * 2; }\"

new result = double_it(21)
";
    let outcome = compile("ffi.fp", source, &keep_everything()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("declare i32 @double_it(i32)"));
    assert!(outcome.llvm_ir.contains("call i32 @double_it"));
}

#[test]
fn variadic_extern_function_declares_with_an_ellipsis() {
    let source = "\
extern {
    fn log_values(fmt: string, ...): int
} \"int log_values(const char *fmt, ...) { return 0; }\"

new result = log_values(\"%d\", 1)
";
    let outcome = compile("ffi_variadic.fp", source, &keep_everything()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("declare i32 @log_values(i8*, ...)"));
}
