use farpy::{compile, CompileOptions};

#[test]
fn recursive_fibonacci_lowers_to_a_self_calling_function() {
    let source = "\
fn fib(n: int): int {
    if n <= 1 {
        return n
    }
    return fib(n - 1) + fib(n - 2)
}

new result = fib(10)
";
    let options = CompileOptions::default();
    let outcome = compile("fib.fp", source, &options).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("define i32 @fib(i32 %n)"));
    assert!(outcome.llvm_ir.contains("call i32 @fib"));
}
