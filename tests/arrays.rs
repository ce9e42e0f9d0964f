use farpy::{compile, CompileOptions};

fn keep_everything() -> CompileOptions {
    CompileOptions {
        run_dead_code_elimination: false,
        ..CompileOptions::default()
    }
}

#[test]
fn array_literal_allocates_a_fixed_size_stack_array_and_stores_each_element() {
    let source = "new nums = [1, 2, 3]\n";
    let outcome = compile("arraylit.fp", source, &keep_everything()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("alloca [3 x i32]"));
    assert!(outcome.llvm_ir.contains("store i32 1,"));
    assert!(outcome.llvm_ir.contains("store i32 2,"));
    assert!(outcome.llvm_ir.contains("store i32 3,"));
}

#[test]
fn indexing_an_array_lowers_to_a_getelementptr_and_load() {
    let source = "\
new nums = [10, 20, 30]
new first = nums[0]
";
    let outcome = compile("arrayidx.fp", source, &keep_everything()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("getelementptr inbounds"));
    assert!(outcome.llvm_ir.contains("load i32"));
}
