use farpy::{compile, CompileOptions};

#[test]
fn if_elif_else_lowers_to_branching_blocks() {
    let source = "\
fn classify(n: int): int {
    if n < 0 {
        return -1
    } elif n == 0 {
        return 0
    } else {
        return 1
    }
}

new x = classify(5)
";
    let outcome = compile("branch.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("icmp slt i32"));
    assert!(outcome.llvm_ir.contains("br i1"));
}

#[test]
fn while_loop_lowers_to_a_condition_body_end_block_triple() {
    let source = "\
fn count_down(n: int): int {
    new mut i = n
    while i > 0 {
        i = i - 1
    }
    return i
}

new x = count_down(3)
";
    let outcome = compile("whileloop.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("icmp sgt i32"));
    assert!(outcome.llvm_ir.to_lowercase().contains("while.cond") || outcome.llvm_ir.contains("br label"));
}

#[test]
fn exclusive_for_range_uses_a_strictly_less_than_predicate() {
    let source = "\
fn sum_up_to(n: int): int {
    new mut total = 0
    for i from 0 .. n {
        total = total + i
    }
    return total
}

new x = sum_up_to(10)
";
    let outcome = compile("forrange.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("icmp slt i32"));
}

#[test]
fn inclusive_for_range_with_a_negative_step_uses_a_signed_greater_or_equal_predicate() {
    let source = "\
fn count_down_sum(n: int): int {
    new mut total = 0
    for i from n ... 0 step -1 {
        total = total + i
    }
    return total
}

new x = count_down_sum(10)
";
    let outcome = compile("forrangedesc.fp", source, &CompileOptions::default()).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("icmp sge i32"));
}

#[test]
fn for_range_with_a_variable_step_selects_its_predicate_at_runtime() {
    // `step` isn't a literal here (and the optimizer can't fold a
    // parameter), so the ascending/descending predicate can only be
    // chosen once the step's sign is known at runtime.
    let source = "\
fn walk(n: int, delta: int): int {
    new mut total = 0
    for i from 0 ... n step delta {
        total = total + i
    }
    return total
}

new x = walk(10, -1)
";
    let options = CompileOptions {
        run_optimizer: false,
        ..CompileOptions::default()
    };
    let outcome = compile("forrangevar.fp", source, &options).unwrap();
    assert!(!outcome.diagnostics.has_errors(), "{:?}", outcome.diagnostics.all());
    assert!(outcome.llvm_ir.contains("icmp sgt i32"));
    assert!(outcome.llvm_ir.contains("icmp sle i32"));
    assert!(outcome.llvm_ir.contains("icmp sge i32"));
    assert!(outcome.llvm_ir.contains("select i1"));
}
