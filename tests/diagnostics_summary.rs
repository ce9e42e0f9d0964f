use farpy::{compile, CompileOptions};
use pretty_assertions::assert_eq;

#[test]
fn a_clean_compile_reports_no_problems() {
    let source = "\
new mut x = 1
x = x + 1
";
    let outcome = compile("clean.fp", source, &CompileOptions::default()).unwrap();
    assert_eq!(outcome.diagnostics.summary(), "No problems found!");
}

#[test]
fn one_dropped_declaration_is_reported_as_a_single_warning() {
    let source = "\
fn unused(x: int): int {
    return x
}

new mut kept = 1
kept = kept + 1
";
    let outcome = compile("onewarning.fp", source, &CompileOptions::default()).unwrap();
    assert_eq!(outcome.diagnostics.summary(), "Found: 0 errors and 1 warnings");
}
