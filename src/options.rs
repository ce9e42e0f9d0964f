//! Compilation options: an explicit, threaded-through value rather than a
//! global — every stage that needs a flag takes a `&CompileOptions`
//! parameter instead of reading ambient state.

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub run_optimizer: bool,
    pub run_dead_code_elimination: bool,
    pub debug: bool,
    pub target_triple: String,
    pub emit_llvm_ir: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            run_optimizer: true,
            run_dead_code_elimination: true,
            debug: false,
            target_triple: "x86_64-unknown-linux-gnu".to_owned(),
            emit_llvm_ir: true,
        }
    }
}
