//! LLVM-IR text emission: the last pipeline stage. Walks the analyzed,
//! optimized, dead-code-trimmed AST and produces a single LLVM-IR module as
//! text, with no dependency on LLVM itself — the output is handed to an
//! external driver (`llvm-as`/`clang`) for assembly and linking.

pub mod block;
pub mod emit;
pub mod function;
pub mod module;

pub use emit::emit_program;
pub use function::FunctionEmitter;
pub use module::ModuleEmitter;
