//! The external driver contract: turning emitted IR text into a binary is
//! explicitly out of scope here (it shells out to `llvm-as`, `llc`,
//! `clang`/`llvm-link`, and optionally `strip`/`upx`). This module only
//! describes the handoff shape so a separate tool can implement it.

/// Everything a driver needs to assemble and link one compiled program.
pub struct DriverInput {
    pub llvm_ir: String,
    /// Raw `extern { ... } "..."` C fragments collected during semantic
    /// analysis, to be compiled alongside the IR.
    pub extern_fragments: Vec<String>,
    /// Linker flags contributed by imported standard library modules
    /// (e.g. `-lm` for `math`).
    pub link_flags: Vec<String>,
}

/// Implemented by an external tool, not by this crate; kept as a trait so
/// tests can supply a fake without depending on a real toolchain.
pub trait Driver {
    type Output;
    type Error;

    fn build(&self, input: DriverInput, output_path: &str) -> Result<Self::Output, Self::Error>;
}
