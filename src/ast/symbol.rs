//! `SymbolInfo` and the frozen scope snapshot a function declaration
//! captures at the end of semantic analysis: frozen into an immutable
//! map at end-of-analysis rather than kept as a live reference.

use std::collections::HashMap;

use super::types::{LlvmType, SourceType};
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SymbolInfo {
    pub id: String,
    pub source_type: SourceType,
    pub llvm_type: LlvmType,
    pub mutable: bool,
    pub initialized: bool,
    pub location: Location,
}

/// An immutable snapshot of one lexical frame, captured when a function's
/// scope is popped so later IR emission can reconstruct it without holding
/// a live reference into the analyzer's scope stack.
pub type CapturedScope = HashMap<String, SymbolInfo>;
