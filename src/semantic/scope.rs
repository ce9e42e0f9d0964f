//! Scope stack: an ordered sequence of `name -> SymbolInfo` frames.
//! Frame 0 is global and can never be popped.

use std::collections::HashMap;

use crate::ast::{CapturedScope, SymbolInfo};

#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<HashMap<String, SymbolInfo>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![HashMap::new()],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pops the innermost frame and returns an immutable snapshot of it, to
    /// be captured onto a `FunctionDeclaration` node.
    /// Panics if called at depth 1 — the global frame can never be popped.
    pub fn pop_frame(&mut self) -> CapturedScope {
        assert!(self.frames.len() > 1, "cannot pop the global scope frame");
        self.frames.pop().expect("frame stack is non-empty")
    }

    /// `true` if `name` already exists in the *current* (innermost) frame —
    /// a duplicate declaration in the same frame is an error.
    pub fn exists_in_current_frame(&self, name: &str) -> bool {
        self.frames
            .last()
            .map(|frame| frame.contains_key(name))
            .unwrap_or(false)
    }

    pub fn declare(&mut self, symbol: SymbolInfo) {
        self.frames
            .last_mut()
            .expect("at least one frame always exists")
            .insert(symbol.id.clone(), symbol);
    }

    /// Resolves `name` walking from the innermost frame outward to the
    /// global frame.
    pub fn resolve(&self, name: &str) -> Option<&SymbolInfo> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut SymbolInfo> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LlvmType, SourceType};
    use crate::location::Location;

    fn symbol(name: &str) -> SymbolInfo {
        SymbolInfo {
            id: name.to_owned(),
            source_type: SourceType::Int,
            llvm_type: LlvmType::I32,
            mutable: true,
            initialized: true,
            location: Location::synthetic(),
        }
    }

    #[test]
    fn resolves_inner_before_outer() {
        let mut scope = ScopeStack::new();
        scope.declare(symbol("x"));
        scope.push_frame();
        let mut shadow = symbol("x");
        shadow.source_type = SourceType::Bool;
        scope.declare(shadow);
        assert_eq!(scope.resolve("x").unwrap().source_type, SourceType::Bool);
        scope.pop_frame();
        assert_eq!(scope.resolve("x").unwrap().source_type, SourceType::Int);
    }

    #[test]
    fn depth_returns_to_pre_call_value_after_pop() {
        let mut scope = ScopeStack::new();
        let before = scope.depth();
        scope.push_frame();
        scope.declare(symbol("a"));
        scope.pop_frame();
        assert_eq!(scope.depth(), before);
    }
}
