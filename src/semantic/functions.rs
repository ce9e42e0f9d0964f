//! Function registry: `name -> FunctionMeta`.

use std::collections::HashMap;

use crate::ast::{LlvmType, SourceType};

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParam {
    pub name: String,
    pub source_type: SourceType,
    pub llvm_type: LlvmType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionMeta {
    pub name: String,
    pub params: Vec<FunctionParam>,
    pub return_type: SourceType,
    pub llvm_type: LlvmType,
    pub is_variadic: bool,
    pub is_stdlib: bool,
    /// `true` for a function declared in an `extern { ... }` block: its
    /// body lives in the accompanying raw C fragment, not in this
    /// module, so it needs a `declare` line the same as a stdlib call.
    pub is_extern: bool,
    /// The name emitted in IR (`@name` or the stdlib's `llvm_name`
    /// override), distinct from the Farpy-level `name` when a stdlib
    /// function renames to its C symbol (e.g. `length` -> `strlen`).
    pub llvm_name: Option<String>,
    /// Raw `declare` line provided by stdlib metadata, if any.
    pub ir_declaration: Option<String>,
}

impl FunctionMeta {
    pub fn emitted_name(&self) -> &str {
        self.llvm_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionMeta>,
    imported_modules: Vec<String>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        FunctionRegistry::default()
    }

    pub fn register(&mut self, meta: FunctionMeta) {
        self.functions.insert(meta.name.clone(), meta);
    }

    pub fn get(&self, name: &str) -> Option<&FunctionMeta> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn has_imported(&self, module: &str) -> bool {
        self.imported_modules.iter().any(|m| m == module)
    }

    pub fn mark_imported(&mut self, module: &str) {
        self.imported_modules.push(module.to_owned());
    }

    pub fn all(&self) -> impl Iterator<Item = &FunctionMeta> {
        self.functions.values()
    }
}
