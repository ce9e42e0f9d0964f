//! Per-function IR state: the SSA temp-id counter, the current basic block,
//! and the `name -> alloca pointer` map for locals.

use std::collections::HashMap;

use crate::ast::LlvmType;
use crate::ir::block::BasicBlock;

pub struct FunctionEmitter {
    pub name: String,
    pub return_type: LlvmType,
    blocks: Vec<BasicBlock>,
    current: usize,
    next_temp: u32,
    next_label: u32,
    locals: HashMap<String, (String, LlvmType)>,
}

impl FunctionEmitter {
    pub fn new(name: impl Into<String>, return_type: LlvmType) -> Self {
        let mut emitter = FunctionEmitter {
            name: name.into(),
            return_type,
            blocks: Vec::new(),
            current: 0,
            next_temp: 0,
            next_label: 0,
            locals: HashMap::new(),
        };
        emitter.blocks.push(BasicBlock::new("entry"));
        emitter
    }

    /// Allocates the next SSA register, `%N`.
    pub fn temp(&mut self) -> String {
        let name = format!("%t{}", self.next_temp);
        self.next_temp += 1;
        name
    }

    /// Allocates a unique label for a new basic block (not yet appended).
    pub fn label(&mut self, hint: &str) -> String {
        let name = format!("{hint}.{}", self.next_label);
        self.next_label += 1;
        name
    }

    pub fn emit(&mut self, instruction: impl Into<String>) {
        self.blocks[self.current].instructions.push(instruction.into());
    }

    /// Appends `block` and switches emission to it.
    pub fn enter_block(&mut self, label: String) {
        self.blocks.push(BasicBlock::new(label));
        self.current = self.blocks.len() - 1;
    }

    pub fn current_label(&self) -> &str {
        &self.blocks[self.current].label
    }

    /// `true` once the current block already ends in `br`/`ret` — used to
    /// skip emitting unreachable fallthrough terminators.
    pub fn current_block_terminated(&self) -> bool {
        self.blocks[self.current]
            .instructions
            .last()
            .map(|i| i.trim_start().starts_with("br ") || i.trim_start().starts_with("ret "))
            .unwrap_or(false)
    }

    pub fn declare_local(&mut self, name: &str, pointer: String, llvm_type: LlvmType) {
        self.locals.insert(name.to_owned(), (pointer, llvm_type));
    }

    pub fn local(&self, name: &str) -> Option<&(String, LlvmType)> {
        self.locals.get(name)
    }

    pub fn render(&self, params: &[(String, LlvmType)]) -> String {
        let param_list = params
            .iter()
            .map(|(name, ty)| format!("{ty} %{name}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = format!(
            "define {} @{}({}) {{\n",
            self.return_type, self.name, param_list
        );
        for block in &self.blocks {
            out.push_str(&format!("{}:\n", block.label));
            for instruction in &block.instructions {
                out.push_str("  ");
                out.push_str(instruction);
                out.push('\n');
            }
        }
        out.push_str("}\n");
        out
    }
}
