//! A single labeled basic block: an ordered instruction list that must end
//! in exactly one terminator (`br` or `ret`) once emission finishes.

pub struct BasicBlock {
    pub label: String,
    pub instructions: Vec<String>,
}

impl BasicBlock {
    pub fn new(label: impl Into<String>) -> Self {
        BasicBlock {
            label: label.into(),
            instructions: Vec::new(),
        }
    }
}
