//! Shared per-node metadata: the common header every AST node carries
//! (`kind`, `type`, `llvmType`, `loc`, `value`).

use super::types::{LlvmType, TypeInfo};
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeMeta {
    pub type_info: TypeInfo,
    pub llvm_type: Option<LlvmType>,
    pub location: Location,
}

impl NodeMeta {
    pub fn new(type_info: TypeInfo, location: Location) -> Self {
        NodeMeta {
            type_info,
            llvm_type: None,
            location,
        }
    }
}
