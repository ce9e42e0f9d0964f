//! Source-level types, their LLVM type tags, and `TypeInfo`.

use std::fmt::Display;

/// Source-type tags named in `TypeInfo.baseType`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SourceType {
    Int,
    I32,
    I64,
    I128,
    Long,
    Float,
    Double,
    String,
    Bool,
    Binary,
    Null,
    Id(String),
    Void,
    Ptr,
    ConstChar,
    Char,
    I8Ptr,
    VoidPtr,
    Struct(String),
}

impl Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Int => write!(f, "int"),
            SourceType::I32 => write!(f, "i32"),
            SourceType::I64 => write!(f, "i64"),
            SourceType::I128 => write!(f, "i128"),
            SourceType::Long => write!(f, "long"),
            SourceType::Float => write!(f, "float"),
            SourceType::Double => write!(f, "double"),
            SourceType::String => write!(f, "string"),
            SourceType::Bool => write!(f, "bool"),
            SourceType::Binary => write!(f, "binary"),
            SourceType::Null => write!(f, "null"),
            SourceType::Id(name) => write!(f, "{name}"),
            SourceType::Void => write!(f, "void"),
            SourceType::Ptr => write!(f, "ptr"),
            SourceType::ConstChar => write!(f, "const char"),
            SourceType::Char => write!(f, "char"),
            SourceType::I8Ptr => write!(f, "i8*"),
            SourceType::VoidPtr => write!(f, "void*"),
            SourceType::Struct(name) => write!(f, "{name}"),
        }
    }
}

impl SourceType {
    pub fn from_keyword(name: &str) -> Option<SourceType> {
        Some(match name {
            "int" => SourceType::Int,
            "i32" => SourceType::I32,
            "i64" => SourceType::I64,
            "i128" => SourceType::I128,
            "long" => SourceType::Long,
            "float" => SourceType::Float,
            "double" => SourceType::Double,
            "string" => SourceType::String,
            "bool" => SourceType::Bool,
            "binary" => SourceType::Binary,
            "null" => SourceType::Null,
            "void" => SourceType::Void,
            "ptr" => SourceType::Ptr,
            "char" => SourceType::Char,
            "i8*" => SourceType::I8Ptr,
            "void*" => SourceType::VoidPtr,
            "const char" => SourceType::ConstChar,
            other => return Some(SourceType::Id(other.to_owned())),
        })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SourceType::Int
                | SourceType::I32
                | SourceType::I64
                | SourceType::I128
                | SourceType::Long
                | SourceType::Float
                | SourceType::Double
                | SourceType::Binary
                | SourceType::Bool
        )
    }

    pub fn is_stringish(&self) -> bool {
        matches!(
            self,
            SourceType::String | SourceType::Char | SourceType::ConstChar | SourceType::Binary
        )
    }
}

/// Closed LLVM type tag enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LlvmType {
    I1,
    I32,
    I64,
    I128,
    Double,
    String,
    Ptr,
    Void,
    Struct(String),
}

impl Display for LlvmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlvmType::I1 => write!(f, "i1"),
            LlvmType::I32 => write!(f, "i32"),
            LlvmType::I64 => write!(f, "i64"),
            LlvmType::I128 => write!(f, "i128"),
            LlvmType::Double => write!(f, "double"),
            LlvmType::String => write!(f, "i8*"),
            LlvmType::Ptr => write!(f, "ptr"),
            LlvmType::Void => write!(f, "void"),
            LlvmType::Struct(name) => write!(f, "%{name}"),
        }
    }
}

impl LlvmType {
    /// `i1,i8->1; i16->2; i32,float->4; i64,double->8; i128->16`.
    pub fn alignment(&self) -> u32 {
        match self {
            LlvmType::I1 => 1,
            LlvmType::I32 => 4,
            LlvmType::I64 => 8,
            LlvmType::I128 => 16,
            LlvmType::Double => 8,
            LlvmType::String | LlvmType::Ptr | LlvmType::Struct(_) => 8,
            LlvmType::Void => 0,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, LlvmType::I1 | LlvmType::I32 | LlvmType::I64 | LlvmType::I128)
    }

    pub fn is_pointerish(&self) -> bool {
        matches!(self, LlvmType::String | LlvmType::Ptr | LlvmType::Struct(_))
    }

    /// Integer bit width, for `sext`/`trunc`/`zext` lowering.
    pub fn int_bits(&self) -> Option<u32> {
        match self {
            LlvmType::I1 => Some(1),
            LlvmType::I32 => Some(32),
            LlvmType::I64 => Some(64),
            LlvmType::I128 => Some(128),
            _ => None,
        }
    }
}

/// `(baseType, isPointer, pointerLevel, isArray, arrayDimensions, isStruct)`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypeInfo {
    pub base_type: SourceType,
    pub is_pointer: bool,
    pub pointer_level: u32,
    pub is_array: bool,
    pub array_dimensions: u32,
    pub is_struct: bool,
}

impl TypeInfo {
    pub fn simple(base_type: SourceType) -> Self {
        TypeInfo {
            base_type,
            is_pointer: false,
            pointer_level: 0,
            is_array: false,
            array_dimensions: 0,
            is_struct: false,
        }
    }

    pub fn void() -> Self {
        TypeInfo::simple(SourceType::Void)
    }

    pub fn pointer_to(base_type: SourceType, level: u32) -> Self {
        TypeInfo {
            base_type,
            is_pointer: true,
            pointer_level: level,
            is_array: false,
            array_dimensions: 0,
            is_struct: false,
        }
    }

    pub fn array_of(base_type: SourceType, dimensions: u32) -> Self {
        TypeInfo {
            base_type,
            is_pointer: false,
            pointer_level: 0,
            is_array: true,
            array_dimensions: dimensions,
            is_struct: false,
        }
    }

    pub fn struct_named(name: impl Into<String>) -> Self {
        TypeInfo {
            base_type: SourceType::Struct(name.into()),
            is_pointer: false,
            pointer_level: 0,
            is_array: false,
            array_dimensions: 0,
            is_struct: true,
        }
    }
}

/// `bool/i1=1, int/i32/binary=2, i64/i128/long=3, float=4, double=5`.
pub fn promotion_rank(ty: &LlvmType) -> u32 {
    match ty {
        LlvmType::I1 => 1,
        LlvmType::I32 => 2,
        LlvmType::I64 | LlvmType::I128 => 3,
        LlvmType::Double => 5,
        LlvmType::String | LlvmType::Ptr | LlvmType::Void | LlvmType::Struct(_) => 0,
    }
}

/// Same-rank tie-break key, consulted only when `a` and `b` land on the
/// same `promotion_rank` but are not the same type (`i64` vs `i128`, both
/// rank 3) — picks a fixed winner so the result never depends on which
/// side of the call a type was passed on.
fn tie_rank(ty: &LlvmType) -> u32 {
    match ty {
        LlvmType::I128 => 1,
        _ => 0,
    }
}

/// `promote(A,B) == promote(B,A)`, rank `== max(rank(A), rank(B))` property 8.
///
/// Farpy only distinguishes "integer or double" at the LLVM level; `float`
/// as a distinct storage width collapses to `Double` once lowered (the
/// source-level `float`/`double` split matters for `map_source_type`, not
/// for the promoted LLVM type), so `f64`-ranked operands never need a
/// narrower floating point promotion target.
pub fn promote(a: &LlvmType, b: &LlvmType) -> LlvmType {
    match promotion_rank(a).cmp(&promotion_rank(b)) {
        std::cmp::Ordering::Greater => a.clone(),
        std::cmp::Ordering::Less => b.clone(),
        std::cmp::Ordering::Equal if tie_rank(b) > tie_rank(a) => b.clone(),
        std::cmp::Ordering::Equal => a.clone(),
    }
}
