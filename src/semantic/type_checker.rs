//! The type checker: source-to-LLVM mapping, promotion, compatibility, and
//! binary operator typing.

use crate::ast::{BinaryOp, LlvmType, SourceType};
use crate::ast::types::{promote, promotion_rank};
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeCheckErrorKind {
    #[error("incompatible operand types '{left}' and '{right}' for operator '{operator}'")]
    IncompatibleOperands {
        left: SourceType,
        right: SourceType,
        operator: String,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("'**' with an integer right operand requires a non-negative exponent")]
    NegativeIntegerExponent,
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{location}: {kind}")]
pub struct TypeCheckError {
    pub kind: TypeCheckErrorKind,
    pub location: Location,
}

impl TypeCheckError {
    pub fn new(kind: TypeCheckErrorKind, location: Location) -> Self {
        TypeCheckError { kind, location }
    }
}

/// `int|i32 -> I32`, `i64 -> I64`, `long|i128 -> I128`, `float|double ->
/// Double`, `string|char|const char|i8* -> String`, `bool -> I1`, `binary
/// -> I32`, `null|id|ptr|void* -> Ptr`, `void -> Void`; a user-defined
/// struct maps to `Struct(name)`.
pub fn map_source_type(source_type: &SourceType) -> LlvmType {
    match source_type {
        SourceType::Int | SourceType::I32 => LlvmType::I32,
        SourceType::I64 => LlvmType::I64,
        SourceType::Long | SourceType::I128 => LlvmType::I128,
        SourceType::Float | SourceType::Double => LlvmType::Double,
        SourceType::String | SourceType::Char | SourceType::ConstChar | SourceType::I8Ptr => {
            LlvmType::String
        }
        SourceType::Bool => LlvmType::I1,
        SourceType::Binary => LlvmType::I32,
        SourceType::Null | SourceType::Id(_) | SourceType::Ptr | SourceType::VoidPtr => {
            LlvmType::Ptr
        }
        SourceType::Void => LlvmType::Void,
        SourceType::Struct(name) => LlvmType::Struct(name.clone()),
    }
}

/// Reflexive; any numeric with any numeric; the explicit pairs named in
/// beyond that.
pub fn compatible(a: &SourceType, b: &SourceType) -> bool {
    if a == b {
        return true;
    }
    if a.is_numeric() && b.is_numeric() {
        return true;
    }
    if matches!(a, SourceType::Id(_)) || matches!(b, SourceType::Id(_)) {
        return true;
    }
    if a.is_stringish() && b.is_stringish() {
        return true;
    }
    if matches!(a, SourceType::Bool) && (b.is_numeric() || b.is_stringish()) {
        return true;
    }
    if matches!(b, SourceType::Bool) && (a.is_numeric() || a.is_stringish()) {
        return true;
    }
    false
}

/// Binary operator typing. `left`/`right` are source types;
/// returns the result source type or a [`TypeCheckError`].
pub fn check_binary_operator(
    operator: BinaryOp,
    left: &SourceType,
    right: &SourceType,
    right_is_literal_zero: bool,
    right_is_negative_int_literal: bool,
    location: &Location,
) -> Result<SourceType, TypeCheckError> {
    use BinaryOp::*;
    match operator {
        Add => {
            if left.is_stringish() || right.is_stringish() {
                Ok(SourceType::String)
            } else if left.is_numeric() && right.is_numeric() {
                Ok(promoted_source_type(left, right))
            } else {
                Err(incompatible(operator, left, right, location))
            }
        }
        Sub | Mul => {
            if left.is_numeric() && right.is_numeric() {
                Ok(promoted_source_type(left, right))
            } else {
                Err(incompatible(operator, left, right, location))
            }
        }
        Div => {
            if !(left.is_numeric() && right.is_numeric()) {
                return Err(incompatible(operator, left, right, location));
            }
            if right_is_literal_zero {
                return Err(TypeCheckError::new(
                    TypeCheckErrorKind::DivisionByZero,
                    location.clone(),
                ));
            }
            Ok(promoted_source_type(left, right))
        }
        Mod | ModMod => {
            if !(left.is_numeric() && right.is_numeric()) {
                return Err(incompatible(operator, left, right, location));
            }
            if right_is_literal_zero {
                return Err(TypeCheckError::new(
                    TypeCheckErrorKind::ModuloByZero,
                    location.clone(),
                ));
            }
            Ok(promoted_source_type(left, right))
        }
        Pow => {
            if !(left.is_numeric() && right.is_numeric()) {
                return Err(incompatible(operator, left, right, location));
            }
            let right_is_integer = !matches!(right, SourceType::Float | SourceType::Double);
            if right_is_integer && right_is_negative_int_literal {
                return Err(TypeCheckError::new(
                    TypeCheckErrorKind::NegativeIntegerExponent,
                    location.clone(),
                ));
            }
            Ok(promoted_source_type(left, right))
        }
        Eq | NotEq => {
            if compatible(left, right) {
                Ok(SourceType::Bool)
            } else {
                Err(incompatible(operator, left, right, location))
            }
        }
        Lt | Gt | Lte | Gte => {
            let both_numeric = left.is_numeric() && right.is_numeric();
            let both_string = matches!(left, SourceType::String) && matches!(right, SourceType::String);
            if both_numeric || both_string {
                Ok(SourceType::Bool)
            } else {
                Err(incompatible(operator, left, right, location))
            }
        }
        And | Or => {
            if matches!(left, SourceType::Bool) && matches!(right, SourceType::Bool) {
                Ok(SourceType::Bool)
            } else {
                Err(incompatible(operator, left, right, location))
            }
        }
    }
}

fn incompatible(
    operator: BinaryOp,
    left: &SourceType,
    right: &SourceType,
    location: &Location,
) -> TypeCheckError {
    TypeCheckError::new(
        TypeCheckErrorKind::IncompatibleOperands {
            left: left.clone(),
            right: right.clone(),
            operator: operator.symbol().to_owned(),
        },
        location.clone(),
    )
}

fn promoted_source_type(left: &SourceType, right: &SourceType) -> SourceType {
    let promoted = promote(&map_source_type(left), &map_source_type(right));
    match promoted {
        LlvmType::I32 => SourceType::Int,
        LlvmType::I64 => SourceType::I64,
        LlvmType::I128 => SourceType::Long,
        LlvmType::Double => SourceType::Double,
        LlvmType::I1 => SourceType::Bool,
        _ => SourceType::Int,
    }
}

/// Given a literal's stringified form and its target LLVM type, produce
/// the textual IR form: integers floor
/// to integer, floats append `.0` if missing, strings/pointers pass
/// through unchanged.
pub fn format_literal_for_ir(text: &str, llvm_type: &LlvmType) -> String {
    match llvm_type {
        LlvmType::Double => {
            if text.contains('.') {
                text.to_owned()
            } else {
                format!("{text}.0")
            }
        }
        LlvmType::I1 | LlvmType::I32 | LlvmType::I64 | LlvmType::I128 => {
            text.split('.').next().unwrap_or(text).to_owned()
        }
        _ => text.to_owned(),
    }
}

/// `promote(A,B) == promote(B,A)` and rank `== max(rank(A),rank(B))`
/// — exercised directly in tests below; re-exported
/// here as the type checker is the layer the rest of the compiler calls
/// through for promotion decisions.
pub fn promote_llvm(a: &LlvmType, b: &LlvmType) -> LlvmType {
    promote(a, b)
}

pub fn rank(ty: &LlvmType) -> u32 {
    promotion_rank(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_source_types_to_llvm_tags() {
        assert_eq!(map_source_type(&SourceType::Int), LlvmType::I32);
        assert_eq!(map_source_type(&SourceType::Double), LlvmType::Double);
        assert_eq!(map_source_type(&SourceType::String), LlvmType::String);
        assert_eq!(map_source_type(&SourceType::Bool), LlvmType::I1);
        assert_eq!(map_source_type(&SourceType::Void), LlvmType::Void);
    }

    #[test]
    fn promotion_is_commutative_and_tracks_max_rank() {
        let a = LlvmType::I32;
        let b = LlvmType::Double;
        assert_eq!(promote_llvm(&a, &b), promote_llvm(&b, &a));
        assert_eq!(rank(&promote_llvm(&a, &b)), rank(&a).max(rank(&b)));
    }

    #[test]
    fn division_by_literal_zero_is_an_error() {
        let loc = Location::synthetic();
        let result = check_binary_operator(
            BinaryOp::Div,
            &SourceType::Int,
            &SourceType::Int,
            true,
            false,
            &loc,
        );
        assert!(matches!(
            result,
            Err(TypeCheckError {
                kind: TypeCheckErrorKind::DivisionByZero,
                ..
            })
        ));
    }

    #[test]
    fn string_plus_anything_is_string() {
        let loc = Location::synthetic();
        let result = check_binary_operator(
            BinaryOp::Add,
            &SourceType::String,
            &SourceType::Int,
            false,
            false,
            &loc,
        );
        assert_eq!(result.unwrap(), SourceType::String);
    }

    #[test]
    fn negative_integer_exponent_is_an_error() {
        let loc = Location::synthetic();
        let result = check_binary_operator(
            BinaryOp::Pow,
            &SourceType::Int,
            &SourceType::Int,
            false,
            true,
            &loc,
        );
        assert!(matches!(
            result,
            Err(TypeCheckError {
                kind: TypeCheckErrorKind::NegativeIntegerExponent,
                ..
            })
        ));
    }

    #[test]
    fn negative_float_exponent_is_allowed() {
        let loc = Location::synthetic();
        let result = check_binary_operator(
            BinaryOp::Pow,
            &SourceType::Double,
            &SourceType::Double,
            false,
            false,
            &loc,
        );
        assert_eq!(result.unwrap(), SourceType::Double);
    }

    #[test]
    fn literal_formatting_adds_trailing_zero_to_floats() {
        assert_eq!(format_literal_for_ir("3", &LlvmType::Double), "3.0");
        assert_eq!(format_literal_for_ir("3.5", &LlvmType::Double), "3.5");
        assert_eq!(format_literal_for_ir("3.9", &LlvmType::I32), "3");
    }
}
