use farpy::ast::types::promote;
use farpy::ast::LlvmType;

#[test]
fn same_rank_integer_promotion_is_commutative() {
    // i64 and i128 share a promotion rank; the wider type must win
    // regardless of which side of the call it is passed on.
    assert_eq!(promote(&LlvmType::I64, &LlvmType::I128), LlvmType::I128);
    assert_eq!(promote(&LlvmType::I128, &LlvmType::I64), LlvmType::I128);
}

#[test]
fn promotion_is_commutative_across_differing_ranks() {
    assert_eq!(
        promote(&LlvmType::I32, &LlvmType::Double),
        promote(&LlvmType::Double, &LlvmType::I32)
    );
    assert_eq!(promote(&LlvmType::I32, &LlvmType::Double), LlvmType::Double);
}
