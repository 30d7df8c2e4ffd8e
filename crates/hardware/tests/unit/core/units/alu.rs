//! ALU Operation Tests.
//!
//! Deterministic edge cases for every RV32I ALU operation, plus a few
//! algebraic identities checked over random operands.

use proptest::prelude::*;
use rstest::rstest;
use rvsdb_core::core::units::alu::{Alu, AluOp};

// ─── Constants ───────────────────────────────────────────────────────────────

const NEG1: u32 = u32::MAX;
const I32_MAX: u32 = i32::MAX as u32;
const I32_MIN: u32 = i32::MIN as u32;

#[rstest]
#[case::add(AluOp::Add, 5, 7, 12)]
#[case::add_wraps(AluOp::Add, NEG1, 1, 0)]
#[case::sub(AluOp::Sub, 5, 7, (-2i32) as u32)]
#[case::sub_wraps_min(AluOp::Sub, I32_MIN, 1, I32_MAX)]
#[case::xor(AluOp::Xor, 0xAAAA_AAAA, 0x5555_5555, NEG1)]
#[case::or(AluOp::Or, 0xF0, 0x0F, 0xFF)]
#[case::and(AluOp::And, 0xF0, 0x3C, 0x30)]
#[case::slt_signed(AluOp::Slt, NEG1, 0, 1)]
#[case::sltu_unsigned(AluOp::Sltu, NEG1, 0, 0)]
#[case::sll(AluOp::Sll, 1, 31, 0x8000_0000)]
#[case::sll_masks_shamt(AluOp::Sll, 1, 33, 2)]
#[case::srl(AluOp::Srl, 0x8000_0000, 31, 1)]
#[case::sra(AluOp::Sra, 0x8000_0000, 31, NEG1)]
#[case::sra_positive(AluOp::Sra, I32_MAX, 30, 1)]
fn alu_vectors(#[case] op: AluOp, #[case] a: u32, #[case] b: u32, #[case] expected: u32) {
    assert_eq!(Alu::execute(op, a, b), expected);
}

proptest! {
    #[test]
    fn add_then_sub_is_identity(a: u32, b: u32) {
        let sum = Alu::execute(AluOp::Add, a, b);
        prop_assert_eq!(Alu::execute(AluOp::Sub, sum, b), a);
    }

    #[test]
    fn xor_with_self_is_zero(a: u32) {
        prop_assert_eq!(Alu::execute(AluOp::Xor, a, a), 0);
    }

    #[test]
    fn slt_and_sltu_agree_on_same_sign(a in 0u32..I32_MAX, b in 0u32..I32_MAX) {
        prop_assert_eq!(Alu::execute(AluOp::Slt, a, b), Alu::execute(AluOp::Sltu, a, b));
    }
}
