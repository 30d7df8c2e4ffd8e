//! Instruction Decode Properties.
//!
//! Verifies that the decode table picks the right entry for every RV32I
//! instruction and that operand extraction recovers the encoded fields.
//!
//! # Coverage Matrix
//!
//! - R-type:  OP_REG
//! - I-type:  OP_IMM, OP_LOAD, OP_JALR
//! - S-type:  OP_STORE
//! - B-type:  OP_BRANCH (halfword-scaled immediate)
//! - U-type:  OP_LUI, OP_AUIPC
//! - J-type:  OP_JAL (halfword-scaled immediate)

use proptest::prelude::*;
use rstest::rstest;
use rvsdb_core::common::RegisterFile;
use rvsdb_core::core::cpu::execution::INST_TABLE;
use rvsdb_core::isa::decode::{
    Pattern, decode_operands, decode_u_type_imm, lookup, sign_extend,
};
use rvsdb_core::isa::instruction::{Format, InstructionBits};

use crate::common::builder::instruction::{ebreak, inst};

fn mnemonic(word: u32) -> &'static str {
    lookup(INST_TABLE, word).map_or("<none>", |e| e.name)
}

#[rstest]
#[case(inst().lui(1, 0x12345).build(), "lui")]
#[case(inst().auipc(1, 0x12345).build(), "auipc")]
#[case(inst().jal(1, 8).build(), "jal")]
#[case(inst().jalr(1, 2, 8).build(), "jalr")]
#[case(inst().beq(1, 2, 8).build(), "beq")]
#[case(inst().bne(1, 2, 8).build(), "bne")]
#[case(inst().blt(1, 2, 8).build(), "blt")]
#[case(inst().bge(1, 2, 8).build(), "bge")]
#[case(inst().bltu(1, 2, 8).build(), "bltu")]
#[case(inst().bgeu(1, 2, 8).build(), "bgeu")]
#[case(inst().lb(1, 2, 4).build(), "lb")]
#[case(inst().lh(1, 2, 4).build(), "lh")]
#[case(inst().lw(1, 2, 4).build(), "lw")]
#[case(inst().lbu(1, 2, 4).build(), "lbu")]
#[case(inst().lhu(1, 2, 4).build(), "lhu")]
#[case(inst().sb(1, 2, 4).build(), "sb")]
#[case(inst().sh(1, 2, 4).build(), "sh")]
#[case(inst().sw(1, 2, 4).build(), "sw")]
#[case(inst().addi(1, 2, -1).build(), "addi")]
#[case(inst().slti(1, 2, -1).build(), "slti")]
#[case(inst().sltiu(1, 2, -1).build(), "sltiu")]
#[case(inst().xori(1, 2, -1).build(), "xori")]
#[case(inst().ori(1, 2, 0x7f).build(), "ori")]
#[case(inst().andi(1, 2, 0x7f).build(), "andi")]
#[case(inst().slli(1, 2, 3).build(), "slli")]
#[case(inst().srli(1, 2, 3).build(), "srli")]
#[case(inst().srai(1, 2, 3).build(), "srai")]
#[case(inst().add(1, 2, 3).build(), "add")]
#[case(inst().sub(1, 2, 3).build(), "sub")]
#[case(inst().sll(1, 2, 3).build(), "sll")]
#[case(inst().slt(1, 2, 3).build(), "slt")]
#[case(inst().sltu(1, 2, 3).build(), "sltu")]
#[case(inst().xor(1, 2, 3).build(), "xor")]
#[case(inst().srl(1, 2, 3).build(), "srl")]
#[case(inst().sra(1, 2, 3).build(), "sra")]
#[case(inst().or(1, 2, 3).build(), "or")]
#[case(inst().and(1, 2, 3).build(), "and")]
#[case(ebreak(), "ebreak")]
#[case(0x0000_0073, "inv")]
#[case(0xffff_ffff, "inv")]
fn table_selects_entry(#[case] word: u32, #[case] expected: &str) {
    assert_eq!(mnemonic(word), expected);
}

#[test]
fn every_named_entry_has_a_case() {
    // Keep in step with the `table_selects_entry` cases above.
    const COVERED: [&str; 38] = [
        "lui", "auipc", "jal", "jalr", "beq", "bne", "blt", "bge", "bltu", "bgeu", "lb", "lh",
        "lw", "lbu", "lhu", "sb", "sh", "sw", "addi", "slti", "sltiu", "xori", "ori", "andi",
        "slli", "srli", "srai", "add", "sub", "sll", "slt", "sltu", "xor", "srl", "sra", "or",
        "and", "ebreak",
    ];
    let names: Vec<&str> = INST_TABLE
        .iter()
        .map(|e| e.name)
        .filter(|&n| n != "inv")
        .collect();
    assert_eq!(names, COVERED);
}

#[test]
fn catch_all_is_last_and_matches_everything() {
    let last = INST_TABLE.last().unwrap();
    assert_eq!(last.name, "inv");
    assert_eq!(last.pattern, Pattern::new("??????? ????? ????? ??? ????? ????? ??"));
    assert_eq!(
        INST_TABLE.iter().filter(|e| e.pattern.mask == 0).count(),
        1
    );
}

#[test]
fn source_values_are_read_at_decode() {
    let mut regs = RegisterFile::new();
    regs.write(2, 20);
    regs.write(3, 30);
    let d = decode_operands(inst().add(1, 2, 3).build(), Format::R, &regs);
    assert_eq!((d.rd, d.src1, d.src2, d.imm), (1, 20, 30, 0));
}

proptest! {
    #[test]
    fn i_immediate_round_trips(imm in -2048i32..2048, rd in 1u32..32, rs1 in 0u32..32) {
        let word = inst().addi(rd, rs1, imm).build();
        let d = decode_operands(word, Format::I, &RegisterFile::new());
        prop_assert_eq!(d.imm as i32, imm);
        prop_assert_eq!(d.rd, rd as usize);
        prop_assert_eq!(word.rs1(), rs1 as usize);
    }

    #[test]
    fn s_immediate_round_trips(imm in -2048i32..2048) {
        let word = inst().sw(1, 2, imm).build();
        let d = decode_operands(word, Format::S, &RegisterFile::new());
        prop_assert_eq!(d.imm as i32, imm);
    }

    #[test]
    fn b_immediate_counts_halfwords(half in -2048i32..2048) {
        let word = inst().beq(1, 2, half * 2).build();
        let d = decode_operands(word, Format::B, &RegisterFile::new());
        prop_assert_eq!(d.imm as i32, half);
    }

    #[test]
    fn j_immediate_counts_halfwords(half in -(1i32 << 19)..(1i32 << 19)) {
        let word = inst().jal(1, half * 2).build();
        let d = decode_operands(word, Format::J, &RegisterFile::new());
        prop_assert_eq!(d.imm as i32, half);
    }

    #[test]
    fn u_immediate_keeps_upper_bits(upper in 0i32..(1 << 20)) {
        let word = inst().lui(1, upper).build();
        prop_assert_eq!(decode_u_type_imm(word), (upper as u32) << 12);
    }

    #[test]
    fn sign_extend_is_idempotent(val: u32, bits in 1u32..=32) {
        let once = sign_extend(val, bits);
        prop_assert_eq!(sign_extend(once, bits), once);
    }
}
