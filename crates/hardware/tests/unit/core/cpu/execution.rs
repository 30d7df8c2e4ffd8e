//! # CPU Execution Tests
//!
//! One instruction at a time through `Cpu::exec_once`: register results,
//! `snpc`/`dnpc` bookkeeping, and the traps that stop a step.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvsdb_core::common::Trap;
use rvsdb_core::isa::abi::{REG_A0, REG_RA};

use crate::common::TestContext;
use crate::common::builder::instruction::{ebreak, inst};
use crate::common::harness::TEST_BASE;

fn single(word: u32) -> TestContext {
    TestContext::new().program(&[word])
}

#[test]
fn add_sums_sources() {
    let mut ctx = single(inst().add(3, 1, 2).build());
    ctx.set_reg(1, 5);
    ctx.set_reg(2, 7);
    let step = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(3), 12);
    assert_eq!(step.name, "add");
    assert_eq!(step.snpc, TEST_BASE + 4);
    assert_eq!(step.dnpc, step.snpc);
    assert_eq!(ctx.pc(), TEST_BASE + 4);
}

#[test]
fn sub_wraps_to_unsigned() {
    let mut ctx = single(inst().sub(3, 1, 2).build());
    ctx.set_reg(1, 5);
    ctx.set_reg(2, 7);
    let _ = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(3), (-2i32) as u32);
}

#[test]
fn addi_sign_extends_negative_immediate() {
    let mut ctx = single(inst().addi(3, 1, -12).build());
    ctx.set_reg(1, 20);
    let _ = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(3), 8);
}

#[test]
fn shifts_by_immediate() {
    let mut ctx = TestContext::new().program(&[
        inst().slli(3, 1, 4).build(),
        inst().srai(4, 2, 4).build(),
    ]);
    ctx.set_reg(1, 0x0000_00f1);
    ctx.set_reg(2, 0x8000_0000);
    let _ = ctx.exec().unwrap();
    let step = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(3), 0x0000_0f10);
    assert_eq!(ctx.get_reg(4), 0xf800_0000);
    assert_eq!(step.name, "srai");
}

#[rstest]
#[case::sll(inst().sll(3, 1, 2).build(), 0x0000_00f1, 36, 0x0000_0f10)]
#[case::slt_signed(inst().slt(3, 1, 2).build(), u32::MAX, 1, 1)]
#[case::slt_not_less(inst().slt(3, 1, 2).build(), 1, u32::MAX, 0)]
#[case::sltu_unsigned(inst().sltu(3, 1, 2).build(), u32::MAX, 1, 0)]
#[case::xor(inst().xor(3, 1, 2).build(), 0xff00_ff00, 0x0ff0_0ff0, 0xf0f0_f0f0)]
#[case::srl_zero_fills(inst().srl(3, 1, 2).build(), 0x8000_0000, 4, 0x0800_0000)]
#[case::sra_sign_fills(inst().sra(3, 1, 2).build(), 0x8000_0000, 4, 0xf800_0000)]
#[case::or(inst().or(3, 1, 2).build(), 0xf000_000f, 0x0f00_00f0, 0xff00_00ff)]
#[case::and(inst().and(3, 1, 2).build(), 0xff00_ff00, 0x0ff0_0ff0, 0x0f00_0f00)]
fn register_ops_combine_sources(
    #[case] word: u32,
    #[case] a: u32,
    #[case] b: u32,
    #[case] expected: u32,
) {
    let mut ctx = single(word);
    ctx.set_reg(1, a);
    ctx.set_reg(2, b);
    let _ = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(3), expected);
}

#[rstest]
#[case::slti_signed(inst().slti(3, 1, -1).build(), (-2i32) as u32, 1)]
#[case::slti_not_less(inst().slti(3, 1, -1).build(), 0, 0)]
#[case::sltiu_sign_extended(inst().sltiu(3, 1, -1).build(), 0xffff_fffe, 1)]
#[case::sltiu_not_less(inst().sltiu(3, 1, 1).build(), 1, 0)]
#[case::xori_minus_one_inverts(inst().xori(3, 1, -1).build(), 0x1234_5678, 0xedcb_a987)]
#[case::ori(inst().ori(3, 1, 0x0f0).build(), 0x0000_0f00, 0x0000_0ff0)]
#[case::andi_sign_extended(inst().andi(3, 1, -16).build(), 0x1234_5678, 0x1234_5670)]
#[case::srli_zero_fills(inst().srli(3, 1, 8).build(), 0x8000_0000, 0x0080_0000)]
fn immediate_ops_use_extended_immediate(
    #[case] word: u32,
    #[case] a: u32,
    #[case] expected: u32,
) {
    let mut ctx = single(word);
    ctx.set_reg(1, a);
    let _ = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(3), expected);
}

#[rstest]
#[case::beq_equal(inst().beq(1, 2, 16).build(), 3, 3, true)]
#[case::beq_unequal(inst().beq(1, 2, 16).build(), 3, 4, false)]
#[case::bne_unequal(inst().bne(1, 2, 16).build(), 3, 4, true)]
#[case::bne_equal(inst().bne(1, 2, 16).build(), 3, 3, false)]
#[case::blt_signed(inst().blt(1, 2, 16).build(), u32::MAX, 0, true)]
#[case::blt_not_less(inst().blt(1, 2, 16).build(), 0, u32::MAX, false)]
#[case::bge_equal(inst().bge(1, 2, 16).build(), 5, 5, true)]
#[case::bge_signed(inst().bge(1, 2, 16).build(), 0, u32::MAX, true)]
#[case::bge_less(inst().bge(1, 2, 16).build(), u32::MAX, 0, false)]
#[case::bltu_unsigned(inst().bltu(1, 2, 16).build(), 0, u32::MAX, true)]
#[case::bltu_not_less(inst().bltu(1, 2, 16).build(), u32::MAX, 0, false)]
#[case::bgeu_unsigned(inst().bgeu(1, 2, 16).build(), u32::MAX, 0, true)]
#[case::bgeu_less(inst().bgeu(1, 2, 16).build(), 0, u32::MAX, false)]
fn branch_redirects_only_when_taken(
    #[case] word: u32,
    #[case] a: u32,
    #[case] b: u32,
    #[case] taken: bool,
) {
    let mut ctx = single(word);
    ctx.set_reg(1, a);
    ctx.set_reg(2, b);
    let step = ctx.exec().unwrap();
    let expected = if taken { TEST_BASE + 16 } else { step.snpc };
    assert_eq!(step.dnpc, expected);
    assert_eq!(ctx.pc(), expected);
}

#[test]
fn backward_branch_wraps_below_pc() {
    let mut ctx = TestContext::new().load_program(TEST_BASE + 8, &[inst().beq(0, 0, -8).build()]);
    let step = ctx.exec().unwrap();
    assert_eq!(step.dnpc, TEST_BASE);
}

#[test]
fn jal_links_and_jumps() {
    let mut ctx = single(inst().jal(REG_RA as u32, 0x100).build());
    let step = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(REG_RA), TEST_BASE + 4);
    assert_eq!(step.dnpc, TEST_BASE + 0x100);
}

#[test]
fn jalr_targets_base_plus_offset() {
    let mut ctx = single(inst().jalr(REG_RA as u32, 5, 8).build());
    ctx.set_reg(5, TEST_BASE + 0x40);
    let step = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(REG_RA), TEST_BASE + 4);
    assert_eq!(step.dnpc, TEST_BASE + 0x48);
}

#[test]
fn lui_and_auipc_use_upper_immediate() {
    let mut ctx = TestContext::new().program(&[
        inst().lui(3, 0x12345).build(),
        inst().auipc(4, 0x1).build(),
    ]);
    let _ = ctx.exec().unwrap();
    let _ = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(3), 0x1234_5000);
    assert_eq!(ctx.get_reg(4), TEST_BASE + 4 + 0x1000);
}

#[test]
fn x0_stays_zero_after_write() {
    let mut ctx = TestContext::new().program(&[
        inst().addi(0, 0, 99).build(),
        inst().jal(0, 8).build(),
    ]);
    let _ = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(0), 0);
    let _ = ctx.exec().unwrap();
    assert_eq!(ctx.get_reg(0), 0);
}

#[test]
fn store_then_load_round_trips_through_memory() {
    let mut ctx = TestContext::new().program(&[
        inst().sw(5, 6, 0x100).build(),
        inst().lw(7, 5, 0x100).build(),
        inst().sb(5, 6, 0x104).build(),
        inst().lb(8, 5, 0x104).build(),
        inst().lbu(9, 5, 0x104).build(),
    ]);
    ctx.set_reg(5, TEST_BASE);
    ctx.set_reg(6, 0x1234_5680);
    for _ in 0..5 {
        let _ = ctx.exec().unwrap();
    }
    assert_eq!(ctx.get_reg(7), 0x1234_5680);
    assert_eq!(ctx.get_reg(8), 0xffff_ff80);
    assert_eq!(ctx.get_reg(9), 0x80);
}

#[test]
fn ebreak_reports_a0_and_keeps_pc() {
    let mut ctx = single(ebreak());
    ctx.set_reg(REG_A0, 3);
    assert_eq!(
        ctx.exec(),
        Err(Trap::Breakpoint {
            pc: TEST_BASE,
            code: 3
        })
    );
    assert_eq!(ctx.pc(), TEST_BASE);
}

#[rstest]
#[case::all_zero(0x0000_0000)]
#[case::ecall(0x0000_0073)]
#[case::fence(0x0000_000f)]
#[case::bad_funct7(0x4000_1033)]
fn unknown_words_are_illegal(#[case] word: u32) {
    let mut ctx = single(word);
    assert_eq!(
        ctx.exec(),
        Err(Trap::IllegalInstruction {
            pc: TEST_BASE,
            inst: word
        })
    );
}

#[test]
fn fetch_outside_memory_faults() {
    let mut ctx = TestContext::new();
    ctx.sim.cpu.pc = 0x1000;
    assert_eq!(
        ctx.exec(),
        Err(Trap::InstructionAccessFault { addr: 0x1000 })
    );
}

#[test]
fn faulting_load_leaves_destination_untouched() {
    let mut ctx = single(inst().lw(7, 0, 0).build());
    ctx.set_reg(7, 11);
    assert!(matches!(ctx.exec(), Err(Trap::LoadAccessFault { addr: 0, len: 4 })));
    assert_eq!(ctx.get_reg(7), 11);
    assert_eq!(ctx.pc(), TEST_BASE);
}

#[test]
fn halfword_store_then_signed_and_unsigned_loads() {
    let mut ctx = TestContext::new().program(&[
        inst().sh(5, 6, 0x100).build(),
        inst().lh(7, 5, 0x100).build(),
        inst().lhu(8, 5, 0x100).build(),
        inst().lw(9, 5, 0x100).build(),
    ]);
    ctx.set_reg(5, TEST_BASE);
    ctx.set_reg(6, 0xabcd_8001);
    let names: Vec<&str> = (0..4).map(|_| ctx.exec().unwrap().name).collect();
    assert_eq!(names, ["sh", "lh", "lhu", "lw"]);
    assert_eq!(ctx.get_reg(7), 0xffff_8001);
    assert_eq!(ctx.get_reg(8), 0x0000_8001);
    assert_eq!(ctx.get_reg(9), 0x0000_8001);
}
