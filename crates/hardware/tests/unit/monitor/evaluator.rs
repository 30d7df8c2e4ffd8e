//! # Evaluator Tests
//!
//! Arithmetic and precedence, register and memory operands, and the split
//! between recoverable and fatal failures.

use rstest::rstest;
use rvsdb_core::common::{PMEM_BASE, RegisterFile};
use rvsdb_core::isa::abi::{REG_A0, REG_SP};
use rvsdb_core::monitor::expr::{self, EvalContext, ExprError};
use rvsdb_core::soc::Memory;

/// Machine state shared by the expression tests.
struct Machine {
    regs: RegisterFile,
    mem: Memory,
    pc: u32,
}

impl Machine {
    fn new() -> Self {
        let mut regs = RegisterFile::new();
        regs.write(REG_A0, 5);
        regs.write(REG_SP, PMEM_BASE + 4);
        let mut mem = Memory::new(PMEM_BASE, 256);
        mem.load(PMEM_BASE, &[0x11, 0x22, 0x33, 0x44, 0xab]).unwrap();
        Self {
            regs,
            mem,
            pc: PMEM_BASE + 0x10,
        }
    }

    fn eval(&self, text: &str) -> Result<u32, ExprError> {
        let ctx = EvalContext {
            regs: &self.regs,
            pc: self.pc,
            mem: &self.mem,
        };
        expr::evaluate(text, &ctx)
    }
}

#[rstest]
#[case("1+2*3", 7)]
#[case("(1+2)*3", 9)]
#[case("0x10+1", 17)]
#[case("1==1", 1)]
#[case("1&&0", 0)]
#[case("0||3", 1)]
#[case("2 != 2", 0)]
#[case("  42  ", 42)]
#[case("((7))", 7)]
#[case("(1 + 2) * (3 + 4)", 21)]
#[case("100 / 7", 14)]
#[case("0 - 1", u32::MAX)]
#[case("0xffffffff + 2", 1)]
#[case("1 + 2 == 3", 1)]
#[case("1 == 1 && 2 == 3", 0)]
fn arithmetic(#[case] text: &str, #[case] expected: u32) {
    assert_eq!(Machine::new().eval(text), Ok(expected));
}

#[test]
fn equal_precedence_operators_split_at_the_first() {
    // Parsed as 10 - (4 - 3) and 64 / (4 / 2).
    let m = Machine::new();
    assert_eq!(m.eval("10 - 4 - 3"), Ok(9));
    assert_eq!(m.eval("64 / 4 / 2"), Ok(32));
}

#[rstest]
#[case("$a0", 5)]
#[case("$a0 * 2", 10)]
#[case("$0", 0)]
#[case("$zero", 0)]
#[case("$pc", PMEM_BASE + 0x10)]
#[case("$sp - 4 == 0x80000000", 1)]
fn register_operands(#[case] text: &str, #[case] expected: u32) {
    assert_eq!(Machine::new().eval(text), Ok(expected));
}

#[rstest]
#[case("*0x80000000", 0x11)]
#[case("*$sp", 0xab)]
#[case("*(0x80000000 + 2) + 1", 0x34)]
fn dereference_reads_one_byte(#[case] text: &str, #[case] expected: u32) {
    assert_eq!(Machine::new().eval(text), Ok(expected));
}

#[test]
fn nested_dereference_checks_every_address() {
    // The inner read yields 0xab, which is not a guest address.
    assert_eq!(
        Machine::new().eval("**0x80000004"),
        Err(ExprError::DerefOutOfWindow { addr: 0xab })
    );
}

#[test]
fn division_by_zero_is_fatal() {
    let err = Machine::new().eval("5/0").unwrap_err();
    assert_eq!(err, ExprError::DivisionByZero);
    assert!(err.is_fatal());
}

#[test]
fn dereference_below_window_is_recoverable() {
    let err = Machine::new().eval("*0x7ffffffc").unwrap_err();
    assert_eq!(err, ExprError::DerefOutOfWindow { addr: 0x7fff_fffc });
    assert!(!err.is_fatal());
}

#[rstest]
#[case::unknown_register("$foo", "UnknownRegister")]
#[case::missing_operand("1 +", "MalformedRange")]
#[case::leading_binary("+ 1", "MalformedRange")]
#[case::adjacent_literals("1 2", "NoMasterOperator")]
#[case::open_paren("(1 + 2", "ParenMismatch")]
#[case::close_paren("1 + 2)", "ParenMismatch")]
#[case::literal_overflow("0x100000000", "InvalidLiteral")]
#[case::empty("", "Empty")]
#[case::blank("   ", "Empty")]
fn malformed_expressions_are_recoverable(#[case] text: &str, #[case] variant: &str) {
    let err = Machine::new().eval(text).unwrap_err();
    assert!(!err.is_fatal(), "{text}: {err}");
    assert!(format!("{err:?}").starts_with(variant), "{text}: {err:?}");
}

#[test]
fn failure_in_one_operand_discards_the_other() {
    let m = Machine::new();
    assert!(matches!(
        m.eval("1 + $nope"),
        Err(ExprError::UnknownRegister { .. })
    ));
}
