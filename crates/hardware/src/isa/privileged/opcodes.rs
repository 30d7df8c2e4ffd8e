//! RISC-V System Instruction Encodings.
//!
//! Only the debugger trap is executed; the remaining system encodings are
//! named so that the disassembler can label them.

/// System instruction opcode (0b1110011).
/// Used for ECALL, EBREAK and the CSR instructions.
pub const OP_SYSTEM: u32 = 0b1110011;

/// Environment Call (ECALL).
pub const ECALL: u32 = 0x0000_0073;

/// Environment Break (EBREAK).
/// Ends simulation with the exit code held in `a0`.
pub const EBREAK: u32 = 0x0010_0073;
