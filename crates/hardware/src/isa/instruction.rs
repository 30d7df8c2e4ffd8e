//! Instruction encoding and decoding utilities.
//!
//! Provides bit extraction functions and the structures produced by decoding
//! RISC-V instruction fields from 32-bit instruction encodings.

use crate::common::constants::{
    OPCODE_MASK, RD_MASK, RD_SHIFT, RS1_MASK, RS1_SHIFT, RS2_MASK, RS2_SHIFT,
};

/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit position shift for the funct3 field.
pub const FUNCT3_SHIFT: u32 = 12;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;
/// Bit position shift for the funct7 field.
pub const FUNCT7_SHIFT: u32 = 25;

/// Trait for extracting instruction fields from encoded instructions.
///
/// Provides methods to extract all standard RISC-V instruction fields
/// from a 32-bit instruction encoding.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> RD_SHIFT) & RD_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> RS1_SHIFT) & RS1_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> RS2_SHIFT) & RS2_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> FUNCT3_SHIFT) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> FUNCT7_SHIFT) & FUNCT7_MASK
    }
}

/// Operand format of an instruction, deciding which fields are extracted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// `imm[11:0] | rs1 | funct3 | rd | opcode`
    I,
    /// `imm[31:12] | rd | opcode`
    U,
    /// `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`
    S,
    /// `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`
    B,
    /// `funct7 | rs2 | rs1 | funct3 | rd | opcode`
    R,
    /// `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`
    J,
    /// No operands (`ebreak`, the invalid catch-all).
    N,
}

/// A decoded instruction, alive for exactly one decode-execute cycle.
///
/// Source operands are already resolved to register *values*; the immediate
/// is sign-extended per format and stored as its two's-complement bit pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// Raw instruction word.
    pub raw: u32,
    /// Operand format the word was decoded with.
    pub format: Format,
    /// Destination register index.
    pub rd: usize,
    /// Value of the first source register (zero when the format has none).
    pub src1: u32,
    /// Value of the second source register (zero when the format has none).
    pub src2: u32,
    /// Sign-extended immediate (zero when the format has none).
    pub imm: u32,
}
