//! RISC-V Instruction Decoder.
//!
//! This module handles the decoding of 32-bit RISC-V instruction encodings. Decoding is
//! table driven: every instruction is described by a bit pattern string such as
//! `"??????? ????? ????? 000 ????? 00100 11"`, compiled at build time into a
//! `(mask, expected)` pair. The first table entry whose masked bits match wins, so the
//! table order is significant and a catch-all entry must come last.
//!
//! Once an entry is selected, [`decode_operands`] extracts the destination register,
//! reads the source registers, and sign-extends the immediate for the entry's format.

use crate::common::RegisterFile;
use crate::isa::instruction::{Decoded, Format, InstructionBits};

/// Total width of a RISC-V instruction in bits.
const INSTRUCTION_WIDTH: u32 = 32;

/// Bit shift for extracting I-Type immediate field (bits 20-31).
///
/// I-Type format: `imm[11:0] | rs1 | funct3 | rd | opcode`
const I_IMM_SHIFT: u32 = 20;

/// Total number of bits in I-Type immediate (12 bits).
const I_IMM_BITS: u32 = 12;

/// Bit shift for extracting S-Type immediate low field (bits 7-11).
///
/// S-Type format: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`
const S_IMM_LOW_SHIFT: u32 = 7;

/// Bit mask for S-Type immediate low field (5 bits: imm[4:0]).
const S_IMM_LOW_MASK: u32 = 0x1F;

/// Bit shift for extracting S-Type immediate high field (bits 25-31).
const S_IMM_HIGH_SHIFT: u32 = 25;

/// Bit mask for S-Type immediate high field (7 bits: imm[11:5]).
const S_IMM_HIGH_MASK: u32 = 0x7F;

/// Bit shift for combining S-Type immediate fields after extraction.
const S_IMM_COMBINED_SHIFT: u32 = 5;

/// Total number of bits in S-Type immediate (12 bits).
const S_IMM_BITS: u32 = 12;

/// B-Type immediate bit 11 comes from instruction bit 7.
///
/// B-Type format: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`
/// The decoded value is the offset in halfwords (`imm[12:1]`), not bytes.
const B_IMM_11_SHIFT: u32 = 7;

/// B-Type immediate bits 4-1 come from instruction bits 8-11.
const B_IMM_4_1_SHIFT: u32 = 8;

/// Bit mask for B-Type immediate bits 4-1 (4 bits).
const B_IMM_4_1_MASK: u32 = 0xF;

/// B-Type immediate bits 10-5 come from instruction bits 25-30.
const B_IMM_10_5_SHIFT: u32 = 25;

/// Bit mask for B-Type immediate bits 10-5 (6 bits).
const B_IMM_10_5_MASK: u32 = 0x3F;

/// B-Type immediate bit 12 (sign) comes from instruction bit 31.
const B_IMM_12_SHIFT: u32 = 31;

/// Width of the halfword-scaled B-Type immediate (`imm[12:1]`, 12 bits).
const B_IMM_BITS: u32 = 12;

/// J-Type immediate bits 19-12 come from instruction bits 12-19.
///
/// J-Type format: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`
/// The decoded value is the offset in halfwords (`imm[20:1]`), not bytes.
const J_IMM_19_12_SHIFT: u32 = 12;

/// Bit mask for J-Type immediate bits 19-12 (8 bits).
const J_IMM_19_12_MASK: u32 = 0xFF;

/// J-Type immediate bit 11 comes from instruction bit 20.
const J_IMM_11_SHIFT: u32 = 20;

/// J-Type immediate bits 10-1 come from instruction bits 21-30.
const J_IMM_10_1_SHIFT: u32 = 21;

/// Bit mask for J-Type immediate bits 10-1 (10 bits).
const J_IMM_10_1_MASK: u32 = 0x3FF;

/// J-Type immediate bit 20 (sign) comes from instruction bit 31.
const J_IMM_20_SHIFT: u32 = 31;

/// Width of the halfword-scaled J-Type immediate (`imm[20:1]`, 20 bits).
const J_IMM_BITS: u32 = 20;

/// Bit mask for extracting U-Type immediate field (bits 12-31).
///
/// U-Type format: `imm[31:12] | rd | opcode`
/// The 20-bit field is already positioned in the upper bits.
const U_IMM_MASK: u32 = 0xFFFF_F000;

/// A compiled instruction bit pattern.
///
/// A word matches when `word & mask == expected`. Positions written as `?` in the
/// source pattern are zero in `mask` and therefore ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern {
    /// Bits that participate in the comparison.
    pub mask: u32,
    /// Required values of the masked bits.
    pub expected: u32,
}

impl Pattern {
    /// Compiles a pattern string of `0`, `1` and `?` characters.
    ///
    /// Spaces are ignored and may be used to separate fields. The string must
    /// contain exactly 32 significant characters, most significant bit first.
    /// Intended for `const` contexts, where a malformed pattern fails the build.
    pub const fn new(src: &str) -> Self {
        let bytes = src.as_bytes();
        let mut mask = 0u32;
        let mut expected = 0u32;
        let mut width = 0u32;
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i];
            i += 1;
            if c == b' ' {
                continue;
            }
            mask <<= 1;
            expected <<= 1;
            match c {
                b'0' => mask |= 1,
                b'1' => {
                    mask |= 1;
                    expected |= 1;
                }
                b'?' => {}
                _ => panic!("instruction pattern may only contain '0', '1', '?' and spaces"),
            }
            width += 1;
        }
        assert!(
            width == INSTRUCTION_WIDTH,
            "instruction pattern must describe exactly 32 bits"
        );
        Self { mask, expected }
    }

    /// Returns `true` if `inst` matches this pattern.
    #[inline(always)]
    pub const fn matches(&self, inst: u32) -> bool {
        inst & self.mask == self.expected
    }
}

/// One row of a decode table.
///
/// `H` is the semantic handler type supplied by the executor, which keeps this
/// module free of any knowledge about architectural state mutation.
#[derive(Clone, Copy, Debug)]
pub struct InstEntry<H> {
    /// Assembly mnemonic, used for tracing.
    pub name: &'static str,
    /// Bit pattern selecting this entry.
    pub pattern: Pattern,
    /// Operand format used to extract fields.
    pub format: Format,
    /// Semantic handler run by the executor.
    pub exec: H,
}

/// Finds the first table entry whose pattern matches `inst`.
///
/// # Returns
///
/// The matching entry, or `None` when no entry (including any catch-all) matches.
pub fn lookup<H>(table: &[InstEntry<H>], inst: u32) -> Option<&InstEntry<H>> {
    table.iter().find(|entry| entry.pattern.matches(inst))
}

/// Extracts operands from `inst` according to `format`.
///
/// Source register values are read from `regs` at decode time, matching the
/// behaviour of a single-cycle datapath.
///
/// # Arguments
///
/// * `inst` - The 32-bit instruction encoding.
/// * `format` - The operand format selected by the decode table.
/// * `regs` - Register file used to resolve source operands.
///
/// # Returns
///
/// A `Decoded` record for a single decode-execute cycle.
pub fn decode_operands(inst: u32, format: Format, regs: &RegisterFile) -> Decoded {
    let rd = inst.rd();
    let read_rs1 = || regs.read(inst.rs1());
    let read_rs2 = || regs.read(inst.rs2());

    let (src1, src2, imm) = match format {
        Format::I => (read_rs1(), 0, decode_i_type_imm(inst)),
        Format::U => (0, 0, decode_u_type_imm(inst)),
        Format::S => (read_rs1(), read_rs2(), decode_s_type_imm(inst)),
        Format::B => (read_rs1(), read_rs2(), decode_b_type_imm(inst)),
        Format::R => (read_rs1(), read_rs2(), 0),
        Format::J => (0, 0, decode_j_type_imm(inst)),
        Format::N => (0, 0, 0),
    };

    Decoded {
        raw: inst,
        format,
        rd,
        src1,
        src2,
        imm,
    }
}

/// Decodes the immediate value for I-Type instructions.
///
/// Used for Load, JALR, and Immediate Arithmetic instructions.
pub const fn decode_i_type_imm(inst: u32) -> u32 {
    sign_extend(inst >> I_IMM_SHIFT, I_IMM_BITS)
}

/// Decodes the immediate value for S-Type instructions.
///
/// Used for Store instructions.
pub const fn decode_s_type_imm(inst: u32) -> u32 {
    let low = (inst >> S_IMM_LOW_SHIFT) & S_IMM_LOW_MASK;
    let high = (inst >> S_IMM_HIGH_SHIFT) & S_IMM_HIGH_MASK;
    let combined = (high << S_IMM_COMBINED_SHIFT) | low;
    sign_extend(combined, S_IMM_BITS)
}

/// Decodes the immediate value for B-Type instructions.
///
/// Returns `imm[12:1]` sign-extended, i.e. the branch offset in halfwords.
/// The executor scales it by two when forming the target.
pub const fn decode_b_type_imm(inst: u32) -> u32 {
    let bit_11 = (inst >> B_IMM_11_SHIFT) & 1;
    let bits_4_1 = (inst >> B_IMM_4_1_SHIFT) & B_IMM_4_1_MASK;
    let bits_10_5 = (inst >> B_IMM_10_5_SHIFT) & B_IMM_10_5_MASK;
    let bit_12 = (inst >> B_IMM_12_SHIFT) & 1;

    let combined = (bit_12 << 11) | (bit_11 << 10) | (bits_10_5 << 4) | bits_4_1;
    sign_extend(combined, B_IMM_BITS)
}

/// Decodes the immediate value for U-Type instructions.
///
/// Used for LUI and AUIPC. The result already has the 20-bit field in the
/// upper bits and zeros below.
pub const fn decode_u_type_imm(inst: u32) -> u32 {
    inst & U_IMM_MASK
}

/// Decodes the immediate value for J-Type instructions.
///
/// Returns `imm[20:1]` sign-extended, i.e. the jump offset in halfwords.
pub const fn decode_j_type_imm(inst: u32) -> u32 {
    let bits_19_12 = (inst >> J_IMM_19_12_SHIFT) & J_IMM_19_12_MASK;
    let bit_11 = (inst >> J_IMM_11_SHIFT) & 1;
    let bits_10_1 = (inst >> J_IMM_10_1_SHIFT) & J_IMM_10_1_MASK;
    let bit_20 = (inst >> J_IMM_20_SHIFT) & 1;

    let combined = (bit_20 << 19) | (bits_19_12 << 11) | (bit_11 << 10) | bits_10_1;
    sign_extend(combined, J_IMM_BITS)
}

/// Sign extends the low `bits` of `val` to a full 32-bit word.
///
/// # Arguments
///
/// * `val` - The value to extend.
/// * `bits` - The number of valid bits in `val`.
pub const fn sign_extend(val: u32, bits: u32) -> u32 {
    let shift = INSTRUCTION_WIDTH - bits;
    (((val << shift) as i32) >> shift) as u32
}
