//! Instruction Table and Single-Step Execution.
//!
//! This module implements the fetch/decode/execute step of the CPU. It performs the following:
//! 1. **Decode Table:** One [`InstEntry`] per RV32I instruction, matched first-hit-wins over the
//!    full opcode, funct3 and funct7 fields, ending in the `inv` catch-all.
//! 2. **Semantics:** A [`Semantics`] control word per entry, applied by [`Cpu::exec_once`]
//!    to the register file and the memory port.
//! 3. **Control Flow:** `snpc`/`dnpc` bookkeeping; taken branches and `jal` redirect to
//!    `pc + imm * 2` using the halfword-scaled immediate.
//! 4. **Observability:** Per-instruction tracing with disassembly when enabled.

use tracing::trace;

use super::Cpu;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::{PhysAddr, RegisterFile, Trap};
use crate::core::units::alu::{Alu, AluOp};
use crate::core::units::lsu::{Lsu, MemWidth};
use crate::isa::abi;
use crate::isa::decode::{InstEntry, Pattern, decode_operands, lookup};
use crate::isa::disasm::disassemble;
use crate::isa::instruction::{Decoded, Format};
use crate::soc::MemoryPort;

/// Comparison applied by a conditional branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchCond {
    /// `src1 == src2`
    Eq,
    /// `src1 != src2`
    Ne,
    /// Signed `src1 < src2`
    Lt,
    /// Signed `src1 >= src2`
    Ge,
    /// Unsigned `src1 < src2`
    Ltu,
    /// Unsigned `src1 >= src2`
    Geu,
}

impl BranchCond {
    /// Evaluates the predicate over two register values.
    pub const fn taken(self, a: u32, b: u32) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => (a as i32) < (b as i32),
            Self::Ge => (a as i32) >= (b as i32),
            Self::Ltu => a < b,
            Self::Geu => a >= b,
        }
    }
}

/// Semantic action attached to a decode table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Semantics {
    /// `rd = imm` (upper immediate, already shifted).
    Lui,
    /// `rd = pc + imm`.
    Auipc,
    /// `rd = snpc; dnpc = pc + imm * 2`.
    Jal,
    /// `rd = snpc; dnpc = src1 + imm`.
    Jalr,
    /// `dnpc = pc + imm * 2` when the condition holds.
    Branch(BranchCond),
    /// `rd = mem[src1 + imm]`, extended to a word.
    Load {
        /// Access width.
        width: MemWidth,
        /// Sign-extend (`true`) or zero-extend.
        signed: bool,
    },
    /// `mem[src1 + imm] = src2` truncated to the width.
    Store(MemWidth),
    /// `rd = src1 op src2` (R format) or `rd = src1 op imm` (I format).
    Alu(AluOp),
    /// Stop the run, reporting `pc` and `a0`.
    Ebreak,
    /// Undecodable word.
    Invalid,
}

/// Result of one completed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Address the instruction was fetched from.
    pub pc: u32,
    /// Sequential next address (`pc + 4`).
    pub snpc: u32,
    /// Address the next fetch uses.
    pub dnpc: u32,
    /// Raw instruction word.
    pub inst: u32,
    /// Mnemonic of the matched table entry.
    pub name: &'static str,
}

const fn entry(
    name: &'static str,
    pattern: &str,
    format: Format,
    exec: Semantics,
) -> InstEntry<Semantics> {
    InstEntry {
        name,
        pattern: Pattern::new(pattern),
        format,
        exec,
    }
}

/// RV32I decode table. Order matters: the first matching entry wins, so the
/// all-`?` `inv` entry must stay last.
#[rustfmt::skip]
pub static INST_TABLE: &[InstEntry<Semantics>] = &[
    entry("lui", "??????? ????? ????? ??? ????? 01101 11", Format::U, Semantics::Lui),
    entry("auipc", "??????? ????? ????? ??? ????? 00101 11", Format::U, Semantics::Auipc),
    entry("jal", "??????? ????? ????? ??? ????? 11011 11", Format::J, Semantics::Jal),
    entry("jalr", "??????? ????? ????? 000 ????? 11001 11", Format::I, Semantics::Jalr),
    entry("beq", "??????? ????? ????? 000 ????? 11000 11", Format::B, Semantics::Branch(BranchCond::Eq)),
    entry("bne", "??????? ????? ????? 001 ????? 11000 11", Format::B, Semantics::Branch(BranchCond::Ne)),
    entry("blt", "??????? ????? ????? 100 ????? 11000 11", Format::B, Semantics::Branch(BranchCond::Lt)),
    entry("bge", "??????? ????? ????? 101 ????? 11000 11", Format::B, Semantics::Branch(BranchCond::Ge)),
    entry("bltu", "??????? ????? ????? 110 ????? 11000 11", Format::B, Semantics::Branch(BranchCond::Ltu)),
    entry("bgeu", "??????? ????? ????? 111 ????? 11000 11", Format::B, Semantics::Branch(BranchCond::Geu)),
    entry("lb", "??????? ????? ????? 000 ????? 00000 11", Format::I, Semantics::Load { width: MemWidth::Byte, signed: true }),
    entry("lh", "??????? ????? ????? 001 ????? 00000 11", Format::I, Semantics::Load { width: MemWidth::Half, signed: true }),
    entry("lw", "??????? ????? ????? 010 ????? 00000 11", Format::I, Semantics::Load { width: MemWidth::Word, signed: true }),
    entry("lbu", "??????? ????? ????? 100 ????? 00000 11", Format::I, Semantics::Load { width: MemWidth::Byte, signed: false }),
    entry("lhu", "??????? ????? ????? 101 ????? 00000 11", Format::I, Semantics::Load { width: MemWidth::Half, signed: false }),
    entry("sb", "??????? ????? ????? 000 ????? 01000 11", Format::S, Semantics::Store(MemWidth::Byte)),
    entry("sh", "??????? ????? ????? 001 ????? 01000 11", Format::S, Semantics::Store(MemWidth::Half)),
    entry("sw", "??????? ????? ????? 010 ????? 01000 11", Format::S, Semantics::Store(MemWidth::Word)),
    entry("addi", "??????? ????? ????? 000 ????? 00100 11", Format::I, Semantics::Alu(AluOp::Add)),
    entry("slti", "??????? ????? ????? 010 ????? 00100 11", Format::I, Semantics::Alu(AluOp::Slt)),
    entry("sltiu", "??????? ????? ????? 011 ????? 00100 11", Format::I, Semantics::Alu(AluOp::Sltu)),
    entry("xori", "??????? ????? ????? 100 ????? 00100 11", Format::I, Semantics::Alu(AluOp::Xor)),
    entry("ori", "??????? ????? ????? 110 ????? 00100 11", Format::I, Semantics::Alu(AluOp::Or)),
    entry("andi", "??????? ????? ????? 111 ????? 00100 11", Format::I, Semantics::Alu(AluOp::And)),
    entry("slli", "0000000 ????? ????? 001 ????? 00100 11", Format::I, Semantics::Alu(AluOp::Sll)),
    entry("srli", "0000000 ????? ????? 101 ????? 00100 11", Format::I, Semantics::Alu(AluOp::Srl)),
    entry("srai", "0100000 ????? ????? 101 ????? 00100 11", Format::I, Semantics::Alu(AluOp::Sra)),
    entry("add", "0000000 ????? ????? 000 ????? 01100 11", Format::R, Semantics::Alu(AluOp::Add)),
    entry("sub", "0100000 ????? ????? 000 ????? 01100 11", Format::R, Semantics::Alu(AluOp::Sub)),
    entry("sll", "0000000 ????? ????? 001 ????? 01100 11", Format::R, Semantics::Alu(AluOp::Sll)),
    entry("slt", "0000000 ????? ????? 010 ????? 01100 11", Format::R, Semantics::Alu(AluOp::Slt)),
    entry("sltu", "0000000 ????? ????? 011 ????? 01100 11", Format::R, Semantics::Alu(AluOp::Sltu)),
    entry("xor", "0000000 ????? ????? 100 ????? 01100 11", Format::R, Semantics::Alu(AluOp::Xor)),
    entry("srl", "0000000 ????? ????? 101 ????? 01100 11", Format::R, Semantics::Alu(AluOp::Srl)),
    entry("sra", "0100000 ????? ????? 101 ????? 01100 11", Format::R, Semantics::Alu(AluOp::Sra)),
    entry("or", "0000000 ????? ????? 110 ????? 01100 11", Format::R, Semantics::Alu(AluOp::Or)),
    entry("and", "0000000 ????? ????? 111 ????? 01100 11", Format::R, Semantics::Alu(AluOp::And)),
    entry("ebreak", "0000000 00001 00000 000 00000 11100 11", Format::N, Semantics::Ebreak),
    entry("inv", "??????? ????? ????? ??? ????? ????? ??", Format::N, Semantics::Invalid),
];

/// Program-counter bookkeeping for the instruction being executed.
#[derive(Clone, Copy, Debug)]
struct Pcs {
    pc: u32,
    snpc: u32,
    dnpc: u32,
}

impl Pcs {
    /// Target of a taken branch or `jal`: the immediate counts halfwords.
    const fn relative(&self, imm: u32) -> u32 {
        self.pc.wrapping_add(imm.wrapping_mul(2))
    }
}

impl Cpu {
    /// Executes exactly one instruction.
    ///
    /// Fetches four bytes at `pc`, sets `snpc = pc + 4` and `dnpc = snpc`, decodes the
    /// word through [`INST_TABLE`], applies the entry's semantics, forces `x0` back to
    /// zero and finally moves `pc` to `dnpc`. On a trap the program counter is left on
    /// the trapping instruction.
    ///
    /// # Arguments
    ///
    /// * `mem` - The memory port used for the fetch, loads and stores.
    ///
    /// # Returns
    ///
    /// The completed [`Step`], or the trap that stopped it ([`Trap::Breakpoint`] for `ebreak`).
    pub fn exec_once(&mut self, mem: &mut dyn MemoryPort) -> Result<Step, Trap> {
        let pc = self.pc;
        let inst = mem.fetch(pc, INSTRUCTION_SIZE as usize)?;
        let snpc = pc.wrapping_add(INSTRUCTION_SIZE);

        let entry = lookup(INST_TABLE, inst).ok_or(Trap::UnimplementedFormat { pc, inst })?;
        let decoded = decode_operands(inst, entry.format, &self.regs);

        if self.trace {
            trace!(
                target: "rvsdb::itrace",
                pc = %PhysAddr(pc),
                inst = %format!("{inst:08x}"),
                "{}",
                disassemble(inst)
            );
        }

        let mut pcs = Pcs {
            pc,
            snpc,
            dnpc: snpc,
        };
        let result = execute(entry.exec, &decoded, &mut pcs, &mut self.regs, mem);
        self.regs.clear_zero();
        result?;

        self.pc = pcs.dnpc;
        Ok(Step {
            pc,
            snpc,
            dnpc: pcs.dnpc,
            inst,
            name: entry.name,
        })
    }
}

/// Applies one entry's semantics to the architectural state.
fn execute(
    sem: Semantics,
    d: &Decoded,
    pcs: &mut Pcs,
    regs: &mut RegisterFile,
    mem: &mut dyn MemoryPort,
) -> Result<(), Trap> {
    match sem {
        Semantics::Lui => regs.write(d.rd, d.imm),
        Semantics::Auipc => regs.write(d.rd, pcs.pc.wrapping_add(d.imm)),
        Semantics::Jal => {
            regs.write(d.rd, pcs.snpc);
            pcs.dnpc = pcs.relative(d.imm);
        }
        Semantics::Jalr => {
            let target = d.src1.wrapping_add(d.imm);
            regs.write(d.rd, pcs.snpc);
            pcs.dnpc = target;
        }
        Semantics::Branch(cond) => {
            if cond.taken(d.src1, d.src2) {
                pcs.dnpc = pcs.relative(d.imm);
            }
        }
        Semantics::Load { width, signed } => {
            let val = Lsu::load(mem, d.src1.wrapping_add(d.imm), width, signed)?;
            regs.write(d.rd, val);
        }
        Semantics::Store(width) => Lsu::store(mem, d.src1.wrapping_add(d.imm), width, d.src2)?,
        Semantics::Alu(op) => {
            let b = if d.format == Format::R { d.src2 } else { d.imm };
            regs.write(d.rd, Alu::execute(op, d.src1, b));
        }
        Semantics::Ebreak => {
            return Err(Trap::Breakpoint {
                pc: pcs.pc,
                code: regs.read(abi::REG_A0),
            });
        }
        Semantics::Invalid => {
            return Err(Trap::IllegalInstruction {
                pc: pcs.pc,
                inst: d.raw,
            });
        }
    }
    Ok(())
}
