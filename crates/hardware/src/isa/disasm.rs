//! Instruction Disassembler for RISC-V RV32I.
//!
//! Converts a 32-bit instruction encoding into a human-readable mnemonic
//! string for instruction tracing and debugger diagnostics.
//!
//! # Usage
//!
//! ```
//! use rvsdb_core::isa::disasm::disassemble;
//! let text = disassemble(0x00A00513); // ADDI x10, x0, 10
//! assert_eq!(text, "addi a0, $0, 10");
//! ```

use crate::isa::abi::index_to_name as xreg;
use crate::isa::decode::{
    decode_b_type_imm, decode_i_type_imm, decode_j_type_imm, decode_s_type_imm,
};
use crate::isa::instruction::InstructionBits;
use crate::isa::privileged::opcodes as sys_op;
use crate::isa::rv32i::{funct3 as f3, funct7 as f7, opcodes as op};

/// Disassembles a 32-bit RISC-V instruction into a human-readable string.
///
/// Returns a mnemonic like `"add a0, a1, a2"` or `"unknown"` for
/// unrecognised encodings. Branch and jump offsets are printed in bytes.
///
/// # Arguments
///
/// * `inst` - The raw 32-bit instruction encoding.
pub fn disassemble(inst: u32) -> String {
    let rd = inst.rd();
    let rs1 = inst.rs1();
    let rs2 = inst.rs2();
    let funct3 = inst.funct3();
    let imm_i = decode_i_type_imm(inst) as i32;

    match inst.opcode() {
        op::OP_REG => disasm_op_reg(rd, rs1, rs2, funct3, inst.funct7()),
        op::OP_IMM => disasm_op_imm(rd, rs1, funct3, inst.funct7(), imm_i),

        op::OP_LOAD => {
            let mn = match funct3 {
                f3::LB => "lb",
                f3::LH => "lh",
                f3::LW => "lw",
                f3::LBU => "lbu",
                f3::LHU => "lhu",
                _ => return "unknown".to_string(),
            };
            format!("{mn} {}, {imm_i}({})", xreg(rd), xreg(rs1))
        }

        op::OP_STORE => {
            let mn = match funct3 {
                f3::SB => "sb",
                f3::SH => "sh",
                f3::SW => "sw",
                _ => return "unknown".to_string(),
            };
            let imm_s = decode_s_type_imm(inst) as i32;
            format!("{mn} {}, {imm_s}({})", xreg(rs2), xreg(rs1))
        }

        op::OP_BRANCH => {
            let mn = match funct3 {
                f3::BEQ => "beq",
                f3::BNE => "bne",
                f3::BLT => "blt",
                f3::BGE => "bge",
                f3::BLTU => "bltu",
                f3::BGEU => "bgeu",
                _ => return "unknown".to_string(),
            };
            let offset = (decode_b_type_imm(inst) as i32).wrapping_mul(2);
            format!("{mn} {}, {}, {offset}", xreg(rs1), xreg(rs2))
        }

        op::OP_LUI => format!("lui {}, {:#x}", xreg(rd), inst >> 12),
        op::OP_AUIPC => format!("auipc {}, {:#x}", xreg(rd), inst >> 12),

        op::OP_JAL => {
            let offset = (decode_j_type_imm(inst) as i32).wrapping_mul(2);
            format!("jal {}, {offset}", xreg(rd))
        }
        op::OP_JALR if funct3 == f3::JALR => {
            format!("jalr {}, {imm_i}({})", xreg(rd), xreg(rs1))
        }

        sys_op::OP_SYSTEM => match inst {
            sys_op::EBREAK => "ebreak".to_string(),
            sys_op::ECALL => "ecall".to_string(),
            _ => "unknown".to_string(),
        },

        _ => "unknown".to_string(),
    }
}

/// Disassembles an R-type register-register instruction.
fn disasm_op_reg(rd: usize, rs1: usize, rs2: usize, funct3: u32, funct7: u32) -> String {
    let mn = match (funct3, funct7) {
        (f3::ADD_SUB, f7::DEFAULT) => "add",
        (f3::ADD_SUB, f7::SUB) => "sub",
        (f3::SLL, f7::DEFAULT) => "sll",
        (f3::SLT, f7::DEFAULT) => "slt",
        (f3::SLTU, f7::DEFAULT) => "sltu",
        (f3::XOR, f7::DEFAULT) => "xor",
        (f3::SRL_SRA, f7::DEFAULT) => "srl",
        (f3::SRL_SRA, f7::SRA) => "sra",
        (f3::OR, f7::DEFAULT) => "or",
        (f3::AND, f7::DEFAULT) => "and",
        _ => return "unknown".to_string(),
    };
    format!("{mn} {}, {}, {}", xreg(rd), xreg(rs1), xreg(rs2))
}

/// Disassembles an I-type immediate arithmetic instruction.
fn disasm_op_imm(rd: usize, rs1: usize, funct3: u32, funct7: u32, imm: i32) -> String {
    let shamt = imm & 0x1F;
    match funct3 {
        f3::ADD_SUB => format!("addi {}, {}, {imm}", xreg(rd), xreg(rs1)),
        f3::SLT => format!("slti {}, {}, {imm}", xreg(rd), xreg(rs1)),
        f3::SLTU => format!("sltiu {}, {}, {imm}", xreg(rd), xreg(rs1)),
        f3::XOR => format!("xori {}, {}, {imm}", xreg(rd), xreg(rs1)),
        f3::OR => format!("ori {}, {}, {imm}", xreg(rd), xreg(rs1)),
        f3::AND => format!("andi {}, {}, {imm}", xreg(rd), xreg(rs1)),
        f3::SLL if funct7 == f7::DEFAULT => format!("slli {}, {}, {shamt}", xreg(rd), xreg(rs1)),
        f3::SRL_SRA if funct7 == f7::DEFAULT => {
            format!("srli {}, {}, {shamt}", xreg(rd), xreg(rs1))
        }
        f3::SRL_SRA if funct7 == f7::SRA => format!("srai {}, {}, {shamt}", xreg(rd), xreg(rs1)),
        _ => "unknown".to_string(),
    }
}
