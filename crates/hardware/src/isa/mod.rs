//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains definitions for opcodes, function codes, register names, and the
//! table-driven decoding logic for the RV32I base integer instruction set.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Table-driven instruction decoding and immediate extraction.
pub mod decode;

/// Instruction disassembler for debug tracing and diagnostics.
pub mod disasm;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// System instruction encodings (ECALL, EBREAK).
pub mod privileged;

/// Base integer instruction set (32-bit RISC-V core instructions).
pub mod rv32i;
