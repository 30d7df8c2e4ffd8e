//! RISC-V System Instructions.
//!
//! The simulator runs a single flat machine with no privilege levels, so this
//! module only names the system encodings it recognises.

/// System instruction encodings (ECALL, EBREAK).
pub mod opcodes;
