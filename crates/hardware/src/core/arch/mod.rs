//! Architecture-specific state.
//!
//! RV32I exposes only the integer register file and the program counter; the
//! program counter lives on [`Cpu`](crate::core::Cpu).

/// General-Purpose Register (GPR) file.
pub mod gpr;
