//! Trap definitions.
//!
//! This module defines the conditions that stop the fetch/decode/execute path. It provides:
//! 1. **Trap Representation:** Breakpoints, undecodable words, and memory access faults.
//! 2. **Classification:** Separating the normal end of a program from fatal conditions.
//! 3. **Error Handling:** Integration with standard Rust error traits via `thiserror`.

use thiserror::Error;

/// Conditions raised while fetching, decoding, or executing one instruction.
///
/// Every variant carries the program counter or faulting address needed to
/// produce a diagnostic. Only [`Trap::Breakpoint`] ends a run normally.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Trap {
    /// `ebreak` was executed.
    ///
    /// `code` is the value of `a0` at the time of the trap; zero means the
    /// guest program reports success.
    #[error("breakpoint at pc = {pc:#010x} (a0 = {code})")]
    Breakpoint {
        /// Address of the `ebreak` instruction.
        pc: u32,
        /// Exit code taken from `a0`.
        code: u32,
    },

    /// The fetched word matched no entry of the decode table.
    #[error("invalid instruction {inst:#010x} at pc = {pc:#010x}")]
    IllegalInstruction {
        /// Address of the faulting instruction.
        pc: u32,
        /// Raw instruction word.
        inst: u32,
    },

    /// A decode entry named an operand format the executor cannot handle.
    #[error("unimplemented instruction format for {inst:#010x} at pc = {pc:#010x}")]
    UnimplementedFormat {
        /// Address of the faulting instruction.
        pc: u32,
        /// Raw instruction word.
        inst: u32,
    },

    /// Instruction fetch outside the physical window.
    #[error("instruction access fault at {addr:#010x}")]
    InstructionAccessFault {
        /// Faulting address.
        addr: u32,
    },

    /// Load (or debugger read) outside the physical window.
    #[error("load access fault at {addr:#010x} ({len} bytes)")]
    LoadAccessFault {
        /// Faulting address.
        addr: u32,
        /// Access width in bytes.
        len: usize,
    },

    /// Store outside the physical window.
    #[error("store access fault at {addr:#010x} ({len} bytes)")]
    StoreAccessFault {
        /// Faulting address.
        addr: u32,
        /// Access width in bytes.
        len: usize,
    },
}

impl Trap {
    /// Returns `true` for traps that abort the run rather than end it.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Breakpoint { .. })
    }
}
