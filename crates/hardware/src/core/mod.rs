//! Core processor implementation.
//!
//! This module contains the single-cycle CPU: architectural state, the
//! data-driven decode/execute step, and the execution units it uses.

/// Architecture-specific components (register file).
pub mod arch;

/// CPU core implementation and execution orchestration.
pub mod cpu;

/// Execution units (ALU, LSU).
pub mod units;

pub use self::cpu::Cpu;
