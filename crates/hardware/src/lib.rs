//! RISC-V instruction-set simulator and debugger library.
//!
//! This crate implements an RV32I interpreter with a built-in debugger, covering the following:
//! 1. **Core:** Register file, program counter, and a table-driven fetch/decode/execute step.
//! 2. **Memory:** A flat physical window behind the memory access port trait.
//! 3. **ISA:** Decode table patterns, immediate extraction, ABI names, and a disassembler.
//! 4. **Monitor:** Expression tokenizer and evaluator plus a bounded watchpoint pool.
//! 5. **Simulation:** Image loading, run-state tracking, configuration, and statistics.

/// Common types and constants (addresses, registers, traps, access types).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// CPU core (architectural state, execution units, single-step executor).
pub mod core;
/// Instruction set (decode, instruction fields, ABI, RV32I, system encodings).
pub mod isa;
/// Debugger core (expressions and watchpoints).
pub mod monitor;
/// Image loader and the simulator driver.
pub mod sim;
/// Guest memory and the memory access port.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU type; holds the register file and the program counter.
pub use crate::core::Cpu;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Flat physical memory implementing the access port.
pub use crate::soc::Memory;
