//! Execution units used by the single-cycle executor.
//!
//! 1. **ALU:** Integer arithmetic, logic, shifts and comparisons.
//! 2. **LSU:** Width-aware loads and stores through the memory port.

/// Arithmetic Logic Unit.
pub mod alu;

/// Load/Store Unit.
pub mod lsu;
