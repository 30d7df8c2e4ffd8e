//! RISC-V Application Binary Interface (ABI) register names.
//!
//! Defines the standard RV32 ABI register mnemonics, the indices the executor
//! needs by name, and the name-to-index lookup used by the expression evaluator.

/// Register x0 (zero register, always zero).
pub const REG_ZERO: usize = 0;
/// Register x1 (return address, ra).
pub const REG_RA: usize = 1;
/// Register x2 (stack pointer, sp).
pub const REG_SP: usize = 2;
/// Register x10 (first argument/return value, a0). Carries the exit code on `ebreak`.
pub const REG_A0: usize = 10;
/// Register x11 (second argument, a1).
pub const REG_A1: usize = 11;

/// ABI mnemonics for x0–x31, in index order.
pub const REG_NAMES: [&str; 32] = [
    "$0", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Resolves an ABI mnemonic to its register index.
///
/// Accepts every entry of [`REG_NAMES`], `zero` as an alias for `$0`, and the
/// `fp` alias for `s0`.
///
/// # Returns
///
/// The register index, or `None` for an unknown name.
pub fn name_to_index(name: &str) -> Option<usize> {
    match name {
        "zero" => Some(REG_ZERO),
        "fp" => Some(8),
        _ => REG_NAMES.iter().position(|n| *n == name),
    }
}

/// Returns the ABI mnemonic for a register index, or `"x??"` when out of range.
#[inline]
pub fn index_to_name(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("x??")
}
