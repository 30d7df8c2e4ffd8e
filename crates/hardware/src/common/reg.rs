//! Register File facade.
//!
//! This module provides the `RegisterFile` struct, the only path through which the rest of
//! the simulator touches general-purpose registers. It provides:
//! 1. **Storage:** Wraps the 32-entry GPR array.
//! 2. **Name Resolution:** Reads registers by ABI mnemonic for the expression evaluator.
//! 3. **Observability:** A read-only `(name, value)` snapshot for register dumps.

use crate::core::arch::gpr::Gpr;
use crate::isa::abi;

/// Architectural register file: 32 machine words, index 0 hard-wired to zero.
#[derive(Clone, Debug, Default)]
pub struct RegisterFile {
    gpr: Gpr,
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self { gpr: Gpr::new() }
    }

    /// Reads a value from a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    ///
    /// # Returns
    ///
    /// The 32-bit value stored in the specified register.
    #[inline]
    pub const fn read(&self, idx: usize) -> u32 {
        self.gpr.read(idx)
    }

    /// Writes a value to a general-purpose register.
    ///
    /// A write to `x0` is stored until [`RegisterFile::clear_zero`] runs at the end
    /// of the step.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    /// * `val` - The 32-bit value to write.
    #[inline]
    pub const fn write(&mut self, idx: usize, val: u32) {
        self.gpr.write(idx, val);
    }

    /// Forces `x0` back to zero.
    #[inline]
    pub const fn clear_zero(&mut self) {
        self.gpr.write(abi::REG_ZERO, 0);
    }

    /// Looks a register up by ABI mnemonic (`"a0"`, `"sp"`, `"$0"`, `"zero"`).
    ///
    /// # Returns
    ///
    /// The register value, or `None` if the name is not a known mnemonic.
    pub fn read_by_name(&self, name: &str) -> Option<u32> {
        abi::name_to_index(name).map(|idx| self.read(idx))
    }

    /// Returns every register as a `(name, value)` pair in index order.
    pub fn snapshot(&self) -> Vec<(&'static str, u32)> {
        abi::REG_NAMES
            .iter()
            .enumerate()
            .map(|(idx, name)| (*name, self.read(idx)))
            .collect()
    }
}
