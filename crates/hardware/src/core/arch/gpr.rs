//! RISC-V General-Purpose Register File.
//!
//! This module implements the General-Purpose Register (GPR) file for RV32.
//! It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`), 32 bits each.
//! 2. **Invariant Enforcement:** `x0` reads as zero once the step that wrote it completes.
//! 3. **Wrapping Indices:** Out-of-range indices wrap onto the five-bit field.

use crate::common::constants::NUM_GPRS;

/// General-Purpose Register file.
///
/// Writes are stored unconditionally; the CPU clears `x0` at the end of every
/// step, so a value written to `x0` is never observable between instructions.
#[derive(Clone, Debug, Default)]
pub struct Gpr {
    regs: [u32; NUM_GPRS],
}

impl Gpr {
    /// Creates a new general-purpose register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_GPRS],
        }
    }

    /// Reads a general-purpose register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Only the low five bits are used.
    ///
    /// # Returns
    ///
    /// The 32-bit value stored in the specified register.
    #[inline(always)]
    pub const fn read(&self, idx: usize) -> u32 {
        self.regs[idx % NUM_GPRS]
    }

    /// Writes a value to a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Only the low five bits are used.
    /// * `val` - The 32-bit value to write.
    #[inline(always)]
    pub const fn write(&mut self, idx: usize, val: u32) {
        self.regs[idx % NUM_GPRS] = val;
    }
}
