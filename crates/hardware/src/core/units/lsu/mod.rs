//! Load/Store Unit (LSU).
//!
//! This module provides the Load/Store Unit, responsible for moving data between
//! the register file and the memory port. It handles access widths and the
//! signed or zero extension of loaded values.

use crate::common::Trap;
use crate::soc::MemoryPort;

/// Width of a memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemWidth {
    /// One byte.
    Byte,
    /// Two bytes.
    Half,
    /// Four bytes.
    Word,
}

impl MemWidth {
    /// Number of bytes moved by an access of this width.
    pub const fn bytes(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }

    /// Number of bits moved by an access of this width.
    const fn bits(self) -> u32 {
        (self.bytes() * 8) as u32
    }
}

/// Load/Store Unit (LSU) for memory operations.
#[derive(Debug)]
pub struct Lsu;

impl Lsu {
    /// Loads a value and extends it to a full word.
    ///
    /// # Arguments
    ///
    /// * `mem` - The memory port to read from.
    /// * `addr` - Effective address (`rs1 + imm`).
    /// * `width` - Access width.
    /// * `signed` - Sign-extend when `true`, zero-extend otherwise.
    ///
    /// # Returns
    ///
    /// The extended value, or the port's access fault.
    pub fn load(
        mem: &dyn MemoryPort,
        addr: u32,
        width: MemWidth,
        signed: bool,
    ) -> Result<u32, Trap> {
        let raw = mem.read(addr, width.bytes())?;
        Ok(if signed && width != MemWidth::Word {
            let shift = 32 - width.bits();
            (((raw << shift) as i32) >> shift) as u32
        } else {
            raw
        })
    }

    /// Stores the low `width` bytes of `val`.
    ///
    /// # Arguments
    ///
    /// * `mem` - The memory port to write to.
    /// * `addr` - Effective address (`rs1 + imm`).
    /// * `width` - Access width; `val` is truncated to it.
    /// * `val` - Value from `rs2`.
    pub fn store(
        mem: &mut dyn MemoryPort,
        addr: u32,
        width: MemWidth,
        val: u32,
    ) -> Result<(), Trap> {
        let truncated = match width {
            MemWidth::Byte => val & 0xFF,
            MemWidth::Half => val & 0xFFFF,
            MemWidth::Word => val,
        };
        mem.write(addr, width.bytes(), truncated)
    }
}
