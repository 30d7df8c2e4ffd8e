//! Physical System Memory (DRAM).
//!
//! This module implements the guest's only memory device. It provides:
//! 1. **Buffer:** Backing storage (`DramBuffer`) for RAM contents.
//! 2. **Memory:** The [`MemoryPort`] implementation that maps the buffer at a physical base
//!    address and turns out-of-window accesses into traps.

/// DRAM buffer implementation for raw byte storage.
pub mod buffer;

use tracing::trace;

use self::buffer::DramBuffer;
use crate::common::{AccessType, PMEM_BASE, PMEM_SIZE, PhysAddr, Trap};
use crate::soc::traits::MemoryPort;

/// System Memory structure.
#[derive(Clone, Debug)]
pub struct Memory {
    /// Underlying byte storage.
    buffer: DramBuffer,
    /// The base physical address where this memory is mapped.
    base_addr: u32,
}

impl Default for Memory {
    /// Returns the standard window `[0x8000_0000, 0x87ff_ffff]`.
    fn default() -> Self {
        Self::new(PMEM_BASE, PMEM_SIZE)
    }
}

impl Memory {
    /// Creates a zero-filled memory of `size` bytes mapped at `base_addr`.
    ///
    /// # Arguments
    ///
    /// * `base_addr` - Starting physical address.
    /// * `size` - Size in bytes; the window must not extend past `u32::MAX`.
    pub fn new(base_addr: u32, size: usize) -> Self {
        let max = (u64::from(u32::MAX) - u64::from(base_addr) + 1) as usize;
        Self {
            buffer: DramBuffer::new(size.min(max)),
            base_addr,
        }
    }

    /// Returns the base physical address.
    pub const fn base(&self) -> u32 {
        self.base_addr
    }

    /// Returns the size of the mapped window in bytes.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Loads a byte slice into memory at a physical address.
    ///
    /// Used for placing program images during system setup.
    ///
    /// # Returns
    ///
    /// A store access fault naming `addr` if the slice does not fit in the window.
    pub fn load(&mut self, addr: u32, data: &[u8]) -> Result<(), Trap> {
        self.offset(addr)
            .and_then(|offset| self.buffer.write_slice(offset, data))
            .ok_or_else(|| fault(AccessType::Write, addr, data.len()))
    }

    /// Returns `len` bytes starting at `addr` for display.
    pub fn bytes(&self, addr: u32, len: usize) -> Result<&[u8], Trap> {
        self.offset(addr)
            .and_then(|offset| self.buffer.read_slice(offset, len))
            .ok_or_else(|| fault(AccessType::Read, addr, len))
    }

    fn offset(&self, addr: u32) -> Option<usize> {
        addr.checked_sub(self.base_addr).map(|off| off as usize)
    }

    /// Reads `len` bytes, reporting a miss as the fault matching `kind`.
    fn read_as(&self, kind: AccessType, addr: u32, len: usize) -> Result<u32, Trap> {
        self.offset(addr)
            .and_then(|offset| self.buffer.read_le(offset, len))
            .ok_or_else(|| fault(kind, addr, len))
    }
}

/// Builds the trap raised by an out-of-window access of the given kind.
const fn fault(kind: AccessType, addr: u32, len: usize) -> Trap {
    match kind {
        AccessType::Fetch => Trap::InstructionAccessFault { addr },
        AccessType::Read => Trap::LoadAccessFault { addr, len },
        AccessType::Write => Trap::StoreAccessFault { addr, len },
    }
}

impl MemoryPort for Memory {
    fn window(&self) -> (u32, u32) {
        let last = u64::from(self.base_addr) + self.buffer.len().max(1) as u64 - 1;
        (self.base_addr, last as u32)
    }

    fn fetch(&self, addr: u32, len: usize) -> Result<u32, Trap> {
        self.read_as(AccessType::Fetch, addr, len)
    }

    fn read(&self, addr: u32, len: usize) -> Result<u32, Trap> {
        let val = self.read_as(AccessType::Read, addr, len)?;
        trace!(addr = %PhysAddr(addr), len, val, "mem read");
        Ok(val)
    }

    fn write(&mut self, addr: u32, len: usize, val: u32) -> Result<(), Trap> {
        self.offset(addr)
            .and_then(|offset| self.buffer.write_le(offset, len, val))
            .ok_or_else(|| fault(AccessType::Write, addr, len))?;
        trace!(addr = %PhysAddr(addr), len, val, "mem write");
        Ok(())
    }
}
