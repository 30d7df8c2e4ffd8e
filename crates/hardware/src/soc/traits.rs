//! Memory access port trait.
//!
//! This module defines the `MemoryPort` trait through which the executor and the
//! expression evaluator touch guest memory. It provides:
//! 1. **Access:** Fetch, read and write of 1, 2 or 4 little-endian bytes.
//! 2. **Bounds:** Every access outside the port's window is reported as a [`Trap`].
//! 3. **Window:** The inclusive address range the port serves, used for range checks.

use crate::common::Trap;

/// Byte-addressable memory as seen by the core.
///
/// `len` is always one of 1, 2 or 4. Reads and fetches return the value
/// zero-extended to a word; writes store the low `len` bytes of `val`.
pub trait MemoryPort {
    /// Returns `(first, last)`, the inclusive address window this port serves.
    fn window(&self) -> (u32, u32);

    /// Fetches an instruction word.
    fn fetch(&self, addr: u32, len: usize) -> Result<u32, Trap>;

    /// Reads data for a load or a debugger dereference.
    fn read(&self, addr: u32, len: usize) -> Result<u32, Trap>;

    /// Writes data for a store.
    fn write(&mut self, addr: u32, len: usize, val: u32) -> Result<(), Trap>;

    /// Returns `true` if every byte of `[addr, addr + len)` lies in the window.
    fn contains(&self, addr: u32, len: usize) -> bool {
        let (first, last) = self.window();
        if len == 0 || addr < first {
            return false;
        }
        (addr - first) as u64 + len as u64 <= (last - first) as u64 + 1
    }
}
