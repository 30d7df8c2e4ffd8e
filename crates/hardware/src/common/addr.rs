//! Physical address type.
//!
//! The simulator models a single flat physical window, so there is no virtual
//! address space. `PhysAddr` exists to keep guest addresses distinct from
//! host-side offsets into the backing buffer:
//! 1. **Type Safety:** Guest addresses and buffer offsets cannot be mixed up.
//! 2. **Window Checks:** Helpers for testing membership in the physical window.

use super::constants::{PMEM_BASE, PMEM_END};

/// A physical address in the guest address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u32);

impl PhysAddr {
    /// Creates a new physical address from a raw 32-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw 32-bit address value.
    ///
    /// # Returns
    ///
    /// A new `PhysAddr` instance wrapping the provided address.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the address lies in the inclusive physical window
    /// `[PMEM_BASE, PMEM_END]`.
    #[inline]
    pub const fn in_pmem(&self) -> bool {
        self.0 >= PMEM_BASE && self.0 <= PMEM_END
    }

    /// Returns `true` if every byte of `[self, self + len)` lies in the window.
    ///
    /// An empty range is accepted when the start address itself is valid.
    pub const fn range_in_pmem(&self, len: u32) -> bool {
        if !self.in_pmem() {
            return false;
        }
        if len == 0 {
            return true;
        }
        match self.0.checked_add(len - 1) {
            Some(last) => last <= PMEM_END,
            None => false,
        }
    }
}

impl std::fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
