//! DRAM Buffer Implementation.
//!
//! Backing storage for guest RAM: a zero-initialised, heap-allocated byte vector
//! with bounds-checked little-endian accessors. Out-of-range accesses return
//! `None` so the owning [`Memory`](super::Memory) can raise the matching trap.

/// Zero-initialised byte storage for guest RAM.
#[derive(Clone, Debug)]
pub struct DramBuffer {
    bytes: Vec<u8>,
}

impl DramBuffer {
    /// Creates a new DRAM buffer of the specified size, filled with zeros.
    ///
    /// # Arguments
    ///
    /// * `size` - Size of the buffer in bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Returns the size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer has zero capacity.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reads `len` (at most 4) bytes at `offset` as a little-endian word.
    ///
    /// # Returns
    ///
    /// The zero-extended value, or `None` if the range leaves the buffer.
    pub fn read_le(&self, offset: usize, len: usize) -> Option<u32> {
        let slice = self.bytes.get(offset..offset.checked_add(len)?)?;
        Some(
            slice
                .iter()
                .rev()
                .fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte)),
        )
    }

    /// Writes the low `len` bytes of `val` at `offset`, little-endian.
    ///
    /// # Returns
    ///
    /// `None` if the range leaves the buffer; nothing is written in that case.
    pub fn write_le(&mut self, offset: usize, len: usize, val: u32) -> Option<()> {
        let slice = self.bytes.get_mut(offset..offset.checked_add(len)?)?;
        slice.copy_from_slice(&val.to_le_bytes()[..len]);
        Some(())
    }

    /// Copies `data` into the buffer at `offset`.
    ///
    /// # Returns
    ///
    /// `None` if `data` does not fit; nothing is written in that case.
    pub fn write_slice(&mut self, offset: usize, data: &[u8]) -> Option<()> {
        let slice = self
            .bytes
            .get_mut(offset..offset.checked_add(data.len())?)?;
        slice.copy_from_slice(data);
        Some(())
    }

    /// Returns `len` bytes starting at `offset`, if in range.
    pub fn read_slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.bytes.get(offset..offset.checked_add(len)?)
    }
}
