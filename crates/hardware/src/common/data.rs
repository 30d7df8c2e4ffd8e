//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the simulator.
//! The access kind decides which fault a failed access is reported as.

/// Type of memory access operation.
///
/// Used to distinguish between instruction fetches, data loads, and data stores
/// so that an out-of-window access is reported with the correct trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch access.
    Fetch,

    /// Data read access (loads and debugger dereferences).
    Read,

    /// Data write access (stores).
    Write,
}

impl AccessType {
    /// Short lowercase name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}
