//! System-on-Chip (SoC) Components.
//!
//! The simulated system is a single flat physical memory window behind the
//! [`MemoryPort`] trait; there are no devices or bus routing.

/// Flat physical memory.
pub mod memory;

/// Memory access port trait.
pub mod traits;

pub use memory::Memory;
pub use traits::MemoryPort;
