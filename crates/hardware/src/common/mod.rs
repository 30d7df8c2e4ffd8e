//! Common utilities and types used throughout the simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Address Types:** A strong type for guest physical addresses.
//! 2. **Constants:** System-wide constants for memory, instructions, and the monitor.
//! 3. **Memory Access:** Definitions for categorizing memory operations (Fetch/Read/Write).
//! 4. **Error Handling:** Trap representations raised by the execution path.
//! 5. **Register Management:** A facade over the general-purpose register file.

/// Address type definitions.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Trap definitions.
pub mod error;

/// Register file facade.
pub mod reg;

pub use addr::PhysAddr;
pub use constants::{PMEM_BASE, PMEM_END, PMEM_SIZE};
pub use data::AccessType;
pub use error::Trap;
pub use reg::RegisterFile;
