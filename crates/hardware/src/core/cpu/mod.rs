//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which holds the architectural
//! state mutated by the executor:
//! 1. **State Management:** The register file and the program counter.
//! 2. **Execution:** One fetch/decode/execute step per call (see [`execution`]).
//! 3. **Observability:** Optional per-instruction tracing through `tracing`.

/// Data-driven decode table and the single-step executor.
pub mod execution;

use crate::common::RegisterFile;
use crate::config::Config;

pub use self::execution::Step;

/// Main CPU structure containing all architectural state.
#[derive(Clone, Debug)]
pub struct Cpu {
    /// General Purpose Registers.
    pub regs: RegisterFile,
    /// Program Counter.
    pub pc: u32,
    /// Enable instruction tracing.
    pub trace: bool,
}

impl Cpu {
    /// Creates a new CPU instance from the configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The simulator configuration parameters.
    ///
    /// # Returns
    ///
    /// A CPU with zeroed registers and `pc` at `general.start_pc`.
    pub fn new(config: &Config) -> Self {
        Self {
            regs: RegisterFile::new(),
            pc: config.general.start_pc,
            trace: config.general.trace_instructions,
        }
    }

    /// Creates a CPU that starts executing at `pc` with tracing disabled.
    pub fn with_pc(pc: u32) -> Self {
        Self {
            regs: RegisterFile::new(),
            pc,
            trace: false,
        }
    }
}
