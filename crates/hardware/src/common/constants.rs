//! Global System Constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Memory Constants:** The flat physical window guest code and debugger expressions may touch.
//! 2. **Instruction Constants:** Fetch width and field masks for instruction decoding.
//! 3. **Monitor Constants:** Capacities of the token buffer and the watchpoint pool.

/// Base physical address of guest memory (also the reset vector).
pub const PMEM_BASE: u32 = 0x8000_0000;

/// Size of guest physical memory in bytes (128 MiB).
pub const PMEM_SIZE: usize = 128 * 1024 * 1024;

/// Last valid physical address (inclusive).
pub const PMEM_END: u32 = PMEM_BASE + (PMEM_SIZE as u32 - 1);

/// Size of a standard (32-bit) RISC-V instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Bit mask for extracting the opcode field from a RISC-V instruction.
pub const OPCODE_MASK: u32 = 0x7F;

/// Bit mask for extracting the destination register (rd) field.
pub const RD_MASK: u32 = 0x1F;

/// Bit position shift for the destination register (rd) field.
pub const RD_SHIFT: u32 = 7;

/// Bit mask for extracting the first source register (rs1) field.
pub const RS1_MASK: u32 = 0x1F;

/// Bit position shift for the first source register (rs1) field.
pub const RS1_SHIFT: u32 = 15;

/// Bit mask for extracting the second source register (rs2) field.
pub const RS2_MASK: u32 = 0x1F;

/// Bit position shift for the second source register (rs2) field.
pub const RS2_SHIFT: u32 = 20;

/// Number of general-purpose registers.
pub const NUM_GPRS: usize = 32;

/// Maximum number of tokens an expression may produce.
pub const MAX_TOKENS: usize = 32;

/// Maximum length in bytes of the text captured by a single token.
pub const TOKEN_TEXT_LEN: usize = 32;

/// Maximum length in bytes of a watched expression.
pub const MAX_EXPR_LEN: usize = 64;

/// Number of watchpoint slots in the pool.
pub const NR_WP: usize = 32;

/// Step count meaning "run until the program stops by itself".
pub const RUN_FOREVER: u64 = u64::MAX;

/// Number of retired instructions below which each one is echoed in trace mode.
pub const MAX_INST_TO_PRINT: u64 = 10;
