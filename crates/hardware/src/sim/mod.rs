//! Simulation driver and program loading.
//!
//! Provides the loader that turns image files into memory contents and the
//! [`Simulator`] that runs them under the debugger.

/// Run-level error types.
pub mod error;

/// ELF32 and raw binary image loading.
pub mod loader;

/// The simulator and its run state.
pub mod simulator;

pub use self::error::{ExamineError, LoadError, SimError};
pub use self::loader::{Image, Segment};
pub use self::simulator::{RunState, Simulator, StepReport};
