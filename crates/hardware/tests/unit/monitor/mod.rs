//! Debugger monitor tests.

/// Expression evaluation against live machine state.
pub mod evaluator;


/// Watchpoint pool and the debugger facade.
pub mod watchpoints;
