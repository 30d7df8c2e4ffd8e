//! Debugger monitor.
//!
//! This module contains the debugger core that sits beside the CPU. It provides:
//! 1. **Expressions:** Tokenizing and evaluating debugger expressions (see [`expr`]).
//! 2. **Watchpoints:** A bounded pool of watched expressions (see [`watchpoint`]).
//! 3. **Facade:** [`Debugger`], which validates expressions before they are watched and
//!    runs the per-step check against live machine state.

/// Expression tokenizer and evaluator.
pub mod expr;

/// Watchpoint pool.
pub mod watchpoint;

use tracing::info;

pub use self::expr::{EvalContext, ExprError};
pub use self::watchpoint::{WatchError, WatchEvent, Watchpoint, WatchpointPool};

/// Expression evaluation plus watchpoint bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct Debugger {
    pool: WatchpointPool,
}

impl Debugger {
    /// Creates a debugger whose watchpoint toggle starts at `watchpoints_enabled`.
    pub fn new(watchpoints_enabled: bool) -> Self {
        let mut pool = WatchpointPool::default();
        pool.set_enabled(watchpoints_enabled);
        Self { pool }
    }

    /// Creates a debugger around an existing pool.
    pub const fn with_pool(pool: WatchpointPool) -> Self {
        Self { pool }
    }

    /// Validates `text` and starts watching it.
    ///
    /// The expression is evaluated once first; only an expression that evaluates
    /// is stored, and that value becomes the baseline for the next check.
    ///
    /// # Returns
    ///
    /// The new watchpoint's identifier.
    pub fn watch(&mut self, text: &str, ctx: &EvalContext<'_>) -> Result<usize, DebugError> {
        let value = expr::evaluate(text, ctx)?;
        let id = self.pool.allocate(text, value)?;
        info!(id, expr = text, value, "watchpoint created");
        Ok(id)
    }

    /// Stops watching slot `id`.
    pub fn unwatch(&mut self, id: usize) -> Result<(), WatchError> {
        self.pool.free(id)
    }

    /// Lists active watchpoints in identifier order.
    pub fn watchpoints(&self) -> Vec<Watchpoint> {
        self.pool.list()
    }

    /// Enables or disables watchpoint checking.
    pub fn toggle(&mut self, enabled: bool) {
        self.pool.set_enabled(enabled);
    }

    /// Returns `true` if watchpoint checking is enabled.
    pub const fn watchpoints_enabled(&self) -> bool {
        self.pool.is_enabled()
    }

    /// Re-evaluates every watchpoint against `ctx`.
    pub fn check(&mut self, ctx: &EvalContext<'_>) -> Result<Vec<WatchEvent>, WatchError> {
        self.pool.check(|text| expr::evaluate(text, ctx))
    }
}

/// Failure of a debugger request that touches both expressions and the pool.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DebugError {
    /// The expression did not evaluate.
    #[error(transparent)]
    Expr(#[from] ExprError),

    /// The pool rejected the request.
    #[error(transparent)]
    Watch(#[from] WatchError),
}

impl DebugError {
    /// Returns `true` if the underlying failure aborts the run.
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Expr(e) => e.is_fatal(),
            Self::Watch(e) => e.is_fatal(),
        }
    }
}
