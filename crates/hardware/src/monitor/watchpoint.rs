//! Watchpoint pool.
//!
//! A fixed-capacity arena of watchpoint slots. It provides:
//! 1. **Allocation:** Round-robin search for a vacant slot starting at the last freed
//!    position, visiting at most `capacity + 1` slots.
//! 2. **Release:** Freeing marks the slot vacant and makes it the next candidate;
//!    freeing a vacant slot succeeds without effect.
//! 3. **Checking:** Re-evaluation of every watched expression after a step, reporting
//!    each changed value once.
//! 4. **Toggle:** A global switch that turns checking into a no-op.
//!
//! A slot's identifier is its index and stays stable for the watchpoint's lifetime.

use thiserror::Error;
use tracing::debug;

use crate::common::constants::{MAX_EXPR_LEN, NR_WP};
use crate::monitor::expr::ExprError;

/// Failure of a watchpoint pool operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WatchError {
    /// Every slot is in use.
    #[error("no free watchpoint slot ({capacity} in use)")]
    PoolExhausted {
        /// Pool capacity.
        capacity: usize,
    },

    /// The identifier does not name a slot.
    #[error("watchpoint {id} does not exist")]
    OutOfRange {
        /// Requested identifier.
        id: usize,
    },

    /// The expression is empty or only whitespace.
    #[error("empty watch expression")]
    EmptyExpression,

    /// The expression is longer than a slot stores.
    #[error("watch expression is {len} bytes, at most {max} allowed")]
    ExpressionTooLong {
        /// Expression length in bytes.
        len: usize,
        /// Slot bound in bytes.
        max: usize,
    },

    /// A watched expression that evaluated at creation failed on re-check.
    #[error("watchpoint {id} ('{expr}') can no longer be evaluated: {source}")]
    Reevaluation {
        /// Slot identifier.
        id: usize,
        /// Watched expression.
        expr: String,
        /// Underlying evaluation failure.
        source: ExprError,
    },
}

impl WatchError {
    /// Returns `true` for failures that abort the run.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Reevaluation { .. })
    }
}

/// Read-only view of an in-use slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Watchpoint {
    /// Slot identifier.
    pub id: usize,
    /// Watched expression.
    pub expr: String,
    /// Value observed by the most recent check (or at creation).
    pub last_value: u32,
}

/// Change notification produced by [`WatchpointPool::check`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchEvent {
    /// Slot identifier.
    pub id: usize,
    /// Watched expression.
    pub expr: String,
    /// Value before this check.
    pub old_value: u32,
    /// Value after this check.
    pub new_value: u32,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    expr: String,
    last_value: u32,
    vacant: bool,
}

/// Fixed-capacity watchpoint arena.
#[derive(Clone, Debug)]
pub struct WatchpointPool {
    slots: Vec<Slot>,
    /// Next allocation candidate.
    cursor: usize,
    enabled: bool,
}

impl Default for WatchpointPool {
    fn default() -> Self {
        Self::new(NR_WP)
    }
}

impl WatchpointPool {
    /// Creates a pool of `capacity` vacant slots with checking enabled.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                vacant: true,
                ..Slot::default()
            })
            .collect();
        Self {
            slots,
            cursor: 0,
            enabled: true,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots in use.
    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|s| !s.vacant).count()
    }

    /// Takes a vacant slot for `expr`.
    ///
    /// The search starts at the last freed slot and wraps around, visiting at
    /// most `capacity + 1` slots.
    ///
    /// # Arguments
    ///
    /// * `expr` - Expression text, at most [`MAX_EXPR_LEN`] bytes.
    /// * `initial` - Value the expression has now; the first check compares against it.
    ///
    /// # Returns
    ///
    /// The new watchpoint's identifier. On failure the pool is unchanged.
    pub fn allocate(&mut self, expr: &str, initial: u32) -> Result<usize, WatchError> {
        if expr.trim().is_empty() {
            return Err(WatchError::EmptyExpression);
        }
        if expr.len() > MAX_EXPR_LEN {
            return Err(WatchError::ExpressionTooLong {
                len: expr.len(),
                max: MAX_EXPR_LEN,
            });
        }
        let capacity = self.capacity();
        if capacity == 0 {
            return Err(WatchError::PoolExhausted { capacity });
        }

        let mut cursor = self.cursor;
        for _ in 0..=capacity {
            let slot = &mut self.slots[cursor];
            if slot.vacant {
                slot.vacant = false;
                slot.expr = expr.to_string();
                slot.last_value = initial;
                self.cursor = cursor;
                debug!(id = cursor, expr, initial, "watchpoint allocated");
                return Ok(cursor);
            }
            cursor = (cursor + 1) % capacity;
        }

        debug!(expr, "watchpoint pool exhausted");
        Err(WatchError::PoolExhausted { capacity })
    }

    /// Releases slot `id` and makes it the next allocation candidate.
    ///
    /// Freeing a vacant slot succeeds and changes nothing but the cursor.
    pub fn free(&mut self, id: usize) -> Result<(), WatchError> {
        let slot = self.slots.get_mut(id).ok_or(WatchError::OutOfRange { id })?;
        slot.vacant = true;
        slot.expr.clear();
        self.cursor = id;
        debug!(id, "watchpoint freed");
        Ok(())
    }

    /// Re-evaluates every watched expression.
    ///
    /// Does nothing while the pool is disabled. Each slot whose value differs from
    /// the stored one is updated and reported, in slot order.
    ///
    /// # Arguments
    ///
    /// * `eval` - Evaluates expression text against the current machine state.
    ///
    /// # Returns
    ///
    /// The change notifications, or [`WatchError::Reevaluation`] for the first slot
    /// whose expression fails.
    pub fn check<F>(&mut self, mut eval: F) -> Result<Vec<WatchEvent>, WatchError>
    where
        F: FnMut(&str) -> Result<u32, ExprError>,
    {
        if !self.enabled {
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if slot.vacant {
                continue;
            }
            let value = eval(&slot.expr).map_err(|source| WatchError::Reevaluation {
                id,
                expr: slot.expr.clone(),
                source,
            })?;
            if value == slot.last_value {
                continue;
            }
            events.push(WatchEvent {
                id,
                expr: slot.expr.clone(),
                old_value: slot.last_value,
                new_value: value,
            });
            slot.last_value = value;
        }
        Ok(events)
    }

    /// Lists the in-use slots in identifier order.
    pub fn list(&self) -> Vec<Watchpoint> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.vacant)
            .map(|(id, s)| Watchpoint {
                id,
                expr: s.expr.clone(),
                last_value: s.last_value,
            })
            .collect()
    }

    /// Enables or disables checking. Stored watchpoints are untouched.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        debug!(enabled, "watchpoints toggled");
    }

    /// Returns `true` if checking is enabled.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}
