//! Debugger expressions.
//!
//! This module turns expression text into a value. It provides:
//! 1. **Tokenizer:** Rule-table lexing with context-sensitive `*` (see [`token`]).
//! 2. **Evaluator:** Recursive range evaluation with master-operator selection (see [`eval`]).
//! 3. **Errors:** A single [`ExprError`] type; [`ExprError::is_fatal`] separates the two
//!    conditions that abort a run from the recoverable ones.

/// Recursive evaluator over token ranges.
pub mod eval;

/// Rule-table tokenizer.
pub mod token;

use thiserror::Error;

pub use eval::{EvalContext, Evaluator};
pub use token::{Token, TokenKind, tokenize};

/// Failure while tokenizing or evaluating an expression.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExprError {
    /// No tokenizer rule matched at `position`.
    #[error("no match at position {position} in '{expr}'")]
    NoMatch {
        /// Full expression text.
        expr: String,
        /// Byte offset of the first unmatched character.
        position: usize,
    },

    /// An operator that is recognised but not implemented.
    #[error("operator '{op}' at position {position} is not supported")]
    Unsupported {
        /// Operator text.
        op: &'static str,
        /// Byte offset of the operator.
        position: usize,
    },

    /// A single token's text exceeds the per-token bound.
    #[error("token at position {position} is {len} bytes long")]
    TokenTooLong {
        /// Byte offset of the token.
        position: usize,
        /// Length of the matched text.
        len: usize,
    },

    /// The expression produced more tokens than the buffer holds.
    #[error("expression has more than {max} tokens")]
    TokenOverflow {
        /// Token buffer capacity.
        max: usize,
    },

    /// The expression contains no tokens besides whitespace.
    #[error("empty expression")]
    Empty,

    /// A sub-range is empty, e.g. an operator with a missing operand.
    #[error("missing operand near token {index}")]
    MalformedRange {
        /// Token index where the operand was expected.
        index: usize,
    },

    /// A single token that is not a literal or a register.
    #[error("'{text}' is not an operand")]
    BadOperand {
        /// Token text.
        text: String,
    },

    /// A literal that does not fit in a machine word.
    #[error("literal '{text}' does not fit in 32 bits")]
    InvalidLiteral {
        /// Literal text.
        text: String,
    },

    /// A register name that is not a known mnemonic.
    #[error("unknown register '{name}'")]
    UnknownRegister {
        /// Register reference text, including the `$`.
        name: String,
    },

    /// Parentheses do not balance.
    #[error("unbalanced parentheses near token {index}")]
    ParenMismatch {
        /// Token index where the imbalance was found.
        index: usize,
    },

    /// No operator was found to split a multi-token range.
    #[error("no operator between tokens {start} and {end}")]
    NoMasterOperator {
        /// First token index of the range.
        start: usize,
        /// Last token index of the range.
        end: usize,
    },

    /// A unary operator was selected but has a left operand.
    #[error("unary operator at token {index} has a left operand")]
    MisplacedUnary {
        /// Token index of the operator.
        index: usize,
    },

    /// A dereference outside the physical window.
    #[error("cannot dereference {addr:#010x}: outside [0x80000000, 0x87ffffff]")]
    DerefOutOfWindow {
        /// Evaluated address.
        addr: u32,
    },

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

impl ExprError {
    /// Returns `true` for errors that abort the run instead of failing one request.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::TokenOverflow { .. } | Self::DivisionByZero)
    }
}

/// Tokenizes and evaluates `text` against the given machine state.
///
/// # Arguments
///
/// * `text` - Expression source text.
/// * `ctx` - Registers, program counter and memory used for operands.
///
/// # Returns
///
/// The 32-bit value, or the first error encountered.
///
/// # Examples
///
/// ```
/// use rvsdb_core::common::RegisterFile;
/// use rvsdb_core::monitor::expr::{self, EvalContext};
/// use rvsdb_core::soc::Memory;
///
/// let regs = RegisterFile::new();
/// let mem = Memory::default();
/// let ctx = EvalContext { regs: &regs, pc: 0x8000_0000, mem: &mem };
/// assert_eq!(expr::evaluate("(1 + 2) * 3", &ctx), Ok(9));
/// assert_eq!(expr::evaluate("$pc == 0x80000000", &ctx), Ok(1));
/// ```
pub fn evaluate(text: &str, ctx: &EvalContext<'_>) -> Result<u32, ExprError> {
    let tokens = tokenize(text)?;
    Evaluator::new(&tokens, ctx).run()
}
