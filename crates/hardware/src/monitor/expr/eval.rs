//! Recursive expression evaluator.
//!
//! Evaluates an inclusive token range `[p, q]` by the following rules, in order:
//! 1. **Trim:** A whitespace marker at either edge is dropped.
//! 2. **Empty:** `p > q` is a malformed range.
//! 3. **Operand:** A single token is a decimal or hex literal or a register reference.
//! 4. **Parentheses:** A range wrapped in exactly one matching pair is unwrapped.
//! 5. **Split:** Otherwise the master operator splits the range. Scanning left to right
//!    outside parentheses, a token replaces the current candidate only when its priority
//!    value is strictly greater, so the first of the weakest-binding operators wins.
//!
//! Arithmetic wraps modulo 2^32; comparisons and logical operators yield 0 or 1.

use tracing::trace;

use super::ExprError;
use super::token::{Token, TokenKind};
use crate::common::{PhysAddr, RegisterFile};
use crate::soc::MemoryPort;

/// Width in bytes of a dereference.
const DEREF_WIDTH: usize = 1;

/// Machine state an expression may read.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    /// Register file for `$name` operands.
    pub regs: &'a RegisterFile,
    /// Program counter for `$pc`.
    pub pc: u32,
    /// Memory for dereferences.
    pub mem: &'a dyn MemoryPort,
}

impl std::fmt::Debug for EvalContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalContext")
            .field("pc", &PhysAddr(self.pc))
            .finish_non_exhaustive()
    }
}

/// Binding priority used by the master-operator scan. Larger binds looser.
pub const fn priority(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Deref => 2,
        TokenKind::Mul | TokenKind::Div => 3,
        TokenKind::Add | TokenKind::Sub => 4,
        TokenKind::Eq | TokenKind::Neq => 7,
        TokenKind::And => 11,
        TokenKind::Or => 12,
        _ => 0,
    }
}

/// Evaluation context: one token buffer plus the machine state it reads.
#[derive(Debug)]
pub struct Evaluator<'a> {
    tokens: &'a [Token],
    ctx: &'a EvalContext<'a>,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over `tokens`.
    pub const fn new(tokens: &'a [Token], ctx: &'a EvalContext<'a>) -> Self {
        Self { tokens, ctx }
    }

    /// Evaluates the whole token buffer.
    pub fn run(&self) -> Result<u32, ExprError> {
        if self.tokens.iter().all(|t| t.kind == TokenKind::NoType) {
            return Err(ExprError::Empty);
        }
        self.eval(0, self.tokens.len() - 1)
    }

    /// Evaluates the inclusive token range `[p, q]`.
    ///
    /// # Returns
    ///
    /// The value, or the first failure met in any sub-range; no partial
    /// result escapes once a sub-range fails.
    pub fn eval(&self, p: usize, q: usize) -> Result<u32, ExprError> {
        if p > q {
            return Err(ExprError::MalformedRange { index: p });
        }
        if self.kind(p) == TokenKind::NoType {
            return self.eval(p + 1, q);
        }
        if self.kind(q) == TokenKind::NoType {
            return self.eval(p, q - 1);
        }
        if p == q {
            return self.operand(&self.tokens[p]);
        }
        if self.check_parentheses(p, q) {
            return self.eval(p + 1, q - 1);
        }

        let op = self.master_operator(p, q)?;
        let kind = self.kind(op);
        trace!(p, q, op, ?kind, "master operator");

        if kind == TokenKind::Deref {
            if op != p {
                return Err(ExprError::MisplacedUnary { index: op });
            }
            let addr = self.eval(p + 1, q)?;
            return self.deref(addr);
        }

        if op == p {
            return Err(ExprError::MalformedRange { index: p });
        }
        let lhs = self.eval(p, op - 1)?;
        let rhs = self.eval(op + 1, q)?;
        apply(kind, lhs, rhs)
    }

    fn kind(&self, idx: usize) -> TokenKind {
        self.tokens[idx].kind
    }

    /// Resolves a single-token operand.
    fn operand(&self, token: &Token) -> Result<u32, ExprError> {
        let text = token.text();
        let invalid = || ExprError::InvalidLiteral {
            text: text.to_string(),
        };
        match token.kind {
            TokenKind::Decimal => text.parse::<u32>().map_err(|_| invalid()),
            TokenKind::Hex => u32::from_str_radix(&text[2..], 16).map_err(|_| invalid()),
            TokenKind::Register => self.register(text),
            _ => Err(ExprError::BadOperand {
                text: text.to_string(),
            }),
        }
    }

    /// Resolves `$name`. `$0` is itself a mnemonic; `$pc` reads the program counter.
    fn register(&self, text: &str) -> Result<u32, ExprError> {
        let bare = text.strip_prefix('$').unwrap_or(text);
        if bare == "pc" {
            return Ok(self.ctx.pc);
        }
        self.ctx
            .regs
            .read_by_name(text)
            .or_else(|| self.ctx.regs.read_by_name(bare))
            .ok_or_else(|| ExprError::UnknownRegister {
                name: text.to_string(),
            })
    }

    /// Returns `true` if `[p, q]` is exactly one parenthesised group.
    ///
    /// The depth must return to zero exactly once, at `q`, and never go negative.
    fn check_parentheses(&self, p: usize, q: usize) -> bool {
        if self.kind(p) != TokenKind::LParen || self.kind(q) != TokenKind::RParen {
            return false;
        }
        let mut depth: i32 = 0;
        let mut closes_to_zero = 0;
        for token in &self.tokens[p..=q] {
            let before = depth;
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return false;
            }
            if before > 0 && depth == 0 {
                closes_to_zero += 1;
            }
        }
        closes_to_zero == 1 && depth == 0
    }

    /// Finds the operator that splits `[p, q]`.
    fn master_operator(&self, p: usize, q: usize) -> Result<usize, ExprError> {
        let mut depth: i32 = 0;
        let mut best: u8 = 0;
        let mut master = None;

        for idx in p..=q {
            match self.kind(idx) {
                TokenKind::NoType => continue,
                TokenKind::LParen => {
                    depth += 1;
                    continue;
                }
                TokenKind::RParen => {
                    depth -= 1;
                    if depth < 0 {
                        return Err(ExprError::ParenMismatch { index: idx });
                    }
                    continue;
                }
                _ if depth > 0 => continue,
                kind => {
                    let pri = priority(kind);
                    if best < pri {
                        best = pri;
                        master = Some(idx);
                    }
                }
            }
        }

        if depth != 0 {
            return Err(ExprError::ParenMismatch { index: q });
        }
        master.ok_or(ExprError::NoMasterOperator { start: p, end: q })
    }

    /// Reads one byte at `addr`, which must lie in the physical window.
    ///
    /// The window is the fixed `[PMEM_BASE, PMEM_END]` range, not the configured
    /// RAM: with a relocated `memory.ram_base` both checks apply, so only addresses
    /// inside both can be dereferenced.
    fn deref(&self, addr: u32) -> Result<u32, ExprError> {
        if !PhysAddr(addr).in_pmem() {
            return Err(ExprError::DerefOutOfWindow { addr });
        }
        self.ctx
            .mem
            .read(addr, DEREF_WIDTH)
            .map_err(|_| ExprError::DerefOutOfWindow { addr })
    }
}

/// Applies a binary operator.
fn apply(kind: TokenKind, lhs: u32, rhs: u32) -> Result<u32, ExprError> {
    Ok(match kind {
        TokenKind::Add => lhs.wrapping_add(rhs),
        TokenKind::Sub => lhs.wrapping_sub(rhs),
        TokenKind::Mul => lhs.wrapping_mul(rhs),
        TokenKind::Div => lhs.checked_div(rhs).ok_or(ExprError::DivisionByZero)?,
        TokenKind::And => (lhs != 0 && rhs != 0) as u32,
        TokenKind::Or => (lhs != 0 || rhs != 0) as u32,
        TokenKind::Eq => (lhs == rhs) as u32,
        TokenKind::Neq => (lhs != rhs) as u32,
        other => {
            return Err(ExprError::BadOperand {
                text: format!("{other:?}"),
            });
        }
    })
}
