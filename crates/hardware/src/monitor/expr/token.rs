//! Expression tokenizer.
//!
//! Splits debugger expression text into a bounded sequence of typed tokens. At
//! every input position the rules of [`RULES`] are tried in order and the first
//! one that matches a non-empty prefix wins. Whitespace runs are kept as
//! [`TokenKind::NoType`] markers; the evaluator skips them at range edges.
//!
//! `*` is context sensitive: it is a multiplication when the previous
//! non-whitespace token ends an operand (a literal, a register or `)`), and a
//! dereference otherwise.

use tracing::trace;

use super::ExprError;
use crate::common::constants::{MAX_TOKENS, TOKEN_TEXT_LEN};

/// Token classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of whitespace.
    NoType,
    /// Decimal literal (`42`).
    Decimal,
    /// Hexadecimal literal (`0x2a`).
    Hex,
    /// Register reference (`$a0`, `$pc`).
    Register,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// Binary `*`
    Mul,
    /// `/`
    Div,
    /// Unary `*`
    Deref,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!` (recognised, never produced: the tokenizer rejects it)
    Not,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `(`
    LParen,
    /// `)`
    RParen,
}

impl TokenKind {
    /// Returns `true` for kinds after which a `*` multiplies.
    pub const fn ends_operand(self) -> bool {
        matches!(
            self,
            Self::Decimal | Self::Hex | Self::Register | Self::RParen
        )
    }
}

/// One lexical token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Classification.
    pub kind: TokenKind,
    text: String,
}

impl Token {
    /// Creates a token, rejecting text longer than [`TOKEN_TEXT_LEN`] bytes.
    ///
    /// # Arguments
    ///
    /// * `kind` - Token classification.
    /// * `text` - Matched source text (empty for whitespace).
    /// * `position` - Byte offset in the expression, for diagnostics.
    pub fn new(kind: TokenKind, text: &str, position: usize) -> Result<Self, ExprError> {
        if text.len() > TOKEN_TEXT_LEN {
            return Err(ExprError::TokenTooLong {
                position,
                len: text.len(),
            });
        }
        Ok(Self {
            kind,
            text: text.to_string(),
        })
    }

    /// Matched source text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A tokenizer rule: `matcher` returns the length of the matched prefix, or 0.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    /// Human-readable pattern, for tracing.
    pub pattern: &'static str,
    /// Kind produced on a match.
    pub kind: TokenKind,
    matcher: fn(&[u8]) -> usize,
}

/// Tokenizer rules in priority order.
pub static RULES: &[Rule] = &[
    Rule { pattern: "[ \\t]+", kind: TokenKind::NoType, matcher: match_space },
    Rule { pattern: "0x[0-9a-fA-F]+", kind: TokenKind::Hex, matcher: match_hex },
    Rule { pattern: "[0-9]+", kind: TokenKind::Decimal, matcher: match_decimal },
    Rule { pattern: "\\$[0-9a-zA-Z]+", kind: TokenKind::Register, matcher: match_register },
    Rule { pattern: "==", kind: TokenKind::Eq, matcher: |s| literal(s, b"==") },
    Rule { pattern: "!=", kind: TokenKind::Neq, matcher: |s| literal(s, b"!=") },
    Rule { pattern: "!", kind: TokenKind::Not, matcher: |s| literal(s, b"!") },
    Rule { pattern: "&&", kind: TokenKind::And, matcher: |s| literal(s, b"&&") },
    Rule { pattern: "||", kind: TokenKind::Or, matcher: |s| literal(s, b"||") },
    Rule { pattern: "+", kind: TokenKind::Add, matcher: |s| literal(s, b"+") },
    Rule { pattern: "-", kind: TokenKind::Sub, matcher: |s| literal(s, b"-") },
    Rule { pattern: "/", kind: TokenKind::Div, matcher: |s| literal(s, b"/") },
    Rule { pattern: "*", kind: TokenKind::Mul, matcher: |s| literal(s, b"*") },
    Rule { pattern: "(", kind: TokenKind::LParen, matcher: |s| literal(s, b"(") },
    Rule { pattern: ")", kind: TokenKind::RParen, matcher: |s| literal(s, b")") },
];

fn literal(s: &[u8], lit: &[u8]) -> usize {
    if s.starts_with(lit) { lit.len() } else { 0 }
}

fn span(s: &[u8], pred: fn(&u8) -> bool) -> usize {
    s.iter().take_while(|c| pred(c)).count()
}

fn match_space(s: &[u8]) -> usize {
    span(s, |c| *c == b' ' || *c == b'\t')
}

fn match_hex(s: &[u8]) -> usize {
    if !s.starts_with(b"0x") {
        return 0;
    }
    match span(&s[2..], u8::is_ascii_hexdigit) {
        0 => 0,
        n => n + 2,
    }
}

fn match_decimal(s: &[u8]) -> usize {
    span(s, u8::is_ascii_digit)
}

fn match_register(s: &[u8]) -> usize {
    if s.first() != Some(&b'$') {
        return 0;
    }
    match span(&s[1..], u8::is_ascii_alphanumeric) {
        0 => 0,
        n => n + 1,
    }
}

/// Converts expression text into tokens.
///
/// # Arguments
///
/// * `expr` - Expression source text.
///
/// # Returns
///
/// The token sequence, at most [`MAX_TOKENS`] long. Fails with
/// [`ExprError::NoMatch`] when no rule matches, [`ExprError::Unsupported`] on `!`,
/// and the fatal [`ExprError::TokenOverflow`] when the buffer would overflow.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = expr.as_bytes();
    let mut tokens: Vec<Token> = Vec::with_capacity(MAX_TOKENS);
    let mut prev: Option<TokenKind> = None;
    let mut position = 0;

    while position < bytes.len() {
        let rest = &bytes[position..];
        let Some((rule, len)) = RULES
            .iter()
            .map(|rule| (rule, (rule.matcher)(rest)))
            .find(|(_, len)| *len > 0)
        else {
            return Err(ExprError::NoMatch {
                expr: expr.to_string(),
                position,
            });
        };

        let text = &expr[position..position + len];
        trace!(rule = rule.pattern, position, len, text, "token match");

        let kind = match rule.kind {
            TokenKind::Not => {
                return Err(ExprError::Unsupported {
                    op: "!",
                    position,
                });
            }
            TokenKind::Mul if !prev.is_some_and(TokenKind::ends_operand) => TokenKind::Deref,
            kind => kind,
        };

        if tokens.len() >= MAX_TOKENS {
            return Err(ExprError::TokenOverflow { max: MAX_TOKENS });
        }
        let stored = if kind == TokenKind::NoType { "" } else { text };
        tokens.push(Token::new(kind, stored, position)?);

        if kind != TokenKind::NoType {
            prev = Some(kind);
        }
        position += len;
    }

    Ok(tokens)
}
