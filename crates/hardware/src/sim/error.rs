//! Run-level errors.
//!
//! `SimError` is what the simulator returns when a run cannot continue, and
//! `LoadError` covers reading and placing a program image.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::common::Trap;
use crate::monitor::{ExprError, WatchError};

/// Failure while reading or placing a program image.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("could not read '{}': {source}", .path.display())]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file looks like ELF but does not parse as a 32-bit little-endian ELF.
    #[error("invalid ELF image: {0}")]
    Elf(#[from] object::read::Error),

    /// A segment address does not fit the 32-bit address space.
    #[error("segment at {addr:#x} is outside the 32-bit address space")]
    AddressOverflow {
        /// Segment load address.
        addr: u64,
    },

    /// A segment does not fit in guest memory.
    #[error("image segment at {addr:#010x} ({len} bytes) does not fit in memory")]
    DoesNotFit {
        /// Segment load address.
        addr: u32,
        /// Segment length in bytes.
        len: usize,
    },
}

/// Fatal condition that ends a run.
#[derive(Debug, Error)]
pub enum SimError {
    /// The executor raised a fatal trap (invalid instruction, access fault).
    #[error("{0}")]
    Trap(Trap),

    /// An expression failed fatally.
    #[error("{0}")]
    Expr(ExprError),

    /// A watchpoint that evaluated when created failed on a later check.
    #[error("watchpoint {id} ('{expr}') failed to re-evaluate: {source}")]
    WatchpointCorrupted {
        /// Slot identifier.
        id: usize,
        /// Watched expression.
        expr: String,
        /// Underlying evaluation failure.
        source: ExprError,
    },

    /// The pool reported some other fatal failure.
    #[error(transparent)]
    Watch(WatchError),

    /// The program image could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl From<WatchError> for SimError {
    fn from(err: WatchError) -> Self {
        match err {
            WatchError::Reevaluation { id, expr, source } => {
                Self::WatchpointCorrupted { id, expr, source }
            }
            other => Self::Watch(other),
        }
    }
}

/// Failure of a memory examine request.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExamineError {
    /// The count or address expression did not evaluate.
    #[error(transparent)]
    Expr(#[from] ExprError),

    /// Part of the requested range lies outside the physical window.
    #[error("range {addr:#010x} + {len} leaves the physical window")]
    OutOfWindow {
        /// First address requested.
        addr: u32,
        /// Number of bytes requested.
        len: u32,
    },
}
