//! Tests for shared types.

/// Physical address window checks.
pub mod address;
