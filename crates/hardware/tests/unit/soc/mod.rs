//! Guest memory tests.
