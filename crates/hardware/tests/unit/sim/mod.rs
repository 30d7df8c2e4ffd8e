//! Simulator driver and image loader tests.
