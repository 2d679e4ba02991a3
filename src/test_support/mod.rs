//! Test utilities for the binding generator unit tests.
//!
//! Only compiled for `cargo test`.

pub mod fixtures;

pub use fixtures::*;
