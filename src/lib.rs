//! chfl-bindgen - generate foreign-language bindings for the chemfiles C API
//!
//! This crate reads the chemfiles C header and produces Python `ctypes`
//! declarations, Julia `ccall` wrappers and a Fortran `iso_c_binding`
//! module from a single language-neutral model of the API.

pub mod bindings;
pub mod core;
pub mod ops;
pub mod util;

/// Test fixtures for the unit tests.
///
/// This module is only available when compiling with `--cfg test`.
#[cfg(test)]
pub mod test_support;

pub use bindings::{BindgenError, Bindings};
pub use core::Language;
pub use util::config::Config;
