//! High-level operations.
//!
//! This module contains the implementation of the chfl-bindgen commands.

pub mod generate;

pub use generate::{
    check, dump, format_check_report, generate, load_bindings, output_path, render, CheckReport,
    FileStatus, GenerateOptions, RenderedFile,
};
