//! Core types shared by the library and the CLI.

pub mod language;

pub use language::{Language, LanguageParseError};
