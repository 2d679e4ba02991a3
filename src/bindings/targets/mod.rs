//! Target language generators.

use super::render::Generator;
use super::types::Enum;
use crate::core::Language;
use crate::util::config::{Config, TargetConfig};

mod fortran;
mod julia;
mod python;

pub use fortran::{FortranGenerator, FortranMapper};
pub use julia::{JuliaGenerator, JuliaMapper};
pub use python::{PythonGenerator, PythonMapper};

/// Generator for `language`, knowing the enums extracted from the header.
pub fn generator_for<'a>(
    language: Language,
    config: &'a Config,
    enums: &[Enum],
) -> Box<dyn Generator + 'a> {
    match language {
        Language::Python => Box::new(PythonGenerator::new(config, enums)),
        Language::Julia => Box::new(JuliaGenerator::new(config, enums)),
        Language::Fortran => Box::new(FortranGenerator::new(config, enums)),
    }
}

/// Shared settings for `language`.
pub fn target_config(config: &Config, language: Language) -> &TargetConfig {
    match language {
        Language::Python => &config.python,
        Language::Julia => &config.julia,
        Language::Fortran => &config.fortran.target,
    }
}

/// Indent every non-blank line by `width` spaces.
pub(crate) fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::with_capacity(text.len() + width * 16);
    for line in text.lines() {
        if !line.trim().is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Manual text as a block ending with a newline.
pub(crate) fn block(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{}\n", text)
    }
}
