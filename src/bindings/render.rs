//! Pieces shared by every target generator.

use super::errors::{BindResult, BindgenError};
use super::types::{Bindings, Enum, Function};
use crate::core::Language;
use crate::util::config::TargetConfig;

/// How a wrapper is shaped around the raw C call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    /// Returns a string copied out of library-owned memory
    StringReturn,

    /// Fills the receiver with a fresh handle
    Constructor,

    /// Returns a status code, reported through an optional argument
    Ordinary,
}

impl RenderPath {
    /// Pick the wrapper shape for a normalized function.
    ///
    /// A function listed in `string_functions` must actually return a string.
    pub fn classify(function: &Function, string_functions: &[String]) -> BindResult<RenderPath> {
        let listed = string_functions.iter().any(|name| *name == function.name);

        if function.is_constructor {
            if listed {
                return Err(BindgenError::malformed(
                    &function.name,
                    &function.coord,
                    "constructor listed as a string function",
                ));
            }
            return Ok(RenderPath::Constructor);
        }

        if function.rettype.is_string() {
            return Ok(RenderPath::StringReturn);
        }

        if listed {
            return Err(BindgenError::malformed(
                &function.name,
                &function.coord,
                format!(
                    "listed as a string function but returns `{}`",
                    function.rettype
                ),
            ));
        }

        Ok(RenderPath::Ordinary)
    }
}

/// A function as it will appear in one target's output.
#[derive(Debug, Clone, Copy)]
pub enum Emitted<'a> {
    Generated(&'a Function),
    Override(&'a Function, &'a str),
}

/// Functions of `bindings` for one target, minus its skip list and with its
/// overrides substituted in place.
pub fn selected<'a>(
    functions: &'a [Function],
    target: &'a TargetConfig,
) -> impl Iterator<Item = Emitted<'a>> + 'a {
    functions.iter().filter_map(move |function| {
        if target.skips(&function.name) {
            tracing::debug!("skipping {}", function.name);
            return None;
        }
        Some(match target.override_for(&function.name) {
            Some(text) => {
                tracing::debug!("using manual translation for {}", function.name);
                Emitted::Override(function, text)
            }
            None => Emitted::Generated(function),
        })
    })
}

/// Renders a whole binding file for one target language.
pub trait Generator {
    /// Target language.
    fn language(&self) -> Language;

    /// Translate one enum.
    fn render_enum(&self, enumeration: &Enum) -> BindResult<String>;

    /// Translate one function.
    fn render_function(&self, function: &Function) -> BindResult<String>;

    /// Produce the complete file text.
    ///
    /// Output depends only on `bindings` and the configuration the
    /// generator was built with.
    fn generate(&self, bindings: &Bindings) -> BindResult<String>;
}

/// Auto-generation notice placed at the top of every output file.
pub fn banner(comment: &str, interface: &str) -> String {
    let rule = format!("{} {} {}", comment, "=".repeat(75), comment);
    let lines = [
        format!("{} Chemfiles, a modern library for chemistry file reading and writing", comment),
        format!("{} Copyright (C) Guillaume Fraux and contributors -- BSD license", comment),
        comment.to_string(),
        rule.clone(),
        format!(
            "{} !!!! AUTO-GENERATED FILE !!!! Do not edit. See the bindgen repository for",
            comment
        ),
        format!("{} the generation code (https://github.com/chemfiles/bindgen).", comment),
        format!("{} This file contains {} interface to the C API", comment, interface),
        rule,
    ];
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Join argument names or tokens with `, `.
pub fn comma_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
