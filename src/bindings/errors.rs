//! Binding generation errors.
//!
//! Every error aborts the run: a build-time generator must not emit
//! bindings that are silently wrong.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use super::ast::Coord;
use crate::core::Language;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Result alias for the binding core.
pub type BindResult<T> = std::result::Result<T, BindgenError>;

/// Error during extraction, normalization, mapping or rendering.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BindgenError {
    #[error("no {target} mapping for C type `{ctype}` in {argument} of `{function}` at {coord}")]
    #[diagnostic(code(chfl_bindgen::map::unmapped_type))]
    TypeMapping {
        ctype: String,
        target: Language,
        function: String,
        argument: String,
        coord: Coord,
    },

    #[error("unknown C type `{ctype}` in `{declaration}` at {coord}")]
    #[diagnostic(code(chfl_bindgen::model::unknown_type))]
    UnknownType {
        ctype: String,
        declaration: String,
        coord: Coord,
    },

    #[error("no enum name registered for first enumerator `{identifier}` at {coord}")]
    #[diagnostic(code(chfl_bindgen::extract::unknown_enum))]
    UnknownEnum { identifier: String, coord: Coord },

    #[error("malformed declaration `{name}` at {coord}: {reason}")]
    #[diagnostic(code(chfl_bindgen::extract::malformed))]
    MalformedDeclaration {
        name: String,
        coord: Coord,
        reason: String,
    },

    #[error("function `{name}` was already normalized")]
    #[diagnostic(code(chfl_bindgen::extract::already_normalized))]
    AlreadyNormalized { name: String },

    #[error("invalid configuration: {reason}")]
    #[diagnostic(code(chfl_bindgen::config::invalid))]
    InvalidConfig { reason: String },
}

impl BindgenError {
    pub(crate) fn malformed(
        name: impl Into<String>,
        coord: &Coord,
        reason: impl Into<String>,
    ) -> Self {
        BindgenError::MalformedDeclaration {
            name: name.into(),
            coord: coord.clone(),
            reason: reason.into(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BindgenError::TypeMapping {
                ctype,
                target,
                function,
                argument,
                coord,
            } => Diagnostic::error(format!(
                "cannot express C type `{}` in {} bindings",
                ctype, target
            ))
            .with_location(&coord.file)
            .with_context(format!("{} of `{}` (line {})", argument, function, coord.line))
            .with_suggestion(format!(
                "Add `{}` to the `overrides` table of the [{}] section",
                function, target
            ))
            .with_suggestion(format!("Add `{}` to the `skip` list of the [{}] section", function, target)),

            BindgenError::UnknownType {
                ctype,
                declaration,
                coord,
            } => Diagnostic::error(format!("unknown C type `{}`", ctype))
                .with_location(&coord.file)
                .with_context(format!("used by `{}` (line {})", declaration, coord.line))
                .with_suggestion(suggestions::UNKNOWN_TYPE),

            BindgenError::UnknownEnum { identifier, coord } => Diagnostic::error(format!(
                "cannot name the enum starting with `{}`",
                identifier
            ))
            .with_location(&coord.file)
            .with_context(format!("enum declared at line {}", coord.line))
            .with_suggestion(format!(
                "Add `{} = \"<enum name>\"` to the [enum_names] table",
                identifier
            )),

            BindgenError::MalformedDeclaration {
                name,
                coord,
                reason,
            } => Diagnostic::error(format!("malformed declaration `{}`", name))
                .with_location(&coord.file)
                .with_context(format!("{} (line {})", reason, coord.line)),

            BindgenError::AlreadyNormalized { name } => {
                Diagnostic::error(format!("`{}` went through normalization twice", name))
                    .with_context("normalization injects the receiver argument and must run once")
            }

            BindgenError::InvalidConfig { reason } => {
                Diagnostic::error(format!("invalid configuration: {}", reason))
                    .with_suggestion(suggestions::CHECK_CONFIG)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_enum_diagnostic() {
        let err = BindgenError::UnknownEnum {
            identifier: "CHFL_NOPE".into(),
            coord: Coord::new("chemfiles.h", 7),
        };
        assert!(err.to_string().contains("CHFL_NOPE"));
        assert!(err.to_string().contains("chemfiles.h:7"));

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("error: cannot name the enum starting with `CHFL_NOPE`"));
        assert!(output.contains("--> chemfiles.h"));
        assert!(output.contains("[enum_names]"));
    }

    #[test]
    fn test_type_mapping_names_function_and_argument() {
        let err = BindgenError::TypeMapping {
            ctype: "long double".into(),
            target: Language::Fortran,
            function: "chfl_atom_mass".into(),
            argument: "argument `mass`".into(),
            coord: Coord::new("chemfiles.h", 12),
        };
        let message = err.to_string();
        assert!(message.contains("fortran"));
        assert!(message.contains("long double"));
        assert!(message.contains("argument `mass` of `chfl_atom_mass`"));
    }
}
