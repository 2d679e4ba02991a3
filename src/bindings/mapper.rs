//! Translation of model types into target-language type tokens.
//!
//! Each target implements [`TypeMapper`]. A mapper never sees header text
//! and never guesses: a type it has no rule for comes back as
//! [`Unmapped`], which the generator turns into a [`BindgenError`] naming
//! the function and argument.

use std::collections::BTreeSet;

use super::errors::{BindResult, BindgenError};
use super::types::{Argument, CType, Enum, Function};
use crate::core::Language;
use crate::util::config::Config;

/// Type tokens for one argument or return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    /// Token used where the raw C symbol is declared or called
    pub call: String,

    /// Token used in the signature of the wrapper exposed to users
    pub declared: String,

    /// Whether the value is a library status code
    pub status: bool,
}

impl MappedType {
    /// Same token on both sides.
    pub fn same(token: impl Into<String>) -> Self {
        let token = token.into();
        MappedType {
            declared: token.clone(),
            call: token,
            status: false,
        }
    }

    pub fn split(call: impl Into<String>, declared: impl Into<String>) -> Self {
        MappedType {
            call: call.into(),
            declared: declared.into(),
            status: false,
        }
    }

    fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }
}

/// A type the target has no rule for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmapped(pub CType);

impl Unmapped {
    fn into_error(self, language: Language, function: &Function, argument: String) -> BindgenError {
        BindgenError::TypeMapping {
            ctype: self.0.to_string(),
            target: language,
            function: function.name.clone(),
            argument,
            coord: function.coord.clone(),
        }
    }
}

/// Named types a mapper may refer to by name.
#[derive(Debug, Clone, Default)]
pub struct KnownNames {
    pub enums: BTreeSet<String>,
    pub structs: BTreeSet<String>,
    pub status_types: Vec<String>,
}

impl KnownNames {
    pub fn new(config: &Config, enums: &[Enum]) -> Self {
        KnownNames {
            enums: enums.iter().map(|e| e.name.clone()).collect(),
            structs: config.structs.iter().cloned().collect(),
            status_types: config.status_types.clone(),
        }
    }

    /// Whether `name` is an enum or manual struct known to the target.
    pub fn is_named(&self, name: &str) -> bool {
        self.enums.contains(name) || self.structs.contains(name)
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }
}

/// Per-target type translation.
pub trait TypeMapper {
    /// Target these tokens belong to.
    fn language(&self) -> Language;

    /// Names available to this mapper.
    fn names(&self) -> &KnownNames;

    /// Tokens for a value in argument position.
    fn map(&self, ctype: &CType) -> Result<MappedType, Unmapped>;

    /// Tokens for a return value.
    fn map_return(&self, ctype: &CType) -> Result<MappedType, Unmapped> {
        self.map(ctype)
    }

    /// Map one argument of `function`, reporting failures against it.
    fn map_arg(&self, function: &Function, arg: &Argument) -> BindResult<MappedType> {
        self.map(&arg.ctype).map_err(|unmapped| {
            unmapped.into_error(self.language(), function, format!("argument `{}`", arg.name))
        })
    }

    /// Map the return type of `function`, flagging status codes.
    fn map_rettype(&self, function: &Function) -> BindResult<MappedType> {
        let status = function.returns_status(&self.names().status_types);
        self.map_return(&function.rettype)
            .map(|mapped| mapped.with_status(status))
            .map_err(|unmapped| {
                unmapped.into_error(self.language(), function, "return value".to_string())
            })
    }
}
