//! Declaration nodes produced by the header front-end.
//!
//! The extractor only ever sees these nodes, never header text, so any
//! front-end able to produce them (the regex parser in this crate, or a
//! real C parser) can drive binding generation.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Location of a declaration in the header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coord {
    /// Header file
    pub file: PathBuf,

    /// 1-based line of the declared name
    pub line: usize,
}

impl Coord {
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Coord {
            file: file.into(),
            line,
        }
    }

    /// `file:line` with only the file name, for comments in generated code.
    pub fn short(&self) -> String {
        let file = self
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}:{}", file, self.line)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// A C type exactly as spelled in a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawType {
    /// Base type name, qualifiers removed (`"double"`, `"unsigned int"`, `"CHFL_ATOM"`)
    pub base: String,

    /// Whether the pointee (or the value) is `const`
    pub is_const: bool,

    /// Number of `*` levels
    pub pointers: usize,

    /// Declarator array length (`double lengths[3]`)
    pub array: Option<usize>,
}

impl RawType {
    /// A plain, non-pointer type.
    pub fn named(base: impl Into<String>) -> Self {
        RawType {
            base: base.into(),
            is_const: false,
            pointers: 0,
            array: None,
        }
    }

    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_pointer(mut self) -> Self {
        self.pointers += 1;
        self
    }

    pub fn with_array(mut self, len: usize) -> Self {
        self.array = Some(len);
        self
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", self.base)?;
        for _ in 0..self.pointers {
            write!(f, "*")?;
        }
        if let Some(len) = self.array {
            write!(f, "[{}]", len)?;
        }
        Ok(())
    }
}

/// A function parameter as declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Parameter name (empty for unnamed parameters)
    pub name: String,
    pub ty: RawType,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: RawType) -> Self {
        ParamDecl {
            name: name.into(),
            ty,
        }
    }
}

/// A function prototype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub return_type: RawType,
    pub coord: Coord,
}

/// An enum definition. The tag is informational only: C enums in the
/// header are anonymous and get their name from the resolution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub tag: Option<String>,

    /// Enumerator names with their literal value text, in declaration order
    pub enumerators: Vec<(String, Option<String>)>,

    pub coord: Coord,
}

/// A `typedef` of a scalar or array type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefDecl {
    pub name: String,
    pub ty: RawType,
    pub coord: Coord,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decl {
    Function(FunctionDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
}

impl Decl {
    /// Source line, used to keep declarations in header order.
    pub fn line(&self) -> usize {
        match self {
            Decl::Function(f) => f.coord.line,
            Decl::Enum(e) => e.coord.line,
            Decl::Typedef(t) => t.coord.line,
        }
    }
}
