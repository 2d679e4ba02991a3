//! Language-neutral model of the C interface.
//!
//! Declarations are turned into these types once by the extractor; every
//! target renders from the same values.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ast::{Coord, RawType};

/// C type representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CType {
    /// Scalar value, by canonical C name (`"double"`, `"uint64_t"`, `"chfl_status"`)
    Scalar(String),

    /// Pointer to another type
    Pointer(Box<CType>),

    /// Fixed-size array
    Array(Box<CType>, usize),

    /// `char*`, `const char*` or `char name[N]`
    String {
        is_const: bool,
        fixed_length: Option<usize>,
    },

    /// Library object whose layout is hidden; only ever seen behind a pointer
    OpaqueHandle(String),
}

/// Names the type model needs to classify raw types.
///
/// Built by the extractor from the configuration and from the typedefs and
/// enums seen so far in the header.
#[derive(Debug, Clone, Default)]
pub struct TypeContext {
    /// Opaque handle type names
    pub handles: BTreeSet<String>,

    /// Manually translated struct names
    pub structs: BTreeSet<String>,

    /// Canonical enum names
    pub enums: BTreeSet<String>,

    /// Resolved typedefs
    pub typedefs: BTreeMap<String, CType>,
}

impl TypeContext {
    pub fn is_handle(&self, name: &str) -> bool {
        self.handles.contains(name)
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains(name)
    }

    pub fn is_struct(&self, name: &str) -> bool {
        self.structs.contains(name)
    }
}

/// Canonical spelling of a builtin C scalar, if `base` is one.
fn builtin_scalar(base: &str) -> Option<&'static str> {
    // (signed, unsigned) spelling for explicitly signed types
    let (unsigned, s) = match base.strip_prefix("unsigned") {
        Some(rest) => (Some(true), rest.trim()),
        None => match base.strip_prefix("signed") {
            Some(rest) => (Some(false), rest.trim()),
            None => (None, base),
        },
    };

    let name = match (s, unsigned) {
        ("void", None) => "void",
        ("bool" | "_Bool", None) => "bool",
        ("char", None) => "char",
        ("char", Some(false)) => "int8_t",
        ("char", Some(true)) => "uint8_t",
        ("" | "int", Some(true)) => "uint32_t",
        ("" | "int", Some(false)) | ("int", None) => "int",
        ("long" | "long int" | "long long" | "long long int", Some(true)) => "uint64_t",
        ("long" | "long int" | "long long" | "long long int", _) => "int64_t",
        ("float", None) => "float",
        ("double", None) => "double",
        ("int8_t", None) => "int8_t",
        ("uint8_t", None) => "uint8_t",
        ("int32_t", None) => "int32_t",
        ("int64_t", None) => "int64_t",
        ("uint32_t", None) => "uint32_t",
        ("uint64_t", None) => "uint64_t",
        ("size_t", None) => "size_t",
        _ => return None,
    };
    Some(name)
}

impl CType {
    /// Resolve a raw declaration type.
    ///
    /// Returns `None` when the base type is unknown; the caller turns that
    /// into an error naming the declaration.
    pub fn from_raw(raw: &RawType, ctx: &TypeContext) -> Option<CType> {
        let base = raw.base.trim();

        if base == "char" {
            return match (raw.pointers, raw.array) {
                (0, Some(len)) => Some(CType::String {
                    is_const: raw.is_const,
                    fixed_length: Some(len),
                }),
                (0, None) => Some(CType::Scalar("char".into())),
                (n, None) => Some(wrap_pointers(
                    CType::String {
                        is_const: raw.is_const,
                        fixed_length: None,
                    },
                    n - 1,
                )),
                _ => None,
            };
        }

        let inner = if ctx.is_handle(base) {
            // A bare handle can only be used behind a pointer
            if raw.pointers == 0 {
                return None;
            }
            CType::OpaqueHandle(base.to_string())
        } else if let Some(name) = builtin_scalar(base) {
            CType::Scalar(name.to_string())
        } else if ctx.is_enum(base) || ctx.is_struct(base) {
            CType::Scalar(base.to_string())
        } else if let Some(ty) = ctx.typedefs.get(base) {
            ty.clone()
        } else {
            return None;
        };

        let inner = match raw.array {
            Some(len) => CType::Array(Box::new(inner), len),
            None => inner,
        };

        Some(wrap_pointers(inner, raw.pointers))
    }

    /// Check if this is a void type.
    pub fn is_void(&self) -> bool {
        matches!(self, CType::Scalar(name) if name == "void")
    }

    pub fn is_string(&self) -> bool {
        matches!(self, CType::String { .. })
    }

    pub fn is_const_string(&self) -> bool {
        matches!(self, CType::String { is_const: true, .. })
    }

    /// Name of the handle if this is a pointer to an opaque handle.
    pub fn handle_name(&self) -> Option<&str> {
        match self {
            CType::Pointer(inner) => match inner.as_ref() {
                CType::OpaqueHandle(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    /// Check if the value is a status code (per the configured status types).
    pub fn is_status(&self, status_types: &[String]) -> bool {
        matches!(self, CType::Scalar(name) if status_types.iter().any(|s| s == name))
    }
}

fn wrap_pointers(mut ty: CType, count: usize) -> CType {
    for _ in 0..count {
        ty = CType::Pointer(Box::new(ty));
    }
    ty
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CType::Scalar(name) | CType::OpaqueHandle(name) => write!(f, "{}", name),
            CType::Pointer(inner) => write!(f, "{}*", inner),
            CType::Array(inner, len) => write!(f, "{}[{}]", inner, len),
            CType::String {
                is_const,
                fixed_length,
            } => {
                if *is_const {
                    write!(f, "const ")?;
                }
                match fixed_length {
                    Some(len) => write!(f, "char[{}]", len),
                    None => write!(f, "char*"),
                }
            }
        }
    }
}

/// A function argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,

    #[serde(rename = "type")]
    pub ctype: CType,
}

impl Argument {
    pub fn new(name: impl Into<String>, ctype: CType) -> Self {
        Argument {
            name: name.into(),
            ctype,
        }
    }
}

/// A C function declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// C symbol name
    pub name: String,

    /// Name of the emitted wrapper, differs from `name` for constructors
    pub fname: String,

    /// Arguments in declared order, receiver first after normalization
    pub args: Vec<Argument>,

    /// Return type
    pub rettype: CType,

    pub is_constructor: bool,

    /// Where the prototype lives in the header
    pub coord: Coord,

    /// Set by the normalization pass
    #[serde(default)]
    pub normalized: bool,
}

impl Function {
    /// Create a new function with the given name and return type.
    pub fn new(name: impl Into<String>, rettype: CType, coord: Coord) -> Self {
        let name = name.into();
        Function {
            fname: name.clone(),
            name,
            args: Vec::new(),
            rettype,
            is_constructor: false,
            coord,
            normalized: false,
        }
    }

    /// Add an argument.
    pub fn with_arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    pub fn constructor(mut self) -> Self {
        self.is_constructor = true;
        self
    }

    /// Arguments of the underlying C call.
    ///
    /// Skips the receiver injected into normalized constructors.
    pub fn c_args(&self) -> &[Argument] {
        if self.normalized && self.is_constructor {
            &self.args[1..]
        } else {
            &self.args
        }
    }

    /// Check if the function hands back a status code.
    pub fn returns_status(&self, status_types: &[String]) -> bool {
        self.rettype.is_status(status_types)
    }
}

/// A value in an enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumerator {
    pub name: String,

    /// Explicit value (if any)
    pub value: Option<i64>,
}

impl Enumerator {
    pub fn new(name: impl Into<String>, value: Option<i64>) -> Self {
        Enumerator {
            name: name.into(),
            value,
        }
    }
}

/// A C enumeration, named through the resolution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub enumerators: Vec<Enumerator>,
    pub coord: Coord,
}

impl Enum {
    /// Enumerators paired with their value.
    ///
    /// An enumerator without a literal gets the previous value plus one, or
    /// 0 when it comes first.
    pub fn resolved(&self) -> Vec<(&str, i64)> {
        let mut next = 0;
        self.enumerators
            .iter()
            .map(|e| {
                let value = e.value.unwrap_or(next);
                // Extraction rejects enums whose implicit values overflow
                next = value.saturating_add(1);
                (e.name.as_str(), value)
            })
            .collect()
    }
}

/// Everything extracted from one header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    /// Functions in header order
    pub functions: Vec<Function>,

    /// Enums in header order
    pub enums: Vec<Enum>,
}
