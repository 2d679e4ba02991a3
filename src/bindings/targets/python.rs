//! Python `ctypes` declarations.

use super::{block, indent};
use crate::bindings::errors::BindResult;
use crate::bindings::mapper::{KnownNames, MappedType, TypeMapper, Unmapped};
use crate::bindings::render::{banner, comma_list, selected, Emitted, Generator};
use crate::bindings::types::{Bindings, CType, Enum, Function};
use crate::core::Language;
use crate::util::config::Config;

const PREAMBLE: &str = r#"'''
Foreign function interface declaration for the Python interface to chemfiles
'''

from ctypes import *

from .errors import _check
from .find_chemfiles import find_chemfiles


class ChemfilesLibrary(object):
    def __init__(self):
        self._cache = None

    def __call__(self):
        if self._cache is None:
            self._cache = find_chemfiles()
            set_interface(self._cache)
        return self._cache


get_c_library = ChemfilesLibrary()
"#;

const CHFL_MATCH: &str = r#"class chfl_match(Structure):
    _fields_ = [
        ("size", c_uint64),
        ("atoms", c_uint64 * 4),
    ]
"#;

const CHFL_FORMAT_METADATA: &str = r#"class chfl_format_metadata(Structure):
    _fields_ = [
        ("name", c_char_p),
        ("extension", c_char_p),
        ("description", c_char_p),
        ("reference", c_char_p),
        ("read", c_bool),
        ("write", c_bool),
        ("memory", c_bool),
        ("positions", c_bool),
        ("velocities", c_bool),
        ("unit_cell", c_bool),
        ("atoms", c_bool),
        ("bonds", c_bool),
        ("residues", c_bool),
    ]
"#;

fn manual_struct(name: &str) -> Option<&'static str> {
    match name {
        "chfl_match" => Some(CHFL_MATCH),
        "chfl_format_metadata" => Some(CHFL_FORMAT_METADATA),
        _ => None,
    }
}

/// `ctypes` type names.
#[derive(Debug, Clone)]
pub struct PythonMapper {
    names: KnownNames,
}

impl PythonMapper {
    pub fn new(names: KnownNames) -> Self {
        PythonMapper { names }
    }

    fn scalar(&self, name: &str) -> Option<String> {
        let token = match name {
            "bool" => "c_bool",
            "char" => "c_char",
            "int" => "c_int",
            "int8_t" => "c_int8",
            "uint8_t" => "c_uint8",
            "int32_t" => "c_int32",
            "int64_t" => "c_int64",
            "uint32_t" => "c_uint32",
            "uint64_t" => "c_uint64",
            "size_t" => "c_size_t",
            "float" => "c_float",
            "double" => "c_double",
            other if self.names.is_named(other) => other,
            _ => return None,
        };
        Some(token.to_string())
    }
}

impl TypeMapper for PythonMapper {
    fn language(&self) -> Language {
        Language::Python
    }

    fn names(&self) -> &KnownNames {
        &self.names
    }

    fn map(&self, ctype: &CType) -> Result<MappedType, Unmapped> {
        let unmapped = || Unmapped(ctype.clone());
        match ctype {
            CType::Scalar(name) => self.scalar(name).map(MappedType::same).ok_or_else(unmapped),
            CType::OpaqueHandle(name) => Ok(MappedType::same(name.clone())),
            CType::String {
                fixed_length: Some(len),
                ..
            } => Ok(MappedType::split("c_char_p", format!("c_char * {}", len))),
            CType::String { .. } => Ok(MappedType::same("c_char_p")),
            CType::Pointer(inner) => {
                if inner.is_void() {
                    return Ok(MappedType::same("c_void_p"));
                }
                let pointee = self.map(inner)?;
                Ok(MappedType::same(format!("POINTER({})", pointee.declared)))
            }
            CType::Array(inner, len) => {
                let element = self.map(inner)?;
                Ok(MappedType::split(
                    format!("POINTER({})", element.declared),
                    format!("{} * {}", element.declared, len),
                ))
            }
        }
    }

    fn map_return(&self, ctype: &CType) -> Result<MappedType, Unmapped> {
        if ctype.is_void() {
            return Ok(MappedType::same("None"));
        }
        self.map(ctype)
    }
}

/// Writes `ffi.py`.
pub struct PythonGenerator<'a> {
    config: &'a Config,
    mapper: PythonMapper,
}

impl<'a> PythonGenerator<'a> {
    pub fn new(config: &'a Config, enums: &[Enum]) -> Self {
        PythonGenerator {
            config,
            mapper: PythonMapper::new(KnownNames::new(config, enums)),
        }
    }

    fn render_handle(name: &str) -> String {
        format!("class {}(Structure):\n    pass\n", name)
    }
}

impl Generator for PythonGenerator<'_> {
    fn language(&self) -> Language {
        Language::Python
    }

    fn render_enum(&self, enumeration: &Enum) -> BindResult<String> {
        let mut out = format!("class {}(c_int):\n", enumeration.name);
        let values = enumeration.resolved();
        if values.is_empty() {
            out.push_str("    pass\n");
        }
        for (name, value) in values {
            out.push_str(&format!("    {} = {}\n", name, value));
        }
        Ok(out)
    }

    fn render_function(&self, function: &Function) -> BindResult<String> {
        let argtypes = function
            .c_args()
            .iter()
            .map(|arg| self.mapper.map_arg(function, arg).map(|mapped| mapped.call))
            .collect::<BindResult<Vec<_>>>()?;
        let restype = self.mapper.map_rettype(function)?;

        let name = &function.name;
        let mut out = format!("# Function \"{}\", at {}\n", name, function.coord.short());
        out.push_str(&format!("c_lib.{}.argtypes = [{}]\n", name, comma_list(&argtypes)));
        out.push_str(&format!("c_lib.{}.restype = {}\n", name, restype.call));
        if restype.status {
            out.push_str(&format!("c_lib.{}.errcheck = _check\n", name));
        }
        Ok(out)
    }

    fn generate(&self, bindings: &Bindings) -> BindResult<String> {
        let mut sections = vec![banner("#", "Python ctypes"), PREAMBLE.to_string()];

        for enumeration in &bindings.enums {
            sections.push(self.render_enum(enumeration)?);
        }
        for handle in &self.config.handles {
            sections.push(Self::render_handle(handle));
        }
        for name in &self.config.structs {
            match manual_struct(name) {
                Some(text) => sections.push(text.to_string()),
                None => tracing::warn!("no Python definition for struct {}", name),
            }
        }

        let mut body = Vec::new();
        for emitted in selected(&bindings.functions, &self.config.python) {
            match emitted {
                Emitted::Generated(function) => body.push(self.render_function(function)?),
                Emitted::Override(_, text) => body.push(block(text)),
            }
        }

        let mut interface = String::from("def set_interface(c_lib):\n");
        if body.is_empty() {
            interface.push_str("    pass\n");
        } else {
            interface.push_str(&indent(&body.join("\n"), 4));
        }
        sections.push(interface);

        Ok(sections.join("\n\n"))
    }
}
