//! Julia `ccall` wrappers.

use super::block;
use crate::bindings::errors::BindResult;
use crate::bindings::mapper::{KnownNames, MappedType, TypeMapper, Unmapped};
use crate::bindings::render::{banner, comma_list, selected, Emitted, Generator};
use crate::bindings::types::{Bindings, CType, Enum, Function};
use crate::core::Language;
use crate::util::config::Config;

/// Name of the library handle the wrappers call into.
const LIBRARY: &str = "libchemfiles";

const CBOOL: &str = "const Cbool = Cuchar\n";

const CHFL_MATCH: &str = r#"struct chfl_match
    size    ::UInt64
    atoms_1 ::UInt64
    atoms_2 ::UInt64
    atoms_3 ::UInt64
    atoms_4 ::UInt64
end
"#;

const CHFL_FORMAT_METADATA: &str = r#"struct chfl_format_metadata
    name :: Ptr{Cchar}
    extension :: Ptr{Cchar}
    description :: Ptr{Cchar}
    reference :: Ptr{Cchar}
    read :: Cbool
    write :: Cbool
    memory :: Cbool
    positions :: Cbool
    velocities :: Cbool
    unit_cell :: Cbool
    atoms :: Cbool
    bonds :: Cbool
    residues :: Cbool
end
"#;

fn manual_struct(name: &str) -> Option<&'static str> {
    match name {
        "chfl_match" => Some(CHFL_MATCH),
        "chfl_format_metadata" => Some(CHFL_FORMAT_METADATA),
        _ => None,
    }
}

/// Julia type names.
#[derive(Debug, Clone)]
pub struct JuliaMapper {
    names: KnownNames,
}

impl JuliaMapper {
    pub fn new(names: KnownNames) -> Self {
        JuliaMapper { names }
    }

    fn scalar(&self, name: &str) -> Option<String> {
        let token = match name {
            "bool" => "Cbool",
            "char" => "Cchar",
            "int" => "Cint",
            "int8_t" => "Int8",
            "uint8_t" => "UInt8",
            "int32_t" => "Int32",
            "int64_t" => "Int64",
            "uint32_t" => "UInt32",
            "uint64_t" => "UInt64",
            "size_t" => "Csize_t",
            "float" => "Cfloat",
            "double" => "Cdouble",
            other if self.names.is_named(other) => other,
            _ => return None,
        };
        Some(token.to_string())
    }
}

impl TypeMapper for JuliaMapper {
    fn language(&self) -> Language {
        Language::Julia
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
                is_const: true,
                fixed_length: None,
            } => Ok(MappedType::split("Cstring", "String")),
            CType::String { .. } => Ok(MappedType::same("Ptr{UInt8}")),
            CType::Pointer(inner) => match inner.as_ref() {
                CType::Scalar(name) if name == "void" => Ok(MappedType::same("Ptr{Cvoid}")),
                CType::OpaqueHandle(name) => Ok(MappedType::same(format!("Ptr{{{}}}", name))),
                CType::String { .. } => Ok(MappedType::same("Ref{Ptr{UInt8}}")),
                CType::Scalar(_) => {
                    let pointee = self.map(inner)?;
                    Ok(MappedType::same(format!("Ref{{{}}}", pointee.call)))
                }
                _ => {
                    let pointee = self.map(inner)?;
                    Ok(MappedType::same(format!("Ptr{{{}}}", pointee.call)))
                }
            },
            CType::Array(inner, _) => {
                let element = self.map(inner)?;
                Ok(MappedType::split(
                    format!("Ptr{{{}}}", element.call),
                    format!("Vector{{{}}}", element.declared),
                ))
            }
        }
    }

    fn map_return(&self, ctype: &CType) -> Result<MappedType, Unmapped> {
        match ctype {
            CType::Scalar(name) if name == "void" => Ok(MappedType::same("Cvoid")),
            CType::String { .. } => Ok(MappedType::same("Cstring")),
            other => self.map(other),
        }
    }
}

/// `ccall` argument type tuple: `()`, `(T,)` or `(A, B)`.
fn type_tuple(types: &[String]) -> String {
    match types {
        [] => "()".to_string(),
        [single] => format!("({},)", single),
        many => format!("({})", comma_list(many)),
    }
}

/// Writes `ffi.jl`.
pub struct JuliaGenerator<'a> {
    config: &'a Config,
    mapper: JuliaMapper,
}

impl<'a> JuliaGenerator<'a> {
    pub fn new(config: &'a Config, enums: &[Enum]) -> Self {
        JuliaGenerator {
            config,
            mapper: JuliaMapper::new(KnownNames::new(config, enums)),
        }
    }

    fn manual_types(&self) -> String {
        let mut out = String::from("# === Manually translated from the header\n");
        out.push_str(CBOOL);
        for name in &self.config.structs {
            match manual_struct(name) {
                Some(text) => {
                    out.push('\n');
                    out.push_str(text);
                }
                None => tracing::warn!("no Julia definition for struct {}", name),
            }
        }
        out.push_str("# === End of manual type definition\n");
        out
    }
}

impl Generator for JuliaGenerator<'_> {
    fn language(&self) -> Language {
        Language::Julia
    }

    fn render_enum(&self, enumeration: &Enum) -> BindResult<String> {
        let values = enumeration.resolved();
        // Julia rejects negative values for unsigned integers
        let repr = if values.iter().any(|(_, value)| *value < 0) {
            "Int32"
        } else {
            "UInt32"
        };

        let name = &enumeration.name;
        let mut out = format!("# enum {}\nconst {} = {}\n", name, name, repr);
        for (enumerator, value) in values {
            out.push_str(&format!("const {} = {}({})\n", enumerator, name, value));
        }
        Ok(out)
    }

    fn render_function(&self, function: &Function) -> BindResult<String> {
        let args = function.c_args();
        let mapped = args
            .iter()
            .map(|arg| self.mapper.map_arg(function, arg))
            .collect::<BindResult<Vec<_>>>()?;
        let restype = self.mapper.map_rettype(function)?;

        let argdecl = comma_list(
            args.iter()
                .zip(&mapped)
                .map(|(arg, ty)| format!("{}::{}", arg.name, ty.declared)),
        );
        let argtypes: Vec<String> = mapped.into_iter().map(|ty| ty.call).collect();
        let names = args.iter().map(|arg| arg.name.as_str());

        let mut call = format!(
            "ccall((:{}, {}), {}, {}",
            function.name,
            LIBRARY,
            restype.call,
            type_tuple(&argtypes)
        );
        if !args.is_empty() {
            call.push_str(", ");
            call.push_str(&comma_list(names));
        }
        call.push(')');

        Ok(format!(
            "# Function '{}' at {}\nfunction {}({})\n    {}\nend\n",
            function.name,
            function.coord.short(),
            function.name,
            argdecl,
            call
        ))
    }

    fn generate(&self, bindings: &Bindings) -> BindResult<String> {
        let mut sections = vec![banner("#", "Julia"), self.manual_types()];

        let handles: String = self
            .config
            .handles
            .iter()
            .map(|handle| format!("struct {} end\n", handle))
            .collect();
        sections.push(handles);

        for enumeration in &bindings.enums {
            sections.push(self.render_enum(enumeration)?);
        }

        for emitted in selected(&bindings.functions, &self.config.julia) {
            match emitted {
                Emitted::Generated(function) => sections.push(self.render_function(function)?),
                Emitted::Override(_, text) => sections.push(block(text)),
            }
        }

        Ok(sections.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::ast::Coord;
    use crate::bindings::types::Enumerator;
    use crate::test_support::chemfiles_bindings;

    fn generate() -> String {
        let config = Config::default();
        let bindings = chemfiles_bindings();
        JuliaGenerator::new(&config, &bindings.enums)
            .generate(&bindings)
            .unwrap()
    }

    #[test]
    fn test_type_tuple() {
        assert_eq!(type_tuple(&[]), "()");
        assert_eq!(type_tuple(&["Cint".to_string()]), "(Cint,)");
        assert_eq!(
            type_tuple(&["Cint".to_string(), "Cdouble".to_string()]),
            "(Cint, Cdouble)"
        );
    }

    #[test]
    fn test_julia_type_tokens() {
        let mapper = JuliaMapper::new(KnownNames::default());
        let double = CType::Scalar("double".into());

        assert_eq!(
            mapper.map(&CType::Pointer(Box::new(double.clone()))).unwrap().call,
            "Ref{Cdouble}"
        );
        assert_eq!(
            mapper
                .map(&CType::Pointer(Box::new(CType::OpaqueHandle("CHFL_CELL".into()))))
                .unwrap()
                .call,
            "Ptr{CHFL_CELL}"
        );
        assert_eq!(
            mapper.map(&CType::Array(Box::new(double), 3)).unwrap(),
            MappedType::split("Ptr{Cdouble}", "Vector{Cdouble}")
        );
        assert_eq!(
            mapper
                .map(&CType::String {
                    is_const: true,
                    fixed_length: None
                })
                .unwrap(),
            MappedType::split("Cstring", "String")
        );
        assert_eq!(
            mapper
                .map_return(&CType::String {
                    is_const: true,
                    fixed_length: None
                })
                .unwrap()
                .call,
            "Cstring"
        );
        assert!(mapper.map(&CType::Scalar("chfl_cellshape".into())).is_err());
    }

    #[test]
    fn test_julia_enum_values() {
        let out = generate();
        assert!(out.contains(
            "# enum chfl_status\nconst chfl_status = UInt32\nconst CHFL_SUCCESS = chfl_status(0)\n"
        ));
        assert!(out.contains("const CHFL_CXX_ERROR = chfl_status(255)\n"));
        assert!(out.contains("const CHFL_CELL_INFINITE = chfl_cellshape(2)\n"));
    }

    #[test]
    fn test_negative_enum_uses_signed_repr() {
        let config = Config::default();
        let generator = JuliaGenerator::new(&config, &[]);
        let enumeration = Enum {
            name: "chfl_sign".into(),
            enumerators: vec![
                Enumerator::new("CHFL_NEGATIVE", Some(-1)),
                Enumerator::new("CHFL_ZERO", None),
            ],
            coord: Coord::default(),
        };
        let out = generator.render_enum(&enumeration).unwrap();
        assert!(out.contains("const chfl_sign = Int32\n"));
        assert!(out.contains("const CHFL_ZERO = chfl_sign(0)\n"));
    }

    #[test]
    fn test_julia_functions() {
        let out = generate();
        assert!(out.contains("struct CHFL_ATOM end\n"));
        assert!(out.contains("const Cbool = Cuchar\n"));

        assert!(out.contains(
            "# Function 'chfl_atom_mass' at chemfiles.h:60\nfunction chfl_atom_mass(this::Ptr{CHFL_ATOM}, mass::Ref{Cdouble})\n    ccall((:chfl_atom_mass, libchemfiles), chfl_status, (Ptr{CHFL_ATOM}, Ref{Cdouble}), this, mass)\nend\n"
        ));
        assert!(out.contains(
            "function chfl_version()\n    ccall((:chfl_version, libchemfiles), Cstring, ())\nend\n"
        ));
        assert!(out.contains(
            "function chfl_atom(name::String)\n    ccall((:chfl_atom, libchemfiles), Ptr{CHFL_ATOM}, (Cstring,), name)\nend\n"
        ));
        assert!(out.contains(
            "function chfl_cell(lengths::Vector{Cdouble}, angles::Vector{Cdouble})\n"
        ));
    }

    #[test]
    fn test_julia_override_in_place() {
        let out = generate();
        assert!(out.contains("# Function 'chfl_trajectory_memory_buffer' (manual translation)\n"));
        assert!(!out.contains("# Function 'chfl_trajectory_memory_buffer' at"));

        let read = out.find("function chfl_trajectory_read(").unwrap();
        let buffer = out.find("function chfl_trajectory_memory_buffer(").unwrap();
        let close = out.find("function chfl_trajectory_close(").unwrap();
        assert!(read < buffer && buffer < close);
    }
}
