//! Fortran 2003 module: `bind(C)` interfaces plus user-facing wrappers.
//!
//! Every C function gets a raw `c_<name>` interface. The wrapper around
//! it takes one of three shapes (see [`RenderPath`]): constructors store
//! the returned pointer in the receiver, string functions copy the C
//! string into a fixed-length Fortran string, and everything else returns
//! its status through an optional trailing `status` argument.
//!
//! String conversion helpers (`f_to_c_str`, `c_to_f_str`,
//! `c_buf_to_f_str`) come from the hand-written `chemfiles_strings` module.

use super::{block, indent};
use crate::bindings::errors::{BindResult, BindgenError};
use crate::bindings::mapper::{KnownNames, MappedType, TypeMapper, Unmapped};
use crate::bindings::render::{banner, comma_list, selected, Emitted, Generator, RenderPath};
use crate::bindings::types::{Argument, Bindings, CType, Enum, Function};
use crate::core::Language;
use crate::util::config::Config;

/// Column limit before a statement is continued with `&`.
const MAX_LINE: usize = 100;

const STRING_LENGTH_PARAMETER: &str = "CHFL_STRING_LENGTH";

const CHFL_MATCH: &str = r#"type, bind(C) :: chfl_match
    integer(kind=c_int64_t) :: size
    integer(kind=c_int64_t), dimension(4) :: atoms
end type
"#;

const CHFL_FORMAT_METADATA: &str = r#"type, bind(C) :: chfl_format_metadata
    type(c_ptr) :: name
    type(c_ptr) :: extension
    type(c_ptr) :: description
    type(c_ptr) :: reference
    logical(kind=c_bool) :: read
    logical(kind=c_bool) :: write
    logical(kind=c_bool) :: memory
    logical(kind=c_bool) :: positions
    logical(kind=c_bool) :: velocities
    logical(kind=c_bool) :: unit_cell
    logical(kind=c_bool) :: atoms
    logical(kind=c_bool) :: bonds
    logical(kind=c_bool) :: residues
end type
"#;

fn manual_struct(name: &str) -> Option<&'static str> {
    match name {
        "chfl_match" => Some(CHFL_MATCH),
        "chfl_format_metadata" => Some(CHFL_FORMAT_METADATA),
        _ => None,
    }
}

/// Derived type wrapping a handle.
fn handle_type(handle: &str) -> String {
    handle.to_lowercase()
}

/// `iso_c_binding` declarations.
///
/// `call` tokens declare the dummy arguments of the `bind(C)` interface,
/// `declared` tokens those of the wrapper.
#[derive(Debug, Clone)]
pub struct FortranMapper {
    names: KnownNames,
}

impl FortranMapper {
    pub fn new(names: KnownNames) -> Self {
        FortranMapper { names }
    }

    fn kind(&self, name: &str) -> Option<String> {
        let token = match name {
            "bool" => "logical(kind=c_bool)",
            "char" => "character(kind=c_char)",
            "int" => "integer(kind=c_int)",
            "int8_t" | "uint8_t" => "integer(kind=c_int8_t)",
            "int32_t" | "uint32_t" => "integer(kind=c_int32_t)",
            "int64_t" | "uint64_t" => "integer(kind=c_int64_t)",
            "size_t" => "integer(kind=c_size_t)",
            "float" => "real(kind=c_float)",
            "double" => "real(kind=c_double)",
            other if self.names.is_enum(other) => "integer(kind=c_int)",
            other if self.names.is_named(other) => return Some(format!("type({})", other)),
            _ => return None,
        };
        Some(token.to_string())
    }
}

impl TypeMapper for FortranMapper {
    fn language(&self) -> Language {
        Language::Fortran
    }

    fn names(&self) -> &KnownNames {
        &self.names
    }

    fn map(&self, ctype: &CType) -> Result<MappedType, Unmapped> {
        let unmapped = || Unmapped(ctype.clone());
        match ctype {
            CType::Scalar(name) => {
                let kind = self.kind(name).ok_or_else(unmapped)?;
                Ok(MappedType::split(format!("{}, value", kind), kind))
            }
            CType::String { is_const, .. } => {
                let call = "character(len=1, kind=c_char), dimension(*)";
                if *is_const {
                    Ok(MappedType::split(call, "character(len=*), intent(in)"))
                } else {
                    Ok(MappedType::split(call, "character(len=*), intent(out)"))
                }
            }
            CType::Pointer(inner) => match inner.as_ref() {
                CType::Scalar(name) if name == "void" => {
                    Ok(MappedType::split("type(c_ptr), value", "type(c_ptr)"))
                }
                CType::OpaqueHandle(name) => Ok(MappedType::split(
                    "type(c_ptr), value",
                    format!("class({})", handle_type(name)),
                )),
                CType::Scalar(name) if self.names.structs.contains(name) => {
                    let kind = self.kind(name).ok_or_else(unmapped)?;
                    Ok(MappedType::same(format!("{}, dimension(*)", kind)))
                }
                CType::Scalar(name) => self.kind(name).map(MappedType::same).ok_or_else(unmapped),
                CType::Array(element, len) => match element.as_ref() {
                    CType::Scalar(name) => {
                        let kind = self.kind(name).ok_or_else(unmapped)?;
                        Ok(MappedType::same(format!("{}, dimension({}, *)", kind, len)))
                    }
                    _ => Err(unmapped()),
                },
                CType::String { .. } | CType::Pointer(_) => Ok(MappedType::same("type(c_ptr)")),
            },
            CType::Array(element, len) => match element.as_ref() {
                CType::Scalar(name) => {
                    let kind = self.kind(name).ok_or_else(unmapped)?;
                    Ok(MappedType::split(
                        "type(c_ptr), value",
                        format!("{}, dimension({}), target", kind, len),
                    ))
                }
                _ => Err(unmapped()),
            },
            CType::OpaqueHandle(_) => Err(unmapped()),
        }
    }

    fn map_return(&self, ctype: &CType) -> Result<MappedType, Unmapped> {
        match ctype {
            CType::Scalar(name) if name == "void" => Ok(MappedType::same("")),
            CType::Scalar(name) => self
                .kind(name)
                .map(MappedType::same)
                .ok_or_else(|| Unmapped(ctype.clone())),
            CType::Pointer(_) | CType::String { .. } => Ok(MappedType::same("type(c_ptr)")),
            other => Err(Unmapped(other.clone())),
        }
    }
}

/// Arguments of the raw call plus the statements around it.
#[derive(Debug, Default)]
struct Marshalled {
    args: Vec<String>,
    locals: Vec<String>,
    after: Vec<String>,
}

/// Writes `ffi.f90`.
pub struct FortranGenerator<'a> {
    config: &'a Config,
    mapper: FortranMapper,
}

impl<'a> FortranGenerator<'a> {
    pub fn new(config: &'a Config, enums: &[Enum]) -> Self {
        FortranGenerator {
            config,
            mapper: FortranMapper::new(KnownNames::new(config, enums)),
        }
    }

    /// `bind(C)` interface for the raw symbol.
    fn render_interface(&self, function: &Function) -> BindResult<String> {
        let args = function.c_args();
        let cname = format!("c_{}", function.name);
        let rettype = self.mapper.map_rettype(function)?;
        let keyword = if function.rettype.is_void() {
            "subroutine"
        } else {
            "function"
        };

        let mut out = format!(
            "! Function \"{}\", at {}\n",
            function.name,
            function.coord.short()
        );
        out.push_str(&format!(
            "{} {}({}) bind(C, name=\"{}\")\n",
            keyword,
            cname,
            comma_list(args.iter().map(|arg| arg.name.as_str())),
            function.name
        ));
        out.push_str("    import\n    implicit none\n");
        if !function.rettype.is_void() {
            out.push_str(&format!("    {} :: {}\n", rettype.call, cname));
        }
        for arg in args {
            let mapped = self.mapper.map_arg(function, arg)?;
            out.push_str(&format!("    {} :: {}\n", mapped.call, arg.name));
        }
        out.push_str(&format!("end {}\n", keyword));
        Ok(out)
    }

    /// Turn wrapper arguments into raw call arguments.
    fn marshal(&self, args: &[Argument]) -> Marshalled {
        let mut marshalled = Marshalled::default();
        for arg in args {
            let name = &arg.name;
            let expr = match &arg.ctype {
                CType::String { is_const: true, .. } => format!("f_to_c_str({})", name),
                CType::String {
                    is_const: false,
                    fixed_length,
                } => {
                    let buffer = format!("{}_buf_", name);
                    let len = fixed_length
                        .map(|len| len.to_string())
                        .unwrap_or_else(|| STRING_LENGTH_PARAMETER.to_string());
                    marshalled.locals.push(format!(
                        "character(len=1, kind=c_char), dimension({}) :: {}",
                        len, buffer
                    ));
                    marshalled
                        .after
                        .push(format!("{} = c_buf_to_f_str({})", name, buffer));
                    buffer
                }
                CType::Array(..) => format!("c_loc({})", name),
                ctype if ctype.handle_name().is_some() => format!("{}%ptr", name),
                _ => name.clone(),
            };
            marshalled.args.push(expr);
        }
        marshalled
    }

    fn declarations(&self, function: &Function) -> BindResult<Vec<String>> {
        function
            .args
            .iter()
            .map(|arg| {
                let mapped = self.mapper.map_arg(function, arg)?;
                Ok(format!("{} :: {}", mapped.declared, arg.name))
            })
            .collect()
    }

    /// Reject arguments whose names clash, ignoring case, with each other or
    /// with the locals and dummies the wrapper adds.
    fn check_names(&self, function: &Function, path: RenderPath) -> BindResult<()> {
        let mut added: Vec<String> = match path {
            RenderPath::Ordinary => vec!["status".into(), "status_tmp_".into()],
            RenderPath::StringReturn => vec!["string".into(), "c_string".into()],
            RenderPath::Constructor => Vec::new(),
        };
        added.extend(
            function
                .c_args()
                .iter()
                .filter(|arg| matches!(arg.ctype, CType::String { is_const: false, .. }))
                .map(|arg| format!("{}_buf_", arg.name)),
        );

        let mut seen: Vec<String> = Vec::new();
        for arg in &function.args {
            let name = arg.name.to_lowercase();
            let clash = if seen.contains(&name) {
                Some("another argument".to_string())
            } else {
                added
                    .iter()
                    .find(|local| local.to_lowercase() == name)
                    .map(|local| format!("the wrapper's `{}`", local))
            };
            if let Some(other) = clash {
                return Err(BindgenError::malformed(
                    &function.name,
                    &function.coord,
                    format!("argument `{}` clashes with {} in Fortran", arg.name, other),
                ));
            }
            seen.push(name);
        }
        Ok(())
    }

    fn render_wrapper(&self, function: &Function, path: RenderPath) -> BindResult<String> {
        self.check_names(function, path)?;
        let cname = format!("c_{}", function.name);
        let mut declarations = self.declarations(function)?;
        let call = self.marshal(function.c_args());
        let call_expr = format!("{}({})", cname, comma_list(&call.args));
        let mut arg_names: Vec<&str> = function.args.iter().map(|arg| arg.name.as_str()).collect();

        let (head, tail, mut body) = match path {
            RenderPath::Constructor => (
                format!("subroutine {}", function.fname),
                "end subroutine",
                vec![format!("{}%ptr = {}", self.config.receiver_name, call_expr)],
            ),
            RenderPath::StringReturn => {
                declarations.push(format!(
                    "character(len={}) :: string",
                    STRING_LENGTH_PARAMETER
                ));
                declarations.push("type(c_ptr) :: c_string".to_string());
                (
                    format!("function {}", function.fname),
                    "end function",
                    vec![
                        format!("c_string = {}", call_expr),
                        "string = c_to_f_str(c_string)".to_string(),
                    ],
                )
            }
            RenderPath::Ordinary => {
                if !function.returns_status(&self.config.status_types) {
                    return Err(BindgenError::malformed(
                        &function.name,
                        &function.coord,
                        format!(
                            "returns `{}` instead of a status code",
                            function.rettype
                        ),
                    ));
                }
                arg_names.push("status");
                declarations.push("integer, optional :: status".to_string());
                declarations.push("integer :: status_tmp_".to_string());
                (
                    format!("subroutine {}", function.fname),
                    "end subroutine",
                    vec![format!("status_tmp_ = {}", call_expr)],
                )
            }
        };

        body.extend(call.after);
        if path == RenderPath::Ordinary {
            body.push("if (present(status)) then".to_string());
            body.push("    status = status_tmp_".to_string());
            body.push("end if".to_string());
        }
        declarations.extend(call.locals);

        let result = if path == RenderPath::StringReturn {
            " result(string)"
        } else {
            ""
        };

        let mut out = format!("{}({}){}\n", head, comma_list(arg_names), result);
        out.push_str("    implicit none\n");
        for line in declarations {
            out.push_str(&format!("    {}\n", line));
        }
        out.push('\n');
        for line in body {
            out.push_str(&format!("    {}\n", line));
        }
        out.push_str(tail);
        out.push('\n');
        Ok(out)
    }

    fn preamble(&self) -> String {
        let mut out = String::new();
        out.push_str("use iso_c_binding\nuse chemfiles_strings\nimplicit none\n\n");
        out.push_str(&format!(
            "integer, parameter :: {} = {}\n",
            STRING_LENGTH_PARAMETER, self.config.string_length
        ));

        out.push_str("\n! === Manually translated from the header\n");
        for name in &self.config.structs {
            match manual_struct(name) {
                Some(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
                None => tracing::warn!("no Fortran definition for struct {}", name),
            }
        }
        out.push_str("! === End of manual type definition\n");

        for handle in &self.config.handles {
            out.push_str(&format!(
                "\ntype {}\n    type(c_ptr) :: ptr = c_null_ptr\nend type\n",
                handle_type(handle)
            ));
        }
        out
    }
}

impl Generator for FortranGenerator<'_> {
    fn language(&self) -> Language {
        Language::Fortran
    }

    fn render_enum(&self, enumeration: &Enum) -> BindResult<String> {
        let mut out = format!("! enum {}\nenum, bind(C)\n", enumeration.name);
        for (name, value) in enumeration.resolved() {
            out.push_str(&format!("    enumerator :: {} = {}\n", name, value));
        }
        out.push_str("end enum\n");
        Ok(out)
    }

    fn render_function(&self, function: &Function) -> BindResult<String> {
        let path = RenderPath::classify(function, &self.config.fortran.string_functions)?;
        self.render_wrapper(function, path)
    }

    fn generate(&self, bindings: &Bindings) -> BindResult<String> {
        let module = &self.config.fortran.module;
        let mut interfaces = Vec::new();
        let mut wrappers = Vec::new();

        for emitted in selected(&bindings.functions, &self.config.fortran.target) {
            match emitted {
                Emitted::Generated(function) => {
                    interfaces.push(self.render_interface(function)?);
                    wrappers.push(self.render_function(function)?);
                }
                Emitted::Override(_, text) => wrappers.push(block(text)),
            }
        }

        let mut body = self.preamble();
        for enumeration in &bindings.enums {
            body.push('\n');
            body.push_str(&self.render_enum(enumeration)?);
        }
        body.push_str("\ninterface\n");
        body.push_str(&indent(&interfaces.join("\n"), 4));
        body.push_str("end interface\n");

        let mut out = banner("!", "Fortran");
        out.push_str(&format!("module {}\n", module));
        out.push_str(&indent(&body, 4));
        out.push_str("\ncontains\n");
        out.push_str(&indent(&wrappers.join("\n"), 4));
        out.push_str(&format!("end module {}\n", module));

        Ok(wrap_lines(&out))
    }
}

/// Continue statements longer than [`MAX_LINE`] columns with `&`.
fn wrap_lines(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.len() <= MAX_LINE || line.trim_start().starts_with('!') {
                line.to_string()
            } else {
                wrap_line(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

fn wrap_line(line: &str) -> String {
    let indent = line.len() - line.trim_start().len();
    let continuation = " ".repeat(indent + 4);

    let mut out = String::new();
    let mut current = String::new();
    for piece in line.split_inclusive(", ") {
        if !current.trim().is_empty() && current.len() + piece.len() > MAX_LINE - 2 {
            out.push_str(current.trim_end());
            out.push_str(" &\n");
            current = continuation.clone();
        }
        current.push_str(piece);
    }
    out.push_str(&current);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::ast::Coord;
    use crate::test_support::chemfiles_bindings;

    fn generate_with(config: &Config) -> String {
        let bindings = chemfiles_bindings();
        FortranGenerator::new(config, &bindings.enums)
            .generate(&bindings)
            .unwrap()
    }

    fn generate() -> String {
        generate_with(&Config::default())
    }

    fn function(bindings: &Bindings, name: &str) -> Function {
        bindings
            .functions
            .iter()
            .find(|f| f.name == name)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_fortran_type_tokens() {
        let mapper = FortranMapper::new(KnownNames::default());
        let double = CType::Scalar("double".into());

        assert_eq!(
            mapper.map(&double).unwrap(),
            MappedType::split("real(kind=c_double), value", "real(kind=c_double)")
        );
        assert_eq!(
            mapper
                .map(&CType::Pointer(Box::new(CType::OpaqueHandle("CHFL_ATOM".into()))))
                .unwrap(),
            MappedType::split("type(c_ptr), value", "class(chfl_atom)")
        );
        assert_eq!(
            mapper.map(&CType::Array(Box::new(double.clone()), 3)).unwrap(),
            MappedType::split("type(c_ptr), value", "real(kind=c_double), dimension(3), target")
        );
        assert_eq!(
            mapper.map(&CType::Scalar("uint8_t".into())).unwrap().declared,
            "integer(kind=c_int8_t)"
        );
        assert_eq!(
            mapper.map(&CType::Pointer(Box::new(double))).unwrap().call,
            "real(kind=c_double)"
        );
        assert_eq!(mapper.map_return(&CType::Scalar("void".into())).unwrap().call, "");
        assert!(mapper.map(&CType::OpaqueHandle("CHFL_ATOM".into())).is_err());
    }

    #[test]
    fn test_fortran_module_layout() {
        let out = generate();
        assert!(out.contains("module chemfiles_ffi\n    use iso_c_binding\n"));
        assert!(out.contains("    integer, parameter :: CHFL_STRING_LENGTH = 1024\n"));
        assert!(out.contains("    type chfl_atom\n        type(c_ptr) :: ptr = c_null_ptr\n    end type\n"));
        assert!(out.contains("    type, bind(C) :: chfl_match\n"));
        assert!(out.contains(
            "    ! enum chfl_status\n    enum, bind(C)\n        enumerator :: CHFL_SUCCESS = 0\n"
        ));
        assert!(out.contains("        enumerator :: CHFL_CXX_ERROR = 255\n"));
        assert!(out.ends_with("end module chemfiles_ffi\n"));

        let interface = out.find("    interface\n").unwrap();
        let contains = out.find("\ncontains\n").unwrap();
        assert!(interface < contains);
    }

    #[test]
    fn test_fortran_interfaces() {
        let out = generate();
        assert!(out.contains(
            "        ! Function \"chfl_atom_mass\", at chemfiles.h:60\n        function c_chfl_atom_mass(this, mass) bind(C, name=\"chfl_atom_mass\")\n            import\n            implicit none\n            integer(kind=c_int) :: c_chfl_atom_mass\n            type(c_ptr), value :: this\n            real(kind=c_double) :: mass\n        end function\n"
        ));
        // Constructors are declared with their C arguments only
        assert!(out.contains(
            "        function c_chfl_atom(name) bind(C, name=\"chfl_atom\")\n            import\n            implicit none\n            type(c_ptr) :: c_chfl_atom\n"
        ));
    }

    #[test]
    fn test_fortran_ordinary_wrapper() {
        let out = generate();
        assert!(out.contains(
            "    subroutine chfl_atom_mass(this, mass, status)\n        implicit none\n        class(chfl_atom) :: this\n        real(kind=c_double) :: mass\n        integer, optional :: status\n        integer :: status_tmp_\n\n        status_tmp_ = c_chfl_atom_mass(this%ptr, mass)\n        if (present(status)) then\n            status = status_tmp_\n        end if\n    end subroutine\n"
        ));
        assert!(out.contains("        status_tmp_ = c_chfl_cell_lengths(this%ptr, c_loc(lengths))\n"));
        assert!(out.contains("        status_tmp_ = c_chfl_atom_set_name(this%ptr, f_to_c_str(name))\n"));
        assert!(out.contains("        status_tmp_ = c_chfl_frame_set_cell(this%ptr, cell%ptr)\n"));
    }

    #[test]
    fn test_fortran_output_string_uses_buffer() {
        let out = generate();
        assert!(out.contains(
            "        character(len=1, kind=c_char), dimension(CHFL_STRING_LENGTH) :: name_buf_\n"
        ));
        assert!(out.contains(
            "        status_tmp_ = c_chfl_atom_name(this%ptr, name_buf_, buffsize)\n        name = c_buf_to_f_str(name_buf_)\n        if (present(status)) then\n"
        ));
    }

    #[test]
    fn test_fortran_constructor_wrapper() {
        let out = generate();
        assert!(out.contains(
            "    subroutine chfl_atom_init_(this, name)\n        implicit none\n        class(chfl_atom) :: this\n        character(len=*), intent(in) :: name\n\n        this%ptr = c_chfl_atom(f_to_c_str(name))\n    end subroutine\n"
        ));
        assert!(out.contains("        this%ptr = c_chfl_frame()\n"));
        assert!(out.contains("        this%ptr = c_chfl_atom_copy(atom%ptr)\n"));
        assert!(out.contains("        this%ptr = c_chfl_trajectory_open(f_to_c_str(path), mode)\n"));
    }

    #[test]
    fn test_fortran_string_function() {
        let out = generate();
        assert!(out.contains(
            "    function chfl_version() result(string)\n        implicit none\n        character(len=CHFL_STRING_LENGTH) :: string\n        type(c_ptr) :: c_string\n\n        c_string = c_chfl_version()\n        string = c_to_f_str(c_string)\n    end function\n"
        ));
    }

    #[test]
    fn test_non_status_ordinary_is_malformed() {
        let config = Config::default();
        let bindings = chemfiles_bindings();
        let generator = FortranGenerator::new(&config, &bindings.enums);

        let mut free = function(&bindings, "chfl_free");
        free.rettype = CType::Scalar("double".into());
        let err = generator.render_function(&free).unwrap_err();
        assert!(matches!(err, BindgenError::MalformedDeclaration { .. }));
        assert!(err.to_string().contains("instead of a status code"));
    }

    #[test]
    fn test_string_function_must_return_string() {
        let mut config = Config::default();
        config.fortran.string_functions.push("chfl_clear_errors".into());
        let bindings = chemfiles_bindings();
        let generator = FortranGenerator::new(&config, &bindings.enums);

        let err = generator
            .render_function(&function(&bindings, "chfl_clear_errors"))
            .unwrap_err();
        assert!(matches!(err, BindgenError::MalformedDeclaration { .. }));
    }

    #[test]
    fn test_lines_are_wrapped() {
        let out = generate();
        for line in out.lines().filter(|l| !l.trim_start().starts_with('!')) {
            assert!(line.len() <= MAX_LINE, "line too long: {}", line);
        }

        let wrapped = wrap_line(&format!(
            "    call something({})",
            (0..30).map(|i| format!("argument_{}", i)).collect::<Vec<_>>().join(", ")
        ));
        let lines: Vec<&str> = wrapped.lines().collect();
        assert!(lines.len() > 1);
        assert!(lines[0].ends_with(", &"));
        assert!(lines[1].starts_with("        argument_"));
    }

    #[test]
    fn test_unmappable_argument_names_function() {
        let config = Config::default();
        let generator = FortranGenerator::new(&config, &[]);
        let function = Function::new(
            "chfl_weird",
            CType::Scalar("chfl_status".into()),
            Coord::new("chemfiles.h", 7),
        )
        .with_arg(Argument::new(
            "handles",
            CType::Array(
                Box::new(CType::Pointer(Box::new(CType::OpaqueHandle("CHFL_ATOM".into())))),
                2,
            ),
        ));

        match generator.render_function(&function).unwrap_err() {
            BindgenError::TypeMapping {
                function, target, ..
            } => {
                assert_eq!(function, "chfl_weird");
                assert_eq!(target, Language::Fortran);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_argument_clashing_with_wrapper_names_is_malformed() {
        let config = Config::default();
        let bindings = chemfiles_bindings();
        let generator = FortranGenerator::new(&config, &bindings.enums);
        let status = CType::Scalar("chfl_status".into());

        let clashes = [
            Function::new("chfl_foo", status.clone(), Coord::new("chemfiles.h", 3)).with_arg(
                Argument::new("status", CType::Pointer(Box::new(status.clone()))),
            ),
            Function::new("chfl_foo", status.clone(), Coord::new("chemfiles.h", 3))
                .with_arg(Argument::new("Status_Tmp_", CType::Scalar("int".into()))),
            Function::new("chfl_foo", status.clone(), Coord::new("chemfiles.h", 3))
                .with_arg(Argument::new(
                    "name",
                    CType::String {
                        is_const: false,
                        fixed_length: None,
                    },
                ))
                .with_arg(Argument::new("name_buf_", CType::Scalar("uint64_t".into()))),
            Function::new("chfl_foo", status.clone(), Coord::new("chemfiles.h", 3))
                .with_arg(Argument::new("mass", CType::Scalar("double".into())))
                .with_arg(Argument::new("MASS", CType::Scalar("double".into()))),
            Function::new(
                "chfl_foo",
                CType::String {
                    is_const: true,
                    fixed_length: None,
                },
                Coord::new("chemfiles.h", 3),
            )
            .with_arg(Argument::new("string", CType::Scalar("int".into()))),
        ];

        for function in &clashes {
            let err = generator.render_function(function).unwrap_err();
            assert!(matches!(err, BindgenError::MalformedDeclaration { .. }));
            assert!(err.to_string().contains("clashes with"), "{}", err);
        }
    }

    #[test]
    fn test_every_ordinary_wrapper_adds_optional_status() {
        let config = Config::default();
        let bindings = chemfiles_bindings();
        let generator = FortranGenerator::new(&config, &bindings.enums);

        let mut checked = 0;
        for function in &bindings.functions {
            let path = RenderPath::classify(function, &config.fortran.string_functions).unwrap();
            if path != RenderPath::Ordinary {
                continue;
            }
            let out = generator.render_function(function).unwrap();
            let head = out.lines().next().unwrap();
            let params = head
                .split_once('(')
                .and_then(|(_, rest)| rest.strip_suffix(')'))
                .unwrap();
            let params: Vec<&str> = params.split(", ").filter(|p| !p.is_empty()).collect();

            assert_eq!(params.len(), function.args.len() + 1, "{}", head);
            assert_eq!(params.last(), Some(&"status"), "{}", head);
            assert!(out.contains("    integer, optional :: status\n"));
            checked += 1;
        }
        assert!(checked > 5);
    }

    #[test]
    fn test_override_replaces_interface_and_wrapper() {
        let mut config = Config::default();
        config
            .fortran
            .target
            .overrides
            .insert("chfl_free".into(), "! chfl_free is written by hand\n".into());
        let out = generate_with(&config);
        assert!(out.contains("    ! chfl_free is written by hand\n"));
        assert!(!out.contains("c_chfl_free"));
    }
}
