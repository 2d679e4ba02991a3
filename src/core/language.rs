//! Target languages for binding generation.

use serde::{Deserialize, Serialize};

/// Supported binding target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python ctypes declarations
    #[serde(alias = "py")]
    Python,

    /// Julia `ccall` wrappers
    #[serde(alias = "jl")]
    Julia,

    /// Fortran `iso_c_binding` interface and wrappers
    #[serde(alias = "f90", alias = "f03")]
    Fortran,
}

impl Language {
    /// Every target, in generation order.
    pub const ALL: [Language; 3] = [Language::Python, Language::Julia, Language::Fortran];

    /// Output file used when the configuration does not name one.
    pub fn default_output(&self) -> &'static str {
        match self {
            Language::Python => "ffi.py",
            Language::Julia => "ffi.jl",
            Language::Fortran => "ffi.f90",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Julia => write!(f, "julia"),
            Language::Fortran => write!(f, "fortran"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "julia" | "jl" => Ok(Language::Julia),
            "fortran" | "f90" | "f03" => Ok(Language::Fortran),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid language string.
#[derive(Debug, Clone)]
pub struct LanguageParseError(pub String);

impl std::fmt::Display for LanguageParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid language '{}', valid values: python, julia, fortran",
            self.0
        )
    }
}

impl std::error::Error for LanguageParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("py".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("Julia".parse::<Language>().unwrap(), Language::Julia);
        assert_eq!("f90".parse::<Language>().unwrap(), Language::Fortran);

        let err = "cobol".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("valid values"));
    }

    #[test]
    fn test_language_display_roundtrip() {
        for lang in Language::ALL {
            assert_eq!(lang.to_string().parse::<Language>().unwrap(), lang);
        }
    }
}
