//! Generator configuration.
//!
//! Everything the generator knows about the wrapped library lives here:
//! handle names, the enum naming table, constructor patterns and the
//! per-target exceptions. Defaults describe the chemfiles C API; a
//! `chfl-bindgen.toml` file can override any of it.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::bindings::{BindResult, BindgenError};

/// Name of the configuration file looked up next to the header.
pub const CONFIG_FILE_NAME: &str = "chfl-bindgen.toml";

/// Binding generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capacity of the buffers used for output strings
    pub string_length: usize,

    /// Name given to the receiver argument of handle methods
    pub receiver_name: String,

    /// Opaque handle type names
    pub handles: Vec<String>,

    /// Structs translated by hand in every target
    pub structs: Vec<String>,

    /// Return types carrying a status code
    pub status_types: Vec<String>,

    /// Regexes over the C name marking a function as a constructor
    pub constructor_patterns: Vec<String>,

    /// Macros removed from declarations before parsing
    pub export_macros: Vec<String>,

    /// First enumerator -> canonical enum name
    pub enum_names: BTreeMap<String, String>,

    /// Python (ctypes) output
    pub python: TargetConfig,

    /// Julia output
    pub julia: TargetConfig,

    /// Fortran output
    pub fortran: FortranConfig,
}

/// Settings shared by every target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Output file name, relative to the output directory
    pub output: String,

    /// Function name -> declaration text emitted instead of the generated one
    pub overrides: BTreeMap<String, String>,

    /// Functions left out of this target
    pub skip: Vec<String>,
}

impl TargetConfig {
    fn with_output(output: &str) -> Self {
        TargetConfig {
            output: output.to_string(),
            ..Default::default()
        }
    }

    /// Hand-written declaration for `name`, if any.
    pub fn override_for(&self, name: &str) -> Option<&str> {
        self.overrides.get(name).map(String::as_str)
    }

    pub fn skips(&self, name: &str) -> bool {
        self.skip.iter().any(|s| s == name)
    }
}

/// Fortran-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FortranConfig {
    #[serde(flatten)]
    pub target: TargetConfig,

    /// Name of the generated module
    pub module: String,

    /// Functions rendered as string-valued functions
    pub string_functions: Vec<String>,
}

impl Default for FortranConfig {
    fn default() -> Self {
        FortranConfig {
            target: TargetConfig::with_output("ffi.f90"),
            module: "chemfiles_ffi".to_string(),
            string_functions: strings(&["chfl_version", "chfl_last_error"]),
        }
    }
}

const MEMORY_BUFFER_JL: &str = r#"# Function 'chfl_trajectory_memory_buffer' (manual translation)
function chfl_trajectory_memory_buffer(trajectory::Ptr{CHFL_TRAJECTORY}, data::Ref{Ptr{UInt8}}, size::Ref{UInt64})
    ccall((:chfl_trajectory_memory_buffer, libchemfiles), chfl_status, (Ptr{CHFL_TRAJECTORY}, Ref{Ptr{UInt8}}, Ref{UInt64}), trajectory, data, size)
end
"#;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        let enum_names = [
            ("CHFL_SUCCESS", "chfl_status"),
            ("CHFL_CELL_ORTHORHOMBIC", "chfl_cellshape"),
            ("CHFL_PROPERTY_BOOL", "chfl_property_kind"),
            ("CHFL_BOND_UNKNOWN", "chfl_bond_order"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let mut julia = TargetConfig::with_output("ffi.jl");
        julia.overrides.insert(
            "chfl_trajectory_memory_buffer".to_string(),
            MEMORY_BUFFER_JL.to_string(),
        );

        Config {
            string_length: 1024,
            receiver_name: "this".to_string(),
            handles: strings(&[
                "CHFL_TRAJECTORY",
                "CHFL_CELL",
                "CHFL_ATOM",
                "CHFL_FRAME",
                "CHFL_TOPOLOGY",
                "CHFL_SELECTION",
                "CHFL_RESIDUE",
                "CHFL_PROPERTY",
            ]),
            structs: strings(&["chfl_match", "chfl_format_metadata"]),
            status_types: strings(&["chfl_status"]),
            constructor_patterns: strings(&[
                r"^chfl_(atom|cell|frame|residue|selection|topology)$",
                r"^chfl_property_(bool|double|string|vector3d)$",
                r"_(new|copy|open|with_format|with_id|for_atom)$",
                r"_memory_(reader|writer)$",
                r"_from_\w+$",
            ]),
            export_macros: strings(&["CHFL_EXPORT"]),
            enum_names,
            python: TargetConfig::with_output("ffi.py"),
            julia,
            fortran: FortranConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load the configuration sitting next to a header, if there is one.
    pub fn for_header(header: &Path) -> Result<Self> {
        let candidate = header
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(CONFIG_FILE_NAME);

        if candidate.exists() {
            tracing::debug!("using config {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Check the configuration for values that cannot work.
    pub fn validate(&self) -> BindResult<()> {
        if self.string_length == 0 {
            return Err(BindgenError::InvalidConfig {
                reason: "string_length must be positive".into(),
            });
        }
        if self.receiver_name.trim().is_empty() {
            return Err(BindgenError::InvalidConfig {
                reason: "receiver_name is empty".into(),
            });
        }
        if let Some(bad) = self.handles.iter().find(|h| h.trim().is_empty()) {
            return Err(BindgenError::InvalidConfig {
                reason: format!("empty handle name {:?}", bad),
            });
        }
        self.constructor_matcher()?;
        Ok(())
    }

    /// Compile the constructor patterns.
    pub fn constructor_matcher(&self) -> BindResult<RegexSet> {
        RegexSet::new(&self.constructor_patterns).map_err(|e| BindgenError::InvalidConfig {
            reason: format!("bad constructor pattern: {}", e),
        })
    }
}
