//! CLI definitions using clap.

use std::path::PathBuf;

use chfl_bindgen::Language;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// chfl-bindgen - generate Python, Julia and Fortran bindings for the chemfiles C API
#[derive(Parser)]
#[command(name = "chfl-bindgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate bindings from a C header
    Generate(GenerateArgs),

    /// Check that generated bindings are up to date
    Check(GenerateArgs),

    /// Print the extracted functions and enums as JSON
    Dump(DumpArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// C header to read
    pub header: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Target language (repeatable, defaults to all)
    #[arg(short, long = "lang", value_name = "LANG")]
    pub languages: Vec<Language>,

    /// Configuration file (defaults to chfl-bindgen.toml next to the header)
    #[arg(short, long, env = "CHFL_BINDGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct DumpArgs {
    /// C header to read
    pub header: PathBuf,

    /// Configuration file (defaults to chfl-bindgen.toml next to the header)
    #[arg(short, long, env = "CHFL_BINDGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
