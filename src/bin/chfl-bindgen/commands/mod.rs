//! Command implementations

pub mod check;
pub mod completions;
pub mod dump;
pub mod generate;

use chfl_bindgen::ops::GenerateOptions;

use crate::cli::GenerateArgs;

impl From<GenerateArgs> for GenerateOptions {
    fn from(args: GenerateArgs) -> Self {
        GenerateOptions::new(args.header)
            .with_output_dir(args.output)
            .with_languages(args.languages)
            .with_config(args.config)
    }
}
