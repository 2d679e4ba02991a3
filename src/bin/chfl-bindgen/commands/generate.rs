//! `chfl-bindgen generate` command

use anyhow::Result;
use chfl_bindgen::ops::{generate, GenerateOptions};

use crate::cli::GenerateArgs;

pub fn execute(args: GenerateArgs) -> Result<()> {
    let options = GenerateOptions::from(args);
    let written = generate(&options)?;

    println!(
        "Generated {} binding file{} from {}",
        written.len(),
        if written.len() == 1 { "" } else { "s" },
        options.header.display()
    );
    for path in &written {
        println!("  {}", path.display());
    }
    Ok(())
}
