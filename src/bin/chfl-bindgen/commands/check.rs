//! `chfl-bindgen check` command
//!
//! Exits with an error when any generated file differs from what
//! `generate` would write, which makes it usable in CI.

use anyhow::{bail, Result};
use chfl_bindgen::ops::{check, format_check_report, GenerateOptions};
use chfl_bindgen::util::diagnostic::suggestions;

use crate::cli::GenerateArgs;

pub fn execute(args: GenerateArgs) -> Result<()> {
    let options = GenerateOptions::from(args);
    let report = check(&options)?;

    print!("{}", format_check_report(&report));

    if !report.is_clean() {
        let count = report.outdated().count();
        bail!(
            "{} binding file{} out of date\n{}",
            count,
            if count == 1 { " is" } else { "s are" },
            suggestions::STALE_OUTPUT
        );
    }

    println!("All bindings are up to date");
    Ok(())
}
