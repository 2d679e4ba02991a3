//! `chfl-bindgen completions` command
//!
//! Prints a completion script for the requested shell on stdout.

use std::io;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionsArgs};

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    let mut stdout = io::stdout().lock();
    generate(args.shell, &mut cmd, name, &mut stdout);

    Ok(())
}
