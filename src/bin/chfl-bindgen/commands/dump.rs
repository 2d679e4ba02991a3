//! `chfl-bindgen dump` command

use anyhow::Result;
use chfl_bindgen::ops::{dump, GenerateOptions};

use crate::cli::DumpArgs;

pub fn execute(args: DumpArgs) -> Result<()> {
    let options = GenerateOptions::new(args.header).with_config(args.config);
    println!("{}", dump(&options)?);
    Ok(())
}
