//! Test fixtures shared by the unit tests.

use std::path::Path;

use crate::bindings::{extract, normalize, Bindings, HeaderParser};
use crate::util::config::Config;

/// A reduced chemfiles header covering every declaration shape the
/// generator supports.
pub const CHEMFILES_HEADER: &str = include_str!("../../tests/data/chemfiles.h");

/// Parse, extract and normalize a header with the default configuration.
pub fn bindings_for(header: &str) -> Bindings {
    let config = Config::default();
    let decls = HeaderParser::new()
        .with_export_macros(config.export_macros.clone())
        .parse_content(header, Path::new("chemfiles.h"))
        .unwrap();
    let extracted = extract(decls, &config).unwrap();
    Bindings {
        functions: normalize(&extracted.functions, &config).unwrap(),
        enums: extracted.enums,
    }
}

/// [`bindings_for`] applied to [`CHEMFILES_HEADER`].
pub fn chemfiles_bindings() -> Bindings {
    bindings_for(CHEMFILES_HEADER)
}
