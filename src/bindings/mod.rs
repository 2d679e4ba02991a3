//! FFI binding generation for the chemfiles C API.
//!
//! The pipeline is linear: the header front-end produces [`Decl`] nodes,
//! [`extract`] turns them into the language-neutral model, [`normalize`]
//! injects constructor receivers, and one [`Generator`] per target
//! renders the model into source text.

pub mod ast;
pub mod errors;
pub mod extract;
pub mod mapper;
pub mod parser;
pub mod render;
pub mod targets;
pub mod types;

pub use ast::{Coord, Decl, EnumDecl, FunctionDecl, ParamDecl, RawType, TypedefDecl};
pub use errors::{BindResult, BindgenError};
pub use extract::{extract, normalize};
pub use mapper::{KnownNames, MappedType, TypeMapper, Unmapped};
pub use parser::HeaderParser;
pub use render::{Generator, RenderPath};
pub use targets::{generator_for, target_config};
pub use types::{Argument, Bindings, CType, Enum, Enumerator, Function, TypeContext};
