//! Declaration extraction and normalization.
//!
//! [`extract`] walks the declaration nodes once and builds the functions
//! and enums every target renders from. [`normalize`] then rewrites the
//! function list for receiver-style wrappers; it returns new entities and
//! refuses input it has already processed.

use std::collections::BTreeSet;

use regex::RegexSet;

use super::ast::{Decl, EnumDecl, FunctionDecl, TypedefDecl};
use super::errors::{BindResult, BindgenError};
use super::types::{Argument, Bindings, CType, Enum, Enumerator, Function, TypeContext};
use crate::util::config::Config;

/// Build functions and enums from declaration nodes, in header order.
pub fn extract<I>(decls: I, config: &Config) -> BindResult<Bindings>
where
    I: IntoIterator<Item = Decl>,
{
    let constructors = config.constructor_matcher()?;
    let mut ctx = TypeContext {
        handles: config.handles.iter().cloned().collect(),
        structs: config.structs.iter().cloned().collect(),
        ..Default::default()
    };
    let mut bindings = Bindings::default();

    for decl in decls {
        match decl {
            Decl::Enum(decl) => {
                let e = extract_enum(decl, config, &mut ctx)?;
                tracing::debug!("enum {} ({} values)", e.name, e.enumerators.len());
                bindings.enums.push(e);
            }
            Decl::Typedef(decl) => extract_typedef(decl, &mut ctx)?,
            Decl::Function(decl) => {
                let function = extract_function(decl, &ctx, &constructors)?;
                tracing::debug!(
                    "function {}{}",
                    function.name,
                    if function.is_constructor { " (constructor)" } else { "" }
                );
                bindings.functions.push(function);
            }
        }
    }

    Ok(bindings)
}

fn extract_enum(decl: EnumDecl, config: &Config, ctx: &mut TypeContext) -> BindResult<Enum> {
    let Some((first, _)) = decl.enumerators.first() else {
        return Err(BindgenError::malformed(
            decl.tag.unwrap_or_else(|| "<anonymous enum>".into()),
            &decl.coord,
            "enum has no enumerators",
        ));
    };

    let name = config
        .enum_names
        .get(first)
        .cloned()
        .ok_or_else(|| BindgenError::UnknownEnum {
            identifier: first.clone(),
            coord: decl.coord.clone(),
        })?;

    let mut enumerators = Vec::with_capacity(decl.enumerators.len());
    // Implicit value of the next enumerator, `None` once it would overflow
    let mut next = Some(0i64);
    for (enumerator, literal) in &decl.enumerators {
        let value = match literal {
            Some(text) => Some(parse_literal(text).ok_or_else(|| {
                BindgenError::malformed(
                    enumerator,
                    &decl.coord,
                    format!("`{}` is not an integer literal", text),
                )
            })?),
            None => None,
        };
        let resolved = value.or(next).ok_or_else(|| {
            BindgenError::malformed(
                enumerator,
                &decl.coord,
                "implicit enumerator value overflows a 64-bit integer",
            )
        })?;
        next = resolved.checked_add(1);
        enumerators.push(Enumerator::new(enumerator, value));
    }

    ctx.enums.insert(name.clone());
    // Prototypes may still spell the enum by its C tag
    if let Some(tag) = decl.tag.filter(|tag| *tag != name) {
        ctx.typedefs.insert(tag, CType::Scalar(name.clone()));
    }

    Ok(Enum {
        name,
        enumerators,
        coord: decl.coord,
    })
}

/// Integer literal as written in an enum body: decimal or hex, optional
/// sign and `u`/`l` suffixes.
fn parse_literal(text: &str) -> Option<i64> {
    let text = text.trim().trim_end_matches(['u', 'U', 'l', 'L']);
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, text.strip_prefix('+').unwrap_or(text).trim()),
    };

    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse().ok()?
    };

    Some(if negative { -value } else { value })
}

fn extract_typedef(decl: TypedefDecl, ctx: &mut TypeContext) -> BindResult<()> {
    let ty = CType::from_raw(&decl.ty, ctx).ok_or_else(|| BindgenError::UnknownType {
        ctype: decl.ty.to_string(),
        declaration: decl.name.clone(),
        coord: decl.coord.clone(),
    })?;

    tracing::debug!("typedef {} = {}", decl.name, ty);
    ctx.typedefs.insert(decl.name, ty);
    Ok(())
}

fn extract_function(
    decl: FunctionDecl,
    ctx: &TypeContext,
    constructors: &RegexSet,
) -> BindResult<Function> {
    if decl.name.is_empty() {
        return Err(BindgenError::malformed("<unnamed>", &decl.coord, "function has no name"));
    }

    let resolve = |raw: &super::ast::RawType| {
        CType::from_raw(raw, ctx).ok_or_else(|| BindgenError::UnknownType {
            ctype: raw.to_string(),
            declaration: decl.name.clone(),
            coord: decl.coord.clone(),
        })
    };

    let rettype = resolve(&decl.return_type)?;
    let mut function = Function::new(decl.name.clone(), rettype, decl.coord.clone());

    let mut seen = BTreeSet::new();
    for (i, param) in decl.params.iter().enumerate() {
        // Prototypes may omit parameter names, but every target needs one
        let name = if param.name.is_empty() {
            tracing::debug!("{}: naming parameter {} `arg{}`", decl.name, i + 1, i + 1);
            format!("arg{}", i + 1)
        } else {
            param.name.clone()
        };
        if !seen.insert(name.clone()) {
            return Err(BindgenError::malformed(
                &decl.name,
                &decl.coord,
                format!("parameter `{}` declared twice", name),
            ));
        }
        function.args.push(Argument::new(&name, resolve(&param.ty)?));
    }

    if constructors.is_match(&decl.name) {
        if function.rettype.handle_name().is_none() {
            return Err(BindgenError::malformed(
                &decl.name,
                &decl.coord,
                format!(
                    "constructor returns `{}` instead of an opaque handle",
                    function.rettype
                ),
            ));
        }
        function.is_constructor = true;
    }

    Ok(function)
}

/// Prepare functions for receiver-style wrappers.
///
/// Constructors get a receiver argument of their handle type prepended and
/// an `_init_` emission name. Other functions taking a handle first have
/// that argument renamed to the receiver name, type and position unchanged.
pub fn normalize(functions: &[Function], config: &Config) -> BindResult<Vec<Function>> {
    let receiver = config.receiver_name.as_str();

    functions
        .iter()
        .map(|function| {
            if function.normalized {
                return Err(BindgenError::AlreadyNormalized {
                    name: function.name.clone(),
                });
            }

            let mut function = function.clone();
            if function.args.iter().skip(1).any(|arg| arg.name == receiver) {
                return Err(BindgenError::malformed(
                    &function.name,
                    &function.coord,
                    format!("an argument is already called `{}`", receiver),
                ));
            }

            if function.is_constructor {
                let handle = match function.rettype.handle_name() {
                    Some(handle) => handle.to_string(),
                    None => {
                        return Err(BindgenError::malformed(
                            &function.name,
                            &function.coord,
                            "constructor without a handle to store",
                        ))
                    }
                };
                if function.args.first().is_some_and(|arg| arg.name == receiver) {
                    return Err(BindgenError::malformed(
                        &function.name,
                        &function.coord,
                        format!("an argument is already called `{}`", receiver),
                    ));
                }

                let this = CType::Pointer(Box::new(CType::OpaqueHandle(handle)));
                function.args.insert(0, Argument::new(receiver, this));
                function.fname = format!("{}_init_", function.name);
            } else if let Some(first) = function.args.first_mut() {
                if first.ctype.handle_name().is_some() {
                    first.name = receiver.to_string();
                }
            }

            function.normalized = true;
            Ok(function)
        })
        .collect()
}
