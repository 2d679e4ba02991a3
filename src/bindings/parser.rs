//! C header front-end.
//!
//! A pragmatic regex parser producing [`Decl`] nodes for prototypes, enums
//! and typedefs. It covers the declarations a flat C API header uses and
//! nothing more; anything it does not recognise is left out rather than
//! guessed at.

use std::path::Path;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use super::ast::{Coord, Decl, EnumDecl, FunctionDecl, ParamDecl, RawType, TypedefDecl};

/// Words that can only be part of a type, never a parameter name.
const TYPE_KEYWORDS: &[&str] = &[
    "const", "volatile", "signed", "unsigned", "short", "long", "int", "char", "float",
    "double", "void", "bool", "_Bool", "struct", "enum",
];

/// Parser for C header files.
#[derive(Debug, Clone, Default)]
pub struct HeaderParser {
    /// Macros removed before parsing (e.g. `CHFL_EXPORT`)
    export_macros: Vec<String>,
}

impl HeaderParser {
    /// Create a new header parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set macros to strip from declarations.
    pub fn with_export_macros(mut self, macros: Vec<String>) -> Self {
        self.export_macros = macros;
        self
    }

    /// Parse a header file.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Decl>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read header: {}", path.display()))?;

        self.parse_content(&content, path)
            .with_context(|| format!("failed to parse header: {}", path.display()))
    }

    /// Parse header content into declarations, in source order.
    pub fn parse_content(&self, content: &str, path: &Path) -> Result<Vec<Decl>> {
        let preprocessed = self.preprocess(content)?;
        let lines = LineIndex::new(&preprocessed);

        let mut decls = Vec::new();
        decls.extend(self.parse_enums(&preprocessed, path, &lines)?);
        decls.extend(self.parse_typedefs(&preprocessed, path, &lines)?);
        decls.extend(self.parse_functions(&preprocessed, path, &lines)?);

        decls.sort_by_key(|(offset, _)| *offset);
        tracing::debug!("parsed {} declarations from {}", decls.len(), path.display());

        Ok(decls.into_iter().map(|(_, decl)| decl).collect())
    }

    /// Strip comments, preprocessor lines, `extern "C"` and export macros.
    ///
    /// Newlines are kept so offsets still map to header lines.
    fn preprocess(&self, content: &str) -> Result<String> {
        let re_block = Regex::new(r"/\*[\s\S]*?\*/")?;
        let content = re_block.replace_all(content, keep_newlines);

        let re_line = Regex::new(r"//[^\n]*")?;
        let content = re_line.replace_all(&content, "");

        // Directives, including backslash continuations
        let re_pp = Regex::new(r"(?m)^[ \t]*#(?:[^\n]*\\\n)*[^\n]*")?;
        let content = re_pp.replace_all(&content, keep_newlines);

        let re_extern = Regex::new(r#"extern\s*"C"\s*\{"#)?;
        let mut content = re_extern.replace_all(&content, " ").into_owned();

        for name in &self.export_macros {
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(name)))?;
            content = re.replace_all(&content, " ").into_owned();
        }

        Ok(content)
    }

    /// Parse function prototypes.
    fn parse_functions(
        &self,
        content: &str,
        path: &Path,
        lines: &LineIndex,
    ) -> Result<Vec<(usize, Decl)>> {
        let mut functions = Vec::new();

        // return_type name(params);
        let re = Regex::new(r"([\w\s*]*?[\w*])\s*\b(\w+)\s*\(([^()]*)\)\s*;")?;

        for cap in re.captures_iter(content) {
            let return_str = cap.get(1).map_or("", |m| m.as_str()).trim();
            let Some(name) = cap.get(2) else { continue };
            let params_str = cap.get(3).map_or("", |m| m.as_str()).trim();

            // Skip common false positives
            let first_word = return_str.split_whitespace().next().unwrap_or("");
            if return_str.is_empty() || matches!(first_word, "typedef" | "return") {
                continue;
            }

            let Some((return_type, _)) = split_declarator(return_str, false) else {
                continue;
            };

            let params = self.parse_params(params_str);

            functions.push((
                name.start(),
                Decl::Function(FunctionDecl {
                    name: name.as_str().to_string(),
                    params,
                    return_type,
                    coord: Coord::new(path, lines.line_of(name.start())),
                }),
            ));
        }

        Ok(functions)
    }

    /// Parse function parameters.
    fn parse_params(&self, params_str: &str) -> Vec<ParamDecl> {
        if params_str == "void" || params_str.is_empty() {
            return Vec::new();
        }

        params_str
            .split(',')
            .map(str::trim)
            .map(|param| match split_declarator(param, true) {
                Some((ty, name)) => ParamDecl::new(name.unwrap_or_default(), ty),
                // Keep the slot so arity stays right; the extractor rejects it
                None => ParamDecl::new(String::new(), RawType::named(param)),
            })
            .collect()
    }

    /// Parse enum definitions, named or anonymous.
    fn parse_enums(
        &self,
        content: &str,
        path: &Path,
        lines: &LineIndex,
    ) -> Result<Vec<(usize, Decl)>> {
        let mut enums = Vec::new();

        // enum [tag] { variants } [typedef_name];
        let re = Regex::new(r"(?:typedef\s+)?\b(enum)\s*(\w+)?\s*\{([^}]*)\}\s*(\w+)?\s*;")?;

        for cap in re.captures_iter(content) {
            let Some(keyword) = cap.get(1) else { continue };
            let tag = cap
                .get(4)
                .or_else(|| cap.get(2))
                .map(|m| m.as_str().to_string());
            let body = cap.get(3).map_or("", |m| m.as_str());

            enums.push((
                keyword.start(),
                Decl::Enum(EnumDecl {
                    tag,
                    enumerators: parse_enumerators(body),
                    coord: Coord::new(path, lines.line_of(keyword.start())),
                }),
            ));
        }

        Ok(enums)
    }

    /// Parse scalar, pointer and array typedefs.
    fn parse_typedefs(
        &self,
        content: &str,
        path: &Path,
        lines: &LineIndex,
    ) -> Result<Vec<(usize, Decl)>> {
        let mut typedefs = Vec::new();

        // typedef type name; and typedef type name[N];
        let re = Regex::new(r"\btypedef\s+([\w\s*]+?)\s*\b(\w+)\s*(?:\[\s*(\d+)\s*\])?\s*;")?;

        for cap in re.captures_iter(content) {
            let underlying = cap.get(1).map_or("", |m| m.as_str()).trim();
            let Some(name) = cap.get(2) else { continue };

            // Struct/enum/union typedefs name opaque or manual types
            if ["struct", "enum", "union"]
                .iter()
                .any(|kw| underlying.split_whitespace().next() == Some(*kw))
            {
                continue;
            }

            let Some((mut ty, _)) = split_declarator(underlying, false) else {
                continue;
            };
            if let Some(len) = cap.get(3).and_then(|m| m.as_str().parse().ok()) {
                ty = ty.with_array(len);
            }

            typedefs.push((
                cap.get(0).map_or(0, |m| m.start()),
                Decl::Typedef(TypedefDecl {
                    name: name.as_str().to_string(),
                    ty,
                    coord: Coord::new(path, lines.line_of(name.start())),
                }),
            ));
        }

        Ok(typedefs)
    }
}

/// Split `const CHFL_ATOM* atom` or `double lengths[3]` into type and name.
///
/// With `named == false` the whole text is a type.
fn split_declarator(decl: &str, named: bool) -> Option<(RawType, Option<String>)> {
    let mut decl = decl.trim().to_string();

    // Array declarator: `name[N]`, `name[]` decays to a pointer
    let mut array = None;
    let mut decayed = false;
    if let Some(open) = decl.rfind('[') {
        if decl.ends_with(']') {
            let len = decl[open + 1..decl.len() - 1].trim();
            if len.is_empty() {
                decayed = true;
            } else {
                array = Some(len.parse().ok()?);
            }
            decl.truncate(open);
        }
    }

    let spaced = decl.replace('*', " * ");
    let mut tokens: Vec<&str> = spaced.split_whitespace().collect();

    let name = if named {
        match tokens.last() {
            Some(last)
                if tokens.len() >= 2
                    && is_identifier(last)
                    && !TYPE_KEYWORDS.contains(last) =>
            {
                let name = last.to_string();
                tokens.pop();
                Some(name)
            }
            _ => None,
        }
    } else {
        None
    };

    let mut ty = RawType::named("");
    let mut base = Vec::new();
    for token in tokens {
        match token {
            "*" => ty.pointers += 1,
            "const" => ty.is_const = true,
            "volatile" | "extern" | "static" | "inline" => {}
            word => base.push(word),
        }
    }
    if base.is_empty() {
        return None;
    }
    ty.base = base.join(" ");
    ty.array = array;
    if decayed {
        ty.pointers += 1;
    }

    Some((ty, name))
}

fn keep_newlines(caps: &Captures<'_>) -> String {
    "\n".repeat(caps[0].matches('\n').count())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Parse enum variants, keeping value literals as written.
fn parse_enumerators(body: &str) -> Vec<(String, Option<String>)> {
    body.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once('=') {
            Some((name, value)) => (name.trim().to_string(), Some(value.trim().to_string())),
            None => (item.to_string(), None),
        })
        .collect()
}

/// Byte offset -> 1-based line number.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineIndex { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }
}
