//! Imports of the generated file.
//!
//! Field types are copied into the bindings verbatim, so every package they
//! name has to be imported again under the name the input uses for it.

use super::variant::TemplateVariant;
use crate::mapping::MappingTable;
use crate::source::{ImportSpec, SourceFile, TokenKind, tokenize};
use crate::template_engine::HEADER_TEMPLATE;
use autobindings_core::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Identifiers of the universe block.
const PREDECLARED: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32",
    "float64", "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr", "true", "false", "iota", "nil", "append", "cap",
    "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max", "min", "new",
    "panic", "print", "println", "real", "recover",
];

/// Identifiers a set of type expressions refers to.
#[derive(Debug, Default)]
struct TypeReferences {
    /// Package names used as `pkg.Name`
    qualifiers: BTreeSet<String>,
    /// Unqualified names that are neither predeclared nor type parameters
    unqualified: BTreeSet<String>,
}

impl TypeReferences {
    fn scan(&mut self, type_text: &str, type_params: &[String]) -> Result<()> {
        let tokens = tokenize(type_text)?;
        let toks: Vec<_> = tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenKind::Comment | TokenKind::Semicolon | TokenKind::Eof))
            .collect();

        for (i, token) in toks.iter().enumerate() {
            if token.kind != TokenKind::Ident {
                continue;
            }
            let previous = i.checked_sub(1).map(|j| toks[j]);
            let next = toks.get(i + 1);

            if next.is_some_and(|n| n.is_op(".")) {
                self.qualifiers.insert(token.text.to_string());
                continue;
            }

            // A field or parameter name is followed by its type.
            let names_something = next.is_some_and(|n| {
                matches!(n.kind, TokenKind::Ident | TokenKind::Keyword)
                    || ["*", "(", "<-", "..."].iter().any(|op| n.is_op(op))
            });
            let selected = previous.is_some_and(|p| p.is_op("."));
            if !(selected
                || names_something
                || PREDECLARED.contains(&token.text)
                || type_params.iter().any(|p| p == token.text))
            {
                self.unqualified.insert(token.text.to_string());
            }
        }
        Ok(())
    }
}

/// Returns the imports the bindings of `file` need.
///
/// These are the packages the template variants use, plus every import of
/// the input whose package name qualifies a mapped field type. Dot imports
/// of the input are kept when a field type names an identifier the input
/// file does not declare. Blank imports are never kept.
///
/// # Errors
///
/// Returns [`Error::RenderError`] if two different packages would be
/// imported under the same name.
pub fn required_imports(
    file: &SourceFile,
    tables: &[MappingTable],
    variants: &[TemplateVariant],
) -> Result<Vec<ImportSpec>> {
    let mut refs = TypeReferences::default();
    for (decl, table) in file.structs.iter().zip(tables) {
        let type_params = decl
            .type_params
            .as_ref()
            .map(|p| p.names.as_slice())
            .unwrap_or_default();
        for mapping in table {
            refs.scan(&mapping.type_text, type_params)?;
        }
    }

    let mut imports: Vec<ImportSpec> = variants
        .iter()
        .flat_map(|v| v.imports().iter().copied())
        .map(ImportSpec::new)
        .collect();

    for qualifier in &refs.qualifiers {
        let spec = file
            .imports
            .iter()
            .find(|spec| !spec.is_dot() && !spec.is_blank() && spec.package_name() == qualifier);
        match spec {
            Some(spec) => imports.push(spec.clone()),
            None => warn!("Package {qualifier} is used in a field type but no import of the input provides it"),
        }
    }

    let undeclared: Vec<&String> = refs
        .unqualified
        .iter()
        .filter(|name| !file.declared.contains(name))
        .collect();
    if !undeclared.is_empty() {
        debug!("Field types name undeclared identifiers {undeclared:?}, keeping dot imports");
        imports.extend(file.imports.iter().filter(|spec| spec.is_dot()).cloned());
    }

    imports.sort();
    imports.dedup();

    let mut paths: BTreeMap<&str, &str> = BTreeMap::new();
    for spec in imports.iter().filter(|spec| !spec.is_dot()) {
        let name = spec.package_name();
        if let Some(other) = paths.insert(name, &spec.path)
            && other != spec.path
        {
            return Err(Error::RenderError {
                template: HEADER_TEMPLATE.to_string(),
                message: format!(
                    "package name {name} would refer to both \"{other}\" and \"{}\"",
                    spec.path
                ),
            });
        }
    }

    Ok(imports)
}
