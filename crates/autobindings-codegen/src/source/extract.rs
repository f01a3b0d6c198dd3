//! Struct declaration extraction.
//!
//! A small recursive-descent pass over the token stream. It understands just
//! enough Go to find the package clause, the imports, the names of top-level
//! declarations and the bodies of struct types; everything else is skipped
//! with balanced delimiters.

use super::lexer::{Token, TokenKind, check_delimiters, closer_for, tokenize};
use super::literal::{quote, unquote};
use autobindings_core::{Error, Result};
use std::fmt;
use tracing::{debug, warn};

/// A parsed Go source file reduced to what the generator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Name from the `package` clause
    pub package: String,
    /// Import specs in source order
    pub imports: Vec<ImportSpec>,
    /// Names declared at package level by `type`, `var`, `const` and `func`
    /// declarations, methods excluded
    pub declared: Vec<String>,
    /// Methods declared in the file
    pub methods: Vec<MethodDecl>,
    /// Top-level struct declarations in source order
    pub structs: Vec<StructDecl>,
}

impl SourceFile {
    /// Looks up a struct declaration by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&StructDecl> {
        self.structs.iter().find(|s| s.name == name)
    }
}

/// One import spec, such as `"time"`, `str "strings"`, `. "math"` or
/// `_ "embed"`.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::source::ImportSpec;
///
/// assert_eq!(ImportSpec::new("github.com/google/uuid").package_name(), "uuid");
/// assert_eq!(ImportSpec::new("github.com/go-redis/redis/v9").package_name(), "redis");
/// assert_eq!(ImportSpec::new("gopkg.in/yaml.v3").package_name(), "yaml");
///
/// let aliased = ImportSpec::named("str", "strings");
/// assert_eq!(aliased.package_name(), "str");
/// assert_eq!(aliased.to_string(), "str \"strings\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportSpec {
    /// Explicit package name: an alias, `.` or `_`
    pub name: Option<String>,
    /// Unquoted import path
    pub path: String,
}

impl ImportSpec {
    /// Creates an unnamed import of `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            name: None,
            path: path.into(),
        }
    }

    /// Creates an import of `path` under `name`.
    #[must_use]
    pub fn named(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            path: path.into(),
        }
    }

    /// Returns `true` for `. "path"` imports.
    #[must_use]
    pub fn is_dot(&self) -> bool {
        self.name.as_deref() == Some(".")
    }

    /// Returns `true` for `_ "path"` imports.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.as_deref() == Some("_")
    }

    /// Name the importing file refers to the package by.
    ///
    /// Without an alias this is the last path element, skipping a `/vN`
    /// major version element and dropping a `.vN` suffix.
    #[must_use]
    pub fn package_name(&self) -> &str {
        if let Some(name) = &self.name {
            return name;
        }
        let mut elements = self.path.rsplit('/');
        let last = elements.next().unwrap_or_default();
        let last = if is_major_version(last) {
            elements.next().unwrap_or(last)
        } else {
            last
        };
        last.rsplit_once('.')
            .filter(|(_, suffix)| is_major_version(suffix))
            .map_or(last, |(base, _)| base)
    }
}

impl fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        f.write_str(&quote(&self.path))
    }
}

fn is_major_version(element: &str) -> bool {
    element
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// A method declaration, such as `func (a *Asset) Title() string`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Base type name of the receiver
    pub receiver: String,
    /// Method name
    pub name: String,
}

/// A top-level named struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    /// Type name
    pub name: String,
    /// Type parameter list of a generic struct
    pub type_params: Option<TypeParams>,
    /// Field declarations in source order, embedded fields included
    pub fields: Vec<FieldDecl>,
    /// Line of the type name
    pub line: usize,
}

/// Type parameter list of a generic type, such as `[K comparable, V any]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParams {
    /// Source text including the brackets
    pub text: String,
    /// Parameter names in order
    pub names: Vec<String>,
}

impl TypeParams {
    /// Type argument list instantiating the type with its own parameters,
    /// such as `[K, V]`.
    #[must_use]
    pub fn arguments(&self) -> String {
        format!("[{}]", self.names.join(", "))
    }
}

/// One field declaration line of a struct body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Declared names; empty for embedded fields
    pub names: Vec<String>,
    /// Source text of the field type
    pub type_text: String,
    /// Unquoted struct tag, if any
    pub tag: Option<String>,
    /// Line of the first token
    pub line: usize,
}

impl FieldDecl {
    /// Returns `true` for embedded (anonymous) fields.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// Extracts the package name and top-level struct declarations.
///
/// # Errors
///
/// Returns [`Error::ParseError`] if the text is not lexically valid Go, the
/// package clause is missing, delimiters are unbalanced, or a struct body is
/// malformed.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::source::parse_source;
///
/// let file = parse_source(
///     "package models\n\ntype Item struct {\n\tTitle, Subtitle string `json:\"title\"`\n}\n",
/// )?;
/// assert_eq!(file.package, "models");
/// assert_eq!(file.structs[0].fields[0].names, vec!["Title", "Subtitle"]);
/// assert_eq!(file.structs[0].fields[0].tag.as_deref(), Some("json:\"title\""));
/// # Ok::<(), autobindings_core::Error>(())
/// ```
pub fn parse_source(src: &str) -> Result<SourceFile> {
    let tokens: Vec<Token<'_>> = tokenize(src)?
        .into_iter()
        .filter(|t| t.kind != TokenKind::Comment)
        .collect();
    check_delimiters(&tokens)?;

    Parser {
        src,
        tokens,
        pos: 0,
        declared: Vec::new(),
        methods: Vec::new(),
    }
    .parse_file()
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    declared: Vec<String>,
    methods: Vec<MethodDecl>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Token<'a> {
        // The stream always ends with Eof, so the last index is valid.
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, offset: usize) -> Token<'a> {
        self.tokens[(self.pos + offset).min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn skip_semicolons(&mut self) {
        while self.peek().kind == TokenKind::Semicolon {
            self.advance();
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<Token<'a>> {
        let token = self.peek();
        if token.kind == TokenKind::Ident {
            return Ok(self.advance());
        }
        Err(unexpected(&token, what))
    }

    fn expect_terminator(&mut self) -> Result<()> {
        let token = self.peek();
        match token.kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ if token.is_op(")") => Ok(()),
            _ => Err(unexpected(&token, "';' or newline")),
        }
    }

    /// Advances to the next `;` or closer at the current nesting level.
    fn skip_to_terminator(&mut self) {
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            if token.kind == TokenKind::Eof {
                return;
            }
            if depth == 0 && (token.kind == TokenKind::Semicolon || token.is_closer()) {
                return;
            }
            if token.is_opener() {
                depth += 1;
            } else if token.is_closer() {
                depth -= 1;
            }
            self.advance();
        }
    }

    /// Advances past the closer matching the opener at the current position.
    fn skip_group(&mut self) {
        let mut depth = 0usize;
        loop {
            let token = self.advance();
            if token.is_opener() {
                depth += 1;
            } else if token.is_closer() {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
            if token.kind == TokenKind::Eof {
                return;
            }
        }
    }

    fn parse_file(mut self) -> Result<SourceFile> {
        self.skip_semicolons();
        let clause = self.peek();
        if !clause.is_keyword("package") {
            return Err(unexpected(&clause, "package clause"));
        }
        self.advance();
        let package = self.expect_ident("package name")?.text.to_string();
        self.expect_terminator()?;

        let mut imports: Vec<ImportSpec> = Vec::new();
        let mut structs: Vec<StructDecl> = Vec::new();
        loop {
            self.skip_semicolons();
            if self.at_eof() {
                break;
            }

            let keyword = self.peek();
            if keyword.is_keyword("import") {
                self.advance();
                imports.extend(self.parse_import_decl()?);
            } else if keyword.is_keyword("var") || keyword.is_keyword("const") {
                self.advance();
                self.parse_value_decl();
            } else if keyword.is_keyword("func") {
                self.advance();
                self.parse_func_decl();
            } else if keyword.is_keyword("type") {
                self.advance();
                for decl in self.parse_type_decl()? {
                    if let Some(first) = structs.iter().find(|s| s.name == decl.name) {
                        warn!(
                            "Struct {} redeclared at line {} (first declared at line {}), keeping the first",
                            decl.name, decl.line, first.line
                        );
                        continue;
                    }
                    debug!("Found struct {} with {} field declarations", decl.name, decl.fields.len());
                    structs.push(decl);
                }
            } else {
                self.skip_to_terminator();
            }
        }

        debug!(
            "Found {} imports and {} package-level names",
            imports.len(),
            self.declared.len()
        );
        Ok(SourceFile {
            package,
            imports,
            declared: self.declared,
            methods: self.methods,
            structs,
        })
    }

    fn parse_import_decl(&mut self) -> Result<Vec<ImportSpec>> {
        let mut found = Vec::new();

        if !self.peek().is_op("(") {
            found.push(self.parse_import_spec()?);
            self.expect_terminator()?;
            return Ok(found);
        }

        self.advance();
        loop {
            self.skip_semicolons();
            if self.peek().is_op(")") {
                self.advance();
                break;
            }
            found.push(self.parse_import_spec()?);
            self.expect_terminator()?;
        }
        self.expect_terminator()?;
        Ok(found)
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec> {
        let first = self.peek();
        let name = if first.kind == TokenKind::Ident || first.is_op(".") {
            self.advance();
            Some(first.text.to_string())
        } else {
            None
        };

        let path = self.peek();
        if !path.is_string() {
            return Err(unexpected(&path, "import path"));
        }
        self.advance();
        let text = unquote(path.text).ok_or_else(|| Error::ParseError {
            line: path.line,
            column: path.column,
            message: "invalid import path literal".to_string(),
        })?;

        Ok(ImportSpec { name, path: text })
    }

    /// Records the names of a `var` or `const` declaration.
    fn parse_value_decl(&mut self) {
        if self.peek().is_op("(") {
            self.advance();
            loop {
                self.skip_semicolons();
                let token = self.peek();
                if token.kind == TokenKind::Eof {
                    return;
                }
                if token.is_op(")") {
                    self.advance();
                    break;
                }
                self.value_spec_names();
                self.skip_to_terminator();
            }
        } else {
            self.value_spec_names();
        }
        self.skip_to_terminator();
    }

    fn value_spec_names(&mut self) {
        while self.peek().kind == TokenKind::Ident {
            let name = self.advance();
            self.declared.push(name.text.to_string());
            if !self.peek().is_op(",") {
                return;
            }
            self.advance();
        }
    }

    /// Records a function name, or a method with its receiver type.
    fn parse_func_decl(&mut self) {
        if self.peek().is_op("(") {
            let start = self.pos;
            self.skip_group();
            let receiver = receiver_type(&self.tokens[start..self.pos]);
            let name = self.peek();
            if let Some(receiver) = receiver
                && name.kind == TokenKind::Ident
            {
                self.methods.push(MethodDecl {
                    receiver,
                    name: name.text.to_string(),
                });
            }
        } else if self.peek().kind == TokenKind::Ident {
            let name = self.advance();
            self.declared.push(name.text.to_string());
        }
        self.skip_to_terminator();
    }

    fn parse_type_decl(&mut self) -> Result<Vec<StructDecl>> {
        let mut found = Vec::new();

        if !self.peek().is_op("(") {
            if let Some(decl) = self.parse_type_spec()? {
                found.push(decl);
            }
            self.expect_terminator()?;
            return Ok(found);
        }

        self.advance();
        loop {
            self.skip_semicolons();
            if self.peek().is_op(")") {
                self.advance();
                break;
            }
            if let Some(decl) = self.parse_type_spec()? {
                found.push(decl);
            }
            self.expect_terminator()?;
        }
        self.expect_terminator()?;
        Ok(found)
    }

    fn parse_type_spec(&mut self) -> Result<Option<StructDecl>> {
        let name = self.expect_ident("type name")?;
        self.declared.push(name.text.to_string());

        let mut type_params = None;
        if self.peek().is_op("[") && self.has_type_parameters() {
            let start = self.pos;
            self.skip_group();
            type_params = Some(self.type_params(start, self.pos));
        }
        let alias = self.peek().is_op("=");
        if alias {
            self.advance();
        }

        if self.peek().is_keyword("struct") {
            self.advance();
            let fields = self.parse_struct_body()?;
            if alias {
                // Methods cannot be declared on an alias of an unnamed struct type.
                debug!("Skipping alias {} at line {}", name.text, name.line);
                return Ok(None);
            }
            return Ok(Some(StructDecl {
                name: name.text.to_string(),
                type_params,
                fields,
                line: name.line,
            }));
        }

        self.skip_to_terminator();
        Ok(None)
    }

    /// Tells `type P[T any] ...` apart from the array type `type A [N]T`.
    fn has_type_parameters(&self) -> bool {
        let first = self.peek_at(1);
        let second = self.peek_at(2);
        first.kind == TokenKind::Ident
            && (matches!(second.kind, TokenKind::Ident | TokenKind::Keyword)
                || ["*", ",", "[", "(", "~"]
                    .iter()
                    .any(|op| second.is_op(op)))
    }

    /// Reads the parameter list spanning `tokens[start..end]`, brackets included.
    fn type_params(&self, start: usize, end: usize) -> TypeParams {
        let toks = &self.tokens[start..end];
        let text = self.src[toks[0].start..toks[toks.len() - 1].end].to_string();

        let mut names = Vec::new();
        let mut depth = 0usize;
        let mut segment_start = true;
        for token in &toks[1..toks.len() - 1] {
            if segment_start && token.kind == TokenKind::Ident {
                names.push(token.text.to_string());
            }
            segment_start = false;
            if token.is_opener() {
                depth += 1;
            } else if token.is_closer() {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && token.is_op(",") {
                segment_start = true;
            }
        }

        TypeParams { text, names }
    }

    fn parse_struct_body(&mut self) -> Result<Vec<FieldDecl>> {
        let open = self.peek();
        if !open.is_op("{") {
            return Err(unexpected(&open, "'{' after 'struct'"));
        }
        self.advance();

        let mut fields = Vec::new();
        loop {
            self.skip_semicolons();
            let token = self.peek();
            if token.is_op("}") {
                self.advance();
                return Ok(fields);
            }
            if token.kind == TokenKind::Eof {
                return Err(unexpected(&token, "'}'"));
            }

            let start = self.pos;
            self.skip_to_terminator();
            let end = self.pos;
            fields.push(self.field_decl(start, end)?);

            let next = self.peek();
            if !(next.kind == TokenKind::Semicolon || next.is_op("}")) {
                return Err(unexpected(&next, "';' or '}' after field"));
            }
        }
    }

    fn field_decl(&self, start: usize, end: usize) -> Result<FieldDecl> {
        let mut toks = &self.tokens[start..end];
        let first = toks[0];

        let mut tag = None;
        if toks.len() > 1
            && let Some(last) = toks.last().filter(|t| t.is_string())
        {
            let text = unquote(last.text).ok_or_else(|| Error::ParseError {
                line: last.line,
                column: last.column,
                message: "invalid struct tag literal".to_string(),
            })?;
            tag = Some(text);
            toks = &toks[..toks.len() - 1];
        }

        let (names, type_toks) = if is_embedded(toks) {
            (Vec::new(), toks)
        } else {
            split_names(toks)?
        };

        let (Some(type_first), Some(type_last)) = (type_toks.first(), type_toks.last()) else {
            return Err(unexpected(&first, "field type"));
        };

        Ok(FieldDecl {
            names,
            type_text: self.src[type_first.start..type_last.end].to_string(),
            tag,
            line: first.line,
        })
    }
}

/// Returns `true` if the tokens of a field declaration, tag excluded, declare
/// an embedded field: `T`, `*T`, `pkg.T`, `T[A]`, `pkg.T[A]`.
pub fn is_embedded(toks: &[Token<'_>]) -> bool {
    match toks {
        [first, ..] if first.is_op("*") => true,
        [only] => only.kind == TokenKind::Ident,
        [first, second, ..] if first.kind == TokenKind::Ident => {
            if second.is_op(".") {
                return true;
            }
            second.is_op("[") && matching_index(toks, 1) == Some(toks.len() - 1)
        }
        _ => false,
    }
}

/// Base type name of a receiver list such as `(a *Asset)` or `(p Page[T])`.
fn receiver_type(toks: &[Token<'_>]) -> Option<String> {
    let inner = toks.get(1..toks.len().checked_sub(1)?)?;
    let mut depth = 0usize;
    let mut base = None;
    for token in inner {
        if token.is_opener() {
            depth += 1;
        } else if token.is_closer() {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.kind == TokenKind::Ident {
            base = Some(token.text);
        }
    }
    base.map(str::to_string)
}

fn matching_index(toks: &[Token<'_>], open: usize) -> Option<usize> {
    let closer = closer_for(toks[open].text);
    let mut depth = 0usize;
    for (i, token) in toks.iter().enumerate().skip(open) {
        if token.is_opener() {
            depth += 1;
        } else if token.is_closer() {
            depth -= 1;
            if depth == 0 {
                return (token.text == closer).then_some(i);
            }
        }
    }
    None
}

fn split_names<'t, 'a>(toks: &'t [Token<'a>]) -> Result<(Vec<String>, &'t [Token<'a>])> {
    let mut names = Vec::new();
    let mut i = 0;
    loop {
        let Some(token) = toks.get(i) else {
            let last = toks[toks.len() - 1];
            return Err(unexpected(&last, "field type"));
        };
        if token.kind != TokenKind::Ident {
            return Err(unexpected(token, "field name"));
        }
        names.push(token.text.to_string());
        i += 1;

        match toks.get(i) {
            Some(sep) if sep.is_op(",") => i += 1,
            _ => return Ok((names, &toks[i..])),
        }
    }
}

fn unexpected(token: &Token<'_>, expected: &str) -> Error {
    let found = match token.kind {
        TokenKind::Eof => "end of file".to_string(),
        TokenKind::Semicolon if token.is_implicit_semicolon() => "newline".to_string(),
        _ => format!("'{}'", token.text),
    };
    Error::ParseError {
        line: token.line,
        column: token.column,
        message: format!("expected {expected}, found {found}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SourceFile {
        parse_source(src).unwrap()
    }

    fn field_names(decl: &StructDecl) -> Vec<Vec<String>> {
        decl.fields.iter().map(|f| f.names.clone()).collect()
    }

    // ========================================================================
    // Package and Declaration Tests
    // ========================================================================

    #[test]
    fn test_package_and_single_struct() {
        let file = parse(
            r#"// Package models holds API models.
package models

import (
	"time"
)

type Item struct {
	Title   string `json:"title,omitempty"`
	Created time.Time
}
"#,
        );

        assert_eq!(file.package, "models");
        assert_eq!(file.structs.len(), 1);
        let item = &file.structs[0];
        assert_eq!(item.name, "Item");
        assert_eq!(item.line, 8);
        assert_eq!(item.fields[0].type_text, "string");
        assert_eq!(item.fields[0].tag.as_deref(), Some(r#"json:"title,omitempty""#));
        assert_eq!(item.fields[1].type_text, "time.Time");
        assert_eq!(item.fields[1].tag, None);
    }

    #[test]
    fn test_grouped_declarations_keep_order() {
        let file = parse(
            "package p\n\ntype (\n\tID int\n\tB struct{ X int }\n\tA struct {\n\t\tY string\n\t}\n)\n",
        );
        let names: Vec<_> = file.structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_generic_struct() {
        let file = parse(
            "package p\ntype Page[K, V any, C interface{ ~int }] struct {\n\tItems map[K]V\n}\ntype Arr [4]int\n",
        );
        assert_eq!(file.structs.len(), 1);
        let page = &file.structs[0];
        assert_eq!(page.name, "Page");
        assert_eq!(page.fields[0].type_text, "map[K]V");

        let params = page.type_params.as_ref().unwrap();
        assert_eq!(params.text, "[K, V any, C interface{ ~int }]");
        assert_eq!(params.names, vec!["K", "V", "C"]);
        assert_eq!(params.arguments(), "[K, V, C]");
    }

    #[test]
    fn test_alias_struct_skipped() {
        let file = parse("package p\ntype Alias = struct{ N int }\ntype Real struct{ N int }\n");
        let names: Vec<_> = file.structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Real"]);
        assert!(file.structs[0].type_params.is_none());
    }

    #[test]
    fn test_functions_and_nested_structs_skipped() {
        let file = parse(
            r"package p

func New() *Outer {
	type Local struct{ A int }
	return &Outer{}
}

var x = struct{ B int }{B: 1}

type Outer struct {
	Meta struct {
		Inner string
	}
	Count int
}
",
        );
        assert_eq!(file.structs.len(), 1);
        let outer = &file.structs[0];
        assert_eq!(field_names(outer), vec![vec!["Meta"], vec!["Count"]]);
        assert!(outer.fields[0].type_text.starts_with("struct {"));
        assert!(outer.fields[0].type_text.ends_with('}'));
    }

    #[test]
    fn test_duplicate_struct_keeps_first() {
        let file = parse("package p\ntype A struct{ X int }\ntype A struct{ Y int }\n");
        assert_eq!(file.structs.len(), 1);
        assert_eq!(field_names(&file.structs[0]), vec![vec!["X"]]);
    }

    // ========================================================================
    // Import and Package-Level Name Tests
    // ========================================================================

    #[test]
    fn test_imports_collected() {
        let file = parse(
            r#"package p

import "time"
import str "strings"

import (
	"github.com/google/uuid"
	. "math"
	_ "embed"
	yaml "gopkg.in/yaml.v3"
)

type S struct{ At time.Time }
"#,
        );
        assert_eq!(
            file.imports,
            vec![
                ImportSpec::new("time"),
                ImportSpec::named("str", "strings"),
                ImportSpec::new("github.com/google/uuid"),
                ImportSpec::named(".", "math"),
                ImportSpec::named("_", "embed"),
                ImportSpec::named("yaml", "gopkg.in/yaml.v3"),
            ]
        );
        assert!(file.imports[3].is_dot());
        assert!(file.imports[4].is_blank());
        assert_eq!(file.imports[2].package_name(), "uuid");
        assert_eq!(file.structs.len(), 1);
    }

    #[test]
    fn test_import_without_path() {
        let err = parse_source("package p
import fmt
").unwrap_err();
        assert!(err.to_string().contains("expected import path"));
    }

    #[test]
    fn test_package_level_names_and_methods() {
        let file = parse(
            r#"package p

const (
	A = iota
	B
)

var x, y = 1, 2

type ID int

type Item struct{ N int }

func New() *Item { return &Item{} }

func (i *Item) Restricted() int { return i.N }

func (p Page[K, V]) Len() int { return 0 }
"#,
        );
        assert_eq!(file.declared, vec!["A", "B", "x", "y", "ID", "Item", "New"]);
        assert_eq!(
            file.methods,
            vec![
                MethodDecl {
                    receiver: "Item".to_string(),
                    name: "Restricted".to_string(),
                },
                MethodDecl {
                    receiver: "Page".to_string(),
                    name: "Len".to_string(),
                },
            ]
        );
    }

    // ========================================================================
    // Field Tests
    // ========================================================================

    #[test]
    fn test_embedded_fields_detected() {
        let file = parse(
            "package p\ntype S struct {\n\tBase\n\t*Other\n\tio.Reader\n\tList[int]\n\tpkg.Box[T] `json:\"box\"`\n\tName string\n\tArr [2]int\n\tSlice []string\n}\n",
        );
        let s = &file.structs[0];
        let embedded: Vec<bool> = s.fields.iter().map(FieldDecl::is_embedded).collect();
        assert_eq!(
            embedded,
            vec![true, true, true, true, true, false, false, false]
        );
        assert_eq!(s.fields[6].type_text, "[2]int");
    }

    #[test]
    fn test_multi_name_field() {
        let file = parse("package p\ntype S struct {\n\tA, B, C float64 `binding:\"required\"`\n}\n");
        let field = &file.structs[0].fields[0];
        assert_eq!(field.names, vec!["A", "B", "C"]);
        assert_eq!(field.type_text, "float64");
        assert_eq!(field.tag.as_deref(), Some(r#"binding:"required""#));
    }

    #[test]
    fn test_interpreted_string_tag_is_unquoted() {
        let file = parse("package p\ntype S struct {\n\tA int \"json:\\\"a\\\"\"\n}\n");
        assert_eq!(file.structs[0].fields[0].tag.as_deref(), Some(r#"json:"a""#));
    }

    #[test]
    fn test_complex_field_types() {
        let file = parse(
            "package p\ntype S struct {\n\tF func(a, b int) (string, error)\n\tM map[string][]*T\n\tC <-chan struct{}\n}\n",
        );
        let types: Vec<_> = file.structs[0]
            .fields
            .iter()
            .map(|f| f.type_text.as_str())
            .collect();
        assert_eq!(
            types,
            vec!["func(a, b int) (string, error)", "map[string][]*T", "<-chan struct{}"]
        );
    }

    #[test]
    fn test_comments_ignored() {
        let file = parse(
            "package p\ntype S struct {\n\t// doc\n\tA int // trailing\n\t/* block */ B string\n}\n",
        );
        assert_eq!(field_names(&file.structs[0]), vec![vec!["A"], vec!["B"]]);
    }

    #[test]
    fn test_empty_struct() {
        let file = parse("package p\ntype Empty struct{}\n");
        assert!(file.structs[0].fields.is_empty());
        assert!(file.find("Empty").is_some());
        assert!(file.find("Missing").is_none());
    }

    // ========================================================================
    // Error Tests
    // ========================================================================

    #[test]
    fn test_missing_package_clause() {
        let err = parse_source("type A struct{}\n").unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("expected package clause"));
    }

    #[test]
    fn test_unbalanced_braces() {
        let err = parse_source("package p\ntype A struct {\n\tX int\n").unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("2:15"));
    }

    #[test]
    fn test_missing_field_type() {
        let err = parse_source("package p\ntype A struct {\n\tX, Y\n}\n").unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("expected field type"));
    }

    #[test]
    fn test_invalid_field_start() {
        let err = parse_source("package p\ntype A struct {\n\t42 int\n}\n").unwrap_err();
        assert!(err.to_string().contains("expected field name, found '42'"));
    }

    #[test]
    fn test_lexical_error_propagates() {
        let err = parse_source("package p\ntype A struct {\n\tX int `json:\"x\"\n}\n").unwrap_err();
        assert!(err.to_string().contains("raw string literal not terminated"));
    }
}
