//! Canonical formatting of generated Go source.
//!
//! [`GoCanonicalizer`] is the built-in formatter: it checks the text with the
//! Go lexer, re-indents it line by line and aligns columns the way gofmt
//! does. [`CommandFormatter`] pipes the text through an external program such
//! as `gofmt` instead.

use crate::source::is_embedded;
use crate::source::lexer::{Token, TokenKind, check_delimiters, tokenize};
use autobindings_core::{Error, FormatConfig, Result};
use std::fmt;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// Key width up to which consecutive key-value pairs always share a column.
const SMALL_KEY: usize = 40;

/// Key width ratio, against the geometric mean of the section, that starts
/// a new alignment section.
const KEY_RATIO: f64 = 2.5;

/// Rewrites Go source text into canonical form.
pub trait SourceFormatter: fmt::Debug + Send + Sync {
    /// Formats `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatError`] if the text cannot be formatted.
    fn format(&self, source: &str) -> Result<String>;
}

/// Returns the formatter configured by `config`: the external command if one
/// is set, the built-in canonicalizer otherwise.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the command has an empty program name.
pub fn formatter_for(config: &FormatConfig) -> Result<Box<dyn SourceFormatter>> {
    if config.command.is_empty() {
        return Ok(Box::new(GoCanonicalizer));
    }
    Ok(Box::new(CommandFormatter::new(&config.command)?))
}

/// Built-in gofmt-style re-indenter.
///
/// - one tab per open block, `case`/`default` labels outdented to their
///   `switch`
/// - struct fields aligned into name, type and tag columns
/// - values of consecutive single-line key-value elements aligned, with
///   sections broken at a blank line, a comment line, a multi-line element
///   or a key much wider or narrower than the ones before it
/// - trailing whitespace removed and runs of blank lines collapsed
/// - no blank lines right after an opening or before a closing delimiter
/// - exactly one trailing newline
///
/// Continuation lines of raw strings and general comments are kept verbatim.
/// Lines carrying a trailing comment are neither aligned nor used to align
/// their neighbours, and `var`/`const` specs are not aligned.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::format::{GoCanonicalizer, SourceFormatter};
///
/// let out = GoCanonicalizer.format("package p\n\n\nfunc f() {\n\n  return\n}")?;
/// assert_eq!(out, "package p\n\nfunc f() {\n\treturn\n}\n");
/// # Ok::<(), autobindings_core::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GoCanonicalizer;

#[derive(Debug, Clone, Copy, Default)]
struct LineInfo {
    /// Line begins inside a multi-line raw string or comment
    starts_inside: bool,
    /// Line ends inside a multi-line raw string or comment
    ends_inside: bool,
    indent: usize,
    opens_block: bool,
    closes_block: bool,
    /// Line starts directly inside a struct type body
    in_struct: bool,
}

impl SourceFormatter for GoCanonicalizer {
    fn format(&self, source: &str) -> Result<String> {
        let invalid = |e: Error| Error::FormatError {
            message: e.to_string(),
        };
        let tokens = tokenize(source).map_err(invalid)?;
        check_delimiters(&tokens).map_err(invalid)?;

        let lines: Vec<&str> = source.split('\n').collect();
        let info = analyze(&tokens, lines.len());
        let aligned = align_columns(source, &tokens, &info);

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut pending_blank = false;
        let mut previous_opens = true;

        for ((line, meta), aligned) in lines.iter().zip(&info).zip(&aligned) {
            let text = if meta.starts_inside {
                if meta.ends_inside {
                    (*line).to_string()
                } else {
                    line.trim_end().to_string()
                }
            } else {
                let body = match aligned {
                    Some(body) => body.as_str(),
                    None if meta.ends_inside => line.trim_start(),
                    None => line.trim(),
                };
                if body.is_empty() {
                    pending_blank = true;
                    continue;
                }
                format!("{}{body}", "\t".repeat(meta.indent))
            };

            if pending_blank && !previous_opens && !(meta.closes_block && !meta.starts_inside) {
                out.push(String::new());
            }
            pending_blank = false;
            previous_opens = meta.opens_block;
            out.push(text);
        }

        if out.is_empty() {
            return Ok(String::new());
        }
        let mut formatted = out.join("\n");
        formatted.push('\n');
        Ok(formatted)
    }
}

/// Computes per-line indentation and block structure.
fn analyze(tokens: &[Token<'_>], line_count: usize) -> Vec<LineInfo> {
    let mut info = vec![LineInfo::default(); line_count];
    // Indent of the line each unclosed opener sits on.
    let mut open: Vec<usize> = Vec::new();
    // Whether each unclosed opener starts a struct type body.
    let mut struct_bodies: Vec<bool> = Vec::new();
    // Value of `open.len()` inside each enclosing switch or select body.
    let mut switch_bodies: Vec<usize> = Vec::new();
    let mut pending_switch = false;
    let mut after_struct = false;
    let mut current: Option<usize> = None;
    let mut leading = false;

    let code = tokens
        .iter()
        .filter(|t| !t.is_implicit_semicolon() && t.kind != TokenKind::Eof);

    for token in code {
        let index = token.line - 1;
        let end = token.end_line() - 1;
        if end > index {
            for entry in &mut info[index..end] {
                entry.ends_inside = true;
            }
            for entry in &mut info[index + 1..=end] {
                entry.starts_inside = true;
            }
        }

        if current != Some(index) {
            current = Some(index);
            leading = true;
            let mut indent = open.last().map_or(0, |i| i + 1);
            let in_switch = switch_bodies.last() == Some(&open.len());
            if in_switch && (token.is_keyword("case") || token.is_keyword("default")) {
                indent = indent.saturating_sub(1);
            }
            info[index].indent = indent;
            info[index].in_struct = struct_bodies.last() == Some(&true);
        }

        if token.is_closer() {
            if leading {
                info[index].indent = open.last().copied().unwrap_or(0);
                info[index].closes_block = true;
            }
            if switch_bodies.last() == Some(&open.len()) {
                switch_bodies.pop();
            }
            open.pop();
            struct_bodies.pop();
        } else {
            leading = false;
        }

        if token.is_opener() {
            if pending_switch && token.is_op("{") {
                switch_bodies.push(open.len() + 1);
                pending_switch = false;
            }
            open.push(info[index].indent);
            struct_bodies.push(after_struct && token.is_op("{"));
        }
        if token.is_keyword("switch") || token.is_keyword("select") {
            pending_switch = true;
        }
        if token.kind != TokenKind::Comment {
            after_struct = token.is_keyword("struct");
        }

        info[end].opens_block = token.is_opener();
    }

    info
}

/// Kind of an alignable line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    /// Struct field: names, type, tag
    Field,
    /// Composite literal element: `key:` and value
    Pair,
}

/// A line split into cells. Every cell but the last is padded to its
/// column width.
#[derive(Debug)]
struct Row {
    kind: RowKind,
    cells: Vec<String>,
    /// Width of the key of a pair
    key_width: usize,
    /// Field whose type continues on the following lines
    open_ended: bool,
}

/// Consecutive rows aligned together.
#[derive(Debug, Default)]
struct Section {
    rows: Vec<(usize, Row)>,
    indent: usize,
    log_sum: f64,
    count: u32,
}

impl Section {
    fn accepts(&self, index: usize, indent: usize, row: &Row) -> bool {
        let Some((last_index, last)) = self.rows.last() else {
            return false;
        };
        if last_index + 1 != index || self.indent != indent || last.kind != row.kind || last.open_ended {
            return false;
        }
        if row.kind == RowKind::Pair && (last.key_width > SMALL_KEY || row.key_width > SMALL_KEY) {
            let mean = (self.log_sum / f64::from(self.count)).exp();
            let ratio = width_as_f64(row.key_width) / mean;
            return KEY_RATIO * ratio > 1.0 && ratio < KEY_RATIO;
        }
        true
    }

    fn start(&mut self, index: usize, indent: usize, row: Row) {
        self.indent = indent;
        self.push(index, row);
    }

    fn push(&mut self, index: usize, row: Row) {
        if row.kind == RowKind::Pair {
            self.log_sum += width_as_f64(row.key_width).ln();
            self.count = self.count.saturating_add(1);
        }
        self.rows.push((index, row));
    }

    fn flush(&mut self, aligned: &mut [Option<String>]) {
        let rows: Vec<&[String]> = self.rows.iter().map(|(_, row)| row.cells.as_slice()).collect();
        for ((index, _), text) in self.rows.iter().zip(align_cells(&rows)) {
            aligned[*index] = Some(text);
        }
        self.rows.clear();
        self.log_sum = 0.0;
        self.count = 0;
    }
}

fn width_as_f64(width: usize) -> f64 {
    f64::from(u32::try_from(width).unwrap_or(u32::MAX))
}

/// Computes the aligned body, without indentation, of every line that takes
/// part in column alignment.
fn align_columns(source: &str, tokens: &[Token<'_>], info: &[LineInfo]) -> Vec<Option<String>> {
    let mut by_line: Vec<Vec<Token<'_>>> = vec![Vec::new(); info.len()];
    for token in tokens
        .iter()
        .filter(|t| !t.is_implicit_semicolon() && t.kind != TokenKind::Eof)
    {
        by_line[token.line - 1].push(*token);
    }

    let mut aligned = vec![None; info.len()];
    let mut section = Section::default();
    for (index, (toks, meta)) in by_line.iter().zip(info).enumerate() {
        let row = if meta.starts_inside || meta.ends_inside {
            None
        } else if meta.in_struct {
            field_row(source, toks)
        } else {
            pair_row(source, toks)
        };

        match row {
            Some(row) if section.accepts(index, meta.indent, &row) => section.push(index, row),
            Some(row) => {
                section.flush(&mut aligned);
                section.start(index, meta.indent, row);
            }
            None => section.flush(&mut aligned),
        }
    }
    section.flush(&mut aligned);
    aligned
}

/// Pads every cell but the last of each row to the width of its column.
///
/// A column spans consecutive rows that all have a cell after it, as with a
/// tab writer using one space of padding.
fn align_cells(rows: &[&[String]]) -> Vec<String> {
    let columns = rows.iter().map(|r| r.len().saturating_sub(1)).max().unwrap_or(0);
    let mut widths: Vec<Vec<usize>> = rows.iter().map(|r| vec![0; r.len().saturating_sub(1)]).collect();

    for column in 0..columns {
        let mut start = 0;
        while start < rows.len() {
            if rows[start].len() <= column + 1 {
                start += 1;
                continue;
            }
            let mut end = start;
            while end < rows.len() && rows[end].len() > column + 1 {
                end += 1;
            }
            let width = rows[start..end]
                .iter()
                .map(|r| r[column].chars().count())
                .max()
                .unwrap_or(0)
                + 1;
            for row_widths in &mut widths[start..end] {
                row_widths[column] = width;
            }
            start = end;
        }
    }

    rows.iter()
        .zip(widths)
        .map(|(row, widths)| {
            let mut line = String::new();
            for (cell, width) in row.iter().zip(widths) {
                line.push_str(&format!("{cell:<width$}"));
            }
            if let Some(last) = row.last() {
                line.push_str(last);
            }
            line
        })
        .collect()
}

fn span(source: &str, toks: &[Token<'_>]) -> String {
    match (toks.first(), toks.last()) {
        (Some(first), Some(last)) => source[first.start..last.end].to_string(),
        _ => String::new(),
    }
}

/// Number of tokens in a leading `a, b, c` name list.
fn name_list_len(toks: &[Token<'_>]) -> usize {
    let mut len = 0;
    while toks.get(len).is_some_and(|t| t.kind == TokenKind::Ident) {
        len += 1;
        if !toks.get(len).is_some_and(|t| t.is_op(",")) {
            return len;
        }
        len += 1;
    }
    0
}

fn has_comment_or_semicolon(toks: &[Token<'_>]) -> bool {
    toks.iter()
        .any(|t| matches!(t.kind, TokenKind::Comment | TokenKind::Semicolon))
}

/// Splits a struct field line into names, type and tag.
fn field_row(source: &str, toks: &[Token<'_>]) -> Option<Row> {
    let (first, last) = (toks.first()?, toks.last()?);
    if first.is_closer() || has_comment_or_semicolon(toks) {
        return None;
    }

    let row = |cells: Vec<String>, open_ended: bool| Row {
        kind: RowKind::Field,
        cells,
        key_width: 0,
        open_ended,
    };

    if last.is_opener() {
        let names = name_list_len(toks);
        let next = toks.get(names)?;
        if names == 0 || next.is_op(".") || names + 1 == toks.len() {
            return None;
        }
        return Some(row(
            vec![span(source, &toks[..names]), span(source, &toks[names..])],
            true,
        ));
    }

    let (body, tag) = match toks.split_last() {
        Some((tag, body)) if tag.is_string() && !body.is_empty() => (body, Some(tag)),
        _ => (toks, None),
    };

    let mut cells = Vec::with_capacity(3);
    if is_embedded(body) {
        cells.push(span(source, body));
    } else {
        let names = name_list_len(body);
        if names == 0 || names >= body.len() {
            return None;
        }
        cells.push(span(source, &body[..names]));
        cells.push(span(source, &body[names..]));
    }
    if let Some(tag) = tag {
        cells.push(tag.text.to_string());
    }
    Some(row(cells, false))
}

/// Splits a `key: value,` composite literal element line.
fn pair_row(source: &str, toks: &[Token<'_>]) -> Option<Row> {
    let (first, last) = (toks.first()?, toks.last()?);
    if !last.is_op(",") || first.kind == TokenKind::Keyword || first.is_closer() {
        return None;
    }
    if has_comment_or_semicolon(toks) {
        return None;
    }

    let mut depth = 0usize;
    let mut colon = None;
    let mut commas = 0;
    for (i, token) in toks.iter().enumerate() {
        if token.is_opener() {
            depth += 1;
        } else if token.is_closer() {
            depth = depth.checked_sub(1)?;
        } else if depth == 0 && colon.is_none() && token.is_op(":") {
            colon = Some(i);
        } else if depth == 0 && token.is_op(",") {
            commas += 1;
        }
    }
    if depth != 0 || commas != 1 {
        return None;
    }
    let colon = colon.filter(|&i| i > 0 && i + 2 < toks.len())?;

    let key = span(source, &toks[..colon]);
    Some(Row {
        kind: RowKind::Pair,
        key_width: key.chars().count(),
        cells: vec![format!("{key}:"), span(source, &toks[colon + 1..])],
        open_ended: false,
    })
}

/// Formats by piping the text through an external command.
///
/// The command reads the source on stdin and writes the formatted source to
/// stdout, as `gofmt` does without arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    /// Creates a formatter from a program and its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if `command` is empty or its program
    /// name is blank.
    pub fn new(command: &[String]) -> Result<Self> {
        match command.split_first() {
            Some((program, args)) if !program.trim().is_empty() => Ok(Self {
                program: program.clone(),
                args: args.to_vec(),
            }),
            _ => Err(Error::ConfigError {
                message: "format command has an empty program name".to_string(),
            }),
        }
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SourceFormatter for CommandFormatter {
    fn format(&self, source: &str) -> Result<String> {
        debug!("Formatting with {} {:?}", self.program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::FormatError {
                message: format!("failed to run '{}': {e}", self.program),
            })?;

        // stdout is drained while the writer thread feeds stdin.
        let stdin = child.stdin.take();
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(source.as_bytes()),
                None => Ok(()),
            });
            (child.wait_with_output(), writer.join())
        });

        let output = output.map_err(|e| Error::FormatError {
            message: format!("failed to wait for '{}': {e}", self.program),
        })?;

        if !output.status.success() {
            return Err(Error::FormatError {
                message: format!(
                    "'{}' exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        written
            .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")))
            .map_err(|e| Error::FormatError {
                message: format!("failed to write to '{}': {e}", self.program),
            })?;

        String::from_utf8(output.stdout).map_err(|_| Error::FormatError {
            message: format!("'{}' produced output that is not UTF-8", self.program),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(src: &str) -> String {
        GoCanonicalizer.format(src).unwrap()
    }

    // ========================================================================
    // Canonicalizer Tests
    // ========================================================================

    #[test]
    fn test_reindents_blocks() {
        let src = "package p\nvar X = map[string]string{\n        \"A\": \"a\",\n}\nfunc f() {\nif true {\nreturn\n}\n}\n";
        assert_eq!(
            canonical(src),
            "package p\nvar X = map[string]string{\n\t\"A\": \"a\",\n}\nfunc f() {\n\tif true {\n\t\treturn\n\t}\n}\n"
        );
    }

    #[test]
    fn test_switch_labels_outdented() {
        let src = "package p\nfunc f(s string) []string {\nswitch strings.ToLower(s) {\ncase \"a\":\nreturn nil\ndefault:\nswitch s {\ncase \"b\":\n}\nreturn nil\n}\n}\n";
        assert_eq!(
            canonical(src),
            "package p\nfunc f(s string) []string {\n\tswitch strings.ToLower(s) {\n\tcase \"a\":\n\t\treturn nil\n\tdefault:\n\t\tswitch s {\n\t\tcase \"b\":\n\t\t}\n\t\treturn nil\n\t}\n}\n"
        );
    }

    #[test]
    fn test_blank_lines_collapsed_and_trimmed() {
        let src = "\n\npackage p   \n\n\n\nvar A = []string{\n\n\"x\",\n\n}\n\n\n";
        assert_eq!(canonical(src), "package p\n\nvar A = []string{\n\t\"x\",\n}\n");
    }

    #[test]
    fn test_closers_share_opener_indent() {
        let src = "package p\nfunc f() {\ng(T{\nA: 1,\n})\n}\n";
        assert_eq!(
            canonical(src),
            "package p\nfunc f() {\n\tg(T{\n\t\tA: 1,\n\t})\n}\n"
        );
    }

    #[test]
    fn test_raw_string_lines_verbatim() {
        let src = "package p\nfunc f() {\n   x := `first   \n   second\n  third`\n}\n";
        assert_eq!(
            canonical(src),
            "package p\nfunc f() {\n\tx := `first   \n   second\n  third`\n}\n"
        );
    }

    #[test]
    fn test_block_comment_lines_verbatim() {
        let src = "package p\n/*\n   keep\n     this\n*/\ntype T struct{}\n";
        assert_eq!(canonical(src), src);
    }

    #[test]
    fn test_struct_tags_preserved() {
        let src = "package p\ntype R struct {\n    Title string `json:\"title\"`\n}\n";
        assert_eq!(
            canonical(src),
            "package p\ntype R struct {\n\tTitle string `json:\"title\"`\n}\n"
        );
    }

    #[test]
    fn test_struct_fields_aligned() {
        let src = "package p\ntype R struct {\n\tID string `json:\"id\"`\n\tDuration int `json:\"duration\"`\n\tNote string\n\tA, B int\n}\n";
        assert_eq!(
            canonical(src),
            "package p\ntype R struct {\n\tID       string `json:\"id\"`\n\tDuration int    `json:\"duration\"`\n\tNote     string\n\tA, B     int\n}\n"
        );
    }

    #[test]
    fn test_embedded_field_tag_in_type_column() {
        let src = "package p\ntype R struct {\n\tBase `json:\"base\"`\n\tLongName int `json:\"n\"`\n}\n";
        assert_eq!(
            canonical(src),
            "package p\ntype R struct {\n\tBase     `json:\"base\"`\n\tLongName int `json:\"n\"`\n}\n"
        );
    }

    #[test]
    fn test_key_value_elements_aligned() {
        let src = "package p\nvar M = map[string]string{\n\"ID\": \"id\",\n\"Duration\":   \"duration\",\n\n\"X\": \"x\",\n}\nfunc f() T {\nreturn T{\nID: t.ID,\nDuration: t.Duration,\n}\n}\n";
        assert_eq!(
            canonical(src),
            "package p\nvar M = map[string]string{\n\t\"ID\":       \"id\",\n\t\"Duration\": \"duration\",\n\n\t\"X\": \"x\",\n}\nfunc f() T {\n\treturn T{\n\t\tID:       t.ID,\n\t\tDuration: t.Duration,\n\t}\n}\n"
        );
    }

    #[test]
    fn test_much_longer_key_starts_new_section() {
        let long = format!("\"{}\"", "x".repeat(43));
        let src = format!("package p\nvar M = map[string]int{{\n\t\"k\": 1,\n\t{long}: 2,\n}}\n");
        assert_eq!(canonical(&src), src);
    }

    #[test]
    fn test_comment_and_multiline_field_break_alignment() {
        let src = "package p\ntype T struct {\n\tA int\n\t// doc\n\tLonger int\n\tMeta struct {\n\t\tInner string\n\t}\n\tCount int\n}\n";
        assert_eq!(
            canonical(src),
            "package p\ntype T struct {\n\tA int\n\t// doc\n\tLonger int\n\tMeta   struct {\n\t\tInner string\n\t}\n\tCount int\n}\n"
        );
    }

    #[test]
    fn test_case_labels_and_calls_not_aligned() {
        let src = "package p\nfunc f(s string) {\n\tswitch s {\n\tcase \"a\":\n\t\tg(a,\n\t\t\tbb)\n\t}\n}\n";
        assert_eq!(canonical(src), src);
    }

    #[test]
    fn test_idempotent() {
        let src = "package p\n\nfunc f() {\n\tswitch x {\n\tcase 1:\n\t\treturn\n\t}\n}\n";
        assert_eq!(canonical(src), src);
        assert_eq!(canonical(&canonical(src)), src);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(canonical("  \n\n"), "");
    }

    #[test]
    fn test_unbalanced_input_is_format_error() {
        let err = GoCanonicalizer.format("package p\nfunc f() {\n").unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("unclosed '{'"));
    }

    #[test]
    fn test_lexical_error_is_format_error() {
        let err = GoCanonicalizer.format("package p\nvar s = \"open\n").unwrap_err();
        assert!(err.is_format_error());
    }

    // ========================================================================
    // Command Formatter Tests
    // ========================================================================

    #[test]
    fn test_formatter_for_defaults_to_builtin() {
        let formatter = formatter_for(&FormatConfig::default()).unwrap();
        assert_eq!(format!("{formatter:?}"), "GoCanonicalizer");
    }

    #[test]
    fn test_command_formatter_rejects_empty_program() {
        assert!(CommandFormatter::new(&[]).unwrap_err().is_config_error());
        assert!(CommandFormatter::new(&[" ".to_string()]).unwrap_err().is_config_error());
    }

    #[test]
    fn test_command_formatter_missing_program() {
        let formatter =
            CommandFormatter::new(&["autobindings-no-such-formatter".to_string()]).unwrap();
        let err = formatter.format("package p\n").unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("autobindings-no-such-formatter"));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_formatter_pipes_stdin() {
        let formatter = formatter_for(&FormatConfig {
            command: vec!["cat".to_string()],
        })
        .unwrap();
        assert_eq!(formatter.format("package p\n").unwrap(), "package p\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_formatter_streams_large_input() {
        let formatter = CommandFormatter::new(&["cat".to_string()]).unwrap();
        let source = "// x\n".repeat(200_000);
        assert_eq!(formatter.format(&source).unwrap(), source);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_formatter_failure_status() {
        let formatter = CommandFormatter::new(&[
            "sh".to_string(),
            "-c".to_string(),
            "cat >/dev/null; echo bad input >&2; exit 3".to_string(),
        ])
        .unwrap();
        let err = formatter.format("package p\n").unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("bad input"));
    }
}
