//! Go lexer.
//!
//! Produces the token stream the declaration extractor and the canonicalizer
//! work on. Tokens borrow from the source text and carry their byte span and
//! 1-based line/column. Semicolons are inserted after line-final tokens the
//! way the Go grammar defines them, so the parser only ever sees explicit
//! statement terminators.

use autobindings_core::{Error, Result};

/// Go keywords.
const KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Operators and punctuation, longest first.
const OPERATORS: [&str; 46] = [
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/", "%", "&", "|",
    "^", "<", ">", "=", "!", "(", ")", "[", "]", "{", "}", ",", ";", ".",
];

/// Single-character punctuation missing from [`OPERATORS`].
const EXTRA_PUNCTUATION: [&str; 2] = [":", "~"];

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier
    Ident,
    /// Reserved word
    Keyword,
    /// Integer, floating-point or imaginary literal
    Number,
    /// Rune literal
    Rune,
    /// Interpreted string literal
    String,
    /// Raw string literal
    RawString,
    /// Operator or punctuation
    Operator,
    /// Explicit `;` or an inserted statement terminator
    Semicolon,
    /// Line or general comment
    Comment,
    /// End of input
    Eof,
}

/// A token borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Lexical category
    pub kind: TokenKind,
    /// Source text of the token (empty or `"\n"` for inserted semicolons)
    pub text: &'a str,
    /// Byte offset of the first byte
    pub start: usize,
    /// Byte offset one past the last byte
    pub end: usize,
    /// 1-based line of the first character
    pub line: usize,
    /// 1-based column of the first character
    pub column: usize,
}

impl Token<'_> {
    /// Returns `true` for the operator `op`.
    #[must_use]
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Returns `true` for the keyword `keyword`.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    /// Returns `true` for `(`, `[` and `{`.
    #[must_use]
    pub fn is_opener(&self) -> bool {
        self.kind == TokenKind::Operator && matches!(self.text, "(" | "[" | "{")
    }

    /// Returns `true` for `)`, `]` and `}`.
    #[must_use]
    pub fn is_closer(&self) -> bool {
        self.kind == TokenKind::Operator && matches!(self.text, ")" | "]" | "}")
    }

    /// Returns `true` for string literals of either form.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self.kind, TokenKind::String | TokenKind::RawString)
    }

    /// Returns `true` for semicolons the lexer inserted at a line end.
    #[must_use]
    pub fn is_implicit_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.text != ";"
    }

    /// Returns the 1-based line of the last character.
    #[must_use]
    pub fn end_line(&self) -> usize {
        if self.kind == TokenKind::Semicolon {
            return self.line;
        }
        self.line + self.text.matches('\n').count()
    }
}

/// Returns the closing delimiter for an opening one.
#[must_use]
pub fn closer_for(opener: &str) -> &'static str {
    match opener {
        "(" => ")",
        "[" => "]",
        _ => "}",
    }
}

/// Checks that every `(`, `[` and `{` has a matching closer.
///
/// # Errors
///
/// Returns [`Error::ParseError`] positioned at the first stray or mismatched
/// closer, or at the innermost opener left unclosed.
pub fn check_delimiters(tokens: &[Token<'_>]) -> Result<()> {
    let mut open: Vec<&Token<'_>> = Vec::new();

    for token in tokens {
        if token.is_opener() {
            open.push(token);
        } else if token.is_closer() {
            match open.pop() {
                Some(opener) if closer_for(opener.text) == token.text => {}
                Some(opener) => {
                    return Err(error(
                        token.line,
                        token.column,
                        &format!(
                            "unexpected '{}', expected '{}' to close '{}' at {}:{}",
                            token.text,
                            closer_for(opener.text),
                            opener.text,
                            opener.line,
                            opener.column
                        ),
                    ));
                }
                None => {
                    return Err(error(
                        token.line,
                        token.column,
                        &format!("unexpected '{}'", token.text),
                    ));
                }
            }
        }
    }

    match open.pop() {
        Some(opener) => Err(error(
            opener.line,
            opener.column,
            &format!("unclosed '{}'", opener.text),
        )),
        None => Ok(()),
    }
}

/// Splits Go source text into tokens.
///
/// The returned stream always ends with a [`TokenKind::Eof`] token.
///
/// # Errors
///
/// Returns [`Error::ParseError`] for unterminated literals or comments,
/// newlines inside interpreted strings, and characters that cannot start a
/// token.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::source::{TokenKind, tokenize};
///
/// let tokens = tokenize("package models\n")?;
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![TokenKind::Keyword, TokenKind::Ident, TokenKind::Semicolon, TokenKind::Eof]
/// );
/// # Ok::<(), autobindings_core::Error>(())
/// ```
pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    insert_semi: bool,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    const fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            insert_semi: false,
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize, column: usize) {
        self.tokens.push(Token {
            kind,
            text: &self.src[start..self.pos],
            start,
            end: self.pos,
            line,
            column,
        });
    }

    fn run(mut self) -> Result<Vec<Token<'a>>> {
        while let Some(c) = self.peek() {
            let (start, line, column) = (self.pos, self.line, self.column);

            match c {
                '\n' => {
                    self.bump();
                    if self.insert_semi {
                        self.push(TokenKind::Semicolon, start, line, column);
                        self.insert_semi = false;
                    }
                }
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '/' if self.rest().starts_with("//") => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                    self.push(TokenKind::Comment, start, line, column);
                }
                '/' if self.rest().starts_with("/*") => self.general_comment(start, line, column)?,
                '`' => {
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('`') => break,
                            Some(_) => {}
                            None => {
                                return Err(error(line, column, "raw string literal not terminated"));
                            }
                        }
                    }
                    self.push(TokenKind::RawString, start, line, column);
                    self.insert_semi = true;
                }
                '"' => self.quoted('"', TokenKind::String, "string literal not terminated")?,
                '\'' => self.quoted('\'', TokenKind::Rune, "rune literal not terminated")?,
                c if c.is_alphabetic() || c == '_' => {
                    while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                        self.bump();
                    }
                    let text = &self.src[start..self.pos];
                    if KEYWORDS.contains(&text) {
                        self.push(TokenKind::Keyword, start, line, column);
                        self.insert_semi =
                            matches!(text, "break" | "continue" | "fallthrough" | "return");
                    } else {
                        self.push(TokenKind::Ident, start, line, column);
                        self.insert_semi = true;
                    }
                }
                c if c.is_ascii_digit() => self.number(start, line, column),
                '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                    self.number(start, line, column);
                }
                c => self.operator(c, start, line, column)?,
            }
        }

        let end = self.pos;
        if self.insert_semi {
            self.push(TokenKind::Semicolon, end, self.line, self.column);
        }
        self.push(TokenKind::Eof, end, self.line, self.column);
        Ok(self.tokens)
    }

    fn general_comment(&mut self, start: usize, line: usize, column: usize) -> Result<()> {
        self.bump();
        self.bump();
        loop {
            if self.rest().starts_with("*/") {
                self.bump();
                self.bump();
                break;
            }
            if self.bump().is_none() {
                return Err(error(line, column, "comment not terminated"));
            }
        }
        self.push(TokenKind::Comment, start, line, column);

        // A general comment spanning lines acts like a newline.
        if self.insert_semi && self.src[start..self.pos].contains('\n') {
            let end = self.pos;
            self.tokens.push(Token {
                kind: TokenKind::Semicolon,
                text: "",
                start: end,
                end,
                line: self.line,
                column: self.column,
            });
            self.insert_semi = false;
        }
        Ok(())
    }

    fn quoted(&mut self, quote: char, kind: TokenKind, unterminated: &str) -> Result<()> {
        let (start, line, column) = (self.pos, self.line, self.column);
        self.bump();
        loop {
            match self.bump() {
                Some('\\') => {
                    if self.peek().is_none_or(|c| c == '\n') {
                        return Err(error(line, column, unterminated));
                    }
                    self.bump();
                }
                Some(c) if c == quote => break,
                Some('\n') | None => return Err(error(line, column, unterminated)),
                Some(_) => {}
            }
        }
        self.push(kind, start, line, column);
        self.insert_semi = true;
        Ok(())
    }

    fn number(&mut self, start: usize, line: usize, column: usize) {
        let hex = self.rest().starts_with("0x") || self.rest().starts_with("0X");
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.') {
                break;
            }
            self.bump();
            let exponent = if hex {
                matches!(c, 'p' | 'P')
            } else {
                matches!(c, 'e' | 'E')
            };
            if exponent && matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
        }
        self.push(TokenKind::Number, start, line, column);
        self.insert_semi = true;
    }

    fn operator(&mut self, c: char, start: usize, line: usize, column: usize) -> Result<()> {
        let rest = self.rest();
        let Some(op) = OPERATORS
            .iter()
            .chain(EXTRA_PUNCTUATION.iter())
            .find(|op| rest.starts_with(**op))
        else {
            return Err(error(line, column, &format!("unexpected character {c:?}")));
        };

        for _ in 0..op.len() {
            self.bump();
        }

        if *op == ";" {
            self.push(TokenKind::Semicolon, start, line, column);
            self.insert_semi = false;
        } else {
            self.push(TokenKind::Operator, start, line, column);
            self.insert_semi = matches!(*op, ")" | "]" | "}" | "++" | "--");
        }
        Ok(())
    }
}

fn error(line: usize, column: usize, message: &str) -> Error {
    Error::ParseError {
        line,
        column,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().iter().map(|t| t.kind).collect()
    }

    fn texts(src: &str) -> Vec<String> {
        tokenize(src)
            .unwrap()
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.text.to_string())
            .collect()
    }

    // ========================================================================
    // Semicolon Insertion Tests
    // ========================================================================

    #[test]
    fn test_semicolon_after_identifier_line_end() {
        assert_eq!(
            kinds("x\ny"),
            vec![
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_opening_brace() {
        assert_eq!(texts("struct {\n}"), vec!["struct", "{", "}", ""]);
    }

    #[test]
    fn test_semicolon_after_closing_brace_and_return() {
        assert_eq!(texts("}\nreturn\n"), vec!["}", "\n", "return", "\n"]);
    }

    #[test]
    fn test_no_semicolon_after_keyword() {
        assert_eq!(texts("type\nfunc"), vec!["type", "func"]);
    }

    #[test]
    fn test_multiline_general_comment_acts_as_newline() {
        let tokens = tokenize("x /* a\nb */ y").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Comment,
                TokenKind::Semicolon,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
        assert!(tokens[2].is_implicit_semicolon());
    }

    // ========================================================================
    // Literal Tests
    // ========================================================================

    #[test]
    fn test_string_literals() {
        let tokens = tokenize(r#"a `raw "x"` "in\"terp""#).unwrap();
        assert_eq!(tokens[1].kind, TokenKind::RawString);
        assert_eq!(tokens[1].text, r#"`raw "x"`"#);
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(tokens[2].text, r#""in\"terp""#);
    }

    #[test]
    fn test_raw_string_spans_lines() {
        let tokens = tokenize("`a\nb`\nx").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].end_line(), 2);
        assert_eq!(tokens[2].text, "x");
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(texts("0x1p-2 1e+3 .5 42i 1_000"), vec!["0x1p-2", "1e+3", ".5", "42i", "1_000", ""]);
    }

    #[test]
    fn test_rune_literals() {
        assert_eq!(texts(r"'a' '\''"), vec!["'a'", r"'\''", ""]);
    }

    // ========================================================================
    // Operator Tests
    // ========================================================================

    #[test]
    fn test_longest_operator_match() {
        assert_eq!(texts("a &^= b...c"), vec!["a", "&^=", "b", "...", "c", ""]);
        assert_eq!(texts("x := <-ch"), vec!["x", ":=", "<-", "ch", ""]);
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("package main\n\ntype T struct{}").unwrap();
        let ty = tokens.iter().find(|t| t.is_keyword("type")).unwrap();
        assert_eq!((ty.line, ty.column), (3, 1));
        let brace = tokens.iter().find(|t| t.is_op("{")).unwrap();
        assert_eq!((brace.line, brace.column), (3, 14));
        assert_eq!(&"package main\n\ntype T struct{}"[brace.start..brace.end], "{");
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_eq!(texts("größe"), vec!["größe", ""]);
    }

    // ========================================================================
    // Error Tests
    // ========================================================================

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("x := \"abc\n").unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("1:6"));
    }

    #[test]
    fn test_unterminated_raw_string() {
        let err = tokenize("x := `abc").unwrap_err();
        assert!(err.to_string().contains("raw string literal not terminated"));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("/* never closed").unwrap_err();
        assert!(err.to_string().contains("comment not terminated"));
    }

    #[test]
    fn test_check_delimiters() {
        assert!(check_delimiters(&tokenize("f(a[1], {b})").unwrap()).is_ok());

        let err = check_delimiters(&tokenize("f(a]").unwrap()).unwrap_err();
        assert!(err.to_string().contains("1:4"));
        assert!(err.to_string().contains("expected ')'"));

        let err = check_delimiters(&tokenize("x }").unwrap()).unwrap_err();
        assert!(err.to_string().contains("unexpected '}'"));

        let err = check_delimiters(&tokenize("type T struct {\n\tA int\n").unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "parse error at 1:15: unclosed '{'");
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a @ b").unwrap_err();
        assert!(err.to_string().contains("unexpected character '@'"));
    }
}
