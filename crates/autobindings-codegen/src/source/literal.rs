//! Go string literal quoting and unquoting.

/// Unquotes a Go string literal, raw (`` `...` ``) or interpreted (`"..."`).
///
/// Returns `None` if the text is not a well-formed literal.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::source::unquote;
///
/// assert_eq!(unquote(r#""a\tb""#).as_deref(), Some("a\tb"));
/// assert_eq!(unquote("`json:\"id\"`").as_deref(), Some("json:\"id\""));
/// assert_eq!(unquote("\"open"), None);
/// ```
#[must_use]
pub fn unquote(literal: &str) -> Option<String> {
    if let Some(body) = literal
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        if body.contains('`') {
            return None;
        }
        // Carriage returns are discarded from raw literals.
        return Some(body.replace('\r', ""));
    }

    let body = literal.strip_prefix('"')?.strip_suffix('"')?;
    unescape(body)
}

/// Resolves the escape sequences of an interpreted string body.
fn unescape(body: &str) -> Option<String> {
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let escape = chars.next()?;
                match escape {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' => out.push(b'\\'),
                    '"' => out.push(b'"'),
                    'x' => out.push(u8::try_from(hex_value(&mut chars, 2)?).ok()?),
                    'u' => push_char(&mut out, char::from_u32(hex_value(&mut chars, 4)?)?),
                    'U' => push_char(&mut out, char::from_u32(hex_value(&mut chars, 8)?)?),
                    '0'..='7' => {
                        let mut value = escape.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        out.push(u8::try_from(value).ok()?);
                    }
                    _ => return None,
                }
            }
            _ => push_char(&mut out, c),
        }
    }

    Some(String::from_utf8_lossy(&out).into_owned())
}

fn hex_value(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// Quotes text as a Go interpreted string literal.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::source::quote;
///
/// assert_eq!(quote("title"), "\"title\"");
/// assert_eq!(quote("say \"hi\"\n"), r#""say \"hi\"\n""#);
/// ```
#[must_use]
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 || u32::from(c) == 0x7f => {
                out.push_str(&format!("\\x{:02x}", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
