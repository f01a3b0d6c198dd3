//! Struct tag tokenizer.
//!
//! Scans a tag such as `json:"id,omitempty" binding:"required"` into ordered
//! key/value pairs using the same rules as Go's `reflect.StructTag`:
//!
//! - pairs are separated by spaces
//! - a key is a run of bytes above `' '` other than `:`, `"` and DEL
//! - the key is followed by `:` and an interpreted string literal
//!
//! Scanning stops at the first malformed pair. Pairs read before it are kept
//! and the problem is reported next to them.

use crate::source::unquote;
use thiserror::Error;

/// Problem found while scanning a struct tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// A pair starts with a character that cannot begin a key.
    #[error("expected a key at byte {offset}")]
    MissingKey {
        /// Byte offset into the tag
        offset: usize,
    },

    /// A key is not followed by `:"`.
    #[error("key '{key}' is not followed by ':\"'")]
    MissingValue {
        /// The key read so far
        key: String,
    },

    /// The quoted value runs to the end of the tag.
    #[error("value for key '{key}' is not terminated")]
    UnterminatedValue {
        /// Key of the pair
        key: String,
    },

    /// The quoted value contains an invalid escape sequence.
    #[error("value for key '{key}' is not a valid string literal")]
    InvalidValue {
        /// Key of the pair
        key: String,
    },
}

/// One `key:"value"` pair with the value unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPair {
    /// Key
    pub key: String,
    /// Unquoted value
    pub value: String,
}

/// A scanned struct tag.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::mapping::StructTag;
///
/// let tag = StructTag::parse(r#"json:"id,omitempty" binding:"required""#);
/// assert_eq!(tag.get("json"), Some("id,omitempty"));
/// assert_eq!(tag.get("binding"), Some("required"));
/// assert!(tag.error().is_none());
///
/// let broken = StructTag::parse(r#"json:"id" binding:required"#);
/// assert_eq!(broken.pairs().len(), 1);
/// assert!(broken.error().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructTag {
    pairs: Vec<TagPair>,
    error: Option<TagError>,
}

impl StructTag {
    /// Scans `tag` into pairs.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let bytes = tag.as_bytes();
        let mut pairs = Vec::new();
        let mut pos = 0;

        let error = loop {
            while pos < bytes.len() && bytes[pos] == b' ' {
                pos += 1;
            }
            if pos >= bytes.len() {
                break None;
            }

            let key_start = pos;
            while pos < bytes.len()
                && bytes[pos] > b' '
                && bytes[pos] != b':'
                && bytes[pos] != b'"'
                && bytes[pos] != 0x7f
            {
                pos += 1;
            }
            if pos == key_start {
                break Some(TagError::MissingKey { offset: pos });
            }
            let key = &tag[key_start..pos];
            if pos + 1 >= bytes.len() || bytes[pos] != b':' || bytes[pos + 1] != b'"' {
                break Some(TagError::MissingValue {
                    key: key.to_string(),
                });
            }
            pos += 1;

            let value_start = pos;
            pos += 1;
            while pos < bytes.len() && bytes[pos] != b'"' {
                if bytes[pos] == b'\\' {
                    pos += 1;
                }
                pos += 1;
            }
            if pos >= bytes.len() {
                break Some(TagError::UnterminatedValue {
                    key: key.to_string(),
                });
            }
            pos += 1;

            let Some(value) = unquote(&tag[value_start..pos]) else {
                break Some(TagError::InvalidValue {
                    key: key.to_string(),
                });
            };
            pairs.push(TagPair {
                key: key.to_string(),
                value,
            });
        };

        Self { pairs, error }
    }

    /// Pairs in tag order.
    #[must_use]
    pub fn pairs(&self) -> &[TagPair] {
        &self.pairs
    }

    /// The problem that stopped scanning, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&TagError> {
        self.error.as_ref()
    }

    /// Value of the first pair with `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    /// Returns `true` if any pair has one of `keys`.
    #[must_use]
    pub fn has_any(&self, keys: &[&str]) -> bool {
        self.pairs.iter().any(|pair| keys.contains(&pair.key.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(tag: &StructTag) -> Vec<&str> {
        tag.pairs().iter().map(|p| p.key.as_str()).collect()
    }

    #[test]
    fn test_parse_multiple_pairs() {
        let tag = StructTag::parse(r#"json:"title" binding:"required,create" mediatypes:"video,audio""#);
        assert_eq!(keys(&tag), vec!["json", "binding", "mediatypes"]);
        assert_eq!(tag.get("mediatypes"), Some("video,audio"));
        assert!(tag.error().is_none());
    }

    #[test]
    fn test_extra_spaces_between_pairs() {
        let tag = StructTag::parse(r#"  json:"a"    xml:"b"  "#);
        assert_eq!(keys(&tag), vec!["json", "xml"]);
        assert!(tag.error().is_none());
    }

    #[test]
    fn test_value_with_spaces_and_escapes() {
        let tag = StructTag::parse(r#"doc:"a \"quoted\" value" json:"x""#);
        assert_eq!(tag.get("doc"), Some(r#"a "quoted" value"#));
        assert_eq!(tag.get("json"), Some("x"));
    }

    #[test]
    fn test_get_returns_first_match() {
        let tag = StructTag::parse(r#"json:"first" json:"second""#);
        assert_eq!(tag.get("json"), Some("first"));
        assert_eq!(tag.pairs().len(), 2);
    }

    #[test]
    fn test_empty_tag() {
        let tag = StructTag::parse("");
        assert!(tag.pairs().is_empty());
        assert!(tag.error().is_none());
        assert!(!tag.has_any(&["json"]));
    }

    #[test]
    fn test_key_containing_keyword_is_not_the_keyword() {
        let tag = StructTag::parse(r#"jsonschema:"x" xbinding:"required""#);
        assert!(!tag.has_any(&["json", "binding"]));
    }

    #[test]
    fn test_missing_value_stops_scan() {
        let tag = StructTag::parse(r#"json:"id" binding:required mediatypes:"video""#);
        assert_eq!(keys(&tag), vec!["json"]);
        assert_eq!(
            tag.error(),
            Some(&TagError::MissingValue {
                key: "binding".to_string()
            })
        );
    }

    #[test]
    fn test_missing_key() {
        let tag = StructTag::parse(r#":"x""#);
        assert_eq!(tag.error(), Some(&TagError::MissingKey { offset: 0 }));
    }

    #[test]
    fn test_unterminated_value() {
        let tag = StructTag::parse(r#"json:"open"#);
        assert!(tag.pairs().is_empty());
        assert_eq!(
            tag.error().map(ToString::to_string).as_deref(),
            Some("value for key 'json' is not terminated")
        );
    }

    #[test]
    fn test_invalid_escape() {
        let tag = StructTag::parse(r#"json:"a\qb""#);
        assert_eq!(
            tag.error(),
            Some(&TagError::InvalidValue {
                key: "json".to_string()
            })
        );
    }
}
