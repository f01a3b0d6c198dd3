//! Media-type labels.
//!
//! A field applies to a set of media types. The full set is configuration,
//! not process-wide state: it is built once from [`GeneratorConfig`] and
//! passed to the mapping builder and the renderer.
//!
//! [`GeneratorConfig`]: crate::GeneratorConfig
//!
//! # Examples
//!
//! ```
//! use autobindings_core::{MediaType, MediaTypeSet};
//!
//! let set = MediaTypeSet::default();
//! assert_eq!(set.labels(), vec!["audio", "subtitle", "video"]);
//!
//! let video = MediaType::new("video");
//! assert_eq!(video.capitalized(), "Video");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Labels of the default media-type set, in order.
const DEFAULT_MEDIA_TYPES: [&str; 3] = ["audio", "subtitle", "video"];

/// A single media-type label (newtype over String).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaType(String);

impl MediaType {
    /// Creates a new media-type label.
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the label with its first character upper-cased.
    ///
    /// Used to build Go identifiers such as `AssetVideoFields`.
    ///
    /// # Examples
    ///
    /// ```
    /// use autobindings_core::MediaType;
    ///
    /// assert_eq!(MediaType::new("subtitle").capitalized(), "Subtitle");
    /// assert_eq!(MediaType::new("").capitalized(), "");
    /// ```
    #[must_use]
    pub fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }

    /// Case-insensitive comparison against another label.
    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        self.0.to_lowercase() == label.to_lowercase()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MediaType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Ordered set of media-type labels.
///
/// Order is significant: it is the order in which per-media-type field
/// lists are emitted and the order a field's default media types take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaTypeSet(Vec<MediaType>);

impl MediaTypeSet {
    /// Creates a set from the given labels, keeping their order.
    #[must_use]
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<MediaType>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Returns the labels as owned strings, in order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|m| m.as_str().to_string()).collect()
    }

    /// Returns the capitalized labels, in order.
    #[must_use]
    pub fn capitalized(&self) -> Vec<String> {
        self.0.iter().map(MediaType::capitalized).collect()
    }

    /// Iterates over the media types.
    pub fn iter(&self) -> impl Iterator<Item = &MediaType> {
        self.0.iter()
    }

    /// Returns the number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set holds no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for MediaTypeSet {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_TYPES)
    }
}
