//! Template variant selection.

use crate::template_engine::{ASSET_TEMPLATE, GENERIC_TEMPLATE};
use serde::Serialize;
use std::fmt;

/// Which bindings template a struct is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateVariant {
    /// Media-aware bindings: generic output plus per-media views and a
    /// `FieldsFor` dispatcher
    Specialized,
    /// Field tables, requirement lists and accessors only
    Generic,
}

impl TemplateVariant {
    /// Name of the registered template.
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Specialized => ASSET_TEMPLATE,
            Self::Generic => GENERIC_TEMPLATE,
        }
    }

    /// Go packages the rendered block imports.
    #[must_use]
    pub const fn imports(self) -> &'static [&'static str] {
        match self {
            Self::Specialized => &["strings"],
            Self::Generic => &[],
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Specialized => "specialized",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Chooses the [`TemplateVariant`] for a struct name.
///
/// Structs matching the predicate get [`TemplateVariant::Specialized`],
/// everything else [`TemplateVariant::Generic`]. The default selector matches
/// exactly `Asset`, case-sensitively.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::render::{TemplateVariant, VariantSelector};
///
/// let selector = VariantSelector::default();
/// assert_eq!(selector.select("Asset"), TemplateVariant::Specialized);
/// assert_eq!(selector.select("asset"), TemplateVariant::Generic);
///
/// let custom = VariantSelector::new(|name| name.ends_with("Media"));
/// assert_eq!(custom.select("StreamMedia"), TemplateVariant::Specialized);
/// ```
pub struct VariantSelector {
    predicate: Predicate,
}

impl VariantSelector {
    /// Creates a selector from a predicate over struct names.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
        }
    }

    /// Creates a selector matching exactly the given names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        Self::new(move |name| names.iter().any(|n| n == name))
    }

    /// Returns the variant for `struct_name`.
    #[must_use]
    pub fn select(&self, struct_name: &str) -> TemplateVariant {
        if (self.predicate)(struct_name) {
            TemplateVariant::Specialized
        } else {
            TemplateVariant::Generic
        }
    }
}

impl Default for VariantSelector {
    fn default() -> Self {
        Self::from_names(["Asset"])
    }
}

impl fmt::Debug for VariantSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantSelector").finish_non_exhaustive()
    }
}
