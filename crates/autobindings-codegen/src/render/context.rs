//! Template contexts.
//!
//! Everything inserted into the Go templates is prepared here: identifiers
//! verbatim, string values already quoted as Go literals.

use crate::mapping::{Mapping, MappingTable};
use crate::source::{ImportSpec, StructDecl, quote};
use autobindings_core::{MediaTypeSet, RequirementRule};
use serde::Serialize;

/// Context of the file header template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContext {
    /// File name of the input, for the generated-code marker
    pub source_file: String,
    /// Go package name
    pub package_name: String,
    /// Import specs as Go source, sorted by path
    pub imports: Vec<String>,
}

impl FileContext {
    /// Creates a header context importing `imports`.
    pub fn new(
        source_file: &str,
        package_name: &str,
        imports: impl IntoIterator<Item = ImportSpec>,
    ) -> Self {
        let mut imports: Vec<ImportSpec> = imports.into_iter().collect();
        imports.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.name.cmp(&b.name)));
        imports.dedup();

        Self {
            source_file: source_file.to_string(),
            package_name: package_name.to_string(),
            imports: imports.iter().map(ToString::to_string).collect(),
        }
    }
}

/// One field as the templates see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldContext {
    /// Field identifier
    pub name: String,
    /// Field name as a Go string literal
    pub name_literal: String,
    /// Declared type text
    pub type_text: String,
    /// Serialization key as a Go string literal
    pub json_key_literal: String,
    /// Restricted tag as a Go string literal, raw when possible
    pub restricted_tag_literal: String,
    /// `required` flag
    pub required: bool,
    /// `create` flag
    pub create: bool,
    /// `update` flag
    pub update: bool,
}

impl From<&Mapping> for FieldContext {
    fn from(mapping: &Mapping) -> Self {
        Self {
            name: mapping.name.clone(),
            name_literal: quote(&mapping.name),
            type_text: mapping.type_text.clone(),
            json_key_literal: quote(&mapping.json_tags),
            restricted_tag_literal: tag_literal(&mapping.restricted_tags),
            required: mapping.required,
            create: mapping.create,
            update: mapping.update,
        }
    }
}

/// Fields applicable to one media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaGroup {
    /// Configured label
    pub label: String,
    /// Lowercased label as a Go string literal
    pub label_literal: String,
    /// Label with its first character uppercased
    pub capitalized: String,
    /// Applicable fields in declaration order
    pub fields: Vec<FieldContext>,
}

/// Context of the struct bindings templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructContext {
    /// Struct name
    pub struct_name: String,
    /// Method receiver name
    pub variable_name: String,
    /// Type parameter list of a generic struct, or empty
    pub type_params: String,
    /// Matching type argument list, or empty
    pub type_args: String,
    /// All fields in declaration order
    pub fields: Vec<FieldContext>,
    /// Quoted names of the fields required on create
    pub required_on_create: Vec<String>,
    /// Quoted names of the fields required on update
    pub required_on_update: Vec<String>,
    /// One group per configured media type
    pub media_groups: Vec<MediaGroup>,
}

impl StructContext {
    /// Builds the context of `decl` from its mapping table.
    #[must_use]
    pub fn new(
        decl: &StructDecl,
        table: &MappingTable,
        media_types: &MediaTypeSet,
        rule: RequirementRule,
    ) -> Self {
        let names = |mappings: Vec<&Mapping>| -> Vec<String> {
            mappings.into_iter().map(|m| quote(&m.name)).collect()
        };

        let media_groups = media_types
            .iter()
            .map(|media| MediaGroup {
                label: media.as_str().to_string(),
                label_literal: quote(&media.as_str().to_lowercase()),
                capitalized: media.capitalized(),
                fields: table
                    .fields_for(media)
                    .into_iter()
                    .map(FieldContext::from)
                    .collect(),
            })
            .collect();

        Self {
            struct_name: decl.name.clone(),
            variable_name: receiver_name(&decl.name),
            type_params: decl
                .type_params
                .as_ref()
                .map(|p| p.text.clone())
                .unwrap_or_default(),
            type_args: decl
                .type_params
                .as_ref()
                .map(crate::source::TypeParams::arguments)
                .unwrap_or_default(),
            fields: table.iter().map(FieldContext::from).collect(),
            required_on_create: names(table.required_on_create(rule)),
            required_on_update: names(table.required_on_update(rule)),
            media_groups,
        }
    }
}

/// Receiver name for a struct's methods: its first character, lowercased.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::render::receiver_name;
///
/// assert_eq!(receiver_name("Asset"), "a");
/// assert_eq!(receiver_name("_internal"), "v");
/// ```
#[must_use]
pub fn receiver_name(struct_name: &str) -> String {
    match struct_name.chars().next() {
        None | Some('_') => "v".to_string(),
        Some(first) => first.to_lowercase().collect(),
    }
}

/// Quotes a struct tag, preferring a raw literal as gofmt'd code does.
fn tag_literal(tag: &str) -> String {
    if tag.contains('`') || tag.contains('\r') {
        quote(tag)
    } else {
        format!("`{tag}`")
    }
}
