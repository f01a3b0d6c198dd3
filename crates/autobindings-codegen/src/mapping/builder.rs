//! Mapping derivation from struct tags.

use super::tags::StructTag;
use super::types::{Mapping, MappingTable, restricted_tag};
use crate::source::StructDecl;
use autobindings_core::MediaTypeSet;
use tracing::{debug, warn};

/// Tag key carrying the serialization key.
pub const JSON_KEY: &str = "json";

/// Tag key carrying validation flags.
pub const BINDING_KEY: &str = "binding";

/// Tag key carrying the media-type override.
pub const MEDIA_TYPES_KEY: &str = "mediatypes";

/// Value of the `json` key that omits a field from serialization.
const OMIT_SENTINEL: &str = "-";

/// Field name that declares padding and cannot be read or assigned.
const BLANK_IDENTIFIER: &str = "_";

/// Derives [`Mapping`]s from field declarations.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::mapping::MappingBuilder;
/// use autobindings_core::MediaTypeSet;
///
/// let media = MediaTypeSet::default();
/// let builder = MappingBuilder::new(&media);
///
/// let m = builder.build_field(
///     "Rating",
///     "int",
///     Some(r#"mediatypes:"video" binding:"required,update""#),
/// );
/// assert_eq!(m.json_tags, "Rating");
/// assert_eq!(m.media_types, vec!["video"]);
/// assert!(m.required && m.update && !m.create);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MappingBuilder<'m> {
    media_types: &'m MediaTypeSet,
}

impl<'m> MappingBuilder<'m> {
    /// Creates a builder whose default media types are `media_types`.
    #[must_use]
    pub const fn new(media_types: &'m MediaTypeSet) -> Self {
        Self { media_types }
    }

    /// Derives the mapping of one named field.
    #[must_use]
    pub fn build_field(&self, name: &str, type_text: &str, tag: Option<&str>) -> Mapping {
        let mut mapping = Mapping::untagged(name, type_text, self.media_types);
        let Some(tag) = tag else {
            return mapping;
        };

        let tag = StructTag::parse(tag);
        if let Some(err) = tag.error() {
            warn!("Malformed tag on field {name}: {err}; ignoring the rest of the tag");
        }
        if !tag.has_any(&[JSON_KEY, BINDING_KEY, MEDIA_TYPES_KEY]) {
            return mapping;
        }

        if tag.get(JSON_KEY).is_some() {
            mapping.json_tags = String::new();
            mapping.restricted_tags = restricted_tag("");
        }

        for pair in tag.pairs() {
            match pair.key.as_str() {
                JSON_KEY => {
                    if pair.value == OMIT_SENTINEL {
                        continue;
                    }
                    let key = pair.value.split(',').next().unwrap_or_default();
                    let key = if key.is_empty() { name } else { key };
                    mapping.json_tags = key.to_string();
                    mapping.restricted_tags = restricted_tag(key);
                }
                BINDING_KEY => {
                    mapping.required = false;
                    mapping.create = false;
                    mapping.update = false;
                    for flag in pair.value.split(',').map(str::trim) {
                        match flag {
                            "required" => mapping.required = true,
                            "create" => mapping.create = true,
                            "update" => mapping.update = true,
                            _ => {}
                        }
                    }
                }
                MEDIA_TYPES_KEY => {
                    mapping.media_types = pair.value.split(',').map(str::to_string).collect();
                }
                _ => {}
            }
        }

        mapping
    }

    /// Derives the mapping table of a struct.
    ///
    /// Embedded and blank (`_`) fields are skipped. A declaration naming
    /// several fields yields one mapping per name.
    #[must_use]
    pub fn build_table(&self, decl: &StructDecl) -> MappingTable {
        let mut table = MappingTable::new();

        for field in &decl.fields {
            if field.is_embedded() {
                debug!(
                    "Skipping embedded field {} in {} (line {})",
                    field.type_text, decl.name, field.line
                );
                continue;
            }

            for name in &field.names {
                if name == BLANK_IDENTIFIER {
                    debug!("Skipping blank field in {} (line {})", decl.name, field.line);
                    continue;
                }
                let mapping = self.build_field(name, &field.type_text, field.tag.as_deref());
                debug!(
                    "{}.{}: key={:?} required={} create={} update={} media={:?}",
                    decl.name,
                    name,
                    mapping.json_tags,
                    mapping.required,
                    mapping.create,
                    mapping.update,
                    mapping.media_types
                );
                if table.insert(mapping).is_some() {
                    warn!("Field {}.{} declared twice, keeping the last declaration", decl.name, name);
                }
            }
        }

        table
    }
}
