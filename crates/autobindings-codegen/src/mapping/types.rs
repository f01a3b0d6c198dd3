//! Mapping records and per-struct mapping tables.

use crate::source::quote;
use autobindings_core::{MediaType, MediaTypeSet, RequirementRule};
use indexmap::IndexMap;
use serde::Serialize;

/// Derived binding information for one struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    /// Field identifier
    pub name: String,
    /// Source text of the declared type
    pub type_text: String,
    /// Serialization key
    pub json_tags: String,
    /// Restricted-form tag text, always `json:"<key>"`
    pub restricted_tags: String,
    /// `required` validation flag
    pub required: bool,
    /// `create` validation flag
    pub create: bool,
    /// `update` validation flag
    pub update: bool,
    /// Applicable media-type labels
    pub media_types: Vec<String>,
}

impl Mapping {
    /// Mapping for a field without a usable tag: keyed by its own name and
    /// applicable to every media type.
    #[must_use]
    pub fn untagged(name: &str, type_text: &str, media_types: &MediaTypeSet) -> Self {
        Self {
            name: name.to_string(),
            type_text: type_text.to_string(),
            json_tags: name.to_string(),
            restricted_tags: restricted_tag(name),
            required: false,
            create: false,
            update: false,
            media_types: media_types.labels(),
        }
    }

    /// Returns `true` if `media` is one of the field's media types, ignoring
    /// case.
    ///
    /// # Examples
    ///
    /// ```
    /// use autobindings_codegen::mapping::Mapping;
    /// use autobindings_core::{MediaType, MediaTypeSet};
    ///
    /// let mapping = Mapping::untagged("Title", "string", &MediaTypeSet::default());
    /// assert!(mapping.has_media_type(&MediaType::new("Video")));
    /// assert!(!mapping.has_media_type(&MediaType::new("image")));
    /// ```
    #[must_use]
    pub fn has_media_type(&self, media: &MediaType) -> bool {
        self.media_types.iter().any(|label| media.matches(label))
    }

    /// Whether the field is required when creating, under `rule`.
    #[must_use]
    pub const fn required_on_create(&self, rule: RequirementRule) -> bool {
        rule.applies(self.required, self.create)
    }

    /// Whether the field is required when updating, under `rule`.
    #[must_use]
    pub const fn required_on_update(&self, rule: RequirementRule) -> bool {
        rule.applies(self.required, self.update)
    }
}

/// Builds the restricted-form tag for a serialization key.
#[must_use]
pub fn restricted_tag(key: &str) -> String {
    format!("json:{}", quote(key))
}

/// Ordered `field name → Mapping` table of one struct.
///
/// Inserting a name that is already present replaces its mapping but keeps
/// the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MappingTable(IndexMap<String, Mapping>);

impl MappingTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping, returning the one it replaced.
    pub fn insert(&mut self, mapping: Mapping) -> Option<Mapping> {
        self.0.insert(mapping.name.clone(), mapping)
    }

    /// Looks up a mapping by field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Mapping> {
        self.0.get(name)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the table has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mappings in field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.0.values()
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Fields required when creating.
    #[must_use]
    pub fn required_on_create(&self, rule: RequirementRule) -> Vec<&Mapping> {
        self.iter().filter(|m| m.required_on_create(rule)).collect()
    }

    /// Fields required when updating.
    #[must_use]
    pub fn required_on_update(&self, rule: RequirementRule) -> Vec<&Mapping> {
        self.iter().filter(|m| m.required_on_update(rule)).collect()
    }

    /// Fields applicable to a media type.
    #[must_use]
    pub fn fields_for(&self, media: &MediaType) -> Vec<&Mapping> {
        self.iter().filter(|m| m.has_media_type(media)).collect()
    }
}

impl<'a> IntoIterator for &'a MappingTable {
    type Item = &'a Mapping;
    type IntoIter = indexmap::map::Values<'a, String, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(name: &str, required: bool, create: bool, update: bool) -> Mapping {
        Mapping {
            required,
            create,
            update,
            ..Mapping::untagged(name, "string", &MediaTypeSet::default())
        }
    }

    #[test]
    fn test_untagged_defaults() {
        let m = Mapping::untagged("Title", "string", &MediaTypeSet::default());
        assert_eq!(m.json_tags, "Title");
        assert_eq!(m.restricted_tags, r#"json:"Title""#);
        assert_eq!(m.media_types, vec!["audio", "subtitle", "video"]);
        assert!(!m.required && !m.create && !m.update);
    }

    #[test]
    fn test_has_media_type_ignores_case() {
        let m = Mapping {
            media_types: vec!["VIDEO".to_string()],
            ..Mapping::untagged("A", "int", &MediaTypeSet::default())
        };
        assert!(m.has_media_type(&MediaType::new("video")));
        assert!(m.has_media_type(&MediaType::new("Video")));
        assert!(!m.has_media_type(&MediaType::new("audio")));
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut table = MappingTable::new();
        table.insert(mapping("A", false, false, false));
        table.insert(mapping("B", false, false, false));
        let replaced = table.insert(mapping("A", true, false, false));

        assert!(replaced.is_some_and(|m| !m.required));
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(table.get("A").is_some_and(|m| m.required));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_requirement_rules() {
        let mut table = MappingTable::new();
        table.insert(mapping("Both", true, true, false));
        table.insert(mapping("CreateOnly", false, true, false));
        table.insert(mapping("RequiredUpdate", true, false, true));

        let names = |v: Vec<&Mapping>| v.iter().map(|m| m.name.clone()).collect::<Vec<_>>();

        assert_eq!(names(table.required_on_create(RequirementRule::All)), vec!["Both"]);
        assert_eq!(
            names(table.required_on_create(RequirementRule::Any)),
            vec!["Both", "CreateOnly", "RequiredUpdate"]
        );
        assert_eq!(
            names(table.required_on_update(RequirementRule::All)),
            vec!["RequiredUpdate"]
        );
        assert_eq!(
            names(table.required_on_update(RequirementRule::Any)),
            vec!["Both", "RequiredUpdate"]
        );
    }

    #[test]
    fn test_fields_for() {
        let mut table = MappingTable::new();
        table.insert(Mapping {
            media_types: vec!["video".to_string()],
            ..mapping("Resolution", false, false, false)
        });
        table.insert(mapping("Title", false, false, false));

        let video: Vec<_> = table.fields_for(&MediaType::new("Video")).iter().map(|m| m.name.as_str()).collect();
        let audio: Vec<_> = table.fields_for(&MediaType::new("audio")).iter().map(|m| m.name.as_str()).collect();
        assert_eq!(video, vec!["Resolution", "Title"]);
        assert_eq!(audio, vec!["Title"]);
    }

    #[test]
    fn test_serializes_in_order() {
        let mut table = MappingTable::new();
        table.insert(mapping("Z", false, false, false));
        table.insert(mapping("A", false, false, false));
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.find("\"Z\"").unwrap() < json.find("\"A\"").unwrap());
    }
}
