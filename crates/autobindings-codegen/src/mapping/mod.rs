//! Field mapping derivation.
//!
//! [`StructTag`] scans raw tag text into pairs, [`MappingBuilder`] turns the
//! `json`, `binding` and `mediatypes` pairs of each field into a
//! [`Mapping`], collected per struct in a [`MappingTable`].

mod builder;
mod tags;
mod types;

pub use builder::{BINDING_KEY, JSON_KEY, MEDIA_TYPES_KEY, MappingBuilder};
pub use tags::{StructTag, TagError, TagPair};
pub use types::{Mapping, MappingTable, restricted_tag};
