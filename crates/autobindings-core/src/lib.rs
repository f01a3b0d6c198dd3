//! Core types, configuration, and errors for autobindings.
//!
//! This crate provides the foundational types shared by the code generator
//! and the command-line interface.
//!
//! # Architecture
//!
//! The core consists of:
//! - Error hierarchy covering every fatal stage of a generator run
//! - Generator configuration (media types, template selection, output naming)
//! - The media-type label set passed explicitly through the pipeline
//! - CLI exit codes and output formats

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod media;

pub mod cli;

pub use config::{
    CONFIG_FILE_NAME, FormatConfig, GeneratorConfig, NamingRule, OutputConfig, RequirementRule,
};
pub use error::{Error, Result};
pub use media::{MediaType, MediaTypeSet};
