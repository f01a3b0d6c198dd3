//! Binding generation for Go structs.
//!
//! Reads a Go source file, derives a mapping per struct field from its
//! `json`, `binding` and `mediatypes` tags, and renders a companion
//! `_bindings` file with lookup tables, requirement lists and media-type
//! views.
//!
//! # Architecture
//!
//! ```text
//! source  ──► mapping ──► render ──► format ──► output
//! (lexer,     (tags,      (Handlebars  (canonicalizer  (naming,
//!  extract)    builder)    templates)   or command)     atomic write)
//! ```
//!
//! [`Generator`] runs the stages in order for one input file.
//!
//! # Examples
//!
//! ```no_run
//! use autobindings_codegen::Generator;
//! use autobindings_core::GeneratorConfig;
//! use std::path::Path;
//!
//! # fn example() -> autobindings_core::Result<()> {
//! let generator = Generator::new(GeneratorConfig::default())?;
//! let report = generator.generate_file(Path::new("models/asset.go"))?;
//! println!("wrote {}", report.output.display());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod format;
pub mod mapping;
pub mod output;
pub mod render;
pub mod source;
pub mod template_engine;

mod pipeline;

pub use pipeline::{GeneratedBindings, GenerationReport, Generator, StructSummary};
