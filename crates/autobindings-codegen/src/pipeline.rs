//! End-to-end generation: read, extract, build mappings, render, format,
//! write.

use crate::format::{SourceFormatter, formatter_for};
use crate::mapping::{MappingBuilder, MappingTable};
use crate::output::{output_path, write_atomic};
use crate::render::{BindingsRenderer, TemplateVariant};
use crate::source::parse_source;
use autobindings_core::{Error, GeneratorConfig, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Per-struct line of a [`GenerationReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructSummary {
    /// Struct name
    pub name: String,
    /// Template variant used
    pub variant: TemplateVariant,
    /// Number of mapped fields
    pub field_count: usize,
}

/// Formatted bindings source for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBindings {
    /// Package of the input
    pub package: String,
    /// Formatted Go source
    pub code: String,
    /// Rendered structs in declaration order
    pub structs: Vec<StructSummary>,
}

/// Outcome of a generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Input file
    pub input: PathBuf,
    /// Bindings file
    pub output: PathBuf,
    /// Package of the input
    pub package: String,
    /// Whether the output file was written
    pub written: bool,
    /// Rendered structs in declaration order
    pub structs: Vec<StructSummary>,
}

impl GenerationReport {
    /// Total number of mapped fields across all structs.
    #[must_use]
    pub fn total_fields(&self) -> usize {
        self.structs.iter().map(|s| s.field_count).sum()
    }
}

/// Runs the generator with one configuration.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::Generator;
/// use autobindings_core::GeneratorConfig;
///
/// let generator = Generator::new(GeneratorConfig::default())?;
/// let bindings = generator.generate_source(
///     "package models\n\ntype Item struct {\n\tTitle string `json:\"title\"`\n}\n",
///     "item.go",
/// )?;
/// assert_eq!(bindings.structs[0].name, "Item");
/// assert!(bindings.code.contains("\t\"Title\": \"title\",\n"));
/// # Ok::<(), autobindings_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Generator<'a> {
    config: GeneratorConfig,
    renderer: BindingsRenderer<'a>,
    formatter: Box<dyn SourceFormatter>,
}

impl Generator<'_> {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid, or
    /// [`Error::RenderError`] if the templates fail to register.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let renderer = BindingsRenderer::from_config(&config)?;
        let formatter = formatter_for(&config.format)?;
        Ok(Self {
            config,
            renderer,
            formatter,
        })
    }

    /// Replaces the formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Box<dyn SourceFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates formatted bindings from Go source text.
    ///
    /// `source_name` is the input file name recorded in the generated-code
    /// marker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`], [`Error::RenderError`] or
    /// [`Error::FormatError`] from the respective stage.
    pub fn generate_source(&self, source: &str, source_name: &str) -> Result<GeneratedBindings> {
        let file = parse_source(source)?;
        debug!(
            "Parsed package {} with {} structs",
            file.package,
            file.structs.len()
        );

        let builder = MappingBuilder::new(&self.config.media_types);
        let tables: Vec<MappingTable> = file.structs.iter().map(|s| builder.build_table(s)).collect();

        let rendered = self.renderer.render_file(source_name, &file, &tables)?;
        let code = self.formatter.format(&rendered)?;

        let structs = file
            .structs
            .iter()
            .zip(&tables)
            .map(|(decl, table)| StructSummary {
                name: decl.name.clone(),
                variant: self.renderer.variant_for(&decl.name),
                field_count: table.len(),
            })
            .collect();

        Ok(GeneratedBindings {
            package: file.package,
            code,
            structs,
        })
    }

    /// Generates bindings for `input` without writing them.
    ///
    /// Returns the path the bindings would be written to together with the
    /// bindings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an input name without an
    /// extension, [`Error::ReadFailed`] if the input cannot be read, or any
    /// error of [`Self::generate_source`].
    pub fn render_file(&self, input: &Path) -> Result<(PathBuf, GeneratedBindings)> {
        let output = output_path(input, &self.config.output)?;
        let source = fs::read_to_string(input).map_err(|source| Error::ReadFailed {
            path: input.to_path_buf(),
            source,
        })?;

        let source_name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bindings = self.generate_source(&source, &source_name)?;
        Ok((output, bindings))
    }

    /// Generates bindings for `input` and writes them next to it.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Self::render_file`], or [`Error::WriteFailed`]
    /// if the output cannot be written. Nothing is written on error.
    pub fn generate_file(&self, input: &Path) -> Result<GenerationReport> {
        info!("Generating bindings for {}", input.display());

        let (output, bindings) = self.render_file(input)?;
        write_atomic(&output, &bindings.code)?;

        info!(
            "Generated bindings for {} ({} structs) at {}",
            input.display(),
            bindings.structs.len(),
            output.display()
        );

        Ok(GenerationReport {
            input: input.to_path_buf(),
            output,
            package: bindings.package,
            written: true,
            structs: bindings.structs,
        })
    }
}
