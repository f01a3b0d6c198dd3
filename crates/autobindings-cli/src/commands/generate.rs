//! Generate command implementation.
//!
//! Generates the bindings file for one Go source file:
//! 1. Resolves the configuration (explicit path, file beside the input,
//!    user config directory, or defaults)
//! 2. Extracts struct declarations and builds field mappings
//! 3. Renders and formats the bindings
//! 4. Writes the output file next to the input, or prints it to stdout

use anyhow::{Context, Result};
use autobindings_codegen::{GenerationReport, Generator, StructSummary};
use autobindings_core::GeneratorConfig;
use autobindings_core::cli::{ExitCode, OutputFormat};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::formatters::format_output;

/// Result of a generate run, as shown to the user.
#[derive(Debug, Serialize)]
pub struct GenerationResult {
    /// Input Go file
    pub input: String,
    /// Bindings file
    pub output: String,
    /// Package of the input
    pub package: String,
    /// Configuration file that was applied, if any
    pub config: Option<String>,
    /// Whether the bindings file was written
    pub written: bool,
    /// Number of structs with bindings
    pub struct_count: usize,
    /// Number of mapped fields across all structs
    pub field_count: usize,
    /// Per-struct summary in declaration order
    pub structs: Vec<StructSummary>,
}

impl GenerationResult {
    fn from_report(report: GenerationReport, config: Option<&Path>) -> Self {
        let field_count = report.total_fields();
        Self {
            input: report.input.display().to_string(),
            output: report.output.display().to_string(),
            package: report.package,
            config: config.map(|p| p.display().to_string()),
            written: report.written,
            struct_count: report.structs.len(),
            field_count,
            structs: report.structs,
        }
    }
}

/// Runs the generate command.
///
/// With `to_stdout` set, the bindings are printed instead of written and no
/// summary is shown.
///
/// # Arguments
///
/// * `input` - Go source file to process
/// * `config_path` - Explicit configuration file, overriding discovery
/// * `to_stdout` - Print the bindings instead of writing the output file
/// * `output_format` - Format of the run summary (json, text, pretty)
///
/// # Errors
///
/// Returns an error if:
/// - The configuration cannot be loaded or is invalid
/// - The input cannot be read or parsed
/// - Rendering or formatting fails
/// - The output file cannot be written
///
/// # Examples
///
/// ```no_run
/// use autobindings_cli::commands::generate;
/// use autobindings_core::cli::{ExitCode, OutputFormat};
/// use std::path::Path;
///
/// let code = generate::run(Path::new("models/asset.go"), None, false, OutputFormat::Json)?;
/// assert_eq!(code, ExitCode::SUCCESS);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn run(
    input: &Path,
    config_path: Option<&Path>,
    to_stdout: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let (config, source) = GeneratorConfig::discover(config_path, input)
        .context("failed to load configuration")?;
    match &source {
        Some(path) => info!("Using configuration from {}", path.display()),
        None => debug!("Using built-in configuration"),
    }

    let generator = Generator::new(config).context("invalid configuration")?;

    if to_stdout {
        let (output, bindings) = generator
            .render_file(input)
            .with_context(|| format!("failed to generate bindings for {}", input.display()))?;
        debug!(
            "Rendered {} struct(s) for {} without writing",
            bindings.structs.len(),
            output.display()
        );
        print!("{}", bindings.code);
        return Ok(ExitCode::SUCCESS);
    }

    let report = generator
        .generate_file(input)
        .with_context(|| format!("failed to generate bindings for {}", input.display()))?;

    let result = GenerationResult::from_report(report, source.as_deref());
    let formatted = format_output(&result, output_format)?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}
