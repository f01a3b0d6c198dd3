//! autobindings CLI.
//!
//! Generates JSON-key, restricted-tag and required-field bindings for the
//! structs declared in a Go source file.
//!
//! # Examples
//!
//! ```bash
//! # Write models/asset_bindings.go
//! autobindings models/asset.go
//!
//! # Preview the bindings without writing them
//! autobindings models/asset.go --stdout
//!
//! # Use an explicit configuration and a JSON summary
//! autobindings models/asset.go --config autobindings.toml --format json
//! ```

use anyhow::Result;
use autobindings_cli::commands::generate;
use autobindings_core::cli::{ExitCode, OutputFormat};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Generate Go bindings from struct tags.
///
/// Reads the structs of INPUT and writes their bindings to a sibling file
/// named after the input (`asset.go` becomes `asset_bindings.go`).
#[derive(Parser, Debug)]
#[command(name = "autobindings")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Go source file to generate bindings for
    input: Option<PathBuf>,

    /// Configuration file (default: autobindings.toml beside INPUT, then the
    /// user configuration directory)
    #[arg(short, long, env = "AUTOBINDINGS_CONFIG")]
    config: Option<PathBuf>,

    /// Print the bindings to stdout instead of writing the output file
    #[arg(long)]
    stdout: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Output format of the run summary (json, text, pretty)
    #[arg(long = "format", default_value = "pretty")]
    format: String,
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let exit_code = match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:?}");
            exit_code_for(&err)
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Initializes the tracing subscriber on stderr.
///
/// Verbose mode forces debug level; otherwise `RUST_LOG` is honored with an
/// `info` default.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Runs the command described by the parsed arguments.
fn execute(cli: Cli) -> Result<ExitCode> {
    let Some(input) = cli.input else {
        info!("Usage: autobindings <INPUT>");
        info!("Example: autobindings models/asset.go");
        return Ok(ExitCode::SUCCESS);
    };

    let output_format: OutputFormat = cli.format.parse()?;
    generate::run(&input, cli.config.as_deref(), cli.stdout, output_format)
}

/// Maps a failed run to its exit code.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    err.downcast_ref::<autobindings_core::Error>()
        .map_or(ExitCode::ERROR, ExitCode::for_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cli_parsing_input() {
        let cli = Cli::parse_from(["autobindings", "models/asset.go"]);

        assert_eq!(cli.input.as_deref(), Some(Path::new("models/asset.go")));
        assert!(cli.config.is_none());
        assert!(!cli.stdout);
        assert!(!cli.verbose);
        assert_eq!(cli.format, "pretty");
    }

    #[test]
    fn test_cli_parsing_no_input() {
        let cli = Cli::parse_from(["autobindings"]);
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_cli_parsing_all_flags() {
        let cli = Cli::parse_from([
            "autobindings",
            "asset.go",
            "--config",
            "custom.toml",
            "--stdout",
            "-v",
            "--format",
            "json",
        ]);

        assert_eq!(cli.config.as_deref(), Some(Path::new("custom.toml")));
        assert!(cli.stdout);
        assert!(cli.verbose);
        assert_eq!(cli.format, "json");
    }

    #[test]
    fn test_cli_rejects_second_input() {
        let result = Cli::try_parse_from(["autobindings", "a.go", "b.go"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_execute_without_input_succeeds() {
        let cli = Cli::parse_from(["autobindings"]);
        let code = execute(cli).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_execute_without_input_ignores_format() {
        let cli = Cli::parse_from(["autobindings", "--format", "yaml"]);
        let code = execute(cli).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_execute_invalid_format() {
        let cli = Cli::parse_from(["autobindings", "asset.go", "--format", "yaml"]);
        let err = execute(cli).unwrap_err();

        assert!(err.to_string().contains("invalid output format"));
        assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
    }

    #[test]
    fn test_exit_code_for_foreign_error() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&err), ExitCode::ERROR);
    }

    #[test]
    fn test_exit_code_for_context_wrapped_error() {
        let err = anyhow::Error::from(autobindings_core::Error::ParseError {
            line: 1,
            column: 1,
            message: "expected 'package'".to_string(),
        })
        .context("failed to generate bindings for asset.go");

        assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
    }
}
