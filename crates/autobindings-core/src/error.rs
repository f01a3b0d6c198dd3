//! Error types for autobindings.
//!
//! Every stage of a generator run has its own variant. All of them are fatal:
//! a run either writes a complete bindings file or nothing at all.
//!
//! # Examples
//!
//! ```
//! use autobindings_core::{Error, Result};
//!
//! fn check_suffix(suffix: &str) -> Result<()> {
//!     if suffix.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "output suffix cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_suffix("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for autobindings.
///
/// All errors in the workspace use this type, providing consistent error
/// handling across the generator and the CLI.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file could not be read.
    #[error("failed to read input file {}", path.display())]
    ReadFailed {
        /// Path of the input file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid Go source.
    ///
    /// Raised by the lexer and the declaration extractor. Line and column
    /// are 1-based.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Line of the offending token
        line: usize,
        /// Column of the offending token
        column: usize,
        /// Description of the syntax problem
        message: String,
    },

    /// A template could not be registered or rendered.
    #[error("template '{template}' failed: {message}")]
    RenderError {
        /// Name of the template
        template: String,
        /// Description of the failure
        message: String,
    },

    /// The rendered text could not be canonicalized.
    #[error("failed to format generated source: {message}")]
    FormatError {
        /// Description of the formatting failure
        message: String,
    },

    /// The output file could not be written.
    #[error("failed to write output file {}", path.display())]
    WriteFailed {
        /// Path of the output file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    ///
    /// Raised when a configuration file cannot be loaded or holds
    /// contradictory settings.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Invalid argument error.
    ///
    /// Raised when CLI arguments or function parameters are invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` if the input file could not be read.
    #[must_use]
    pub const fn is_read_error(&self) -> bool {
        matches!(self, Self::ReadFailed { .. })
    }

    /// Returns `true` if this is a parse error.
    ///
    /// # Examples
    ///
    /// ```
    /// use autobindings_core::Error;
    ///
    /// let err = Error::ParseError {
    ///     line: 3,
    ///     column: 14,
    ///     message: "expected '}'".to_string(),
    /// };
    /// assert!(err.is_parse_error());
    /// assert_eq!(err.to_string(), "parse error at 3:14: expected '}'");
    /// ```
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError { .. })
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_render_error(&self) -> bool {
        matches!(self, Self::RenderError { .. })
    }

    /// Returns `true` if this is a formatting error.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(self, Self::FormatError { .. })
    }

    /// Returns `true` if the output file could not be written.
    #[must_use]
    pub const fn is_write_error(&self) -> bool {
        matches!(self, Self::WriteFailed { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is an invalid argument error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Result type alias for autobindings operations.
pub type Result<T> = std::result::Result<T, Error>;
