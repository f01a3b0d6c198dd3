//! Output formatters for the run summary.
//!
//! Supports JSON, plain text, and pretty output modes.

use anyhow::Result;
use autobindings_core::cli::OutputFormat;
use colored::Colorize;
use serde::Serialize;

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Examples
///
/// ```
/// use autobindings_cli::formatters::format_output;
/// use autobindings_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     output: String,
///     struct_count: usize,
/// }
///
/// let summary = Summary {
///     output: "asset_bindings.go".to_string(),
///     struct_count: 2,
/// };
///
/// let output = format_output(&summary, OutputFormat::Json)?;
/// assert!(output.contains("\"struct_count\": 2"));
///
/// let output = format_output(&summary, OutputFormat::Text)?;
/// assert_eq!(output, "output: asset_bindings.go\nstruct_count: 2");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize};
    use serde_json::Value;

    /// Format data as `path: value` lines.
    ///
    /// Nested keys are joined with `.` and array items are addressed by
    /// index, so every line can be matched with `grep`. Strings are written
    /// unquoted; `null` values and empty collections are written literally.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten(&value, "", &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(value: &Value, path: &str, lines: &mut Vec<String>) {
        match value {
            Value::Object(obj) if !obj.is_empty() => {
                for (key, val) in obj {
                    flatten(val, &join(path, key), lines);
                }
            }
            Value::Array(arr) if !arr.is_empty() => {
                for (i, item) in arr.iter().enumerate() {
                    flatten(item, &join(path, &i.to_string()), lines);
                }
            }
            Value::String(s) => lines.push(line(path, s)),
            other => lines.push(line(path, &other.to_string())),
        }
    }

    fn join(path: &str, key: &str) -> String {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    }

    fn line(path: &str, value: &str) -> String {
        if path.is_empty() {
            value.to_string()
        } else {
            format!("{path}: {value}")
        }
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};

    /// Format data as colorized, indented output.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        Ok(format_value(&value, 0))
    }

    fn format_value(value: &serde_json::Value, indent: usize) -> String {
        use serde_json::Value;

        let indent_str = "  ".repeat(indent);

        match value {
            Value::Null => "none".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            Value::Array(arr) => {
                if arr.is_empty() {
                    return "[]".to_string();
                }

                let mut result = String::new();
                for item in arr {
                    result.push('\n');
                    result.push_str(&indent_str);
                    result.push_str("- ");
                    result.push_str(format_value(item, indent + 1).trim_start());
                }
                result
            }
            Value::Object(obj) => {
                if obj.is_empty() {
                    return "{}".to_string();
                }

                let mut result = String::new();
                for (i, (key, val)) in obj.iter().enumerate() {
                    if indent > 0 || i > 0 {
                        result.push('\n');
                        result.push_str(&indent_str);
                    }
                    result.push_str(&key.blue().bold().to_string());
                    result.push(':');
                    let rendered = format_value(val, indent + 1);
                    if !rendered.starts_with('\n') {
                        result.push(' ');
                    }
                    result.push_str(&rendered);
                }
                result
            }
        }
    }
}
