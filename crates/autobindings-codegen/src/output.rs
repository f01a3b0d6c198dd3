//! Output file naming and atomic writing.

use autobindings_core::{Error, NamingRule, OutputConfig, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Derives the bindings file name from an input file name.
///
/// - [`NamingRule::FirstDot`]: `<before first dot><suffix>.<between first and
///   second dot>`, so `a.b.go` becomes `a_bindings.b`
/// - [`NamingRule::LastDot`]: the suffix goes before the last extension, so
///   `a.b.go` becomes `a.b_bindings.go`
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the name has no `.`.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::output::output_file_name;
/// use autobindings_core::NamingRule;
///
/// assert_eq!(output_file_name("widget.go", "_bindings", NamingRule::FirstDot)?, "widget_bindings.go");
/// assert_eq!(output_file_name("a.b.go", "_bindings", NamingRule::FirstDot)?, "a_bindings.b");
/// assert_eq!(output_file_name("a.b.go", "_bindings", NamingRule::LastDot)?, "a.b_bindings.go");
/// # Ok::<(), autobindings_core::Error>(())
/// ```
pub fn output_file_name(file_name: &str, suffix: &str, rule: NamingRule) -> Result<String> {
    let split = match rule {
        NamingRule::FirstDot => file_name.split_once('.').map(|(stem, rest)| {
            let extension = rest.split('.').next().unwrap_or_default();
            (stem, extension)
        }),
        NamingRule::LastDot => file_name.rsplit_once('.'),
    };

    let (stem, extension) = split.ok_or_else(|| {
        Error::InvalidArgument(format!("input file name '{file_name}' has no extension"))
    })?;
    Ok(format!("{stem}{suffix}.{extension}"))
}

/// Derives the bindings path for `input`, next to it.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the path has no UTF-8 file name or
/// the file name has no `.`.
pub fn output_path(input: &Path, config: &OutputConfig) -> Result<PathBuf> {
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            Error::InvalidArgument(format!("'{}' is not a file path", input.display()))
        })?;

    let name = output_file_name(file_name, &config.suffix, config.naming)?;
    Ok(input.with_file_name(name))
}

/// Writes `content` to `path` atomically.
///
/// The content goes to a temporary file in the same directory, is synced, and
/// then renamed over `path`, so readers never see a partial file.
///
/// # Errors
///
/// Returns [`Error::WriteFailed`] if any step fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let write_failed = |source| Error::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_failed)?;
    temp.write_all(content.as_bytes()).map_err(write_failed)?;
    temp.as_file().sync_all().map_err(write_failed)?;
    temp.persist(path).map_err(|e| write_failed(e.error))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_first_dot_naming() {
        let name = |n: &str| output_file_name(n, "_bindings", NamingRule::FirstDot).unwrap();
        assert_eq!(name("widget.go"), "widget_bindings.go");
        assert_eq!(name("a.b.go"), "a_bindings.b");
        assert_eq!(name(".hidden.go"), "_bindings.hidden");
        assert_eq!(name("trailing."), "trailing_bindings.");
    }

    #[test]
    fn test_last_dot_naming() {
        let name = |n: &str| output_file_name(n, "_gen", NamingRule::LastDot).unwrap();
        assert_eq!(name("widget.go"), "widget_gen.go");
        assert_eq!(name("a.b.go"), "a.b_gen.go");
    }

    #[test]
    fn test_name_without_dot_rejected() {
        let err = output_file_name("Makefile", "_bindings", NamingRule::FirstDot).unwrap_err();
        assert!(err.is_invalid_argument());
        let err = output_file_name("Makefile", "_bindings", NamingRule::LastDot).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_output_path_keeps_directory() {
        let config = OutputConfig::default();
        let path = output_path(Path::new("./models.v2/asset.go"), &config).unwrap();
        assert_eq!(path, Path::new("./models.v2/asset_bindings.go"));
    }

    #[test]
    fn test_output_path_requires_file_name() {
        let err = output_path(Path::new("/"), &OutputConfig::default()).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out_bindings.go");

        fs::write(&path, "stale content that is longer").unwrap();
        write_atomic(&path, "package p\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "package p\n");
        let entries = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("out.go");
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(err.is_write_error());
    }
}
