//! Generator configuration.
//!
//! Every setting has a default matching the stock behaviour, so a missing
//! configuration file is never an error. Configuration is stored in TOML:
//!
//! ```toml
//! media_types = ["audio", "subtitle", "video"]
//! specialized_structs = ["Asset"]
//! requirement_rule = "all"
//!
//! [output]
//! suffix = "_bindings"
//! naming = "first-dot"
//!
//! [format]
//! command = ["gofmt"]
//! ```
//!
//! # Examples
//!
//! ```
//! use autobindings_core::{GeneratorConfig, NamingRule};
//!
//! let config = GeneratorConfig::from_toml_str("[output]\nnaming = \"last-dot\"\n")?;
//! assert_eq!(config.output.naming, NamingRule::LastDot);
//! assert_eq!(config.output.suffix, "_bindings");
//! # Ok::<(), autobindings_core::Error>(())
//! ```

use crate::{Error, MediaTypeSet, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// File name looked up next to the input file.
pub const CONFIG_FILE_NAME: &str = "autobindings.toml";

static GO_IDENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{Nd}_]*$").expect("valid regex"));

/// How the output file name is derived from the input file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingRule {
    /// Split on `.` and keep the first two parts: `a.b.go` becomes `a_bindings.b`.
    #[default]
    FirstDot,
    /// Insert the suffix before the last extension: `a.b.go` becomes `a.b_bindings.go`.
    LastDot,
}

/// How the required-on-create and required-on-update lists are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementRule {
    /// A field is listed when it is `required` and carries the operation flag.
    #[default]
    All,
    /// A field is listed when it is `required` or carries the operation flag.
    Any,
}

impl RequirementRule {
    /// Combines a field's `required` flag with an operation flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use autobindings_core::RequirementRule;
    ///
    /// assert!(!RequirementRule::All.applies(true, false));
    /// assert!(RequirementRule::Any.applies(true, false));
    /// assert!(RequirementRule::All.applies(true, true));
    /// ```
    #[must_use]
    pub const fn applies(self, required: bool, operation: bool) -> bool {
        match self {
            Self::All => required && operation,
            Self::Any => required || operation,
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Suffix inserted into the output file name
    pub suffix: String,

    /// File naming rule
    pub naming: NamingRule,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "_bindings".to_string(),
            naming: NamingRule::default(),
        }
    }
}

/// Formatter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    /// External formatter command and arguments.
    ///
    /// The generated text is piped to its stdin and read back from its
    /// stdout. Empty selects the built-in canonicalizer.
    pub command: Vec<String>,
}

/// Complete generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Full media-type set, in emission order
    pub media_types: MediaTypeSet,

    /// Struct names rendered with the specialized template
    pub specialized_structs: Vec<String>,

    /// Rule for the required-on-create/update lists
    pub requirement_rule: RequirementRule,

    /// Output file settings
    pub output: OutputConfig,

    /// Formatter settings
    pub format: FormatConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            media_types: MediaTypeSet::default(),
            specialized_structs: vec!["Asset".to_string()],
            requirement_rule: RequirementRule::default(),
            output: OutputConfig::default(),
            format: FormatConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parses and validates a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the document is not valid TOML,
    /// contains unknown keys, or fails [`validate`](Self::validate).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::ConfigError {
            message: format!("invalid configuration: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Resolves the configuration for an input file.
    ///
    /// Lookup order:
    /// 1. `explicit` path, if given (must exist)
    /// 2. `autobindings.toml` next to the input file
    /// 3. `autobindings/config.toml` in the user configuration directory
    /// 4. built-in defaults
    ///
    /// Returns the configuration and the file it came from, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a located file cannot be loaded.
    pub fn discover(explicit: Option<&Path>, input: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let beside_input = input
            .parent()
            .map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), |p| p.join(CONFIG_FILE_NAME));
        let user_config = dirs::config_dir().map(|d| d.join("autobindings").join("config.toml"));

        for candidate in std::iter::once(beside_input).chain(user_config) {
            if candidate.is_file() {
                return Ok((Self::load(&candidate)?, Some(candidate)));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok((Self::default(), None))
    }

    /// Checks settings that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if:
    /// - the media-type list is empty, or a label is not a Go identifier
    /// - two media-type labels differ only in case
    /// - a specialized struct name is not a Go identifier
    /// - the output suffix is empty or contains a path separator or `.`
    /// - the formatter command has an empty program name
    pub fn validate(&self) -> Result<()> {
        if self.media_types.is_empty() {
            return Err(Error::ConfigError {
                message: "media_types cannot be empty".to_string(),
            });
        }

        let mut seen = Vec::with_capacity(self.media_types.len());
        for media in self.media_types.iter() {
            if !GO_IDENT_REGEX.is_match(media.as_str()) {
                return Err(Error::ConfigError {
                    message: format!("media type '{media}' is not a valid Go identifier"),
                });
            }
            let folded = media.as_str().to_lowercase();
            if seen.contains(&folded) {
                return Err(Error::ConfigError {
                    message: format!("media type '{media}' is listed more than once"),
                });
            }
            seen.push(folded);
        }

        for name in &self.specialized_structs {
            if !GO_IDENT_REGEX.is_match(name) {
                return Err(Error::ConfigError {
                    message: format!("specialized struct '{name}' is not a valid Go identifier"),
                });
            }
        }

        let suffix = &self.output.suffix;
        if suffix.is_empty() || suffix.contains(['/', '\\', '.']) {
            return Err(Error::ConfigError {
                message: format!("output suffix '{suffix}' must be non-empty and contain no '/', '\\' or '.'"),
            });
        }

        if self.format.command.first().is_some_and(|program| program.trim().is_empty()) {
            return Err(Error::ConfigError {
                message: "format command has an empty program name".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.media_types, MediaTypeSet::default());
        assert_eq!(config.specialized_structs, vec!["Asset"]);
        assert_eq!(config.requirement_rule, RequirementRule::All);
        assert_eq!(config.output.suffix, "_bindings");
        assert_eq!(config.output.naming, NamingRule::FirstDot);
        assert!(config.format.command.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_full_document() {
        let content = r#"
media_types = ["image", "video"]
specialized_structs = ["Asset", "Track"]
requirement_rule = "any"

[output]
suffix = "_gen"
naming = "last-dot"

[format]
command = ["gofmt", "-s"]
"#;
        let config = GeneratorConfig::from_toml_str(content).unwrap();
        assert_eq!(config.media_types.labels(), vec!["image", "video"]);
        assert_eq!(config.specialized_structs, vec!["Asset", "Track"]);
        assert_eq!(config.requirement_rule, RequirementRule::Any);
        assert_eq!(config.output.suffix, "_gen");
        assert_eq!(config.output.naming, NamingRule::LastDot);
        assert_eq!(config.format.command, vec!["gofmt", "-s"]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = GeneratorConfig::from_toml_str("mediatypes = [\"audio\"]").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_empty_media_types_rejected() {
        let err = GeneratorConfig::from_toml_str("media_types = []").unwrap_err();
        assert!(err.to_string().contains("media_types cannot be empty"));
    }

    #[test]
    fn test_invalid_media_label_rejected() {
        assert!(GeneratorConfig::from_toml_str(r#"media_types = ["audio", "sub title"]"#).is_err());
        assert!(GeneratorConfig::from_toml_str(r#"media_types = [""]"#).is_err());
    }

    #[test]
    fn test_duplicate_media_label_rejected() {
        let err = GeneratorConfig::from_toml_str(r#"media_types = ["video", "Video"]"#).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_invalid_specialized_name_rejected() {
        assert!(GeneratorConfig::from_toml_str(r#"specialized_structs = ["9Asset"]"#).is_err());
    }

    #[test]
    fn test_invalid_suffix_rejected() {
        for suffix in ["", "_a.b", "dir/x"] {
            let content = format!("[output]\nsuffix = \"{suffix}\"\n");
            assert!(
                GeneratorConfig::from_toml_str(&content).is_err(),
                "suffix {suffix:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_format_program_rejected() {
        let err = GeneratorConfig::from_toml_str("[format]\ncommand = [\" \"]\n").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_requirement_rule_applies() {
        assert!(RequirementRule::All.applies(true, true));
        assert!(!RequirementRule::All.applies(false, true));
        assert!(!RequirementRule::All.applies(true, false));
        assert!(RequirementRule::Any.applies(false, true));
        assert!(RequirementRule::Any.applies(true, false));
        assert!(!RequirementRule::Any.applies(false, false));
    }

    #[test]
    fn test_discover_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "requirement_rule = \"any\"\n").unwrap();

        let (config, source) =
            GeneratorConfig::discover(Some(&path), &temp.path().join("models.go")).unwrap();
        assert_eq!(config.requirement_rule, RequirementRule::Any);
        assert_eq!(source, Some(path));
    }

    #[test]
    fn test_discover_missing_explicit_path_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        let result = GeneratorConfig::discover(Some(&missing), &temp.path().join("models.go"));
        assert!(result.unwrap_err().is_config_error());
    }

    #[test]
    fn test_discover_beside_input() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[output]\nnaming = \"last-dot\"\n",
        )
        .unwrap();

        let (config, source) =
            GeneratorConfig::discover(None, &temp.path().join("models.go")).unwrap();
        assert_eq!(config.output.naming, NamingRule::LastDot);
        assert_eq!(source, Some(temp.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "media_types = [").unwrap();
        assert!(GeneratorConfig::load(&path).unwrap_err().is_config_error());
    }
}
