//! Template engine for Go code generation using Handlebars.
//!
//! Provides a wrapper around Handlebars with the bindings templates
//! pre-registered. Templates run in strict mode with HTML escaping disabled:
//! every value inserted into the Go output is either an identifier, raw type
//! text, or a literal the renderer has already quoted.
//!
//! # Examples
//!
//! ```
//! use autobindings_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let engine = TemplateEngine::new()?;
//! let header = engine.render(
//!     "bindings_header",
//!     &json!({"source_file": "item.go", "package_name": "models", "imports": []}),
//! )?;
//! assert!(header.contains("package models"));
//! # Ok::<(), autobindings_core::Error>(())
//! ```

use autobindings_core::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Template producing the generated-code marker, package clause and imports.
pub const HEADER_TEMPLATE: &str = "bindings_header";

/// Template producing the bindings of an ordinary struct.
pub const GENERIC_TEMPLATE: &str = "bindings_generic";

/// Template producing the bindings of a media-aware struct.
pub const ASSET_TEMPLATE: &str = "bindings_asset";

/// Template engine for code generation.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`, allowing it to be used across
/// thread boundaries safely.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    /// Creates a new template engine with the bindings templates registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderError`] if template registration fails (should
    /// not happen with the built-in templates).
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut engine = Self { handlebars };
        engine.register_template_string(HEADER_TEMPLATE, include_str!("../templates/header.go.hbs"))?;
        engine.register_template_string(
            GENERIC_TEMPLATE,
            include_str!("../templates/generic.go.hbs"),
        )?;
        engine.register_template_string(ASSET_TEMPLATE, include_str!("../templates/asset.go.hbs"))?;

        Ok(engine)
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderError`] if:
    /// - Template name is not registered
    /// - Context cannot be serialized
    /// - A variable the template uses is missing from the context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        if !self.has_template(template_name) {
            return Err(Error::RenderError {
                template: template_name.to_string(),
                message: "template is not registered".to_string(),
            });
        }
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::RenderError {
                template: template_name.to_string(),
                message: e.to_string(),
            })
    }

    /// Registers a custom template, replacing any template of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderError`] if the template string is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use autobindings_codegen::template_engine::TemplateEngine;
    ///
    /// let mut engine = TemplateEngine::new()?;
    /// engine.register_template_string("custom", "// {{name}}")?;
    /// # Ok::<(), autobindings_core::Error>(())
    /// ```
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::RenderError {
                template: name.to_string(),
                message: format!("failed to register template: {e}"),
            })
    }

    /// Returns `true` if a template named `name` is registered.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}
