//! Bindings renderer.

use super::context::{FileContext, StructContext};
use super::imports::required_imports;
use super::names::check_names;
use super::variant::{TemplateVariant, VariantSelector};
use crate::mapping::MappingTable;
use crate::source::{ImportSpec, SourceFile, StructDecl};
use crate::template_engine::{HEADER_TEMPLATE, TemplateEngine};
use autobindings_core::{GeneratorConfig, MediaTypeSet, RequirementRule, Result};
use tracing::debug;

/// Renders struct bindings through the Handlebars templates.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::mapping::MappingBuilder;
/// use autobindings_codegen::render::BindingsRenderer;
/// use autobindings_codegen::source::parse_source;
/// use autobindings_core::GeneratorConfig;
///
/// let file = parse_source("package models\ntype Item struct {\n\tTitle string\n}\n")?;
/// let config = GeneratorConfig::default();
/// let renderer = BindingsRenderer::from_config(&config)?;
/// let table = MappingBuilder::new(&config.media_types).build_table(&file.structs[0]);
///
/// let code = renderer.render_file("item.go", &file, &[table])?;
/// assert!(code.contains("package models"));
/// assert!(code.contains("var ItemJSONKeys"));
/// # Ok::<(), autobindings_core::Error>(())
/// ```
#[derive(Debug)]
pub struct BindingsRenderer<'a> {
    engine: TemplateEngine<'a>,
    selector: VariantSelector,
    media_types: MediaTypeSet,
    rule: RequirementRule,
}

impl BindingsRenderer<'_> {
    /// Creates a renderer.
    ///
    /// # Errors
    ///
    /// Returns [`autobindings_core::Error::RenderError`] if the templates fail
    /// to register.
    pub fn new(
        selector: VariantSelector,
        media_types: MediaTypeSet,
        rule: RequirementRule,
    ) -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
            selector,
            media_types,
            rule,
        })
    }

    /// Creates a renderer from generator settings.
    ///
    /// # Errors
    ///
    /// Returns [`autobindings_core::Error::RenderError`] if the templates fail
    /// to register.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        Self::new(
            VariantSelector::from_names(config.specialized_structs.clone()),
            config.media_types.clone(),
            config.requirement_rule,
        )
    }

    /// Returns the template variant used for `struct_name`.
    #[must_use]
    pub fn variant_for(&self, struct_name: &str) -> TemplateVariant {
        self.selector.select(struct_name)
    }

    /// Renders the bindings block of one struct.
    ///
    /// # Errors
    ///
    /// Returns [`autobindings_core::Error::RenderError`] if rendering fails.
    pub fn render_struct(&self, decl: &StructDecl, table: &MappingTable) -> Result<String> {
        let variant = self.variant_for(&decl.name);
        debug!(
            "Rendering {} with the {} template ({} fields)",
            decl.name,
            variant,
            table.len()
        );

        let context = StructContext::new(decl, table, &self.media_types, self.rule);
        self.engine.render(variant.template_name(), &context)
    }

    /// Renders the file header.
    ///
    /// # Errors
    ///
    /// Returns [`autobindings_core::Error::RenderError`] if rendering fails.
    pub fn render_header(
        &self,
        source_file: &str,
        package_name: &str,
        imports: impl IntoIterator<Item = ImportSpec>,
    ) -> Result<String> {
        let context = FileContext::new(source_file, package_name, imports);
        self.engine.render(HEADER_TEMPLATE, &context)
    }

    /// Renders a complete bindings file: header, then every struct of
    /// `file` in declaration order. `tables` pairs up with `file.structs`.
    ///
    /// # Errors
    ///
    /// Returns [`autobindings_core::Error::RenderError`] if a generated
    /// identifier clashes with a declaration of the input or with another
    /// generated identifier, if the imports clash, or if any block fails to
    /// render.
    pub fn render_file(
        &self,
        source_file: &str,
        file: &SourceFile,
        tables: &[MappingTable],
    ) -> Result<String> {
        let variants: Vec<TemplateVariant> = file
            .structs
            .iter()
            .map(|decl| self.variant_for(&decl.name))
            .collect();

        check_names(file, &variants, &self.media_types)?;
        let imports = required_imports(file, tables, &variants)?;
        debug!("Bindings for {source_file} import {} packages", imports.len());

        let mut out = self.render_header(source_file, &file.package, imports)?;
        for (decl, table) in file.structs.iter().zip(tables) {
            out.push('\n');
            out.push_str(&self.render_struct(decl, table)?);
        }
        Ok(out)
    }
}
