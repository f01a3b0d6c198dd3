//! Identifiers the bindings add to the package.

use super::variant::TemplateVariant;
use crate::source::{FieldDecl, SourceFile};
use autobindings_core::{Error, MediaTypeSet, Result};
use std::collections::HashMap;

/// Package-level names and methods generated for one struct.
///
/// # Examples
///
/// ```
/// use autobindings_codegen::render::{GeneratedNames, TemplateVariant};
/// use autobindings_core::MediaTypeSet;
///
/// let names = GeneratedNames::new("Asset", TemplateVariant::Specialized, &MediaTypeSet::default());
/// assert!(names.package_level.contains(&"AssetRestricted".to_string()));
/// assert!(names.package_level.contains(&"AssetVideoFields".to_string()));
/// assert!(names.methods.contains(&"AsVideo".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedNames {
    /// Variables and types, in the order they are emitted
    pub package_level: Vec<String>,
    /// Methods on the struct
    pub methods: Vec<String>,
}

impl GeneratedNames {
    /// Names generated for `struct_name` rendered with `variant`.
    #[must_use]
    pub fn new(struct_name: &str, variant: TemplateVariant, media_types: &MediaTypeSet) -> Self {
        let media = media_types.capitalized();

        let mut package_level = vec![
            format!("{struct_name}JSONKeys"),
            format!("{struct_name}RequiredOnCreate"),
            format!("{struct_name}RequiredOnUpdate"),
        ];
        package_level.extend(media.iter().map(|m| format!("{struct_name}{m}Fields")));
        package_level.push(format!("{struct_name}Restricted"));

        let mut methods: Vec<String> = ["Restricted", "JSONKey", "RequiredFields"]
            .map(String::from)
            .to_vec();

        if variant == TemplateVariant::Specialized {
            package_level.extend(media.iter().map(|m| format!("{struct_name}{m}")));
            methods.extend(media.iter().map(|m| format!("As{m}")));
            methods.push("FieldsFor".to_string());
        }

        Self {
            package_level,
            methods,
        }
    }
}

/// Checks that no generated identifier clashes with a declaration of the
/// input or with another generated identifier.
///
/// `variants` pairs up with `file.structs`. Checked are generated variables
/// and types against the input's package-level names and each other, and
/// generated methods against the struct's fields and its declared methods.
///
/// # Errors
///
/// Returns [`Error::RenderError`] naming the first clash found.
pub fn check_names(
    file: &SourceFile,
    variants: &[TemplateVariant],
    media_types: &MediaTypeSet,
) -> Result<()> {
    let mut owners: HashMap<String, String> = file
        .declared
        .iter()
        .map(|name| (name.clone(), "declared in the input".to_string()))
        .collect();

    for (decl, variant) in file.structs.iter().zip(variants) {
        let clash = |message: String| Error::RenderError {
            template: variant.template_name().to_string(),
            message,
        };
        let names = GeneratedNames::new(&decl.name, *variant, media_types);

        for name in &names.package_level {
            if let Some(owner) = owners.get(name) {
                return Err(clash(format!(
                    "{name} generated for {} is already {owner}",
                    decl.name
                )));
            }
            owners.insert(name.clone(), format!("generated for {}", decl.name));
        }

        let fields = decl.fields.iter().flat_map(field_names);
        for field in fields {
            if names.methods.iter().any(|m| m == field) {
                return Err(clash(format!(
                    "field {}.{field} has the name of a generated method",
                    decl.name
                )));
            }
        }

        let declared = file.methods.iter().filter(|m| m.receiver == decl.name);
        for method in declared {
            if names.methods.contains(&method.name) {
                return Err(clash(format!(
                    "method {}.{} is already declared in the input",
                    decl.name, method.name
                )));
            }
        }
    }

    Ok(())
}

/// Names a field declaration adds to its struct; an embedded field is named
/// after its type.
fn field_names(field: &FieldDecl) -> Vec<&str> {
    if !field.is_embedded() {
        return field.names.iter().map(String::as_str).collect();
    }
    let base = field.type_text.trim_start_matches('*');
    let base = base.split('[').next().unwrap_or(base);
    vec![base.rsplit('.').next().unwrap_or(base).trim()]
}
