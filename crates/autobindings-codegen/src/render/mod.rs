//! Template rendering of struct bindings.

mod context;
mod generator;
mod imports;
mod names;
mod variant;

pub use context::{FieldContext, FileContext, MediaGroup, StructContext, receiver_name};
pub use generator::BindingsRenderer;
pub use imports::required_imports;
pub use names::{GeneratedNames, check_names};
pub use variant::{TemplateVariant, VariantSelector};
