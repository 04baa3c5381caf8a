//! Schema module - embedded JSON schemas, validation and templates

pub mod registry;
pub mod template;
pub mod validator;

pub use registry::SchemaRegistry;
pub use template::{TemplateError, TemplateGenerator};
pub use validator::{SchemaError, Validator, Violation};
