//! Schema validation of entity files

use miette::{Diagnostic, NamedSource};
use thiserror::Error;

use crate::core::EntityPrefix;
use crate::schema::registry::SchemaRegistry;
use crate::yaml::{parse_yaml, YamlError};

/// One schema violation
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON pointer into the document ("/current_stock"), empty for the root
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    #[error("{filename} does not match the {entity} schema:\n{}", format_violations(.violations))]
    #[diagnostic(code(minv::schema::invalid))]
    Invalid {
        filename: String,
        entity: EntityPrefix,
        violations: Vec<Violation>,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("No schema registered for {0}")]
    MissingSchema(EntityPrefix),

    #[error("Embedded schema for {prefix} is broken: {message}")]
    BrokenSchema { prefix: EntityPrefix, message: String },
}

impl SchemaError {
    pub fn violation_count(&self) -> usize {
        match self {
            SchemaError::Invalid { violations, .. } => violations.len(),
            _ => 1,
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validates YAML documents against the registered schemas
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validate `content` and return the parsed document
    pub fn validate(
        &self,
        content: &str,
        filename: &str,
        prefix: EntityPrefix,
    ) -> Result<serde_json::Value, SchemaError> {
        let schema_src = self
            .registry
            .get(prefix)
            .ok_or(SchemaError::MissingSchema(prefix))?;
        let schema: serde_json::Value =
            serde_json::from_str(schema_src).map_err(|e| SchemaError::BrokenSchema {
                prefix,
                message: e.to_string(),
            })?;
        let compiled = jsonschema::validator_for(&schema).map_err(|e| SchemaError::BrokenSchema {
            prefix,
            message: e.to_string(),
        })?;

        let document: serde_json::Value = parse_yaml(content, filename)?;
        let violations: Vec<Violation> = compiled
            .iter_errors(&document)
            .map(|e| Violation {
                path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(document)
        } else {
            Err(SchemaError::Invalid {
                filename: filename.to_string(),
                entity: prefix,
                violations,
                src: NamedSource::new(filename, content.to_string()),
            })
        }
    }
}
