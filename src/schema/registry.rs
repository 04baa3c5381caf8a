//! Schema registry - embedded JSON schemas

use rust_embed::Embed;
use std::collections::HashMap;

use crate::core::EntityPrefix;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// Registry of JSON schemas for entity validation
pub struct SchemaRegistry {
    schemas: HashMap<EntityPrefix, String>,
}

impl SchemaRegistry {
    /// Create a new schema registry with embedded schemas
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // Only file-backed entities have a schema; journals are validated by serde
        for prefix in EntityPrefix::all() {
            let filename = schema_file_name(*prefix);
            if let Some(file) = EmbeddedSchemas::get(&filename) {
                if let Ok(content) = std::str::from_utf8(&file.data) {
                    schemas.insert(*prefix, content.to_string());
                }
            }
        }

        Self { schemas }
    }

    /// Get the JSON schema for an entity type
    pub fn get(&self, prefix: EntityPrefix) -> Option<&str> {
        self.schemas.get(&prefix).map(|s| s.as_str())
    }

    pub fn has_schema(&self, prefix: EntityPrefix) -> bool {
        self.schemas.contains_key(&prefix)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn schema_file_name(prefix: EntityPrefix) -> String {
    let stem = match prefix {
        EntityPrefix::Prod => "product",
        EntityPrefix::Txn => "transaction",
        EntityPrefix::Act => "activity",
    };
    format!("{}.schema.json", stem)
}
