//! Short ID system for easier entity selection
//!
//! Maps persistent aliases like `PROD@1`, `PROD@2` to full entity IDs so
//! products can be addressed without typing a ULID. The index is stored in
//! `.minv/shortids.json` and grows as products are listed or created.

use std::collections::HashMap;
use std::fs;

use crate::core::project::{Project, PROJECT_DIR};

/// Index file name within the project metadata directory
const INDEX_FILE: &str = "shortids.json";

/// A mapping of short IDs to full entity IDs
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ShortIdIndex {
    /// Maps "PREFIX@N" to full entity ID string
    entries: HashMap<String, String>,
    /// Full entity ID to "PREFIX@N"
    #[serde(skip)]
    reverse: HashMap<String, String>,
    /// Next available number per prefix
    next_ids: HashMap<String, u32>,
}

impl ShortIdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index from a project, or create empty if not found
    pub fn load(project: &Project) -> Self {
        let path = project.root().join(PROJECT_DIR).join(INDEX_FILE);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::new();
        };
        match serde_json::from_str::<ShortIdIndex>(&content) {
            Ok(mut index) => {
                index.reverse = index
                    .entries
                    .iter()
                    .map(|(k, v)| (v.clone(), k.clone()))
                    .collect();
                index
            }
            Err(e) => {
                log::warn!("Short ID index is unreadable, starting fresh: {}", e);
                Self::new()
            }
        }
    }

    /// Save the index to a project
    pub fn save(&self, project: &Project) -> std::io::Result<()> {
        let path = project.root().join(PROJECT_DIR).join(INDEX_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
    }

    /// Save, reporting failure as a warning only
    pub fn save_or_warn(&self, project: &Project) {
        if let Err(e) = self.save(project) {
            log::warn!("Failed to save short ID index: {}", e);
        }
    }

    fn extract_prefix(entity_id: &str) -> Option<&str> {
        entity_id.split_once('-').map(|(prefix, _)| prefix)
    }

    /// Add an entity ID and return its short ID; existing IDs keep theirs
    pub fn add(&mut self, entity_id: String) -> Option<String> {
        if let Some(existing) = self.reverse.get(&entity_id) {
            return Some(existing.clone());
        }
        let prefix = Self::extract_prefix(&entity_id)?.to_string();
        let next = self.next_ids.entry(prefix.clone()).or_insert(1);
        let short = format!("{}@{}", prefix, next);
        *next += 1;
        self.entries.insert(short.clone(), entity_id.clone());
        self.reverse.insert(entity_id, short.clone());
        Some(short)
    }

    /// Make sure every ID has a short ID
    pub fn ensure_all(&mut self, entity_ids: impl IntoIterator<Item = String>) {
        for id in entity_ids {
            self.add(id);
        }
    }

    /// Remove an entity (e.g., after deletion); its number is not reused
    pub fn remove(&mut self, entity_id: &str) {
        if let Some(short) = self.reverse.remove(entity_id) {
            self.entries.remove(&short);
        }
    }

    /// Resolve `PREFIX@N` (case-insensitive prefix) to a full ID
    ///
    /// Anything else returns `None` so callers fall back to matching full or
    /// partial IDs.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        let (prefix, num) = reference.split_once('@')?;
        let num: u32 = num.parse().ok()?;
        let key = format!("{}@{}", prefix.to_uppercase(), num);
        self.entries.get(&key).cloned()
    }

    pub fn get_short_id(&self, entity_id: &str) -> Option<String> {
        self.reverse.get(entity_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut index = ShortIdIndex::new();
        assert_eq!(index.add("PROD-AAA".into()).as_deref(), Some("PROD@1"));
        assert_eq!(index.add("PROD-BBB".into()).as_deref(), Some("PROD@2"));
        assert_eq!(index.add("PROD-AAA".into()).as_deref(), Some("PROD@1"));
        assert_eq!(index.add("TXN-CCC".into()).as_deref(), Some("TXN@1"));
    }

    #[test]
    fn test_resolve() {
        let mut index = ShortIdIndex::new();
        index.add("PROD-AAA".into());
        assert_eq!(index.resolve("PROD@1").as_deref(), Some("PROD-AAA"));
        assert_eq!(index.resolve("prod@1").as_deref(), Some("PROD-AAA"));
        assert_eq!(index.resolve("PROD@9"), None);
        assert_eq!(index.resolve("PROD-AAA"), None);
    }

    #[test]
    fn test_remove_does_not_reuse_numbers() {
        let mut index = ShortIdIndex::new();
        index.add("PROD-AAA".into());
        index.remove("PROD-AAA");
        assert_eq!(index.resolve("PROD@1"), None);
        assert_eq!(index.add("PROD-BBB".into()).as_deref(), Some("PROD@2"));
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();

        let mut index = ShortIdIndex::new();
        index.add("PROD-AAA".into());
        index.save(&project).unwrap();

        let loaded = ShortIdIndex::load(&project);
        assert_eq!(loaded.get_short_id("PROD-AAA").as_deref(), Some("PROD@1"));
        assert_eq!(loaded.resolve("PROD@1").as_deref(), Some("PROD-AAA"));
    }
}
