//! Product store - loading, resolving and writing product files

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::project::{Project, ENTITY_SUFFIX};
use crate::core::shortid::ShortIdIndex;
use crate::entities::product::Product;
use crate::yaml::{parse_yaml_file, YamlError};

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("No product found matching '{0}'")]
    #[diagnostic(code(minv::store::not_found), help("Run `minv product list` to see product IDs"))]
    NotFound(String),

    #[error("'{reference}' matches {count} products; use more characters or a short ID")]
    #[diagnostic(code(minv::store::ambiguous))]
    Ambiguous { reference: String, count: usize },

    #[error("SKU '{sku}' is already used by {existing}")]
    #[diagnostic(code(minv::store::duplicate_sku))]
    DuplicateSku { sku: String, existing: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Failed to serialize product: {0}")]
    Serialize(#[from] serde_yml::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A product together with the file it was read from
#[derive(Debug, Clone)]
pub struct StoredProduct {
    pub product: Product,
    pub path: PathBuf,
}

/// All product files of a project
pub struct ProductStore<'a> {
    project: &'a Project,
}

impl<'a> ProductStore<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    /// Every product file path under `products/`
    pub fn product_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(self.project.products_dir())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name().to_string_lossy().ends_with(ENTITY_SUFFIX))
            .map(|e| e.into_path())
            .collect();
        files.sort();
        files
    }

    /// Load all products, newest first
    ///
    /// Files that fail to parse are skipped with a warning; `minv validate`
    /// reports them in detail.
    pub fn load_all(&self) -> Vec<StoredProduct> {
        let mut stored: Vec<StoredProduct> = self
            .product_files()
            .into_iter()
            .filter_map(|path| match parse_yaml_file::<Product>(&path) {
                Ok(product) => Some(StoredProduct { product, path }),
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect();
        stored.sort_by(|a, b| b.product.created.cmp(&a.product.created));
        log::debug!("Loaded {} products", stored.len());
        stored
    }

    /// Load all products without their paths, newest first
    pub fn products(&self) -> Vec<Product> {
        self.load_all().into_iter().map(|s| s.product).collect()
    }

    /// Find one product by full ID, short ID (`PROD@N`) or unique ID prefix
    pub fn find(&self, reference: &str) -> Result<StoredProduct, StoreError> {
        let short_ids = ShortIdIndex::load(self.project);
        let resolved = short_ids
            .resolve(reference)
            .unwrap_or_else(|| reference.to_string());
        let needle = resolved.to_uppercase();

        let all = self.load_all();
        if let Some(exact) = all.iter().find(|s| s.product.id.to_string() == needle) {
            return Ok(exact.clone());
        }

        let mut matches: Vec<StoredProduct> = all
            .into_iter()
            .filter(|s| s.product.id.to_string().starts_with(&needle))
            .collect();
        match matches.len() {
            0 => Err(StoreError::NotFound(reference.to_string())),
            1 => Ok(matches.remove(0)),
            count => Err(StoreError::Ambiguous {
                reference: reference.to_string(),
                count,
            }),
        }
    }

    /// Reject `sku` if another product already uses it (case-insensitive)
    pub fn ensure_unique_sku(&self, sku: &str, except: Option<&Product>) -> Result<(), StoreError> {
        let taken = self.load_all().into_iter().find(|s| {
            s.product.sku.eq_ignore_ascii_case(sku)
                && except.is_none_or(|e| e.id != s.product.id)
        });
        match taken {
            Some(existing) => Err(StoreError::DuplicateSku {
                sku: sku.to_string(),
                existing: existing.product.id.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Path a product belongs at, derived from its category
    pub fn path_for(&self, product: &Product) -> PathBuf {
        self.project
            .category_dir(product.category)
            .join(product.file_name())
    }

    /// Write raw YAML for a new product
    pub fn create(&self, product: &Product, content: &str) -> Result<PathBuf, StoreError> {
        let path = self.path_for(product);
        write_file(&path, content)?;
        Ok(path)
    }

    /// Write a product back, moving the file when its category changed
    pub fn save(&self, product: &Product, previous: Option<&Path>) -> Result<PathBuf, StoreError> {
        let path = self.path_for(product);
        let content = serde_yml::to_string(product)?;
        write_file(&path, &content)?;

        if let Some(old) = previous.filter(|old| *old != path.as_path()) {
            log::info!("Moved {} to {}", old.display(), path.display());
            fs::remove_file(old).map_err(|source| StoreError::Io {
                path: old.to_path_buf(),
                source,
            })?;
        }
        Ok(path)
    }

    pub fn delete(&self, stored: &StoredProduct) -> Result<(), StoreError> {
        fs::remove_file(&stored.path).map_err(|source| StoreError::Io {
            path: stored.path.clone(),
            source,
        })
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::product::Category;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn product(name: &str, sku: &str, category: Category, age_days: i64) -> Product {
        Product::new(
            name.into(),
            sku.into(),
            category,
            "tester".into(),
            Utc::now() - Duration::days(age_days),
        )
    }

    #[test]
    fn test_save_and_load_newest_first() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        let store = ProductStore::new(&project);

        store.save(&product("Old", "A-1", Category::Beef, 5), None).unwrap();
        store.save(&product("New", "A-2", Category::Pork, 1), None).unwrap();

        let names: Vec<String> = store.products().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["New", "Old"]);
    }

    #[test]
    fn test_invalid_files_are_skipped() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        let store = ProductStore::new(&project);

        store.save(&product("Good", "G-1", Category::Fish, 0), None).unwrap();
        fs::write(
            project.category_dir(Category::Fish).join("PROD-BROKEN.minv.yaml"),
            "name: [unclosed",
        )
        .unwrap();

        assert_eq!(store.products().len(), 1);
    }

    #[test]
    fn test_find_by_full_id_prefix_and_short_id() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        let store = ProductStore::new(&project);

        let p = product("Ribeye", "R-1", Category::Beef, 0);
        store.save(&p, None).unwrap();
        let id = p.id.to_string();

        assert_eq!(store.find(&id).unwrap().product.id, p.id);
        assert_eq!(store.find(&id[..12].to_lowercase()).unwrap().product.id, p.id);

        let mut short_ids = ShortIdIndex::load(&project);
        short_ids.add(id.clone());
        short_ids.save(&project).unwrap();
        assert_eq!(store.find("PROD@1").unwrap().product.id, p.id);

        assert!(matches!(store.find("PROD-ZZZ"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_ambiguous_prefix() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        let store = ProductStore::new(&project);

        store.save(&product("A", "A", Category::Beef, 0), None).unwrap();
        store.save(&product("B", "B", Category::Beef, 0), None).unwrap();

        assert!(matches!(
            store.find("PROD-"),
            Err(StoreError::Ambiguous { count: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_sku_detection() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        let store = ProductStore::new(&project);

        let p = product("Ribeye", "BEEF-001", Category::Beef, 0);
        store.save(&p, None).unwrap();

        assert!(matches!(
            store.ensure_unique_sku("beef-001", None),
            Err(StoreError::DuplicateSku { .. })
        ));
        assert!(store.ensure_unique_sku("BEEF-001", Some(&p)).is_ok());
        assert!(store.ensure_unique_sku("BEEF-002", None).is_ok());
    }

    #[test]
    fn test_category_change_moves_file() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        let store = ProductStore::new(&project);

        let mut p = product("Tilapia", "F-1", Category::Other, 0);
        let old = store.save(&p, None).unwrap();

        p.category = Category::Fish;
        let new = store.save(&p, Some(&old)).unwrap();

        assert!(!old.exists());
        assert!(new.exists());
        assert!(new.starts_with(project.category_dir(Category::Fish)));
    }

    #[test]
    fn test_delete_removes_file() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path(), false).unwrap();
        let store = ProductStore::new(&project);

        store.save(&product("Wings", "C-1", Category::Chicken, 0), None).unwrap();
        let stored = store.find("PROD").unwrap();
        store.delete(&stored).unwrap();
        assert!(store.products().is_empty());
    }
}
