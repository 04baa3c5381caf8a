//! Project discovery and layout
//!
//! A project is any directory containing a `.minv/` folder. Products live
//! under `products/<category>/`, logs under `.minv/`.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::entities::product::Category;

/// Project metadata directory
pub const PROJECT_DIR: &str = ".minv";

/// Root directory for product files
pub const PRODUCTS_DIR: &str = "products";

/// Suffix of every entity file
pub const ENTITY_SUFFIX: &str = ".minv.yaml";

const DEFAULT_CONFIG: &str = r#"# Meat Inventory Toolkit project configuration
#
# author: Your Name
# editor: vim

# Role for this workstation: admin or staff (staff cannot delete products)
role: admin

# Products shown per page in `minv product list`
page_size: 10

currency_symbol: "₱"
"#;

const GITIGNORE: &str = "# minv local state\n.minv/shortids.json\n";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a minv project (or any parent directory): {0}\nRun 'minv init' to create one")]
    NotFound(PathBuf),

    #[error("Project already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An initialized inventory project
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Find the project containing the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir()?;
        Self::discover_from(&cwd)
    }

    /// Find the project containing `start`, walking up through its parents
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = Some(start);
        while let Some(dir) = current {
            if dir.join(PROJECT_DIR).is_dir() {
                log::debug!("Found project at {}", dir.display());
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
            current = dir.parent();
        }
        Err(ProjectError::NotFound(start.to_path_buf()))
    }

    /// Create the project structure at `root`
    ///
    /// Existing files are only overwritten with `force`.
    pub fn init(root: &Path, force: bool) -> Result<Self, ProjectError> {
        let meta = root.join(PROJECT_DIR);
        if meta.exists() && !force {
            return Err(ProjectError::AlreadyExists(root.to_path_buf()));
        }

        fs::create_dir_all(&meta)?;
        fs::write(meta.join("config.yaml"), DEFAULT_CONFIG)?;

        for category in Category::all() {
            fs::create_dir_all(root.join(PRODUCTS_DIR).join(category.dir_name()))?;
        }

        let gitignore = root.join(".gitignore");
        if !gitignore.exists() || force {
            fs::write(gitignore, GITIGNORE)?;
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.meta_dir().join("config.yaml")
    }

    pub fn products_dir(&self) -> PathBuf {
        self.root.join(PRODUCTS_DIR)
    }

    /// Directory holding products of one category
    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.products_dir().join(category.dir_name())
    }

    pub fn activity_log_path(&self) -> PathBuf {
        self.meta_dir().join("activity.jsonl")
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.meta_dir().join("transactions.jsonl")
    }
}
