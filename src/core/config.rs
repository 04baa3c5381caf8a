//! Configuration - layered global, project and environment settings

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::project::Project;
use crate::core::role::Role;

const DEFAULT_PAGE_SIZE: usize = 10;

/// One configuration file; every key is optional so layers can be merged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    author: Option<String>,
    editor: Option<String>,
    role: Option<Role>,
    page_size: Option<usize>,
    currency_symbol: Option<String>,
}

/// Effective configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub author: Option<String>,
    pub editor: Option<String>,
    pub role: Option<Role>,
    pub page_size: Option<usize>,
    pub currency_symbol: Option<String>,
}

impl Config {
    /// Load configuration from the global file, the current project and the environment
    pub fn load() -> Self {
        let project = Project::discover().ok();
        Self::load_for(project.as_ref())
    }

    /// Load configuration for a known project
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        if let Some(dirs) = ProjectDirs::from("", "", "minv") {
            config.merge_file(&dirs.config_dir().join("config.yaml"));
        }
        if let Some(project) = project {
            config.merge_file(&project.config_path());
        }
        config.merge_env();
        config
    }

    fn merge_file(&mut self, path: &Path) {
        let Ok(content) = std::fs::read_to_string(path) else {
            return;
        };
        match serde_yml::from_str::<ConfigLayer>(&content) {
            Ok(layer) => self.merge(layer),
            Err(e) => log::warn!("Ignoring invalid config {}: {}", path.display(), e),
        }
    }

    fn merge(&mut self, layer: ConfigLayer) {
        if layer.author.is_some() {
            self.author = layer.author;
        }
        if layer.editor.is_some() {
            self.editor = layer.editor;
        }
        if layer.role.is_some() {
            self.role = layer.role;
        }
        if layer.page_size.is_some() {
            self.page_size = layer.page_size;
        }
        if layer.currency_symbol.is_some() {
            self.currency_symbol = layer.currency_symbol;
        }
    }

    fn merge_env(&mut self) {
        if let Ok(author) = std::env::var("MINV_AUTHOR") {
            self.author = Some(author);
        }
        if let Ok(role) = std::env::var("MINV_ROLE") {
            match role.parse() {
                Ok(role) => self.role = Some(role),
                Err(e) => log::warn!("Ignoring MINV_ROLE: {}", e),
            }
        }
        if self.editor.is_none() {
            self.editor = std::env::var("VISUAL")
                .or_else(|_| std::env::var("EDITOR"))
                .ok();
        }
    }

    /// Author name for new records
    pub fn author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn editor(&self) -> String {
        self.editor.clone().unwrap_or_else(|| "vi".to_string())
    }

    pub fn role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    pub fn page_size(&self) -> usize {
        self.page_size.filter(|&n| n > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn currency_symbol(&self) -> String {
        self.currency_symbol.clone().unwrap_or_else(|| "₱".to_string())
    }

    /// Open a file in the configured editor and wait for it to exit
    pub fn run_editor(&self, path: &Path) -> std::io::Result<()> {
        let editor = self.editor();
        let mut parts = editor.split_whitespace();
        let program = parts.next().unwrap_or("vi");
        let status = Command::new(program).args(parts).arg(path).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(std::io::Error::other(format!(
                "editor '{}' exited with {}",
                editor, status
            )))
        }
    }

    /// Location of the global configuration file, if the platform has one
    pub fn global_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "minv").map(|d| d.config_dir().join("config.yaml"))
    }
}
