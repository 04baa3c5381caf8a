//! `minv init` command - Create a new inventory project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::core::project::{Project, ProjectError, PROJECT_DIR};
use crate::entities::product::Category;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg()]
    pub path: Option<PathBuf>,

    /// Overwrite an existing project configuration
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let root = match args.path {
        Some(path) => path,
        None => std::env::current_dir().into_diagnostic()?,
    };
    std::fs::create_dir_all(&root).into_diagnostic()?;

    let project = match Project::init(&root, args.force) {
        Ok(project) => project,
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} Project already exists at {} (use --force to reinitialize)",
                style("!").yellow(),
                path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(miette::miette!("{}", e)),
    };
    log::info!("Initialized project at {}", project.root().display());

    println!(
        "{} Initialized inventory project in {}",
        style("✓").green(),
        style(project.root().display()).yellow()
    );
    println!("  {}/config.yaml", PROJECT_DIR);
    for category in Category::all() {
        println!("  products/{}/", category.dir_name());
    }
    println!();
    println!(
        "Next: {}",
        style("minv product new --name \"Ribeye\" --sku BEEF-001 --category beef").cyan()
    );
    Ok(())
}
