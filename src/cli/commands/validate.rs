//! `minv validate` command - Check product files and journals

use console::style;
use miette::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::commands::utils::Session;
use crate::cli::GlobalOpts;
use crate::core::activity::load_activity;
use crate::core::project::ENTITY_SUFFIX;
use crate::core::stock::load_transactions;
use crate::core::EntityPrefix;
use crate::entities::product::Product;
use crate::schema::registry::SchemaRegistry;
use crate::schema::validator::Validator;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Paths to validate (default: every product in the project)
    #[arg()]
    pub paths: Vec<PathBuf>,

    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_errors: usize,
    total_warnings: usize,
}

/// Outcome of checking one file
enum FileCheck {
    Passed(Product, Vec<String>),
    Failed(Vec<String>),
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let registry = SchemaRegistry::default();
    let validator = Validator::new(&registry);

    let files = if args.paths.is_empty() {
        session.store().product_files()
    } else {
        expand_paths(&args.paths)
    };

    println!("{} Validating {} file(s)...\n", style("→").blue(), files.len());

    let mut stats = ValidationStats::default();
    let mut skus: HashMap<String, PathBuf> = HashMap::new();

    for path in &files {
        stats.files_checked += 1;

        let (mut errors, warnings) = match check_file(&validator, path) {
            FileCheck::Passed(product, warnings) => {
                let mut errors = Vec::new();
                match skus.get(&product.sku.to_lowercase()) {
                    Some(first) => errors.push(format!(
                        "SKU '{}' is already used by {}",
                        product.sku,
                        first.display()
                    )),
                    None => {
                        skus.insert(product.sku.to_lowercase(), path.clone());
                    }
                }
                (errors, warnings)
            }
            FileCheck::Failed(errors) => (errors, Vec::new()),
        };
        if args.strict {
            errors.extend(warnings.iter().cloned());
        }

        if errors.is_empty() {
            stats.files_passed += 1;
            stats.total_warnings += warnings.len();
            if !args.summary {
                println!("{} {}", style("✓").green(), path.display());
                for warning in &warnings {
                    println!("    {} {}", style("!").yellow(), warning);
                }
            }
        } else {
            stats.files_failed += 1;
            stats.total_errors += errors.len();
            if !args.summary {
                println!(
                    "{} {} - {} error(s)",
                    style("✗").red(),
                    path.display(),
                    errors.len()
                );
                for error in &errors {
                    println!("    {}", error);
                }
            }
        }
    }

    // Journals are checked as a whole; one bad line fails the project
    let mut journal_errors = 0;
    if let Err(e) = load_activity(&session.project) {
        journal_errors += 1;
        println!("{} {}", style("✗").red(), e);
    }
    if let Err(e) = load_transactions(&session.project) {
        journal_errors += 1;
        println!("{} {}", style("✗").red(), e);
    }
    stats.total_errors += journal_errors;

    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());
    if stats.total_warnings > 0 {
        println!("  Total warnings: {}", style(stats.total_warnings).yellow());
    }
    println!();

    if stats.files_failed > 0 || journal_errors > 0 {
        if stats.files_failed == 1 {
            Err(miette::miette!("Validation failed: 1 file has errors"))
        } else if stats.files_failed > 1 {
            Err(miette::miette!(
                "Validation failed: {} files have errors",
                stats.files_failed
            ))
        } else {
            Err(miette::miette!("Validation failed: project journals are corrupt"))
        }
    } else {
        println!("{} All files passed validation!", style("✓").green().bold());
        Ok(())
    }
}

fn check_file(validator: &Validator<'_>, path: &Path) -> FileCheck {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return FileCheck::Failed(vec![e.to_string()]),
    };
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let document = match validator.validate(&content, &filename, EntityPrefix::Prod) {
        Ok(doc) => doc,
        Err(e) => return FileCheck::Failed(vec![format!("{:?}", miette::Report::new(e))]),
    };
    let product: Product = match serde_json::from_value(document) {
        Ok(p) => p,
        Err(e) => return FileCheck::Failed(vec![e.to_string()]),
    };
    if let Err(e) = product.validate() {
        return FileCheck::Failed(vec![e.to_string()]);
    }

    let mut warnings = Vec::new();
    if filename != product.file_name() {
        warnings.push(format!("file name does not match id {}", product.id));
    }
    let dir = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if dir != product.category.dir_name() {
        warnings.push(format!(
            "category '{}' does not match directory '{}'",
            product.category.dir_name(),
            dir
        ));
    }
    FileCheck::Passed(product, warnings)
}

/// Expand paths - if a directory is given, find all product files in it
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if entry.path().to_string_lossy().ends_with(ENTITY_SUFFIX) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.exists() {
            files.push(path.clone());
        }
    }

    files.sort();
    files
}
