//! `minv product` command - Product catalog management

use std::fs;
use std::io::IsTerminal;

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::commands::utils::Session;
use crate::cli::filters::{ExpirationFilter, StockFilter};
use crate::cli::helpers::{display_id, product_badges, styled_expiration, styled_stock};
use crate::cli::output::{effective_format, format_money, print_serialized};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::activity::NewActivity;
use crate::core::classify::{
    days_until_expiration, parse_expiration_date, Classifiable, ExpirationStatus, StockStatus,
};
use crate::core::pagination::Page;
use crate::core::role::Action;
use crate::core::shortid::ShortIdIndex;
use crate::core::stock::load_transactions;
use crate::entities::activity::{ActivityType, EntityType};
use crate::entities::product::{Category, Product};
use crate::schema::template::TemplateGenerator;
use crate::yaml::parse_yaml_file;

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// List products with filtering and pagination
    List(ListArgs),

    /// Create a new product
    New(NewArgs),

    /// Show a product's details
    Show(ShowArgs),

    /// Edit a product in your editor
    Edit(EditArgs),

    /// Update product fields without opening an editor
    Set(SetArgs),

    /// Delete a product (admin only)
    Delete(DeleteArgs),
}

/// Column definitions for product list output
const PRODUCT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("short", "SHORT", 8),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("sku", "SKU", 14),
    ColumnDef::new("category", "CATEGORY", 8),
    ColumnDef::new("stock", "STOCK", 11),
    ColumnDef::new("price", "PRICE", 12),
    ColumnDef::new("expires", "EXPIRES", 10),
    ColumnDef::new("badges", "BADGES", 26),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in name and SKU (case-insensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by category
    #[arg(long, short = 'c')]
    pub category: Option<Category>,

    /// Filter by stock status
    #[arg(long, default_value = "all")]
    pub stock: StockFilter,

    /// Filter by expiration status
    #[arg(long, short = 'x', default_value = "all")]
    pub expiration: ExpirationFilter,

    /// Page to show (1-based)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Products per page (default from config)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Show every matching product on one page
    #[arg(long, conflicts_with_all = ["page", "per_page"])]
    pub all: bool,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Stock keeping unit (must be unique)
    #[arg(long)]
    pub sku: String,

    #[arg(long, short = 'c', default_value = "other")]
    pub category: Category,

    /// Units on hand
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub stock: i64,

    /// Restock threshold (0 = no minimum)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub min_stock: i64,

    /// Price per unit
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub price: f64,

    /// Weight in kilograms
    #[arg(long)]
    pub weight: Option<f64>,

    /// Expiration date (YYYY-MM-DD)
    #[arg(long)]
    pub expires: Option<String>,

    #[arg(long)]
    pub batch: Option<String>,

    /// Storage location (e.g., "Freezer A")
    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub supplier: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Path or URL of a product photo
    #[arg(long)]
    pub image: Option<String>,

    /// Open in editor after creation
    #[arg(long, short = 'e')]
    pub edit: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Product ID, ID prefix or short ID (PROD@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Product ID, ID prefix or short ID (PROD@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Product ID, ID prefix or short ID (PROD@N)
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub sku: Option<String>,

    #[arg(long, short = 'c')]
    pub category: Option<Category>,

    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub min_stock: Option<i64>,

    #[arg(long)]
    pub weight: Option<f64>,

    /// Expiration date (YYYY-MM-DD), or "none" to clear it
    #[arg(long)]
    pub expires: Option<String>,

    #[arg(long)]
    pub batch: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub supplier: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long)]
    pub image: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Product ID, ID prefix or short ID (PROD@N)
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Suppress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Run a product subcommand
pub fn run(cmd: ProductCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProductCommands::List(args) => run_list(args, global),
        ProductCommands::New(args) => run_new(args, global),
        ProductCommands::Show(args) => run_show(args, global),
        ProductCommands::Edit(args) => run_edit(args, global),
        ProductCommands::Set(args) => run_set(args, global),
        ProductCommands::Delete(args) => run_delete(args, global),
    }
}

/// Product row for list output; shared with the category view
pub fn product_row(
    product: &Product,
    short_ids: &ShortIdIndex,
    currency: &str,
    today: chrono::NaiveDate,
) -> Result<TableRow> {
    let snapshot = product.snapshot();
    let stock = snapshot.stock_status(false)?;
    let expiration = snapshot.expiration_status(today);
    let badges = product_badges(stock, expiration, product.expiration_date, today);

    Ok(TableRow::new(product.id.to_string())
        .cell(display_id(&product.id, short_ids))
        .cell(product.name.clone())
        .cell(product.sku.clone())
        .cell(product.category.dir_name())
        .cell(format!("{}/{}", product.current_stock, product.min_stock_level))
        .cell(format_money(currency, product.unit_price))
        .cell(
            product
                .expiration_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
        .cell(badges.join(", ")))
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let today = session.clock.today();

    let mut products = Vec::new();
    for product in session.store().products() {
        if args.category.is_some_and(|c| c != product.category) {
            continue;
        }
        if args.search.as_deref().is_some_and(|q| !product.matches_search(q)) {
            continue;
        }
        let snapshot = product.snapshot();
        if !args.stock.matches(snapshot.stock_status(false)?) {
            continue;
        }
        if !args.expiration.matches(snapshot.expiration_status(today)) {
            continue;
        }
        products.push(product);
    }

    if args.count {
        println!("{}", products.len());
        return Ok(());
    }

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    let per_page = if args.all {
        products.len()
    } else {
        args.per_page.unwrap_or_else(|| session.config.page_size())
    };
    let page = Page::new(args.page, per_page, products.len()).map_err(|e| miette::miette!("{}", e))?;
    let visible = page.slice(&products);

    // Update short ID index
    let mut short_ids = session.short_ids();
    short_ids.ensure_all(visible.iter().map(|p| p.id.to_string()));
    short_ids.save_or_warn(&session.project);

    let format = effective_format(global.output, true);
    if print_serialized(visible, format)? {
        return Ok(());
    }

    let currency = session.config.currency_symbol();
    let rows = visible
        .iter()
        .map(|p| product_row(p, &short_ids, &currency, today))
        .collect::<Result<Vec<_>>>()?;
    TableFormatter::new(PRODUCT_COLUMNS).print(&rows, format)?;

    if matches!(format, OutputFormat::Table) {
        println!(
            "Page {} of {} ({} products). Use {} to reference by short ID.",
            style(page.number).cyan(),
            page.total_pages(),
            style(page.total).cyan(),
            style("PROD@N").cyan()
        );
        if page.has_previous() {
            println!(
                "   {}",
                style(format!("Previous page: --page {}", page.number - 1)).dim()
            );
        }
        if page.has_next() {
            println!(
                "   {}",
                style(format!("Next page: --page {}", page.number + 1)).dim()
            );
        }
    }

    Ok(())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    session.config.role().require(Action::CreateProduct)?;
    let store = session.store();

    let mut product = Product::new(
        args.name.trim().to_string(),
        args.sku.trim().to_string(),
        args.category,
        session.config.author(),
        session.clock.now(),
    );
    product.current_stock = args.stock;
    product.min_stock_level = args.min_stock;
    product.unit_price = args.price;
    product.weight_kg = args.weight;
    product.expiration_date = args.expires.as_deref().map(parse_expiration_date).transpose()?;
    product.batch_number = optional_text(args.batch);
    product.storage_location = optional_text(args.location);
    product.supplier = optional_text(args.supplier);
    product.description = optional_text(args.description);
    product.image = optional_text(args.image);

    product.validate()?;
    store.ensure_unique_sku(&product.sku, None)?;

    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let yaml_content = generator
        .generate_product(&product)
        .map_err(|e| miette::miette!("{}", e))?;
    let file_path = store.create(&product, &yaml_content)?;

    // Add to short ID index
    let mut short_ids = session.short_ids();
    let short_id = short_ids.add(product.id.to_string());
    short_ids.save_or_warn(&session.project);

    session.log_activity(
        NewActivity::new(
            ActivityType::ProductCreated,
            EntityType::Product,
            format!("Added new product: {}", product.name),
        )
        .entity(product.id, product.name.clone())
        .metadata(serde_json::json!({
            "sku": product.sku,
            "category": product.category.dir_name(),
            "initial_stock": product.current_stock,
        })),
    );
    log::info!("Created {} at {}", product.id, file_path.display());

    match global.output {
        OutputFormat::Id => println!("{}", product.id),
        OutputFormat::Json | OutputFormat::Yaml => {
            print_serialized(&product, global.output)?;
        }
        _ => {
            let display = short_id.unwrap_or_else(|| product.id.to_string());
            println!(
                "{} Created product {}",
                style("✓").green(),
                style(&display).cyan()
            );
            println!("   {}", style(file_path.display()).dim());
            println!(
                "   {} | SKU {} | {} units",
                style(&product.name).yellow(),
                product.sku,
                product.current_stock
            );
        }
    }

    if args.edit {
        println!();
        println!("Opening in {}...", style(session.config.editor()).yellow());
        session.config.run_editor(&file_path).into_diagnostic()?;
    }

    Ok(())
}

/// A product with its derived statuses, for structured output
#[derive(Serialize)]
struct ProductView<'a> {
    #[serde(flatten)]
    product: &'a Product,
    stock_status: StockStatus,
    stock_severity: StockStatus,
    expiration_status: ExpirationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    days_until_expiration: Option<i64>,
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let stored = session.store().find(&args.id)?;
    let product = &stored.product;
    let today = session.clock.today();

    let snapshot = product.snapshot();
    let view = ProductView {
        product,
        stock_status: snapshot.stock_status(false)?,
        stock_severity: snapshot.stock_status(true)?,
        expiration_status: snapshot.expiration_status(today),
        days_until_expiration: days_until_expiration(product.expiration_date, today),
    };

    match global.output {
        OutputFormat::Id => {
            println!("{}", product.id);
            return Ok(());
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            print_serialized(&view, global.output)?;
            return Ok(());
        }
        _ => {}
    }

    let currency = session.config.currency_symbol();
    let mut short_ids = session.short_ids();
    let short = short_ids.add(product.id.to_string());
    short_ids.save_or_warn(&session.project);

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("ID").bold(),
        style(&product.id.to_string()).cyan()
    );
    if let Some(short) = short {
        println!("{}: {}", style("Short ID").bold(), style(short).cyan());
    }
    println!("{}: {}", style("Name").bold(), style(&product.name).yellow());
    println!("{}: {}", style("SKU").bold(), product.sku);
    println!("{}: {}", style("Category").bold(), product.category.title());
    println!("{}", style("─".repeat(60)).dim());

    println!();
    println!(
        "{}: {} (minimum {}) {}",
        style("Stock").bold(),
        product.current_stock,
        product.min_stock_level,
        styled_stock(view.stock_severity)
    );
    println!(
        "{}: {} per unit, {} on hand",
        style("Price").bold(),
        format_money(&currency, product.unit_price),
        format_money(&currency, product.stock_value())
    );
    if let Some(weight) = product.weight_kg {
        println!("{}: {} kg", style("Weight").bold(), weight);
    }
    match (product.expiration_date, view.days_until_expiration) {
        (Some(date), Some(days)) => println!(
            "{}: {} ({}, {} day(s))",
            style("Expires").bold(),
            date.format("%Y-%m-%d"),
            styled_expiration(view.expiration_status),
            days
        ),
        _ => println!("{}: {}", style("Expires").bold(), style("no date").dim()),
    }

    let details = [
        ("Batch", &product.batch_number),
        ("Location", &product.storage_location),
        ("Supplier", &product.supplier),
        ("Image", &product.image),
    ];
    for (label, value) in details {
        if let Some(value) = value {
            println!("{}: {}", style(label).bold(), value);
        }
    }

    if let Some(ref description) = product.description {
        println!();
        println!("{}", style("Description:").bold());
        println!("{}", description);
    }

    let transactions: Vec<_> = load_transactions(&session.project)?
        .into_iter()
        .rev()
        .filter(|t| t.product_id == product.id)
        .take(5)
        .collect();
    if !transactions.is_empty() {
        println!();
        println!("{}:", style("Recent stock movements").bold());
        for txn in transactions {
            println!(
                "  • {} {} {} ({} → {})",
                txn.created.format("%Y-%m-%d %H:%M"),
                txn.transaction_type,
                txn.quantity,
                txn.stock_before,
                txn.stock_after
            );
        }
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {} | {}: {} | {}: {}",
        style("Author").dim(),
        product.author,
        style("Created").dim(),
        product.created.format("%Y-%m-%d %H:%M"),
        style("Revision").dim(),
        product.entity_revision
    );

    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    session.config.role().require(Action::UpdateProduct)?;
    let store = session.store();
    let stored = store.find(&args.id)?;

    println!(
        "Opening {} in {}...",
        style(stored.path.display()).cyan(),
        style(session.config.editor()).yellow()
    );
    let original = fs::read_to_string(&stored.path).into_diagnostic()?;
    session.config.run_editor(&stored.path).into_diagnostic()?;

    let checked = || -> Result<Product> {
        let edited: Product = parse_yaml_file(&stored.path)?;
        edited.validate()?;
        store.ensure_unique_sku(&edited.sku, Some(&edited))?;
        if edited.id != stored.product.id {
            return Err(miette::miette!(
                "The product ID must not change (was {}, now {})",
                stored.product.id,
                edited.id
            ));
        }
        Ok(edited)
    };
    let mut edited = match checked() {
        Ok(edited) => edited,
        Err(e) => {
            fs::write(&stored.path, &original).into_diagnostic()?;
            return Err(e.wrap_err(format!(
                "Edit rejected; {} was restored. Run `minv product edit {}` to try again",
                stored.path.display(),
                args.id
            )));
        }
    };

    if serde_json::to_value(&edited).ok() == serde_json::to_value(&stored.product).ok() {
        println!("No changes made.");
        return Ok(());
    }

    edited.touch(session.clock.now());
    let path = store.save(&edited, Some(&stored.path))?;
    session.log_activity(
        NewActivity::new(
            ActivityType::ProductUpdated,
            EntityType::Product,
            format!("Updated product: {}", edited.name),
        )
        .entity(edited.id, edited.name.clone()),
    );

    println!(
        "{} Updated {}",
        style("✓").green(),
        style(path.display()).dim()
    );
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    session.config.role().require(Action::UpdateProduct)?;
    let store = session.store();
    let stored = store.find(&args.id)?;
    let mut product = stored.product.clone();
    let mut changed: Vec<&str> = Vec::new();

    if let Some(name) = args.name {
        product.name = name.trim().to_string();
        changed.push("name");
    }
    if let Some(sku) = args.sku {
        product.sku = sku.trim().to_string();
        changed.push("sku");
    }
    if let Some(category) = args.category {
        product.category = category;
        changed.push("category");
    }
    if let Some(price) = args.price {
        product.unit_price = price;
        changed.push("unit_price");
    }
    if let Some(min) = args.min_stock {
        product.min_stock_level = min;
        changed.push("min_stock_level");
    }
    if let Some(weight) = args.weight {
        product.weight_kg = Some(weight);
        changed.push("weight_kg");
    }
    if let Some(expires) = args.expires {
        product.expiration_date = match expires.trim() {
            "" | "none" => None,
            s => Some(parse_expiration_date(s)?),
        };
        changed.push("expiration_date");
    }
    let text_fields = [
        (args.batch, &mut product.batch_number, "batch_number"),
        (args.location, &mut product.storage_location, "storage_location"),
        (args.supplier, &mut product.supplier, "supplier"),
        (args.description, &mut product.description, "description"),
        (args.image, &mut product.image, "image"),
    ];
    for (value, field, key) in text_fields {
        if let Some(value) = value {
            *field = optional_text(Some(value));
            changed.push(key);
        }
    }

    if changed.is_empty() {
        return Err(miette::miette!(
            help = "Pass at least one field flag, e.g. --price 12.50",
            "Nothing to update"
        ));
    }

    product.validate()?;
    if changed.contains(&"sku") {
        store.ensure_unique_sku(&product.sku, Some(&product))?;
    }

    product.touch(session.clock.now());
    store.save(&product, Some(&stored.path))?;
    session.log_activity(
        NewActivity::new(
            ActivityType::ProductUpdated,
            EntityType::Product,
            format!("Updated product: {}", product.name),
        )
        .entity(product.id, product.name.clone())
        .metadata(serde_json::json!({ "fields": changed })),
    );

    match global.output {
        OutputFormat::Id => println!("{}", product.id),
        _ => println!(
            "{} Updated {} ({})",
            style("✓").green(),
            style(&product.name).yellow(),
            changed.join(", ")
        ),
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    session.config.role().require(Action::DeleteProduct)?;
    let store = session.store();
    let stored = store.find(&args.id)?;
    let product = &stored.product;

    if !args.yes && std::io::stdin().is_terminal() {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete \"{}\"? This action cannot be undone",
                product.name
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.delete(&stored)?;

    let mut short_ids = session.short_ids();
    short_ids.remove(&product.id.to_string());
    short_ids.save_or_warn(&session.project);

    session.log_activity(
        NewActivity::new(
            ActivityType::ProductDeleted,
            EntityType::Product,
            format!("Deleted product: {}", product.name),
        )
        .entity(product.id, product.name.clone())
        .metadata(serde_json::json!({ "sku": product.sku })),
    );

    if !args.quiet {
        println!(
            "{} Deleted product {} ({})",
            style("✓").green(),
            style(&product.name).yellow(),
            product.id
        );
    }
    Ok(())
}
