//! `minv category` command - Category overview and per-category listings

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::utils::Session;
use crate::cli::helpers::display_id;
use crate::cli::output::{effective_format, format_money, print_serialized};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::classify::{Classifiable, ExpirationStatus};
use crate::core::pagination::Page;
use crate::core::stats::category_overview;
use crate::entities::product::Category;

/// Page size of the category view
const CATEGORY_PAGE_SIZE: usize = 12;

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Product count, units and value per category
    List,

    /// Products of one category
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    pub category: Category,

    /// Page to show (1-based)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Products per page
    #[arg(long, default_value_t = CATEGORY_PAGE_SIZE)]
    pub per_page: usize,
}

const OVERVIEW_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("category", "CATEGORY", 10),
    ColumnDef::new("products", "PRODUCTS", 8),
    ColumnDef::new("units", "UNITS", 10),
    ColumnDef::new("value", "VALUE", 16),
];

const CATEGORY_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("short", "SHORT", 8),
    ColumnDef::new("name", "NAME", 28),
    ColumnDef::new("sku", "SKU", 14),
    ColumnDef::new("stock", "STOCK", 8),
    ColumnDef::new("price", "PRICE", 12),
    ColumnDef::new("expires", "EXPIRES", 10),
    ColumnDef::new("badge", "BADGE", 14),
];

pub fn run(cmd: CategoryCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CategoryCommands::List => run_list(global),
        CategoryCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let overview = category_overview(&session.store().products());

    let format = effective_format(global.output, true);
    if print_serialized(&overview, format)? {
        return Ok(());
    }

    let currency = session.config.currency_symbol();
    let rows: Vec<TableRow> = overview
        .iter()
        .map(|c| {
            TableRow::new(c.category.dir_name())
                .cell(c.category.title())
                .cell(c.product_count.to_string())
                .cell(c.total_stock.to_string())
                .cell(format_money(&currency, c.value))
        })
        .collect();
    TableFormatter::new(OVERVIEW_COLUMNS).print(&rows, format)
}

/// Badge of the category view, which only tracks expiration
fn expiration_badge(status: ExpirationStatus) -> &'static str {
    match status {
        ExpirationStatus::Expired => "Expired",
        ExpirationStatus::ExpiringSoon => "Expiring Soon",
        ExpirationStatus::Fresh | ExpirationStatus::None => "",
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let today = session.clock.today();
    let products: Vec<_> = session
        .store()
        .products()
        .into_iter()
        .filter(|p| p.category == args.category)
        .collect();

    if products.is_empty() {
        println!("No {} products found.", args.category.dir_name());
        return Ok(());
    }

    let page = Page::new(args.page, args.per_page, products.len())
        .map_err(|e| miette::miette!("{}", e))?;
    let visible = page.slice(&products);

    let mut short_ids = session.short_ids();
    short_ids.ensure_all(visible.iter().map(|p| p.id.to_string()));
    short_ids.save_or_warn(&session.project);

    let format = effective_format(global.output, true);
    if print_serialized(visible, format)? {
        return Ok(());
    }

    let currency = session.config.currency_symbol();
    let rows: Vec<TableRow> = visible
        .iter()
        .map(|p| {
            TableRow::new(p.id.to_string())
                .cell(display_id(&p.id, &short_ids))
                .cell(p.name.clone())
                .cell(p.sku.clone())
                .cell(p.current_stock.to_string())
                .cell(format_money(&currency, p.unit_price))
                .cell(
                    p.expiration_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                )
                .cell(expiration_badge(p.snapshot().expiration_status(today)))
        })
        .collect();

    if matches!(format, OutputFormat::Table) {
        println!("{}", style(format!("{} Products", args.category.title())).bold());
    }
    TableFormatter::new(CATEGORY_COLUMNS).print(&rows, format)?;
    if matches!(format, OutputFormat::Table) && page.total_pages() > 1 {
        println!(
            "Page {} of {} ({} products)",
            style(page.number).cyan(),
            page.total_pages(),
            page.total
        );
    }
    Ok(())
}
