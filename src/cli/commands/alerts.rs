//! `minv alerts` command - Ranked low-stock and expiration alerts

use clap::Subcommand;
use miette::Result;

use crate::cli::commands::utils::Session;
use crate::cli::output::{effective_format, print_serialized};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::alerts::{expiration_alerts, stock_alerts, ExpirationAlert, StockAlert};
use crate::core::classify::{ExpirationStatus, EXPIRING_SOON_DAYS};
use crate::core::shortid::ShortIdIndex;

#[derive(Subcommand, Debug)]
pub enum AlertsCommands {
    /// Products at or below their minimum stock, most depleted first
    Stock(StockArgs),

    /// Products close to their expiration date, most imminent first
    Expiring(ExpiringArgs),
}

#[derive(clap::Args, Debug)]
pub struct StockArgs {
    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct ExpiringArgs {
    /// Window in days (today counts as day 0)
    #[arg(long, short = 'w', default_value_t = EXPIRING_SOON_DAYS)]
    pub within: i64,

    /// Include products that have already expired
    #[arg(long)]
    pub include_expired: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub const STOCK_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("short", "SHORT", 8),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("category", "CATEGORY", 8),
    ColumnDef::new("stock", "STOCK", 11),
    ColumnDef::new("severity", "SEVERITY", 8),
];

pub const EXPIRING_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("short", "SHORT", 8),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("category", "CATEGORY", 8),
    ColumnDef::new("expires", "EXPIRES", 10),
    ColumnDef::new("days", "DAYS", 12),
];

pub fn run(cmd: AlertsCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AlertsCommands::Stock(args) => run_stock(args, global),
        AlertsCommands::Expiring(args) => run_expiring(args, global),
    }
}

/// Stock alert rows; the dashboard reuses them
pub fn stock_rows(alerts: &[StockAlert<'_>], short_ids: &ShortIdIndex) -> Vec<TableRow> {
    alerts
        .iter()
        .map(|a| {
            let short = short_ids
                .get_short_id(&a.product.id)
                .unwrap_or_else(|| a.product.id.clone());
            TableRow::new(a.product.id.clone())
                .cell(short)
                .cell(a.product.name)
                .cell(a.product.category)
                .cell(format!("{}/{}", a.product.current_stock, a.product.min_stock_level))
                .cell(a.severity.label())
        })
        .collect()
}

/// "in 3 days", "today", "2 days ago"
pub fn days_text(status: ExpirationStatus, days: i64) -> String {
    match (status, days) {
        (_, 0) => "today".to_string(),
        (_, 1) => "tomorrow".to_string(),
        (ExpirationStatus::Expired, d) => format!("{} day(s) ago", -d),
        (_, d) => format!("in {} days", d),
    }
}

/// Expiration alert rows; the dashboard reuses them
pub fn expiring_rows(alerts: &[ExpirationAlert<'_>], short_ids: &ShortIdIndex) -> Vec<TableRow> {
    alerts
        .iter()
        .map(|a| {
            let short = short_ids
                .get_short_id(&a.product.id)
                .unwrap_or_else(|| a.product.id.clone());
            TableRow::new(a.product.id.clone())
                .cell(short)
                .cell(a.product.name)
                .cell(a.product.category)
                .cell(
                    a.product
                        .expiration_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                )
                .cell(days_text(a.status, a.days_until))
        })
        .collect()
}

fn run_stock(args: StockArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let products = session.store().products();
    let mut alerts = stock_alerts(&products, session.clock.today())?;
    if let Some(limit) = args.limit {
        alerts.truncate(limit);
    }

    if alerts.is_empty() {
        println!("All products are well stocked.");
        return Ok(());
    }

    let format = effective_format(global.output, true);
    if print_serialized(&alerts, format)? {
        return Ok(());
    }

    let mut short_ids = session.short_ids();
    short_ids.ensure_all(alerts.iter().map(|a| a.product.id.clone()));
    short_ids.save_or_warn(&session.project);

    TableFormatter::new(STOCK_COLUMNS).print(&stock_rows(&alerts, &short_ids), format)
}

fn run_expiring(args: ExpiringArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let products = session.store().products();
    let mut alerts = expiration_alerts(
        &products,
        session.clock.today(),
        args.within,
        args.include_expired,
    )?;
    if let Some(limit) = args.limit {
        alerts.truncate(limit);
    }

    if alerts.is_empty() {
        println!("No products expiring within {} days.", args.within);
        return Ok(());
    }

    let format = effective_format(global.output, true);
    if print_serialized(&alerts, format)? {
        return Ok(());
    }

    let mut short_ids = session.short_ids();
    short_ids.ensure_all(alerts.iter().map(|a| a.product.id.clone()));
    short_ids.save_or_warn(&session.project);

    TableFormatter::new(EXPIRING_COLUMNS).print(&expiring_rows(&alerts, &short_ids), format)
}
