//! `minv dashboard` command - Inventory summary

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::alerts::{expiring_rows, stock_rows, EXPIRING_COLUMNS, STOCK_COLUMNS};
use crate::cli::commands::utils::Session;
use crate::cli::output::{format_money, print_serialized};
use crate::cli::table::TableFormatter;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::activity::{query_activity, ActivityFilter};
use crate::core::alerts::{expiration_alerts, stock_alerts, ExpirationAlert, StockAlert};
use crate::core::classify::{ExpirationStatus, EXPIRING_SOON_DAYS};
use crate::core::stats::DashboardStats;
use crate::core::stock::load_transactions;
use crate::entities::activity::ActivityEntry;

/// Entries shown in each dashboard widget
const WIDGET_SIZE: usize = 5;

#[derive(clap::Args, Debug)]
pub struct DashboardArgs {}

#[derive(Serialize)]
struct Dashboard<'a> {
    #[serde(flatten)]
    stats: DashboardStats,
    low_stock_alerts: Vec<StockAlert<'a>>,
    expiring_products: Vec<ExpirationAlert<'a>>,
    recent_activity: Vec<ActivityEntry>,
}

pub fn run(_args: DashboardArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let today = session.clock.today();
    let products = session.store().products();
    let transactions = load_transactions(&session.project)?;

    let stats = DashboardStats::compute(&products, &transactions, today, session.clock.now())?;

    let mut low_stock_alerts = stock_alerts(&products, today)?;
    low_stock_alerts.truncate(WIDGET_SIZE);

    let mut expiring_products: Vec<_> = expiration_alerts(&products, today, EXPIRING_SOON_DAYS, false)?
        .into_iter()
        .filter(|a| a.status == ExpirationStatus::ExpiringSoon)
        .collect();
    expiring_products.truncate(WIDGET_SIZE);

    let recent_activity = query_activity(
        &session.project,
        &ActivityFilter {
            limit: Some(WIDGET_SIZE),
            ..Default::default()
        },
    )?;

    let dashboard = Dashboard {
        stats,
        low_stock_alerts,
        expiring_products,
        recent_activity,
    };
    if print_serialized(&dashboard, global.output)? {
        return Ok(());
    }
    if global.output == OutputFormat::Id {
        return Err(miette::miette!("The dashboard has no ID output; use --output json"));
    }

    let currency = session.config.currency_symbol();
    let stats = &dashboard.stats;

    let mut short_ids = session.short_ids();
    short_ids.ensure_all(
        dashboard
            .low_stock_alerts
            .iter()
            .map(|a| a.product.id.clone())
            .chain(dashboard.expiring_products.iter().map(|a| a.product.id.clone())),
    );
    short_ids.save_or_warn(&session.project);

    println!("{}", style("Dashboard").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Total products:    {}", style(stats.total_products).cyan());
    println!("  Low stock:         {}", style(stats.low_stock).yellow());
    println!(
        "  Inventory value:   {}",
        style(format_money(&currency, stats.inventory_value)).green()
    );
    println!("  Expiring soon:     {}", style(stats.expiring_soon).yellow());
    println!("  Expired:           {}", style(stats.expired).red());
    println!("  Sales (last 30d):  {}", style(stats.recent_sales).cyan());

    // Widgets render as plain tables unless another table format was asked for
    let table_format = match global.output {
        OutputFormat::Csv | OutputFormat::Md => global.output,
        _ => OutputFormat::Table,
    };

    println!();
    println!("{}", style("Low Stock Alerts").bold());
    if dashboard.low_stock_alerts.is_empty() {
        println!("  All products are well stocked.");
    } else {
        TableFormatter::new(STOCK_COLUMNS)
            .print(&stock_rows(&dashboard.low_stock_alerts, &short_ids), table_format)?;
    }

    println!();
    println!("{}", style("Expiring Soon").bold());
    if dashboard.expiring_products.is_empty() {
        println!("  No products expiring in the next {} days.", EXPIRING_SOON_DAYS);
    } else {
        TableFormatter::new(EXPIRING_COLUMNS)
            .print(&expiring_rows(&dashboard.expiring_products, &short_ids), table_format)?;
    }

    println!();
    println!("{}", style("Categories").bold());
    for category in &stats.categories {
        println!(
            "  {:<8} {:>4} products  {:>6} units  {}",
            category.category.title(),
            category.product_count,
            category.total_stock,
            format_money(&currency, category.value)
        );
    }

    println!();
    println!("{}", style("Recent Activity").bold());
    if dashboard.recent_activity.is_empty() {
        println!("  No recent activity.");
    }
    for entry in &dashboard.recent_activity {
        println!(
            "  {} {} {}",
            style(entry.created.format("%Y-%m-%d %H:%M")).dim(),
            style(entry.activity_type.label()).cyan(),
            entry.description
        );
    }

    Ok(())
}
