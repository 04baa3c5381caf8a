//! `minv stock` command - Stock adjustments and transaction history

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::utils::Session;
use crate::cli::helpers::display_id;
use crate::cli::output::{effective_format, print_serialized};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::activity::NewActivity;
use crate::core::classify::Classifiable;
use crate::core::role::Action;
use crate::core::stock::{self, activity_for, load_transactions, transaction_journal};
use crate::entities::activity::EntityType;
use crate::entities::transaction::TransactionType;

#[derive(Subcommand, Debug)]
pub enum StockCommands {
    /// Record a stock movement for a product
    Adjust(AdjustArgs),

    /// List recorded stock movements, newest first
    History(HistoryArgs),
}

#[derive(clap::Args, Debug)]
pub struct AdjustArgs {
    /// Product ID, ID prefix or short ID (PROD@N)
    pub id: String,

    /// Kind of movement
    #[arg(long = "type", short = 't')]
    pub kind: TransactionType,

    /// Units moved; for an adjustment, the counted stock level
    #[arg(long, short = 'q', allow_negative_numbers = true)]
    pub quantity: i64,

    /// Free-form notes (reason, invoice number, ...)
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Only movements of this product
    pub id: Option<String>,

    /// Filter by movement type
    #[arg(long = "type", short = 't')]
    pub kind: Option<TransactionType>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

const HISTORY_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("date", "DATE", 16),
    ColumnDef::new("product", "PRODUCT", 24),
    ColumnDef::new("type", "TYPE", 10),
    ColumnDef::new("quantity", "QTY", 6),
    ColumnDef::new("before", "BEFORE", 6),
    ColumnDef::new("after", "AFTER", 6),
    ColumnDef::new("by", "BY", 12),
    ColumnDef::new("notes", "NOTES", 24),
];

pub fn run(cmd: StockCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        StockCommands::Adjust(args) => run_adjust(args, global),
        StockCommands::History(args) => run_history(args, global),
    }
}

fn run_adjust(args: AdjustArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    session.config.role().require(Action::AdjustStock)?;
    let store = session.store();
    let stored = store.find(&args.id)?;
    let mut product = stored.product.clone();
    let author = session.config.author();

    let txn = stock::apply(
        &mut product,
        args.kind,
        args.quantity,
        args.notes,
        &author,
        session.clock.as_ref(),
    )?;

    // The product file is the source of truth; write it before journaling
    store.save(&product, Some(&stored.path))?;
    transaction_journal(&session.project).append(&txn)?;

    session.log_activity(
        NewActivity::new(
            activity_for(txn.transaction_type),
            EntityType::Stock,
            format!(
                "{} - {} units for {}",
                txn.transaction_type, txn.quantity, product.name
            ),
        )
        .entity(product.id, product.name.clone())
        .metadata(serde_json::json!({
            "transaction_id": txn.id.to_string(),
            "transaction_type": txn.transaction_type,
            "quantity": txn.quantity,
            "stock_before": txn.stock_before,
            "stock_after": txn.stock_after,
        })),
    );

    match global.output {
        OutputFormat::Id => println!("{}", txn.id),
        OutputFormat::Json | OutputFormat::Yaml => {
            print_serialized(&txn, global.output)?;
        }
        _ => {
            let status = product.snapshot().stock_status(true)?;
            println!(
                "{} {} {} units for {}: {} → {}",
                style("✓").green(),
                txn.transaction_type,
                txn.quantity,
                style(&product.name).yellow(),
                txn.stock_before,
                style(txn.stock_after).cyan()
            );
            if status.needs_restock() {
                println!(
                    "   {} {} stock ({} of minimum {})",
                    style("!").yellow(),
                    status.label(),
                    product.current_stock,
                    product.min_stock_level
                );
            }
        }
    }

    Ok(())
}

fn run_history(args: HistoryArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;

    let product_id = match args.id.as_deref() {
        Some(reference) => Some(session.store().find(reference)?.product.id),
        None => None,
    };

    let mut transactions: Vec<_> = load_transactions(&session.project)?
        .into_iter()
        .filter(|t| product_id.is_none_or(|id| t.product_id == id))
        .filter(|t| args.kind.is_none_or(|k| t.transaction_type == k))
        .collect();
    // Journal order is chronological, newest last
    transactions.reverse();
    transactions.sort_by(|a, b| b.created.cmp(&a.created));
    if let Some(limit) = args.limit {
        transactions.truncate(limit);
    }

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let format = effective_format(global.output, true);
    if print_serialized(&transactions, format)? {
        return Ok(());
    }

    let short_ids = session.short_ids();
    let rows: Vec<TableRow> = transactions
        .iter()
        .map(|t| {
            TableRow::new(t.id.to_string())
                .cell(t.created.format("%Y-%m-%d %H:%M").to_string())
                .cell(format!(
                    "{} ({})",
                    t.product_name,
                    display_id(&t.product_id, &short_ids)
                ))
                .cell(t.transaction_type.to_string())
                .cell(t.quantity.to_string())
                .cell(t.stock_before.to_string())
                .cell(t.stock_after.to_string())
                .cell(t.created_by.clone())
                .cell(t.notes.clone().unwrap_or_default())
        })
        .collect();
    TableFormatter::new(HISTORY_COLUMNS).print(&rows, format)
}
