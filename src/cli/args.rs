//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    alerts::AlertsCommands, category::CategoryCommands, completions::CompletionsArgs,
    dashboard::DashboardArgs, init::InitArgs, log::LogArgs, product::ProductCommands,
    report::ReportCommands, stock::StockCommands, validate::ValidateArgs,
};
use crate::core::clock::{clock_for, Clock};

/// Meat Inventory Toolkit - track stock levels and expiration dates as plain-text files
#[derive(Parser, Debug)]
#[command(name = "minv", version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "auto")]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Reference date for classification and timestamps (YYYY-MM-DD)
    #[arg(long, global = true, hide = true, env = "MINV_TODAY")]
    pub today: Option<String>,
}

impl GlobalOpts {
    /// The clock every command reads "now" from
    pub fn clock(&self) -> miette::Result<Box<dyn Clock>> {
        Ok(clock_for(self.today.as_deref())?)
    }

    /// Default log filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Table for lists, details for single records
    #[default]
    Auto,
    /// Bordered table
    Table,
    Json,
    Yaml,
    Csv,
    /// Markdown table
    Md,
    /// IDs only, one per line
    Id,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new inventory project
    Init(InitArgs),

    /// Product catalog management
    #[command(subcommand)]
    Product(ProductCommands),

    /// Category overview and per-category listings
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Stock adjustments and transaction history
    #[command(subcommand)]
    Stock(StockCommands),

    /// Inventory summary with alerts and recent activity
    Dashboard(DashboardArgs),

    /// Low-stock and expiration alerts
    #[command(subcommand)]
    Alerts(AlertsCommands),

    /// Show the activity log
    Log(LogArgs),

    /// Export activity reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Validate product files
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
