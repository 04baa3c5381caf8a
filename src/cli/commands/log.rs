//! `minv log` command - Show the activity log

use miette::Result;

use crate::cli::commands::utils::Session;
use crate::cli::output::{effective_format, print_serialized};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::activity::{query_activity, ActivityFilter};
use crate::core::classify::parse_expiration_date;
use crate::entities::activity::{ActivityEntry, ActivityType, EntityType};

/// Entries shown when no limit is given
pub const DEFAULT_LOG_LIMIT: usize = 100;

#[derive(clap::Args, Debug)]
pub struct LogArgs {
    /// Filter by activity type
    #[arg(long, short = 'a')]
    pub activity: Option<ActivityType>,

    /// Filter by entity type
    #[arg(long, short = 'e')]
    pub entity: Option<EntityType>,

    /// Only entries on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Only entries on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n', default_value_t = DEFAULT_LOG_LIMIT)]
    pub limit: usize,
}

const LOG_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("date", "DATE", 16),
    ColumnDef::new("activity", "ACTIVITY", 16),
    ColumnDef::new("entity_type", "ENTITY TYPE", 11),
    ColumnDef::new("entity", "ENTITY", 22),
    ColumnDef::new("description", "DESCRIPTION", 40),
    ColumnDef::new("actor", "BY", 12),
];

/// Log row; the report export uses the same columns
pub fn activity_row(entry: &ActivityEntry) -> TableRow {
    TableRow::new(entry.id.to_string())
        .cell(entry.created.format("%Y-%m-%d %H:%M").to_string())
        .cell(entry.activity_type.label())
        .cell(entry.entity_type.to_string())
        .cell(entry.entity_name.clone().unwrap_or_else(|| "-".to_string()))
        .cell(entry.description.clone())
        .cell(entry.actor.clone())
}

pub fn run(args: LogArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;

    let filter = ActivityFilter {
        activity_type: args.activity,
        entity_type: args.entity,
        since: args.since.as_deref().map(parse_expiration_date).transpose()?,
        until: args.until.as_deref().map(parse_expiration_date).transpose()?,
        limit: Some(args.limit),
    };
    let entries = query_activity(&session.project, &filter)?;

    if entries.is_empty() {
        println!("No activity found.");
        return Ok(());
    }

    let format = effective_format(global.output, true);
    if print_serialized(&entries, format)? {
        return Ok(());
    }

    let rows: Vec<TableRow> = entries.iter().map(activity_row).collect();
    TableFormatter::new(LOG_COLUMNS).print(&rows, format)
}
