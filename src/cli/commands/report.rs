//! `minv report` command - Export activity reports

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::commands::utils::Session;
use crate::cli::GlobalOpts;
use crate::core::activity::{query_activity, ActivityFilter};
use crate::core::report::{default_file_name, render, ReportFormat, ReportMeta};
use crate::entities::activity::{ActivityType, EntityType};

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Export the activity log as a report file
    Export(ExportArgs),
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Only include this activity type
    #[arg(long, short = 'a')]
    pub activity: Option<ActivityType>,

    /// Only include this entity type
    #[arg(long, short = 'e')]
    pub entity: Option<EntityType>,

    /// Report format
    #[arg(long, short = 'f', value_enum, default_value_t = ReportFormat::Csv)]
    pub format: ReportFormat,

    /// Output file (default: meat-inventory-report-<date>.<ext> in the current directory)
    #[arg(long, conflicts_with = "stdout")]
    pub file: Option<PathBuf>,

    /// Write the report to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

pub fn run(cmd: ReportCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ReportCommands::Export(args) => run_export(args, global),
    }
}

fn run_export(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;

    let filter = ActivityFilter {
        activity_type: args.activity,
        entity_type: args.entity,
        ..Default::default()
    };
    let entries = query_activity(&session.project, &filter)?;

    let meta = ReportMeta::new(session.clock.now(), args.activity, args.entity, entries.len());
    let content = render(&entries, &meta, args.format)?;

    if args.stdout {
        print!("{}", content);
        return Ok(());
    }

    let path = args
        .file
        .unwrap_or_else(|| PathBuf::from(default_file_name(session.clock.today(), args.format)));
    fs::write(&path, content).into_diagnostic()?;
    log::info!("Wrote {} activities to {}", entries.len(), path.display());

    println!(
        "{} Exported {} activities to {}",
        style("✓").green(),
        style(entries.len()).cyan(),
        style(path.display()).yellow()
    );
    Ok(())
}
