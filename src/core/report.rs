//! Activity report rendering

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use miette::Diagnostic;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use thiserror::Error;

use crate::entities::activity::{ActivityEntry, ActivityType, EntityType};

pub const REPORT_TITLE: &str = "Meat Inventory System — Activity Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ReportFormat {
    #[default]
    Csv,
    Md,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Md => "md",
            ReportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("No activities to export")]
    #[diagnostic(
        code(minv::report::empty),
        help("Widen the --activity / --entity filters, or record some activity first")
    )]
    Empty,

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Report is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Header block of a report
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub title: &'static str,
    pub generated: DateTime<Utc>,
    pub activity_filter: Option<ActivityType>,
    pub entity_filter: Option<EntityType>,
    pub total_records: usize,
}

impl ReportMeta {
    pub fn new(
        generated: DateTime<Utc>,
        activity_filter: Option<ActivityType>,
        entity_filter: Option<EntityType>,
        total_records: usize,
    ) -> Self {
        Self {
            title: REPORT_TITLE,
            generated,
            activity_filter,
            entity_filter,
            total_records,
        }
    }

    fn header_lines(&self) -> Vec<String> {
        vec![
            format!("Generated: {}", self.generated.format("%Y-%m-%d %H:%M UTC")),
            format!(
                "Filter: {}",
                self.activity_filter
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_else(|| "All Activities".to_string())
            ),
            format!(
                "Entity: {}",
                self.entity_filter
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "All Entities".to_string())
            ),
            format!("Total Records: {}", self.total_records),
        ]
    }
}

/// Default file name of a report generated on `date`
pub fn default_file_name(date: NaiveDate, format: ReportFormat) -> String {
    format!(
        "meat-inventory-report-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

const HEADERS: [&str; 5] = ["Date", "Activity", "Entity Type", "Entity", "Description"];

fn record(entry: &ActivityEntry) -> [String; 5] {
    [
        entry.created.format("%Y-%m-%d %H:%M").to_string(),
        entry.activity_type.label(),
        entry.entity_type.to_string(),
        entry.entity_name.clone().unwrap_or_else(|| "-".to_string()),
        entry.description.clone(),
    ]
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    meta: &'a ReportMeta,
    activities: &'a [ActivityEntry],
}

/// Render `entries` (newest first) as a report
pub fn render(
    entries: &[ActivityEntry],
    meta: &ReportMeta,
    format: ReportFormat,
) -> Result<String, ReportError> {
    if entries.is_empty() {
        return Err(ReportError::Empty);
    }

    match format {
        ReportFormat::Json => {
            let report = JsonReport {
                meta,
                activities: entries,
            };
            Ok(serde_json::to_string_pretty(&report)? + "\n")
        }
        ReportFormat::Csv => {
            let mut out = format!("# {}\n", meta.title);
            for line in meta.header_lines() {
                out.push_str(&format!("# {}\n", line));
            }
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(HEADERS)?;
            for entry in entries {
                writer.write_record(record(entry))?;
            }
            let bytes = writer.into_inner().map_err(|e| ReportError::Csv(e.into_error().into()))?;
            out.push_str(&String::from_utf8(bytes)?);
            Ok(out)
        }
        ReportFormat::Md => {
            let mut out = format!("# {}\n\n", meta.title);
            for line in meta.header_lines() {
                out.push_str(&format!("- {}\n", line));
            }
            out.push('\n');

            let mut builder = Builder::default();
            builder.push_record(HEADERS);
            for entry in entries {
                builder.push_record(record(entry).map(|cell| cell.replace('|', "\\|")));
            }
            let mut table = builder.build();
            table.with(Style::markdown());
            out.push_str(&table.to_string());
            out.push('\n');
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityId;
    use chrono::TimeZone;

    fn entry(id: &str, minute: u32, kind: ActivityType, name: &str, description: &str) -> ActivityEntry {
        ActivityEntry {
            id: id.parse::<EntityId>().unwrap(),
            activity_type: kind,
            entity_type: EntityType::Stock,
            entity_id: None,
            entity_name: Some(name.to_string()),
            description: description.to_string(),
            metadata: None,
            actor: "tester".to_string(),
            created: Utc.with_ymd_and_hms(2025, 6, 15, 9, minute, 0).unwrap(),
        }
    }

    fn sample() -> (Vec<ActivityEntry>, ReportMeta) {
        let entries = vec![
            entry(
                "ACT-01J1Z8X5T1M8Q4W3R2Y6B7N9KD",
                30,
                ActivityType::StockRemoved,
                "Ribeye, bone-in",
                "sale - 2 units for Ribeye, bone-in",
            ),
            entry(
                "ACT-01J1Z8X5T1M8Q4W3R2Y6B7N9KC",
                15,
                ActivityType::StockAdded,
                "Wings",
                "addition - 40 units for Wings",
            ),
        ];
        let meta = ReportMeta::new(
            Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap(),
            None,
            Some(EntityType::Stock),
            entries.len(),
        );
        (entries, meta)
    }

    #[test]
    fn test_csv_report() {
        let (entries, meta) = sample();
        let out = render(&entries, &meta, ReportFormat::Csv).unwrap();
        insta::assert_snapshot!(out, @r###"
        # Meat Inventory System — Activity Report
        # Generated: 2025-06-15 12:00 UTC
        # Filter: All Activities
        # Entity: stock
        # Total Records: 2
        Date,Activity,Entity Type,Entity,Description
        2025-06-15 09:30,STOCK REMOVED,stock,"Ribeye, bone-in","sale - 2 units for Ribeye, bone-in"
        2025-06-15 09:15,STOCK ADDED,stock,Wings,addition - 40 units for Wings
        "###);
    }

    #[test]
    fn test_markdown_report() {
        let (entries, meta) = sample();
        let out = render(&entries, &meta, ReportFormat::Md).unwrap();
        assert!(out.starts_with("# Meat Inventory System — Activity Report\n\n"));
        assert!(out.contains("- Total Records: 2\n"));
        assert!(out.contains("| Date"));
        assert!(out.contains("| STOCK ADDED"));
    }

    #[test]
    fn test_json_report() {
        let (entries, meta) = sample();
        let out = render(&entries, &meta, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], REPORT_TITLE);
        assert_eq!(value["total_records"], 2);
        assert_eq!(value["entity_filter"], "stock");
        assert_eq!(value["activities"][0]["activity_type"], "stock_removed");
    }

    #[test]
    fn test_empty_report_is_an_error() {
        let (_, meta) = sample();
        assert!(matches!(
            render(&[], &meta, ReportFormat::Csv),
            Err(ReportError::Empty)
        ));
    }

    #[test]
    fn test_default_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(
            default_file_name(date, ReportFormat::Md),
            "meat-inventory-report-2025-06-15.md"
        );
    }
}
