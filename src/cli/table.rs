//! Table rendering for list output

use miette::{IntoDiagnostic, Result};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

/// Column definition for list output
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    /// Characters kept in table mode before truncating
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// One row: the record's ID plus its cells in column order
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, value: impl Into<String>) -> Self {
        self.cells.push(value.into());
        self
    }
}

/// Renders rows as a table, CSV, Markdown or bare IDs
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef]) -> Self {
        Self { columns }
    }

    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Id => Ok(rows
                .iter()
                .map(|r| format!("{}\n", r.id))
                .collect::<String>()),
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => Ok(self.render_tabled(rows, true)),
            _ => Ok(self.render_tabled(rows, false)),
        }
    }

    pub fn print(&self, rows: &[TableRow], format: OutputFormat) -> Result<()> {
        let rendered = self.render(rows, format)?;
        if rendered.ends_with('\n') {
            print!("{}", rendered);
        } else {
            println!("{}", rendered);
        }
        Ok(())
    }

    fn render_tabled(&self, rows: &[TableRow], markdown: bool) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header.to_string()));
        for row in rows {
            builder.push_record(self.columns.iter().zip(&row.cells).map(|(col, cell)| {
                if markdown {
                    cell.replace('|', "\\|")
                } else {
                    crate::cli::helpers::truncate_str(cell, col.width)
                }
            }));
        }
        let mut table = builder.build();
        if markdown {
            table.with(Style::markdown());
        } else {
            table.with(Style::rounded());
        }
        table.to_string()
    }

    fn render_csv(&self, rows: &[TableRow]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns.iter().map(|c| c.key))
            .into_diagnostic()?;
        for row in rows {
            writer.write_record(&row.cells).into_diagnostic()?;
        }
        let bytes = writer.into_inner().into_diagnostic()?;
        String::from_utf8(bytes).into_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("name", "NAME", 10),
        ColumnDef::new("stock", "STOCK", 6),
    ];

    fn rows() -> Vec<TableRow> {
        vec![
            TableRow::new("PROD-1").cell("Ribeye, bone-in").cell("4"),
            TableRow::new("PROD-2").cell("Wings").cell("30"),
        ]
    }

    #[test]
    fn test_csv_quotes_commas() {
        let out = TableFormatter::new(COLUMNS).render(&rows(), OutputFormat::Csv).unwrap();
        assert_eq!(out, "name,stock\n\"Ribeye, bone-in\",4\nWings,30\n");
    }

    #[test]
    fn test_id_output() {
        let out = TableFormatter::new(COLUMNS).render(&rows(), OutputFormat::Id).unwrap();
        assert_eq!(out, "PROD-1\nPROD-2\n");
    }

    #[test]
    fn test_table_truncates_to_column_width() {
        let out = TableFormatter::new(COLUMNS).render(&rows(), OutputFormat::Table).unwrap();
        assert!(out.contains("NAME"));
        assert!(out.contains("Ribeye,..."));
        assert!(!out.contains("bone-in"));
    }

    #[test]
    fn test_markdown_keeps_full_text() {
        let out = TableFormatter::new(COLUMNS).render(&rows(), OutputFormat::Md).unwrap();
        assert!(out.contains("| Ribeye, bone-in"));
    }
}
