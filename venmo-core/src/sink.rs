//! CSV output for export rows.

use std::io::Write;

use anyhow::{Context, Result};

use crate::types::ExportRow;

/// The header the export has always carried. The last two labels do not
/// describe their columns (type and note).
pub const LEGACY_HEADER: [&str; 4] = ["Amount", "Date", "Note Name", "Note Date"];
pub const CORRECTED_HEADER: [&str; 4] = ["Amount", "Date", "Type", "Note"];

/// Destination for accepted rows.
pub trait RowSink {
    fn write_row(&mut self, row: &ExportRow) -> Result<()>;
}

/// Writes rows as CSV, flushing after every row so partial output survives
/// a later failure.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W, header: [&str; 4]) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
        writer.write_record(header).context("write CSV header")?;
        writer.flush().context("flush CSV header")?;
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("flush CSV output: {}", e.error()))
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_row(&mut self, row: &ExportRow) -> Result<()> {
        self.writer
            .write_record(row.to_record())
            .context("write transaction to CSV")?;
        self.writer.flush().context("flush CSV output")?;
        Ok(())
    }
}

/// Collects rows in memory.
impl RowSink for Vec<ExportRow> {
    fn write_row(&mut self, row: &ExportRow) -> Result<()> {
        self.push(row.clone());
        Ok(())
    }
}
