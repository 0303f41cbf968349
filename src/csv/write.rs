//! CSV serialization of tables, used for the raw per-source snapshots.

use crate::csv::config::CsvConfig;
use crate::table::Table;
use csv::{Terminator, WriterBuilder};

/// Render `table` as CSV text with a header line.
///
/// Missing cells are written as empty fields. A table without columns renders
/// as an empty document.
pub fn write_csv(table: &Table, config: &CsvConfig) -> Result<Vec<u8>, csv::Error> {
    if table.columns().is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = WriterBuilder::new()
        .delimiter(config.delimiter)
        .quote(config.quote)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
