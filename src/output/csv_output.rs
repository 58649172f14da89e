//! Delimited-text table writer
//!
//! Tables are written as UTF-8 with a leading byte-order mark so that
//! spreadsheet tools detect the encoding of accented text.

use crate::output::Table;
use crate::HarvestError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes a table to any writer: BOM, header row, then data rows
pub fn write_table_to<W: Write>(
    mut writer: W,
    table: &Table,
    delimiter: char,
) -> Result<(), HarvestError> {
    if !delimiter.is_ascii() {
        return Err(HarvestError::Output(format!(
            "delimiter {:?} is not a single-byte character",
            delimiter
        )));
    }

    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(&table.header)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Writes a table to a file, creating parent directories as needed
pub fn write_table(path: &Path, table: &Table, delimiter: char) -> Result<(), HarvestError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_table_to(BufWriter::new(file), table, delimiter)?;

    tracing::info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
