//! CSV exporter

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{ContactError, Result};
use crate::model::Table;

/// Write the header row and every data row
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(table.headers.iter())?;
    for row in &table.rows {
        csv_writer.write_record(&row.cells)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Export to `path`, or to stdout when no path is given
pub fn export(table: &Table, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| ContactError::io(path, e))?;
            write_table(table, BufWriter::new(file))?;
            info!(path = %path.display(), rows = table.row_count(), "exported contacts");
        }
        None => {
            let stdout = io::stdout();
            write_table(table, stdout.lock())?;
            info!(rows = table.row_count(), "exported contacts to stdout");
        }
    }
    Ok(())
}
