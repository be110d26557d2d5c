//! Loading the contacts export into a table

mod csv;
mod transcode;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use crate::config::SourceEncoding;
use crate::error::{ContactError, Result};
use crate::model::Table;

pub use self::csv::read_table;
pub use self::transcode::{decode_utf16, transcode_to_utf8, utf8_sibling_path, UTF8_SUFFIX};

/// Load a contacts export, transcoding it first when it is UTF-16
pub fn load_table(path: &Path, encoding: SourceEncoding) -> Result<Table> {
    let csv_path = match encoding {
        SourceEncoding::Utf16 => transcode_to_utf8(path)?,
        SourceEncoding::Utf8 => path.to_path_buf(),
    };

    let file = File::open(&csv_path).map_err(|e| ContactError::io(&csv_path, e))?;
    let table = read_table(BufReader::new(file))?;

    info!(
        path = %csv_path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "parsed contacts"
    );
    Ok(table)
}
