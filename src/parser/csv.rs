//! CSV table loader

use std::io::Read;

use tracing::debug;

use crate::error::{ContactError, Result};
use crate::model::{Headers, Table};

/// Read a header record followed by data records.
///
/// Every data record must have exactly one cell per header.
pub fn read_table<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let header_record = csv_reader.headers()?.clone();
    if header_record.is_empty() {
        return Err(ContactError::MissingHeader);
    }
    let headers = Headers::new(header_record.iter().map(String::from).collect())?;
    debug!(columns = headers.len(), "read header row");

    let mut table = Table::new(headers);
    for (record_num, result) in csv_reader.records().enumerate() {
        let record = result?;
        // +2 for 1-indexing and header
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(record_num + 2);
        table.push_cells(record.iter().map(String::from).collect(), line)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_table() {
        let data = "Name,Phone 1 - Value\n\"Doe, John\",0601\nAnn,\"say \"\"hi\"\"\"\n";
        let table = read_table(data.as_bytes()).unwrap();

        assert_eq!(
            table.headers.iter().collect::<Vec<_>>(),
            vec!["Name", "Phone 1 - Value"]
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].cells, vec!["Doe, John", "0601"]);
        assert_eq!(table.rows[1].get("Phone 1 - Value"), Some("say \"hi\""));
        assert_eq!(table.rows[0].source_line, 2);
        assert_eq!(table.rows[1].source_line, 3);
    }

    #[test]
    fn test_short_row_is_malformed() {
        let data = "Name,Phone 1 - Value\nAnn,0601\nBob\n";
        let err = read_table(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ContactError::MalformedRow {
                line: 3,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_long_row_is_malformed() {
        let data = "Name\nAnn,extra\n";
        assert!(matches!(
            read_table(data.as_bytes()),
            Err(ContactError::MalformedRow { found: 2, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            read_table("".as_bytes()),
            Err(ContactError::MissingHeader)
        ));
    }

    #[test]
    fn test_header_only() {
        let table = read_table("Name,Notes\n".as_bytes()).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }
}
