//! Raw CSV tables: ordered headers plus one header → cell map per row.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    /// Cell value for `header` in `row`; missing cells read as empty.
    pub fn cell<'a>(row: &'a HashMap<String, String>, header: &str) -> &'a str {
        row.get(header).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read a statement export from disk.
pub fn read_table(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_table_from_reader(file).with_context(|| format!("reading {}", path.display()))
}

/// Read CSV with a header row. Rows may be shorter or longer than the header;
/// missing cells are empty and extra cells are dropped.
pub fn read_table_from_reader<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("reading header row")?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading data row {}", line + 1))?;
        let row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let csv = "Details,Posting Date,Description,Amount,Type\n\
                   DEBIT,08/15/2025,\"NETFLIX.COM 8887800999\",-15.49,ACH_DEBIT\n\
                   CREDIT,08/14/2025,PAYROLL,\"2,500.00\",ACH_CREDIT\n";
        let table = read_table_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(
            table.headers,
            vec!["Details", "Posting Date", "Description", "Amount", "Type"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(RawTable::cell(&table.rows[0], "Description"), "NETFLIX.COM 8887800999");
        assert_eq!(RawTable::cell(&table.rows[1], "Amount"), "2,500.00");
    }

    #[test]
    fn strips_byte_order_mark() {
        let csv = "\u{feff}Description,Amount\nHULU,-7.99\n";
        let table = read_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.headers[0], "Description");
        assert_eq!(RawTable::cell(&table.rows[0], "Description"), "HULU");
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let csv = "Description,Amount,Category\nHULU,-7.99\n";
        let table = read_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(RawTable::cell(&table.rows[0], "Category"), "");
        assert_eq!(RawTable::cell(&table.rows[0], "Nope"), "");
    }

    #[test]
    fn header_only_file_is_empty() {
        let table = read_table_from_reader("Description,Amount\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers.len(), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_table("/definitely/not/here.csv").unwrap_err();
        assert!(format!("{err:#}").contains("here.csv"));
    }
}
