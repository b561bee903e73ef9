//! CSV decoding for survey exports.

use anyhow::{Context, Result};
use csv::ReaderBuilder;

/// A CSV export held as strings, before any type coercion.
///
/// Headers are trimmed of surrounding whitespace so that exports with
/// stray padding (`" Rating "`) still match configured column names.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of `name` among the headers, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name.trim())
    }

    /// The cell at (`row`, `col`). Short rows read as absent.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

/// Decodes CSV bytes with a header row into a [`RawTable`].
///
/// Rows with fewer or more fields than the header are kept as-is.
///
/// # Errors
///
/// Returns an error if the bytes are not valid CSV (e.g. invalid UTF-8).
pub fn parse_table(bytes: &[u8]) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr
        .headers()
        .context("failed to read CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("malformed CSV record {}", line + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_bytes_gives_empty_table() {
        let table = parse_table(b"").unwrap();
        assert!(table.is_empty());
        assert!(table.headers().is_empty());
    }

    #[test]
    fn test_headers_are_trimmed() {
        let table = parse_table(b" Rating ,Date\n9,2022-01-01\n").unwrap();
        assert_eq!(table.headers(), &["Rating".to_string(), "Date".to_string()]);
        assert_eq!(table.column_index("Rating"), Some(0));
        assert_eq!(table.column_index(" Date"), Some(1));
    }

    #[test]
    fn test_quoted_header_with_punctuation() {
        let csv = "\"What's your cohort?\",\"How likely, really?\"\nMay 2022,10\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        assert_eq!(table.column_index("How likely, really?"), Some(1));
        assert_eq!(table.cell(0, 0), Some("May 2022"));
    }

    #[test]
    fn test_short_rows_read_as_absent() {
        let table = parse_table(b"a,b,c\n1,2\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 1), Some("2"));
        assert_eq!(table.cell(0, 2), None);
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let bytes = vec![b'a', b'\n', 0xFF, 0xFE, b'\n'];
        assert!(parse_table(&bytes).is_err());
    }
}
