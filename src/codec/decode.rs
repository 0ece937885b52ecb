//! Decoder
//!
//! Reads delimited text into rows keyed by the header line.

use std::collections::HashSet;

use csv::ReaderBuilder;

use crate::error::{CsvDbError, Result};
use crate::row::Row;

/// Decode file contents into rows
///
/// The first record is the header. Each following record becomes a row
/// mapping header name → field text. Short records are padded with empty
/// values; long records are an error.
pub fn decode_rows(bytes: &[u8], delimiter: u8) -> Result<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let header = reader.headers().map_err(codec_error)?.clone();
    if header.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::with_capacity(header.len());
    for name in &header {
        if !seen.insert(name) {
            return Err(CsvDbError::codec(
                1,
                format!("duplicate header field {:?}", name),
            ));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(codec_error)?;
        if record.len() > header.len() {
            let line = record.position().map_or(0, |p| p.line() as usize);
            return Err(CsvDbError::codec(
                line,
                format!(
                    "record has {} fields but the header has {}",
                    record.len(),
                    header.len()
                ),
            ));
        }

        let row: Row = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name, record.get(i).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Map a reader error to a codec error at the record's line
fn codec_error(e: csv::Error) -> CsvDbError {
    let line = e.position().map_or(0, |p| p.line() as usize);
    CsvDbError::codec(line, e.to_string())
}
