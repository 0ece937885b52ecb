//! Encoder
//!
//! Writes rows as delimited text under a derived header.

use bytes::Bytes;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{CsvDbError, Result};
use crate::row::Row;

/// Byte order mark; readers strip it from the start of a file
const BOM: char = '\u{feff}';

/// Derive the header for a set of rows
///
/// First row's field names in order, then names first seen in later rows.
pub fn header_for(rows: &[Row]) -> Vec<&str> {
    let mut header: Vec<&str> = Vec::new();
    for row in rows {
        for name in row.field_names() {
            if !header.contains(&name) {
                header.push(name);
            }
        }
    }
    header
}

/// Encode rows into file contents
///
/// Empty input produces empty output (no header-only file). Rows without
/// any field cannot be represented and are rejected.
pub fn encode_rows(rows: &[Row], delimiter: u8) -> Result<Bytes> {
    if rows.is_empty() {
        return Ok(Bytes::new());
    }

    let header = header_for(rows);
    if header.is_empty() {
        return Err(CsvDbError::EmptyRow);
    }

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .quote_style(quote_style(rows, &header))
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(64 * (rows.len() + 1)));

    writer.write_record(&header).map_err(write_error)?;
    for row in rows {
        writer
            .write_record(header.iter().map(|name| row.get(name).unwrap_or("")))
            .map_err(write_error)?;
    }

    let buf = writer
        .into_inner()
        .map_err(|e| CsvDbError::Io(e.into_error()))?;
    Ok(Bytes::from(buf))
}

/// Quote only where needed, except when an unquoted field would not read
/// back: a lone empty column looks like a blank line, a leading BOM in the
/// first header name is stripped on read, and a bare `\r` ends a record.
fn quote_style(rows: &[Row], header: &[&str]) -> QuoteStyle {
    let lone_empty = header.len() == 1
        && (header[0].is_empty()
            || rows.iter().any(|r| r.get(header[0]).unwrap_or("").is_empty()));
    let leading_bom = header.first().is_some_and(|name| name.starts_with(BOM));
    let carriage_return = header.iter().any(|name| name.contains('\r'))
        || rows
            .iter()
            .any(|row| row.iter().any(|(_, value)| value.contains('\r')));

    if lone_empty || leading_bom || carriage_return {
        QuoteStyle::Always
    } else {
        QuoteStyle::Necessary
    }
}

fn write_error(e: csv::Error) -> CsvDbError {
    let line = e.position().map_or(0, |p| p.line() as usize);
    CsvDbError::codec(line, e.to_string())
}
