//! Codec Module
//!
//! Converts between the on-disk delimited text and in-memory rows.
//!
//! Parsing and quoting are done by the `csv` crate; this module only adds
//! the row-level policy (header derivation, padding, field-less rows).
//!
//! ## File Format
//! ```text
//! id,foo          <- header: field names
//! 1,bar           <- one record per line, values in header order
//! 2,"a,b"         <- fields holding the delimiter, quotes or newlines are quoted
//! ```
//!
//! - Records end with `\n` (`\r\n` is accepted on read)
//! - Empty lines are skipped on read; a line holding only spaces is a record
//! - Empty input decodes to no rows, and no rows encode to empty output
//! - A row with no fields has no representation and is rejected
//!
//! ## Header Policy
//! The header is the first row's field names in order, followed by any names
//! first seen in later rows. Rows lacking a header field encode it as empty.
//! Mixed schemas therefore do not round-trip exactly; homogeneous ones do.

mod decode;
mod encode;

pub use decode::decode_rows;
pub use encode::{encode_rows, header_for};

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b',';
