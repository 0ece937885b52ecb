//! Tests for the CSV codec
//!
//! These tests verify:
//! - Decoding header + records into rows
//! - Encoding rows with a derived header
//! - Quoting of delimiters, quotes and newlines
//! - Malformed input errors with line numbers
//! - Round trips for homogeneous row sets, including whitespace-only,
//!   carriage-return and byte-order-mark edge values

use csvdb::codec::{decode_rows, encode_rows, header_for, DEFAULT_DELIMITER};
use csvdb::{CsvDbError, Row};

// =============================================================================
// Helper Functions
// =============================================================================

fn decode(text: &str) -> Vec<Row> {
    decode_rows(text.as_bytes(), DEFAULT_DELIMITER).unwrap()
}

fn encode(rows: &[Row]) -> String {
    String::from_utf8(encode_rows(rows, DEFAULT_DELIMITER).unwrap().to_vec()).unwrap()
}

fn three_rows() -> Vec<Row> {
    vec![
        Row::from([("id", "1"), ("foo", "bar")]),
        Row::from([("id", "2"), ("foo", "baz")]),
        Row::from([("id", "3"), ("foo", "zed")]),
    ]
}

fn round_trip(rows: &[Row]) -> Vec<Row> {
    let encoded = encode_rows(rows, DEFAULT_DELIMITER).unwrap();
    decode_rows(&encoded, DEFAULT_DELIMITER).unwrap()
}

fn codec_error_line(text: &str) -> usize {
    match decode_rows(text.as_bytes(), DEFAULT_DELIMITER) {
        Err(CsvDbError::Codec { line, .. }) => line,
        other => panic!("expected codec error, got {:?}", other),
    }
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_decode_header_and_records() {
    let rows = decode("id,foo\n1,bar\n2,baz\n3,zed\n");
    assert_eq!(rows, three_rows());
}

#[test]
fn test_decode_keeps_header_order() {
    let rows = decode("id,foo\n1,bar\n");
    assert_eq!(rows[0].field_names().collect::<Vec<_>>(), vec!["id", "foo"]);
}

#[test]
fn test_decode_without_trailing_newline() {
    let rows = decode("id,foo\n1,bar\n2,baz\n3,zed");
    assert_eq!(rows, three_rows());
}

#[test]
fn test_decode_empty_input() {
    assert!(decode("").is_empty());
}

#[test]
fn test_decode_blank_lines_only() {
    assert!(decode("\n\n  \n").is_empty());
}

#[test]
fn test_decode_header_only() {
    assert!(decode("id,foo\n").is_empty());
}

#[test]
fn test_decode_skips_blank_lines() {
    let rows = decode("id,foo\n\n1,bar\n\n2,baz\n3,zed\n\n");
    assert_eq!(rows, three_rows());
}

#[test]
fn test_decode_crlf() {
    let rows = decode("id,foo\r\n1,bar\r\n2,baz\r\n3,zed\r\n");
    assert_eq!(rows, three_rows());
}

#[test]
fn test_decode_strips_bom() {
    let rows = decode("\u{feff}id,foo\n1,bar\n");
    assert_eq!(rows, vec![Row::from([("id", "1"), ("foo", "bar")])]);
}

#[test]
fn test_decode_short_record_padded_with_empty() {
    let rows = decode("id,foo,extra\n1,bar\n");
    assert_eq!(rows, vec![Row::from([("id", "1"), ("foo", "bar"), ("extra", "")])]);
}

#[test]
fn test_decode_empty_fields() {
    let rows = decode("id,foo\n,\n");
    assert_eq!(rows, vec![Row::from([("id", ""), ("foo", "")])]);
}

#[test]
fn test_decode_quoted_fields() {
    let rows = decode("id,note\n1,\"a,b\"\n2,\"say \"\"hi\"\"\"\n3,\"two\nlines\"\n");

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get("note"), Some("a,b"));
    assert_eq!(rows[1].get("note"), Some("say \"hi\""));
    assert_eq!(rows[2].get("note"), Some("two\nlines"));
}

#[test]
fn test_decode_custom_delimiter() {
    let rows = decode_rows(b"id;foo\n1;a,b\n", b';').unwrap();
    assert_eq!(rows, vec![Row::from([("id", "1"), ("foo", "a,b")])]);
}

// =============================================================================
// Decode Error Tests
// =============================================================================

#[test]
fn test_decode_too_many_fields() {
    assert_eq!(codec_error_line("id,foo\n1,bar\n2,baz,extra\n"), 3);
}

#[test]
fn test_decode_duplicate_header() {
    assert_eq!(codec_error_line("id,id\n1,2\n"), 1);
}

#[test]
fn test_decode_invalid_utf8() {
    let bytes = b"id,foo\n1,\xff\n";
    assert!(matches!(
        decode_rows(bytes, DEFAULT_DELIMITER),
        Err(CsvDbError::Codec { .. })
    ));
}

#[test]
fn test_decode_unterminated_quote_reads_to_end() {
    let rows = decode("id,foo\n1,bar\n2,\"open\n");

    assert_eq!(rows.len(), 2);
    assert!(rows[1].get("foo").unwrap().starts_with("open"));
}

#[test]
fn test_decode_whitespace_line_is_a_record() {
    let rows = decode("name\nalice\n \n");
    assert_eq!(rows, vec![Row::from([("name", "alice")]), Row::from([("name", " ")])]);
}

// =============================================================================
// Encode Tests
// =============================================================================

#[test]
fn test_encode_single_row() {
    let rows = vec![Row::from([("id", "1"), ("foo", "bar")])];
    assert_eq!(encode(&rows), "id,foo\n1,bar\n");
}

#[test]
fn test_encode_multiple_rows() {
    assert_eq!(encode(&three_rows()), "id,foo\n1,bar\n2,baz\n3,zed\n");
}

#[test]
fn test_encode_empty() {
    assert_eq!(encode(&[]), "");
}

#[test]
fn test_encode_values_follow_header_order() {
    let rows = vec![
        Row::from([("id", "1"), ("foo", "bar")]),
        Row::from([("foo", "baz"), ("id", "2")]),
    ];
    assert_eq!(encode(&rows), "id,foo\n1,bar\n2,baz\n");
}

#[test]
fn test_encode_heterogeneous_rows_use_union_header() {
    let rows = vec![
        Row::from([("id", "1"), ("foo", "bar")]),
        Row::from([("id", "2"), ("extra", "x")]),
    ];

    assert_eq!(header_for(&rows), vec!["id", "foo", "extra"]);
    assert_eq!(encode(&rows), "id,foo,extra\n1,bar,\n2,,x\n");
}

#[test]
fn test_encode_quotes_special_values() {
    let rows = vec![Row::from([("id", "1"), ("note", "a,\"b\"\nc")])];
    assert_eq!(encode(&rows), "id,note\n1,\"a,\"\"b\"\"\nc\"\n");
}

#[test]
fn test_encode_quotes_special_header() {
    let rows = vec![Row::from([("a,b", "1")])];
    assert_eq!(encode(&rows), "\"a,b\"\n1\n");
}

#[test]
fn test_encode_single_empty_column_not_blank() {
    let rows = vec![Row::from([("note", "")])];
    let text = encode(&rows);

    assert!(!text.contains("\n\n"));
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn test_encode_row_without_fields_fails() {
    let result = encode_rows(&[Row::new()], DEFAULT_DELIMITER);
    assert!(matches!(result, Err(CsvDbError::EmptyRow)));
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip_homogeneous() {
    let rows = vec![
        Row::from([("id", "1"), ("note", "plain")]),
        Row::from([("id", "2"), ("note", "with, comma")]),
        Row::from([("id", "3"), ("note", "with \"quotes\"")]),
        Row::from([("id", "4"), ("note", "multi\r\nline")]),
        Row::from([("id", "5"), ("note", "")]),
    ];

    assert_eq!(round_trip(&rows), rows);
}

#[test]
fn test_round_trip_single_empty_column() {
    let rows = vec![Row::from([("note", "")]), Row::from([("note", "x")])];

    assert_eq!(round_trip(&rows), rows);
}

#[test]
fn test_round_trip_custom_delimiter() {
    let rows = vec![Row::from([("id", "1"), ("foo", "a;b,c")])];

    let encoded = encode_rows(&rows, b';').unwrap();
    assert_eq!(&encoded[..], b"id;foo\n1;\"a;b,c\"\n");
    assert_eq!(decode_rows(&encoded, b';').unwrap(), rows);
}

#[test]
fn test_round_trip_whitespace_only_value() {
    let rows = vec![Row::from([("name", "alice")]), Row::from([("name", " ")])];
    assert_eq!(round_trip(&rows), rows);
}

#[test]
fn test_round_trip_whitespace_only_header() {
    let rows = vec![Row::from([(" ", "a")])];
    assert_eq!(round_trip(&rows), rows);
}

/// Edge values that must survive both the codec and a reopened connection
fn edge_cases() -> Vec<(&'static str, Vec<Row>)> {
    vec![
        ("whitespace-only value", vec![Row::from([("name", "alice")]), Row::from([("name", " ")])]),
        ("tab-only value", vec![Row::from([("name", "\t")])]),
        ("whitespace-only header", vec![Row::from([(" ", "a")])]),
        ("empty header", vec![Row::from([("", "a")])]),
        ("empty lone value", vec![Row::from([("note", "")]), Row::from([("note", "x")])]),
        ("leading and trailing spaces", vec![Row::from([("id", " 1"), ("foo", "bar  ")])]),
        ("spaced header names", vec![Row::from([(" id ", "1"), ("foo ", "2")])]),
        ("embedded carriage return", vec![Row::from([("id", "1"), ("note", "a\rb")])]),
        ("trailing carriage return", vec![Row::from([("note", "end\r")])]),
        ("leading bom in header", vec![Row::from([("\u{feff}id", "1"), ("foo", "bar")])]),
        ("leading bom in value", vec![Row::from([("id", "\u{feff}1")])]),
        ("quotes and newlines", vec![Row::from([("id", "1"), ("note", "\"a\"\nb")])]),
    ]
}

#[test]
fn test_round_trip_edge_values() {
    for (name, rows) in edge_cases() {
        assert_eq!(round_trip(&rows), rows, "case: {}", name);
    }
}
