use super::*;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

#[test]
fn test_read_delimited_header_and_rows() {
    let input = "adid,date,bucket\nabc123,2025-01-01,96\nxyz-987,2025-01-02,63\n";
    let rows = read_delimited(Cursor::new(input), ',').unwrap();

    assert_eq!(rows.header.as_deref(), Some("adid,date,bucket"));
    assert_eq!(rows.rows.len(), 2);
    assert_eq!(rows.rows[0], vec!["abc123", "2025-01-01", "96"]);
    assert_eq!(rows.rows[1], vec!["xyz-987", "2025-01-02", "63"]);
}

#[test]
fn test_read_delimited_empty_input() {
    let rows = read_delimited(Cursor::new(""), ',').unwrap();
    assert!(rows.is_empty());
    assert!(rows.rows.is_empty());
}

#[test]
fn test_read_delimited_header_only() {
    let rows = read_delimited(Cursor::new("adid,bucket\n"), ',').unwrap();
    assert!(!rows.is_empty());
    assert!(rows.rows.is_empty());
}

#[test]
fn test_read_delimited_skips_blank_lines_and_crlf() {
    let input = "adid,bucket\r\n\r\nabc123,96\r\n\nA1B2C3D4,98";
    let rows = read_delimited(Cursor::new(input), ',').unwrap();

    assert_eq!(rows.header.as_deref(), Some("adid,bucket"));
    assert_eq!(rows.rows, vec![vec!["abc123", "96"], vec!["A1B2C3D4", "98"]]);
}

#[test]
fn test_read_delimited_custom_delimiter() {
    let input = "adid\tbucket\nabc123\t96\n";
    let rows = read_delimited(Cursor::new(input), '\t').unwrap();
    assert_eq!(rows.rows, vec![vec!["abc123", "96"]]);
}

#[test]
fn test_split_line_keeps_empty_fields() {
    assert_eq!(split_line("a,,b", ','), vec!["a", "", "b"]);
    assert_eq!(split_line(",7", ','), vec!["", "7"]);
    assert_eq!(split_line("single", ','), vec!["single"]);
}

#[test]
fn test_delimited_source_reads_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("export.csv");
    fs::write(&path, "adid,bucket\nabc123,96\n").unwrap();

    let source = DelimitedSource::new(&path, ',');
    assert_eq!(source.path(), path.as_path());

    let rows = source.read().unwrap();
    assert_eq!(rows.header.as_deref(), Some("adid,bucket"));
    assert_eq!(rows.rows, vec![vec!["abc123", "96"]]);
}

#[test]
fn test_delimited_source_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let source = DelimitedSource::new(temp_dir.path().join("missing.csv"), ',');
    let result = source.read();
    assert!(matches!(result, Err(SourceError::NotFound(_))));
}

#[test]
fn test_source_error_display() {
    let err = SourceError::NotFound("test.csv".to_string());
    assert_eq!(err.to_string(), "Input file not found: test.csv");

    let io_err = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8");
    let err: SourceError = io_err.into();
    assert!(matches!(err, SourceError::IoError(_)));
}

#[test]
fn test_split_line_quoted_fields() {
    assert_eq!(split_line("\"abc123\",96", ','), vec!["abc123", "96"]);
    // Delimiter and escaped quotes inside a quoted field
    assert_eq!(
        split_line("\"a,b\",\"say \"\"hi\"\"\",7", ','),
        vec!["a,b", "say \"hi\"", "7"]
    );
    assert_eq!(split_line("\"\",5", ','), vec!["", "5"]);
}

#[test]
fn test_split_line_stray_quotes_are_literal() {
    // A quote that does not open a field is kept
    assert_eq!(split_line("ab\"c,1", ','), vec!["ab\"c", "1"]);
    // Text after a closing quote is appended
    assert_eq!(split_line("\"ab\"c,1", ','), vec!["abc", "1"]);
}

#[test]
fn test_read_delimited_quoted_identifier() {
    let input = "\"adid\",\"bucket\"\n\"abc123\",96\n\"x,y\",\"3\"\n";
    let rows = read_delimited(Cursor::new(input), ',').unwrap();

    assert_eq!(rows.header.as_deref(), Some("adid,bucket"));
    assert_eq!(rows.rows, vec![vec!["abc123", "96"], vec!["x,y", "3"]]);
}

#[test]
fn test_read_delimited_quoted_line_break() {
    let input = "adid,note,bucket\nabc123,\"two\nlines\",96\nxyz-987,,63\n";
    let rows = read_delimited(Cursor::new(input), ',').unwrap();

    assert_eq!(
        rows.rows,
        vec![vec!["abc123", "two\nlines", "96"], vec!["xyz-987", "", "63"]]
    );
}

#[test]
fn test_read_delimited_unterminated_quote() {
    let input = "adid,bucket\n\"abc123,96\n";
    let rows = read_delimited(Cursor::new(input), ',').unwrap();
    assert_eq!(rows.rows, vec![vec!["abc123,96"]]);
}
