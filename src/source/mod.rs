//! Delimited-file row source
//!
//! Reads a warehouse export: one header record followed by one record per
//! line. Fields are split on a single delimiter character. A field that
//! starts with `"` is quoted: it may hold the delimiter, line breaks and
//! `""` escapes, and the quotes themselves are dropped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub mod error;
pub use error::{SourceError, SourceResult};

/// Header and raw rows of a delimited file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelimitedRows {
    /// Header fields joined with `,`, `None` when the file is empty
    pub header: Option<String>,
    /// Remaining non-empty lines split into fields
    pub rows: Vec<Vec<String>>,
}

impl DelimitedRows {
    pub fn is_empty(&self) -> bool {
        self.header.is_none()
    }
}

/// Reads rows from a delimited file
pub struct DelimitedSource {
    path: PathBuf,
    delimiter: char,
}

impl DelimitedSource {
    pub fn new(path: impl AsRef<Path>, delimiter: char) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file
    pub fn read(&self) -> SourceResult<DelimitedRows> {
        let file = File::open(&self.path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => {
                SourceError::NotFound(self.path.display().to_string())
            }
            _ => SourceError::IoError(err),
        })?;
        let rows = read_delimited(BufReader::new(file), self.delimiter)?;
        tracing::debug!(
            path = %self.path.display(),
            rows = rows.rows.len(),
            "read delimited source"
        );
        Ok(rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Start,
    Unquoted,
    Quoted,
    // Saw a `"` inside a quoted field: either an escape or the closing quote
    QuoteInQuoted,
}

/// Split a record into fields; the flag is set when a quoted field is
/// still open at the end of the input
fn scan_record(record: &str, delimiter: char) -> (Vec<String>, bool) {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = FieldState::Start;

    for ch in record.chars() {
        state = match (state, ch) {
            (FieldState::Quoted, '"') => FieldState::QuoteInQuoted,
            (FieldState::Quoted, _) => {
                field.push(ch);
                FieldState::Quoted
            }
            (FieldState::QuoteInQuoted, '"') => {
                field.push('"');
                FieldState::Quoted
            }
            (_, c) if c == delimiter => {
                fields.push(std::mem::take(&mut field));
                FieldState::Start
            }
            (FieldState::Start, '"') => FieldState::Quoted,
            // Text after a closing quote is kept as is
            (_, _) => {
                field.push(ch);
                FieldState::Unquoted
            }
        };
    }

    fields.push(field);
    (fields, state == FieldState::Quoted)
}

/// Split one record into fields, keeping empty ones and removing quotes
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    scan_record(line, delimiter).0
}

/// Pull lines until the record's quoted fields are closed
fn next_record<I>(lines: &mut I, delimiter: char) -> SourceResult<Option<(String, Vec<String>)>>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut record = match lines.next() {
        Some(line) => strip_line_end(line?),
        None => return Ok(None),
    };
    loop {
        let (fields, open) = scan_record(&record, delimiter);
        if !open {
            return Ok(Some((record, fields)));
        }
        match lines.next() {
            Some(line) => {
                record.push('\n');
                record.push_str(&strip_line_end(line?));
            }
            // Unterminated quote runs to the end of the input
            None => return Ok(Some((record, fields))),
        }
    }
}

/// Parse a header record and rows from any buffered reader
pub fn read_delimited<R: BufRead>(reader: R, delimiter: char) -> SourceResult<DelimitedRows> {
    let mut lines = reader.lines();

    let header = match next_record(&mut lines, delimiter)? {
        Some((_, fields)) => fields.join(","),
        None => return Ok(DelimitedRows::default()),
    };

    let mut rows = Vec::new();
    while let Some((record, fields)) = next_record(&mut lines, delimiter)? {
        if record.is_empty() {
            continue;
        }
        rows.push(fields);
    }

    Ok(DelimitedRows {
        header: Some(header),
        rows,
    })
}

// `lines()` drops "\n" but leaves the "\r" of CRLF files
fn strip_line_end(mut line: String) -> String {
    if line.ends_with('\r') {
        line.pop();
    }
    line
}
