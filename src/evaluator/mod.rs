//! Bucket accuracy evaluation
//!
//! Compares locally computed buckets against buckets exported from the
//! warehouse and aggregates match counts plus one trace line per row.

use crate::bucket::Bucketer;
use rayon::prelude::*;
use std::fmt;
use std::num::IntErrorKind;

/// Expected bucket as exported by the warehouse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    Bucket(i64),
    /// A well-formed integer too large for `i64`; never matches
    OutOfRange(String),
}

impl Expected {
    /// Parse a decimal integer; `None` for anything that is not one
    pub fn parse(text: &str) -> Option<Self> {
        match text.parse::<i64>() {
            Ok(value) => Some(Expected::Bucket(value)),
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    Some(Expected::OutOfRange(normalize_integer(text)))
                }
                _ => None,
            },
        }
    }

    pub fn matches(&self, predicted: u32) -> bool {
        match self {
            Expected::Bucket(value) => *value == predicted as i64,
            Expected::OutOfRange(_) => false,
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Bucket(value) => write!(f, "{}", value),
            Expected::OutOfRange(text) => write!(f, "{}", text),
        }
    }
}

// Drop a leading `+` and leading zeros the way integer formatting would
fn normalize_integer(text: &str) -> String {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    let digits = digits.trim_start_matches('0');
    format!("{}{}", sign, digits)
}

/// One usable input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRecord {
    pub identifier: String,
    pub expected: Expected,
}

impl BucketRecord {
    pub fn new(identifier: impl Into<String>, expected: i64) -> Self {
        Self {
            identifier: identifier.into(),
            expected: Expected::Bucket(expected),
        }
    }

    /// Build a record from raw fields
    ///
    /// The first field is the identifier and the last is the expected
    /// bucket; anything in between is ignored. Returns `None` for rows with
    /// fewer than two fields, a blank identifier or a non-numeric bucket.
    /// Integers beyond the `i64` range are kept and count as mismatches.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        if fields.len() < 2 {
            return None;
        }
        let identifier = fields[0].as_ref().trim();
        let expected = fields[fields.len() - 1].as_ref().trim();
        if identifier.is_empty() || expected.is_empty() {
            return None;
        }
        Some(Self {
            identifier: identifier.to_string(),
            expected: Expected::parse(expected)?,
        })
    }
}

/// Outcome of one evaluation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationResult {
    pub matches: usize,
    pub total: usize,
    pub trace: Vec<String>,
}

impl EvaluationResult {
    /// Match rate in percent, `None` when nothing was evaluated
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.matches as f64 / self.total as f64 * 100.0)
    }

    fn record(&mut self, record: &BucketRecord, predicted: u32) {
        self.total += 1;
        if record.expected.matches(predicted) {
            self.matches += 1;
        }
        self.trace.push(trace_line(record, predicted));
    }
}

/// `adid=<id> expected=<e> predicted=<p>`
pub fn trace_line(record: &BucketRecord, predicted: u32) -> String {
    format!(
        "adid={} expected={} predicted={}",
        record.identifier, record.expected, predicted
    )
}

fn parse_row(index: usize, fields: &[String]) -> Option<BucketRecord> {
    let record = BucketRecord::from_fields(fields);
    if record.is_none() {
        tracing::debug!(row = index, "skipping malformed row");
    }
    record
}

/// Runs records through a bucketer
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    bucketer: Bucketer,
}

impl Evaluator {
    pub fn new(bucketer: Bucketer) -> Self {
        Self { bucketer }
    }

    pub fn bucketer(&self) -> &Bucketer {
        &self.bucketer
    }

    pub fn evaluate<I>(&self, records: I) -> EvaluationResult
    where
        I: IntoIterator<Item = BucketRecord>,
    {
        let mut result = EvaluationResult::default();
        for record in records {
            let predicted = self.bucketer.bucket(&record.identifier);
            tracing::trace!(adid = %record.identifier, expected = %record.expected, predicted);
            result.record(&record, predicted);
        }
        tracing::info!(matches = result.matches, total = result.total, "evaluation finished");
        result
    }

    /// Parse raw rows and evaluate the usable ones; malformed rows are skipped
    pub fn evaluate_rows<I, R>(&self, rows: I) -> EvaluationResult
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[String]>,
    {
        let records = rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| parse_row(index, row.as_ref()));
        self.evaluate(records)
    }

    /// Parallel counterpart of `evaluate_rows`
    pub fn evaluate_rows_parallel<R>(&self, rows: &[R]) -> EvaluationResult
    where
        R: AsRef<[String]>,
    {
        let records: Vec<BucketRecord> = rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| parse_row(index, row.as_ref()))
            .collect();
        self.evaluate_parallel(&records)
    }

    /// Same result as `evaluate`, with bucketing spread across the rayon pool
    pub fn evaluate_parallel(&self, records: &[BucketRecord]) -> EvaluationResult {
        // Indexed collect keeps input order
        let predicted: Vec<u32> = records
            .par_iter()
            .map(|record| self.bucketer.bucket(&record.identifier))
            .collect();

        let mut result = EvaluationResult::default();
        for (record, predicted) in records.iter().zip(predicted) {
            result.record(record, predicted);
        }
        tracing::info!(
            matches = result.matches,
            total = result.total,
            "parallel evaluation finished"
        );
        result
    }
}
