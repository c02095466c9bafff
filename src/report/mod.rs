//! Accuracy report text
//!
//! Lays out the console report of an evaluation run: the header line, one
//! trace line per evaluated row and the match summary.

use crate::evaluator::EvaluationResult;
use crate::source::DelimitedRows;
use std::fmt;

pub const NO_ROWS: &str = "No rows to evaluate.";
pub const NO_VALID_ROWS: &str = "No valid rows processed.";

/// Report over one source and its evaluation result
#[derive(Debug, Clone)]
pub struct Report<'a> {
    header: Option<&'a str>,
    result: &'a EvaluationResult,
    show_trace: bool,
}

impl<'a> Report<'a> {
    pub fn new(rows: &'a DelimitedRows, result: &'a EvaluationResult) -> Self {
        Self {
            header: rows.header.as_deref(),
            result,
            show_trace: true,
        }
    }

    /// Keep or drop the per-row trace lines
    pub fn with_trace(mut self, show_trace: bool) -> Self {
        self.show_trace = show_trace;
        self
    }

    /// `Matches: M/T  Accuracy: X.XX%`, or `None` when nothing was evaluated
    pub fn summary(&self) -> Option<String> {
        self.result.accuracy().map(|accuracy| {
            format!(
                "Matches: {}/{}  Accuracy: {:.2}%",
                self.result.matches, self.result.total, accuracy
            )
        })
    }

    pub fn lines(&self) -> Vec<String> {
        let header = match self.header {
            Some(header) => header,
            None => return vec![NO_ROWS.to_string()],
        };

        let mut lines = vec![format!("Using CSV header: {}", header)];
        if self.show_trace {
            lines.extend(self.result.trace.iter().cloned());
        }
        match self.summary() {
            Some(summary) => {
                // Blank line before the summary
                lines.push(String::new());
                lines.push(summary);
            }
            None => lines.push(NO_VALID_ROWS.to_string()),
        }
        lines
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
