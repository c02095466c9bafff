//! Row source error definitions

use std::error::Error;
use std::fmt;

/// Row source error types
#[derive(Debug)]
pub enum SourceError {
    /// Input file does not exist
    NotFound(String),
    /// I/O error while reading rows
    IoError(std::io::Error),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound(path) => write!(f, "Input file not found: {}", path),
            SourceError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SourceError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::IoError(err)
    }
}

/// Result type for row source operations
pub type SourceResult<T> = Result<T, SourceError>;
