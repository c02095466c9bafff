//! Farmbucket: warehouse-compatible FarmHash bucketing library

// Import various modules
pub mod bucket;
pub mod config;
pub mod evaluator;
pub mod infrastructure;
pub mod report;
pub mod source;

// Re-export the main entry points for easier access
pub use bucket::{Bucketer, bucket};
pub use config::{BucketConfig, ConfigError};
pub use evaluator::{BucketRecord, EvaluationResult, Evaluator};
pub use infrastructure::hash::{fingerprint64, hash_string};
pub use report::Report;
pub use source::{DelimitedSource, SourceError};
