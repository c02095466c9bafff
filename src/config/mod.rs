//! Bucketing configuration
//!
//! The experiment key, salt and bucket count belong to one warehouse
//! deployment rather than to the hash. Defaults reproduce
//! `MOD(ABS(FARM_FINGERPRINT(CONCAT(adid, 'test:1', 'salt-2025'))), 100)`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod error;
pub use error::{ConfigError, ConfigResult};

/// Default experiment key appended to every identifier
pub const DEFAULT_EXPERIMENT_KEY: &str = "test:1";

/// Default salt appended after the experiment key
pub const DEFAULT_SALT: &str = "salt-2025";

/// Default number of buckets
pub const DEFAULT_BUCKET_COUNT: u64 = 100;

/// Default field delimiter of the exported file
pub const DEFAULT_DELIMITER: char = ',';

/// Default path of the exported file
pub const DEFAULT_CSV_PATH: &str = "test.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    pub experiment_key: String,
    pub salt: String,
    pub bucket_count: u64,
    pub delimiter: char,
    pub default_csv_path: PathBuf,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            experiment_key: DEFAULT_EXPERIMENT_KEY.to_string(),
            salt: DEFAULT_SALT.to_string(),
            bucket_count: DEFAULT_BUCKET_COUNT,
            delimiter: DEFAULT_DELIMITER,
            default_csv_path: PathBuf::from(DEFAULT_CSV_PATH),
        }
    }
}

impl BucketConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded bucket config");
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the bucketer relies on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.bucket_count == 0 {
            return Err(ConfigError::InvalidArgument(
                "bucket_count must be positive".to_string(),
            ));
        }
        if self.bucket_count > u32::MAX as u64 {
            return Err(ConfigError::InvalidArgument(format!(
                "bucket_count too large: {}",
                self.bucket_count
            )));
        }
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(ConfigError::InvalidArgument(format!(
                "delimiter cannot be a line break: {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }

    pub fn with_experiment_key(mut self, experiment_key: impl Into<String>) -> Self {
        self.experiment_key = experiment_key.into();
        self
    }

    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    pub fn with_bucket_count(mut self, bucket_count: u64) -> Self {
        self.bucket_count = bucket_count;
        self
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
