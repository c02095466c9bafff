//! Warehouse-compatible bucketing
//!
//! Reproduces `MOD(ABS(FARM_FINGERPRINT(CONCAT(id, key, salt))), n)`:
//! the fingerprint is read as a signed value, its absolute value is taken
//! without overflowing at `i64::MIN`, and the result is reduced modulo `n`.

use crate::config::{BucketConfig, ConfigError, ConfigResult, DEFAULT_BUCKET_COUNT};
use crate::infrastructure::hash::fingerprint64;
use std::num::NonZeroU32;

const DEFAULT_BUCKETS: NonZeroU32 = match NonZeroU32::new(DEFAULT_BUCKET_COUNT as u32) {
    Some(count) => count,
    None => panic!("default bucket count must be positive"),
};

/// Absolute value of a signed fingerprint as an unsigned word
///
/// `i64::MIN` has no positive counterpart; negating it in two's complement
/// gives `2^63`, which is what the warehouse reports.
#[inline]
pub fn abs_i64_as_u64(value: i64) -> u64 {
    value.unsigned_abs()
}

/// Reduce a raw fingerprint to a bucket in `[0, bucket_count)`
#[inline]
pub fn bucket_of_fingerprint(fingerprint: u64, bucket_count: NonZeroU32) -> u32 {
    let signed = fingerprint as i64;
    // The remainder is below `bucket_count`, so it fits in u32
    (abs_i64_as_u64(signed) % bucket_count.get() as u64) as u32
}

/// Maps identifiers to buckets under one configuration
#[derive(Debug, Clone)]
pub struct Bucketer {
    config: BucketConfig,
    bucket_count: NonZeroU32,
}

impl Bucketer {
    /// Create a bucketer; the configuration is validated first
    pub fn new(config: BucketConfig) -> ConfigResult<Self> {
        config.validate()?;
        let bucket_count = u32::try_from(config.bucket_count)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                ConfigError::InvalidArgument(format!(
                    "bucket_count out of range: {}",
                    config.bucket_count
                ))
            })?;
        Ok(Self {
            config,
            bucket_count,
        })
    }

    pub fn config(&self) -> &BucketConfig {
        &self.config
    }

    /// Bytes that get hashed: identifier, experiment key and salt back to back
    pub fn payload(&self, identifier: &str) -> Vec<u8> {
        let mut payload = String::with_capacity(
            identifier.len() + self.config.experiment_key.len() + self.config.salt.len(),
        );
        payload.push_str(identifier);
        payload.push_str(&self.config.experiment_key);
        payload.push_str(&self.config.salt);
        payload.into_bytes()
    }

    pub fn fingerprint(&self, identifier: &str) -> u64 {
        fingerprint64(&self.payload(identifier))
    }

    pub fn bucket(&self, identifier: &str) -> u32 {
        bucket_of_fingerprint(self.fingerprint(identifier), self.bucket_count)
    }
}

impl Default for Bucketer {
    fn default() -> Self {
        Self {
            config: BucketConfig::default(),
            bucket_count: DEFAULT_BUCKETS,
        }
    }
}

/// Bucket an identifier with the default experiment key, salt and count
pub fn bucket(identifier: &str) -> u32 {
    Bucketer::default().bucket(identifier)
}
