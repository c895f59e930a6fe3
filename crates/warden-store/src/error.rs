//! Store-specific error types and conversions.

use std::time::Duration;

use warden_core::error::WardenError;

/// Store-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Corrupt record under key {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

impl From<StoreError> for WardenError {
    fn from(err: StoreError) -> Self {
        WardenError::Store(err.to_string())
    }
}
