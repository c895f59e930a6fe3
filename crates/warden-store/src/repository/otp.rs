//! Key-value implementation of [`OtpRepository`].

use std::time::Duration;

use warden_core::error::WardenResult;
use warden_core::models::otp::PendingOtp;
use warden_core::repository::{KeyValueStore, OtpRepository};

use crate::error::StoreError;

const OTP_KEY_PREFIX: &str = "otp:";

#[derive(Clone)]
pub struct KvOtpRepository<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> KvOtpRepository<S> {
    pub fn new(store: S) -> Self {
        Self { kv: store }
    }
}

fn otp_key(nonce: &str) -> String {
    format!("{OTP_KEY_PREFIX}{nonce}")
}

impl<S: KeyValueStore> OtpRepository for KvOtpRepository<S> {
    async fn store(&self, nonce: &str, otp: &PendingOtp, ttl: Duration) -> WardenResult<()> {
        let raw = serde_json::to_string(otp)?;
        self.kv.set_with_ttl(&otp_key(nonce), raw, ttl).await
    }

    async fn get(&self, nonce: &str) -> WardenResult<Option<PendingOtp>> {
        let key = otp_key(nonce);
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(None);
        };

        let otp = serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            key,
            reason: e.to_string(),
        })?;
        Ok(Some(otp))
    }

    async fn consume(&self, nonce: &str, expected: &PendingOtp) -> WardenResult<bool> {
        // Stored values are written by `store` with the same encoding.
        let raw = serde_json::to_string(expected)?;
        self.kv.delete_if_eq(&otp_key(nonce), &raw).await
    }
}
