//! Opaque refresh-token envelope.
//!
//! Wire format: `hex(nonce || ciphertext || tag)` where the ciphertext is
//! AES-256-GCM over the JSON-encoded [`RefreshEnvelope`] and the key is
//! SHA-256 of the refresh secret. The nonce is random per call, so sealing
//! the same claims twice never yields the same string.
//!
//! Decoding only proves the envelope is authentic; whether it is still
//! valid is the caller's decision via [`RefreshEnvelope::is_expired_at`].

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use warden_core::models::claims::UserClaims;

use crate::error::AuthError;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Plaintext carried inside a refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshEnvelope {
    pub claims: UserClaims,
    /// Expiry (Unix timestamp).
    pub expires_at: i64,
}

impl RefreshEnvelope {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

pub struct RefreshSealer {
    cipher: Aes256Gcm,
    lifetime_secs: i64,
}

impl RefreshSealer {
    pub fn new(secret: &str, lifetime_secs: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Config("refresh secret is not configured".into()));
        }
        let lifetime_secs = i64::try_from(lifetime_secs)
            .map_err(|_| AuthError::Config("refresh lifetime out of range".into()))?;
        let key = Sha256::digest(secret.as_bytes());
        Ok(Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)),
            lifetime_secs,
        })
    }

    /// Seal `claims` with an expiry of now plus the refresh lifetime.
    pub fn encode(&self, claims: &UserClaims) -> Result<String, AuthError> {
        let expires_at = Utc::now()
            .timestamp()
            .checked_add(self.lifetime_secs)
            .ok_or_else(|| AuthError::Crypto("refresh expiry overflows".into()))?;
        self.seal(&RefreshEnvelope {
            claims: claims.clone(),
            expires_at,
        })
    }

    pub fn seal(&self, envelope: &RefreshEnvelope) -> Result<String, AuthError> {
        let plaintext = serde_json::to_vec(envelope)
            .map_err(|e| AuthError::Crypto(format!("envelope encode: {e}")))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_ref())
            .map_err(|e| AuthError::Crypto(format!("AES-GCM encrypt: {e}")))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);
        Ok(hex::encode(combined))
    }

    /// Open an envelope. Expired envelopes decode successfully.
    pub fn decode(&self, encoded: &str) -> Result<RefreshEnvelope, AuthError> {
        let combined =
            hex::decode(encoded).map_err(|e| AuthError::Decode(format!("hex decode: {e}")))?;

        if combined.len() <= NONCE_LEN + TAG_LEN {
            return Err(AuthError::Decode("ciphertext too short".into()));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| AuthError::Decode("authentication tag mismatch".into()))?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| AuthError::Decode(format!("envelope body: {e}")))
    }
}
