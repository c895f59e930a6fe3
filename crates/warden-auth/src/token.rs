//! HS512 bearer token issuance and verification.
//!
//! Bearer tokens travel as `"Bearer " + <compact JWT>`; the scheme marker
//! is part of the issued value and is what the session ledger stores.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_core::models::claims::UserClaims;

use crate::error::AuthError;

/// Scheme marker prepended to every issued bearer token.
pub const BEARER_PREFIX: &str = "Bearer ";

/// JWT claims embedded in every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerClaims {
    #[serde(flatten)]
    pub user: UserClaims,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID (UUID string).
    pub jti: String,
}

/// Signs and verifies bearer tokens with a symmetric HMAC-SHA-512 key.
pub struct BearerSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime_secs: i64,
}

impl BearerSigner {
    pub fn new(secret: &str, lifetime_secs: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Signing("token secret is not configured".into()));
        }
        let lifetime_secs = i64::try_from(lifetime_secs)
            .map_err(|_| AuthError::Config("bearer lifetime out of range".into()))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        })
    }

    /// Issue a token for `claims`, valid from now for the configured
    /// lifetime.
    pub fn issue(&self, claims: &UserClaims) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let exp = now
            .checked_add(self.lifetime_secs)
            .ok_or_else(|| AuthError::Signing("bearer expiry overflows".into()))?;
        self.sign(&BearerClaims {
            user: claims.clone(),
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Sign fully-formed claims.
    pub fn sign(&self, claims: &BearerClaims) -> Result<String, AuthError> {
        let header = Header::new(Algorithm::HS512);
        let token = jsonwebtoken::encode(&header, claims, &self.encoding)
            .map_err(|e| AuthError::Signing(format!("JWT encode: {e}")))?;
        Ok(format!("{BEARER_PREFIX}{token}"))
    }

    /// Verify signature, algorithm and expiry.
    pub fn verify(&self, token: &str) -> Result<BearerClaims, AuthError> {
        self.decode(token, true)
    }

    /// Identity of a correctly signed token, expired or not.
    pub fn identity_of(&self, token: &str) -> Result<UserClaims, AuthError> {
        self.decode(token, false).map(|claims| claims.user)
    }

    fn decode(&self, token: &str, check_expiry: bool) -> Result<BearerClaims, AuthError> {
        let compact = strip_scheme(token)?;

        // Only HS512 is accepted; any other header algorithm fails.
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        validation.validate_exp = check_expiry;
        validation.set_required_spec_claims(&["exp", "iat"]);

        jsonwebtoken::decode::<BearerClaims>(compact, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::InvalidKeyFormat => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }
}

/// Remove the `"Bearer "` marker, failing if it is absent.
pub fn strip_scheme(token: &str) -> Result<&str, AuthError> {
    token
        .strip_prefix(BEARER_PREFIX)
        .filter(|rest| !rest.is_empty())
        .ok_or(AuthError::MalformedToken)
}
