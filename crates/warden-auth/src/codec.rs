//! Credential codec: one instance per process, built from [`AuthConfig`].

use sha2::{Digest, Sha256};
use warden_core::models::claims::UserClaims;

use crate::config::AuthConfig;
use crate::envelope::{RefreshEnvelope, RefreshSealer};
use crate::error::AuthError;
use crate::token::{BearerClaims, BearerSigner};

/// Turns claims into bearer tokens and refresh envelopes and back.
///
/// The bearer signing secret and the refresh cipher secret are
/// independent; both are fixed at construction.
pub struct CredentialCodec {
    bearer: BearerSigner,
    refresh: RefreshSealer,
}

impl CredentialCodec {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self {
            bearer: BearerSigner::new(&config.token_secret, config.bearer_token_lifetime_secs)?,
            refresh: RefreshSealer::new(
                &config.refresh_secret,
                config.refresh_token_lifetime_secs,
            )?,
        })
    }

    pub fn issue_bearer_token(&self, claims: &UserClaims) -> Result<String, AuthError> {
        self.bearer.issue(claims)
    }

    pub fn verify_bearer_token(&self, token: &str) -> Result<BearerClaims, AuthError> {
        self.bearer.verify(token)
    }

    /// Identity extraction for degraded paths: tolerates expiry only.
    pub fn identity_of(&self, token: &str) -> Result<UserClaims, AuthError> {
        self.bearer.identity_of(token)
    }

    pub fn encode_refresh_envelope(&self, claims: &UserClaims) -> Result<String, AuthError> {
        self.refresh.encode(claims)
    }

    pub fn decode_refresh_envelope(&self, envelope: &str) -> Result<RefreshEnvelope, AuthError> {
        self.refresh.decode(envelope)
    }

    pub fn bearer(&self) -> &BearerSigner {
        &self.bearer
    }

    pub fn refresh(&self) -> &RefreshSealer {
        &self.refresh
    }

    /// One-way digest for password-equivalent comparisons: SHA-256 of
    /// `value`, hex-encoded. Independent of both secrets.
    pub fn hash_secret(&self, value: &str) -> String {
        hex::encode(Sha256::digest(value.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            token_secret: "token-secret".into(),
            refresh_secret: "refresh-secret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn bearer_and_refresh_keys_are_independent() {
        let codec = CredentialCodec::new(&config()).unwrap();
        let claims = UserClaims::new("u-1", "Alice");

        let bearer = codec.issue_bearer_token(&claims).unwrap();
        let refresh = codec.encode_refresh_envelope(&claims).unwrap();

        assert!(codec.decode_refresh_envelope(&bearer).is_err());
        assert!(codec.verify_bearer_token(&refresh).is_err());
        assert_eq!(codec.verify_bearer_token(&bearer).unwrap().user, claims);
        assert_eq!(codec.decode_refresh_envelope(&refresh).unwrap().claims, claims);
    }

    #[test]
    fn refresh_outlives_bearer() {
        let codec = CredentialCodec::new(&config()).unwrap();
        let claims = UserClaims::new("u-1", "Alice");

        let bearer = codec
            .verify_bearer_token(&codec.issue_bearer_token(&claims).unwrap())
            .unwrap();
        let refresh = codec
            .decode_refresh_envelope(&codec.encode_refresh_envelope(&claims).unwrap())
            .unwrap();
        assert!(refresh.expires_at > bearer.exp);
    }

    #[test]
    fn missing_token_secret_is_signing_error() {
        let config = AuthConfig {
            token_secret: String::new(),
            ..config()
        };
        assert!(matches!(
            CredentialCodec::new(&config),
            Err(AuthError::Signing(_))
        ));
    }

    #[test]
    fn hash_secret_is_sha256_hex() {
        let codec = CredentialCodec::new(&config()).unwrap();
        assert_eq!(
            codec.hash_secret("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(codec.hash_secret("a"), codec.hash_secret("b"));
    }
}
