//! Authentication error types.

use thiserror::Error;
use warden_core::error::WardenError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed token")]
    MalformedToken,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    TokenExpired,

    #[error("refresh token has expired")]
    RefreshExpired,

    #[error("undecodable refresh token: {0}")]
    Decode(String),

    #[error("token has been revoked")]
    Revoked,

    #[error("refresh pairing is no longer active")]
    StaleRotation,

    #[error("no session ledger for user")]
    NotFound,

    #[error("unable to sign token: {0}")]
    Signing(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid one-time passcode")]
    InvalidOtp,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error(transparent)]
    Backend(#[from] WardenError),
}

impl AuthError {
    /// Whether the caller should prompt for a fresh login rather than
    /// reject outright.
    pub fn is_expired(&self) -> bool {
        matches!(self, AuthError::TokenExpired | AuthError::RefreshExpired)
    }
}

impl From<AuthError> for WardenError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired | AuthError::RefreshExpired => WardenError::CredentialsExpired,
            AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::Decode(_)
            | AuthError::Revoked
            | AuthError::StaleRotation
            | AuthError::NotFound
            | AuthError::InvalidCredentials
            | AuthError::InvalidOtp => WardenError::AuthenticationFailed {
                reason: "invalid credentials".into(),
            },
            AuthError::Signing(msg) | AuthError::Crypto(msg) => WardenError::Crypto(msg),
            AuthError::Config(message) => WardenError::Validation { message },
            AuthError::Backend(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_failures_collapse_to_one_reason() {
        let reasons: Vec<String> = [
            AuthError::MalformedToken,
            AuthError::InvalidSignature,
            AuthError::Revoked,
            AuthError::StaleRotation,
            AuthError::NotFound,
        ]
        .into_iter()
        .map(|e| match WardenError::from(e) {
            WardenError::AuthenticationFailed { reason } => reason,
            other => panic!("expected AuthenticationFailed, got {other:?}"),
        })
        .collect();

        assert!(reasons.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn expiry_stays_distinguishable() {
        assert!(AuthError::RefreshExpired.is_expired());
        assert!(!AuthError::Revoked.is_expired());
        assert!(matches!(
            WardenError::from(AuthError::TokenExpired),
            WardenError::CredentialsExpired
        ));
    }
}
