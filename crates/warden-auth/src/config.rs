//! Authentication configuration.

use warden_core::models::session::MAX_SESSIONS;

use crate::error::AuthError;

/// Upper bound for either token lifetime: ten years.
pub const MAX_LIFETIME_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Configuration for the credential codec and authorizer.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for bearer token signing.
    pub token_secret: String,
    /// Secret from which the refresh envelope cipher key is derived.
    /// Must differ from `token_secret`.
    pub refresh_secret: String,
    /// Bearer token lifetime in seconds (default: 900 = 15 minutes).
    pub bearer_token_lifetime_secs: u64,
    /// Refresh envelope lifetime in seconds (default: 432_000 = 5 days).
    pub refresh_token_lifetime_secs: u64,
    /// Concurrent sessions kept per user (default: 3). `1` gives the
    /// single-pair overwrite model.
    pub max_sessions: usize,
    /// Optional pepper prepended to passwords before Argon2id verification.
    pub pepper: Option<String>,
    /// OTP lifetime in seconds (default: 120).
    pub otp_lifetime_secs: u64,
    /// Number of digits in an OTP (default: 6).
    pub otp_digits: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            refresh_secret: String::new(),
            bearer_token_lifetime_secs: 900,
            refresh_token_lifetime_secs: 432_000,
            max_sessions: MAX_SESSIONS,
            pepper: None,
            otp_lifetime_secs: 120,
            otp_digits: 6,
        }
    }
}

impl AuthConfig {
    /// Reject configurations that would break the token lifecycle
    /// invariants.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.refresh_secret.is_empty() {
            return Err(AuthError::Config("refresh secret is not configured".into()));
        }
        if self.token_secret == self.refresh_secret {
            return Err(AuthError::Config(
                "token and refresh secrets must be independent".into(),
            ));
        }
        if self.bearer_token_lifetime_secs == 0 {
            return Err(AuthError::Config("bearer lifetime must be positive".into()));
        }
        if self.refresh_token_lifetime_secs > MAX_LIFETIME_SECS {
            return Err(AuthError::Config(format!(
                "refresh lifetime must not exceed {MAX_LIFETIME_SECS} seconds"
            )));
        }
        if self.refresh_token_lifetime_secs <= self.bearer_token_lifetime_secs {
            return Err(AuthError::Config(
                "refresh lifetime must exceed bearer lifetime".into(),
            ));
        }
        if self.max_sessions == 0 {
            return Err(AuthError::Config("max_sessions must be at least 1".into()));
        }
        if self.otp_digits == 0 {
            return Err(AuthError::Config("otp_digits must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AuthConfig {
        AuthConfig {
            token_secret: "token-secret".into(),
            refresh_secret: "refresh-secret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_valid_with_secrets() {
        assert!(valid().validate().is_ok());
        assert_eq!(valid().max_sessions, 3);
    }

    #[test]
    fn shared_secret_is_rejected() {
        let config = AuthConfig {
            refresh_secret: "token-secret".into(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }

    #[test]
    fn refresh_must_outlive_bearer() {
        let config = AuthConfig {
            bearer_token_lifetime_secs: 3600,
            refresh_token_lifetime_secs: 3600,
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_lifetimes_are_rejected() {
        let config = AuthConfig {
            bearer_token_lifetime_secs: u64::MAX - 1,
            refresh_token_lifetime_secs: u64::MAX,
            ..valid()
        };
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));

        let config = AuthConfig {
            refresh_token_lifetime_secs: MAX_LIFETIME_SECS + 1,
            ..valid()
        };
        assert!(config.validate().is_err());

        let config = AuthConfig {
            refresh_token_lifetime_secs: MAX_LIFETIME_SECS,
            ..valid()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_sessions_is_rejected() {
        let config = AuthConfig {
            max_sessions: 0,
            ..valid()
        };
        assert!(config.validate().is_err());
    }
}
